/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    line_bytes: u8,
    len: u16,
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug)]
pub enum RandomCommand {
    Pack {
        start_line: u8,
        width: u8,
        values: Vec<u64>,
        overwrite: bool,
    },
    Unpack {
        start_line: u8,
        width: u8,
        count: u8,
    },
    ChangeEndian(u16),
    Reset(u16),
}

/// Bit-by-bit model of the buffer.
struct Model {
    layout: Layout,
    data: Vec<u8>,
}

impl Model {
    fn bit(&self, pos: usize) -> u64 {
        ((self.data[pos / 8] >> (pos % 8)) & 1) as u64
    }

    fn set_bit(&mut self, pos: usize, bit: u64) {
        self.data[pos / 8] &= !(1 << (pos % 8));
        self.data[pos / 8] |= (bit as u8) << (pos % 8);
    }

    fn slot(&self, start_line: usize, index: usize, width: usize) -> usize {
        let per_line = self.layout.line_bits() / width;
        (start_line + index / per_line) * self.layout.line_bits() + (index % per_line) * width
    }

    fn check(&self, start_line: usize, count: usize, width: usize) -> Result<(), CodecError> {
        let max = MAX_BIT_WIDTH.min(self.layout.line_bits());
        if width == 0 || width > max {
            return Err(CodecError::InvalidBitWidth { width, max });
        }
        if count == 0 {
            return Ok(());
        }
        let needed = (self.slot(start_line, count - 1, width) + width).div_ceil(8);
        if needed > self.data.len() {
            return Err(CodecError::OutOfBounds {
                needed,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    fn pack(
        &mut self,
        start_line: usize,
        values: &[u64],
        width: usize,
        overwrite: bool,
    ) -> Result<(), CodecError> {
        let max = MAX_BIT_WIDTH.min(self.layout.line_bits());
        if width == 0 || width > max {
            return Err(CodecError::InvalidBitWidth { width, max });
        }
        if let Some(index) = values
            .iter()
            .position(|&v| width < 64 && v >> width != 0)
        {
            return Err(CodecError::ValueTooWide { index, width });
        }
        self.check(start_line, values.len(), width)?;
        for (index, &value) in values.iter().enumerate() {
            let slot = self.slot(start_line, index, width);
            for j in 0..width {
                let bit = (value >> j) & 1;
                if overwrite {
                    self.set_bit(slot + j, bit);
                } else if bit == 1 {
                    self.set_bit(slot + j, 1);
                }
            }
        }
        Ok(())
    }

    fn unpack(&self, start_line: usize, count: usize, width: usize) -> Result<Vec<u64>, CodecError> {
        self.check(start_line, count, width)?;
        Ok((0..count)
            .map(|index| {
                let slot = self.slot(start_line, index, width);
                (0..width).fold(0, |value, j| value | (self.bit(slot + j) << j))
            })
            .collect())
    }

    fn change_endian(&mut self, len: usize) -> Result<(), CodecError> {
        if len > self.data.len() {
            return Err(CodecError::OutOfBounds {
                needed: len,
                len: self.data.len(),
            });
        }
        let old = self.data.clone();
        let line_bytes = self.layout.line_bytes();
        for i in 0..len {
            let start = i / line_bytes * line_bytes;
            let end = (start + line_bytes).min(len);
            self.data[i] = old[end - 1 - (i - start)];
        }
        Ok(())
    }
}

pub fn harness(data: FuzzCase) {
    let layout = Layout::new(1 + data.line_bytes as usize % 128).unwrap();
    let len = data.len as usize % 4096;
    let mut buffer = CacheLineBuf::new(len, layout);
    let mut model = Model {
        layout,
        data: vec![0; len],
    };
    let mut significant = LineCodec::<Significant>::new(layout);
    let mut overwrite = LineCodec::<Overwrite>::new(layout);

    for command in data.commands {
        match command {
            RandomCommand::Pack {
                start_line,
                width,
                values,
                overwrite: strict,
            } => {
                let start_line = start_line as usize;
                let width = width as usize;
                let expected = model.pack(start_line, &values, width, strict);
                let result = if strict {
                    buffer.pack_with(&mut overwrite, start_line, &values, width)
                } else {
                    buffer.pack_with(&mut significant, start_line, &values, width)
                };
                assert_eq!(result, expected);
            }
            RandomCommand::Unpack {
                start_line,
                width,
                count,
            } => {
                let (start_line, width, count) =
                    (start_line as usize, width as usize, count as usize);
                assert_eq!(
                    significant.unpack::<u64>(buffer.as_slice(), start_line, count, width),
                    model.unpack(start_line, count, width)
                );
            }
            RandomCommand::ChangeEndian(len) => {
                let len = len as usize;
                assert_eq!(buffer.change_endian(len), model.change_endian(len));
            }
            RandomCommand::Reset(len) => {
                let len = len as usize;
                let expected = if len <= model.data.len() {
                    model.data[..len].fill(0);
                    Ok(())
                } else {
                    Err(CodecError::OutOfBounds {
                        needed: len,
                        len: model.data.len(),
                    })
                };
                assert_eq!(buffer.reset(len), expected);
            }
        }
        assert_eq!(buffer.as_slice(), model.data.as_slice());
    }
}
