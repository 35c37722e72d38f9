/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::impls::{BitCursor, or_bits, read_bits, write_bits};
use crate::traits::*;

/// An implementation of [`LineUnpack`] and [`LinePack`] on byte slices.
///
/// The codec has no state besides its [`Layout`]: every call starts at bit
/// zero of the given line. Values are stored least-significant bit first,
/// ignoring byte boundaries but never crossing a line boundary (see
/// [`BitCursor::advance`]).
///
/// The type parameter `M` selects the [`PackMode`]. With the default,
/// [`Significant`], packing ORs into the buffer only the significant bits of
/// each value, so the buffer must be zeroed beforehand, and unpacking reads
/// back exactly what was packed only if the slots were zero. With
/// [`Overwrite`] each slot is fully assigned.
///
/// All arguments are checked before the buffer is accessed: a call that
/// returns an error has not modified the buffer.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let mut buffer = [0_u8; 128];
/// let mut codec = <LineCodec>::default();
///
/// // 64 values of 9 bits: 56 in line 0, 8 in line 1
/// let values: Vec<u16> = (0..64).map(|x| x * 7).collect();
/// codec.pack(&mut buffer, 0, &values, 9)?;
/// assert_eq!(codec.unpack::<u16>(&buffer, 0, 64, 9)?, values);
/// // line 1 starts with the 57th value
/// assert_eq!(codec.unpack::<u16>(&buffer, 1, 1, 9)?, vec![56 * 7]);
///
/// assert!(codec.pack(&mut buffer, 1, &values, 9).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCodec<M: PackMode = Significant> {
    layout: Layout,
    _marker: PhantomData<M>,
}

impl<M: PackMode> LineCodec<M> {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            _marker: PhantomData,
        }
    }

    fn check_width(&self, width: usize, type_bits: usize) -> Result<(), CodecError> {
        let max = MAX_BIT_WIDTH.min(type_bits).min(self.layout.line_bits());
        if width == 0 || width > max {
            return Err(CodecError::InvalidBitWidth { width, max });
        }
        Ok(())
    }

    fn check_span(
        &self,
        len: usize,
        start_line: usize,
        count: usize,
        width: usize,
    ) -> Result<(), CodecError> {
        if count == 0 {
            return Ok(());
        }
        let needed = self
            .layout
            .span(start_line, count, width)?
            .unwrap_or(usize::MAX);
        if needed > len {
            return Err(CodecError::OutOfBounds { needed, len });
        }
        Ok(())
    }
}

impl<M: PackMode> Default for LineCodec<M> {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl<M: PackMode> LineUnpack for LineCodec<M> {
    #[inline(always)]
    fn layout(&self) -> Layout {
        self.layout
    }

    fn unpack_into<V: Value>(
        &mut self,
        data: &[u8],
        start_line: usize,
        out: &mut [V],
        width: usize,
    ) -> Result<(), CodecError> {
        self.check_width(width, V::BITS)?;
        self.check_span(data.len(), start_line, out.len(), width)?;

        let line_bytes = self.layout.line_bytes();
        let mut cursor = BitCursor::new(start_line);
        for value in out.iter_mut() {
            let line = &data[cursor.line() * line_bytes..];
            *value = V::from_word(read_bits(line, cursor.bit(), width));
            cursor.advance(width, &self.layout);
        }
        Ok(())
    }
}

impl<M: PackMode> LinePack for LineCodec<M> {
    type Mode = M;

    fn pack<V: Value>(
        &mut self,
        data: &mut [u8],
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), CodecError> {
        self.check_width(width, MAX_BIT_WIDTH)?;
        if let Some(index) = values.iter().position(|v| v.significant_bits() > width) {
            return Err(CodecError::ValueTooWide { index, width });
        }
        self.check_span(data.len(), start_line, values.len(), width)?;

        let line_bytes = self.layout.line_bytes();
        let mut cursor = BitCursor::new(start_line);
        for &value in values {
            let line = &mut data[cursor.line() * line_bytes..];
            if M::OVERWRITE {
                write_bits(line, cursor.bit(), value.as_word(), width);
            } else {
                // stops at the most significant set bit: higher bits of the
                // slot keep their previous content
                or_bits(line, cursor.bit(), value.as_word());
            }
            cursor.advance(width, &self.layout);
        }
        Ok(())
    }
}

/// Pack `values` of `width` bits from line `start_line` of `data`, using
/// 64-byte lines and ORing significant bits into a zeroed buffer.
pub fn pack<V: Value>(
    data: &mut [u8],
    start_line: usize,
    values: &[V],
    width: usize,
) -> Result<(), CodecError> {
    <LineCodec>::default().pack(data, start_line, values, width)
}

/// Fill `out` with values of `width` bits read from line `start_line` of
/// `data`, using 64-byte lines.
pub fn unpack_into<V: Value>(
    data: &[u8],
    start_line: usize,
    out: &mut [V],
    width: usize,
) -> Result<(), CodecError> {
    <LineCodec>::default().unpack_into(data, start_line, out, width)
}

/// Read `count` values of `width` bits from line `start_line` of `data`,
/// using 64-byte lines.
#[cfg(feature = "alloc")]
pub fn unpack<V: Value>(
    data: &[u8],
    start_line: usize,
    count: usize,
    width: usize,
) -> Result<Vec<V>, CodecError> {
    <LineCodec>::default().unpack(data, start_line, count, width)
}
