/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::fmt::{Display, Formatter};

use crate::traits::*;

/// Hexadecimal rendering of a buffer, two lowercase digits per byte and one
/// cache line per text line.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let data = [0x00, 0x1f, 0xa0, 0xff, 0x42];
/// let dump = HexDump::new(&data, 5, &Layout::new(2).unwrap())?;
/// assert_eq!(dump.to_string(), "001f\na0ff\n42");
/// # Ok::<(), CodecError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a> {
    data: &'a [u8],
    line_bytes: usize,
}

impl<'a> HexDump<'a> {
    /// Dump the first `len` bytes of `data`.
    pub fn new(data: &'a [u8], len: usize, layout: &Layout) -> Result<Self, CodecError> {
        let data = data.get(..len).ok_or(CodecError::OutOfBounds {
            needed: len,
            len: data.len(),
        })?;
        Ok(Self {
            data,
            line_bytes: layout.line_bytes(),
        })
    }
}

impl Display for HexDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for (i, byte) in self.data.iter().enumerate() {
            write!(f, "{:02x}", byte)?;
            if (i + 1) % self.line_bytes == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// A wrapper over a codec that prints on standard error all the values
/// packed and unpacked.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct DbgCodec<C> {
    codec: C,
}

#[cfg(feature = "std")]
impl<C> DbgCodec<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn into_inner(self) -> C {
        self.codec
    }
}

#[cfg(feature = "std")]
impl<C: LineUnpack> LineUnpack for DbgCodec<C> {
    fn layout(&self) -> Layout {
        self.codec.layout()
    }

    fn unpack_into<V: Value>(
        &mut self,
        data: &[u8],
        start_line: usize,
        out: &mut [V],
        width: usize,
    ) -> Result<(), CodecError> {
        if let Err(e) = self.codec.unpack_into(data, start_line, out, width) {
            eprintln!("unpack(line {}, width {}): {}", start_line, width, e);
            return Err(e);
        }
        eprintln!("unpack(line {}, width {})", start_line, width);
        for value in out.iter() {
            eprintln!("{{u{}:{}}}", width, value);
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<C: LinePack> LinePack for DbgCodec<C> {
    type Mode = C::Mode;

    fn pack<V: Value>(
        &mut self,
        data: &mut [u8],
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), CodecError> {
        eprintln!(
            "pack<{}>(line {}, width {})",
            <C::Mode as PackMode>::NAME,
            start_line,
            width
        );
        for value in values {
            eprintln!("{{p{}:{}}}", width, value);
        }
        self.codec
            .pack(data, start_line, values, width)
            .inspect_err(|e| eprintln!("pack failed: {}", e))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::impls::LineCodec;

    #[test]
    fn test_hex_line_breaks() {
        let data: Vec<u8> = (0..130).map(|x| x as u8).collect();
        let dump = HexDump::new(&data, 130, &Layout::default()).unwrap().to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 128);
        assert!(lines[1].starts_with("404142"));
        assert_eq!(lines[2], "8081");
        assert!(HexDump::new(&data, 131, &Layout::default()).is_err());
    }

    #[test]
    fn test_dbg_is_transparent() {
        let mut data = [0_u8; 64];
        let mut codec = DbgCodec::new(<LineCodec>::default());
        codec.pack(&mut data, 0, &[3_u8, 1, 2], 2).unwrap();
        assert_eq!(data[0], 0b10_01_11);
        assert_eq!(codec.unpack::<u8>(&data, 0, 3, 2).unwrap(), [3, 1, 2]);
        assert!(codec.unpack::<u8>(&data, 1, 1, 2).is_err());
    }
}
