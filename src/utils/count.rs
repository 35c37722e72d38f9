/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// Wrapping struct that keeps track of values and bits packed and unpacked.
/// Optionally, prints to standard error information about methods called.
///
/// Failed calls are not counted.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let mut data = [0_u8; 128];
/// let mut codec = CountCodec::<_>::new(<LineCodec>::default());
/// codec.pack(&mut data, 0, &[1_u64; 20], 30)?;
/// assert_eq!(codec.values_packed, 20);
/// assert_eq!(codec.bits_packed, 600);
/// // 17 values per line, so we are in the second one
/// assert_eq!(codec.lines_touched, 2);
/// # Ok::<(), CodecError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CountCodec<C, const PRINT: bool = false> {
    codec: C,
    /// The number of values packed so far.
    pub values_packed: usize,
    /// The number of bits of the slots packed so far.
    pub bits_packed: usize,
    /// The number of values unpacked so far.
    pub values_unpacked: usize,
    /// The number of bits unpacked so far.
    pub bits_unpacked: usize,
    /// The number of cache lines touched so far, counting repeated lines
    /// once per call.
    pub lines_touched: usize,
}

impl<C, const PRINT: bool> CountCodec<C, PRINT> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            values_packed: 0,
            bits_packed: 0,
            values_unpacked: 0,
            bits_unpacked: 0,
            lines_touched: 0,
        }
    }

    pub fn into_inner(self) -> C {
        self.codec
    }
}

impl<C: LineUnpack, const PRINT: bool> LineUnpack for CountCodec<C, PRINT> {
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
        self.codec.unpack_into(data, start_line, out, width)?;
        self.values_unpacked += out.len();
        self.bits_unpacked += out.len() * width;
        // the call succeeded, so the width is valid
        self.lines_touched += self
            .codec
            .layout()
            .lines_needed(out.len(), width)
            .unwrap_or(0);
        if PRINT {
            eprintln!(
                "unpack(line {}, {} values, width {}) (total = {} values, {} bits)",
                start_line,
                out.len(),
                width,
                self.values_unpacked,
                self.bits_unpacked
            );
        }
        Ok(())
    }
}

impl<C: LinePack, const PRINT: bool> LinePack for CountCodec<C, PRINT> {
    type Mode = C::Mode;

    fn pack<V: Value>(
        &mut self,
        data: &mut [u8],
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), CodecError> {
        self.codec.pack(data, start_line, values, width)?;
        self.values_packed += values.len();
        self.bits_packed += values.len() * width;
        self.lines_touched += self
            .codec
            .layout()
            .lines_needed(values.len(), width)
            .unwrap_or(0);
        if PRINT {
            eprintln!(
                "pack(line {}, {} values, width {}) (total = {} values, {} bits)",
                start_line,
                values.len(),
                width,
                self.values_packed,
                self.bits_packed
            );
        }
        Ok(())
    }
}
