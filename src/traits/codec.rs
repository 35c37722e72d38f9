/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

use crate::traits::*;

/// The largest bit width of a packed value.
pub const MAX_BIT_WIDTH: usize = 64;

/// The error returned by codec operations.
///
/// Operations returning this error check their arguments before touching
/// the buffer, so a failed call leaves the buffer as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The bit width is zero, or larger than [`MAX_BIT_WIDTH`], than the
    /// value type, or than a cache line.
    InvalidBitWidth { width: usize, max: usize },
    /// The operation would access the byte at position `needed - 1` of a
    /// buffer of length `len`.
    OutOfBounds { needed: usize, len: usize },
    /// The value at position `index` does not fit in `width` bits.
    ValueTooWide { index: usize, width: usize },
    /// Cache lines must contain at least one byte, and their number of bits
    /// must fit in a `usize`.
    InvalidLayout { line_bytes: usize },
    /// A buffer of `lines` cache lines of `line_bytes` bytes is larger than
    /// the address space.
    TooManyLines { lines: usize, line_bytes: usize },
}

impl core::error::Error for CodecError {}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::InvalidBitWidth { width, max } => {
                write!(f, "Invalid bit width {}: must be in [1..{}]", width, max)
            }
            CodecError::OutOfBounds { needed, len } => write!(
                f,
                "Out of bounds: the operation needs {} bytes, but the buffer has length {}",
                needed, len
            ),
            CodecError::ValueTooWide { index, width } => {
                write!(f, "Value at index {} does not fit in {} bits", index, width)
            }
            CodecError::InvalidLayout { line_bytes } => {
                write!(f, "Invalid cache-line size {}", line_bytes)
            }
            CodecError::TooManyLines { lines, line_bytes } => write!(
                f,
                "Cannot allocate {} cache lines of {} bytes",
                lines, line_bytes
            ),
        }
    }
}

/// Reads of fixed-width values from cache lines.
///
/// Values are read least-significant bit first starting from bit zero of
/// line `start_line`; a value that would not fit in what is left of a line
/// starts at bit zero of the next one.
///
/// Please see the documentation of the [`impls`](crate::impls) module for
/// more details.
pub trait LineUnpack {
    /// Return the cache-line geometry used by this codec.
    fn layout(&self) -> Layout;

    /// Fill `out` with values of `width` bits read from `data`.
    fn unpack_into<V: Value>(
        &mut self,
        data: &[u8],
        start_line: usize,
        out: &mut [V],
        width: usize,
    ) -> Result<(), CodecError>;

    /// Read `count` values of `width` bits from `data`.
    #[cfg(feature = "alloc")]
    fn unpack<V: Value>(
        &mut self,
        data: &[u8],
        start_line: usize,
        count: usize,
        width: usize,
    ) -> Result<Vec<V>, CodecError> {
        let mut out = alloc::vec![V::zero(); count];
        self.unpack_into(data, start_line, &mut out, width)?;
        Ok(out)
    }
}

/// Writes of fixed-width values into cache lines.
///
/// The layout of values is the same of [`LineUnpack`]; how bits are stored
/// depends on the [`PackMode`] of the implementation.
pub trait LinePack: LineUnpack {
    type Mode: PackMode;

    /// Store `values` in `data` using `width` bits for each value.
    fn pack<V: Value>(
        &mut self,
        data: &mut [u8],
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), CodecError>;
}
