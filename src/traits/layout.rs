/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::ops::Range;

use crate::traits::CodecError;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The cache-line size used by the accelerators we talk to.
pub const DEFAULT_LINE_BYTES: usize = 64;

/// The largest cache-line size, so that the number of bits of a line fits
/// in a `usize`.
pub const MAX_LINE_BYTES: usize = usize::MAX / 8;

/// The cache-line geometry of a buffer.
///
/// A buffer is partitioned into consecutive lines of
/// [`line_bytes`](Layout::line_bytes) bytes; line `i` occupies the byte range
/// `i * line_bytes..(i + 1) * line_bytes`. Packed values never straddle a
/// line: when the next value would not fit in what is left of the current
/// line, it starts at bit zero of the following one.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let layout = Layout::default();
/// assert_eq!(layout.line_bits(), 512);
/// // 512 / 24 = 21 values per line
/// assert_eq!(layout.values_per_line(24)?, 21);
/// assert_eq!(layout.lines_needed(22, 24)?, 2);
/// // the 22nd value is the first one of line 1, and it ends at byte 64 + 3
/// assert_eq!(layout.span(0, 22, 24)?, Some(67));
/// // a value cannot be wider than a line
/// assert!(layout.lines_needed(1, 513).is_err());
/// # Ok::<(), CodecError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLayout"))]
pub struct Layout {
    line_bytes: usize,
}

impl Layout {
    /// Create a layout with lines of `line_bytes` bytes, which must be
    /// nonzero and at most [`MAX_LINE_BYTES`].
    pub fn new(line_bytes: usize) -> Result<Self, CodecError> {
        if line_bytes == 0 || line_bytes > MAX_LINE_BYTES {
            return Err(CodecError::InvalidLayout { line_bytes });
        }
        Ok(Self { line_bytes })
    }

    #[inline(always)]
    pub fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    #[inline(always)]
    pub fn line_bits(&self) -> usize {
        self.line_bytes * 8
    }

    /// Return the byte range of line `line`, or `None` on overflow.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = line.checked_mul(self.line_bytes)?;
        Some(start..start.checked_add(self.line_bytes)?)
    }

    /// Return how many values of `width` bits fit in a line.
    ///
    /// Fails with [`CodecError::InvalidBitWidth`] if `width` is zero or
    /// larger than a line.
    #[inline]
    pub fn values_per_line(&self, width: usize) -> Result<usize, CodecError> {
        let max = self.line_bits();
        if width == 0 || width > max {
            return Err(CodecError::InvalidBitWidth { width, max });
        }
        Ok(max / width)
    }

    /// Return how many lines are consumed by `count` values of `width` bits.
    pub fn lines_needed(&self, count: usize, width: usize) -> Result<usize, CodecError> {
        Ok(count.div_ceil(self.values_per_line(width)?))
    }

    /// Return the end (exclusive) of the byte range touched by `count`
    /// values of `width` bits packed from the start of line `start_line`,
    /// or `None` if it does not fit in a `usize`.
    ///
    /// For `count == 0` this is the first byte of `start_line`.
    pub fn span(
        &self,
        start_line: usize,
        count: usize,
        width: usize,
    ) -> Result<Option<usize>, CodecError> {
        let per_line = self.values_per_line(width)?;
        if count == 0 {
            return Ok(start_line.checked_mul(self.line_bytes));
        }
        let last = count - 1;
        // end_bit <= line_bits, which cannot overflow
        let end_bit = (last % per_line + 1) * width;
        Ok(start_line
            .checked_add(last / per_line)
            .and_then(|line| line.checked_mul(self.line_bytes))
            .and_then(|start| start.checked_add(end_bit.div_ceil(8))))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            line_bytes: DEFAULT_LINE_BYTES,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLayout {
    line_bytes: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLayout> for Layout {
    type Error = CodecError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        Layout::new(raw.line_bytes)
    }
}
