/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::Layout;

/// A position in a cache-line buffer: a line index and a bit offset inside
/// the line.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let layout = Layout::new(2).unwrap();
/// let mut cursor = BitCursor::new(3);
/// cursor.advance(5, &layout);
/// assert_eq!((cursor.line(), cursor.bit()), (3, 5));
/// cursor.advance(5, &layout);
/// assert_eq!((cursor.line(), cursor.bit()), (3, 10));
/// // after a third value only one bit of the line is left
/// cursor.advance(5, &layout);
/// assert_eq!((cursor.line(), cursor.bit()), (4, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitCursor {
    line: usize,
    bit: usize,
}

impl BitCursor {
    /// Create a cursor at bit zero of line `line`.
    pub fn new(line: usize) -> Self {
        Self { line, bit: 0 }
    }

    #[inline(always)]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline(always)]
    pub fn bit(&self) -> usize {
        self.bit
    }

    /// Move past a value of `width` bits.
    ///
    /// If a further value of `width` bits would cross the end of the current
    /// line, the cursor moves to bit zero of the next line, and the rest of
    /// the line is left unused.
    #[inline]
    pub fn advance(&mut self, width: usize, layout: &Layout) {
        self.bit += width;
        if self.bit + width > layout.line_bits() {
            self.line += 1;
            self.bit = 0;
        }
    }
}
