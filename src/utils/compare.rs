/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::fmt::{Display, Formatter};

/// The outcome of comparing a buffer with an expected image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    /// The first differing byte.
    Mismatch {
        offset: usize,
        actual: u8,
        expected: u8,
    },
    /// The buffer is a proper prefix of the expected image.
    Truncated { len: usize, expected_len: usize },
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        matches!(self, Comparison::Equal)
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Comparison::Equal => write!(f, "result is correct"),
            Comparison::Mismatch {
                offset,
                actual,
                expected,
            } => write!(
                f,
                "result is NOT correct: byte {} ({:#x}) is {:#04x}, expected {:#04x}",
                offset, offset, actual, expected
            ),
            Comparison::Truncated { len, expected_len } => write!(
                f,
                "result is NOT correct: {} bytes available, {} expected",
                len, expected_len
            ),
        }
    }
}

/// Compare `actual` with the first `expected.len()` bytes it should
/// contain, reporting the first difference.
///
/// Bytes of `actual` beyond the length of `expected` are ignored.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// assert!(compare(&[1, 2, 3, 4], &[1, 2, 3]).is_equal());
/// assert_eq!(
///     compare(&[1, 2, 3], &[1, 5, 3]),
///     Comparison::Mismatch { offset: 1, actual: 2, expected: 5 }
/// );
/// ```
pub fn compare(actual: &[u8], expected: &[u8]) -> Comparison {
    if let Some(offset) = actual.iter().zip(expected).position(|(a, e)| a != e) {
        return Comparison::Mismatch {
            offset,
            actual: actual[offset],
            expected: expected[offset],
        };
    }
    if actual.len() < expected.len() {
        return Comparison::Truncated {
            len: actual.len(),
            expected_len: expected.len(),
        };
    }
    Comparison::Equal
}
