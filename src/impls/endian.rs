/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::{CodecError, Layout};

/// Reverse in place the order of the bytes of each cache line among the
/// first `len` bytes of `data`.
///
/// Bitstream images list the bytes of a line starting from the most
/// significant one, whereas the accelerator reads lines as little-endian
/// words: this function converts between the two orders, and applying it
/// twice gives back the original content.
///
/// If `len` is not a multiple of the line size, the last partial chunk is
/// reversed within its own length; bytes after `len` are never touched.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let mut data = [0, 1, 2, 3, 4, 5, 6];
/// change_endian(&mut data, 7, &Layout::new(3).unwrap())?;
/// assert_eq!(data, [2, 1, 0, 5, 4, 3, 6]);
/// # Ok::<(), CodecError>(())
/// ```
pub fn change_endian(data: &mut [u8], len: usize, layout: &Layout) -> Result<(), CodecError> {
    let available = data.len();
    let data = data.get_mut(..len).ok_or(CodecError::OutOfBounds {
        needed: len,
        len: available,
    })?;
    for line in data.chunks_mut(layout.line_bytes()) {
        line.reverse();
    }
    Ok(())
}
