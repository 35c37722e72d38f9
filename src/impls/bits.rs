/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Bit-level access to byte slices.

Bits are numbered least-significant first: bit `i` of a slice is bit
`i % 8` of byte `i / 8`, so a value stored at bit position `p` has its
lowest bit in bit `p % 8` of byte `p / 8` and continues towards higher
bits and higher bytes, ignoring byte boundaries.

These functions do not check their arguments beyond what slice indexing
does: they panic if they access a byte outside the slice. The codecs in
[`impls`](crate::impls) validate their calls and then use them.

*/

/// Return a byte with the lowest `bits` bits set.
#[inline(always)]
fn low_mask(bits: usize) -> u8 {
    if bits >= 8 { u8::MAX } else { (1 << bits) - 1 }
}

/// Read `n_bits` bits starting at bit position `bit_pos` and return them in
/// the lowest bits of the result.
///
/// # Panics
///
/// If the bits lie beyond the end of `data`. In test mode, if `n_bits` is
/// greater than 64.
#[inline]
pub fn read_bits(data: &[u8], bit_pos: usize, n_bits: usize) -> u64 {
    debug_assert!(n_bits <= 64);
    let mut value = 0;
    let mut consumed = 0;
    while consumed < n_bits {
        let pos = bit_pos + consumed;
        let discard = pos % 8;
        // bits of this byte belonging to the value
        let use_bits = (8 - discard).min(n_bits - consumed);
        let byte = (data[pos / 8] >> discard) & low_mask(use_bits);
        value |= (byte as u64) << consumed;
        consumed += use_bits;
    }
    value
}

/// OR the significant bits of `value` into `data` starting at bit position
/// `bit_pos`, and return the number of bit positions covered.
///
/// Bits above the most significant set bit of `value` are not touched, so
/// `data` is expected to be zeroed where the value goes: this function never
/// clears a bit. The result is zero for a zero value, and it is rounded up to
/// the end of the last byte touched otherwise.
///
/// # Panics
///
/// If the significant bits lie beyond the end of `data`.
#[inline]
pub fn or_bits(data: &mut [u8], bit_pos: usize, mut value: u64) -> usize {
    let mut pos = bit_pos;
    while value > 0 {
        let discard = pos % 8;
        let use_bits = 8 - discard;
        data[pos / 8] |= ((value & low_mask(use_bits) as u64) << discard) as u8;
        value >>= use_bits;
        pos += use_bits;
    }
    pos - bit_pos
}

/// Assign the lowest `n_bits` bits of `value` to the `n_bits` bits of `data`
/// starting at bit position `bit_pos`, leaving all other bits untouched.
///
/// # Panics
///
/// If the bits lie beyond the end of `data`. In test mode, if `n_bits` is
/// greater than 64.
#[inline]
pub fn write_bits(data: &mut [u8], bit_pos: usize, value: u64, n_bits: usize) {
    debug_assert!(n_bits <= 64);
    let mut written = 0;
    while written < n_bits {
        let pos = bit_pos + written;
        let discard = pos % 8;
        let use_bits = (8 - discard).min(n_bits - written);
        let mask = low_mask(use_bits) << discard;
        let bits = ((value >> written) as u8 & low_mask(use_bits)) << discard;
        let byte = &mut data[pos / 8];
        *byte = (*byte & !mask) | bits;
        written += use_bits;
    }
}
