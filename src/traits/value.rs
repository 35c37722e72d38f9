/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::fmt::{Debug, Display};

use num_traits::{AsPrimitive, PrimInt, Unsigned};

/// This is a trait alias for all the properties that we need from the
/// unsigned integers packed into and unpacked from a buffer.
///
/// Values travel through the codec as `u64`, so at most 64 bits of a value
/// are ever stored.
pub trait Value: PrimInt + Unsigned + Debug + Display + 'static {
    /// The number of bits of the type.
    const BITS: usize;

    /// Convert to the codec's word, truncating if necessary.
    fn as_word(self) -> u64;

    /// Convert from the codec's word, truncating if necessary.
    fn from_word(word: u64) -> Self;

    /// Return the number of bits up to and including the most significant
    /// set bit, that is, zero for zero.
    #[inline(always)]
    fn significant_bits(self) -> usize {
        Self::BITS - self.leading_zeros() as usize
    }
}

impl<V> Value for V
where
    V: PrimInt + Unsigned + Debug + Display + AsPrimitive<u64>,
    u64: AsPrimitive<V>,
{
    const BITS: usize = core::mem::size_of::<V>() * 8;

    #[inline(always)]
    fn as_word(self) -> u64 {
        self.as_()
    }

    #[inline(always)]
    fn from_word(word: u64) -> Self {
        word.as_()
    }
}
