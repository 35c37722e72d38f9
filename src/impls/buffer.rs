/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "alloc")]
use crate::impls::LineCodec;
use crate::impls::change_endian;
use crate::traits::*;
use crate::utils::HexDump;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The byte written by [`check_pattern`].
pub const CHECK_PATTERN: u8 = 9;

fn prefix_mut(data: &mut [u8], len: usize) -> Result<&mut [u8], CodecError> {
    let available = data.len();
    data.get_mut(..len).ok_or(CodecError::OutOfBounds {
        needed: len,
        len: available,
    })
}

/// Zero the first `len` bytes of `data`.
pub fn reset(data: &mut [u8], len: usize) -> Result<(), CodecError> {
    prefix_mut(data, len)?.fill(0);
    Ok(())
}

/// Fill the first `len` bytes of `data` with [`CHECK_PATTERN`] and check
/// that they read back correctly.
///
/// Stores and loads are volatile, so they are actually performed even if
/// the compiler could prove their result; this makes the function usable as
/// a sanity test of memory shared with a device. The previous content is
/// lost.
pub fn check_pattern(data: &mut [u8], len: usize) -> Result<bool, CodecError> {
    let data = prefix_mut(data, len)?;
    for byte in data.iter_mut() {
        // SAFETY: the pointer comes from a valid exclusive reference
        unsafe { core::ptr::write_volatile(byte, CHECK_PATTERN) };
    }
    Ok(data
        .iter()
        // SAFETY: the pointer comes from a valid reference
        .all(|byte| unsafe { core::ptr::read_volatile(byte) } == CHECK_PATTERN))
}

/// Print on standard output the first `len` bytes of `data` in hexadecimal,
/// one cache line per text line.
#[cfg(feature = "std")]
pub fn print_hex(data: &[u8], len: usize, layout: &Layout) -> Result<(), CodecError> {
    print!("{}", HexDump::new(data, len, layout)?);
    Ok(())
}

/// An owned, zero-initialized buffer partitioned in cache lines.
///
/// This is the host-side view of a memory region exchanged with an
/// accelerator: accessors are bounds checked, and the codec methods use the
/// buffer's own [`Layout`].
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let mut buffer = CacheLineBuf::with_lines(2, Layout::default())?;
/// buffer.pack(1, &[1_u8, 2, 3], 2)?;
/// assert_eq!(buffer.line(1).unwrap()[0], 0b11_10_01);
/// assert_eq!(buffer.unpack::<u8>(1, 3, 2)?, [1, 2, 3]);
/// assert!(buffer.line(2).is_none());
/// # Ok::<(), CodecError>(())
/// ```
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct CacheLineBuf {
    data: Vec<u8>,
    layout: Layout,
}

#[cfg(feature = "alloc")]
impl CacheLineBuf {
    /// Create a zeroed buffer of `len` bytes.
    pub fn new(len: usize, layout: Layout) -> Self {
        Self {
            data: alloc::vec![0; len],
            layout,
        }
    }

    /// Create a zeroed buffer of `lines` full cache lines.
    pub fn with_lines(lines: usize, layout: Layout) -> Result<Self, CodecError> {
        let line_bytes = layout.line_bytes();
        let len = lines
            .checked_mul(line_bytes)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(CodecError::TooManyLines { lines, line_bytes })?;
        Ok(Self::new(len, layout))
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of cache lines, counting a final partial line.
    pub fn lines(&self) -> usize {
        self.data.len().div_ceil(self.layout.line_bytes())
    }

    /// Return line `line`, which is shorter than a full line if it is the
    /// final, partial one.
    pub fn line(&self, line: usize) -> Option<&[u8]> {
        let range = self.layout.line_range(line)?;
        let end = range.end.min(self.data.len());
        self.data.get(range.start..end).filter(|l| !l.is_empty())
    }

    pub fn line_mut(&mut self, line: usize) -> Option<&mut [u8]> {
        let range = self.layout.line_range(line)?;
        let end = range.end.min(self.data.len());
        self.data.get_mut(range.start..end).filter(|l| !l.is_empty())
    }

    /// Resize the buffer, zero-filling new bytes.
    pub fn resize(&mut self, len: usize) {
        self.data.resize(len, 0);
    }

    /// Zero the first `len` bytes.
    pub fn reset(&mut self, len: usize) -> Result<(), CodecError> {
        reset(&mut self.data, len)
    }

    /// Reverse the bytes of each cache line among the first `len` bytes.
    pub fn change_endian(&mut self, len: usize) -> Result<(), CodecError> {
        change_endian(&mut self.data, len, &self.layout)
    }

    /// See [`check_pattern`].
    pub fn check_pattern(&mut self, len: usize) -> Result<bool, CodecError> {
        check_pattern(&mut self.data, len)
    }

    /// Pack values ORing their significant bits, as [`LineCodec`] does.
    pub fn pack<V: Value>(
        &mut self,
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), CodecError> {
        <LineCodec>::new(self.layout).pack(&mut self.data, start_line, values, width)
    }

    /// Pack values with an arbitrary codec.
    pub fn pack_with<C: LinePack, V: Value>(
        &mut self,
        codec: &mut C,
        start_line: usize,
        values: &[V],
        width: usize,
    ) -> Result<(), CodecError> {
        codec.pack(&mut self.data, start_line, values, width)
    }

    pub fn unpack<V: Value>(
        &self,
        start_line: usize,
        count: usize,
        width: usize,
    ) -> Result<Vec<V>, CodecError> {
        <LineCodec>::new(self.layout).unpack(&self.data, start_line, count, width)
    }

    /// Return a [`Display`](core::fmt::Display) adapter printing the first
    /// `len` bytes in hexadecimal.
    pub fn hex(&self, len: usize) -> Result<HexDump<'_>, CodecError> {
        HexDump::new(&self.data, len, &self.layout)
    }

    /// Decode a bitstream image at the start of the buffer, returning the
    /// number of bytes stored.
    #[cfg(feature = "std")]
    pub fn load_bitstream<R: std::io::Read>(
        &mut self,
        reader: R,
    ) -> Result<usize, crate::impls::LoadError> {
        crate::impls::load_bitstream(reader, &mut self.data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(feature = "alloc")]
impl AsRef<[u8]> for CacheLineBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(feature = "alloc")]
impl AsMut<[u8]> for CacheLineBuf {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
