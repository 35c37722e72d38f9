/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of the codec and of the buffer operations around it.

The functions in [`bits`] read and write runs of bits at arbitrary bit
positions of a byte slice. [`LineCodec`] builds on them to pack and unpack
sequences of fixed-width values into buffers partitioned in cache lines,
moving a [`BitCursor`] so that no value crosses a line boundary.

Buffers usually start their life as a textual bitstream image decoded by
[`load_bitstream`], and the order of the bytes inside each line is then
adjusted by [`change_endian`]. [`CacheLineBuf`] is an owned buffer providing
all these operations with bounds-checked accessors.

[`SoftwareDevice`] is an in-memory [`Device`](crate::traits::Device) that
can be used in place of an accelerator.

*/

pub mod bits;
pub use bits::{or_bits, read_bits, write_bits};

mod cursor;
pub use cursor::BitCursor;

mod line_codec;
pub use line_codec::*;

mod endian;
pub use endian::change_endian;

mod buffer;
pub use buffer::*;

#[cfg(feature = "std")]
mod bitstream;
#[cfg(feature = "std")]
pub use bitstream::*;

#[cfg(feature = "std")]
mod soft_device;
#[cfg(feature = "std")]
pub use soft_device::*;
