/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Debug helpers and diagnostics.

[`CountCodec`] keeps track of the number of values and bits packed or
unpacked by a [`LinePack`](crate::traits::LinePack) or
[`LineUnpack`](crate::traits::LineUnpack), optionally printing on standard
error the operations performed.

[`DbgCodec`] prints on standard error all values packed or unpacked.

[`HexDump`] renders a buffer one cache line per text line, and [`compare`]
locates the first difference between a buffer and its expected content.

*/

#[cfg(feature = "std")]
mod count;
#[cfg(feature = "std")]
pub use count::*;

mod dbg;
pub use dbg::*;

mod compare;
pub use compare::*;
