/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits and configuration types.

[`Layout`] describes the cache-line geometry of a buffer, [`PackMode`]
selects how values are stored, [`Value`] collects the properties needed by
the integer types that can be packed, and [`LinePack`]/[`LineUnpack`] are
the interfaces implemented by codecs and by the wrappers in
[`utils`](crate::utils).

[`Device`] is the opaque interface to the accelerator that consumes the
buffers.

*/

mod layout;
pub use layout::*;

mod mode;
pub use mode::*;

mod value;
pub use value::*;

mod codec;
pub use codec::*;

#[cfg(feature = "std")]
mod device;
#[cfg(feature = "std")]
pub use device::*;
