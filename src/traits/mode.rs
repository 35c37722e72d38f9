/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Inner private trait used to make implementing [`PackMode`]
/// impossible for other structs.
mod private {
    /// This is a [SealedTrait](https://predr.ag/blog/definitive-guide-to-sealed-traits-in-rust/).
    pub trait PackMode {}
}

/// Marker trait for pack-mode selector types.
///
/// Its only implementations are [`Significant`] and [`Overwrite`].
///
/// Unpacking always reads the full declared width of a value. Packing in
/// [`Significant`] mode, instead, ORs into the buffer only the bits up to
/// the most significant set bit of the value, and thus relies on the
/// buffer being zeroed beforehand; in [`Overwrite`] mode all the bits of
/// the slot are assigned, and the previous content of the buffer does not
/// matter.
pub trait PackMode: private::PackMode {
    /// Whether every bit of a slot is assigned.
    const OVERWRITE: bool;
    /// Name used by the debug wrappers.
    const NAME: &'static str;
}

/// Selector type for packing that ORs significant bits only.
///
/// This is what accelerators expecting a pre-zeroed buffer are fed with:
/// packing `5` at width 8 touches three bits, and leaves the five bits above
/// them as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Significant;

/// Selector type for packing that assigns all the bits of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overwrite;

impl private::PackMode for Significant {}
impl private::PackMode for Overwrite {}

impl PackMode for Significant {
    const OVERWRITE: bool = false;
    const NAME: &'static str = "significant";
}

impl PackMode for Overwrite {
    const OVERWRITE: bool = true;
    const NAME: &'static str = "overwrite";
}
