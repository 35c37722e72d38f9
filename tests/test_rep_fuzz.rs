/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "fuzz")]
use std::error::Error;

// Replays the fuzz harnesses on pseudorandom inputs, so that they are
// exercised by `cargo test --features fuzz` without a corpus.
macro_rules! impl_fuzz_repr {
    ($func_name:ident, $fuzz_name:ident) => {
        #[cfg(feature = "fuzz")]
        #[test]
        fn $func_name() -> Result<(), Box<dyn Error>> {
            use arbitrary::Arbitrary;
            use cl_bitpack::fuzz::$fuzz_name::*;
            use rand::prelude::*;
            use rand::rngs::SmallRng;

            let mut rng = SmallRng::seed_from_u64(0);
            for _ in 0..500 {
                let len = rng.random_range(0..4096);
                let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
                let mut unstructured = arbitrary::Unstructured::new(&bytes);
                let data = FuzzCase::arbitrary(&mut unstructured)?;
                harness(data);
            }
            Ok(())
        }
    };
}

impl_fuzz_repr!(test_rep_fuzz_line_codec, line_codec);
impl_fuzz_repr!(test_rep_fuzz_bitstream, bitstream);
