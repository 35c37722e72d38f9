#![no_main]

use cl_bitpack::fuzz::line_codec::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzCase| harness(data));
