// SPDX-License-Identifier: MIT

//! Wire-level encoding primitives (C1): packed BCD and ASCII integer fields.

mod bcd;

pub use bcd::{
    ascii_freq_11, ascii_int, ascii_signed_int, decode_frequency, decode_power, encode_frequency,
    encode_power, parse_ascii_freq, parse_ascii_int, parse_ascii_signed_int,
};
