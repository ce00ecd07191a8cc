// SPDX-License-Identifier: MIT

//! CI-V (Icom) binary CAT framing (C3).

mod frame;

pub use frame::{CivFrame, CivStreamDecoder, CONTROLLER_ADDR, PREAMBLE, TERMINATOR};
