// SPDX-License-Identifier: MIT

//! Elecraft K-series ASCII CAT framing (C4).

mod line;

pub use line::{
    build_command, is_busy, strip_response, IfResponse, BUSY_RESPONSE, IF_RESPONSE_LEN,
    IF_TX_FLAG_POS,
};
