// SPDX-License-Identifier: MIT

//! Elecraft K-series ASCII line codec.
//!
//! Wire form: `<CMD><args>;`. Set commands do not echo; query commands
//! return exactly one response frame mirroring the command prefix. The
//! radio replies `?;` when busy.

use crate::error::{CatError, CatResult};

/// Fixed length of an `IF` status response, terminator included.
pub const IF_RESPONSE_LEN: usize = 38;
/// Zero-based offset of the TX/RX flag within an `IF` response.
pub const IF_TX_FLAG_POS: usize = 28;
/// Busy response from the radio.
pub const BUSY_RESPONSE: &str = "?;";

/// Build a semicolon-terminated command: `<cmd><args>;`.
pub fn build_command(cmd: &str, args: &str) -> Vec<u8> {
    let mut s = String::with_capacity(cmd.len() + args.len() + 1);
    s.push_str(cmd);
    s.push_str(args);
    s.push(';');
    s.into_bytes()
}

/// Strip the leading 2-char command prefix and trailing `;` from a response
/// line, returning the argument bytes.
pub fn strip_response<'a>(cmd: &str, response: &'a [u8]) -> CatResult<&'a [u8]> {
    let response = response
        .strip_suffix(b";")
        .ok_or(CatError::InvalidResponse)?;
    response
        .strip_prefix(cmd.as_bytes())
        .ok_or(CatError::InvalidResponse)
}

pub fn is_busy(response: &[u8]) -> bool {
    response == BUSY_RESPONSE.as_bytes()
}

/// Parsed fields of an Elecraft `IF` status response (38 chars).
///
/// Layout (1-indexed in the K-series manuals, reproduced here 0-indexed):
/// `IF` (2) + freq (11) + 4 reserved + rit/xit offset (5) + rit on (1) +
/// xit on (1) + bank (2) + rx/tx (1) + mode (1) + vfo (1) + scan (1) +
/// split (1) + tone/ctcss etc (trailing) + `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfResponse {
    pub frequency_hz: u64,
    pub rit_xit_offset_hz: i32,
    pub rit_on: bool,
    pub xit_on: bool,
    pub is_transmitting: bool,
    pub mode_code: u8,
    pub vfo_code: u8,
    pub split_on: bool,
}

impl IfResponse {
    /// Parse a full `IF...;` response line.
    pub fn parse(line: &[u8]) -> CatResult<IfResponse> {
        if line.len() != IF_RESPONSE_LEN || &line[0..2] != b"IF" || line[line.len() - 1] != b';' {
            return Err(CatError::InvalidResponse);
        }
        let frequency_hz = crate::codec::parse_ascii_freq(&line[2..13])?;
        let rit_xit_offset_hz = crate::codec::parse_ascii_signed_int(&line[17..22])?;
        let rit_on = line[22] == b'1';
        let xit_on = line[23] == b'1';
        let is_transmitting = line[IF_TX_FLAG_POS] == b'1';
        let mode_code = line[29] - b'0';
        let vfo_code = line[30] - b'0';
        let split_on = line[32] == b'1';

        Ok(IfResponse {
            frequency_hz,
            rit_xit_offset_hz,
            rit_on,
            xit_on,
            is_transmitting,
            mode_code,
            vfo_code,
            split_on,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_power_command_k2() {
        let cmd = build_command("PC", "005");
        assert_eq!(cmd, b"PC005;");
    }

    #[test]
    fn build_power_query() {
        let cmd = build_command("PC", "");
        assert_eq!(cmd, b"PC;");
    }

    #[test]
    fn strip_response_extracts_args() {
        let args = strip_response("PC", b"PC005;").unwrap();
        assert_eq!(args, b"005");
    }

    #[test]
    fn busy_detection() {
        assert!(is_busy(b"?;"));
        assert!(!is_busy(b"PC005;"));
    }

    #[test]
    fn if_response_parses_tx_flag() {
        // Build a synthetic 38-char IF response with TX bit set at offset 28.
        let mut line = vec![b' '; IF_RESPONSE_LEN];
        line[0] = b'I';
        line[1] = b'F';
        let freq = crate::codec::ascii_freq_11(14_250_000);
        line[2..13].copy_from_slice(&freq);
        for b in line[13..17].iter_mut() {
            *b = b'0';
        }
        let offset = crate::codec::ascii_signed_int(0, 4);
        line[17..22].copy_from_slice(offset.as_bytes());
        line[22] = b'0'; // rit off
        line[23] = b'0'; // xit off
        for b in line[24..28].iter_mut() {
            *b = b'0';
        }
        line[28] = b'1'; // transmitting
        line[29] = b'2'; // USB
        line[30] = b'0'; // VFO A
        line[31] = b'0';
        line[32] = b'0'; // split off
        for b in line[33..37].iter_mut() {
            *b = b'0';
        }
        line[37] = b';';

        let parsed = IfResponse::parse(&line).unwrap();
        assert_eq!(parsed.frequency_hz, 14_250_000);
        assert!(parsed.is_transmitting);
        assert_eq!(parsed.mode_code, 2);
        assert!(!parsed.split_on);
    }

    #[test]
    fn if_response_rejects_wrong_length() {
        assert_eq!(
            IfResponse::parse(b"IF;"),
            Err(CatError::InvalidResponse)
        );
    }
}
