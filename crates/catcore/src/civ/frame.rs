// SPDX-License-Identifier: MIT

//! CI-V frame encoding and parsing.
//!
//! Wire form: `FE FE <to> <from> <cmd1> [cmd2] [data...] FD`. Preamble is
//! two `0xFE` bytes, the terminator is `0xFD`. A short `FB`-terminated
//! response is an ACK; `FA`-terminated is a NAK.

use crate::error::{CatError, CatResult};

/// CI-V frame preamble byte, repeated twice at the start of every frame.
pub const PREAMBLE: u8 = 0xFE;
/// CI-V frame terminator byte.
pub const TERMINATOR: u8 = 0xFD;
/// Default controller (host) address.
pub const CONTROLLER_ADDR: u8 = 0xE0;
/// Short-form ACK terminator (response to a set command).
const ACK: u8 = 0xFB;
/// Short-form NAK terminator (radio rejected the command).
const NAK: u8 = 0xFA;

/// A parsed or to-be-built CI-V frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivFrame {
    pub to: u8,
    pub from: u8,
    pub command: Vec<u8>,
    pub data: Vec<u8>,
    pub is_ack: bool,
    pub is_nak: bool,
}

impl CivFrame {
    /// Build the wire bytes for a command sent to `to`, from `from`
    /// (normally [`CONTROLLER_ADDR`]), with the given command bytes (1-2
    /// bytes) and payload.
    pub fn build(to: u8, from: u8, command: &[u8], data: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(6 + command.len() + data.len());
        frame.push(PREAMBLE);
        frame.push(PREAMBLE);
        frame.push(to);
        frame.push(from);
        frame.extend_from_slice(command);
        frame.extend_from_slice(data);
        frame.push(TERMINATOR);
        frame
    }

    /// Parse a complete frame (preamble through terminator inclusive).
    ///
    /// Accepts both the standard layout (`command` carries the subcommand
    /// byte) and the alternate layout some models use for multi-byte `16`
    /// responses, where the subcommand is echoed in `data` instead. Callers
    /// that know which subcommand they expect should use
    /// [`CivFrame::command_and_subdata`] to normalize the two layouts.
    pub fn parse(bytes: &[u8]) -> CatResult<CivFrame> {
        if bytes.len() < 6 {
            return Err(CatError::InvalidResponse);
        }
        if bytes[0] != PREAMBLE || bytes[1] != PREAMBLE {
            return Err(CatError::InvalidResponse);
        }
        if bytes[bytes.len() - 1] != TERMINATOR {
            return Err(CatError::InvalidResponse);
        }

        let to = bytes[2];
        let from = bytes[3];
        let body = &bytes[4..bytes.len() - 1];

        if body.len() == 1 && body[0] == ACK {
            return Ok(CivFrame {
                to,
                from,
                command: vec![ACK],
                data: Vec::new(),
                is_ack: true,
                is_nak: false,
            });
        }
        if body.len() == 1 && body[0] == NAK {
            return Ok(CivFrame {
                to,
                from,
                command: vec![NAK],
                data: Vec::new(),
                is_ack: false,
                is_nak: true,
            });
        }
        if body.is_empty() {
            return Err(CatError::InvalidResponse);
        }

        // Command is 1 byte, except 0x14/0x15/0x16/0x1A-class commands which
        // conventionally carry a second command byte (the subcommand). We
        // treat byte 1 as part of `command` only when more bytes follow;
        // the alternate-layout accessor below reinterprets as needed.
        let command = vec![body[0]];
        let data = body[1..].to_vec();

        Ok(CivFrame {
            to,
            from,
            command,
            data,
            is_ack: false,
            is_nak: false,
        })
    }

    /// Resolve `(subcommand, rest_of_data)` for a command that may be
    /// reported using either the standard layout (`command = [op, sub]`,
    /// `data = [rest...]`) or the alternate, subcmd-in-data layout some
    /// models use (`command = [op]`, `data = [sub, rest...]`).
    ///
    /// Tries the standard layout first (is there a second command byte
    /// already in `self.command`?); falls back to treating `data[0]` as the
    /// subcommand when `expected_sub` matches it.
    pub fn command_and_subdata(&self, expected_sub: u8) -> Option<(u8, &[u8])> {
        if self.command.len() >= 2 {
            if self.command[1] == expected_sub {
                return Some((self.command[1], &self.data[..]));
            }
            return None;
        }
        if let Some((&sub, rest)) = self.data.split_first() {
            if sub == expected_sub {
                return Some((sub, rest));
            }
        }
        None
    }

    /// Build a frame from the controller to `to` with command bytes
    /// `[op, sub]` followed by `data`, using the standard (non-alternate)
    /// layout. Most outgoing commands use this form.
    pub fn build_with_sub(to: u8, op: u8, sub: u8, data: &[u8]) -> Vec<u8> {
        Self::build(to, CONTROLLER_ADDR, &[op, sub], data)
    }
}

/// Incremental CI-V stream decoder: feed bytes as they arrive off the wire,
/// pull out complete frames as they become available. Used by the session
/// layer to resynchronize after partial reads or stray bytes.
#[derive(Debug, Default)]
pub struct CivStreamDecoder {
    buffer: Vec<u8>,
}

impl CivStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Pull the next complete frame out of the buffer, if any. Discards
    /// bytes preceding a resynchronized preamble.
    pub fn next_frame(&mut self) -> Option<CatResult<CivFrame>> {
        let preamble_pos = self
            .buffer
            .windows(2)
            .position(|w| w[0] == PREAMBLE && w[1] == PREAMBLE)?;
        if preamble_pos > 0 {
            self.buffer.drain(..preamble_pos);
        }
        let term_pos = self.buffer.iter().position(|&b| b == TERMINATOR)?;
        let frame: Vec<u8> = self.buffer.drain(..=term_pos).collect();
        Some(CivFrame::parse(&frame))
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
