// SPDX-License-Identifier: MIT

//! Canonical operating mode, shared by the CI-V and Elecraft codecs and by
//! the rigctld mode tokens in the daemon crate.

use crate::error::{CatError, CatResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Lsb,
    Usb,
    Cw,
    CwReverse,
    Am,
    Fm,
    FmNarrow,
    Wfm,
    Rtty,
    RttyReverse,
    PktLsb,
    PktUsb,
    PktFm,
}

impl Mode {
    /// The default IF passband in Hz associated with this mode (§4.9).
    pub const fn default_passband_hz(self) -> u32 {
        match self {
            Mode::Lsb | Mode::Usb | Mode::PktLsb | Mode::PktUsb => 2400,
            Mode::Cw | Mode::CwReverse | Mode::Rtty | Mode::RttyReverse => 500,
            Mode::Am => 6000,
            Mode::Fm | Mode::PktFm => 15000,
            Mode::FmNarrow => 10000,
            Mode::Wfm => 150000,
        }
    }

    /// CI-V numeric mode byte (Icom `06` command).
    pub const fn civ_code(self) -> u8 {
        match self {
            Mode::Lsb => 0x00,
            Mode::Usb => 0x01,
            Mode::Am => 0x02,
            Mode::Cw => 0x03,
            Mode::Rtty => 0x04,
            Mode::Fm => 0x05,
            Mode::Wfm => 0x06,
            Mode::CwReverse => 0x07,
            Mode::RttyReverse => 0x08,
            Mode::PktUsb => 0x0C,
            Mode::PktLsb => 0x0D,
            Mode::PktFm => 0x0E,
            Mode::FmNarrow => 0x0F,
        }
    }

    pub fn from_civ_code(code: u8) -> CatResult<Mode> {
        Ok(match code {
            0x00 => Mode::Lsb,
            0x01 => Mode::Usb,
            0x02 => Mode::Am,
            0x03 => Mode::Cw,
            0x04 => Mode::Rtty,
            0x05 => Mode::Fm,
            0x06 => Mode::Wfm,
            0x07 => Mode::CwReverse,
            0x08 => Mode::RttyReverse,
            0x0C => Mode::PktUsb,
            0x0D => Mode::PktLsb,
            0x0E => Mode::PktFm,
            0x0F => Mode::FmNarrow,
            _ => return Err(CatError::InvalidResponse),
        })
    }

    /// Elecraft `MD` numeric code, collapsing the PKT variants onto `DATA`
    /// the way K-series radios do (there is no separate USB/LSB data mode).
    pub const fn elecraft_code(self) -> u8 {
        match self {
            Mode::Lsb => 1,
            Mode::Usb => 2,
            Mode::Cw => 3,
            Mode::Fm | Mode::FmNarrow | Mode::PktFm => 4,
            Mode::Am => 5,
            Mode::PktUsb | Mode::PktLsb => 6,
            Mode::CwReverse => 7,
            Mode::Rtty | Mode::RttyReverse | Mode::Wfm => 9,
        }
    }

    pub fn from_elecraft_code(code: u8) -> CatResult<Mode> {
        Ok(match code {
            1 => Mode::Lsb,
            2 => Mode::Usb,
            3 => Mode::Cw,
            4 => Mode::Fm,
            5 => Mode::Am,
            6 => Mode::PktUsb,
            7 => Mode::CwReverse,
            9 => Mode::Rtty,
            _ => return Err(CatError::InvalidResponse),
        })
    }

    /// Token used on the rigctld wire (Hamlib-compatible names, §4.9).
    pub const fn rigctld_token(self) -> &'static str {
        match self {
            Mode::Lsb => "LSB",
            Mode::Usb => "USB",
            Mode::Cw => "CW",
            Mode::CwReverse => "CWR",
            Mode::Am => "AM",
            Mode::Fm => "FM",
            Mode::FmNarrow => "FMN",
            Mode::Wfm => "WFM",
            Mode::Rtty => "RTTY",
            Mode::RttyReverse => "RTTYR",
            Mode::PktLsb => "PKTLSB",
            Mode::PktUsb => "PKTUSB",
            Mode::PktFm => "PKTFM",
        }
    }

    pub fn from_rigctld_token(token: &str) -> CatResult<Mode> {
        Ok(match token {
            "LSB" => Mode::Lsb,
            "USB" => Mode::Usb,
            "CW" => Mode::Cw,
            "CWR" => Mode::CwReverse,
            "AM" => Mode::Am,
            "FM" => Mode::Fm,
            "FMN" => Mode::FmNarrow,
            "WFM" => Mode::Wfm,
            "RTTY" => Mode::Rtty,
            "RTTYR" => Mode::RttyReverse,
            "PKTLSB" | "DATALSB" => Mode::PktLsb,
            "PKTUSB" | "DATAUSB" => Mode::PktUsb,
            "PKTFM" => Mode::PktFm,
            _ => return Err(CatError::ModeNotSupported),
        })
    }
}
