// SPDX-License-Identifier: MIT

//! Default per-operation wire builders and response parsers (C5).
//!
//! A [`ModelTraits`] record plus these free functions stand in for the
//! "inherited" default behavior of a class hierarchy: the trait record picks
//! the branch, the function is the body. Per-model overrides are just
//! different trait field values — there is no second implementation to
//! maintain.

use crate::civ::{CivFrame, CONTROLLER_ADDR};
use crate::codec;
use crate::elecraft;
use crate::error::{CatError, CatResult};

use super::mode::Mode;
use super::traits::{Dialect, ModelTraits, PowerUnits, VfoModel};
use super::vfo::Vfo;

const CIV_CMD_FREQ: u8 = 0x03;
const CIV_CMD_MODE: u8 = 0x04;
const CIV_CMD_SET_FREQ: u8 = 0x05;
const CIV_CMD_SET_MODE: u8 = 0x06;
const CIV_CMD_VFO: u8 = 0x07;
const CIV_CMD_SPLIT: u8 = 0x0F;
const CIV_CMD_LEVEL: u8 = 0x14;
const CIV_SUB_POWER: u8 = 0x0A;
const CIV_CMD_METER: u8 = 0x15;
const CIV_SUB_SMETER: u8 = 0x02;
const CIV_CMD_PTT: u8 = 0x1C;
const CIV_SUB_PTT: u8 = 0x00;
const CIV_CMD_RIT: u8 = 0x21;
const CIV_SUB_RIT_OFFSET: u8 = 0x00;
const CIV_SUB_RIT_ENABLE: u8 = 0x01;
const CIV_SUB_XIT_OFFSET: u8 = 0x02;
const CIV_SUB_XIT_ENABLE: u8 = 0x03;
const CIV_MODE_FILTER_DEFAULT: u8 = 0x01;

fn civ_addr(traits: &ModelTraits) -> CatResult<u8> {
    traits
        .civ_address
        .ok_or_else(|| CatError::UnsupportedRadio("model has no CI-V address".into()))
}

fn vfo_civ_code(vfo: Vfo) -> u8 {
    match vfo {
        Vfo::A | Vfo::Main => 0x00,
        Vfo::B | Vfo::Sub => 0x01,
    }
}

/// Build the wire bytes that select `vfo` on the session, or `None` when the
/// model's [`VfoModel`] never needs an explicit select (see `CurrentOnly`).
pub fn build_set_vfo(traits: &ModelTraits, vfo: Vfo) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            let code = match traits.vfo_model {
                VfoModel::Targetable | VfoModel::CurrentOnly => vfo_civ_code(vfo),
                VfoModel::MainSub => match vfo {
                    Vfo::Main => 0xD0,
                    Vfo::Sub => 0xD1,
                    _ => return Err(CatError::InvalidParameter("expected Main or Sub".into())),
                },
                VfoModel::MainSubDualVfo => match vfo {
                    Vfo::A | Vfo::B => vfo_civ_code(vfo),
                    Vfo::Main => 0xD0,
                    Vfo::Sub => 0xD1,
                },
            };
            Ok(CivFrame::build(to, CONTROLLER_ADDR, &[CIV_CMD_VFO], &[code]))
        }
        Dialect::ElecraftAscii => {
            let n = match vfo {
                Vfo::A | Vfo::Main => "0",
                Vfo::B | Vfo::Sub => "1",
            };
            Ok(elecraft::build_command("FR", n))
        }
    }
}

pub fn build_get_frequency(traits: &ModelTraits, vfo: Vfo) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build(to, CONTROLLER_ADDR, &[CIV_CMD_FREQ], &[]))
        }
        Dialect::ElecraftAscii => {
            let cmd = if vfo == Vfo::B { "FB" } else { "FA" };
            Ok(elecraft::build_command(cmd, ""))
        }
    }
}

pub fn build_set_frequency(traits: &ModelTraits, hz: u64, vfo: Vfo) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            let bcd = codec::encode_frequency(hz);
            Ok(CivFrame::build(to, CONTROLLER_ADDR, &[CIV_CMD_SET_FREQ], &bcd))
        }
        Dialect::ElecraftAscii => {
            let cmd = if vfo == Vfo::B { "FB" } else { "FA" };
            let digits = codec::ascii_freq_11(hz);
            let args = std::str::from_utf8(&digits).expect("ascii digits are valid utf8");
            Ok(elecraft::build_command(cmd, args))
        }
    }
}

/// Parse a CI-V frame (already stripped of preamble/terminator via
/// [`CivFrame::parse`]) carrying a frequency report.
pub fn parse_civ_frequency(frame: &CivFrame) -> CatResult<u64> {
    let bcd: [u8; 5] = frame
        .data
        .clone()
        .try_into()
        .map_err(|_| CatError::InvalidResponse)?;
    codec::decode_frequency(bcd)
}

/// Parse an Elecraft `FA`/`FB` response line.
pub fn parse_elecraft_frequency(cmd: &str, line: &[u8]) -> CatResult<u64> {
    let args = elecraft::strip_response(cmd, line)?;
    codec::parse_ascii_freq(args)
}

pub fn build_get_mode(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build(to, CONTROLLER_ADDR, &[CIV_CMD_MODE], &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("MD", "")),
    }
}

pub fn build_set_mode(traits: &ModelTraits, mode: Mode) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            let mut data = vec![mode.civ_code()];
            if traits.requires_mode_filter {
                data.push(CIV_MODE_FILTER_DEFAULT);
            }
            Ok(CivFrame::build(to, CONTROLLER_ADDR, &[CIV_CMD_SET_MODE], &data))
        }
        Dialect::ElecraftAscii => {
            let args = codec::ascii_int(mode.elecraft_code() as u64, 1);
            Ok(elecraft::build_command("MD", &args))
        }
    }
}

pub fn parse_civ_mode(frame: &CivFrame) -> CatResult<Mode> {
    let code = *frame.data.first().ok_or(CatError::InvalidResponse)?;
    Mode::from_civ_code(code)
}

pub fn parse_elecraft_mode(line: &[u8]) -> CatResult<Mode> {
    let args = elecraft::strip_response("MD", line)?;
    let code = codec::parse_ascii_int(args)? as u8;
    Mode::from_elecraft_code(code)
}

/// Convert a caller-supplied 0..100 displayed power percentage (or, for
/// `direct_watts_0_15` models, a direct watt value 0..15) into the 0..255
/// BCD scale shared by the CI-V `14 0A` command.
fn power_to_scale(traits: &ModelTraits, max_power_watts: u32, value: u32) -> u16 {
    match traits.power_units {
        PowerUnits::Percentage => ((value.min(100) as u32 * 255) / 100) as u16,
        PowerUnits::DirectWatts0To15 => {
            let max = max_power_watts.max(1);
            ((value.min(max) as u32 * 255) / max) as u16
        }
    }
}

fn scale_to_power(traits: &ModelTraits, max_power_watts: u32, scale: u16) -> u32 {
    match traits.power_units {
        PowerUnits::Percentage => (scale as u32 * 100) / 255,
        PowerUnits::DirectWatts0To15 => (scale as u32 * max_power_watts.max(1)) / 255,
    }
}

pub fn build_set_power(traits: &ModelTraits, max_power_watts: u32, value: u32) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            let scale = power_to_scale(traits, max_power_watts, value);
            let bcd = codec::encode_power(scale);
            Ok(CivFrame::build_with_sub(to, CIV_CMD_LEVEL, CIV_SUB_POWER, &bcd))
        }
        Dialect::ElecraftAscii => {
            let args = codec::ascii_int(value as u64, 3);
            Ok(elecraft::build_command("PC", &args))
        }
    }
}

pub fn build_get_power(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_LEVEL, CIV_SUB_POWER, &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("PC", "")),
    }
}

pub fn parse_civ_power(traits: &ModelTraits, max_power_watts: u32, frame: &CivFrame) -> CatResult<u32> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_POWER)
        .ok_or(CatError::InvalidResponse)?;
    let bcd: [u8; 2] = rest.try_into().map_err(|_| CatError::InvalidResponse)?;
    let scale = codec::decode_power(bcd)?;
    Ok(scale_to_power(traits, max_power_watts, scale))
}

pub fn parse_elecraft_power(line: &[u8]) -> CatResult<u32> {
    let args = elecraft::strip_response("PC", line)?;
    Ok(codec::parse_ascii_int(args)? as u32)
}

pub fn build_set_ptt(traits: &ModelTraits, mode: Option<Mode>, on: bool) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(
                to,
                CIV_CMD_PTT,
                CIV_SUB_PTT,
                &[if on { 0x01 } else { 0x00 }],
            ))
        }
        Dialect::ElecraftAscii => {
            if matches!(traits.model, super::traits::ModelId::ElecraftK2) && on {
                let allowed = matches!(
                    mode,
                    Some(Mode::Lsb) | Some(Mode::Usb) | Some(Mode::Rtty) | Some(Mode::RttyReverse)
                );
                if !allowed {
                    return Err(CatError::TransmitNotAllowed);
                }
            }
            let cmd = if on { b"TX;".to_vec() } else { b"RX;".to_vec() };
            Ok(cmd)
        }
    }
}

pub fn build_get_ptt(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_PTT, CIV_SUB_PTT, &[]))
        }
        Dialect::ElecraftAscii => {
            if traits.model == super::traits::ModelId::ElecraftK2 {
                Ok(elecraft::build_command("TQ", ""))
            } else {
                Ok(elecraft::build_command("IF", ""))
            }
        }
    }
}

pub fn parse_civ_ptt(frame: &CivFrame) -> CatResult<bool> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_PTT)
        .ok_or(CatError::InvalidResponse)?;
    Ok(rest.first() == Some(&0x01))
}

pub fn parse_elecraft_ptt(traits: &ModelTraits, line: &[u8]) -> CatResult<bool> {
    if traits.model == super::traits::ModelId::ElecraftK2 {
        let args = elecraft::strip_response("TQ", line)?;
        Ok(args == b"1")
    } else {
        Ok(elecraft::IfResponse::parse(line)?.is_transmitting)
    }
}

pub fn build_set_split(traits: &ModelTraits, on: bool) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build(
                to,
                CONTROLLER_ADDR,
                &[CIV_CMD_SPLIT],
                &[if on { 0x01 } else { 0x00 }],
            ))
        }
        Dialect::ElecraftAscii => {
            let n = if on { "1" } else { "0" };
            Ok(elecraft::build_command("FT", n))
        }
    }
}

pub fn build_get_split(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build(to, CONTROLLER_ADDR, &[CIV_CMD_SPLIT], &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("IF", "")),
    }
}

pub fn parse_civ_split(frame: &CivFrame) -> CatResult<bool> {
    Ok(frame.data.first() == Some(&0x01))
}

pub fn parse_elecraft_split(line: &[u8]) -> CatResult<bool> {
    Ok(elecraft::IfResponse::parse(line)?.split_on)
}

pub fn build_signal_strength(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_METER, CIV_SUB_SMETER, &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("SM", "")),
    }
}

pub fn parse_civ_signal_strength(frame: &CivFrame) -> CatResult<u8> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_SMETER)
        .ok_or(CatError::InvalidResponse)?;
    rest.first().copied().ok_or(CatError::InvalidResponse)
}

pub fn parse_elecraft_signal_strength(line: &[u8]) -> CatResult<u8> {
    let args = elecraft::strip_response("SM", line)?;
    Ok(codec::parse_ascii_int(args)?.min(255) as u8)
}

pub fn build_set_rit_offset(traits: &ModelTraits, hz: i32) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            let sign = if hz < 0 { 0x01 } else { 0x00 };
            let bcd = codec::encode_power(hz.unsigned_abs().min(9999) as u16);
            Ok(CivFrame::build_with_sub(
                to,
                CIV_CMD_RIT,
                CIV_SUB_RIT_OFFSET,
                &[&[sign][..], &bcd[..]].concat(),
            ))
        }
        Dialect::ElecraftAscii => {
            Ok(elecraft::build_command("RO", &codec::ascii_signed_int(hz, 4)))
        }
    }
}

pub fn build_set_rit_enable(traits: &ModelTraits, on: bool) -> CatResult<Vec<u8>> {
    build_toggle(traits, CIV_CMD_RIT, CIV_SUB_RIT_ENABLE, "RT", on)
}

pub fn build_set_xit_offset(traits: &ModelTraits, hz: i32) -> CatResult<Vec<u8>> {
    if !traits.supports_xit {
        return Err(CatError::UnsupportedOperation("XIT".into()));
    }
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            let sign = if hz < 0 { 0x01 } else { 0x00 };
            let bcd = codec::encode_power(hz.unsigned_abs().min(9999) as u16);
            Ok(CivFrame::build_with_sub(
                to,
                CIV_CMD_RIT,
                CIV_SUB_XIT_OFFSET,
                &[&[sign][..], &bcd[..]].concat(),
            ))
        }
        Dialect::ElecraftAscii => {
            Ok(elecraft::build_command("XO", &codec::ascii_signed_int(hz, 4)))
        }
    }
}

pub fn build_set_xit_enable(traits: &ModelTraits, on: bool) -> CatResult<Vec<u8>> {
    if !traits.supports_xit {
        return Err(CatError::UnsupportedOperation("XIT".into()));
    }
    build_toggle(traits, CIV_CMD_RIT, CIV_SUB_XIT_ENABLE, "XT", on)
}

fn build_toggle(
    traits: &ModelTraits,
    civ_cmd: u8,
    civ_sub: u8,
    elecraft_cmd: &str,
    on: bool,
) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(
                to,
                civ_cmd,
                civ_sub,
                &[if on { 0x01 } else { 0x00 }],
            ))
        }
        Dialect::ElecraftAscii => {
            let n = if on { "1" } else { "0" };
            Ok(elecraft::build_command(elecraft_cmd, n))
        }
    }
}

pub fn parse_civ_rit_enable(frame: &CivFrame) -> CatResult<bool> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_RIT_ENABLE)
        .ok_or(CatError::InvalidResponse)?;
    Ok(rest.first() == Some(&0x01))
}

pub fn parse_civ_rit_offset(frame: &CivFrame) -> CatResult<i32> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_RIT_OFFSET)
        .ok_or(CatError::InvalidResponse)?;
    let sign = *rest.first().ok_or(CatError::InvalidResponse)?;
    let bcd: [u8; 2] = rest
        .get(1..3)
        .ok_or(CatError::InvalidResponse)?
        .try_into()
        .map_err(|_| CatError::InvalidResponse)?;
    let magnitude = codec::decode_power(bcd)? as i32;
    Ok(if sign == 0x01 { -magnitude } else { magnitude })
}

pub fn parse_elecraft_rit_offset(line: &[u8]) -> CatResult<i32> {
    let args = elecraft::strip_response("RO", line)?;
    codec::parse_ascii_signed_int(args)
}

pub fn build_get_rit_offset(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_RIT, CIV_SUB_RIT_OFFSET, &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("RO", "")),
    }
}

pub fn build_get_rit_enable(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_RIT, CIV_SUB_RIT_ENABLE, &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("RT", "")),
    }
}

pub fn parse_elecraft_rit_enable(line: &[u8]) -> CatResult<bool> {
    let args = elecraft::strip_response("RT", line)?;
    Ok(args == b"1")
}

pub fn build_get_xit_offset(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    if !traits.supports_xit {
        return Err(CatError::UnsupportedOperation("XIT".into()));
    }
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_RIT, CIV_SUB_XIT_OFFSET, &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("XO", "")),
    }
}

pub fn build_get_xit_enable(traits: &ModelTraits) -> CatResult<Vec<u8>> {
    if !traits.supports_xit {
        return Err(CatError::UnsupportedOperation("XIT".into()));
    }
    match traits.dialect {
        Dialect::CivIcom => {
            let to = civ_addr(traits)?;
            Ok(CivFrame::build_with_sub(to, CIV_CMD_RIT, CIV_SUB_XIT_ENABLE, &[]))
        }
        Dialect::ElecraftAscii => Ok(elecraft::build_command("XT", "")),
    }
}

pub fn parse_civ_xit_enable(frame: &CivFrame) -> CatResult<bool> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_XIT_ENABLE)
        .ok_or(CatError::InvalidResponse)?;
    Ok(rest.first() == Some(&0x01))
}

pub fn parse_civ_xit_offset(frame: &CivFrame) -> CatResult<i32> {
    let (_, rest) = frame
        .command_and_subdata(CIV_SUB_XIT_OFFSET)
        .ok_or(CatError::InvalidResponse)?;
    let sign = *rest.first().ok_or(CatError::InvalidResponse)?;
    let bcd: [u8; 2] = rest
        .get(1..3)
        .ok_or(CatError::InvalidResponse)?
        .try_into()
        .map_err(|_| CatError::InvalidResponse)?;
    let magnitude = codec::decode_power(bcd)? as i32;
    Ok(if sign == 0x01 { -magnitude } else { magnitude })
}

pub fn parse_elecraft_xit_offset(line: &[u8]) -> CatResult<i32> {
    let args = elecraft::strip_response("XO", line)?;
    codec::parse_ascii_signed_int(args)
}

pub fn parse_elecraft_xit_enable(line: &[u8]) -> CatResult<bool> {
    let args = elecraft::strip_response("XT", line)?;
    Ok(args == b"1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::traits_for;
    use crate::model::traits::ModelId;

    #[test]
    fn ic7100_set_frequency_matches_s1_golden_vector() {
        let traits = traits_for(ModelId::Ic7100);
        let frame = build_set_frequency(&traits, 14_230_000, Vfo::A).unwrap();
        assert_eq!(
            frame,
            vec![0xFE, 0xFE, 0x88, 0xE0, 0x05, 0x00, 0x00, 0x23, 0x14, 0x00, 0xFD]
        );
    }

    #[test]
    fn ic7100_set_mode_omits_filter_byte() {
        let traits = traits_for(ModelId::Ic7100);
        let frame = build_set_mode(&traits, Mode::Usb).unwrap();
        assert_eq!(frame, vec![0xFE, 0xFE, 0x88, 0xE0, 0x06, 0x01, 0xFD]);
    }

    #[test]
    fn ic7600_set_mode_includes_filter_byte() {
        let traits = traits_for(ModelId::Ic7600);
        let frame = build_set_mode(&traits, Mode::Usb).unwrap();
        assert_eq!(
            frame,
            vec![0xFE, 0xFE, 0x7A, 0xE0, 0x06, 0x01, 0x01, 0xFD]
        );
    }

    #[test]
    fn k2_build_power_direct_watts() {
        let traits = traits_for(ModelId::ElecraftK2);
        let cmd = build_set_power(&traits, 15, 5).unwrap();
        assert_eq!(cmd, b"PC005;");
    }

    #[test]
    fn k2_ptt_rejects_cw_mode() {
        let traits = traits_for(ModelId::ElecraftK2);
        let err = build_set_ptt(&traits, Some(Mode::Cw), true).unwrap_err();
        assert_eq!(err, CatError::TransmitNotAllowed);
    }

    #[test]
    fn k2_ptt_allows_ssb() {
        let traits = traits_for(ModelId::ElecraftK2);
        let cmd = build_set_ptt(&traits, Some(Mode::Usb), true).unwrap();
        assert_eq!(cmd, b"TX;");
    }

    #[test]
    fn k2_get_ptt_uses_tq() {
        let traits = traits_for(ModelId::ElecraftK2);
        let cmd = build_get_ptt(&traits).unwrap();
        assert_eq!(cmd, b"TQ;");
        assert!(parse_elecraft_ptt(&traits, b"TQ1;").unwrap());
        assert!(!parse_elecraft_ptt(&traits, b"TQ0;").unwrap());
    }

    #[test]
    fn ic9100_mainsub_vfo_select() {
        let traits = traits_for(ModelId::Ic9100);
        let frame = build_set_vfo(&traits, Vfo::Sub).unwrap();
        assert_eq!(frame, vec![0xFE, 0xFE, 0x7C, 0xE0, 0x07, 0xD1, 0xFD]);
    }

    #[test]
    fn ic7600_alternate_layout_power_parse() {
        // Alternate layout: command=[0x14], data=[0x0A, bcd...]
        let traits = traits_for(ModelId::Ic7600);
        let bcd = codec::encode_power(128);
        let frame = CivFrame {
            to: CONTROLLER_ADDR,
            from: 0x7A,
            command: vec![CIV_CMD_LEVEL],
            data: [&[CIV_SUB_POWER][..], &bcd[..]].concat(),
            is_ack: false,
            is_nak: false,
        };
        let pct = parse_civ_power(&traits, 100, &frame).unwrap();
        assert_eq!(pct, (128 * 100) / 255);
    }

    #[test]
    fn xit_rejected_when_unsupported() {
        let mut traits = traits_for(ModelId::Ic706);
        traits.supports_xit = false;
        assert_eq!(
            build_set_xit_enable(&traits, true).unwrap_err(),
            CatError::UnsupportedOperation("XIT".into())
        );
    }

    #[test]
    fn rit_offset_roundtrip_civ() {
        let traits = traits_for(ModelId::Ic7100);
        let frame_bytes = build_set_rit_offset(&traits, -150).unwrap();
        let frame = CivFrame::parse(&frame_bytes).unwrap();
        assert_eq!(parse_civ_rit_offset(&frame).unwrap(), -150);
    }

    #[test]
    fn xit_offset_roundtrip_civ() {
        let traits = traits_for(ModelId::Ic7100);
        let frame_bytes = build_set_xit_offset(&traits, 75).unwrap();
        let frame = CivFrame::parse(&frame_bytes).unwrap();
        assert_eq!(parse_civ_xit_offset(&frame).unwrap(), 75);
    }

    #[test]
    fn xit_enable_roundtrip_civ() {
        let traits = traits_for(ModelId::Ic7100);
        let frame_bytes = build_set_xit_enable(&traits, true).unwrap();
        let frame = CivFrame::parse(&frame_bytes).unwrap();
        assert!(parse_civ_xit_enable(&frame).unwrap());
    }

    #[test]
    fn rit_enable_roundtrip_elecraft() {
        assert!(parse_elecraft_rit_enable(b"RT1;").unwrap());
        assert!(!parse_elecraft_rit_enable(b"RT0;").unwrap());
    }

    #[test]
    fn xit_offset_roundtrip_elecraft() {
        let traits = traits_for(ModelId::ElecraftK3);
        let frame_bytes = build_set_xit_offset(&traits, -200).unwrap();
        assert_eq!(parse_elecraft_xit_offset(&frame_bytes).unwrap(), -200);
    }

    #[test]
    fn xit_query_rejected_when_unsupported() {
        let mut traits = traits_for(ModelId::Ic706);
        traits.supports_xit = false;
        assert_eq!(
            build_get_xit_offset(&traits).unwrap_err(),
            CatError::UnsupportedOperation("XIT".into())
        );
        assert_eq!(
            build_get_xit_enable(&traits).unwrap_err(),
            CatError::UnsupportedOperation("XIT".into())
        );
    }
}
