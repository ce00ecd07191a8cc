// SPDX-License-Identifier: MIT

//! Response formatting for the two rigctld protocol modes (§4.9).

use catcore::capabilities::Capabilities;
use catcore::model::{ModelTraits, Vfo};

/// `response_mode` session state: switched by `set_ext_response`/
/// `set_powerstat`, initially `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Default,
    Extended,
}

/// Render one command's outcome for the wire, given the active response
/// mode. `long_name` is the long-command spelling used by extended mode's
/// echo, regardless of which syntactic form the client actually sent.
pub fn render(mode: ResponseMode, long_name: &str, body: &[String], code: i32) -> String {
    match mode {
        ResponseMode::Default => {
            // A "get" with data prints just the values; a "set" (or any
            // failure) has no data to print, so it falls back to "RPRT N" —
            // real rigctld's convention, not just a bare code line.
            if code != 0 || body.is_empty() {
                return format!("RPRT {code}\n");
            }
            let mut out = String::new();
            for line in body {
                out.push_str(line);
                out.push('\n');
            }
            out
        }
        ResponseMode::Extended => {
            let mut out = String::new();
            out.push_str(long_name);
            out.push_str(": ");
            if body.len() == 1 {
                out.push_str(&body[0]);
                out.push('\n');
            } else {
                out.push('\n');
                for line in body {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push_str(&format!("RPRT {code}\n"));
            out
        }
    }
}

/// `\dump_caps`: a multi-line capability report.
pub fn dump_caps(traits: &ModelTraits, caps: &Capabilities) -> Vec<String> {
    vec![
        format!("Model name:\t{:?}", traits.model),
        format!("Mfg name:\t{}", if traits.civ_address.is_some() { "Icom" } else { "Elecraft" }),
        "Backend version:\t0.1.0".to_string(),
        format!("Min freq:\t{}", caps.min_frequency_hz),
        format!("Max freq:\t{}", caps.max_frequency_hz),
        format!("Max power:\t{}", caps.max_power_watts),
        format!("Split:\t{}", if caps.supports_split { "Y" } else { "N" }),
        format!("Memory channels:\t{}", caps.memory_channel_count),
        format!(
            "Modes:\t{}",
            caps.supported_modes
                .iter()
                .map(|m| m.rigctld_token())
                .collect::<Vec<_>>()
                .join(" ")
        ),
        format!(
            "VFOs:\t{}",
            caps.legal_vfos
                .iter()
                .map(vfo_token)
                .collect::<Vec<_>>()
                .join(" ")
        ),
    ]
}

/// `\dump_state`: the Hamlib "state" dump, opening with protocol version 0.
pub fn dump_state(traits: &ModelTraits, caps: &Capabilities) -> Vec<String> {
    vec![
        "0".into(), // protocol version
        "1".into(), // ITU region
        caps.min_frequency_hz.to_string(),
        caps.max_frequency_hz.to_string(),
        caps.supported_modes
            .iter()
            .map(|m| m.rigctld_token())
            .collect::<Vec<_>>()
            .join(" "),
        "0".into(), // end of frequency range marker
        traits.default_baud.to_string(),
        caps.legal_vfos
            .iter()
            .map(vfo_token)
            .collect::<Vec<_>>()
            .join(" "),
    ]
}

pub fn vfo_token(vfo: &Vfo) -> &'static str {
    match vfo {
        Vfo::A => "VFOA",
        Vfo::B => "VFOB",
        Vfo::Main => "Main",
        Vfo::Sub => "Sub",
    }
}

pub fn parse_vfo_token(token: &str) -> Option<Vfo> {
    match token {
        "VFOA" | "A" => Some(Vfo::A),
        "VFOB" | "B" => Some(Vfo::B),
        "Main" => Some(Vfo::Main),
        "Sub" => Some(Vfo::Sub),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_get_success_prints_bare_value() {
        let out = render(ResponseMode::Default, "get_freq", &["14230000".to_string()], 0);
        assert_eq!(out, "14230000\n");
    }

    #[test]
    fn default_mode_set_success_prints_rprt_zero() {
        let out = render(ResponseMode::Default, "set_freq", &[], 0);
        assert_eq!(out, "RPRT 0\n");
    }

    #[test]
    fn default_mode_error_prints_rprt_with_code() {
        let out = render(ResponseMode::Default, "set_freq", &[], -1);
        assert_eq!(out, "RPRT -1\n");
    }

    #[test]
    fn extended_mode_success_echoes_name_and_rprt() {
        let out = render(ResponseMode::Extended, "get_freq", &["14230000".to_string()], 0);
        assert_eq!(out, "get_freq: 14230000\nRPRT 0\n");
    }

    #[test]
    fn vfo_token_round_trips() {
        assert_eq!(parse_vfo_token(vfo_token(&Vfo::B)), Some(Vfo::B));
    }
}
