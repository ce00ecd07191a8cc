// SPDX-License-Identifier: MIT

//! Command algebra (C9): parses both the short and long rigctld syntactic
//! forms into the same dispatch, so every short command has a long-command
//! equivalent producing an identical response body in default mode (§8
//! property 8).

use catcore::model::{Mode, Vfo};
use catcore::Controller;
use tracing::{debug, instrument};

use crate::format::{parse_vfo_token, ResponseMode};
use crate::levels::LevelStore;

/// One dispatched command's outcome: the long name (for extended-mode
/// echoing) plus the default-mode response body and return code.
/// `mode_override` carries a `response_mode` change for `set_ext_response`
/// and `set_powerstat` (§4.9), applied by the caller after rendering.
pub struct Outcome {
    pub long_name: &'static str,
    pub body: Vec<String>,
    pub code: i32,
    pub mode_override: Option<ResponseMode>,
}

impl Outcome {
    fn ok(long_name: &'static str, body: Vec<String>) -> Self {
        Outcome { long_name, body, code: 0, mode_override: None }
    }

    fn err(long_name: &'static str, code: i32) -> Self {
        Outcome { long_name, body: Vec::new(), code, mode_override: None }
    }
}

/// Per-connection state the command algebra needs beyond the controller
/// itself: the currently selected VFO and the split/tx-vfo pair.
pub struct SessionVfoState {
    pub current_vfo: Vfo,
    pub split_enabled: bool,
    pub tx_vfo: Vfo,
}

impl Default for SessionVfoState {
    fn default() -> Self {
        SessionVfoState {
            current_vfo: Vfo::A,
            split_enabled: false,
            tx_vfo: Vfo::B,
        }
    }
}

/// `true` if the client should disconnect after this command (`q`/`\quit`).
pub fn is_quit(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "q" || trimmed == "\\quit" || trimmed.eq_ignore_ascii_case("Q")
}

#[instrument(skip(controller, state, levels, line))]
pub async fn dispatch<S>(
    controller: &Controller<S>,
    state: &mut SessionVfoState,
    levels: &mut LevelStore,
    line: &str,
) -> Outcome
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    let line = line.trim();
    if line.is_empty() {
        return Outcome::err("unknown", -11);
    }

    let (name, args): (&str, Vec<&str>) = if let Some(rest) = line.strip_prefix('\\') {
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("");
        (long_to_canonical(name), parts.collect())
    } else {
        let mut parts = line.split_whitespace();
        let short = parts.next().unwrap_or("");
        (short_to_canonical(short), parts.collect())
    };

    debug!(name, ?args, "dispatching rigctld command");

    match name {
        "set_freq" => {
            let Some(hz) = args.first().and_then(|a| a.parse::<u64>().ok()) else {
                return Outcome::err("set_freq", -11);
            };
            match controller.set_frequency(hz, state.current_vfo).await {
                Ok(()) => Outcome::ok("set_freq", Vec::new()),
                Err(e) => Outcome::err("set_freq", e.rigctld_code()),
            }
        }
        "get_freq" => match controller.get_frequency(state.current_vfo).await {
            Ok(hz) => Outcome::ok("get_freq", vec![hz.to_string()]),
            Err(e) => Outcome::err("get_freq", e.rigctld_code()),
        },
        "set_mode" => {
            let Some(mode) = args.first().and_then(|a| Mode::from_rigctld_token(a).ok()) else {
                return Outcome::err("set_mode", -11);
            };
            match controller.set_mode(mode, state.current_vfo).await {
                Ok(()) => Outcome::ok("set_mode", Vec::new()),
                Err(e) => Outcome::err("set_mode", e.rigctld_code()),
            }
        }
        "get_mode" => match controller.get_mode(state.current_vfo).await {
            Ok(mode) => Outcome::ok(
                "get_mode",
                vec![mode.rigctld_token().to_string(), mode.default_passband_hz().to_string()],
            ),
            Err(e) => Outcome::err("get_mode", e.rigctld_code()),
        },
        "set_vfo" => {
            let Some(vfo) = args.first().and_then(|a| parse_vfo_token(a)) else {
                return Outcome::err("set_vfo", -11);
            };
            match controller.set_vfo(vfo).await {
                Ok(()) => {
                    state.current_vfo = vfo;
                    Outcome::ok("set_vfo", Vec::new())
                }
                Err(e) => Outcome::err("set_vfo", e.rigctld_code()),
            }
        }
        "get_vfo" => Outcome::ok("get_vfo", vec![crate::format::vfo_token(&state.current_vfo).to_string()]),
        "set_ptt" => {
            let Some(on) = args.first().and_then(|a| parse_bool_flag(a)) else {
                return Outcome::err("set_ptt", -11);
            };
            let current_mode = controller.get_mode(state.current_vfo).await.ok();
            match controller.set_ptt(on, current_mode).await {
                Ok(()) => Outcome::ok("set_ptt", Vec::new()),
                Err(e) => Outcome::err("set_ptt", e.rigctld_code()),
            }
        }
        "get_ptt" => match controller.get_ptt().await {
            Ok(on) => Outcome::ok("get_ptt", vec![if on { "1" } else { "0" }.to_string()]),
            Err(e) => Outcome::err("get_ptt", e.rigctld_code()),
        },
        "set_split_vfo" => {
            let Some(on) = args.first().and_then(|a| parse_bool_flag(a)) else {
                return Outcome::err("set_split_vfo", -11);
            };
            let tx_vfo = args.get(1).and_then(|a| parse_vfo_token(a)).unwrap_or(state.tx_vfo);
            match controller.set_split(on).await {
                Ok(()) => {
                    state.split_enabled = on;
                    state.tx_vfo = tx_vfo;
                    Outcome::ok("set_split_vfo", Vec::new())
                }
                Err(e) => Outcome::err("set_split_vfo", e.rigctld_code()),
            }
        }
        "get_split_vfo" => match controller.is_split_enabled().await {
            Ok(on) => {
                state.split_enabled = on;
                Outcome::ok(
                    "get_split_vfo",
                    vec![
                        if on { "1" } else { "0" }.to_string(),
                        crate::format::vfo_token(&state.tx_vfo).to_string(),
                    ],
                )
            }
            Err(e) => Outcome::err("get_split_vfo", e.rigctld_code()),
        },
        "set_split_freq" => {
            let Some(hz) = args.first().and_then(|a| a.parse::<u64>().ok()) else {
                return Outcome::err("set_split_freq", -11);
            };
            match controller.set_frequency(hz, state.tx_vfo).await {
                Ok(()) => Outcome::ok("set_split_freq", Vec::new()),
                Err(e) => Outcome::err("set_split_freq", e.rigctld_code()),
            }
        }
        "get_split_freq" => match controller.get_frequency(state.tx_vfo).await {
            Ok(hz) => Outcome::ok("get_split_freq", vec![hz.to_string()]),
            Err(e) => Outcome::err("get_split_freq", e.rigctld_code()),
        },
        "set_split_mode" => {
            let Some(mode) = args.first().and_then(|a| Mode::from_rigctld_token(a).ok()) else {
                return Outcome::err("set_split_mode", -11);
            };
            match controller.set_mode(mode, state.tx_vfo).await {
                Ok(()) => Outcome::ok("set_split_mode", Vec::new()),
                Err(e) => Outcome::err("set_split_mode", e.rigctld_code()),
            }
        }
        "get_split_mode" => match controller.get_mode(state.tx_vfo).await {
            Ok(mode) => Outcome::ok(
                "get_split_mode",
                vec![mode.rigctld_token().to_string(), mode.default_passband_hz().to_string()],
            ),
            Err(e) => Outcome::err("get_split_mode", e.rigctld_code()),
        },
        "power2mW" => {
            let Some(power) = args.first().and_then(|a| a.parse::<f64>().ok()) else {
                return Outcome::err("power2mW", -11);
            };
            let max_mw = controller.capabilities().max_power_watts as f64 * 1000.0;
            let mw = (power.clamp(0.0, 1.0) * max_mw).round() as u64;
            Outcome::ok("power2mW", vec![mw.to_string()])
        }
        "mW2power" => {
            let Some(mw) = args.first().and_then(|a| a.parse::<f64>().ok()) else {
                return Outcome::err("mW2power", -11);
            };
            let max_mw = (controller.capabilities().max_power_watts as f64 * 1000.0).max(1.0);
            let power = (mw / max_mw).clamp(0.0, 1.0);
            Outcome::ok("mW2power", vec![format!("{power:.6}")])
        }
        "set_level" => {
            let (Some(level_name), Some(value)) = (args.first(), args.get(1)) else {
                return Outcome::err("set_level", -11);
            };
            match levels.set(level_name, value) {
                Ok(()) => Outcome::ok("set_level", Vec::new()),
                Err(e) => Outcome::err("set_level", e.rigctld_code()),
            }
        }
        "get_level" => {
            let Some(level_name) = args.first() else {
                return Outcome::err("get_level", -11);
            };
            match levels.get(level_name) {
                Ok(value) => Outcome::ok("get_level", vec![value.to_string()]),
                Err(e) => Outcome::err("get_level", e.rigctld_code()),
            }
        }
        "dump_caps" => Outcome::ok(
            "dump_caps",
            crate::format::dump_caps(controller.traits(), controller.capabilities()),
        ),
        "dump_state" => Outcome::ok(
            "dump_state",
            crate::format::dump_state(controller.traits(), controller.capabilities()),
        ),
        "chk_vfo" => Outcome::ok("chk_vfo", vec!["1".to_string()]),
        "set_ext_response" | "set_powerstat" => {
            let Some(on) = args.first().and_then(|a| parse_bool_flag(a)) else {
                return Outcome::err(name_to_static(name), -11);
            };
            let mut outcome = Outcome::ok(name_to_static(name), Vec::new());
            outcome.mode_override = Some(if on { ResponseMode::Extended } else { ResponseMode::Default });
            outcome
        }
        _ => Outcome::err("unknown", -4),
    }
}

fn parse_bool_flag(token: &str) -> Option<bool> {
    match token {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Long-command name as dispatched internally (the leading backslash and
/// the `\` itself are stripped by the caller).
fn long_to_canonical(name: &str) -> &str {
    name
}

/// Maps a short single-character command to the long-command name used
/// internally, so both forms flow through one dispatch arm (§8 property 8).
fn short_to_canonical(short: &str) -> &str {
    match short {
        "F" => "set_freq",
        "f" => "get_freq",
        "M" => "set_mode",
        "m" => "get_mode",
        "V" => "set_vfo",
        "v" => "get_vfo",
        "T" => "set_ptt",
        "t" => "get_ptt",
        "S" => "set_split_vfo",
        "s" => "get_split_vfo",
        "I" => "set_split_freq",
        "i" => "get_split_freq",
        "X" => "set_split_mode",
        "x" => "get_split_mode",
        "2" => "power2mW",
        "4" => "mW2power",
        "L" => "set_level",
        "l" => "get_level",
        "q" | "Q" => "quit",
        other => other,
    }
}

fn name_to_static(name: &str) -> &'static str {
    match name {
        "set_ext_response" => "set_ext_response",
        "set_powerstat" => "set_powerstat",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    use catcore::config::RigConfig;
    use catcore::model::ModelId;
    use catcore::Session;

    struct ScriptedStream {
        inbound: VecDeque<u8>,
    }

    impl ScriptedStream {
        fn new(responses: &[u8]) -> Self {
            ScriptedStream { inbound: responses.iter().copied().collect() }
        }
    }

    impl AsyncRead for ScriptedStream {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            match self.inbound.pop_front() {
                Some(byte) => {
                    buf.put_slice(&[byte]);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Pending,
            }
        }
    }

    impl AsyncWrite for ScriptedStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Ok(buf.len()))
        }
        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn k3_config() -> RigConfig {
        RigConfig {
            serial_path: "/dev/ttyUSB0".into(),
            baud: None,
            civ_address: None,
            model: ModelId::ElecraftK3,
            read_timeout_ms: 200,
            cache_ttl_ms: 500,
        }
    }

    fn k3_controller(responses: &[u8]) -> Controller<ScriptedStream> {
        let session = Session::from_stream(ScriptedStream::new(responses), false);
        Controller::new(session, ModelId::ElecraftK3, k3_config())
    }

    #[tokio::test]
    async fn short_and_long_form_get_freq_produce_identical_body() {
        let controller = k3_controller(b"FA00014230000;FA00014230000;");
        let mut state = SessionVfoState::default();
        let mut levels = LevelStore::default();

        let short = dispatch(&controller, &mut state, &mut levels, "f").await;
        let long = dispatch(&controller, &mut state, &mut levels, "\\get_freq").await;

        assert_eq!(short.long_name, long.long_name);
        assert_eq!(short.body, long.body);
        assert_eq!(short.code, long.code);
    }

    #[tokio::test]
    async fn set_freq_out_of_range_maps_to_invalid_parameter_code() {
        let controller = k3_controller(b"");
        let mut state = SessionVfoState::default();
        let mut levels = LevelStore::default();

        let outcome = dispatch(&controller, &mut state, &mut levels, "F 999999999999").await;
        assert_eq!(outcome.code, -1);
        assert!(outcome.body.is_empty());
    }

    #[tokio::test]
    async fn set_ext_response_flips_mode_override() {
        let controller = k3_controller(b"");
        let mut state = SessionVfoState::default();
        let mut levels = LevelStore::default();

        let outcome = dispatch(&controller, &mut state, &mut levels, "\\set_ext_response 1").await;
        assert_eq!(outcome.mode_override, Some(ResponseMode::Extended));
        assert_eq!(outcome.code, 0);
    }

    #[tokio::test]
    async fn get_level_for_unknown_name_is_not_implemented() {
        let controller = k3_controller(b"");
        let mut state = SessionVfoState::default();
        let mut levels = LevelStore::default();

        let outcome = dispatch(&controller, &mut state, &mut levels, "l SQUELCH").await;
        assert_eq!(outcome.code, -4);
    }

    #[test]
    fn quit_recognizes_short_and_long_forms() {
        assert!(is_quit("q\n"));
        assert!(is_quit("\\quit\n"));
        assert!(!is_quit("f\n"));
    }
}
