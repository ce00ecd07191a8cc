// SPDX-License-Identifier: MIT

//! Per-connection rigctld session: reads `\n`-terminated command lines,
//! dispatches them against the shared controller, and writes back a
//! formatted response (§4.9).

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use catcore::Controller;
use tokio_serial::SerialStream;

use crate::commands::{self, SessionVfoState};
use crate::format::{self, ResponseMode};
use crate::levels::LevelStore;

pub async fn handle_connection(
    stream: TcpStream,
    peer: std::net::SocketAddr,
    controller: Arc<Controller<SerialStream>>,
    shutdown: Arc<tokio::sync::Notify>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut vfo_state = SessionVfoState::default();
    let mut levels = LevelStore::default();
    let mut mode = ResponseMode::Default;
    let mut line = String::new();

    loop {
        line.clear();
        tokio::select! {
            result = reader.read_line(&mut line) => {
                match result {
                    Ok(0) => {
                        info!(%peer, "rigctld connection closed by client");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(%peer, error = %e, "rigctld read error");
                        break;
                    }
                }
            }
            _ = shutdown.notified() => {
                debug!(%peer, "rigctld connection shutting down");
                break;
            }
        }

        if commands::is_quit(&line) {
            info!(%peer, "rigctld session quitting");
            break;
        }

        let outcome = commands::dispatch(&controller, &mut vfo_state, &mut levels, &line).await;
        if let Some(new_mode) = outcome.mode_override {
            mode = new_mode;
        }
        let rendered = format::render(mode, outcome.long_name, &outcome.body, outcome.code);
        if write_half.write_all(rendered.as_bytes()).await.is_err() {
            warn!(%peer, "rigctld write failed, closing connection");
            break;
        }
    }
}
