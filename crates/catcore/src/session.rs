// SPDX-License-Identifier: MIT

//! Serial session (C2): single-owner, half-duplex request/response I/O.
//!
//! Generic over any `AsyncRead + AsyncWrite + Unpin + Send` byte stream so
//! the testable properties in the test suite can drive a mock stream; the
//! concrete backing used by the daemon is [`tokio_serial::SerialStream`].

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, trace, warn};

use crate::error::{CatError, CatResult};

/// Default per-operation round-trip timeout when the caller doesn't specify
/// one (§4.2: "Default per-op timeout ≥ 500 ms").
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// A single-owner request/response session over `S`.
///
/// At most one [`Session::round_trip`] is in flight at a time; the internal
/// `tokio::sync::Mutex` serializes concurrent callers in FIFO order rather
/// than rejecting them.
pub struct Session<S> {
    stream: Mutex<Option<S>>,
    echoes_commands: bool,
}

impl<S> Session<S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    /// Wrap an already-open stream. Used directly by tests with a mock
    /// stream, and internally by [`Session::connect`] for the real port.
    pub fn from_stream(stream: S, echoes_commands: bool) -> Self {
        Session {
            stream: Mutex::new(Some(stream)),
            echoes_commands,
        }
    }

    pub async fn state(&self) -> SessionState {
        if self.stream.lock().await.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Write `payload`, then read a response terminated by `terminator`
    /// within `timeout`. If the model echoes commands, the echo is read and
    /// discarded before the real response is awaited.
    pub async fn round_trip(
        &self,
        payload: &[u8],
        terminator: u8,
        timeout: Duration,
    ) -> CatResult<Vec<u8>> {
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(CatError::NotConnected)?;

        trace!(bytes = ?payload, "writing CAT command");
        stream
            .write_all(payload)
            .await
            .map_err(|e| CatError::SerialPortError(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| CatError::SerialPortError(e.to_string()))?;

        let result = tokio::time::timeout(timeout, async {
            if self.echoes_commands {
                let _echo = read_until(stream, terminator).await?;
                trace!("discarded command echo");
            }
            read_until(stream, terminator).await
        })
        .await;

        match result {
            Ok(Ok(bytes)) => {
                trace!(bytes = ?bytes, "received CAT response");
                Ok(bytes)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!("round trip timed out after {:?}", timeout);
                Err(CatError::Timeout)
            }
        }
    }

    /// Write `payload` and return without awaiting a response, for dialects
    /// where a "set" command elicits no reply at all (Elecraft ASCII sets).
    pub async fn send(&self, payload: &[u8]) -> CatResult<()> {
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(CatError::NotConnected)?;
        trace!(bytes = ?payload, "writing CAT command (no response expected)");
        stream
            .write_all(payload)
            .await
            .map_err(|e| CatError::SerialPortError(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| CatError::SerialPortError(e.to_string()))
    }

    /// Close the port and release the lock; the session returns to
    /// [`SessionState::Disconnected`].
    pub async fn disconnect(&self) -> CatResult<()> {
        let mut guard = self.stream.lock().await;
        if let Some(mut stream) = guard.take() {
            let _ = stream.shutdown().await;
            debug!("session disconnected");
        }
        Ok(())
    }
}

async fn read_until<S>(stream: &mut S, terminator: u8) -> CatResult<Vec<u8>>
where
    S: tokio::io::AsyncRead + Unpin,
{
    let mut out = Vec::new();
    loop {
        let byte = stream
            .read_u8()
            .await
            .map_err(|e| CatError::SerialPortError(e.to_string()))?;
        out.push(byte);
        if byte == terminator {
            return Ok(out);
        }
        if out.len() > 4096 {
            return Err(CatError::InvalidResponse);
        }
    }
}

impl Session<SerialStream> {
    /// Open `path` at `baud` (8N1, no hardware flow control) and return a
    /// connected session.
    pub async fn connect(path: &str, baud: u32, echoes_commands: bool) -> CatResult<Self> {
        let mut port = tokio_serial::new(path, baud)
            .open_native_async()
            .map_err(|e| CatError::SerialPortError(e.to_string()))?;
        port.clear(tokio_serial::ClearBuffer::All)
            .map_err(|e| CatError::SerialPortError(e.to_string()))?;
        debug!(path, baud, "serial session connected");
        Ok(Session::from_stream(port, echoes_commands))
    }
}
