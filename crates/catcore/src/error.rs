// SPDX-License-Identifier: MIT

//! Unified error taxonomy for the CAT protocol core.
//!
//! Every fallible library operation returns [`CatError`]. The variants are
//! closed and map 1:1 onto Hamlib return codes at the rigctld boundary; see
//! [`CatError::rigctld_code`].

use thiserror::Error;

/// Unified CAT error taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatError {
    #[error("not connected")]
    NotConnected,

    #[error("timed out waiting for radio response")]
    Timeout,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("invalid response from radio")]
    InvalidResponse,

    #[error("frequency out of range")]
    FrequencyOutOfRange,

    #[error("transmit not allowed in current mode")]
    TransmitNotAllowed,

    #[error("mode not supported by this radio")]
    ModeNotSupported,

    #[error("unsupported radio: {0}")]
    UnsupportedRadio(String),

    #[error("serial port error: {0}")]
    SerialPortError(String),

    #[error("radio busy")]
    Busy,
}

pub type CatResult<T> = Result<T, CatError>;

impl CatError {
    /// Hamlib-compatible `rigctld` return code for this error.
    ///
    /// See §4.10/§7 of the protocol spec for the mapping table.
    pub fn rigctld_code(&self) -> i32 {
        match self {
            CatError::NotConnected => -5,
            CatError::Timeout => -6,
            CatError::InvalidParameter(_)
            | CatError::FrequencyOutOfRange
            | CatError::TransmitNotAllowed
            | CatError::ModeNotSupported => -1,
            CatError::CommandFailed(_) | CatError::Busy => -10,
            CatError::UnsupportedOperation(_) | CatError::UnsupportedRadio(_) => -12,
            CatError::InvalidResponse => -9,
            CatError::SerialPortError(_) => -5,
        }
    }
}

impl From<std::io::Error> for CatError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::TimedOut {
            CatError::Timeout
        } else {
            CatError::SerialPortError(e.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for CatError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        CatError::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rigctld_code_mapping() {
        assert_eq!(CatError::NotConnected.rigctld_code(), -5);
        assert_eq!(CatError::Timeout.rigctld_code(), -6);
        assert_eq!(
            CatError::InvalidParameter("x".into()).rigctld_code(),
            -1
        );
        assert_eq!(CatError::FrequencyOutOfRange.rigctld_code(), -1);
        assert_eq!(CatError::CommandFailed("NAK".into()).rigctld_code(), -10);
        assert_eq!(CatError::Busy.rigctld_code(), -10);
        assert_eq!(
            CatError::UnsupportedOperation("xit".into()).rigctld_code(),
            -12
        );
        assert_eq!(CatError::InvalidResponse.rigctld_code(), -9);
    }

    #[test]
    fn io_error_maps_timeout_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "x");
        assert_eq!(CatError::from(io), CatError::Timeout);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "x");
        assert!(matches!(CatError::from(io), CatError::SerialPortError(_)));
    }
}
