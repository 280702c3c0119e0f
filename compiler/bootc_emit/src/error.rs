//! Emission errors and their stable codes.

use std::path::PathBuf;

/// Stable error codes.
///
/// Values are part of the external contract: new codes are only ever
/// appended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    Ok = 0,
    InvalidArgument = 1,
    IoError = 2,
    Internal = 3,
}

impl ErrorCode {
    /// Collapse an emission result to its code.
    pub fn of<T>(result: &Result<T, EmitError>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.code(),
        }
    }
}

/// Errors returned by the emission entry points.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// Missing program unit or empty destination path.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The filesystem sink could not create or write a destination.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A caller-supplied write callback returned a non-zero status.
    #[error("write callback rejected '{}' with status {status}", path.display())]
    SinkRejected { path: PathBuf, status: i32 },

    /// The output buffer could not reserve its initial capacity.
    #[error("internal emitter error: {0}")]
    Internal(String),
}

impl EmitError {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io { .. } | Self::SinkRejected { .. } => ErrorCode::IoError,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<std::collections::TryReserveError> for EmitError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::Internal(format!("emit buffer reservation failed: {err}"))
    }
}
