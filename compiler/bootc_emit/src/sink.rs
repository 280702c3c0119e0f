//! Output sinks and artifact path derivation.
//!
//! A sink receives finished artifacts. Nothing reaches a sink until the
//! complete text has been built, so a failed emission never leaves a
//! half-written file behind.

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::options::WriteCallback;
use crate::EmitError;

/// Destination for finished artifacts.
pub trait OutputSink {
    /// Write one complete artifact.
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), EmitError>;
}

/// Writes artifacts to the filesystem. Parent directories must exist.
#[derive(Debug, Default)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), EmitError> {
        let io_error = |source| EmitError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::create(path).map_err(io_error)?;
        file.write_all(bytes).map_err(io_error)?;
        file.flush().map_err(io_error)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(())
    }
}

/// Hands artifacts to a caller-supplied callback.
#[derive(Debug, Clone)]
pub struct CallbackSink {
    callback: WriteCallback,
}

impl CallbackSink {
    pub fn new(callback: WriteCallback) -> Self {
        Self { callback }
    }
}

impl OutputSink for CallbackSink {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), EmitError> {
        let status = self.callback.call(path, bytes);
        if status == 0 {
            return Ok(());
        }
        tracing::warn!(path = %path.display(), status, "write callback rejected artifact");
        Err(EmitError::SinkRejected {
            path: path.to_path_buf(),
            status,
        })
    }
}

/// Paths of the artifacts one emission produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedPaths {
    pub source: PathBuf,
    pub header: Option<PathBuf>,
}

/// Derive artifact paths from a destination.
///
/// With a header, a trailing `.c` or `.h` is stripped to form a base and
/// `<base>.c` / `<base>.h` are produced, so `out.c` never becomes
/// `out.c.c`. Without a header the destination is used verbatim.
pub fn derive_output_paths(destination: &Path, emit_header: bool) -> EmittedPaths {
    if !emit_header {
        return EmittedPaths {
            source: destination.to_path_buf(),
            header: None,
        };
    }

    let base = artifact_base(destination);
    EmittedPaths {
        source: with_suffix(&base, ".c"),
        header: Some(with_suffix(&base, ".h")),
    }
}

/// The destination with a trailing `.c` / `.h` removed from its file name.
///
/// The file name is matched directly, so a bare `.c` strips to an empty
/// stem instead of being read as a dotfile without an extension.
pub fn artifact_base(destination: &Path) -> PathBuf {
    let stem = destination
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(".c").or_else(|| name.strip_suffix(".h")));
    match stem {
        Some(stem) => destination.with_file_name(stem),
        None => destination.to_path_buf(),
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}
