//! bootc C Emission Backend
//!
//! Lowers a resolved [`ProgramUnit`] into readable, compilable C.
//!
//! # Architecture
//!
//! Emission is a single synchronous pass driven by [`unit::emit_source`]:
//!
//! 1. **Normalize**: caller options become a complete [`EmitOptions`]
//! 2. **Render**: preamble, records, functions and `main` are written into
//!    an [`EmitBuffer`]; the optional header is rendered the same way
//! 3. **Deliver**: finished text goes to a sink ([`FsSink`],
//!    [`CallbackSink`]) or straight back to the caller
//!
//! Output is deterministic: the same unit and options always produce the
//! same bytes.
//!
//! # Modules
//!
//! - [`ident`]: identifier sanitization and qualification
//! - [`mangle`]: deterministic symbol names
//! - [`types`]: type name resolution
//! - [`expr`] / [`stmt`]: expression and statement lowering
//! - [`unit`] / [`header`]: whole-artifact orchestration
//! - [`sink`]: artifact delivery

use std::path::Path;

use bootc_ir::ProgramUnit;

pub mod buffer;
pub mod context;
pub mod error;
pub mod expr;
pub mod header;
pub mod ident;
pub mod locals;
pub mod mangle;
pub mod options;
pub mod sink;
pub mod stmt;
pub mod types;
pub mod unit;

pub use buffer::EmitBuffer;
pub use context::CodegenContext;
pub use error::{EmitError, ErrorCode};
pub use ident::{qualify, sanitize_identifier, MAX_IDENT_LEN};
pub use mangle::Mangler;
pub use options::{
    default_options, EmitMode, EmitOptions, MangleStyle, RuntimeStyle, WriteCallback,
};
pub use sink::{derive_output_paths, CallbackSink, EmittedPaths, FsSink, OutputSink};
pub use types::TypeResolver;

use header::emit_header;
use options::DEFAULT_HEADER_BASE_NAME;
use sink::artifact_base;
use unit::emit_source;

/// Finished artifacts returned by [`emit_to_buffers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOutput {
    pub source: String,
    /// Present when header emission is enabled.
    pub header: Option<String>,
}

/// Emit a unit to `path`, deriving `<base>.c` / `<base>.h` when header
/// emission is enabled.
///
/// Artifacts go to the options' write callback when one is set, and to the
/// filesystem otherwise. Both texts are fully built before anything is
/// written.
///
/// # Errors
///
/// - [`EmitError::InvalidArgument`] for a missing unit or an empty path,
///   before any filesystem access
/// - [`EmitError::Io`] / [`EmitError::SinkRejected`] when an artifact
///   cannot be written
/// - [`EmitError::Internal`] when the output buffer cannot be reserved
pub fn emit_to_path(
    unit: Option<&ProgramUnit>,
    path: impl AsRef<Path>,
    options: Option<&EmitOptions>,
) -> Result<EmittedPaths, EmitError> {
    let unit = unit.ok_or(EmitError::InvalidArgument("program unit is required"))?;
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(EmitError::InvalidArgument("destination path is empty"));
    }

    let options = EmitOptions::normalized(options);
    let paths = derive_output_paths(path, options.emit_header);
    let guard_base = match &options.header_base_name {
        Some(base) => base.clone(),
        None => file_name_of(&artifact_base(path))
            .unwrap_or_else(|| DEFAULT_HEADER_BASE_NAME.to_string()),
    };
    let include = paths
        .header
        .as_deref()
        .and_then(file_name_of)
        .unwrap_or_else(|| format!("{guard_base}.h"));
    tracing::debug!(
        source = %paths.source.display(),
        header = ?paths.header,
        %guard_base,
        "emitting to path"
    );

    let output = emit_artifacts(unit, &options, &guard_base, &include)?;
    match &options.sink {
        Some(callback) => write_artifacts(&mut CallbackSink::new(callback.clone()), &paths, &output),
        None => write_artifacts(&mut FsSink, &paths, &output),
    }?;
    Ok(paths)
}

/// Emit a unit into owned buffers without touching any sink.
///
/// The header base name comes from the options, or
/// [`DEFAULT_HEADER_BASE_NAME`] when they set none. The source includes
/// `<base>.h`.
///
/// # Errors
///
/// [`EmitError::InvalidArgument`] for a missing unit;
/// [`EmitError::Internal`] when the output buffer cannot be reserved.
pub fn emit_to_buffers(
    unit: Option<&ProgramUnit>,
    options: Option<&EmitOptions>,
) -> Result<EmitOutput, EmitError> {
    let unit = unit.ok_or(EmitError::InvalidArgument("program unit is required"))?;
    let options = EmitOptions::normalized(options);
    let base = options
        .header_base_name
        .as_deref()
        .unwrap_or(DEFAULT_HEADER_BASE_NAME);
    emit_artifacts(unit, &options, base, &format!("{base}.h"))
}

/// `guard_base` feeds the include guard; `include` is the header file name
/// the source includes.
fn emit_artifacts(
    unit: &ProgramUnit,
    options: &EmitOptions,
    guard_base: &str,
    include: &str,
) -> Result<EmitOutput, EmitError> {
    let mut ctx = CodegenContext::new(unit, options)?;
    emit_source(&mut ctx, include);
    let source = ctx.into_output();

    let header = if options.emit_header {
        let mut ctx = CodegenContext::new(unit, options)?;
        emit_header(&mut ctx, guard_base);
        Some(ctx.into_output())
    } else {
        None
    };

    Ok(EmitOutput { source, header })
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Source first, then header; the first failure is reported.
fn write_artifacts(
    sink: &mut dyn OutputSink,
    paths: &EmittedPaths,
    output: &EmitOutput,
) -> Result<(), EmitError> {
    sink.write(&paths.source, output.source.as_bytes())?;
    if let (Some(path), Some(header)) = (&paths.header, &output.header) {
        sink.write(path, header.as_bytes())?;
    }
    Ok(())
}
