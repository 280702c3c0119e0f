//! Emission options.
//!
//! [`EmitOptions`] is non-exhaustive: callers start from
//! [`EmitOptions::default`] and adjust it through the `with_*` builders, so
//! new fields with defaults never break existing call sites.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Default prefix for every emitted function and type symbol.
pub const DEFAULT_NAMESPACE_PREFIX: &str = "bootc_";

/// Default prefix for header include guards.
pub const DEFAULT_HEADER_GUARD_PREFIX: &str = "BOOTC_";

/// Runtime header included when the runtime style is [`RuntimeStyle::External`].
pub const DEFAULT_RUNTIME_HEADER: &str = "bootc_runtime.h";

/// Header base name used when neither the options nor a destination path
/// provide one.
pub const DEFAULT_HEADER_BASE_NAME: &str = "bootc_out";

/// Emission fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EmitMode {
    /// Correct signatures with placeholder bodies.
    #[default]
    Stubs,
    /// Lower statement trees into real bodies.
    Full,
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stubs => write!(f, "stubs"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Symbol naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MangleStyle {
    /// `prefix` `module` `_` `name`
    #[default]
    Simple,
    /// Simple name plus `__` and an 8-digit FNV-1a fold of `module::name`.
    Hashed,
}

impl fmt::Display for MangleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Hashed => write!(f, "hashed"),
        }
    }
}

/// How generated code reaches its runtime support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RuntimeStyle {
    /// Self-contained output; full mode inlines a print helper.
    #[default]
    None,
    /// Include an external runtime header.
    External,
}

impl fmt::Display for RuntimeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::External => write!(f, "external"),
        }
    }
}

type WriteFn = dyn Fn(&Path, &[u8]) -> i32 + Send + Sync;

/// Caller-supplied output callback.
///
/// Receives the destination path and the finished bytes; `0` means
/// success, anything else is reported as an I/O failure. Any user state
/// the caller needs travels inside the closure.
#[derive(Clone)]
pub struct WriteCallback(Arc<WriteFn>);

impl WriteCallback {
    pub fn new(f: impl Fn(&Path, &[u8]) -> i32 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, path: &Path, bytes: &[u8]) -> i32 {
        (self.0)(path, bytes)
    }
}

impl fmt::Debug for WriteCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WriteCallback(..)")
    }
}

/// Configuration for one emission call.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct EmitOptions {
    pub mode: EmitMode,
    pub mangle: MangleStyle,
    pub runtime: RuntimeStyle,
    /// Split output into `<base>.c` and `<base>.h`.
    pub emit_header: bool,
    /// Emit `#line` markers before functions with known source lines.
    pub emit_line_markers: bool,
    /// Emit option and span comments.
    pub emit_debug_comments: bool,
    /// `None` means [`DEFAULT_NAMESPACE_PREFIX`].
    pub namespace_prefix: Option<String>,
    /// `None` means [`DEFAULT_HEADER_GUARD_PREFIX`].
    pub header_guard_prefix: Option<String>,
    /// `None` means [`DEFAULT_RUNTIME_HEADER`].
    pub runtime_header: Option<String>,
    /// Base name for the include guard and the `#include` of the companion
    /// header. `None` derives it from the destination path.
    pub header_base_name: Option<String>,
    /// Replaces direct file I/O in `emit_to_path`.
    pub sink: Option<WriteCallback>,
}

impl EmitOptions {
    /// Produce a complete options value from an optional caller value.
    ///
    /// Absent options become all defaults; unset prefixes and the runtime
    /// header are patched back to their defaults.
    pub fn normalized(options: Option<&EmitOptions>) -> EmitOptions {
        let mut opts = options.cloned().unwrap_or_default();
        if opts.namespace_prefix.is_none() {
            opts.namespace_prefix = Some(DEFAULT_NAMESPACE_PREFIX.to_string());
        }
        if opts.header_guard_prefix.is_none() {
            opts.header_guard_prefix = Some(DEFAULT_HEADER_GUARD_PREFIX.to_string());
        }
        if opts.runtime_header.is_none() {
            opts.runtime_header = Some(DEFAULT_RUNTIME_HEADER.to_string());
        }
        opts
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_mangle(mut self, mangle: MangleStyle) -> Self {
        self.mangle = mangle;
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: RuntimeStyle) -> Self {
        self.runtime = runtime;
        self
    }

    #[must_use]
    pub fn with_header(mut self, emit_header: bool) -> Self {
        self.emit_header = emit_header;
        self
    }

    #[must_use]
    pub fn with_line_markers(mut self, enabled: bool) -> Self {
        self.emit_line_markers = enabled;
        self
    }

    #[must_use]
    pub fn with_debug_comments(mut self, enabled: bool) -> Self {
        self.emit_debug_comments = enabled;
        self
    }

    #[must_use]
    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_header_guard_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.header_guard_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_runtime_header(mut self, path: impl Into<String>) -> Self {
        self.runtime_header = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_header_base_name(mut self, name: impl Into<String>) -> Self {
        self.header_base_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: WriteCallback) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Namespace prefix, defaulted.
    pub fn namespace_prefix(&self) -> &str {
        self.namespace_prefix
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE_PREFIX)
    }

    /// Header guard prefix, defaulted.
    pub fn header_guard_prefix(&self) -> &str {
        self.header_guard_prefix
            .as_deref()
            .unwrap_or(DEFAULT_HEADER_GUARD_PREFIX)
    }

    /// Runtime header path, defaulted.
    pub fn runtime_header(&self) -> &str {
        self.runtime_header
            .as_deref()
            .unwrap_or(DEFAULT_RUNTIME_HEADER)
    }

    /// Full mode without an external runtime gets the inline print helper.
    pub fn wants_print_helper(&self) -> bool {
        self.mode == EmitMode::Full && self.runtime == RuntimeStyle::None
    }
}

/// All-default options.
pub fn default_options() -> EmitOptions {
    EmitOptions::normalized(None)
}
