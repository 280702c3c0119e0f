//! Emit buffer.
//!
//! Generated C accumulates here one line at a time, prefixed by the current
//! nesting depth. The only fallible step is the up-front reservation in
//! [`EmitBuffer::with_capacity`]; later growth follows the global allocator.
//! The text leaves the buffer exactly once, through [`EmitBuffer::into_string`].

use crate::EmitError;

/// One nesting level of generated C.
const INDENT: &str = "  ";

/// Growable output buffer for generated C text.
#[derive(Debug, Default)]
pub struct EmitBuffer {
    text: String,
    depth: usize,
}

impl EmitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with room for `capacity` bytes.
    ///
    /// Fails with [`EmitError::Internal`] instead of aborting when the
    /// reservation cannot be satisfied.
    pub fn with_capacity(capacity: usize) -> Result<Self, EmitError> {
        let mut buf = Self::new();
        buf.reserve(capacity)?;
        Ok(buf)
    }

    /// Reserve room for at least `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), EmitError> {
        self.text.try_reserve(additional)?;
        Ok(())
    }

    /// Open a nested C scope.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Close the innermost nested C scope.
    pub fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent without a matching indent");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append `line` at the current depth, terminated by `\n`.
    pub fn writeln(&mut self, line: &str) {
        self.text.extend(std::iter::repeat(INDENT).take(self.depth));
        self.text.push_str(line);
        self.newline();
    }

    /// Append an empty line; blank lines carry no indentation.
    pub fn newline(&mut self) {
        self.text.push('\n');
    }

    /// Hand the accumulated text to the caller.
    pub fn into_string(self) -> String {
        self.text
    }
}
