//! Source location spans.
//!
//! Byte offsets plus the 1-based line of `start`, which is what the emitter
//! needs for `#line` markers. A line of `0` means the front end did not
//! record one.

use std::fmt;

/// Source location span.
///
/// Layout: 12 bytes total
/// - start: u32 - byte offset from file start
/// - end: u32 - byte offset (exclusive)
/// - line: u32 - 1-based line of `start`, `0` when unknown
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

impl Span {
    /// Dummy span for synthesized nodes.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
    };

    /// Create a new span without line information.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span {
            start,
            end,
            line: 0,
        }
    }

    /// Attach the line number of `start`.
    #[inline]
    #[must_use]
    pub const fn with_line(self, line: u32) -> Self {
        Span {
            start: self.start,
            end: self.end,
            line,
        }
    }

    /// Line number of `start`, if the front end recorded one.
    #[inline]
    pub const fn line(&self) -> Option<u32> {
        if self.line == 0 {
            None
        } else {
            Some(self.line)
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)?;
        if let Some(line) = self.line() {
            write!(f, "@{line}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// Size assertions to prevent accidental regressions
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 12);
}
