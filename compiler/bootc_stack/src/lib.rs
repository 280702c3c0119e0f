//! Stack growth for recursive tree walks.
//!
//! The emitter walks statement and expression trees recursively, one frame
//! per nesting level. Wrapping each level in [`ensure_sufficient_stack`]
//! moves the walk onto a freshly allocated segment whenever the current one
//! runs low, so input depth is bounded by memory rather than by the thread's
//! stack size.

/// Headroom below which a new segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const MIN_REMAINING: usize = 128 * 1024;

/// Size of each newly allocated segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `walk` with at least [`MIN_REMAINING`] bytes of stack available.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(walk: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_REMAINING, SEGMENT_SIZE, walk)
}

/// The wasm32 target has no segmented stack support; `walk` runs in place.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(walk: impl FnOnce() -> R) -> R {
    walk()
}
