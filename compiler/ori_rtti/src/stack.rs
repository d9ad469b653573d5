//! Native stack headroom for recursion that follows type structure.
//!
//! Two walks recurse once per level of a type info: the structural
//! comparator, and nested `call_engine` runs where a specialized operation
//! recurses into its element type (`box(box(...))`). Both call
//! [`ensure_sufficient_stack`] at every level, so nesting depth is bounded by
//! memory rather than by the thread's stack. On wasm32 it is a plain call.

/// Run `f` on a stack with enough headroom for one more level.
///
/// A new segment is switched to when less than `MIN_HEADROOM` remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(not(target_arch = "wasm32"))]
    {
        stacker::maybe_grow(MIN_HEADROOM, SEGMENT_SIZE, f)
    }
    #[cfg(target_arch = "wasm32")]
    {
        f()
    }
}

/// One engine level (trampoline, routine, transient guard and span) fits
/// well inside this.
#[cfg(not(target_arch = "wasm32"))]
const MIN_HEADROOM: usize = 128 * 1024;

#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
