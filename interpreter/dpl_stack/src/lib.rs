//! Stack safety utilities for deep recursion.
//!
//! The parser and evaluator recurse over user-controlled input; deeply
//! nested expressions or deep call chains would otherwise overflow the
//! native stack. Wrap recursive entry points with
//! [`ensure_sufficient_stack`] to grow the stack on demand.
//!
//! On wasm targets this is a passthrough: wasm manages its own stack, and
//! the evaluator's call-depth ceiling bounds recursion there.

/// Minimum stack space to keep available (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, additional stack
/// space is allocated before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Wasm version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + countdown(n - 1) })
    }

    #[test]
    fn survives_deep_recursion() {
        assert_eq!(countdown(200_000), 200_000);
    }

    #[test]
    fn passes_through_return_value() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
    }
}
