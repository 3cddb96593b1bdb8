//! Stack growth for the recursive walks over expressions and values.
//!
//! Evaluation recurses once per nesting level and once per closure call; cloning,
//! comparing and displaying trees recurse once per nesting level. Wrapping each step in
//! [`ensure_sufficient_stack`] keeps deep programs from overflowing the thread stack.

/// Grow the stack when less than this much is left...
const RED_ZONE: usize = 100 * 1024;
/// ...by this much at a time.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first moving to a freshly allocated stack segment if this one is nearly
/// exhausted.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_recursion() {
        fn factorial(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n <= 1 { 1 } else { n * factorial(n - 1) })
        }

        assert_eq!(factorial(10), 3_628_800);
    }

    #[test]
    fn deep_recursion() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(200_000), 200_000);
    }
}
