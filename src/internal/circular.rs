//! Circular dependency detection infrastructure.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DiError, DiResult};
use crate::key::Key;

const MAX_DEPTH: usize = 1024;

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<Key>> = const { RefCell::new(Vec::new()) };
}

/// Panic payload for circular dependency detection.
///
/// Factories resolve their dependencies through infallible helpers such as
/// `get_required`, so a cycle found deep inside a factory unwinds to the
/// nearest resolution frame, which turns it back into [`DiError::Circular`].
///
/// Example path: `["ServiceA", "ServiceB", "ServiceA"]`
#[derive(Debug)]
pub struct CircularPanic {
    /// The complete circular dependency path showing the cycle.
    pub path: Box<[&'static str]>,
}

/// Pushes a key on the resolution stack; truncates back on drop, including
/// during unwinding. Keyed bindings of one trait under different keys are
/// distinct entries.
struct StackGuard {
    len_before: usize,
}

impl StackGuard {
    fn enter(key: &Key) -> Self {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if stack.contains(key) {
                let mut path: Vec<&'static str> = stack.iter().map(Key::display_name).collect();
                path.push(key.display_name());
                drop(stack);
                panic::panic_any(CircularPanic { path: path.into_boxed_slice() });
            }

            if stack.len() >= MAX_DEPTH {
                let depth = stack.len();
                drop(stack);
                panic::panic_any(DiError::DepthExceeded(depth));
            }

            let len_before = stack.len();
            stack.push(key.clone());
            Self { len_before }
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| stack.borrow_mut().truncate(self.len_before));
    }
}

/// Execute a resolution step with circular dependency detection
pub(crate) fn with_circular_catch<T, F>(key: &Key, f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let _guard = StackGuard::enter(key);

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            if let Some(circular) = payload.downcast_ref::<CircularPanic>() {
                Err(DiError::Circular(circular.path.to_vec()))
            } else if let Some(err) = payload.downcast_ref::<DiError>() {
                Err(err.clone())
            } else {
                panic::resume_unwind(payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ServiceKey;

    fn named(name: &'static str) -> Key {
        Key::Trait(name)
    }

    #[test]
    fn nested_distinct_keys_resolve() {
        let result = with_circular_catch(&named("a"), || with_circular_catch(&named("b"), || Ok(1)));
        assert_eq!(result, Ok(1));
        RESOLUTION_STACK.with(|s| assert!(s.borrow().is_empty()));
    }

    #[test]
    fn repeated_key_reports_cycle_and_clears_stack() {
        let result: DiResult<()> = with_circular_catch(&named("a"), || {
            with_circular_catch(&named("b"), || with_circular_catch(&named("a"), || Ok(())))
        });
        assert_eq!(result, Err(DiError::Circular(vec!["a", "b", "a"])));
        RESOLUTION_STACK.with(|s| assert!(s.borrow().is_empty()));

        // The thread can resolve normally afterwards.
        assert_eq!(with_circular_catch(&named("a"), || Ok(2)), Ok(2));
    }

    #[test]
    fn same_trait_under_different_keys_is_not_a_cycle() {
        let hr = Key::TraitKeyed("dyn Repo", ServiceKey::from("hr"));
        let sales = Key::TraitKeyed("dyn Repo", ServiceKey::from("sales"));
        assert_eq!(with_circular_catch(&hr, || with_circular_catch(&sales, || Ok(3))), Ok(3));
    }
}
