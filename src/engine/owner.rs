//! Owner Stack - Which lifecycle claims nodes built right now.
//!
//! While a composition function or a switcher branch runs, its lifecycle sits
//! on top of the stack. Every node created in that window is chained to it, so
//! a construction that fails halfway still tears down what it already built.

use std::cell::RefCell;

use crate::lifecycle::Lifecycle;

thread_local! {
    /// Stack of owners for nested construction.
    static OWNER_STACK: RefCell<Vec<Lifecycle>> = const { RefCell::new(Vec::new()) };
}

/// Pops the owner pushed by [`with_owner`], even if the body unwinds.
struct OwnerGuard;

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        OWNER_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Run `f` with `owner` claiming every node created inside it.
pub(crate) fn with_owner<R>(owner: &Lifecycle, f: impl FnOnce() -> R) -> R {
    OWNER_STACK.with(|stack| stack.borrow_mut().push(owner.clone()));
    let _guard = OwnerGuard;
    f()
}

/// Chain `lifecycle` to the current owner, if any.
pub(crate) fn claim(lifecycle: &Lifecycle) {
    let owner = OWNER_STACK.with(|stack| stack.borrow().last().cloned());
    if let Some(owner) = owner {
        owner.chain(lifecycle);
    }
}

/// Clear the stack.
pub(crate) fn reset_owners() {
    OWNER_STACK.with(|stack| stack.borrow_mut().clear());
}
