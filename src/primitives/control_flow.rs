//! Control Flow Primitives - Conditional subtree switching.
//!
//! [`ternary`] mounts one of two branches and swaps them whenever the
//! condition changes value. Repeated values are ignored, so a branch is only
//! ever rebuilt on a real change.
//!
//! # Mount modes
//!
//! ## Eager (default)
//! - The truthy branch is built at construction
//! - The last observed value starts at `true`, so an initial `true` is a no-op
//! - The switcher has no element of its own; it renders as the mounted branch
//!
//! ## Deferred
//! - A wrapper element is created (tag from [`RuntimeConfig::deferred_wrapper_tag`])
//! - Nothing is built until the condition emits
//! - Branches live in a single keyed slot inside the wrapper
//!
//! # Swapping
//!
//! ```text
//! before:  parent [ a, branch(true), b ]
//! false →  build falsy, destroy truthy, insert before b
//! after:   parent [ a, branch(false), b ]
//! ```
//!
//! [`RuntimeConfig::deferred_wrapper_tag`]: crate::config::RuntimeConfig

use std::cell::Cell;
use std::rc::Rc;

use crate::config::{config, SwitchMount};
use crate::engine::{create_element, with_owner, Children, KeyedChild, Node};
use crate::error::{Error, Result};
use crate::host::HostAdapter;
use crate::lifecycle::Lifecycle;
use crate::source::Source;
use crate::types::{ElementId, NodeFlags, Props};

/// Key of the single slot a deferred switcher reconciles.
const SLOT_KEY: &str = "branch";

/// Switch between two subtrees on a boolean source.
///
/// Uses the configured [`SwitchMount`] mode.
///
/// # Example
///
/// ```ignore
/// let open = BehaviorSubject::new(true);
///
/// let panel = ternary(
///     open.as_source(),
///     || create_element("p", Props::new().with("textContent", "open"), ()),
///     || create_element("p", Props::new().with("textContent", "closed"), ()),
/// )?;
///
/// open.next(false); // "open" destroyed, "closed" takes its place
/// ```
pub fn ternary<T, F>(condition: Source<bool>, truthy: T, falsy: F) -> Result<Node>
where
    T: Fn() -> Result<Node> + 'static,
    F: Fn() -> Result<Node> + 'static,
{
    ternary_with(config().switch_mount, condition, truthy, falsy)
}

/// [`ternary`] with an explicit mount mode.
pub fn ternary_with<T, F>(mode: SwitchMount, condition: Source<bool>, truthy: T, falsy: F) -> Result<Node>
where
    T: Fn() -> Result<Node> + 'static,
    F: Fn() -> Result<Node> + 'static,
{
    match mode {
        SwitchMount::Eager => eager(condition, truthy, falsy),
        SwitchMount::Deferred => deferred(condition, truthy, falsy),
    }
}

/// Build one branch. A failed attempt tears down whatever it already built.
fn build_branch(value: bool, truthy: &dyn Fn() -> Result<Node>, falsy: &dyn Fn() -> Result<Node>) -> Result<Node> {
    let attempt = Lifecycle::new();
    let built = with_owner(&attempt, || if value { truthy() } else { falsy() });
    match built {
        Ok(node) if !node.is_destroyed() => Ok(node),
        Ok(_) => {
            attempt.destroy();
            Err(Error::Destroyed)
        }
        Err(err) => {
            attempt.destroy();
            Err(err)
        }
    }
}

// =============================================================================
// Eager
// =============================================================================

fn eager<T, F>(condition: Source<bool>, truthy: T, falsy: F) -> Result<Node>
where
    T: Fn() -> Result<Node> + 'static,
    F: Fn() -> Result<Node> + 'static,
{
    let host = HostAdapter::current()?;
    let initial = build_branch(true, &truthy, &falsy)?;

    let switcher = Node::new(ElementId::NONE, NodeFlags::SWITCHER);
    switcher.delegate_to(&initial);
    switcher.adopt(&initial);

    let last = Rc::new(Cell::new(Some(true)));
    let weak_switcher = switcher.downgrade();

    let subscription = condition.subscribe(move |&value: &bool| {
        if last.get() == Some(value) {
            return;
        }
        let Some(switcher) = weak_switcher.upgrade() else {
            return;
        };
        if switcher.is_destroyed() {
            return;
        }

        let previous = last.replace(Some(value));
        let next = match build_branch(value, &truthy, &falsy) {
            Ok(node) => node,
            Err(err) => {
                tracing::error!(%err, value, "switcher branch failed to construct; keeping current branch");
                last.set(previous);
                return;
            }
        };

        let current = switcher.delegate();
        let (parent, anchor) = match &current {
            Some(current) => {
                let element = current.element();
                (host.parent(element), host.next_sibling(element))
            }
            None => (None, None),
        };
        if let Some(current) = current {
            current.destroy();
        }

        switcher.delegate_to(&next);
        switcher.adopt(&next);
        if let Some(parent) = parent {
            host.insert_at(parent, next.element(), anchor);
        }
        tracing::debug!(value, element = %next.element(), "switcher swapped branch");
    });

    switcher.lifecycle().bind(subscription);
    Ok(switcher)
}

// =============================================================================
// Deferred
// =============================================================================

fn deferred<T, F>(condition: Source<bool>, truthy: T, falsy: F) -> Result<Node>
where
    T: Fn() -> Result<Node> + 'static,
    F: Fn() -> Result<Node> + 'static,
{
    let tag = config().deferred_wrapper_tag;
    let last: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    let slot = condition.filter_map(move |&value: &bool| -> Option<KeyedChild> {
        if last.get() == Some(value) {
            return None;
        }
        match build_branch(value, &truthy, &falsy) {
            Ok(node) => {
                last.set(Some(value));
                Some((SLOT_KEY.to_string(), Some(node)))
            }
            Err(err) => {
                tracing::error!(%err, value, "switcher branch failed to construct; keeping current branch");
                None
            }
        }
    });

    let wrapper = create_element(&tag, Props::new(), Children::Keyed(slot))?;
    wrapper.insert_flags(NodeFlags::SWITCHER);
    Ok(wrapper)
}
