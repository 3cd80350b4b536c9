//! Keyed Child Reconciler - Diff children in place by key.
//!
//! The parent's children come from a stream of `(key, Option<Node>)` events:
//!
//! ```text
//! ("a", Some(p1))  → new key: append p1
//! ("b", Some(p2))  → new key: append p2                  [p1, p2]
//! ("a", Some(p3))  → known key: destroy p1, p3 takes its place   [p3, p2]
//! ("a", None)      → destroy p3, forget "a"              [p2]
//! ```
//!
//! The table is insertion ordered, so replacing a key keeps its slot in the
//! table as well as in the host. Each event is fully applied before the next
//! one is looked at.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::create::KeyedChild;
use super::node::Node;
use crate::host::HostAdapter;
use crate::source::{Observer, Source};
use crate::types::NodeFlags;

type KeyedTable = Rc<RefCell<IndexMap<String, Node>>>;

/// Keep `parent`'s children in sync with `source` until `parent` is destroyed.
pub(crate) fn reconcile_keyed(host: &HostAdapter, parent: &Node, source: Source<KeyedChild>) {
    parent.insert_flags(NodeFlags::KEYED);
    let table: KeyedTable = Rc::new(RefCell::new(IndexMap::new()));

    let subscription = {
        let host = host.clone();
        let table = table.clone();
        let weak_parent = parent.downgrade();
        source.subscribe_observer(
            Observer::new(move |(key, next): &KeyedChild| {
                let Some(parent) = weak_parent.upgrade() else {
                    return;
                };
                if parent.is_destroyed() {
                    return;
                }
                match next {
                    Some(node) => mount(&host, &parent, &table, key, node),
                    None => remove(&table, key),
                }
            })
            .on_complete(|| tracing::debug!("keyed stream completed; children stay mounted")),
        )
    };

    parent.lifecycle().on_destroy(move || {
        subscription.unsubscribe();
        let nodes: Vec<Node> = table.borrow_mut().drain(..).map(|(_, node)| node).collect();
        for node in nodes {
            node.destroy();
        }
    });
}

fn mount(host: &HostAdapter, parent: &Node, table: &KeyedTable, key: &str, node: &Node) {
    if node.is_destroyed() {
        tracing::warn!(key, "keyed child was already destroyed; ignored");
        return;
    }

    let previous = table.borrow().get(key).cloned();
    if previous.as_ref().is_some_and(|prev| prev.ptr_eq(node)) {
        tracing::debug!(key, "keyed child already mounted under this key");
        return;
    }

    // A node moving to a new key leaves its old one without being destroyed.
    let moved_from = table
        .borrow()
        .iter()
        .find(|(k, n)| k.as_str() != key && n.ptr_eq(node))
        .map(|(k, _)| k.clone());
    if let Some(old_key) = moved_from {
        tracing::debug!(key, old_key = %old_key, "keyed child moved between keys");
        table.borrow_mut().shift_remove(&old_key);
    }

    let anchor = match &previous {
        Some(prev) => {
            let anchor = host.next_sibling(prev.element());
            prev.destroy();
            anchor
        }
        None => None,
    };

    table.borrow_mut().insert(key.to_string(), node.clone());
    host.insert_at(parent.element(), node.element(), anchor);
    parent.adopt(node);

    if previous.is_some() {
        tracing::debug!(key, element = %node.element(), "keyed child replaced");
    } else {
        tracing::debug!(key, element = %node.element(), "keyed child inserted");
    }
}

fn remove(table: &KeyedTable, key: &str) {
    let removed = table.borrow_mut().shift_remove(key);
    match removed {
        Some(node) => {
            tracing::debug!(key, element = %node.element(), "keyed child removed");
            node.destroy();
        }
        None => tracing::debug!(key, "removal of unknown key ignored"),
    }
}
