//! Node Composition Engine - Build nodes from tags and composition functions.
//!
//! Two entry points:
//! - [`create_element`] creates a host element and binds its props
//! - [`create_component`] calls a composition function and adopts the node it returns
//!
//! Both take children. Static children are attached once in order; a keyed
//! stream hands the children over to the keyed reconciler.
//!
//! Everything a node creates is released by its lifecycle: property
//! subscriptions, the host element's attachment, chained children, and the
//! context scope.

use std::any::type_name;

use super::keyed::reconcile_keyed;
use super::node::Node;
use super::owner::with_owner;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::host::HostAdapter;
use crate::lifecycle::CleanupSignal;
use crate::source::Source;
use crate::types::{ElementId, NodeFlags, Prop, Props};

/// One keyed child event: mount `Some(node)` under the key, or remove it with `None`.
pub type KeyedChild = (String, Option<Node>);

/// Children handed to a node at construction.
#[derive(Clone, Default)]
pub enum Children {
    #[default]
    None,
    /// Attached once, in order.
    Static(Vec<Node>),
    /// Reconciled by key for the parent's lifetime.
    Keyed(Source<KeyedChild>),
}

impl Children {
    /// Destroy static children that never made it into a tree.
    fn discard(self) {
        if let Children::Static(nodes) = self {
            for node in nodes {
                node.destroy();
            }
        }
    }
}

impl From<Vec<Node>> for Children {
    fn from(nodes: Vec<Node>) -> Self {
        Children::Static(nodes)
    }
}

impl From<Source<KeyedChild>> for Children {
    fn from(source: Source<KeyedChild>) -> Self {
        Children::Keyed(source)
    }
}

impl From<()> for Children {
    fn from(_: ()) -> Self {
        Children::None
    }
}

// =============================================================================
// create_element
// =============================================================================

/// Create a host element node.
///
/// Static props are applied once, in order. Source props are applied on every
/// emission until the node is destroyed.
///
/// # Example
///
/// ```ignore
/// let clicks = Subject::<()>::new();
/// let label = clicks.as_source().scan(0, |n, _| n + 1).map(|n| n.to_string());
///
/// let button = create_element(
///     "button",
///     Props::new()
///         .with("onclick", Value::callback(move || clicks.next(())))
///         .with("textContent", label),
///     (),
/// )?;
/// ```
pub fn create_element(tag: &str, props: Props, children: impl Into<Children>) -> Result<Node> {
    let children = children.into();
    let host = match HostAdapter::current() {
        Ok(host) => host,
        Err(err) => {
            children.discard();
            return Err(err);
        }
    };

    let element = host.create_element(tag);
    let node = Node::new(element, NodeFlags::ELEMENT);

    {
        let host = host.clone();
        node.lifecycle().on_destroy(move || host.remove(element));
    }

    apply_props(&host, &node, element, props);
    attach_children(&host, &node, children);

    Ok(node)
}

fn apply_props(host: &HostAdapter, node: &Node, element: ElementId, props: Props) {
    for (name, prop) in props {
        match prop {
            Prop::Static(value) => host.set_property(element, &name, &value),
            Prop::Source(source) => {
                let host = host.clone();
                let subscription = source.subscribe(move |value| {
                    host.set_property(element, &name, value);
                });
                node.lifecycle().bind(subscription);
            }
        }
    }
}

/// Attach `children` under `parent`'s element and adopt them.
fn attach_children(host: &HostAdapter, parent: &Node, children: Children) {
    match children {
        Children::None => {}
        Children::Static(nodes) => {
            let element = parent.element();
            for child in nodes {
                if child.is_destroyed() {
                    tracing::warn!(child = %child.element(), "skipping destroyed static child");
                    continue;
                }
                host.append_child(element, child.element());
                parent.adopt(&child);
            }
        }
        Children::Keyed(source) => reconcile_keyed(host, parent, source),
    }
}

// =============================================================================
// create_component
// =============================================================================

/// Create a node from a composition function.
///
/// The function receives the props, this node's cleanup signal, and this
/// node's context. The node it returns is adopted: destroyed with this node,
/// reading context through it. This node renders as the returned node's
/// element.
///
/// Every node created while the function runs is owned by this node. On
/// failure, this node is destroyed before returning, which releases everything
/// registered on the cleanup signal along with any node the function already
/// built. The passed static children are destroyed too.
pub fn create_component<P, F>(component: F, props: P, children: impl Into<Children>) -> Result<Node>
where
    F: FnOnce(P, CleanupSignal, Context) -> Result<Node>,
{
    let children = children.into();
    let node = Node::new(ElementId::NONE, NodeFlags::COMPONENT);

    let built = with_owner(node.lifecycle(), || component(props, node.cleanup(), node.context()));
    let child = match built {
        Ok(child) if child.is_destroyed() => Err(Error::Destroyed),
        Ok(child) => Ok(child),
        Err(err) => Err(err.with_component(type_name::<F>())),
    };
    let child = match child {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(component = type_name::<F>(), %err, "component construction failed");
            node.destroy();
            children.discard();
            return Err(err);
        }
    };

    node.delegate_to(&child);
    node.adopt(&child);

    if !matches!(children, Children::None) {
        let host = match HostAdapter::current() {
            Ok(host) => host,
            Err(err) => {
                node.destroy();
                children.discard();
                return Err(err);
            }
        };
        attach_children(&host, &node, children);
    }

    Ok(node)
}
