//! Composition engine - Nodes and how they are built.
//!
//! - Node: handle owning a lifecycle, a context scope and a host element
//! - create: `create_element` / `create_component`
//! - keyed: in-place reconciliation of keyed child streams
//! - owner: the lifecycle claiming nodes while a composition function runs
//!
//! # Ownership
//!
//! ```text
//! component ──delegates──▶ div ──chains──▶ p, p, ...
//!     │                     │
//!     └── lifecycle ────────┴── destroy flows down, never up
//! ```

mod create;
mod keyed;
mod node;
mod owner;

pub use create::{create_component, create_element, Children, KeyedChild};
pub use node::Node;
pub(crate) use owner::{reset_owners, with_owner};
