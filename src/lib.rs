//! # spark-pipe
//!
//! Push-based reactive UI runtime for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): signals
//! can be bound to node properties next to ordinary push streams.
//!
//! ## Architecture
//!
//! A node tree is composed from declarative descriptions. Each node binds its
//! properties to value sources and keeps a host display element in sync with
//! them. Every subscription a node creates is owned by its lifecycle, so tearing
//! down a node, or the whole tree, leaves nothing dangling.
//!
//! ```text
//! Root::render → create_component / create_element
//!                  ├── static children
//!                  ├── keyed children   (reconciled in place by key)
//!                  └── ternary          (branch swapped on change)
//!                context flows down every level
//! ```
//!
//! ## Modules
//!
//! - [`source`] - Subjects, sources, subscriptions and operators
//! - [`lifecycle`] - Single-fire teardown with explicit chaining
//! - [`context`] - Downward-only scoped key/value channel
//! - [`engine`] - Nodes, `create_element`, `create_component`, keyed reconciliation
//! - [`primitives`] - `ternary` conditional switcher
//! - [`pipeline`] - Root containers
//! - [`host`] - Host display trait and the in-memory host
//! - [`config`] - Runtime configuration signals
//!
//! ## Example
//!
//! ```ignore
//! use spark_pipe::*;
//!
//! let host = MemoryHost::install();
//! let root = create_root(host.create_element("div"));
//!
//! let counter = create_component(
//!     |_: (), _cleanup, _ctx| {
//!         let clicks = Subject::<()>::new();
//!         let count = clicks.as_source().scan(0, |n, _| n + 1).map(|n| n.to_string());
//!         create_element(
//!             "button",
//!             Props::new()
//!                 .with("onclick", Value::callback(move || clicks.next(())))
//!                 .with("textContent", count),
//!             (),
//!         )
//!     },
//!     (),
//!     (),
//! )?;
//!
//! root.render(counter)?;
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod pipeline;
pub mod primitives;
pub mod runtime;
pub mod source;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{
    config, config_signal, load_config_from_env, reset_config, set_config, update_config,
    RuntimeConfig, SwitchMount,
};
pub use context::Context;
pub use engine::{create_component, create_element, Children, KeyedChild, Node};
pub use error::{Error, Result};
pub use host::{current_host, install_host, uninstall_host, Host, MemoryHost, Mutation};
pub use lifecycle::{CleanupSignal, Lifecycle};
pub use pipeline::{create_root, Root};
pub use primitives::{ternary, ternary_with};
pub use runtime::reset_runtime;
pub use source::{BehaviorSubject, Observer, Source, Subject, Subscription};
