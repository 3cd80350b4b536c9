//! Primitives - Building blocks composed on top of the engine.
//!
//! - [`ternary`] - Swap between two subtrees on a boolean source
//! - [`ternary_with`] - Same, with an explicit [`SwitchMount`](crate::config::SwitchMount)

mod control_flow;

pub use control_flow::{ternary, ternary_with};
