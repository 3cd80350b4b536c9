//! Pipeline - Attaching node trees to host containers.
//!
//! ```text
//! create_root(container) → Root::render(node) → host append
//!                        → Root::unmount()    → node lifecycle fires
//! ```

mod mount;

pub use mount::{create_root, Root};
pub(crate) use mount::reset_roots;
