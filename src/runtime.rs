//! Thread runtime state.

use crate::config::reset_config;
use crate::context::reset_sequence;
use crate::engine::reset_owners;
use crate::host::uninstall_host;
use crate::pipeline::reset_roots;

/// Reset all runtime state on this thread.
///
/// Clears the installed host, every root slot, the owner stack, the context
/// write counter, and the configuration. Mounted trees are not destroyed; call
/// [`Root::unmount`](crate::Root::unmount) first if they own resources.
///
/// Intended for test isolation.
pub fn reset_runtime() {
    uninstall_host();
    reset_roots();
    reset_owners();
    reset_sequence();
    reset_config();
}
