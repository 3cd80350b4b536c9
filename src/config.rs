//! Runtime configuration signals.
//!
//! Configuration is thread-local and held in a reactive signal, so anything
//! that cares can track it. Values are read at node construction time; nodes
//! already built keep the behavior they were built with.

use std::cell::RefCell;

use spark_signals::{signal, Signal};

/// How the conditional switcher mounts its branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchMount {
    /// The truthy branch mounts at construction.
    #[default]
    Eager,
    /// A wrapper element is created; nothing mounts until the first value.
    Deferred,
}

impl SwitchMount {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eager" => Some(SwitchMount::Eager),
            "deferred" => Some(SwitchMount::Deferred),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub switch_mount: SwitchMount,
    /// Tag of the wrapper element created by deferred switchers.
    pub deferred_wrapper_tag: String,
    /// Emit a `trace!` event for every host mutation.
    pub trace_host_mutations: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            switch_mount: SwitchMount::Eager,
            deferred_wrapper_tag: "div".to_string(),
            trace_host_mutations: false,
        }
    }
}

pub const ENV_SWITCH_MOUNT: &str = "SPARK_PIPE_SWITCH_MOUNT";
pub const ENV_TRACE_HOST: &str = "SPARK_PIPE_TRACE_HOST";

thread_local! {
    static CONFIG: RefCell<Signal<RuntimeConfig>> = RefCell::new(signal(RuntimeConfig::default()));
}

/// Get the current configuration.
pub fn config() -> RuntimeConfig {
    CONFIG.with(|c| c.borrow().get())
}

/// Replace the configuration.
pub fn set_config(config: RuntimeConfig) {
    CONFIG.with(|c| c.borrow().set(config));
}

/// Modify the configuration in place.
pub fn update_config(f: impl FnOnce(&mut RuntimeConfig)) {
    let mut next = config();
    f(&mut next);
    set_config(next);
}

/// Get the configuration signal for reactive tracking.
pub fn config_signal() -> Signal<RuntimeConfig> {
    CONFIG.with(|c| c.borrow().clone())
}

pub fn reset_config() {
    set_config(RuntimeConfig::default());
}

/// Apply `SPARK_PIPE_SWITCH_MOUNT` and `SPARK_PIPE_TRACE_HOST` over the current configuration.
///
/// Unset variables leave the current value alone. Unrecognized values are
/// logged and ignored.
pub fn load_config_from_env() -> RuntimeConfig {
    let lookup = |name: &str| std::env::var(name).ok();
    apply_overrides(lookup);
    config()
}

fn apply_overrides(lookup: impl Fn(&str) -> Option<String>) {
    update_config(|config| {
        if let Some(raw) = lookup(ENV_SWITCH_MOUNT) {
            match SwitchMount::parse(&raw) {
                Some(mode) => config.switch_mount = mode,
                None => tracing::warn!(value = %raw, "unrecognized {}", ENV_SWITCH_MOUNT),
            }
        }
        if let Some(raw) = lookup(ENV_TRACE_HOST) {
            config.trace_host_mutations = matches!(raw.trim(), "1" | "true" | "TRUE" | "yes");
        }
    });
}
