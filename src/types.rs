//! Core types for spark-pipe.
//!
//! These types cross the boundary between the runtime and the host display
//! system: element handles, property values, and property bindings.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use spark_signals::Signal;

use crate::source::Source;

// =============================================================================
// Element Handle
// =============================================================================

/// Opaque handle to a host display element.
///
/// The runtime never looks inside; it only passes handles back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl ElementId {
    /// Placeholder for nodes whose element is owned by another node.
    pub(crate) const NONE: ElementId = ElementId(usize::MAX);
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Callback
// =============================================================================

/// Event handler stored as a property value (e.g. `onclick`).
///
/// Compared by identity.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)();
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

// =============================================================================
// Value
// =============================================================================

/// A property value applied to a host element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Callback(Callback),
}

impl Value {
    /// Textual form, as a host would render it in text content.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null | Value::Callback(_) => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) => s.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    /// Wrap a closure as an event handler value.
    pub fn callback(f: impl Fn() + 'static) -> Self {
        Value::Callback(Callback::new(f))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Callback> for Value {
    fn from(value: Callback) -> Self {
        Value::Callback(value)
    }
}

// =============================================================================
// Prop - Static or reactive property binding
// =============================================================================

/// A property binding: applied once, or re-applied on every emission.
///
/// The key is to pass sources directly - don't read a value out before binding!
///
/// ```ignore
/// // CORRECT - stays connected for the node's lifetime
/// Props::new().with("textContent", label.as_source());
///
/// // WRONG - applied once, never updates
/// Props::new().with("textContent", label.value());
/// ```
#[derive(Clone)]
pub enum Prop {
    /// Applied once at construction.
    Static(Value),
    /// Subscribed until the node is destroyed.
    Source(Source<Value>),
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Static(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Static(value.into())
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Static(value.into())
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Static(value.into())
    }
}

impl From<i64> for Prop {
    fn from(value: i64) -> Self {
        Prop::Static(value.into())
    }
}

impl From<i32> for Prop {
    fn from(value: i32) -> Self {
        Prop::Static(value.into())
    }
}

impl From<f64> for Prop {
    fn from(value: f64) -> Self {
        Prop::Static(value.into())
    }
}

impl From<Callback> for Prop {
    fn from(value: Callback) -> Self {
        Prop::Static(value.into())
    }
}

impl<T: Clone + Into<Value> + 'static> From<Source<T>> for Prop {
    fn from(source: Source<T>) -> Self {
        Prop::Source(source.map(|value: &T| value.clone().into()))
    }
}

impl<T: Clone + PartialEq + Into<Value> + 'static> From<Signal<T>> for Prop {
    fn from(signal: Signal<T>) -> Self {
        Source::from_signal(signal).into()
    }
}

// =============================================================================
// Props
// =============================================================================

/// Ordered property map for display elements.
///
/// Properties are applied in insertion order; setting a name twice keeps the
/// first position and the last value.
#[derive(Clone, Default)]
pub struct Props {
    entries: IndexMap<String, Prop>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.insert(name, prop);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, prop: impl Into<Prop>) {
        self.entries.insert(name.into(), prop.into());
    }

    pub fn get(&self, name: &str) -> Option<&Prop> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Props {
    type Item = (String, Prop);
    type IntoIter = indexmap::map::IntoIter<String, Prop>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// Node Flags
// =============================================================================

bitflags::bitflags! {
    /// What a node is and what it manages.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// Owns a host element it created.
        const ELEMENT = 1 << 0;
        /// Delegates its element to the node its composition function returned.
        const COMPONENT = 1 << 1;
        /// Element follows the mounted branch of a conditional switcher.
        const SWITCHER = 1 << 2;
        /// Children come from a keyed stream.
        const KEYED = 1 << 3;
        /// Lifecycle has fired.
        const DESTROYED = 1 << 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_text() {
        assert_eq!(Value::from("foo").to_text(), "foo");
        assert_eq!(Value::from(42).to_text(), "42");
        assert_eq!(Value::from(true).to_text(), "true");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::callback(|| {}).to_text(), "");
    }

    #[test]
    fn test_callback_identity() {
        let a = Callback::new(|| {});
        let b = Callback::new(|| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_props_keep_first_position_last_value() {
        let props = Props::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);

        let entries: Vec<(String, Value)> = props
            .into_iter()
            .map(|(name, prop)| match prop {
                Prop::Static(v) => (name, v),
                Prop::Source(_) => (name, Value::Null),
            })
            .collect();

        assert_eq!(
            entries,
            vec![("a".to_string(), Value::Int(3)), ("b".to_string(), Value::Int(2))]
        );
    }
}
