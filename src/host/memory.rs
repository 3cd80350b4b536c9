//! In-memory host for tests and headless use.
//!
//! Elements live in an arena indexed by [`ElementId`]. Each element keeps its
//! tag, ordered properties, parent and ordered children. Every mutation is
//! appended to a log so tests can assert on exactly what the runtime did.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{install_host, Host};
use crate::types::{ElementId, Value};

/// One recorded host call.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create { element: ElementId, tag: String },
    SetProperty { element: ElementId, name: String },
    Append { parent: ElementId, child: ElementId },
    InsertBefore { parent: ElementId, child: ElementId, reference: ElementId },
    Remove { element: ElementId },
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    props: IndexMap<String, Value>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    removals: usize,
}

/// Arena-backed [`Host`] implementation.
#[derive(Debug, Default)]
pub struct MemoryHost {
    elements: RefCell<Vec<ElementData>>,
    log: RefCell<Vec<Mutation>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host and install it on this thread.
    pub fn install() -> Rc<MemoryHost> {
        let host = Rc::new(MemoryHost::new());
        install_host(host.clone());
        host
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tag(&self, element: ElementId) -> Option<String> {
        self.elements
            .borrow()
            .get(element.0)
            .map(|data| data.tag.clone())
    }

    pub fn property(&self, element: ElementId, name: &str) -> Option<Value> {
        self.elements
            .borrow()
            .get(element.0)
            .and_then(|data| data.props.get(name).cloned())
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.elements
            .borrow()
            .get(element.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    pub fn first_child(&self, element: ElementId) -> Option<ElementId> {
        self.children(element).first().copied()
    }

    pub fn is_attached(&self, element: ElementId) -> bool {
        self.parent_of(element).is_some()
    }

    /// How many times `remove_child` was called for `element`.
    pub fn removal_count(&self, element: ElementId) -> usize {
        self.elements
            .borrow()
            .get(element.0)
            .map_or(0, |data| data.removals)
    }

    /// Own `textContent` property when set, else the children's text in order.
    pub fn text_content(&self, element: ElementId) -> String {
        let children = {
            let elements = self.elements.borrow();
            let Some(data) = elements.get(element.0) else {
                return String::new();
            };
            if let Some(own) = data.props.get("textContent") {
                return own.to_text();
            }
            data.children.clone()
        };
        children
            .into_iter()
            .map(|child| self.text_content(child))
            .collect()
    }

    /// Invoke the callback stored under `name`. Returns false when there is none.
    pub fn dispatch(&self, element: ElementId, name: &str) -> bool {
        let callback = self
            .property(element, name)
            .and_then(|value| value.as_callback().cloned());
        match callback {
            Some(callback) => {
                callback.call();
                true
            }
            None => false,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.log.borrow().clone()
    }

    pub fn clear_mutations(&self) {
        self.log.borrow_mut().clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.elements
            .borrow()
            .get(element.0)
            .and_then(|data| data.parent)
    }

    fn record(&self, mutation: Mutation) {
        self.log.borrow_mut().push(mutation);
    }

    fn detach(elements: &mut [ElementData], element: ElementId) {
        let Some(parent) = elements.get(element.0).and_then(|data| data.parent) else {
            return;
        };
        if let Some(parent_data) = elements.get_mut(parent.0) {
            parent_data.children.retain(|c| *c != element);
        }
        if let Some(data) = elements.get_mut(element.0) {
            data.parent = None;
        }
    }

    fn exists(elements: &[ElementData], element: ElementId) -> bool {
        element.0 < elements.len()
    }
}

impl Host for MemoryHost {
    fn create_element(&self, tag: &str) -> ElementId {
        let element = {
            let mut elements = self.elements.borrow_mut();
            elements.push(ElementData {
                tag: tag.to_string(),
                props: IndexMap::new(),
                parent: None,
                children: Vec::new(),
                removals: 0,
            });
            ElementId(elements.len() - 1)
        };
        self.record(Mutation::Create {
            element,
            tag: tag.to_string(),
        });
        element
    }

    fn set_property(&self, element: ElementId, name: &str, value: &Value) {
        if let Some(data) = self.elements.borrow_mut().get_mut(element.0) {
            data.props.insert(name.to_string(), value.clone());
        }
        self.record(Mutation::SetProperty {
            element,
            name: name.to_string(),
        });
    }

    fn append_child(&self, parent: ElementId, child: ElementId) {
        {
            let mut elements = self.elements.borrow_mut();
            if !Self::exists(&elements, parent) || !Self::exists(&elements, child) {
                return;
            }
            Self::detach(&mut elements, child);
            elements[parent.0].children.push(child);
            elements[child.0].parent = Some(parent);
        }
        self.record(Mutation::Append { parent, child });
    }

    fn insert_before(&self, parent: ElementId, child: ElementId, reference: Option<ElementId>) {
        let Some(reference) = reference else {
            self.append_child(parent, child);
            return;
        };
        {
            let mut elements = self.elements.borrow_mut();
            if !Self::exists(&elements, parent) || !Self::exists(&elements, child) {
                return;
            }
            Self::detach(&mut elements, child);
            let siblings = &mut elements[parent.0].children;
            match siblings.iter().position(|c| *c == reference) {
                Some(index) => siblings.insert(index, child),
                None => siblings.push(child),
            }
            elements[child.0].parent = Some(parent);
        }
        self.record(Mutation::InsertBefore {
            parent,
            child,
            reference,
        });
    }

    fn remove_child(&self, element: ElementId) {
        {
            let mut elements = self.elements.borrow_mut();
            if let Some(data) = elements.get_mut(element.0) {
                data.removals += 1;
            }
            Self::detach(&mut elements, element);
        }
        self.record(Mutation::Remove { element });
    }

    fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.parent_of(element)?;
        let elements = self.elements.borrow();
        let siblings = &elements.get(parent.0)?.children;
        let index = siblings.iter().position(|c| *c == element)?;
        siblings.get(index + 1).copied()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.parent_of(element)
    }
}
