// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, class lists, listeners.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::types::{Element, ElementId, ElementState, ListenerId};

/// An element tree with a single root.
///
/// Elements are addressed by generational [`ElementId`] handles. Removing an
/// element frees its slot; handles to it (and to its subtree) become stale and
/// every accessor answers `None`, `false`, or does nothing for them.
///
/// Elements inserted without a parent are *detached*: they keep their data and
/// listeners but do not take part in document-order queries until reparented
/// under the root.
///
/// ## Example
///
/// ```rust
/// use understory_dom::{Document, Element};
///
/// let mut doc = Document::new();
/// let panel = doc.append(doc.root(), Element::new("div").id("panel"));
/// assert_eq!(doc.get_element_by_id("panel"), Some(panel));
///
/// doc.add_class(panel, "open");
/// assert!(doc.has_class(panel, "open"));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
    next_listener: u64,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Registration {
    event: String,
    id: ListenerId,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: Element,
    listeners: SmallVec<[Registration; 2]>,
}

impl Node {
    fn new(generation: u32, data: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
            listeners: SmallVec::new(),
        }
    }
}

impl Document {
    /// Create a document containing only an `html` root element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 0),
            next_listener: 1,
        };
        doc.root = doc.insert(None, Element::new("html"));
        doc
    }

    /// The root element. It cannot be removed.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Insert a new element as the last child of `parent`, or detached if `None`.
    ///
    /// A stale `parent` also yields a detached element.
    pub fn insert(&mut self, parent: Option<ElementId>, data: Element) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Insert a new element as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, data: Element) -> ElementId {
        self.insert(Some(parent), data)
    }

    /// Remove an element and its subtree, along with their listener registrations.
    ///
    /// Removing the root is ignored.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` to the end of `new_parent`'s children, or detach it if `None`.
    ///
    /// Moves that would create a cycle, or that involve the root or stale
    /// handles, are ignored.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.contains(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if `id` is live and reachable from the root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.contains(self.root, id)
    }

    /// Parent of a live element.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live element in order; empty for stale handles.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent_of(id),
        }
    }

    /// Inclusive containment: true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: ElementId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if self.is_alive(id) {
            stack.push(id);
        }
        Descendants { doc: self, stack }
    }

    /// All connected elements in document order, root first.
    pub fn elements(&self) -> Descendants<'_> {
        self.descendants(self.root)
    }

    /// Lower-case tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node_opt(id).map(|n| n.data.tag.as_str())
    }

    /// Attribute value of a live element. `class` is not an attribute here; see [`Document::classes`].
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node_opt(id)?
            .data
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the attribute is present (with any value).
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute. Setting `class` replaces the class list.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data = core::mem::take(&mut n.data).attr(name, value);
        }
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> bool {
        let Some(n) = self.node_opt_mut(id) else {
            return false;
        };
        let before = n.data.attributes.len();
        n.data.attributes.retain(|(k, _)| k != name);
        n.data.attributes.len() != before
    }

    /// First connected element in document order whose `id` attribute equals `value`.
    pub fn get_element_by_id(&self, value: &str) -> Option<ElementId> {
        self.elements()
            .find(|&el| self.attribute(el, "id") == Some(value))
    }

    /// Class list of a live element; empty for stale handles.
    pub fn classes(&self, id: ElementId) -> &[String] {
        self.node_opt(id).map(|n| n.data.classes.as_slice()).unwrap_or(&[])
    }

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    /// Add `class`. Returns true if the class list changed.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        if class.is_empty() || self.has_class(id, class) {
            return false;
        }
        match self.node_opt_mut(id) {
            Some(n) => {
                n.data.classes.push(class.to_string());
                true
            }
            None => false,
        }
    }

    /// Remove `class`. Returns true if the class list changed.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        let Some(n) = self.node_opt_mut(id) else {
            return false;
        };
        let before = n.data.classes.len();
        n.data.classes.retain(|c| c != class);
        n.data.classes.len() != before
    }

    /// Flip `class`. Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class)
        }
    }

    /// Native state flags of a live element.
    pub fn state(&self, id: ElementId) -> Option<ElementState> {
        self.node_opt(id).map(|n| n.data.state)
    }

    /// Returns true if the element is checked.
    pub fn is_checked(&self, id: ElementId) -> bool {
        self.state(id)
            .is_some_and(|s| s.contains(ElementState::CHECKED))
    }

    /// Set the native checked state. This does not raise a `change` event.
    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.state.set(ElementState::CHECKED, checked);
        }
    }

    /// Returns true for `<input type="checkbox">` and `<input type="radio">`.
    pub fn is_checkable(&self, id: ElementId) -> bool {
        self.tag(id) == Some("input")
            && self
                .attribute(id, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio"))
    }

    /// Register a listener for `event` on a live element.
    ///
    /// The document only records the registration; whoever owns the handle
    /// decides what running it means (see [`crate::dispatch`]).
    pub fn add_listener(&mut self, id: ElementId, event: &str) -> Option<ListenerId> {
        let listener = ListenerId(self.next_listener);
        let n = self.node_opt_mut(id)?;
        n.listeners.push(Registration {
            event: event.to_string(),
            id: listener,
        });
        self.next_listener += 1;
        Some(listener)
    }

    /// Remove a listener registration. Returns true if it was registered on `id`.
    pub fn remove_listener(&mut self, id: ElementId, listener: ListenerId) -> bool {
        let Some(n) = self.node_opt_mut(id) else {
            return false;
        };
        let before = n.listeners.len();
        n.listeners.retain(|r| r.id != listener);
        n.listeners.len() != before
    }

    /// Listeners registered for `event` on `id`, in registration order.
    pub fn listeners<'a>(
        &'a self,
        id: ElementId,
        event: &'a str,
    ) -> impl Iterator<Item = ListenerId> + 'a {
        self.node_opt(id)
            .into_iter()
            .flat_map(|n| n.listeners.iter())
            .filter(move |r| r.event == event)
            .map(|r| r.id)
    }

    /// Total number of listener registrations on live elements.
    pub fn listener_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .map(|n| n.listeners.len())
            .sum()
    }

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.retain(|&c| c != id);
        self.node_mut(id).parent = None;
    }
}

/// Iterator over the ancestors of an element, nearest first.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let cur = self.next?;
        self.next = self.doc.parent_of(cur);
        Some(cur)
    }
}

/// Pre-order iterator over a subtree.
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<ElementId>,
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let cur = self.stack.pop()?;
        self.stack
            .extend(self.doc.children_of(cur).iter().rev().copied());
        Some(cur)
    }
}
