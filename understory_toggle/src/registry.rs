// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding registry: bound triggers keyed by target expression.
//!
//! A key exists while at least one trigger with that target expression is
//! bound. Bindings are also indexed by listener so an interaction delivered to
//! a listener finds its trigger, and by element for the "is this a trigger"
//! test used by prevention.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_dom::{ElementId, Elements, ListenerId};

use crate::method::ListenerHandles;
use crate::options::Options;

/// One bound trigger.
#[derive(Clone, Debug)]
pub struct Binding {
    /// The trigger element.
    pub element: ElementId,
    /// Its target expression, which is also its registry key.
    pub target: String,
    /// Options the trigger was bound with.
    pub options: Options,
    /// Name of the resolved trigger method.
    pub method: String,
    /// Listeners the method attached.
    pub listeners: ListenerHandles,
}

/// Bound triggers keyed by target expression, in bind order.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    /// slots; `None` marks a freed slot
    slots: Vec<Option<Binding>>,
    free: Vec<usize>,
    /// keys in first-bind order
    keys: Vec<String>,
    by_target: HashMap<String, SmallVec<[usize; 4]>>,
    by_listener: HashMap<ListenerId, usize>,
    /// number of bindings per trigger element
    by_element: HashMap<ElementId, usize>,
}

impl Bindings {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, binding: Binding) {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        for (_, listener) in &binding.listeners {
            self.by_listener.insert(*listener, slot);
        }
        *self.by_element.entry(binding.element).or_insert(0) += 1;
        match self.by_target.get_mut(binding.target.as_str()) {
            Some(entries) => entries.push(slot),
            None => {
                self.keys.push(binding.target.clone());
                self.by_target
                    .insert(binding.target.clone(), SmallVec::from_slice(&[slot]));
            }
        }
        self.slots[slot] = Some(binding);
    }

    /// Remove every binding under `target`, returning them in bind order.
    pub(crate) fn remove_key(&mut self, target: &str) -> Vec<Binding> {
        let Some(entries) = self.by_target.remove(target) else {
            return Vec::new();
        };
        self.keys.retain(|k| k != target);
        let mut out = Vec::with_capacity(entries.len());
        for slot in entries {
            let Some(binding) = self.slots[slot].take() else {
                continue;
            };
            self.free.push(slot);
            for (_, listener) in &binding.listeners {
                self.by_listener.remove(listener);
            }
            if let Some(n) = self.by_element.get_mut(&binding.element) {
                *n -= 1;
                if *n == 0 {
                    self.by_element.remove(&binding.element);
                }
            }
            out.push(binding);
        }
        out
    }

    /// The binding that owns `listener`.
    pub fn by_listener(&self, listener: ListenerId) -> Option<&Binding> {
        let slot = *self.by_listener.get(&listener)?;
        self.slots[slot].as_ref()
    }

    /// Returns true if any trigger is bound under `target`.
    pub fn is_bound(&self, target: &str) -> bool {
        self.by_target.contains_key(target)
    }

    /// Returns true if `el` is a bound trigger.
    pub fn is_trigger(&self, el: ElementId) -> bool {
        self.by_element.contains_key(&el)
    }

    /// Bound target expressions, in first-bind order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    /// Bindings under `target`, in bind order.
    pub fn get(&self, target: &str) -> impl Iterator<Item = &Binding> + '_ {
        self.by_target
            .get(target)
            .into_iter()
            .flatten()
            .filter_map(|&slot| self.slots[slot].as_ref())
    }

    /// Trigger elements bound under `target`, in bind order.
    pub fn elements(&self, target: &str) -> Elements {
        self.get(target).map(|b| b.element).collect()
    }

    /// All bindings, grouped by key in first-bind order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.keys.iter().flat_map(|k| self.get(k))
    }

    /// Number of bound target expressions.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total number of bound triggers across all keys.
    pub fn binding_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use understory_dom::{Document, Element};

    fn binding(doc: &mut Document, target: &str) -> Binding {
        let element = doc.append(doc.root(), Element::new("a").attr("data-toggle", target));
        let listener = doc.add_listener(element, "click").unwrap();
        Binding {
            element,
            target: target.to_string(),
            options: Options::default(),
            method: "button".to_string(),
            listeners: [("click".to_string(), listener)].into_iter().collect(),
        }
    }

    #[test]
    fn keys_exist_while_bound() {
        let mut doc = Document::new();
        let mut reg = Bindings::new();
        let a = binding(&mut doc, "#a");
        let a2 = binding(&mut doc, "#a");
        let b = binding(&mut doc, "#b");
        let (ea, ea2, eb) = (a.element, a2.element, b.element);
        let la = a.listeners[0].1;
        reg.insert(a);
        reg.insert(b);
        reg.insert(a2);

        assert_eq!(reg.keys().collect::<Vec<_>>(), ["#a", "#b"]);
        assert_eq!(reg.elements("#a").as_slice(), &[ea, ea2]);
        assert_eq!(reg.binding_count(), 3);
        assert_eq!(reg.by_listener(la).map(|b| b.element), Some(ea));
        assert!(reg.is_trigger(eb));

        let removed = reg.remove_key("#a");
        assert_eq!(removed.len(), 2);
        assert!(!reg.is_bound("#a"));
        assert!(!reg.is_trigger(ea));
        assert!(reg.by_listener(la).is_none());
        assert_eq!(reg.keys().collect::<Vec<_>>(), ["#b"]);
        assert!(reg.remove_key("#missing").is_empty());
    }

    #[test]
    fn slots_are_reused() {
        let mut doc = Document::new();
        let mut reg = Bindings::new();
        reg.insert(binding(&mut doc, "#a"));
        reg.remove_key("#a");
        reg.insert(binding(&mut doc, "#c"));
        assert_eq!(reg.binding_count(), 1);
        assert_eq!(reg.iter().map(|b| b.target.as_str()).collect::<Vec<_>>(), ["#c"]);
    }
}
