// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::{ButtonMethod, StateMethod, TriggerMethod};

/// Named trigger methods in registration order.
///
/// Order matters: pre-emption asks every method in this order and stops at
/// the first that pre-empts.
#[derive(Debug)]
pub struct MethodRegistry {
    methods: Vec<(String, Box<dyn TriggerMethod>)>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRegistry {
    /// A registry holding the built-ins, `"button"` then `"state"`.
    pub fn new() -> Self {
        let mut r = Self::empty();
        r.register("button", ButtonMethod);
        r.register("state", StateMethod);
        r
    }

    /// A registry with no methods.
    pub fn empty() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Register `method` under `name`.
    ///
    /// Replacing an existing name keeps its position and returns the old method.
    pub fn register(
        &mut self,
        name: &str,
        method: impl TriggerMethod + 'static,
    ) -> Option<Box<dyn TriggerMethod>> {
        let method: Box<dyn TriggerMethod> = Box::new(method);
        if let Some(slot) = self.methods.iter_mut().find(|(n, _)| n == name) {
            return Some(core::mem::replace(&mut slot.1, method));
        }
        self.methods.push((name.to_string(), method));
        None
    }

    /// Look a method up by name.
    pub fn get(&self, name: &str) -> Option<&dyn TriggerMethod> {
        self.methods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.as_ref())
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve a requested method, falling back to `default` for unknown or absent names.
    ///
    /// Returns the registered name with the method, or `None` if `default`
    /// is not registered either.
    pub fn select(
        &self,
        requested: Option<&str>,
        default: &str,
    ) -> Option<(&str, &dyn TriggerMethod)> {
        if let Some(name) = requested {
            if let Some(found) = self.find(name) {
                return Some(found);
            }
            tracing::debug!(method = name, fallback = default, "unknown trigger method");
        }
        self.find(default)
    }

    /// Registered methods in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn TriggerMethod)> + '_ {
        self.methods.iter().map(|(n, m)| (n.as_str(), m.as_ref()))
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if no method is registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    fn find(&self, name: &str) -> Option<(&str, &dyn TriggerMethod)> {
        self.iter().find(|(n, _)| *n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_in_order() {
        let r = MethodRegistry::new();
        let names: Vec<&str> = r.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["button", "state"]);
        assert!(MethodRegistry::empty().is_empty());
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        let r = MethodRegistry::new();
        assert_eq!(r.select(Some("state"), "button").map(|(n, _)| n), Some("state"));
        assert_eq!(r.select(Some("swipe"), "button").map(|(n, _)| n), Some("button"));
        assert_eq!(r.select(None, "button").map(|(n, _)| n), Some("button"));
        assert!(r.select(Some("swipe"), "missing").is_none());
    }

    #[test]
    fn replacing_keeps_position() {
        let mut r = MethodRegistry::new();
        assert!(r.register("button", StateMethod).is_some());
        assert!(r.register("custom", ButtonMethod).is_none());
        let names: Vec<&str> = r.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["button", "state", "custom"]);
    }
}
