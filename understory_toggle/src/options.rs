// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-binding options: groups, events, classes, method, and bubbling.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::Deref;

use smallvec::SmallVec;

/// A list of names, given either as a space-delimited string or as a list.
///
/// Empty names are dropped, so `"a  b"` and `["a", "", "b"]` both yield `a`, `b`.
///
/// ```rust
/// use understory_toggle::Tokens;
///
/// let t = Tokens::from("tabs  nav");
/// assert_eq!(&*t, &["tabs", "nav"]);
/// assert_eq!(Tokens::from(vec!["open".to_string()]).len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tokens(SmallVec<[String; 2]>);

impl Tokens {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a space-delimited string.
    pub fn parse(src: &str) -> Self {
        src.split_ascii_whitespace().map(ToString::to_string).collect()
    }

    /// Returns true if `name` is in the list.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }
}

impl Deref for Tokens {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Tokens {
    fn from(src: &str) -> Self {
        Self::parse(src)
    }
}

impl From<Vec<String>> for Tokens {
    fn from(list: Vec<String>) -> Self {
        list.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Tokens {
    fn from(list: [&str; N]) -> Self {
        list.into_iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<String> for Tokens {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|t| !t.is_empty()).collect())
    }
}

/// Options of one trigger binding.
///
/// Bootstrap reads them from the trigger's attributes; explicit
/// [`Toggler::bind`](crate::Toggler::bind) calls build them directly.
///
/// ```rust
/// use understory_toggle::Options;
///
/// let opts = Options::new().with_groups("tabs").with_classes("open shown");
/// assert!(opts.groups.contains("tabs"));
/// assert_eq!(opts.classes.as_deref().map(<[String]>::len), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Groups this trigger belongs to.
    pub groups: Tokens,
    /// Notifications dispatched on state changes.
    pub events: Tokens,
    /// Classes to toggle. `None` or an empty list means the configured defaults.
    pub classes: Option<Tokens>,
    /// Trigger method name. `None` means the configured default.
    pub method: Option<String>,
    /// Leave the native default action alone.
    pub bubble: bool,
}

impl Options {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the groups.
    pub fn with_groups(mut self, groups: impl Into<Tokens>) -> Self {
        self.groups = groups.into();
        self
    }

    /// Set the notification event names.
    pub fn with_events(mut self, events: impl Into<Tokens>) -> Self {
        self.events = events.into();
        self
    }

    /// Override the toggle classes.
    pub fn with_classes(mut self, classes: impl Into<Tokens>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    /// Override the trigger method.
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    /// Set whether the native default action is left alone.
    pub fn with_bubble(mut self, bubble: bool) -> Self {
        self.bubble = bubble;
        self
    }

    /// The classes to toggle, falling back to `defaults` when unset or empty.
    pub fn classes_or<'a>(&'a self, defaults: &'a Tokens) -> &'a [String] {
        match &self.classes {
            Some(c) if !c.is_empty() => c,
            _ => defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn tokens_from_string_and_list_agree() {
        let a = Tokens::from(" open  shown ");
        let b = Tokens::from(vec!["open".to_string(), String::new(), "shown".to_string()]);
        assert_eq!(a, b);
        assert_eq!(Tokens::from(["open", "shown"]), a);
        assert!(Tokens::from("   ").is_empty());
    }

    #[test]
    fn empty_class_override_falls_back() {
        let defaults = Tokens::from("active");
        assert_eq!(Options::new().classes_or(&defaults), &["active"]);
        assert_eq!(
            Options::new().with_classes("").classes_or(&defaults),
            &["active"]
        );
        assert_eq!(
            Options::new().with_classes("open").classes_or(&defaults),
            &["open"]
        );
    }
}
