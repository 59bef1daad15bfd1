// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration: defaults, accessors, and field-wise overrides.

use alloc::string::{String, ToString};

use understory_dom::{Document, ElementId, Elements, Event, query};

use crate::attr;
use crate::engine::PreventContext;
use crate::method::MethodRegistry;
use crate::options::{Options, Tokens};

/// Global pre-emption callback.
///
/// Returning true aborts the pass before any mutation. The event is mutable so
/// a policy can also prevent the native default itself.
pub type PreventingFn = fn(&Document, &mut Event, &PreventContext<'_>) -> bool;

/// Functions reading the declarative markup.
///
/// The defaults read the attributes in [`attr`]. Replace individual functions
/// to support another markup scheme.
#[derive(Clone, Copy, Debug)]
pub struct Accessors {
    /// All trigger elements, in document order.
    pub triggers: fn(&Document) -> Elements,
    /// All triggers declaring exactly this target expression.
    pub same_elements: fn(&Document, &str) -> Elements,
    /// All triggers declaring this group name.
    pub group_elements: fn(&Document, &str) -> Elements,
    /// Target expression of a trigger.
    pub target: fn(&Document, ElementId) -> Option<&str>,
    /// Raw group names of a trigger.
    pub groups: fn(&Document, ElementId) -> Option<&str>,
    /// Raw notification event names of a trigger.
    pub events: fn(&Document, ElementId) -> Option<&str>,
    /// Raw toggle classes of a trigger.
    pub classes: fn(&Document, ElementId) -> Option<&str>,
    /// Trigger method name of a trigger.
    pub method: fn(&Document, ElementId) -> Option<&str>,
    /// Whether a trigger leaves the native default alone.
    pub bubble: fn(&Document, ElementId) -> bool,
}

impl Default for Accessors {
    fn default() -> Self {
        Self {
            triggers: all_triggers,
            same_elements: same_target,
            group_elements: group_members,
            target: target_attr,
            groups: group_attr,
            events: event_attr,
            classes: class_attr,
            method: method_attr,
            bubble: |doc, el| doc.has_attribute(el, attr::BUBBLE),
        }
    }
}

fn target_attr(doc: &Document, el: ElementId) -> Option<&str> {
    doc.attribute(el, attr::TOGGLE)
}

fn group_attr(doc: &Document, el: ElementId) -> Option<&str> {
    doc.attribute(el, attr::GROUP)
}

fn event_attr(doc: &Document, el: ElementId) -> Option<&str> {
    doc.attribute(el, attr::EVENT)
}

fn class_attr(doc: &Document, el: ElementId) -> Option<&str> {
    doc.attribute(el, attr::CLASS)
}

fn method_attr(doc: &Document, el: ElementId) -> Option<&str> {
    doc.attribute(el, attr::METHOD)
}

fn all_triggers(doc: &Document) -> Elements {
    query::query_selector_all(doc, "[data-toggle]")
}

fn same_target(doc: &Document, expr: &str) -> Elements {
    doc.elements()
        .filter(|&el| doc.attribute(el, attr::TOGGLE) == Some(expr))
        .collect()
}

// Word match, like `[data-toggle-group~=name]`.
fn group_members(doc: &Document, group: &str) -> Elements {
    doc.elements()
        .filter(|&el| {
            doc.attribute(el, attr::GROUP)
                .is_some_and(|g| g.split_ascii_whitespace().any(|w| w == group))
        })
        .collect()
}

impl Accessors {
    /// Read the binding options declared on `el`.
    pub fn options(&self, doc: &Document, el: ElementId) -> Options {
        Options {
            groups: (self.groups)(doc, el).map(Tokens::parse).unwrap_or_default(),
            events: (self.events)(doc, el).map(Tokens::parse).unwrap_or_default(),
            classes: (self.classes)(doc, el).map(Tokens::parse),
            method: (self.method)(doc, el).map(ToString::to_string),
            bubble: (self.bubble)(doc, el),
        }
    }

    /// Replace the functions set in `o`.
    pub fn apply(mut self, o: AccessorOverrides) -> Self {
        if let Some(f) = o.triggers {
            self.triggers = f;
        }
        if let Some(f) = o.same_elements {
            self.same_elements = f;
        }
        if let Some(f) = o.group_elements {
            self.group_elements = f;
        }
        if let Some(f) = o.target {
            self.target = f;
        }
        if let Some(f) = o.groups {
            self.groups = f;
        }
        if let Some(f) = o.events {
            self.events = f;
        }
        if let Some(f) = o.classes {
            self.classes = f;
        }
        if let Some(f) = o.method {
            self.method = f;
        }
        if let Some(f) = o.bubble {
            self.bubble = f;
        }
        self
    }
}

/// Per-function overrides for [`Accessors`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessorOverrides {
    /// Replaces [`Accessors::triggers`].
    pub triggers: Option<fn(&Document) -> Elements>,
    /// Replaces [`Accessors::same_elements`].
    pub same_elements: Option<fn(&Document, &str) -> Elements>,
    /// Replaces [`Accessors::group_elements`].
    pub group_elements: Option<fn(&Document, &str) -> Elements>,
    /// Replaces [`Accessors::target`].
    pub target: Option<fn(&Document, ElementId) -> Option<&str>>,
    /// Replaces [`Accessors::groups`].
    pub groups: Option<fn(&Document, ElementId) -> Option<&str>>,
    /// Replaces [`Accessors::events`].
    pub events: Option<fn(&Document, ElementId) -> Option<&str>>,
    /// Replaces [`Accessors::classes`].
    pub classes: Option<fn(&Document, ElementId) -> Option<&str>>,
    /// Replaces [`Accessors::method`].
    pub method: Option<fn(&Document, ElementId) -> Option<&str>>,
    /// Replaces [`Accessors::bubble`].
    pub bubble: Option<fn(&Document, ElementId) -> bool>,
}

/// Engine configuration.
///
/// Start from [`Config::default`] and either set fields directly or resolve an
/// [`Overrides`] over it with [`Config::with_overrides`].
///
/// ```rust
/// use understory_toggle::{Config, Overrides, Tokens};
///
/// let config = Config::with_overrides(Overrides {
///     active_classes: Some(Tokens::from("is-open")),
///     ..Overrides::default()
/// });
/// assert_eq!(&*config.active_classes, &["is-open"]);
/// assert_eq!(config.default_method, "button");
/// ```
#[derive(Debug)]
pub struct Config {
    /// Classes toggled when a trigger declares none. Default: `active`.
    pub active_classes: Tokens,
    /// Method used when a trigger names none or an unknown one. Default: `button`.
    pub default_method: String,
    /// Global pre-emption callback. Default: none.
    pub preventing: Option<PreventingFn>,
    /// Registered trigger methods. Default: `button`, `state`.
    pub methods: MethodRegistry,
    /// Markup accessors.
    pub accessors: Accessors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_classes: Tokens::from("active"),
            default_method: "button".to_string(),
            preventing: None,
            methods: MethodRegistry::new(),
            accessors: Accessors::default(),
        }
    }
}

impl Config {
    /// Defaults with `overrides` resolved over them.
    pub fn with_overrides(overrides: Overrides) -> Self {
        Self::default().apply(overrides)
    }

    /// Resolve `overrides` field by field; unset fields keep their value.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        let Overrides {
            active_classes,
            default_method,
            preventing,
            methods,
            accessors,
        } = overrides;
        if let Some(classes) = active_classes {
            self.active_classes = classes;
        }
        if let Some(method) = default_method {
            self.default_method = method;
        }
        if preventing.is_some() {
            self.preventing = preventing;
        }
        if let Some(methods) = methods {
            self.methods = methods;
        }
        self.accessors = self.accessors.apply(accessors);
        self
    }
}

/// Optional replacements for [`Config`] fields.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Replaces [`Config::active_classes`].
    pub active_classes: Option<Tokens>,
    /// Replaces [`Config::default_method`].
    pub default_method: Option<String>,
    /// Replaces [`Config::preventing`].
    pub preventing: Option<PreventingFn>,
    /// Replaces [`Config::methods`].
    pub methods: Option<MethodRegistry>,
    /// Replaces individual [`Config::accessors`] functions.
    pub accessors: AccessorOverrides,
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_dom::Element;

    #[test]
    fn default_accessors_read_markup() {
        let mut doc = Document::new();
        let t = doc.append(
            doc.root(),
            Element::new("a")
                .attr("data-toggle", "#panel")
                .attr("data-toggle-group", "tabs nav")
                .attr("data-toggle-event", "toggled")
                .attr("data-toggle-method", "state")
                .attr("data-toggle-bubble", ""),
        );
        let other = doc.append(
            doc.root(),
            Element::new("a")
                .attr("data-toggle", "#other")
                .attr("data-toggle-group", "navigation"),
        );
        let a = Accessors::default();
        assert_eq!((a.triggers)(&doc).as_slice(), &[t, other]);
        assert_eq!((a.same_elements)(&doc, "#panel").as_slice(), &[t]);
        assert_eq!((a.group_elements)(&doc, "nav").as_slice(), &[t]);

        let opts = a.options(&doc, t);
        assert_eq!(&*opts.groups, &["tabs", "nav"]);
        assert_eq!(&*opts.events, &["toggled"]);
        assert_eq!(opts.classes, None);
        assert_eq!(opts.method.as_deref(), Some("state"));
        assert!(opts.bubble);
        assert!(!a.options(&doc, other).bubble);
    }

    #[test]
    fn overrides_resolve_field_by_field() {
        fn never(_: &Document) -> Elements {
            Elements::new()
        }
        let config = Config::with_overrides(Overrides {
            default_method: Some("state".to_string()),
            accessors: AccessorOverrides {
                triggers: Some(never),
                ..AccessorOverrides::default()
            },
            ..Overrides::default()
        });
        assert_eq!(&*config.active_classes, &["active"]);
        assert_eq!(config.default_method, "state");
        assert_eq!(config.methods.len(), 2);

        let mut doc = Document::new();
        let t = doc.append(doc.root(), Element::new("a").attr("data-toggle", "#x"));
        assert!((config.accessors.triggers)(&doc).is_empty());
        assert_eq!((config.accessors.target)(&doc, t), Some("#x"));
    }
}
