// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The embedder-facing engine instance.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;
use understory_dom::dispatch::{self, Outcome};
use understory_dom::notify::Notifier;
use understory_dom::query::ElementRef;
use understory_dom::{Document, ElementId, Event, ListenerId};

use crate::config::Config;
use crate::engine;
use crate::method::Payload;
use crate::options::Options;
use crate::registry::{Binding, Bindings};

/// A toggle engine bound to one document.
///
/// A `Toggler` owns its configuration and binding registry; several
/// independent instances may serve different documents. Interactions reach
/// it through [`Toggler::handle`].
///
/// ## Example
///
/// ```rust
/// use understory_dom::notify::NotificationLog;
/// use understory_dom::{Document, Element, Event};
/// use understory_toggle::{Config, LoadMode, Toggler};
///
/// let mut doc = Document::new();
/// let panel = doc.append(doc.root(), Element::new("div").id("panel"));
/// let button = doc.append(
///     doc.root(),
///     Element::new("button")
///         .attr("data-toggle", "#panel")
///         .attr("data-toggle-class", "open")
///         .attr("data-toggle-event", "toggled"),
/// );
///
/// let mut toggler = Toggler::new(Config::default());
/// toggler.start(&mut doc, LoadMode::Direct);
///
/// let mut log = NotificationLog::new();
/// let mut click = Event::click(button);
/// toggler.handle(&mut doc, &mut log, &mut click);
///
/// assert!(doc.has_class(panel, "open"));
/// assert!(doc.has_class(button, "open"));
/// assert!(click.default_prevented());
/// assert_eq!(log.entries()[0].status, true);
/// ```
#[derive(Debug)]
pub struct Toggler {
    pub(crate) config: Config,
    pub(crate) bindings: Bindings,
    /// one-shot load listeners registered by deferred starts
    pub(crate) pending_loads: Vec<(ElementId, ListenerId)>,
}

impl Toggler {
    /// Create an engine with no bindings.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            bindings: Bindings::new(),
            pending_loads: Vec::new(),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The binding registry.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Bind `element` as a trigger for `target`.
    ///
    /// The trigger method is `options.method`, falling back to the configured
    /// default. Returns false, binding nothing, if `element` is stale or no
    /// method resolves.
    pub fn bind(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        target: &str,
        options: Options,
    ) -> bool {
        if !doc.is_alive(element) {
            tracing::debug!(?element, target, "skipping bind of stale element");
            return false;
        }
        let Some((name, method)) = self
            .config
            .methods
            .select(options.method.as_deref(), &self.config.default_method)
        else {
            tracing::debug!(
                ?element,
                target,
                default = self.config.default_method.as_str(),
                "no trigger method resolves"
            );
            return false;
        };
        let listeners = method.attach(doc, element);
        tracing::debug!(?element, target, method = name, listeners = listeners.len(), "bound trigger");
        let binding = Binding {
            element,
            target: target.to_string(),
            options,
            method: name.to_string(),
            listeners,
        };
        self.bindings.insert(binding);
        true
    }

    /// Discover and bind every trigger in the document, in document order.
    ///
    /// Returns the number of triggers bound.
    pub fn bind_all(&mut self, doc: &mut Document) -> usize {
        let accessors = self.config.accessors;
        let mut bound = 0;
        for element in (accessors.triggers)(doc) {
            let Some(target) = (accessors.target)(doc, element).map(String::from) else {
                continue;
            };
            let options = accessors.options(doc, element);
            if self.bind(doc, element, &target, options) {
                bound += 1;
            }
        }
        tracing::debug!(bound, keys = self.bindings.len(), "bound all triggers");
        bound
    }

    /// Detach every trigger bound under `target` and forget the key.
    ///
    /// Returns false if nothing was bound under `target`.
    pub fn unbind(&mut self, doc: &mut Document, target: &str) -> bool {
        let removed = self.bindings.remove_key(target);
        for binding in &removed {
            for (_, listener) in &binding.listeners {
                doc.remove_listener(binding.element, *listener);
            }
        }
        if !removed.is_empty() {
            tracing::debug!(target, triggers = removed.len(), "unbound");
        }
        !removed.is_empty()
    }

    /// Unbind every key.
    pub fn unbind_all(&mut self, doc: &mut Document) {
        let keys: Vec<String> = self.bindings.keys().map(String::from).collect();
        for key in keys {
            self.unbind(doc, &key);
        }
    }

    /// Unbind everything, then bind everything found in the document.
    ///
    /// Use after adding or removing triggers. Returns the number of triggers bound.
    pub fn refresh(&mut self, doc: &mut Document) -> usize {
        self.unbind_all(doc);
        self.bind_all(doc)
    }

    /// Run one toggle pass directly, outside of listener delivery.
    ///
    /// See [`engine::toggle`] for the pass and its return value.
    pub fn toggle<N: Notifier + ?Sized>(
        &self,
        doc: &mut Document,
        notifier: &mut N,
        event: &mut Event,
        element: ElementRef<'_>,
        target: ElementRef<'_>,
        options: &Options,
        payload: Payload,
    ) -> bool {
        engine::toggle(
            &self.config,
            &self.bindings,
            doc,
            notifier,
            event,
            element,
            target,
            options,
            payload,
        )
    }

    /// Deliver a native interaction.
    ///
    /// The event is routed along its bubble path; every bound listener it
    /// reaches asks its trigger method for a toggle request and runs a pass.
    /// Listeners skip their pass when an earlier one already prevented the
    /// default. A `load` event completes pending deferred starts.
    ///
    /// Returns the number of passes run.
    pub fn handle<N: Notifier + ?Sized>(
        &mut self,
        doc: &mut Document,
        notifier: &mut N,
        event: &mut Event,
    ) -> usize {
        let seq = dispatch::route(doc, event);
        let mut passes = 0;
        let mut loads: SmallVec<[ListenerId; 1]> = SmallVec::new();
        let (config, bindings, pending) = (&self.config, &self.bindings, &self.pending_loads);
        dispatch::run(&seq, event, |d, ev| {
            if pending.iter().any(|&(_, l)| l == d.listener) {
                loads.push(d.listener);
                return Outcome::Continue;
            }
            let Some(binding) = bindings.by_listener(d.listener) else {
                return Outcome::Continue;
            };
            let Some(method) = config.methods.get(&binding.method) else {
                return Outcome::Continue;
            };
            let Some(payload) = method.fire(doc, binding.element, ev) else {
                return Outcome::Continue;
            };
            if ev.default_prevented() {
                tracing::trace!(element = ?binding.element, "default already prevented, skipping");
                return Outcome::Continue;
            }
            engine::toggle(
                config,
                bindings,
                doc,
                notifier,
                ev,
                ElementRef::Element(binding.element),
                ElementRef::Selector(&binding.target),
                &binding.options,
                payload,
            );
            passes += 1;
            Outcome::Continue
        });
        for listener in loads {
            self.complete_load(doc, listener);
        }
        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoadMode;
    use understory_dom::notify::NotificationLog;
    use understory_dom::{Element, Key};

    fn snapshot(t: &Toggler) -> Vec<(String, Vec<ElementId>, String)> {
        t.bindings()
            .iter()
            .map(|b| (b.target.clone(), alloc::vec![b.element], b.method.clone()))
            .collect()
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut doc = Document::new();
        doc.append(doc.root(), Element::new("a").attr("data-toggle", "#a"));
        doc.append(doc.root(), Element::new("a").attr("data-toggle", "#a"));
        doc.append(
            doc.root(),
            Element::new("input")
                .attr("type", "checkbox")
                .attr("data-toggle", "#b")
                .attr("data-toggle-method", "state"),
        );
        let mut t = Toggler::new(Config::default());
        t.start(&mut doc, LoadMode::Direct);
        let fresh = snapshot(&t);
        let listeners = doc.listener_count();

        assert_eq!(t.refresh(&mut doc), 3);
        let once = snapshot(&t);
        t.refresh(&mut doc);
        assert_eq!(snapshot(&t), once);
        assert_eq!(once, fresh);
        assert_eq!(doc.listener_count(), listeners);
        assert_eq!(listeners, 5);
    }

    #[test]
    fn unbind_detaches_listeners() {
        let mut doc = Document::new();
        let panel = doc.append(doc.root(), Element::new("div").id("p"));
        let x = doc.append(doc.root(), Element::new("a").attr("data-toggle", "#p"));
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);
        assert!(t.unbind(&mut doc, "#p"));
        assert!(!t.unbind(&mut doc, "#p"));
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(t.handle(&mut doc, &mut (), &mut Event::click(x)), 0);
        assert!(!doc.has_class(panel, "active"));
    }

    #[test]
    fn unknown_method_falls_back_to_default() {
        let mut doc = Document::new();
        let x = doc.append(
            doc.root(),
            Element::new("a")
                .attr("data-toggle", "#p")
                .attr("data-toggle-method", "swipe"),
        );
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);
        let b = t.bindings().get("#p").next().unwrap();
        assert_eq!((b.element, b.method.as_str()), (x, "button"));
    }

    #[test]
    fn keyboard_enter_toggles() {
        let mut doc = Document::new();
        let panel = doc.append(doc.root(), Element::new("div").id("p"));
        let x = doc.append(doc.root(), Element::new("a").attr("data-toggle", "#p"));
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);

        assert_eq!(t.handle(&mut doc, &mut (), &mut Event::keyup(x, Key::Escape)), 0);
        let mut enter = Event::keyup(x, Key::Enter);
        assert_eq!(t.handle(&mut doc, &mut (), &mut enter), 1);
        assert!(doc.has_class(panel, "active"));
        assert!(enter.default_prevented() && enter.propagation_stopped());
    }

    #[test]
    fn state_method_syncs_mirrored_checkboxes() {
        let mut doc = Document::new();
        let opt = doc.append(doc.root(), Element::new("div").id("opt"));
        let cb = |checked| {
            Element::new("input")
                .attr("type", "checkbox")
                .attr("data-toggle", "#opt")
                .attr("data-toggle-method", "state")
                .checked(checked)
        };
        let a = doc.append(doc.root(), cb(false));
        let b = doc.append(doc.root(), cb(false));
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);

        // The host flips native state before `change` is delivered.
        doc.set_checked(a, true);
        t.handle(&mut doc, &mut (), &mut Event::change(a));
        assert!(doc.has_class(opt, "active"));
        assert!(doc.is_checked(b) && doc.has_class(b, "active"));

        doc.set_checked(a, false);
        t.handle(&mut doc, &mut (), &mut Event::change(a));
        assert!(!doc.has_class(opt, "active"));
        assert!(!doc.is_checked(b) && !doc.has_class(b, "active"));
    }

    #[test]
    fn label_for_a_trigger_is_preempted() {
        let mut doc = Document::new();
        let opt = doc.append(doc.root(), Element::new("div").id("opt"));
        let label = doc.append(
            doc.root(),
            Element::new("label")
                .attr("for", "cb")
                .attr("data-toggle", "#opt"),
        );
        doc.append(
            doc.root(),
            Element::new("input")
                .id("cb")
                .attr("type", "checkbox")
                .attr("data-toggle", "#other")
                .attr("data-toggle-method", "state"),
        );
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);
        let mut click = Event::click(label);
        let mut log = NotificationLog::new();
        t.handle(&mut doc, &mut log, &mut click);
        assert!(!doc.has_class(opt, "active"));
        assert!(!click.default_prevented());
    }

    #[test]
    fn nested_trigger_does_not_fire_outer() {
        let mut doc = Document::new();
        let outer_target = doc.append(doc.root(), Element::new("div").id("outer"));
        let inner_target = doc.append(doc.root(), Element::new("div").id("inner"));
        let outer = doc.append(
            doc.root(),
            Element::new("div")
                .attr("data-toggle", "#outer")
                .attr("data-toggle-bubble", ""),
        );
        let inner = doc.append(
            outer,
            Element::new("a")
                .attr("data-toggle", "#inner")
                .attr("data-toggle-bubble", ""),
        );
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);

        // Both listeners are reached; the outer pass stands down for the inner trigger.
        assert_eq!(t.handle(&mut doc, &mut (), &mut Event::click(inner)), 2);
        assert!(doc.has_class(inner_target, "active"));
        assert!(!doc.has_class(outer_target, "active"));
        assert!(!doc.has_class(outer, "active"));
    }

    #[test]
    fn prevented_default_skips_later_listeners() {
        let mut doc = Document::new();
        let outer_target = doc.append(doc.root(), Element::new("div").id("outer"));
        let outer = doc.append(doc.root(), Element::new("div").attr("data-toggle", "#outer"));
        let plain = doc.append(outer, Element::new("span"));
        let mut t = Toggler::new(Config::default());
        t.bind_all(&mut doc);

        let mut click = Event::click(plain);
        click.prevent_default();
        assert_eq!(t.handle(&mut doc, &mut (), &mut click), 0);
        assert!(!doc.has_class(outer_target, "active"));

        assert_eq!(t.handle(&mut doc, &mut (), &mut Event::click(plain)), 1);
        assert!(doc.has_class(outer_target, "active"));
    }
}
