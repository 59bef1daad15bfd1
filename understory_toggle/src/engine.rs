// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The propagation engine: one synchronous toggle pass per interaction.
//!
//! ## Pass
//!
//! Given an interaction, the firing trigger(s), a target, options, and a
//! method payload, [`toggle`]:
//!
//! 1) resolves the firing elements and the target set (live, never cached);
//! 2) picks the toggle classes, falling back to the configured defaults;
//! 3) decides prevention, before any mutation: the pass aborts if the
//!    interaction source is another bound trigger, if any registered method
//!    pre-empts, or if the global callback does;
//! 4) prevents the native default unless the binding bubbles;
//! 5) clears every other member of each declared group, notifying `false`
//!    on the targets it clears;
//! 6) applies the primary change to the target set: explicit status sets or
//!    clears, no status flips each element independently;
//! 7) mirrors, when the target is an expression: every trigger declaring the
//!    same expression follows whether any target carries all classes, and the
//!    targets are notified with that status.
//!
//! A prevented pass changes nothing and notifies nobody.
//!
//! ## Ordering
//!
//! Groups are cleared in declaration order, members in document order.
//! Mirroring visits peers in document order, then firing elements that no
//! longer declare the expression. Notifications are dispatched once per peer,
//! per target element, per event name.

use alloc::string::String;

use understory_dom::notify::{self, Notifier};
use understory_dom::query::{self, ElementRef};
use understory_dom::{Document, ElementId, Event};

use crate::config::Config;
use crate::method::Payload;
use crate::options::Options;
use crate::registry::Bindings;

/// What pre-emption rules see of a pass.
#[derive(Clone, Copy, Debug)]
pub struct PreventContext<'a> {
    /// The firing trigger elements.
    pub elements: &'a [ElementId],
    /// The resolved target set.
    pub targets: &'a [ElementId],
    /// The classes the pass would toggle.
    pub classes: &'a [String],
    /// Options of the firing binding.
    pub options: &'a Options,
    /// Every currently bound trigger.
    pub bindings: &'a Bindings,
}

impl PreventContext<'_> {
    /// Returns true if `el` is a bound trigger.
    pub fn is_trigger(&self, el: ElementId) -> bool {
        self.bindings.is_trigger(el)
    }
}

/// Run one toggle pass.
///
/// Returns `false` if the pass prevented the native default, `true` if it
/// was prevented itself or the binding bubbles.
pub fn toggle<N: Notifier + ?Sized>(
    config: &Config,
    bindings: &Bindings,
    doc: &mut Document,
    notifier: &mut N,
    event: &mut Event,
    element: ElementRef<'_>,
    target: ElementRef<'_>,
    options: &Options,
    payload: Payload,
) -> bool {
    let source = event.target;
    let elements = query::resolve(doc, element);
    let targets = query::resolve(doc, target);
    let classes = options.classes_or(&config.active_classes);
    let events = &options.events;

    let ctx = PreventContext {
        elements: &elements,
        targets: &targets,
        classes,
        options,
        bindings,
    };
    if is_prevented(config, doc, event, &ctx) {
        return true;
    }
    tracing::trace!(?source, targets = targets.len(), status = ?payload.status, "toggle pass");

    let suppress = !options.bubble;
    if suppress {
        event.prevent_default();
    }

    for group in options.groups.iter() {
        for member in (config.accessors.group_elements)(doc, group) {
            if elements.contains(&member) {
                continue;
            }
            query::remove_classes(doc, &[member], classes);
            if let Some(correct) = payload.correction {
                correct(doc, member, Some(false));
            }
            let Some(expr) = (config.accessors.target)(doc, member).map(String::from) else {
                continue;
            };
            for cleared in query::query_selector_all(doc, &expr) {
                for name in events.iter() {
                    notify::dispatch(doc, notifier, cleared, name, false);
                }
                query::remove_classes(doc, &[cleared], classes);
            }
        }
    }

    match payload.status {
        Some(true) => query::add_classes(doc, &targets, classes),
        Some(false) => query::remove_classes(doc, &targets, classes),
        None => query::toggle_classes(doc, &targets, classes),
    }

    if let Some(expr) = target.as_selector() {
        let mut peers = (config.accessors.same_elements)(doc, expr);
        for &el in &elements {
            if !peers.contains(&el) {
                peers.push(el);
            }
        }
        let status = targets
            .iter()
            .any(|&t| query::has_all_classes(doc, t, classes));
        for peer in peers {
            if status {
                query::add_classes(doc, &[peer], classes);
            } else {
                query::remove_classes(doc, &[peer], classes);
            }
            if let Some(correct) = payload.correction {
                correct(doc, peer, Some(status));
            }
            for &t in &targets {
                for name in events.iter() {
                    notify::dispatch(doc, notifier, t, name, status);
                }
            }
        }
    }

    !suppress
}

fn is_prevented(config: &Config, doc: &Document, event: &mut Event, ctx: &PreventContext<'_>) -> bool {
    let source = event.target;
    if !ctx.elements.contains(&source) && ctx.is_trigger(source) {
        tracing::trace!(?source, "prevented: source is another trigger");
        return true;
    }
    if let Some((name, _)) = config
        .methods
        .iter()
        .find(|(_, m)| m.should_preempt(doc, event, ctx))
    {
        tracing::trace!(?source, method = name, "prevented: method pre-empts");
        return true;
    }
    if config.preventing.is_some_and(|f| f(doc, event, ctx)) {
        tracing::trace!(?source, "prevented: preventing callback");
        return true;
    }
    false
}
