// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing: build a target → bubble sequence and walk it.
//!
//! ## Overview
//!
//! Routing is split in two steps so that the owner of the listeners can hold
//! `&mut Document` while running them:
//!
//! 1) [`route`] snapshots the listener registrations hit by an event: the
//!    target's listeners first, then each ancestor's (nearest first) if the
//!    event bubbles. Listeners of one element keep their registration order.
//! 2) [`run`] walks the sequence, sets [`Event::current_target`], and calls a
//!    handler per entry.
//!
//! Listeners added or removed while running do not change the snapshot.
//!
//! ## Semantics
//!
//! - [`Outcome::Stop`] aborts immediately, skipping the remaining entries.
//! - [`Event::stop_propagation`] lets the remaining listeners of the current
//!   element run, then stops before the next element.
//! - The return value of [`run`] is the last visited entry when propagation
//!   stopped early, or `None` when the sequence completed.
//!
//! There is no capture phase; listeners are bubble-phase listeners, which is
//! all the toggle engine and its notifications need.
//!
//! ## Example
//!
//! ```rust
//! use understory_dom::dispatch::{self, Outcome};
//! use understory_dom::{Document, Element, Event};
//!
//! let mut doc = Document::new();
//! let outer = doc.append(doc.root(), Element::new("div"));
//! let inner = doc.append(outer, Element::new("button"));
//! let on_outer = doc.add_listener(outer, "click").unwrap();
//! let on_inner = doc.add_listener(inner, "click").unwrap();
//!
//! let mut ev = Event::click(inner);
//! let seq = dispatch::route(&doc, &ev);
//! let mut seen = Vec::new();
//! let stopped = dispatch::run(&seq, &mut ev, |d, _| {
//!     seen.push(d.listener);
//!     Outcome::Continue
//! });
//! assert!(stopped.is_none());
//! assert_eq!(seen, vec![on_inner, on_outer]);
//! ```

use alloc::vec::Vec;

use crate::document::Document;
use crate::event::Event;
use crate::types::{ElementId, ListenerId};

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The listener sits on the event target.
    Target,
    /// The listener sits on an ancestor of the target.
    Bubble,
}

/// Outcome returned by a handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Abort propagation immediately.
    Stop,
}

/// One listener to run for an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dispatch {
    /// Phase of this entry.
    pub phase: Phase,
    /// Element the listener is registered on.
    pub node: ElementId,
    /// The listener registration.
    pub listener: ListenerId,
}

/// Snapshot the listeners an event reaches, in propagation order.
///
/// Returns an empty sequence when the target is stale.
pub fn route(doc: &Document, event: &Event) -> Vec<Dispatch> {
    let mut out = Vec::new();
    if !doc.is_alive(event.target) {
        return out;
    }
    out.extend(doc.listeners(event.target, &event.name).map(|listener| Dispatch {
        phase: Phase::Target,
        node: event.target,
        listener,
    }));
    if event.bubbles() {
        for node in doc.ancestors(event.target) {
            out.extend(doc.listeners(node, &event.name).map(|listener| Dispatch {
                phase: Phase::Bubble,
                node,
                listener,
            }));
        }
    }
    out
}

/// Run a handler over a dispatch sequence and honor stop requests.
///
/// `current_target` is set for each entry and cleared once the walk ends.
pub fn run<'a>(
    seq: &'a [Dispatch],
    event: &mut Event,
    mut handler: impl FnMut(&Dispatch, &mut Event) -> Outcome,
) -> Option<&'a Dispatch> {
    let mut last: Option<&'a Dispatch> = None;
    let mut stopped_at = None;
    for d in seq {
        if let Some(prev) = last
            && prev.node != d.node
            && event.propagation_stopped()
        {
            stopped_at = Some(prev);
            break;
        }
        event.current_target = Some(d.node);
        last = Some(d);
        if handler(d, event) == Outcome::Stop {
            stopped_at = Some(d);
            break;
        }
    }
    event.current_target = None;
    stopped_at
}
