// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications: named, bubbling, cancelable events carrying a boolean status.
//!
//! [`dispatch`] builds the event and hands it to a [`Notifier`]. Dispatch is
//! fire-and-forget: whatever observers do with the event (including
//! preventing its default) is not reported back to the caller that raised it.
//!
//! Observers only ever see `&Document`, so they cannot mutate the document
//! (or re-enter whoever holds `&mut Document`) while a notification runs.
//!
//! ```rust
//! use understory_dom::notify::{self, NotificationLog, Observers};
//! use understory_dom::{Document, Element};
//!
//! let mut doc = Document::new();
//! let panel = doc.append(doc.root(), Element::new("div"));
//!
//! let mut log = NotificationLog::new();
//! notify::dispatch(&doc, &mut log, panel, "toggled", true);
//! assert_eq!(log.entries()[0].status, true);
//!
//! // Observers run closures registered along the bubble path.
//! let mut observers = Observers::new();
//! let root = doc.root();
//! observers.observe(&mut doc, root, "toggled", |_, ev| assert_eq!(ev.detail, Some(false)));
//! notify::dispatch(&doc, &mut observers, panel, "toggled", false);
//! ```

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::dispatch::{self as router, Outcome};
use crate::document::Document;
use crate::event::Event;
use crate::types::{ElementId, ListenerId};

/// Receiver of notifications.
pub trait Notifier {
    /// Deliver a notification whose target is `event.target`.
    fn notify(&mut self, doc: &Document, event: &mut Event);
}

impl Notifier for () {
    fn notify(&mut self, _doc: &Document, _event: &mut Event) {}
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, doc: &Document, event: &mut Event) {
        (**self).notify(doc, event);
    }
}

/// Construct a notification on `target` and deliver it.
///
/// Returns the event as left by the notifier.
pub fn dispatch<N: Notifier + ?Sized>(
    doc: &Document,
    notifier: &mut N,
    target: ElementId,
    name: &str,
    status: bool,
) -> Event {
    let mut event = Event::custom(name, target, status);
    tracing::trace!(name, status, ?target, "notify");
    notifier.notify(doc, &mut event);
    event
}

/// A delivered notification, as recorded by [`NotificationLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Element the notification was dispatched on.
    pub target: ElementId,
    /// Notification name.
    pub name: String,
    /// Status payload.
    pub status: bool,
}

/// A notifier that records every notification in delivery order.
#[derive(Clone, Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded notifications, oldest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Take all recorded notifications, leaving the log empty.
    pub fn take(&mut self) -> Vec<Notification> {
        core::mem::take(&mut self.entries)
    }

    /// Number of recorded notifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, _doc: &Document, event: &mut Event) {
        self.entries.push(Notification {
            target: event.target,
            name: event.name.to_string(),
            status: event.detail.unwrap_or(false),
        });
    }
}

type Observer = Box<dyn FnMut(&Document, &mut Event)>;

/// A notifier that runs closures registered as document listeners.
///
/// Observers are registered on elements and receive notifications dispatched
/// on that element or, since notifications bubble, on any descendant.
#[derive(Default)]
pub struct Observers {
    handlers: HashMap<ListenerId, Observer>,
}

impl core::fmt::Debug for Observers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Observers {
    /// Create an empty observer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe notifications named `name` reaching `el`.
    ///
    /// Returns `None` when `el` is stale.
    pub fn observe(
        &mut self,
        doc: &mut Document,
        el: ElementId,
        name: &str,
        observer: impl FnMut(&Document, &mut Event) + 'static,
    ) -> Option<ListenerId> {
        let id = doc.add_listener(el, name)?;
        self.handlers.insert(id, Box::new(observer));
        Some(id)
    }

    /// Stop observing. Returns true if the observer was registered.
    pub fn unobserve(&mut self, doc: &mut Document, el: ElementId, id: ListenerId) -> bool {
        doc.remove_listener(el, id);
        self.handlers.remove(&id).is_some()
    }
}

impl Notifier for Observers {
    fn notify(&mut self, doc: &Document, event: &mut Event) {
        let seq = router::route(doc, event);
        router::run(&seq, event, |d, ev| {
            // Other owners may register listeners for the same name.
            if let Some(handler) = self.handlers.get_mut(&d.listener) {
                handler(doc, ev);
            }
            Outcome::Continue
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn log_records_in_order() {
        let mut doc = Document::new();
        let a = doc.append(doc.root(), Element::new("div"));
        let mut log = NotificationLog::new();
        dispatch(&doc, &mut log, a, "one", true);
        dispatch(&doc, &mut log, a, "two", false);
        let names: Vec<(&str, bool)> = log
            .entries()
            .iter()
            .map(|n| (n.name.as_str(), n.status))
            .collect();
        assert_eq!(names, vec![("one", true), ("two", false)]);
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn notifications_are_cancelable_and_bubble() {
        let mut doc = Document::new();
        let outer = doc.append(doc.root(), Element::new("div"));
        let inner = doc.append(outer, Element::new("div"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();

        let s = seen.clone();
        observers.observe(&mut doc, inner, "toggled", move |_, ev| {
            s.borrow_mut().push(("inner", ev.detail));
        });
        let s = seen.clone();
        observers.observe(&mut doc, outer, "toggled", move |_, ev| {
            s.borrow_mut().push(("outer", ev.detail));
            ev.prevent_default();
        });

        let ev = dispatch(&doc, &mut observers, inner, "toggled", true);
        assert!(ev.default_prevented());
        assert_eq!(
            *seen.borrow(),
            vec![("inner", Some(true)), ("outer", Some(true))]
        );
    }

    #[test]
    fn unobserve_detaches() {
        let mut doc = Document::new();
        let a = doc.append(doc.root(), Element::new("div"));
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::new();
        let c = count.clone();
        let id = observers
            .observe(&mut doc, a, "toggled", move |_, _| *c.borrow_mut() += 1)
            .unwrap();
        dispatch(&doc, &mut observers, a, "toggled", true);
        assert!(observers.unobserve(&mut doc, a, id));
        dispatch(&doc, &mut observers, a, "toggled", true);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(doc.listener_count(), 0);
    }
}
