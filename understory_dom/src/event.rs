// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events: native interactions and custom notifications share one type.

use alloc::string::{String, ToString};

use crate::types::ElementId;

bitflags::bitflags! {
    /// Behavior and propagation state of an [`Event`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// The event propagates from the target to its ancestors.
        const BUBBLES             = 0b0000_0001;
        /// The default action can be prevented.
        const CANCELABLE          = 0b0000_0010;
        /// A listener prevented the default action.
        const DEFAULT_PREVENTED   = 0b0000_0100;
        /// A listener stopped propagation to further elements.
        const PROPAGATION_STOPPED = 0b0000_1000;
    }
}

/// Keyboard key carried by key events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Any printable character.
    Character(char),
}

/// An event delivered to an element.
///
/// Interactions use the constructors named after their DOM counterparts
/// ([`Event::click`], [`Event::keyup`], [`Event::change`], [`Event::load`]);
/// notifications use [`Event::custom`] and carry a boolean status in
/// [`Event::detail`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Event type name, e.g. `"click"`.
    pub name: String,
    /// The element the event was dispatched on.
    pub target: ElementId,
    /// The element whose listeners are running, set during dispatch.
    pub current_target: Option<ElementId>,
    /// Key for keyboard events.
    pub key: Option<Key>,
    /// Status payload for notifications.
    pub detail: Option<bool>,
    flags: EventFlags,
}

impl Event {
    /// Create an event with explicit flags.
    pub fn new(name: &str, target: ElementId, flags: EventFlags) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: None,
            key: None,
            detail: None,
            flags: flags & (EventFlags::BUBBLES | EventFlags::CANCELABLE),
        }
    }

    /// A bubbling, cancelable `click`.
    pub fn click(target: ElementId) -> Self {
        Self::new("click", target, EventFlags::BUBBLES | EventFlags::CANCELABLE)
    }

    /// A bubbling, cancelable `keyup` for `key`.
    pub fn keyup(target: ElementId, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new("keyup", target, EventFlags::BUBBLES | EventFlags::CANCELABLE)
        }
    }

    /// A bubbling, non-cancelable `change`.
    pub fn change(target: ElementId) -> Self {
        Self::new("change", target, EventFlags::BUBBLES)
    }

    /// A non-bubbling, non-cancelable `load`.
    pub fn load(target: ElementId) -> Self {
        Self::new("load", target, EventFlags::empty())
    }

    /// A bubbling, cancelable notification carrying `status`.
    pub fn custom(name: &str, target: ElementId, status: bool) -> Self {
        Self {
            detail: Some(status),
            ..Self::new(name, target, EventFlags::BUBBLES | EventFlags::CANCELABLE)
        }
    }

    /// Current flags.
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Returns true if the event bubbles.
    pub fn bubbles(&self) -> bool {
        self.flags.contains(EventFlags::BUBBLES)
    }

    /// Returns true if the default action can be prevented.
    pub fn cancelable(&self) -> bool {
        self.flags.contains(EventFlags::CANCELABLE)
    }

    /// Prevent the default action. No effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable() {
            self.flags |= EventFlags::DEFAULT_PREVENTED;
        }
    }

    /// Returns true if a listener prevented the default action.
    pub fn default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }

    /// Stop propagation after the listeners of the current element.
    pub fn stop_propagation(&mut self) {
        self.flags |= EventFlags::PROPAGATION_STOPPED;
    }

    /// Returns true if propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, Element};

    #[test]
    fn prevent_default_respects_cancelable() {
        let mut doc = Document::new();
        let el = doc.append(doc.root(), Element::new("input"));
        let mut click = Event::click(el);
        click.prevent_default();
        assert!(click.default_prevented());

        let mut change = Event::change(el);
        change.prevent_default();
        assert!(!change.default_prevented());
        assert!(change.bubbles());
    }

    #[test]
    fn constructors_strip_state_flags() {
        let doc = Document::new();
        let ev = Event::new("x", doc.root(), EventFlags::all());
        assert!(!ev.default_prevented());
        assert!(!ev.propagation_stopped());
        assert!(ev.bubbles() && ev.cancelable());
        assert_eq!(Event::custom("toggled", doc.root(), true).detail, Some(true));
        assert_eq!(Event::keyup(doc.root(), Key::Enter).key, Some(Key::Enter));
        assert!(!Event::load(doc.root()).bubbles());
    }
}
