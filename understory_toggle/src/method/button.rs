// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_dom::{Document, ElementId, Event, Key};

use super::{ListenerHandles, Payload, TriggerMethod, attach_events};

/// Press-style activation: `click`, or `keyup` of the Enter key.
///
/// Fires with an empty payload, so the pass toggles. Never pre-empts.
///
/// Keyboard activation stops propagation of the key event so an enclosing
/// trigger does not see the same key press. It does not prevent the default;
/// the pass does that unless the binding bubbles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonMethod;

impl TriggerMethod for ButtonMethod {
    fn attach(&self, doc: &mut Document, element: ElementId) -> ListenerHandles {
        attach_events(doc, element, &["click", "keyup"])
    }

    fn fire(&self, _doc: &Document, _element: ElementId, event: &mut Event) -> Option<Payload> {
        match event.name.as_str() {
            "click" => Some(Payload::default()),
            "keyup" if event.key == Some(Key::Enter) => {
                event.stop_propagation();
                Some(Payload::default())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_dom::Element;

    #[test]
    fn attaches_click_and_keyup() {
        let mut doc = Document::new();
        let b = doc.append(doc.root(), Element::new("button"));
        let handles = ButtonMethod.attach(&mut doc, b);
        let names: alloc::vec::Vec<&str> = handles.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["click", "keyup"]);
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn only_enter_activates_from_keyboard() {
        let mut doc = Document::new();
        let b = doc.append(doc.root(), Element::new("button"));

        let mut space = Event::keyup(b, Key::Space);
        assert!(ButtonMethod.fire(&doc, b, &mut space).is_none());
        assert!(!space.propagation_stopped());

        let mut enter = Event::keyup(b, Key::Enter);
        let payload = ButtonMethod.fire(&doc, b, &mut enter).unwrap();
        assert!(payload.status.is_none() && payload.correction.is_none());
        assert!(enter.propagation_stopped());
        assert!(!enter.default_prevented());

        assert!(ButtonMethod.fire(&doc, b, &mut Event::click(b)).is_some());
    }
}
