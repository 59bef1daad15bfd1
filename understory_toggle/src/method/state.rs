// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_dom::{Document, ElementId, Event};

use super::{ListenerHandles, Payload, TriggerMethod, attach_events};
use crate::engine::PreventContext;

/// State-change activation for checkbox and radio controls.
///
/// Fires on `change` with the control's checked state as explicit status and
/// [`sync_checked`] as correction, so mirrored and grouped controls follow.
///
/// Pre-empts interactions that originate on a `label` whose `for` names a
/// registered trigger: the label forwards to its control, whose own `change`
/// drives the pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StateMethod;

impl TriggerMethod for StateMethod {
    fn attach(&self, doc: &mut Document, element: ElementId) -> ListenerHandles {
        attach_events(doc, element, &["change"])
    }

    fn fire(&self, doc: &Document, element: ElementId, event: &mut Event) -> Option<Payload> {
        (event.name == "change").then(|| Payload {
            status: Some(doc.is_checked(element)),
            correction: Some(sync_checked),
        })
    }

    fn should_preempt(&self, doc: &Document, event: &Event, ctx: &PreventContext<'_>) -> bool {
        doc.tag(event.target) == Some("label")
            && doc
                .attribute(event.target, "for")
                .and_then(|id| doc.get_element_by_id(id))
                .is_some_and(|control| ctx.is_trigger(control))
    }
}

/// Set the checked state of checkbox and radio inputs; other elements are left alone.
pub fn sync_checked(doc: &mut Document, element: ElementId, status: Option<bool>) {
    if !doc.is_checkable(element) {
        return;
    }
    let checked = status.unwrap_or_else(|| !doc.is_checked(element));
    doc.set_checked(element, checked);
}
