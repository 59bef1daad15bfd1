// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger methods: how a native interaction becomes a toggle request.
//!
//! A [`TriggerMethod`] attaches listeners to a trigger, turns a delivered
//! interaction into a [`Payload`], and may pre-empt passes it knows would
//! double-fire. Methods are stored by name in a [`MethodRegistry`]; the
//! built-ins are [`ButtonMethod`] (`"button"`) and [`StateMethod`] (`"state"`).
//!
//! ## Custom methods
//!
//! ```rust
//! use understory_dom::{Document, ElementId, Event};
//! use understory_toggle::method::{self, ListenerHandles, Payload, TriggerMethod};
//! use understory_toggle::{Config, Toggler};
//!
//! /// Toggles on double click only.
//! #[derive(Debug)]
//! struct DoubleClick;
//!
//! impl TriggerMethod for DoubleClick {
//!     fn attach(&self, doc: &mut Document, element: ElementId) -> ListenerHandles {
//!         method::attach_events(doc, element, &["dblclick"])
//!     }
//!
//!     fn fire(&self, _: &Document, _: ElementId, event: &mut Event) -> Option<Payload> {
//!         (event.name == "dblclick").then(Payload::default)
//!     }
//! }
//!
//! let mut config = Config::default();
//! config.methods.register("dblclick", DoubleClick);
//! let toggler = Toggler::new(config);
//! assert!(toggler.config().methods.contains("dblclick"));
//! ```

use alloc::string::{String, ToString};

use smallvec::SmallVec;
use understory_dom::{Document, ElementId, Event, ListenerId};

use crate::engine::PreventContext;

mod button;
mod registry;
mod state;

pub use button::ButtonMethod;
pub use registry::MethodRegistry;
pub use state::{StateMethod, sync_checked};

/// Listener registrations made by [`TriggerMethod::attach`], keyed by event name.
pub type ListenerHandles = SmallVec<[(String, ListenerId); 2]>;

/// Reconciles native control state of an element with a desired status.
///
/// `None` asks for the current state to be flipped.
pub type CorrectionFn = fn(&mut Document, ElementId, Option<bool>);

/// Out-of-band data a trigger method attaches to a toggle request.
#[derive(Clone, Copy, Debug, Default)]
pub struct Payload {
    /// Explicit desired status; `None` infers it by toggling.
    pub status: Option<bool>,
    /// Called for every element whose state the pass sets.
    pub correction: Option<CorrectionFn>,
}

/// A strategy mapping native interactions to toggle requests.
pub trait TriggerMethod: core::fmt::Debug {
    /// Register this method's listeners on `element`.
    fn attach(&self, doc: &mut Document, element: ElementId) -> ListenerHandles;

    /// Turn an interaction delivered to one of this method's listeners into a
    /// toggle request, or `None` to ignore it.
    fn fire(&self, doc: &Document, element: ElementId, event: &mut Event) -> Option<Payload>;

    /// Returns true if the pass for `event` must not run.
    ///
    /// Every registered method is asked, not just the one that fired.
    fn should_preempt(&self, doc: &Document, event: &Event, ctx: &PreventContext<'_>) -> bool {
        let _ = (doc, event, ctx);
        false
    }
}

/// Register one listener per event name on `element`.
///
/// Stale elements yield no handles.
pub fn attach_events(doc: &mut Document, element: ElementId, events: &[&str]) -> ListenerHandles {
    events
        .iter()
        .filter_map(|&name| Some((name.to_string(), doc.add_listener(element, name)?)))
        .collect()
}
