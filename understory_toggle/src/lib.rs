// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_toggle --heading-base-level=0

//! Understory Toggle: declarative, attribute-driven class toggling.
//!
//! ## Overview
//!
//! Elements carrying `data-toggle="<target expression>"` are *triggers*. When a
//! trigger is activated it toggles classes (default `active`) on the elements
//! its expression resolves to, and keeps related triggers consistent:
//!
//! - **Groups** (`data-toggle-group`): activating one member deactivates every
//!   other member of the same group, and its targets.
//! - **Mirroring**: every trigger declaring the same expression carries the
//!   classes exactly when the resolved targets do.
//! - **Notifications** (`data-toggle-event`): named events carrying the new
//!   status are dispatched on the targets through a [`Notifier`](understory_dom::notify::Notifier).
//!
//! How an interaction becomes a toggle request is decided by a pluggable
//! [`TriggerMethod`](method::TriggerMethod): `button` (click and Enter) or
//! `state` (checkbox and radio `change`), selected with `data-toggle-method`.
//!
//! ## Workflow
//!
//! 1) Build a [`Config`] (defaults, or field-wise [`Overrides`]).
//! 2) [`Toggler::start`] binds every trigger, immediately or on `load`.
//! 3) Feed interactions to [`Toggler::handle`]; each bound listener the event
//!    reaches runs one [`engine::toggle`] pass.
//! 4) After changing the markup, [`Toggler::refresh`] rebinds from scratch.
//!
//! ## Prevention
//!
//! A pass aborts before any mutation when the interaction comes from another
//! bound trigger, when any registered method pre-empts it, or when
//! [`Config::preventing`] says so. The [`policy`] module has ready-made rules
//! for dropdown containers and keep-open tabs.
//!
//! ## Example
//!
//! ```rust
//! use understory_dom::notify::NotificationLog;
//! use understory_dom::{Document, Element, Event};
//! use understory_toggle::{Config, LoadMode, Toggler};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let a = doc.append(root, Element::new("section").id("a").class("active"));
//! let b = doc.append(root, Element::new("section").id("b"));
//! let tab = |target: &str| {
//!     Element::new("a")
//!         .attr("data-toggle", target)
//!         .attr("data-toggle-group", "tabs")
//!         .attr("data-toggle-event", "shown")
//! };
//! let x = doc.append(root, tab("#a").class("active"));
//! let y = doc.append(root, tab("#b"));
//!
//! let mut toggler = Toggler::new(Config::default());
//! toggler.start(&mut doc, LoadMode::Direct);
//!
//! let mut log = NotificationLog::new();
//! toggler.handle(&mut doc, &mut log, &mut Event::click(y));
//!
//! assert!(!doc.has_class(x, "active") && !doc.has_class(a, "active"));
//! assert!(doc.has_class(y, "active") && doc.has_class(b, "active"));
//! let seen: Vec<_> = log.entries().iter().map(|n| (n.target, n.status)).collect();
//! assert_eq!(seen, [(a, false), (b, true)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod attr;
mod bootstrap;
mod config;
pub mod engine;
pub mod method;
mod options;
pub mod policy;
mod registry;
mod toggler;

pub use bootstrap::LoadMode;
pub use config::{AccessorOverrides, Accessors, Config, Overrides, PreventingFn};
pub use engine::PreventContext;
pub use options::{Options, Tokens};
pub use registry::{Binding, Bindings};
pub use toggler::Toggler;
