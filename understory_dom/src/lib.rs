// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dom --heading-base-level=0

//! Understory DOM: a minimal, `no_std` document model for attribute-driven behavior.
//!
//! ## Overview
//!
//! This crate provides just enough of a document to drive declarative UI
//! behavior headlessly:
//!
//! - [`Document`]: an element tree addressed by generational [`ElementId`] handles,
//!   with attributes, class lists, native checked state, and listener registrations.
//! - [`selector`]: a CSS subset (lists, descendant and child combinators,
//!   type, `#id`, `.class`, and attribute selectors) with typed parse errors.
//! - [`query`]: resolve element references and apply class mutations elementwise.
//! - [`dispatch`]: build a target → bubble listener sequence and walk it.
//! - [`notify`]: deliver named notifications carrying a boolean status.
//!
//! ## Listeners
//!
//! The document records listener registrations but never runs code. Owners
//! keep their own `ListenerId → behavior` map, route an [`Event`] with
//! [`dispatch::route`], and run it with [`dispatch::run`] while holding
//! `&mut Document` themselves.
//!
//! ## Example
//!
//! ```rust
//! use understory_dom::{query, Document, Element, SelectorList};
//!
//! let mut doc = Document::new();
//! let nav = doc.append(doc.root(), Element::new("nav"));
//! let a = doc.append(nav, Element::new("a").attr("data-toggle", "#one"));
//! let b = doc.append(nav, Element::new("a").attr("data-toggle", "#two"));
//!
//! let triggers = SelectorList::parse("nav > [data-toggle]").unwrap();
//! assert_eq!(triggers.query_all(&doc).as_slice(), &[a, b]);
//!
//! query::add_classes(&mut doc, &[a, b], &["active"]);
//! assert!(doc.has_class(b, "active"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatch;
mod document;
pub mod event;
pub mod notify;
pub mod query;
pub mod selector;
mod types;

pub use document::{Ancestors, Descendants, Document};
pub use event::{Event, EventFlags, Key};
pub use query::ElementRef;
pub use selector::{SelectorError, SelectorList};
pub use types::{Element, ElementId, ElementState, Elements, ListenerId};
