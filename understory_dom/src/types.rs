// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element and listener handles, element state,
//! and the element description used for insertion.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;

/// Identifier for an element in a [`Document`](crate::Document) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a single listener registration.
///
/// Handles are never reused within one document, so a stale handle can be
/// removed twice without touching a newer registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(pub(crate) u64);

/// An ordered, de-duplicated collection of elements.
///
/// Query results are always in document (pre-order) order.
pub type Elements = SmallVec<[ElementId; 4]>;

bitflags::bitflags! {
    /// Native element state that is not expressed through attributes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementState: u8 {
        /// Checked state of a checkbox or radio control.
        const CHECKED  = 0b0000_0001;
        /// The element is disabled.
        const DISABLED = 0b0000_0010;
    }
}

/// Description of an element to insert into a [`Document`](crate::Document).
///
/// The class list is kept apart from the attribute list; the `class`
/// attribute is folded into it by [`Element::attr`].
///
/// ```rust
/// use understory_dom::Element;
///
/// let button = Element::new("button")
///     .id("open")
///     .class("btn")
///     .attr("data-toggle", "#panel");
/// assert_eq!(button.tag, "button");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Lower-case tag name.
    pub tag: String,
    /// Attributes in insertion order, excluding `class`.
    pub attributes: Vec<(String, String)>,
    /// Class list in insertion order, without duplicates.
    pub classes: SmallVec<[String; 2]>,
    /// Native state flags.
    pub state: ElementState,
}

impl Element {
    /// Create an element description with the given tag name.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set an attribute. Setting `class` replaces the class list.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        if name == "class" {
            self.classes.clear();
            return value.split_whitespace().fold(self, Self::class);
        }
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
        self
    }

    /// Add a class to the class list.
    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Set the native checked state.
    pub fn checked(mut self, checked: bool) -> Self {
        self.state.set(ElementState::CHECKED, checked);
        self
    }
}
