// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector and class-list adapter.
//!
//! Thin helpers over [`Document`] and [`SelectorList`] that resolve element
//! references into collections and apply class mutations elementwise.
//!
//! None of these functions fail: a selector that does not parse is logged at
//! `debug` level and resolves to an empty collection, and mutations on stale
//! handles are ignored.

use crate::document::Document;
use crate::selector::SelectorList;
use crate::types::{ElementId, Elements};

/// A reference to one or more elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementRef<'a> {
    /// A single element.
    Element(ElementId),
    /// An explicit collection.
    Elements(&'a [ElementId]),
    /// A selector, resolved by a live query each time.
    Selector(&'a str),
}

impl<'a> ElementRef<'a> {
    /// The selector source, if this reference is a selector.
    pub fn as_selector(&self) -> Option<&'a str> {
        match *self {
            Self::Selector(s) => Some(s),
            _ => None,
        }
    }
}

impl From<ElementId> for ElementRef<'_> {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl<'a> From<&'a str> for ElementRef<'a> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

impl<'a> From<&'a [ElementId]> for ElementRef<'a> {
    fn from(elements: &'a [ElementId]) -> Self {
        Self::Elements(elements)
    }
}

/// A filter for [`filter_by_match`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter<'a> {
    /// Keep elements matching a selector.
    Selector(&'a str),
    /// Keep only this element.
    Element(ElementId),
}

/// Resolve a reference into a de-duplicated collection of live elements.
///
/// Explicit collections keep their order; selectors resolve in document order.
pub fn resolve(doc: &Document, reference: ElementRef<'_>) -> Elements {
    match reference {
        ElementRef::Element(id) => {
            let mut out = Elements::new();
            if doc.is_alive(id) {
                out.push(id);
            }
            out
        }
        ElementRef::Elements(ids) => {
            let mut out = Elements::new();
            for &id in ids {
                if doc.is_alive(id) && !out.contains(&id) {
                    out.push(id);
                }
            }
            out
        }
        ElementRef::Selector(selector) => query_selector_all(doc, selector),
    }
}

/// All connected elements matching `selector`, in document order.
pub fn query_selector_all(doc: &Document, selector: &str) -> Elements {
    match SelectorList::parse(selector) {
        Ok(list) => list.query_all(doc),
        Err(err) => {
            tracing::debug!(selector, %err, "unparsable selector resolves to nothing");
            Elements::new()
        }
    }
}

/// Returns true if `el` matches `selector`. Unparsable selectors match nothing.
pub fn matches(doc: &Document, el: ElementId, selector: &str) -> bool {
    match SelectorList::parse(selector) {
        Ok(list) => list.matches(doc, el),
        Err(err) => {
            tracing::debug!(selector, %err, "unparsable selector matches nothing");
            false
        }
    }
}

/// Nearest inclusive ancestor of `el` matching `selector`.
pub fn closest(doc: &Document, el: ElementId, selector: &str) -> Option<ElementId> {
    let list = SelectorList::parse(selector).ok()?;
    if list.matches(doc, el) {
        return Some(el);
    }
    doc.ancestors(el).find(|&a| list.matches(doc, a))
}

/// Keep the elements of `elements` that pass `filter`, preserving order.
pub fn filter_by_match(doc: &Document, elements: &[ElementId], filter: Filter<'_>) -> Elements {
    match filter {
        Filter::Element(wanted) => elements.iter().copied().filter(|&el| el == wanted).collect(),
        Filter::Selector(selector) => match SelectorList::parse(selector) {
            Ok(list) => elements
                .iter()
                .copied()
                .filter(|&el| list.matches(doc, el))
                .collect(),
            Err(err) => {
                tracing::debug!(selector, %err, "unparsable filter keeps nothing");
                Elements::new()
            }
        },
    }
}

/// Add every class to every element. Present classes are left alone.
pub fn add_classes<S: AsRef<str>>(doc: &mut Document, elements: &[ElementId], classes: &[S]) {
    for &el in elements {
        for class in classes {
            doc.add_class(el, class.as_ref());
        }
    }
}

/// Remove every class from every element. Absent classes are left alone.
pub fn remove_classes<S: AsRef<str>>(doc: &mut Document, elements: &[ElementId], classes: &[S]) {
    for &el in elements {
        for class in classes {
            doc.remove_class(el, class.as_ref());
        }
    }
}

/// Flip every class on every element independently.
pub fn toggle_classes<S: AsRef<str>>(doc: &mut Document, elements: &[ElementId], classes: &[S]) {
    for &el in elements {
        for class in classes {
            doc.toggle_class(el, class.as_ref());
        }
    }
}

/// Returns true if `el` carries every class in `classes`.
///
/// An empty class list is never considered carried.
pub fn has_all_classes<S: AsRef<str>>(doc: &Document, el: ElementId, classes: &[S]) -> bool {
    !classes.is_empty() && classes.iter().all(|c| doc.has_class(el, c.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    fn doc() -> (Document, ElementId, ElementId) {
        let mut doc = Document::new();
        let a = doc.append(doc.root(), Element::new("div").id("a").class("x"));
        let b = doc.append(doc.root(), Element::new("div").id("b"));
        (doc, a, b)
    }

    #[test]
    fn resolve_each_reference_kind() {
        let (mut doc, a, b) = doc();
        assert_eq!(resolve(&doc, a.into()).as_slice(), &[a]);
        assert_eq!(resolve(&doc, ElementRef::Elements(&[b, a, b])).as_slice(), &[b, a]);
        assert_eq!(resolve(&doc, "div".into()).as_slice(), &[a, b]);
        assert!(resolve(&doc, "#missing".into()).is_empty());
        assert!(resolve(&doc, "[[".into()).is_empty());
        doc.remove(a);
        assert!(resolve(&doc, a.into()).is_empty());
    }

    #[test]
    fn class_mutations_apply_elementwise() {
        let (mut doc, a, b) = doc();
        add_classes(&mut doc, &[a, b], &["x", "y"]);
        assert_eq!(doc.classes(a), &["x", "y"]);
        assert_eq!(doc.classes(b), &["x", "y"]);
        remove_classes(&mut doc, &[a], &["x", "z"]);
        assert_eq!(doc.classes(a), &["y"]);
        toggle_classes(&mut doc, &[a, b], &["x"]);
        assert!(doc.has_class(a, "x"));
        assert!(!doc.has_class(b, "x"));
    }

    #[test]
    fn filters_and_full_class_sets() {
        let (mut doc, a, b) = doc();
        doc.add_class(a, "y");
        assert_eq!(filter_by_match(&doc, &[a, b], Filter::Selector(".x.y")).as_slice(), &[a]);
        assert_eq!(filter_by_match(&doc, &[a, b], Filter::Element(b)).as_slice(), &[b]);
        assert!(has_all_classes(&doc, a, &["x", "y"]));
        assert!(!has_all_classes(&doc, b, &["x"]));
        assert!(!has_all_classes::<&str>(&doc, a, &[]));
    }

    #[test]
    fn closest_is_inclusive() {
        let (mut doc, a, _) = doc();
        let inner = doc.append(a, Element::new("span"));
        assert_eq!(closest(&doc, inner, "#a"), Some(a));
        assert_eq!(closest(&doc, a, "#a"), Some(a));
        assert_eq!(closest(&doc, inner, "#nope"), None);
        assert!(matches(&doc, inner, "div span"));
        assert!(!matches(&doc, inner, "::"));
    }
}
