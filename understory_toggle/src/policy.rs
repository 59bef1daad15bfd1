// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made pre-emption policies for [`Config::preventing`](crate::Config::preventing).
//!
//! - [`target_container`]: interactions inside a `data-toggle-target`
//!   container do not reach triggers further out, so clicking inside an open
//!   dropdown does not close it.
//! - [`group_keep`]: firing an active `data-toggle-group-keep` trigger again
//!   keeps it active, so a tab cannot be closed by clicking it.
//! - [`dropdowns_and_tabs`]: both, container first.
//!
//! ```rust
//! use understory_toggle::{Config, Overrides, policy};
//!
//! let config = Config::with_overrides(Overrides {
//!     preventing: Some(policy::dropdowns_and_tabs),
//!     ..Overrides::default()
//! });
//! assert!(config.preventing.is_some());
//! ```

use understory_dom::{Document, ElementId, Event, query};

use crate::attr;
use crate::engine::PreventContext;

/// Pre-empt interactions inside a target container that has no nearer trigger.
pub fn target_container(doc: &Document, event: &mut Event, _ctx: &PreventContext<'_>) -> bool {
    container_decision(doc, event.target).unwrap_or(false)
}

/// Pre-empt firing an active keep-grouped trigger, and prevent its default.
///
/// The trigger is active when it carries every class of the pass.
pub fn group_keep(doc: &Document, event: &mut Event, ctx: &PreventContext<'_>) -> bool {
    let kept = inclusive_ancestors(doc, event.target).any(|el| {
        doc.has_attribute(el, attr::GROUP_KEEP) && query::has_all_classes(doc, el, ctx.classes)
    });
    if kept {
        event.prevent_default();
    }
    kept
}

/// [`target_container`], then [`group_keep`] for interactions outside any container.
pub fn dropdowns_and_tabs(doc: &Document, event: &mut Event, ctx: &PreventContext<'_>) -> bool {
    match container_decision(doc, event.target) {
        Some(decision) => decision,
        None => group_keep(doc, event, ctx),
    }
}

/// `None` outside any container; otherwise whether the container is nearer
/// than the nearest trigger.
fn container_decision(doc: &Document, el: ElementId) -> Option<bool> {
    let container = ancestor_index(doc, el, attr::TARGET)?;
    Some(match ancestor_index(doc, el, attr::TOGGLE) {
        None => true,
        Some(trigger) => container < trigger,
    })
}

fn ancestor_index(doc: &Document, el: ElementId, attribute: &str) -> Option<usize> {
    inclusive_ancestors(doc, el).position(|a| doc.has_attribute(a, attribute))
}

fn inclusive_ancestors(doc: &Document, el: ElementId) -> impl Iterator<Item = ElementId> + '_ {
    doc.is_alive(el)
        .then_some(el)
        .into_iter()
        .chain(doc.ancestors(el))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, LoadMode, Overrides, Toggler};
    use understory_dom::Element;

    struct Dropdown {
        doc: Document,
        body: ElementId,
        menu: ElementId,
        item: ElementId,
        link: ElementId,
        detail: ElementId,
    }

    // Clicking anywhere in the body toggles the menu, except inside it.
    fn dropdown() -> Dropdown {
        let mut doc = Document::new();
        let body = doc.append(doc.root(), Element::new("body").attr("data-toggle", "#menu"));
        let menu = doc.append(
            body,
            Element::new("ul").id("menu").attr("data-toggle-target", ""),
        );
        let item = doc.append(menu, Element::new("li"));
        let link = doc.append(menu, Element::new("a").attr("data-toggle", "#detail"));
        let detail = doc.append(body, Element::new("div").id("detail"));
        Dropdown {
            doc,
            body,
            menu,
            item,
            link,
            detail,
        }
    }

    fn toggler(f: &mut Dropdown) -> Toggler {
        let mut t = Toggler::new(Config::with_overrides(Overrides {
            preventing: Some(dropdowns_and_tabs),
            ..Overrides::default()
        }));
        t.start(&mut f.doc, LoadMode::Direct);
        t
    }

    #[test]
    fn container_decisions() {
        let f = dropdown();
        assert_eq!(container_decision(&f.doc, f.item), Some(true));
        assert_eq!(container_decision(&f.doc, f.link), Some(false));
        assert_eq!(container_decision(&f.doc, f.body), None);
    }

    #[test]
    fn clicks_inside_the_container_do_not_reach_outer_triggers() {
        let mut f = dropdown();
        let mut t = toggler(&mut f);
        t.handle(&mut f.doc, &mut (), &mut Event::click(f.body));
        assert!(f.doc.has_class(f.menu, "active"));

        let mut click = Event::click(f.item);
        t.handle(&mut f.doc, &mut (), &mut click);
        assert!(f.doc.has_class(f.menu, "active"));
        assert!(!click.default_prevented());

        t.handle(&mut f.doc, &mut (), &mut Event::click(f.body));
        assert!(!f.doc.has_class(f.menu, "active"));
    }

    #[test]
    fn nearer_triggers_inside_a_container_still_fire() {
        let mut f = dropdown();
        let mut t = toggler(&mut f);
        assert_eq!(t.handle(&mut f.doc, &mut (), &mut Event::click(f.link)), 1);
        assert!(f.doc.has_class(f.detail, "active"));
        assert!(!f.doc.has_class(f.menu, "active"));
    }

    #[test]
    fn active_kept_tab_stays_active() {
        let mut doc = Document::new();
        let pane = doc.append(doc.root(), Element::new("div").id("pane"));
        let tab = doc.append(
            doc.root(),
            Element::new("a")
                .attr("data-toggle", "#pane")
                .attr("data-toggle-group", "tabs")
                .attr("data-toggle-group-keep", ""),
        );
        let mut t = Toggler::new(Config::with_overrides(Overrides {
            preventing: Some(group_keep),
            ..Overrides::default()
        }));
        t.start(&mut doc, LoadMode::Direct);

        t.handle(&mut doc, &mut (), &mut Event::click(tab));
        assert!(doc.has_class(tab, "active") && doc.has_class(pane, "active"));

        let mut again = Event::click(tab);
        t.handle(&mut doc, &mut (), &mut again);
        assert!(doc.has_class(tab, "active") && doc.has_class(pane, "active"));
        assert!(again.default_prevented());
    }
}
