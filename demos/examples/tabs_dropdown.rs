// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabs and a dropdown driven entirely by `data-toggle` markup.
//!
//! This example shows how to combine:
//! - `understory_dom` for the document, event routing, and notification observers,
//! - `understory_toggle` for binding triggers and running toggle passes,
//! - the `policy` module for keep-open tabs and a click-inside-safe dropdown.
//!
//! Run:
//! - `RUST_LOG=understory_toggle=debug cargo run -p understory_demos --example tabs_dropdown`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_dom::notify::Observers;
use understory_dom::{Document, Element, ElementId, Event, Key};
use understory_toggle::{Config, LoadMode, Overrides, Toggler, policy};

struct Page {
    doc: Document,
    body: ElementId,
    tabs: [ElementId; 2],
    panes: [ElementId; 2],
    menu: ElementId,
    menu_item: ElementId,
    remember: ElementId,
}

fn page() -> Page {
    let mut doc = Document::new();
    let body = doc.append(
        doc.root(),
        Element::new("body")
            .attr("data-toggle", "#menu")
            .attr("data-toggle-class", "open")
            .attr("data-toggle-bubble", ""),
    );

    let nav = doc.append(body, Element::new("nav"));
    let tab = |target: &str| {
        Element::new("a")
            .attr("data-toggle", target)
            .attr("data-toggle-group", "tabs")
            .attr("data-toggle-group-keep", "")
            .attr("data-toggle-event", "shown")
    };
    let first = doc.append(nav, tab("#pane-1").class("active"));
    let second = doc.append(nav, tab("#pane-2"));
    let pane_1 = doc.append(body, Element::new("section").id("pane-1").class("active"));
    let pane_2 = doc.append(body, Element::new("section").id("pane-2"));

    let menu = doc.append(
        body,
        Element::new("ul").id("menu").attr("data-toggle-target", ""),
    );
    let menu_item = doc.append(menu, Element::new("li"));
    let remember = doc.append(
        menu,
        Element::new("input")
            .attr("type", "checkbox")
            .attr("data-toggle", "#remember-note")
            .attr("data-toggle-method", "state"),
    );
    doc.append(body, Element::new("p").id("remember-note"));

    Page {
        doc,
        body,
        tabs: [first, second],
        panes: [pane_1, pane_2],
        menu,
        menu_item,
        remember,
    }
}

fn describe(p: &Page) {
    let classes = |el| p.doc.classes(el).join(" ");
    println!(
        "  tabs [{}] [{}] | panes [{}] [{}] | menu [{}]",
        classes(p.tabs[0]),
        classes(p.tabs[1]),
        classes(p.panes[0]),
        classes(p.panes[1]),
        classes(p.menu),
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut p = page();
    let mut toggler = Toggler::new(Config::with_overrides(Overrides {
        preventing: Some(policy::dropdowns_and_tabs),
        ..Overrides::default()
    }));
    toggler.start(&mut p.doc, LoadMode::Deferred);

    let shown = Rc::new(RefCell::new(Vec::new()));
    let mut observers = Observers::new();
    let sink = shown.clone();
    observers.observe(&mut p.doc, p.body, "shown", move |doc, ev| {
        let id = doc.attribute(ev.target, "id").unwrap_or("?").to_string();
        sink.borrow_mut().push((id, ev.detail.unwrap_or(false)));
    });

    let root = p.doc.root();
    toggler.handle(&mut p.doc, &mut observers, &mut Event::load(root));
    println!("bound {} target expressions", toggler.bindings().len());
    describe(&p);

    println!("click second tab");
    toggler.handle(&mut p.doc, &mut observers, &mut Event::click(p.tabs[1]));
    describe(&p);
    println!("  shown: {:?}", shown.borrow_mut().drain(..).collect::<Vec<_>>());

    println!("click second tab again (kept open)");
    toggler.handle(&mut p.doc, &mut observers, &mut Event::click(p.tabs[1]));
    describe(&p);

    println!("press Enter on first tab");
    toggler.handle(&mut p.doc, &mut observers, &mut Event::keyup(p.tabs[0], Key::Enter));
    describe(&p);

    println!("click the page to open the menu, then inside it");
    toggler.handle(&mut p.doc, &mut observers, &mut Event::click(p.body));
    toggler.handle(&mut p.doc, &mut observers, &mut Event::click(p.menu_item));
    describe(&p);

    println!("check the box inside the menu");
    p.doc.set_checked(p.remember, true);
    toggler.handle(&mut p.doc, &mut observers, &mut Event::change(p.remember));
    let note = p.doc.get_element_by_id("remember-note");
    println!(
        "  note active: {}",
        note.is_some_and(|n| p.doc.has_class(n, "active"))
    );

    println!("click the page again to close the menu");
    toggler.handle(&mut p.doc, &mut observers, &mut Event::click(p.body));
    describe(&p);
}
