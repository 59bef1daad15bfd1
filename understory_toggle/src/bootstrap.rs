// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bootstrap: bind every trigger now, or once the document finishes loading.

use understory_dom::{Document, ListenerId};

use crate::toggler::Toggler;

/// When [`Toggler::start`] binds the document's triggers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Bind immediately.
    Direct,
    /// Bind when a `load` event on the document root reaches [`Toggler::handle`].
    #[default]
    Deferred,
}

impl Toggler {
    /// Bind every trigger according to `mode`.
    ///
    /// Each call binds exactly once: immediately for [`LoadMode::Direct`], or
    /// on the next `load` for [`LoadMode::Deferred`]. Returns the number of
    /// triggers bound now.
    ///
    /// ```rust
    /// use understory_dom::{Document, Element, Event};
    /// use understory_toggle::{Config, LoadMode, Toggler};
    ///
    /// let mut doc = Document::new();
    /// doc.append(doc.root(), Element::new("a").attr("data-toggle", "#menu"));
    ///
    /// let mut toggler = Toggler::new(Config::default());
    /// assert_eq!(toggler.start(&mut doc, LoadMode::Deferred), 0);
    /// assert!(toggler.is_loading());
    ///
    /// let root = doc.root();
    /// toggler.handle(&mut doc, &mut (), &mut Event::load(root));
    /// assert!(toggler.bindings().is_bound("#menu"));
    /// assert!(!toggler.is_loading());
    /// ```
    pub fn start(&mut self, doc: &mut Document, mode: LoadMode) -> usize {
        match mode {
            LoadMode::Direct => self.bind_all(doc),
            LoadMode::Deferred => {
                let root = doc.root();
                if let Some(listener) = doc.add_listener(root, "load") {
                    tracing::debug!("binding deferred until load");
                    self.pending_loads.push((root, listener));
                }
                0
            }
        }
    }

    /// Returns true while a deferred start waits for `load`.
    pub fn is_loading(&self) -> bool {
        !self.pending_loads.is_empty()
    }

    pub(crate) fn complete_load(&mut self, doc: &mut Document, listener: ListenerId) {
        let Some(pos) = self.pending_loads.iter().position(|&(_, l)| l == listener) else {
            return;
        };
        let (el, listener) = self.pending_loads.remove(pos);
        doc.remove_listener(el, listener);
        self.bind_all(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use understory_dom::{Element, Event};

    #[test]
    fn deferred_start_binds_once_on_load() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, Element::new("a").attr("data-toggle", "#x"));
        let mut t = Toggler::new(Config::default());
        t.start(&mut doc, LoadMode::Deferred);
        assert!(t.bindings().is_empty());

        // Loads of other elements do not count.
        let img = doc.append(root, Element::new("img"));
        t.handle(&mut doc, &mut (), &mut Event::load(img));
        assert!(t.is_loading());

        t.handle(&mut doc, &mut (), &mut Event::load(root));
        assert_eq!(t.bindings().binding_count(), 1);
        t.handle(&mut doc, &mut (), &mut Event::load(root));
        assert_eq!(t.bindings().binding_count(), 1);
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn direct_start_binds_immediately() {
        let mut doc = Document::new();
        doc.append(doc.root(), Element::new("a").attr("data-toggle", "#x"));
        let mut t = Toggler::new(Config::default());
        assert_eq!(LoadMode::default(), LoadMode::Deferred);
        assert_eq!(t.start(&mut doc, LoadMode::Direct), 1);
        assert!(!t.is_loading());
    }
}
