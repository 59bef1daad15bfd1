// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset: parsing and matching.
//!
//! ## Supported syntax
//!
//! - Selector lists: `a, b`
//! - Combinators: descendant (`a b`) and child (`a > b`)
//! - Compound parts: type (`div`), universal (`*`), `#id`, `.class`
//! - Attributes: `[name]`, `[name=v]`, `[name~=v]`, `[name^=v]`, `[name$=v]`, `[name*=v]`,
//!   with bare or quoted (`"v"`, `'v'`) values and backslash escapes inside quotes.
//!
//! Pseudo-classes, sibling combinators and namespaces are not supported and
//! fail to parse.
//!
//! ```rust
//! use understory_dom::{Document, Element, SelectorList};
//!
//! let mut doc = Document::new();
//! let nav = doc.append(doc.root(), Element::new("nav").id("menu"));
//! let item = doc.append(nav, Element::new("a").attr("data-toggle-group", "tabs main"));
//!
//! let sel = SelectorList::parse("#menu > [data-toggle-group~=tabs]").unwrap();
//! assert!(sel.matches(&doc, item));
//! assert!(SelectorList::parse("#menu >").is_err());
//! ```

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::document::Document;
use crate::types::{ElementId, Elements};

/// Errors produced while parsing a selector.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one entry of a list) is empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot appear at this position.
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Byte offset into the selector source.
        offset: usize,
    },
    /// The selector ended in the middle of a construct.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    /// A quoted attribute value was not closed.
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
}

/// A parsed, comma-separated selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: SmallVec<[Complex; 1]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound {
    parts: SmallVec<[Simple; 2]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Simple {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr {
        name: String,
        matcher: Option<(AttrOp, String)>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(src: &str) -> Result<Self, SelectorError> {
        Parser { src, pos: 0 }.list()
    }

    /// Returns true if `el` matches any selector in the list.
    pub fn matches(&self, doc: &Document, el: ElementId) -> bool {
        doc.is_alive(el) && self.selectors.iter().any(|c| c.matches(doc, el))
    }

    /// All connected elements matching the list, in document order.
    pub fn query_all(&self, doc: &Document) -> Elements {
        doc.elements().filter(|&el| self.matches(doc, el)).collect()
    }
}

impl Complex {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        self.matches_at(doc, el, self.compounds.len() - 1)
    }

    fn matches_at(&self, doc: &Document, el: ElementId, i: usize) -> bool {
        if !self.compounds[i].matches(doc, el) {
            return false;
        }
        if i == 0 {
            return true;
        }
        match self.combinators[i - 1] {
            Combinator::Child => doc
                .parent_of(el)
                .is_some_and(|p| self.matches_at(doc, p, i - 1)),
            Combinator::Descendant => doc.ancestors(el).any(|a| self.matches_at(doc, a, i - 1)),
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        self.parts.iter().all(|p| p.matches(doc, el))
    }
}

impl Simple {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => doc.tag(el) == Some(tag.as_str()),
            Self::Id(id) => doc.attribute(el, "id") == Some(id.as_str()),
            Self::Class(class) => doc.has_class(el, class),
            Self::Attr { name, matcher } => {
                let Some(value) = attribute_value(doc, el, name) else {
                    return false;
                };
                let Some((op, expected)) = matcher else {
                    return true;
                };
                let expected = expected.as_str();
                match op {
                    AttrOp::Equals => value == expected,
                    AttrOp::Includes => {
                        !expected.is_empty()
                            && !expected.contains(char::is_whitespace)
                            && value.split_whitespace().any(|w| w == expected)
                    }
                    AttrOp::Prefix => !expected.is_empty() && value.starts_with(expected),
                    AttrOp::Suffix => !expected.is_empty() && value.ends_with(expected),
                    AttrOp::Substring => !expected.is_empty() && value.contains(expected),
                }
            }
        }
    }
}

// `class` lives in the class list, not the attribute list.
fn attribute_value<'a>(doc: &'a Document, el: ElementId, name: &str) -> Option<Cow<'a, str>> {
    if name == "class" {
        let classes = doc.classes(el);
        return (!classes.is_empty()).then(|| Cow::Owned(classes.join(" ")));
    }
    doc.attribute(el, name).map(Cow::Borrowed)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn list(mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = SmallVec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None | Some(',') => return Err(SelectorError::Empty),
                Some(_) => selectors.push(self.complex()?),
            }
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => {
                    self.bump();
                }
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(SelectorList { selectors })
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = alloc::vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut parts = SmallVec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                parts.push(Simple::Universal);
            }
            Some(c) if is_ident_char(c) => {
                parts.push(Simple::Tag(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    parts.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    parts.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    parts.push(self.attr()?);
                }
                _ => break,
            }
        }
        if parts.is_empty() {
            return Err(self.unexpected());
        }
        Ok(Compound { parts })
    }

    fn attr(&mut self) -> Result<Simple, SelectorError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(Simple::Attr {
                    name,
                    matcher: None,
                });
            }
            Some('=') => {
                self.bump();
                AttrOp::Equals
            }
            Some(c @ ('~' | '^' | '$' | '*')) => {
                self.bump();
                self.expect('=')?;
                match c {
                    '~' => AttrOp::Includes,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            _ => return Err(self.unexpected()),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.string(quote)?,
            _ => self.ident()?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(Simple::Attr {
            name,
            matcher: Some((op, value)),
        })
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(String::from(&self.src[start..self.pos]))
    }

    fn string(&mut self, quote: char) -> Result<String, SelectorError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnterminatedString(start)),
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(SelectorError::UnterminatedString(start)),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;
    use alloc::vec;

    fn doc() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let nav = doc.append(
            doc.root(),
            Element::new("nav").id("menu").attr("data-toggle-target", ""),
        );
        let list = doc.append(nav, Element::new("ul").class("items"));
        let link = doc.append(
            list,
            Element::new("a")
                .class("tab")
                .class("active")
                .attr("data-toggle", "#panel")
                .attr("data-toggle-group", "tabs main"),
        );
        (doc, nav, list, link)
    }

    fn matches(doc: &Document, el: ElementId, sel: &str) -> bool {
        SelectorList::parse(sel).unwrap().matches(doc, el)
    }

    #[test]
    fn simple_parts() {
        let (doc, nav, list, link) = doc();
        assert!(matches(&doc, nav, "nav"));
        assert!(matches(&doc, nav, "NAV"));
        assert!(matches(&doc, nav, "#menu"));
        assert!(matches(&doc, list, ".items"));
        assert!(matches(&doc, link, "*"));
        assert!(matches(&doc, link, "a.tab.active"));
        assert!(!matches(&doc, link, "a.tab.missing"));
    }

    #[test]
    fn attribute_operators() {
        let (doc, nav, _, link) = doc();
        assert!(matches(&doc, nav, "[data-toggle-target]"));
        assert!(matches(&doc, link, "[data-toggle='#panel']"));
        assert!(matches(&doc, link, "[data-toggle=\"#panel\"]"));
        assert!(matches(&doc, link, "[data-toggle-group~=tabs]"));
        assert!(matches(&doc, link, "[data-toggle-group~=main]"));
        assert!(!matches(&doc, link, "[data-toggle-group=tabs]"));
        assert!(matches(&doc, link, "[data-toggle-group^=ta]"));
        assert!(matches(&doc, link, "[data-toggle-group$=ain]"));
        assert!(matches(&doc, link, "[data-toggle-group*='s m']"));
        assert!(matches(&doc, link, "[class~=active]"));
        assert!(!matches(&doc, link, "[data-toggle-group~='']"));
    }

    #[test]
    fn combinators() {
        let (doc, _, list, link) = doc();
        assert!(matches(&doc, link, "nav a"));
        assert!(matches(&doc, link, "#menu .items > .tab"));
        assert!(!matches(&doc, link, "nav > a"));
        assert!(matches(&doc, list, "html > nav > ul"));
        assert!(matches(&doc, link, "[data-toggle-target] [data-toggle]"));
    }

    #[test]
    fn lists_match_any_entry() {
        let (doc, nav, list, link) = doc();
        let sel = SelectorList::parse("#menu, .tab").unwrap();
        assert!(sel.matches(&doc, nav));
        assert!(sel.matches(&doc, link));
        assert!(!sel.matches(&doc, list));
        assert_eq!(sel.query_all(&doc).as_slice(), &[nav, link]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("  "), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("a,,b"), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("a >"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(
            SelectorList::parse("a:hover"),
            Err(SelectorError::Unexpected {
                found: ':',
                offset: 1
            })
        );
        assert_eq!(
            SelectorList::parse("[x='open"),
            Err(SelectorError::UnterminatedString(3))
        );
        assert!(SelectorList::parse("[x|=y]").is_err());
        assert!(SelectorList::parse("#").is_err());
    }

    #[test]
    fn escapes_in_quoted_values() {
        let mut doc = Document::new();
        let el = doc.append(doc.root(), Element::new("div").attr("data-x", "a'b"));
        assert!(matches(&doc, el, "[data-x='a\\'b']"));
        let all = SelectorList::parse("div").unwrap().query_all(&doc);
        assert_eq!(all.into_vec(), vec![el]);
    }

    #[test]
    fn stale_elements_never_match() {
        let (mut doc, nav, _, link) = doc();
        doc.remove(nav);
        assert!(!matches(&doc, link, "*"));
    }
}
