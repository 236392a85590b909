//! A small CSS selector subset.
//!
//! Supported: selector lists separated by commas, where each entry is a
//! compound selector made of an optional type selector (`a`, `*`) followed by
//! any number of `#id`, `.class`, `[attr]`, `[attr="value"]` and
//! `:not(<compound>)` conditions. Combinators (descendant, `>`, `+`, `~`) are
//! rejected. This is enough to express focusable-element queries and link
//! queries, and lets in-memory DOMs answer them without a browser.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Anything a selector can be matched against.
pub trait SelectorTarget {
    /// Element tag name; compared ASCII case-insensitively.
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{found}' at offset {offset} in selector `{selector}`")]
    Unexpected { selector: String, found: char, offset: usize },

    #[error("unexpected end of selector `{selector}` while reading {construct}")]
    Unterminated { selector: String, construct: &'static str },

    #[error("unsupported pseudo-class ':{name}' in selector `{selector}`")]
    UnsupportedPseudo { selector: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
    Not(Box<Compound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

impl Compound {
    fn matches<T: SelectorTarget + ?Sized>(&self, target: &T) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(target.tag_name())
        {
            return false;
        }
        self.conditions.iter().all(|condition| match condition {
            Condition::Id(id) => target.attribute("id") == Some(id.as_str()),
            Condition::Class(class) => target.has_class(class),
            Condition::Attribute { name, value: None } => target.attribute(name).is_some(),
            Condition::Attribute { name, value: Some(expected) } => target.attribute(name) == Some(expected.as_str()),
            Condition::Not(inner) => !inner.matches(target),
        })
    }
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    compounds: Vec<Compound>,
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(source);
        let compounds = parser.selector_list()?;
        Ok(Self {
            source: source.to_string(),
            compounds,
        })
    }

    /// True when any entry of the list matches `target`.
    pub fn matches<T: SelectorTarget + ?Sized>(&self, target: &T) -> bool {
        self.compounds.iter().any(|compound| compound.matches(target))
    }

    /// The selector text this list was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of comma-separated entries.
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.peek();
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            selector: self.source.to_string(),
            found,
            offset: self.position,
        }
    }

    fn unterminated(&self, construct: &'static str) -> SelectorError {
        SelectorError::Unterminated {
            selector: self.source.to_string(),
            construct,
        }
    }

    fn expect(&mut self, wanted: char, construct: &'static str) -> Result<(), SelectorError> {
        match self.peek() {
            Some(found) if found == wanted => {
                self.position += 1;
                Ok(())
            }
            Some(found) => Err(self.unexpected(found)),
            None => Err(self.unterminated(construct)),
        }
    }

    fn selector_list(&mut self) -> Result<Vec<Compound>, SelectorError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = Vec::new();
        loop {
            self.skip_whitespace();
            compounds.push(self.compound()?);
            self.skip_whitespace();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(found) => {
                    self.position -= 1;
                    return Err(self.unexpected(found));
                }
            }
        }
        Ok(compounds)
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.position += 1;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident("type selector")?.to_ascii_lowercase());
            }
            _ => {}
        }

        let start = self.position;
        loop {
            match self.peek() {
                Some('#') => {
                    self.position += 1;
                    compound.conditions.push(Condition::Id(self.ident("id selector")?));
                }
                Some('.') => {
                    self.position += 1;
                    compound.conditions.push(Condition::Class(self.ident("class selector")?));
                }
                Some('[') => {
                    self.position += 1;
                    compound.conditions.push(self.attribute()?);
                }
                Some(':') => {
                    self.position += 1;
                    compound.conditions.push(self.pseudo()?);
                }
                _ => break,
            }
        }

        if compound.tag.is_none() && compound.conditions.is_empty() && self.position == start {
            // Only `*` may stand alone without conditions.
            if start == 0 || self.chars.get(start - 1) != Some(&'*') {
                return match self.peek() {
                    Some(found) => Err(self.unexpected(found)),
                    None => Err(self.unterminated("compound selector")),
                };
            }
        }
        Ok(compound)
    }

    fn ident(&mut self, construct: &'static str) -> Result<String, SelectorError> {
        let start = self.position;
        while self.peek().is_some_and(is_ident_char) {
            self.position += 1;
        }
        if self.position == start {
            return match self.peek() {
                Some(found) => Err(self.unexpected(found)),
                None => Err(self.unterminated(construct)),
            };
        }
        Ok(self.chars[start..self.position].iter().collect())
    }

    fn attribute(&mut self) -> Result<Condition, SelectorError> {
        self.skip_whitespace();
        let name = self.ident("attribute selector")?;
        self.skip_whitespace();
        let value = match self.peek() {
            Some('=') => {
                self.position += 1;
                self.skip_whitespace();
                let value = self.attribute_value()?;
                self.skip_whitespace();
                Some(value)
            }
            _ => None,
        };
        self.expect(']', "attribute selector")?;
        Ok(Condition::Attribute { name, value })
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.position += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some(c) => value.push(c),
                        None => return Err(self.unterminated("quoted attribute value")),
                    }
                }
            }
            _ => self.ident("attribute value"),
        }
    }

    fn pseudo(&mut self) -> Result<Condition, SelectorError> {
        let name = self.ident("pseudo-class")?;
        if !name.eq_ignore_ascii_case("not") {
            return Err(SelectorError::UnsupportedPseudo {
                selector: self.source.to_string(),
                name,
            });
        }
        self.expect('(', ":not()")?;
        self.skip_whitespace();
        let inner = self.compound()?;
        self.skip_whitespace();
        self.expect(')', ":not()")?;
        Ok(Condition::Not(Box::new(inner)))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    struct Element {
        tag: &'static str,
        attributes: BTreeMap<&'static str, &'static str>,
        classes: BTreeSet<&'static str>,
    }

    impl Element {
        fn new(tag: &'static str) -> Self {
            Self {
                tag,
                attributes: BTreeMap::new(),
                classes: BTreeSet::new(),
            }
        }

        fn attr(mut self, name: &'static str, value: &'static str) -> Self {
            self.attributes.insert(name, value);
            self
        }

        fn class(mut self, class: &'static str) -> Self {
            self.classes.insert(class);
            self
        }
    }

    impl SelectorTarget for Element {
        fn tag_name(&self) -> &str {
            self.tag
        }

        fn attribute(&self, name: &str) -> Option<&str> {
            self.attributes.get(name).copied()
        }

        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(class)
        }
    }

    const FOCUSABLE: &str = "a[href], area[href], input:not([disabled]), select:not([disabled]), \
                             textarea:not([disabled]), button:not([disabled]), iframe, object, embed, \
                             [contenteditable], [tabindex]:not([tabindex=\"-1\"])";

    #[test]
    fn test_parse_focusable_list() {
        let list = SelectorList::parse(FOCUSABLE).unwrap();
        assert_eq!(list.len(), 11);
        assert_eq!(list.as_str(), FOCUSABLE);
    }

    #[test]
    fn test_focusable_matching() {
        let list: SelectorList = FOCUSABLE.parse().unwrap();

        assert!(list.matches(&Element::new("a").attr("href", "#about")));
        assert!(!list.matches(&Element::new("a")));
        assert!(list.matches(&Element::new("button")));
        assert!(!list.matches(&Element::new("button").attr("disabled", "")));
        assert!(list.matches(&Element::new("INPUT")));
        assert!(list.matches(&Element::new("div").attr("tabindex", "0")));
        assert!(!list.matches(&Element::new("div").attr("tabindex", "-1")));
        assert!(list.matches(&Element::new("div").attr("contenteditable", "true")));
        assert!(list.matches(&Element::new("iframe")));
        assert!(!list.matches(&Element::new("span")));
    }

    #[test]
    fn test_id_class_and_universal() {
        let list = SelectorList::parse("#hamburger, nav.open, *.brand").unwrap();
        assert!(list.matches(&Element::new("button").attr("id", "hamburger")));
        assert!(list.matches(&Element::new("nav").class("open")));
        assert!(!list.matches(&Element::new("nav")));
        assert!(list.matches(&Element::new("span").class("brand")));

        let any = SelectorList::parse("*").unwrap();
        assert!(any.matches(&Element::new("section")));
    }

    #[test]
    fn test_single_quoted_and_unquoted_values() {
        let list = SelectorList::parse("[data-role='menu'], [tabindex=-1]").unwrap();
        assert!(list.matches(&Element::new("div").attr("data-role", "menu")));
        assert!(list.matches(&Element::new("div").attr("tabindex", "-1")));
        assert!(!list.matches(&Element::new("div").attr("tabindex", "0")));
    }

    #[test]
    fn test_rejects_combinators() {
        let err = SelectorList::parse("nav a").unwrap_err();
        assert!(matches!(err, SelectorError::Unexpected { found: 'a', .. }), "{err:?}");

        let err = SelectorList::parse("nav > a").unwrap_err();
        assert!(matches!(err, SelectorError::Unexpected { found: '>', .. }), "{err:?}");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(SelectorList::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(SelectorList::parse("a[href"), Err(SelectorError::Unterminated { .. })));
        assert!(matches!(SelectorList::parse("a,"), Err(SelectorError::Unterminated { .. })));
        assert!(matches!(SelectorList::parse("[title=\"x]"), Err(SelectorError::Unterminated { .. })));
        assert!(matches!(
            SelectorList::parse("a:hover"),
            Err(SelectorError::UnsupportedPseudo { name, .. }) if name == "hover"
        ));
    }
}
