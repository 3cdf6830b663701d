//! A small CSS selector engine covering the marker vocabulary widgets bind to.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! (quoted or bare), `:not(<compound>)`, the descendant and `>` child
//! combinators, and comma-separated selector lists.

use std::{fmt, str::FromStr};

use crate::{
    NodeId,
    core::dom::Document,
    error::{Error, ParseError, Result},
};

/// A single simple selector within a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    /// Element name, lowercase.
    Tag(String),
    /// `#id`.
    Id(String),
    /// `.class`.
    Class(String),
    /// `[attr]` or `[attr=value]`.
    Attr(String, Option<String>),
    /// `:not(...)`.
    Not(Box<Compound>),
}

/// A run of simple selectors that must all match one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    /// Constituent simple selectors; empty means `*`.
    parts: Vec<Simple>,
}

/// Relationship between a compound and the one to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// Whitespace.
    Descendant,
    /// `>`.
    Child,
}

/// A chain of compounds joined by combinators, stored right-to-left.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// The subject compound.
    subject: Compound,
    /// Ancestors to the left, nearest first.
    ancestors: Vec<(Combinator, Compound)>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Source text, kept for diagnostics.
    source: String,
    /// Alternatives separated by commas.
    alternatives: Vec<Complex>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self> {
        let mut p = Parser {
            src: source.as_bytes(),
            pos: 0,
        };
        let mut alternatives = vec![p.complex()?];
        loop {
            p.skip_ws();
            match p.peek() {
                None => break,
                Some(b',') => {
                    p.pos += 1;
                    alternatives.push(p.complex()?);
                }
                Some(c) => {
                    return Err(p.error(format!("unexpected character '{}'", c as char)));
                }
            }
        }
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Does the element match any alternative in this list?
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }

    /// Source text of the selector.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Complex {
    /// Match right-to-left, backtracking over descendant combinators.
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.subject.matches(doc, node) && Self::match_ancestors(&self.ancestors, doc, node)
    }

    /// Match the remaining ancestor chain starting from `node`'s parent.
    fn match_ancestors(chain: &[(Combinator, Compound)], doc: &Document, node: NodeId) -> bool {
        let Some(((comb, compound), rest)) = chain.split_first() else {
            return true;
        };
        let mut cur = doc.parent(node);
        while let Some(p) = cur {
            if compound.matches(doc, p) && Self::match_ancestors(rest, doc, p) {
                return true;
            }
            if *comb == Combinator::Child {
                return false;
            }
            cur = doc.parent(p);
        }
        false
    }
}

impl Compound {
    /// Does the element match every part?
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.get(node) else {
            return false;
        };
        self.parts.iter().all(|part| match part {
            Simple::Tag(t) => el.tag() == t,
            Simple::Id(id) => el.attr("id") == Some(id.as_str()),
            Simple::Class(c) => el.has_class(c),
            Simple::Attr(name, None) => el.has_attr(name),
            Simple::Attr(name, Some(v)) => el.attr(name) == Some(v.as_str()),
            Simple::Not(inner) => !inner.matches(doc, node),
        })
    }
}

/// Byte-level recursive descent parser.
struct Parser<'a> {
    /// Selector source.
    src: &'a [u8],
    /// Current offset.
    pos: usize,
}

impl Parser<'_> {
    /// Next byte without consuming it.
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    /// Build a positioned parse error.
    fn error(&self, msg: impl Into<String>) -> Error {
        ParseError::with_offset(msg, Some(self.pos)).into()
    }

    /// Skip whitespace, reporting whether any was consumed.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    /// Consume a specific byte or fail.
    fn expect(&mut self, c: u8) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c as char)))
        }
    }

    /// Read an identifier.
    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    /// Read an attribute value, quoted or bare.
    fn value(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c != q) {
                    self.pos += 1;
                }
                let v = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                self.expect(q)?;
                Ok(v)
            }
            _ => self.ident(),
        }
    }

    /// Parse a complex selector.
    fn complex(&mut self) -> Result<Complex> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = vec![];
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                    compounds.push(self.compound()?);
                }
                Some(c) if had_ws && c != b',' => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.compound()?);
                }
                _ => break,
            }
        }
        let subject = compounds.pop().unwrap_or_default();
        let ancestors = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(Complex { subject, ancestors })
    }

    /// Parse a compound selector.
    fn compound(&mut self) -> Result<Compound> {
        let mut parts = vec![];
        let start = self.pos;
        match self.peek() {
            Some(b'*') => self.pos += 1,
            Some(c) if c.is_ascii_alphabetic() => {
                parts.push(Simple::Tag(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some(b'#') => {
                    self.pos += 1;
                    parts.push(Simple::Id(self.ident()?));
                }
                Some(b'.') => {
                    self.pos += 1;
                    parts.push(Simple::Class(self.ident()?));
                }
                Some(b'[') => {
                    self.pos += 1;
                    self.skip_ws();
                    let name = self.ident()?;
                    self.skip_ws();
                    let value = if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.skip_ws();
                        Some(self.value()?)
                    } else {
                        None
                    };
                    self.skip_ws();
                    self.expect(b']')?;
                    parts.push(Simple::Attr(name, value));
                }
                Some(b':') => {
                    self.pos += 1;
                    let pseudo = self.ident()?;
                    if pseudo != "not" {
                        return Err(self.error(format!("unsupported pseudo-class :{pseudo}")));
                    }
                    self.expect(b'(')?;
                    self.skip_ws();
                    let inner = self.compound()?;
                    self.skip_ws();
                    self.expect(b')')?;
                    parts.push(Simple::Not(Box::new(inner)));
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.error("expected selector"));
        }
        Ok(Compound { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("[open").is_err());
        assert!(Selector::parse("a:hover").is_err());
        assert!(Selector::parse("a,").is_err());
        let err = Selector::parse(".x [").unwrap_err();
        assert!(err.to_string().contains("offset"));
    }

    #[test]
    fn parse_shapes() -> Result<()> {
        let s = Selector::parse("input:not([disabled]), [tabindex=\"0\"]")?;
        assert_eq!(s.alternatives.len(), 2);
        let s = Selector::parse("[slider-dots] span")?;
        assert_eq!(s.alternatives[0].ancestors.len(), 1);
        let s = Selector::parse(".a > .b .c")?;
        let c = &s.alternatives[0];
        assert_eq!(c.ancestors[0].0, Combinator::Descendant);
        assert_eq!(c.ancestors[1].0, Combinator::Child);
        Ok(())
    }
}
