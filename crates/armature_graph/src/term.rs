//! Node identities and literal values.
//!
//! A [`Term`] names one node in the configuration graph: a named node (IRI),
//! a blank node (document-scoped identifier), or a literal carrying raw text
//! plus an optional datatype IRI. Terms double as property values: a value
//! is either a reference to another node or an inline literal.
//!
//! Terms are cheap to clone: the identifier text is reference-counted.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Literal
// ─────────────────────────────────────────────────────────────────────────────

/// A literal value: raw source text plus an optional datatype IRI.
///
/// The raw text is kept verbatim; coercion into a typed
/// [`Primitive`](crate::datatype::Primitive) happens at resolution time,
/// driven either by a parameter's declared range or by the literal's own
/// datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The raw source text of the literal.
    pub value: String,
    /// The datatype IRI, if the literal was typed in the source document.
    pub datatype: Option<Arc<str>>,
}

impl Literal {
    /// Creates an untyped (plain string) literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
        }
    }

    /// Creates a literal carrying a datatype IRI.
    pub fn typed(value: impl Into<String>, datatype: impl Into<Arc<str>>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.datatype {
            Some(dt) => write!(f, "\"{}\"^^<{}>", self.value, dt),
            None => write!(f, "\"{}\"", self.value),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Term
// ─────────────────────────────────────────────────────────────────────────────

/// The identity of one graph node, or one inline property value.
///
/// # Example
///
/// ```
/// use armature_graph::term::Term;
///
/// let id = Term::named("ex:myConfig");
/// assert_eq!(id.as_str(), Some("ex:myConfig"));
/// assert!(!id.is_literal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A globally named node, identified by IRI.
    NamedNode(Arc<str>),
    /// A blank node, identified only within its source document.
    BlankNode(Arc<str>),
    /// An inline literal value.
    Literal(Literal),
}

impl Term {
    /// Creates a named-node term from an IRI.
    pub fn named(iri: impl Into<Arc<str>>) -> Self {
        Term::NamedNode(iri.into())
    }

    /// Creates a blank-node term from a document-scoped label.
    pub fn blank(label: impl Into<Arc<str>>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Creates an untyped literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new(value))
    }

    /// Creates a typed literal term.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal::typed(value, datatype))
    }

    /// Returns the identifier text for named and blank nodes, `None` for literals.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Term::NamedNode(iri) => Some(iri),
            Term::BlankNode(label) => Some(label),
            Term::Literal(_) => None,
        }
    }

    /// Returns the literal, if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns `true` if this term is a literal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Returns `true` if this term can refer to another node (named or blank).
    #[must_use]
    pub fn is_node(&self) -> bool {
        !self.is_literal()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => lit.fmt(f),
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_node_as_str() {
        let term = Term::named("ex:thing");
        assert_eq!(term.as_str(), Some("ex:thing"));
        assert!(term.is_node());
    }

    #[test]
    fn blank_node_as_str() {
        let term = Term::blank("b0");
        assert_eq!(term.as_str(), Some("b0"));
        assert!(term.is_node());
    }

    #[test]
    fn literal_has_no_identifier() {
        let term = Term::literal("hello");
        assert_eq!(term.as_str(), None);
        assert!(term.is_literal());
        assert_eq!(term.as_literal().unwrap().value, "hello");
    }

    #[test]
    fn typed_literal_keeps_datatype() {
        let term = Term::typed_literal("1", "http://www.w3.org/2001/XMLSchema#integer");
        let lit = term.as_literal().unwrap();
        assert_eq!(lit.value, "1");
        assert!(lit.datatype.as_deref().unwrap().ends_with("integer"));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Term::named("ex:a").to_string(), "<ex:a>");
        assert_eq!(Term::blank("b1").to_string(), "_:b1");
        assert_eq!(Term::literal("x").to_string(), "\"x\"");
        assert_eq!(
            Term::typed_literal("x", "ex:dt").to_string(),
            "\"x\"^^<ex:dt>"
        );
    }

    #[test]
    fn terms_are_hashable_map_keys() {
        let mut map = hashbrown::HashMap::new();
        map.insert(Term::named("ex:a"), 1);
        map.insert(Term::blank("b0"), 2);
        assert_eq!(map.get(&Term::named("ex:a")), Some(&1));
        assert_eq!(map.get(&Term::blank("b0")), Some(&2));
    }
}
