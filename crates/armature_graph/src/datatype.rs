//! Datatype decoding and literal coercion.
//!
//! A parameter may declare a *range*, a datatype IRI constraining its
//! values. The IRI is decoded once, at registration time, into a [`Datatype`];
//! coercion of raw literal text into a typed [`Primitive`] then happens
//! without re-inspecting IRI strings.
//!
//! # Coercion rules
//!
//! - **Boolean** requires exactly `"true"` or `"false"`.
//! - **Integer family** requires an `i64` parse whose canonical rendering
//!   round-trips to the exact source text, so `"1.5"`, `"1e3"` and `"007"`
//!   are all rejected rather than silently truncated.
//! - **Float family** accepts any parseable `f64`.
//! - **Json** accepts any `serde_json`-parseable document.
//! - **String** accepts everything verbatim.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::term::Literal;

/// XSD namespace prefix shared by the built-in datatype IRIs.
const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// JSON datatype IRI (RDF 1.1 `rdf:JSON`).
const RDF_JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";

// ─────────────────────────────────────────────────────────────────────────────
// Datatype
// ─────────────────────────────────────────────────────────────────────────────

/// A coercion target decoded from a datatype IRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datatype {
    /// `xsd:boolean`.
    Boolean,
    /// `xsd:integer` and its fixed-width/sign-restricted variants.
    Integer,
    /// `xsd:float`, `xsd:double` and `xsd:decimal`.
    Float,
    /// `xsd:string` (and any untyped text).
    String,
    /// `rdf:JSON` raw documents.
    Json,
}

impl Datatype {
    /// Decodes a datatype IRI into a coercion target.
    ///
    /// Returns `None` for IRIs the engine does not coerce; values of such
    /// datatypes pass through as raw strings.
    #[must_use]
    pub fn from_iri(iri: &str) -> Option<Self> {
        if iri == RDF_JSON {
            return Some(Datatype::Json);
        }
        let local = iri.strip_prefix(XSD)?;
        match local {
            "boolean" => Some(Datatype::Boolean),
            "integer" | "long" | "int" | "short" | "byte" | "nonNegativeInteger"
            | "nonPositiveInteger" | "negativeInteger" | "positiveInteger" | "unsignedLong"
            | "unsignedInt" | "unsignedShort" | "unsignedByte" => Some(Datatype::Integer),
            "float" | "double" | "decimal" => Some(Datatype::Float),
            "string" | "normalizedString" => Some(Datatype::String),
            _ => None,
        }
    }

    /// Coerces raw literal text into a typed primitive.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when the text does not satisfy this
    /// datatype's rules; the offending text is carried in the error.
    pub fn coerce(&self, raw: &str) -> Result<Primitive, CoercionError> {
        match self {
            Datatype::Boolean => match raw {
                "true" => Ok(Primitive::Boolean(true)),
                "false" => Ok(Primitive::Boolean(false)),
                _ => Err(CoercionError::InvalidBoolean(raw.to_string())),
            },
            Datatype::Integer => raw
                .parse::<i64>()
                .ok()
                // Canonical form must equal the source text: no fractions,
                // exponents, or leading zeros.
                .filter(|n| n.to_string() == raw)
                .map(Primitive::Integer)
                .ok_or_else(|| CoercionError::InvalidInteger(raw.to_string())),
            Datatype::Float => raw
                .parse::<f64>()
                .map(Primitive::Float)
                .map_err(|_| CoercionError::InvalidFloat(raw.to_string())),
            Datatype::String => Ok(Primitive::String(raw.to_string())),
            Datatype::Json => serde_json::from_str(raw)
                .map(Primitive::Json)
                .map_err(|err| CoercionError::InvalidJson {
                    raw: raw.to_string(),
                    detail: err.to_string(),
                }),
        }
    }

    /// Coerces a literal, honoring the literal's own datatype when no
    /// explicit target applies.
    ///
    /// Untyped literals (and literals whose datatype the engine does not
    /// decode) pass through as strings.
    ///
    /// # Errors
    ///
    /// Same as [`coerce`](Self::coerce).
    pub fn coerce_literal(lit: &Literal) -> Result<Primitive, CoercionError> {
        match lit.datatype.as_deref().and_then(Datatype::from_iri) {
            Some(datatype) => datatype.coerce(&lit.value),
            None => Ok(Primitive::String(lit.value.clone())),
        }
    }
}

/// Errors raised while coercing literal text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoercionError {
    /// The text is not exactly `"true"` or `"false"`.
    #[error("invalid boolean literal '{0}': expected 'true' or 'false'")]
    InvalidBoolean(String),

    /// The text is not an integer that round-trips to its source form.
    #[error("invalid integer literal '{0}': must be a plain integer with no truncation")]
    InvalidInteger(String),

    /// The text is not a parseable float.
    #[error("invalid float literal '{0}'")]
    InvalidFloat(String),

    /// The text is not a parseable JSON document.
    #[error("invalid json literal '{raw}': {detail}")]
    InvalidJson {
        /// The offending source text.
        raw: String,
        /// The parser's diagnostic.
        detail: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Primitive
// ─────────────────────────────────────────────────────────────────────────────

/// A coerced literal value, ready for the creation strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Verbatim text.
    String(String),
    /// A boolean.
    Boolean(bool),
    /// A round-tripping integer.
    Integer(i64),
    /// A float-family number.
    Float(f64),
    /// A raw JSON document.
    Json(serde_json::Value),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::String(s) => f.write_str(s),
            Primitive::Boolean(b) => b.fmt(f),
            Primitive::Integer(n) => n.fmt(f),
            Primitive::Float(x) => x.fmt(f),
            Primitive::Json(v) => v.fmt(f),
        }
    }
}
