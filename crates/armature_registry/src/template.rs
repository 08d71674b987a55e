//! The constructor-argument template tree.
//!
//! An [`ArgumentTemplate`] describes how a component's resolved parameter
//! values map onto the shape its constructor expects. The shape of every
//! node is decided once, at template construction time, as an explicit
//! tagged union: the mapper dispatches on the variant and never sniffs for
//! the presence of fields.

use std::sync::Arc;

use armature_graph::term::{Literal, Term};

// ─────────────────────────────────────────────────────────────────────────────
// ArgumentTemplate
// ─────────────────────────────────────────────────────────────────────────────

/// One node of a constructor-argument template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentTemplate {
    /// A keyed object; fields map recursively and valueless fields are
    /// dropped at mapping time.
    Hash {
        /// The declared fields, in order.
        fields: Vec<HashField>,
    },
    /// A positional list; element order is the declared order.
    Array {
        /// The declared elements, in order.
        elements: Vec<ArgumentTemplate>,
    },
    /// The resolved value(s) of one parameter.
    ValueRef {
        /// The parameter whose resolution supplies the value.
        parameter: Term,
    },
    /// Entries gathered from the config's own property values, filtered by
    /// entry type; keyed entries emit a hash, unkeyed entries an array.
    DynamicEntries {
        /// Entry-config types that participate.
        from_types: Vec<Term>,
        /// How each entry's key is derived; `None` emits array elements.
        key: Option<EntryKey>,
        /// How each entry's value is derived.
        value: EntryValue,
    },
    /// A verbatim literal.
    Literal(Literal),
    /// A reference to another config, instantiated recursively.
    Reference(Term),
}

impl ArgumentTemplate {
    /// Creates a hash template from `(key, value)` pairs.
    #[must_use]
    pub fn hash(fields: impl IntoIterator<Item = (Arc<str>, ArgumentTemplate)>) -> Self {
        ArgumentTemplate::Hash {
            fields: fields
                .into_iter()
                .map(|(key, value)| HashField { key, value })
                .collect(),
        }
    }

    /// Creates an array template.
    #[must_use]
    pub fn array(elements: impl IntoIterator<Item = ArgumentTemplate>) -> Self {
        ArgumentTemplate::Array {
            elements: elements.into_iter().collect(),
        }
    }

    /// Creates a parameter-value reference.
    #[must_use]
    pub fn value_ref(parameter: Term) -> Self {
        ArgumentTemplate::ValueRef { parameter }
    }

    /// Merges a supertype's hash fields into this template.
    ///
    /// Only hash/hash pairs merge; the subtype keeps its own field on a key
    /// collision. Non-hash templates are left untouched; a subtype that
    /// redeclares its argument shape owns it outright.
    pub fn merge_supertype_fields(&mut self, supertype: &ArgumentTemplate) {
        let (ArgumentTemplate::Hash { fields }, ArgumentTemplate::Hash { fields: inherited }) =
            (&mut *self, supertype)
        else {
            return;
        };
        for field in inherited {
            if !fields.iter().any(|f| f.key == field.key) {
                fields.push(field.clone());
            }
        }
    }
}

/// One field of a hash template.
#[derive(Debug, Clone, PartialEq)]
pub struct HashField {
    /// The literal field key.
    pub key: Arc<str>,
    /// The template producing the field's value.
    pub value: ArgumentTemplate,
}

// ─────────────────────────────────────────────────────────────────────────────
// EntryKey / EntryValue
// ─────────────────────────────────────────────────────────────────────────────

/// How a dynamic entry derives its hash key.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKey {
    /// A verbatim literal, identical for every entry.
    Literal(Literal),
    /// A named single-valued literal property read off the entry.
    Property(Arc<str>),
    /// The entry's own identifier.
    Subject,
}

/// How a dynamic entry derives its value.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// A verbatim literal, identical for every entry.
    Literal(Literal),
    /// A named single-valued property read off the entry.
    Property(Arc<str>),
    /// The entry's own identifier, instantiated recursively.
    Subject,
    /// A recursive mapping with the entry itself as scope.
    Mapped(Box<ArgumentTemplate>),
}
