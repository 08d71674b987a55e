//! The resolved argument-value tree.
//!
//! [`ArgumentValue`] is what the mapper produces and the realizer consumes:
//! the template's shape with every parameter reference replaced by its
//! resolved values. References stay symbolic; turning them into instances
//! is the pool's job, so resolution itself never suspends.

use std::sync::Arc;

use armature_graph::datatype::Primitive;
use armature_graph::term::Term;

/// One node of a resolved argument-value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// A keyed object, fields in declared order.
    Hash(Vec<HashEntry>),
    /// A positional list, elements in declared order.
    Array(Vec<ArgumentValue>),
    /// The value wrapper holding one parameter's resolved values.
    ///
    /// A unique wrapper with a single item realizes to that item's scalar;
    /// anything else realizes to an array.
    Values {
        /// The resolved items, in resolution order.
        items: Vec<ArgumentValue>,
        /// Whether the owning parameter was declared unique.
        unique: bool,
    },
    /// A reference to another config, realized through the pool.
    Reference {
        /// The referenced config's identity.
        target: Term,
        /// Realize behind a zero-argument supplier instead of eagerly.
        lazy: bool,
    },
    /// A coerced literal leaf.
    Primitive {
        /// The coerced value.
        value: Primitive,
        /// Realize behind a zero-argument supplier instead of eagerly.
        lazy: bool,
    },
}

/// One field of a resolved hash.
#[derive(Debug, Clone, PartialEq)]
pub struct HashEntry {
    /// The field key.
    pub key: Arc<str>,
    /// The field value.
    pub value: ArgumentValue,
}

impl ArgumentValue {
    /// Creates an eager primitive leaf.
    #[must_use]
    pub fn primitive(value: Primitive) -> Self {
        ArgumentValue::Primitive { value, lazy: false }
    }

    /// Creates an eager reference leaf.
    #[must_use]
    pub fn reference(target: Term) -> Self {
        ArgumentValue::Reference {
            target,
            lazy: false,
        }
    }

    /// Returns `true` for a value wrapper holding nothing, the shape that
    /// makes an optional hash field disappear.
    #[must_use]
    pub fn is_empty_values(&self) -> bool {
        matches!(self, ArgumentValue::Values { items, .. } if items.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_detection() {
        let empty = ArgumentValue::Values {
            items: vec![],
            unique: false,
        };
        let full = ArgumentValue::Values {
            items: vec![ArgumentValue::primitive(Primitive::Integer(1))],
            unique: true,
        };
        assert!(empty.is_empty_values());
        assert!(!full.is_empty_values());
        assert!(!ArgumentValue::Array(vec![]).is_empty_values());
    }
}
