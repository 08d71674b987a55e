//! A reference backend materializing plain value trees.
//!
//! [`ValueStrategy`] builds [`InstanceValue`] trees in memory: constructor
//! calls become records, hashes and arrays stay collections, primitives pass
//! through, and lazy values hold their supplier. It is dependency-free and
//! is what the test-suite (and anything that just wants to inspect a wired
//! configuration) runs against.

use core::fmt;
use std::sync::Arc;

use armature_graph::datatype::Primitive;
use armature_graph::term::Term;
use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::{InstantiationError, StrategyError};
use crate::strategy::{CreationSettings, CreationStrategy, LazySupplier};

// ─────────────────────────────────────────────────────────────────────────────
// InstanceValue
// ─────────────────────────────────────────────────────────────────────────────

/// An instance materialized by [`ValueStrategy`].
#[derive(Clone)]
pub enum InstanceValue {
    /// A constructor-call record.
    Constructed {
        /// The config's identity.
        instance_id: Term,
        /// The owning module's require name.
        require_name: Arc<str>,
        /// The element within the require target, if any.
        require_element: Option<Arc<str>>,
        /// Whether a constructor would be invoked.
        call_constructor: bool,
        /// The realized constructor arguments.
        args: Vec<InstanceValue>,
    },
    /// A keyed collection, in entry order.
    Hash(IndexMap<Arc<str>, InstanceValue>),
    /// A positional collection.
    Array(Vec<InstanceValue>),
    /// A coerced literal.
    Primitive(Primitive),
    /// A deferred realization.
    Lazy(LazySupplier<InstanceValue>),
    /// The undefined sentinel.
    Undefined,
}

impl InstanceValue {
    /// Returns the hash entries, if this is a hash.
    #[must_use]
    pub fn as_hash(&self) -> Option<&IndexMap<Arc<str>, InstanceValue>> {
        match self {
            InstanceValue::Hash(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[InstanceValue]> {
        match self {
            InstanceValue::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the primitive, if this is one.
    #[must_use]
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            InstanceValue::Primitive(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for the undefined sentinel.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, InstanceValue::Undefined)
    }

    /// Returns `true` for a deferred value.
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        matches!(self, InstanceValue::Lazy(_))
    }

    /// Forces a deferred value; eager values return a clone of themselves.
    ///
    /// # Errors
    ///
    /// Propagates whatever the deferred realization produces.
    pub async fn force(&self) -> Result<InstanceValue, InstantiationError> {
        match self {
            InstanceValue::Lazy(supplier) => supplier().await,
            eager => Ok(eager.clone()),
        }
    }
}

impl fmt::Debug for InstanceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceValue::Constructed {
                instance_id,
                require_name,
                require_element,
                call_constructor,
                args,
            } => f
                .debug_struct("Constructed")
                .field("instance_id", instance_id)
                .field("require_name", require_name)
                .field("require_element", require_element)
                .field("call_constructor", call_constructor)
                .field("args", args)
                .finish(),
            InstanceValue::Hash(entries) => f.debug_tuple("Hash").field(entries).finish(),
            InstanceValue::Array(elements) => f.debug_tuple("Array").field(elements).finish(),
            InstanceValue::Primitive(value) => f.debug_tuple("Primitive").field(value).finish(),
            InstanceValue::Lazy(_) => f.write_str("Lazy(..)"),
            InstanceValue::Undefined => f.write_str("Undefined"),
        }
    }
}

impl PartialEq for InstanceValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                InstanceValue::Constructed {
                    instance_id: a_id,
                    require_name: a_rn,
                    require_element: a_re,
                    call_constructor: a_cc,
                    args: a_args,
                },
                InstanceValue::Constructed {
                    instance_id: b_id,
                    require_name: b_rn,
                    require_element: b_re,
                    call_constructor: b_cc,
                    args: b_args,
                },
            ) => a_id == b_id && a_rn == b_rn && a_re == b_re && a_cc == b_cc && a_args == b_args,
            (InstanceValue::Hash(a), InstanceValue::Hash(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (InstanceValue::Array(a), InstanceValue::Array(b)) => a == b,
            (InstanceValue::Primitive(a), InstanceValue::Primitive(b)) => a == b,
            (InstanceValue::Undefined, InstanceValue::Undefined) => true,
            // Deferred values never compare equal, not even to themselves.
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ValueStrategy
// ─────────────────────────────────────────────────────────────────────────────

/// The in-memory creation strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueStrategy;

#[async_trait]
impl CreationStrategy for ValueStrategy {
    type Instance = InstanceValue;

    async fn create_instance(
        &self,
        settings: CreationSettings<InstanceValue>,
    ) -> Result<InstanceValue, StrategyError> {
        Ok(InstanceValue::Constructed {
            instance_id: settings.instance_id,
            require_name: settings.require_name,
            require_element: settings.require_element,
            call_constructor: settings.call_constructor,
            args: settings.args,
        })
    }

    async fn create_hash(
        &self,
        entries: Vec<(Arc<str>, InstanceValue)>,
    ) -> Result<InstanceValue, StrategyError> {
        Ok(InstanceValue::Hash(entries.into_iter().collect()))
    }

    async fn create_array(
        &self,
        elements: Vec<InstanceValue>,
    ) -> Result<InstanceValue, StrategyError> {
        Ok(InstanceValue::Array(elements))
    }

    async fn create_primitive(&self, value: Primitive) -> Result<InstanceValue, StrategyError> {
        Ok(InstanceValue::Primitive(value))
    }

    fn create_lazy(
        &self,
        supplier: LazySupplier<InstanceValue>,
    ) -> Result<InstanceValue, StrategyError> {
        Ok(InstanceValue::Lazy(supplier))
    }

    fn variable_value(&self, _name: &str) -> Option<InstanceValue> {
        None
    }

    fn create_undefined(&self) -> InstanceValue {
        InstanceValue::Undefined
    }
}
