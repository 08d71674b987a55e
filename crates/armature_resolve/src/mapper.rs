//! Template-to-value mapping.
//!
//! [`ArgumentMapper`] walks a component's constructor-argument template with
//! one config's scope and produces the resolved [`ArgumentValue`] tree. Each
//! template node is an explicit variant, so dispatch is a single match;
//! references remain symbolic and nothing here suspends.

use std::sync::Arc;

use armature_graph::datatype::Datatype;
use armature_graph::resource::{Resource, ResourceProvider};
use armature_graph::scope::Scope;
use armature_graph::term::Term;
use armature_registry::template::{ArgumentTemplate, EntryKey, EntryValue};

use crate::error::ResolveError;
use crate::params::{self, EffectiveParameters};
use crate::value::{ArgumentValue, HashEntry};

/// Maps argument templates onto resolved value trees.
pub struct ArgumentMapper<'a> {
    provider: &'a dyn ResourceProvider,
}

impl<'a> ArgumentMapper<'a> {
    /// Creates a mapper reading entry configs from the given provider.
    #[must_use]
    pub fn new(provider: &'a dyn ResourceProvider) -> Self {
        Self { provider }
    }

    /// Maps one template node against one scope.
    ///
    /// # Errors
    ///
    /// Propagates parameter-resolution errors from value references, plus
    /// the dynamic-entry errors [`ResolveError::InvalidKeyType`] and
    /// [`ResolveError::CardinalityMismatch`].
    pub fn map(
        &self,
        template: &ArgumentTemplate,
        scope: &Scope,
        params: &EffectiveParameters,
    ) -> Result<ArgumentValue, ResolveError> {
        match template {
            ArgumentTemplate::Hash { fields } => {
                let mut entries = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = self.map(&field.value, scope, params)?;
                    // Valueless optional fields disappear.
                    if value.is_empty_values() {
                        continue;
                    }
                    entries.push(HashEntry {
                        key: Arc::clone(&field.key),
                        value,
                    });
                }
                Ok(ArgumentValue::Hash(entries))
            }
            ArgumentTemplate::Array { elements } => Ok(ArgumentValue::Array(
                elements
                    .iter()
                    .map(|element| self.map(element, scope, params))
                    .collect::<Result<_, _>>()?,
            )),
            ArgumentTemplate::ValueRef { parameter } => {
                let parameter = params.get_or_bare(parameter);
                params::resolve(&parameter, scope, params.owner())
            }
            ArgumentTemplate::DynamicEntries {
                from_types,
                key,
                value,
            } => self.collect_entries(from_types, key.as_ref(), value, scope),
            ArgumentTemplate::Literal(lit) => {
                let value = Datatype::coerce_literal(lit).map_err(|source| {
                    ResolveError::TypeCoercion {
                        subject: scope.id().clone(),
                        literal: lit.value.clone(),
                        source,
                    }
                })?;
                Ok(ArgumentValue::primitive(value))
            }
            ArgumentTemplate::Reference(target) => Ok(ArgumentValue::reference(target.clone())),
        }
    }

    /// Gathers dynamic entries from the scope's property values.
    ///
    /// Candidates are visited in property insertion order; only values
    /// referencing a resource that carries one of `from_types` participate.
    /// With a key source the result is a hash (each value marked unique),
    /// without one a plain array.
    fn collect_entries(
        &self,
        from_types: &[Term],
        key: Option<&EntryKey>,
        value: &EntryValue,
        scope: &Scope,
    ) -> Result<ArgumentValue, ResolveError> {
        let mut keyed: Vec<HashEntry> = Vec::new();
        let mut unkeyed: Vec<ArgumentValue> = Vec::new();

        for (_, values) in scope.properties() {
            for term in values {
                if !term.is_node() {
                    continue;
                }
                let Some(entry) = self.provider.resource(term) else {
                    continue;
                };
                if !from_types.iter().any(|ty| entry.is_a(ty)) {
                    continue;
                }
                // A valueless entry is dropped, never an error.
                let Some(derived) = self.entry_value(value, entry)? else {
                    continue;
                };
                match key {
                    Some(key) => keyed.push(HashEntry {
                        key: self.entry_key(key, entry)?,
                        value: ArgumentValue::Values {
                            items: vec![derived],
                            unique: true,
                        },
                    }),
                    None => unkeyed.push(derived),
                }
            }
        }

        Ok(match key {
            Some(_) => ArgumentValue::Hash(keyed),
            None => ArgumentValue::Array(unkeyed),
        })
    }

    /// Derives one entry's hash key.
    fn entry_key(&self, key: &EntryKey, entry: &Resource) -> Result<Arc<str>, ResolveError> {
        match key {
            EntryKey::Literal(lit) => Ok(Arc::from(lit.value.as_str())),
            EntryKey::Property(property) => match entry.values(property) {
                [Term::Literal(lit)] => Ok(Arc::from(lit.value.as_str())),
                [other] => Err(ResolveError::InvalidKeyType {
                    entry: entry.id().clone(),
                    term: other.clone(),
                }),
                values => Err(ResolveError::CardinalityMismatch {
                    entry: entry.id().clone(),
                    property: Arc::clone(property),
                    actual: values.len(),
                }),
            },
            EntryKey::Subject => match entry.id().as_str() {
                Some(id) => Ok(Arc::from(id)),
                None => Err(ResolveError::InvalidKeyType {
                    entry: entry.id().clone(),
                    term: entry.id().clone(),
                }),
            },
        }
    }

    /// Derives one entry's value; `None` drops the entry.
    fn entry_value(
        &self,
        value: &EntryValue,
        entry: &Resource,
    ) -> Result<Option<ArgumentValue>, ResolveError> {
        match value {
            EntryValue::Literal(lit) => {
                let coerced =
                    Datatype::coerce_literal(lit).map_err(|source| ResolveError::TypeCoercion {
                        subject: entry.id().clone(),
                        literal: lit.value.clone(),
                        source,
                    })?;
                Ok(Some(ArgumentValue::primitive(coerced)))
            }
            EntryValue::Property(property) => match entry.values(property) {
                [] => Ok(None),
                [single] => Ok(Some(self.term_value(single, entry)?)),
                values => Err(ResolveError::CardinalityMismatch {
                    entry: entry.id().clone(),
                    property: Arc::clone(property),
                    actual: values.len(),
                }),
            },
            EntryValue::Subject => Ok(Some(ArgumentValue::reference(entry.id().clone()))),
            EntryValue::Mapped(template) => {
                let mapped = self.map(template, &Scope::of(entry), &EffectiveParameters::bare())?;
                Ok(if mapped.is_empty_values() {
                    None
                } else {
                    Some(mapped)
                })
            }
        }
    }

    /// Converts one raw term into a value leaf.
    fn term_value(&self, term: &Term, entry: &Resource) -> Result<ArgumentValue, ResolveError> {
        match term {
            Term::Literal(lit) => {
                let coerced =
                    Datatype::coerce_literal(lit).map_err(|source| ResolveError::TypeCoercion {
                        subject: entry.id().clone(),
                        literal: lit.value.clone(),
                        source,
                    })?;
                Ok(ArgumentValue::primitive(coerced))
            }
            node => Ok(ArgumentValue::reference(node.clone())),
        }
    }
}
