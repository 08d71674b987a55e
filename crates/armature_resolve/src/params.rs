//! Effective parameter sets and single-parameter resolution.
//!
//! [`resolve`] computes one parameter's effective value(s) against one
//! scope, applying the full modifier pipeline in order: explicit values,
//! scoped defaults, plain defaults, the required check, fixed values,
//! uniqueness collapse, datatype coercion, and lazy tagging.

use armature_graph::datatype::Datatype;
use armature_graph::scope::Scope;
use armature_graph::term::Term;
use armature_registry::component::Component;
use armature_registry::parameter::Parameter;
use indexmap::IndexMap;
use tracing::trace;

use crate::error::ResolveError;
use crate::value::ArgumentValue;

// ─────────────────────────────────────────────────────────────────────────────
// EffectiveParameters
// ─────────────────────────────────────────────────────────────────────────────

/// The parameters in force for one instantiation.
///
/// Starts as the component's frozen, fully-merged parameter list; value
/// inheritance may extend it with parameters registered by restriction
/// rules. Lookups fall back to a bare, modifier-free parameter so that a
/// template may reference properties no component declared.
#[derive(Debug, Clone)]
pub struct EffectiveParameters {
    owner: Option<Term>,
    params: IndexMap<Term, Parameter>,
}

impl EffectiveParameters {
    /// Builds the parameter set of a finalized component.
    #[must_use]
    pub fn of_component(component: &Component) -> Self {
        Self {
            owner: Some(component.type_iri().clone()),
            params: component
                .parameters()
                .iter()
                .map(|p| (p.id().clone(), p.clone()))
                .collect(),
        }
    }

    /// Builds an empty set with no owning component (dynamic entries).
    #[must_use]
    pub fn bare() -> Self {
        Self {
            owner: None,
            params: IndexMap::new(),
        }
    }

    /// Returns the owning component type, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&Term> {
        self.owner.as_ref()
    }

    /// Looks up a declared parameter.
    #[must_use]
    pub fn get(&self, id: &Term) -> Option<&Parameter> {
        self.params.get(id)
    }

    /// Returns the declared parameter, or a bare stand-in for undeclared ids.
    #[must_use]
    pub fn get_or_bare(&self, id: &Term) -> Parameter {
        self.params
            .get(id)
            .cloned()
            .unwrap_or_else(|| Parameter::new(id.clone()))
    }

    /// Registers a parameter if no declaration exists for its id.
    pub fn ensure(&mut self, id: &Term) {
        if !self.params.contains_key(id) {
            self.params
                .insert(id.clone(), Parameter::new(id.clone()));
        }
    }

    /// Iterates the effective parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// resolve
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves one parameter against one scope.
///
/// Returns an [`ArgumentValue::Values`] wrapper whose items are references
/// and coerced primitives, tagged lazy when the parameter is.
///
/// # Errors
///
/// - [`ResolveError::RequiredParameterMissing`] when a required parameter
///   ends up with no values.
/// - [`ResolveError::FixedUniqueConflict`] when a unique parameter has both
///   a fixed value and explicit values on the scope.
/// - [`ResolveError::TypeCoercion`] when a literal fails the range rules.
pub fn resolve(
    parameter: &Parameter,
    scope: &Scope,
    owner: Option<&Term>,
) -> Result<ArgumentValue, ResolveError> {
    let key = parameter.key().unwrap_or_default();
    let explicit = scope.values(key);
    let had_explicit = !explicit.is_empty();

    let mut values: Vec<Term> = explicit.to_vec();

    // Defaulting: first matching scoped rule, else the plain default.
    if values.is_empty() {
        let scoped = parameter.default_scoped().iter().find(|rule| {
            rule.scope_types
                .iter()
                .any(|ty| scope.is_a(ty) || owner == Some(ty))
        });
        match scoped {
            Some(rule) => values.extend(rule.values.iter().cloned()),
            None => values.extend(parameter.default().iter().cloned()),
        }
    }

    if values.is_empty() && parameter.fixed().is_empty() && parameter.is_required() {
        return Err(ResolveError::RequiredParameterMissing {
            parameter: parameter.id().clone(),
            config: scope.id().clone(),
            serialized: scope.to_debug_json(),
        });
    }

    // Fixed values: exclusive on unique parameters, appended otherwise.
    if !parameter.fixed().is_empty() {
        if parameter.is_unique() {
            if had_explicit {
                return Err(ResolveError::FixedUniqueConflict {
                    parameter: parameter.id().clone(),
                    config: scope.id().clone(),
                    serialized: scope.to_debug_json(),
                });
            }
            values = parameter.fixed().to_vec();
        } else {
            values.extend(parameter.fixed().iter().cloned());
        }
    }

    if parameter.is_unique() && values.len() > 1 {
        values.truncate(1);
    }

    trace!(
        parameter = %parameter.id(),
        config = %scope.id(),
        count = values.len(),
        "parameter resolved"
    );

    let items = values
        .iter()
        .map(|term| coerce_term(parameter, term))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ArgumentValue::Values {
        items,
        unique: parameter.is_unique(),
    })
}

/// Coerces one resolved term: literals obey the parameter's range (or their
/// own datatype), node references pass through symbolically.
fn coerce_term(parameter: &Parameter, term: &Term) -> Result<ArgumentValue, ResolveError> {
    match term {
        Term::Literal(lit) => {
            let coerced = match parameter.range() {
                Some(range) => range.coerce(&lit.value),
                None => Datatype::coerce_literal(lit),
            };
            let value = coerced.map_err(|source| ResolveError::TypeCoercion {
                subject: parameter.id().clone(),
                literal: lit.value.clone(),
                source,
            })?;
            Ok(ArgumentValue::Primitive {
                value,
                lazy: parameter.is_lazy(),
            })
        }
        node => Ok(ArgumentValue::Reference {
            target: node.clone(),
            lazy: parameter.is_lazy(),
        }),
    }
}
