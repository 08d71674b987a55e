//! Cross-instance value inheritance.
//!
//! A component may declare that a parameter inherits its values from every
//! previously instantiated config of some other type. The pool records each
//! config it constructs into a [`ConfigHistory`];
//! [`apply_value_inheritance`] replays that history onto the current scope
//! before arguments are mapped.
//!
//! The sealed graph is never touched: inherited values land on the
//! [`Scope`], and the inherited parameter joins the
//! [`EffectiveParameters`] so the mapper picks it up.

use armature_graph::scope::Scope;
use armature_graph::term::Term;
use armature_registry::component::Component;
use indexmap::IndexMap;
use tracing::trace;

use crate::error::ResolveError;
use crate::params::EffectiveParameters;

// ─────────────────────────────────────────────────────────────────────────────
// ConfigHistory
// ─────────────────────────────────────────────────────────────────────────────

/// The per-pool record of already-instantiated configs, indexed by type.
///
/// Append-only; each entry is the config's scope snapshot taken after its
/// own value inheritance ran, so inherited values chain across instances.
#[derive(Debug, Default)]
pub struct ConfigHistory {
    by_type: IndexMap<Term, Vec<Scope>>,
}

impl ConfigHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a config's scope under each of its declared types.
    pub fn record(&mut self, scope: &Scope) {
        for ty in scope.types() {
            self.by_type
                .entry(ty.clone())
                .or_default()
                .push(scope.clone());
        }
    }

    /// Returns the recorded configs of a type, in instantiation order.
    #[must_use]
    pub fn configs_of(&self, ty: &Term) -> &[Scope] {
        self.by_type.get(ty).map_or(&[], Vec::as_slice)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// apply_value_inheritance
// ─────────────────────────────────────────────────────────────────────────────

/// Applies every value-inheritance rule the component declares.
///
/// For each rule, every prior config of the rule's source type contributes
/// its values of the inherited parameter, appended in instantiation order.
/// The config currently being resolved never inherits from itself.
///
/// # Errors
///
/// - [`ResolveError::MissingFrom`] / [`ResolveError::MissingOnParameter`]
///   when a rule is incomplete.
/// - [`ResolveError::InvalidReferenceType`] when a rule field is a literal.
pub fn apply_value_inheritance(
    component: &Component,
    scope: &mut Scope,
    params: &mut EffectiveParameters,
    history: &ConfigHistory,
) -> Result<(), ResolveError> {
    for parameter in component.parameters() {
        for rule in parameter.inherit_values() {
            let from_type = rule
                .from_type
                .as_ref()
                .ok_or_else(|| ResolveError::MissingFrom {
                    parameter: parameter.id().clone(),
                })?;
            let on_parameter =
                rule.on_parameter
                    .as_ref()
                    .ok_or_else(|| ResolveError::MissingOnParameter {
                        parameter: parameter.id().clone(),
                    })?;
            for term in [from_type, on_parameter] {
                if term.is_literal() {
                    return Err(ResolveError::InvalidReferenceType {
                        parameter: parameter.id().clone(),
                        term: term.clone(),
                    });
                }
            }

            let key = on_parameter
                .as_str()
                .expect("non-literal terms always carry an identifier");

            let mut inherited = 0usize;
            for prior in history.configs_of(from_type) {
                if prior.id() == scope.id() {
                    continue;
                }
                for value in prior.values(key).to_vec() {
                    scope.append(key, value);
                    inherited += 1;
                }
            }
            params.ensure(on_parameter);

            trace!(
                config = %scope.id(),
                from = %from_type,
                parameter = %on_parameter,
                inherited,
                "value inheritance applied"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_graph::resource::Resource;
    use armature_registry::parameter::{Parameter, Restriction};

    fn scope(id: &str, ty: &str, values: &[(&str, &str)]) -> Scope {
        let mut resource = Resource::new(Term::named(id)).with_type(Term::named(ty));
        for (key, value) in values {
            resource = resource.with_property(*key, Term::literal(*value));
        }
        Scope::of(&resource)
    }

    fn inheriting_component() -> Component {
        Component::new(Term::named("ex:B")).with_parameter(
            Parameter::new(Term::named("ex:p")).with_inherited_values(Restriction::of(
                Term::named("ex:A"),
                Term::named("ex:p"),
            )),
        )
    }

    #[test]
    fn inherits_from_one_prior_instance() {
        let mut history = ConfigHistory::new();
        history.record(&scope("ex:a1", "ex:A", &[("ex:p", "X")]));

        let component = inheriting_component();
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        apply_value_inheritance(&component, &mut target, &mut params, &history).unwrap();

        let values: Vec<_> = target
            .values("ex:p")
            .iter()
            .map(|t| t.as_literal().unwrap().value.clone())
            .collect();
        assert_eq!(values, ["X"]);
        assert!(params.get(&Term::named("ex:p")).is_some());
    }

    #[test]
    fn inherits_from_every_prior_instance_in_order() {
        let mut history = ConfigHistory::new();
        history.record(&scope("ex:a1", "ex:A", &[("ex:p", "X")]));
        history.record(&scope("ex:a2", "ex:A", &[("ex:p", "Y")]));

        let component = inheriting_component();
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        apply_value_inheritance(&component, &mut target, &mut params, &history).unwrap();

        let values: Vec<_> = target
            .values("ex:p")
            .iter()
            .map(|t| t.as_literal().unwrap().value.clone())
            .collect();
        assert_eq!(values, ["X", "Y"]);
    }

    #[test]
    fn priors_without_the_parameter_contribute_nothing() {
        let mut history = ConfigHistory::new();
        history.record(&scope("ex:a1", "ex:A", &[]));
        history.record(&scope("ex:a2", "ex:A", &[("ex:p", "Y")]));

        let component = inheriting_component();
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        apply_value_inheritance(&component, &mut target, &mut params, &history).unwrap();
        assert_eq!(target.values("ex:p").len(), 1);
    }

    #[test]
    fn own_instance_is_skipped() {
        let mut history = ConfigHistory::new();
        history.record(&scope("ex:b1", "ex:A", &[("ex:p", "self")]));

        let component = inheriting_component();
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        apply_value_inheritance(&component, &mut target, &mut params, &history).unwrap();
        assert!(target.values("ex:p").is_empty());
    }

    #[test]
    fn missing_from_type_is_an_error() {
        let component = Component::new(Term::named("ex:B")).with_parameter(
            Parameter::new(Term::named("ex:p")).with_inherited_values(
                Restriction::new().on_parameter(Term::named("ex:p")),
            ),
        );
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        let err =
            apply_value_inheritance(&component, &mut target, &mut params, &ConfigHistory::new())
                .unwrap_err();
        assert!(matches!(err, ResolveError::MissingFrom { .. }));
    }

    #[test]
    fn missing_on_parameter_is_an_error() {
        let component = Component::new(Term::named("ex:B")).with_parameter(
            Parameter::new(Term::named("ex:p"))
                .with_inherited_values(Restriction::new().from_type(Term::named("ex:A"))),
        );
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        let err =
            apply_value_inheritance(&component, &mut target, &mut params, &ConfigHistory::new())
                .unwrap_err();
        assert!(matches!(err, ResolveError::MissingOnParameter { .. }));
    }

    #[test]
    fn literal_rule_fields_are_an_error() {
        let component = Component::new(Term::named("ex:B")).with_parameter(
            Parameter::new(Term::named("ex:p")).with_inherited_values(Restriction::of(
                Term::literal("not-a-type"),
                Term::named("ex:p"),
            )),
        );
        let mut target = scope("ex:b1", "ex:B", &[]);
        let mut params = EffectiveParameters::of_component(&component);

        let err =
            apply_value_inheritance(&component, &mut target, &mut params, &ConfigHistory::new())
                .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidReferenceType { .. }));
    }
}
