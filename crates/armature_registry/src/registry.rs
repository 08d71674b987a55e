//! The registry and its one-shot finalize pass.
//!
//! [`ComponentRegistry`] collects modules and components while open, then
//! [`finalize()`](ComponentRegistry::finalize) walks every supertype chain
//! once: parameters declared by supertypes are unioned into subtypes (dedup
//! by parameter identity) and supertype hash-template fields are merged into
//! subtype templates. After finalize the registry is frozen; instantiation
//! reads fully-merged records and never re-walks the hierarchy.
//!
//! Cyclic supertype declarations are refused outright; the walk carries a
//! visited stack and reports the offending chain.

use armature_graph::term::Term;
use hashbrown::HashMap;
use indexmap::IndexMap;
use tracing::debug;

use crate::component::{Component, Module};
use crate::parameter::Parameter;
use crate::template::ArgumentTemplate;

// ─────────────────────────────────────────────────────────────────────────────
// RegistryError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while registering or finalizing component metadata.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two modules were registered under the same identity.
    #[error("duplicate module: {0}")]
    DuplicateModule(Term),

    /// Two components were registered under the same type IRI.
    #[error("duplicate component: {0}")]
    DuplicateComponent(Term),

    /// A component was registered against a module the registry has not seen.
    #[error("component {component} names unknown module {module}")]
    UnknownModule {
        /// The offending component type.
        component: Term,
        /// The module it claimed.
        module: Term,
    },

    /// A component extends a type no component was registered for.
    #[error("component {component} extends unknown supertype {supertype}")]
    UnknownSupertype {
        /// The extending component.
        component: Term,
        /// The missing supertype.
        supertype: Term,
    },

    /// The supertype graph contains a cycle.
    #[error("cyclic supertype chain: {}", .path.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> "))]
    SupertypeCycle {
        /// The components on the cycle, in walk order.
        path: Vec<Term>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// ComponentRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Fully-merged parts computed for one component during finalize.
struct MergedParts {
    parameters: Vec<Parameter>,
    template: Option<ArgumentTemplate>,
}

/// The component registry: open for registration, then finalized and frozen.
///
/// # Example
///
/// ```
/// use armature_graph::term::Term;
/// use armature_registry::component::{Component, Module};
/// use armature_registry::registry::ComponentRegistry;
///
/// let mut registry = ComponentRegistry::new();
/// registry.register_module(Module::new(Term::named("ex:mod"), "my-package")).unwrap();
/// registry
///     .register_component(&Term::named("ex:mod"), Component::new(Term::named("ex:T")))
///     .unwrap();
/// registry.finalize().unwrap();
/// assert!(registry.is_finalized());
/// ```
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    modules: IndexMap<Term, Module>,
    components: IndexMap<Term, Component>,
    component_module: HashMap<Term, Term>,
    finalized: bool,
}

impl ComponentRegistry {
    /// Creates an empty, open registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateModule`] on identity collision.
    ///
    /// # Panics
    ///
    /// Panics if the registry has been finalized.
    pub fn register_module(&mut self, module: Module) -> Result<(), RegistryError> {
        assert!(
            !self.finalized,
            "ComponentRegistry is finalized; modules can only be registered while open"
        );
        if self.modules.contains_key(module.iri()) {
            return Err(RegistryError::DuplicateModule(module.iri().clone()));
        }
        self.modules.insert(module.iri().clone(), module);
        Ok(())
    }

    /// Registers a component under an already-registered module.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownModule`] if the module has not been
    /// registered, or [`RegistryError::DuplicateComponent`] on collision.
    ///
    /// # Panics
    ///
    /// Panics if the registry has been finalized.
    pub fn register_component(
        &mut self,
        module: &Term,
        component: Component,
    ) -> Result<(), RegistryError> {
        assert!(
            !self.finalized,
            "ComponentRegistry is finalized; components can only be registered while open"
        );
        if !self.modules.contains_key(module) {
            return Err(RegistryError::UnknownModule {
                component: component.type_iri().clone(),
                module: module.clone(),
            });
        }
        if self.components.contains_key(component.type_iri()) {
            return Err(RegistryError::DuplicateComponent(
                component.type_iri().clone(),
            ));
        }
        self.component_module
            .insert(component.type_iri().clone(), module.clone());
        self.components
            .insert(component.type_iri().clone(), component);
        Ok(())
    }

    /// Resolves inheritance for every component and freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSupertype`] or
    /// [`RegistryError::SupertypeCycle`] when the supertype graph is broken;
    /// the registry stays open in that case.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn finalize(&mut self) -> Result<(), RegistryError> {
        assert!(
            !self.finalized,
            "ComponentRegistry::finalize() was already called. Cannot finalize twice."
        );

        let mut merged: HashMap<Term, MergedParts> = HashMap::new();
        let mut visiting: Vec<Term> = Vec::new();
        let types: Vec<Term> = self.components.keys().cloned().collect();
        for ty in &types {
            self.merge_component(ty, &mut merged, &mut visiting)?;
        }

        for (ty, parts) in merged {
            let component = self
                .components
                .get_mut(&ty)
                .expect("merged parts exist only for registered components");
            component.set_parameters(parts.parameters);
            component.set_constructor_arguments(parts.template);
        }

        debug!(components = self.components.len(), "component registry finalized");
        self.finalized = true;
        Ok(())
    }

    /// Computes the fully-merged parts for one component, recursing through
    /// its supertype chain with memoization and cycle detection.
    fn merge_component(
        &self,
        ty: &Term,
        merged: &mut HashMap<Term, MergedParts>,
        visiting: &mut Vec<Term>,
    ) -> Result<(), RegistryError> {
        if merged.contains_key(ty) {
            return Ok(());
        }
        if visiting.contains(ty) {
            let mut path = visiting.clone();
            path.push(ty.clone());
            return Err(RegistryError::SupertypeCycle { path });
        }

        let component = self
            .components
            .get(ty)
            .expect("merge_component is called for registered components only");
        visiting.push(ty.clone());

        let mut parameters = component.parameters().to_vec();
        let mut template = component.constructor_arguments().cloned();

        for supertype in component.extends() {
            if !self.components.contains_key(supertype) {
                visiting.pop();
                return Err(RegistryError::UnknownSupertype {
                    component: ty.clone(),
                    supertype: supertype.clone(),
                });
            }
            self.merge_component(supertype, merged, visiting)?;
            let inherited = &merged[supertype];

            for parameter in &inherited.parameters {
                if !parameters.iter().any(|p| p.id() == parameter.id()) {
                    parameters.push(parameter.clone());
                }
            }
            match (&mut template, &inherited.template) {
                (Some(own), Some(sup)) => own.merge_supertype_fields(sup),
                (None, Some(sup)) => template = Some(sup.clone()),
                _ => {}
            }
        }

        visiting.pop();
        merged.insert(
            ty.clone(),
            MergedParts {
                parameters,
                template,
            },
        );
        Ok(())
    }

    /// Returns `true` once `finalize()` has succeeded.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Looks up a component by type IRI.
    #[must_use]
    pub fn component(&self, ty: &Term) -> Option<&Component> {
        self.components.get(ty)
    }

    /// Returns `true` if a component is registered for the type.
    #[must_use]
    pub fn has_component(&self, ty: &Term) -> bool {
        self.components.contains_key(ty)
    }

    /// Returns the module owning a component, if both are registered.
    #[must_use]
    pub fn module_of(&self, component: &Term) -> Option<&Module> {
        self.component_module
            .get(component)
            .and_then(|module| self.modules.get(module))
    }

    /// Looks up a module by identity.
    #[must_use]
    pub fn module(&self, iri: &Term) -> Option<&Module> {
        self.modules.get(iri)
    }

    /// Returns the registered component types, in registration order.
    pub fn component_types(&self) -> impl Iterator<Item = &Term> {
        self.components.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use crate::template::ArgumentTemplate;
    use std::sync::Arc;

    fn registry_with_module() -> (ComponentRegistry, Term) {
        let mut registry = ComponentRegistry::new();
        let module = Term::named("ex:mod");
        registry
            .register_module(Module::new(module.clone(), "my-package"))
            .unwrap();
        (registry, module)
    }

    fn param(iri: &str) -> Parameter {
        Parameter::new(Term::named(iri))
    }

    #[test]
    fn register_and_look_up() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(&module, Component::new(Term::named("ex:T")))
            .unwrap();

        assert!(registry.has_component(&Term::named("ex:T")));
        assert_eq!(
            registry.module_of(&Term::named("ex:T")).unwrap().require_name().as_ref(),
            "my-package"
        );
    }

    #[test]
    fn unknown_module_is_rejected() {
        let mut registry = ComponentRegistry::new();
        let err = registry
            .register_component(&Term::named("ex:ghost"), Component::new(Term::named("ex:T")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownModule { .. }));
    }

    #[test]
    fn finalize_unions_supertype_parameters() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Base"))
                    .with_parameter(param("ex:base"))
                    .with_parameter(param("ex:shared").unique()),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Sub"))
                    .with_parameter(param("ex:own"))
                    .with_parameter(param("ex:shared"))
                    .with_extends(Term::named("ex:Base")),
            )
            .unwrap();

        registry.finalize().unwrap();

        let sub = registry.component(&Term::named("ex:Sub")).unwrap();
        let ids: Vec<_> = sub.parameters().iter().map(|p| p.id().clone()).collect();
        assert_eq!(
            ids,
            [Term::named("ex:own"), Term::named("ex:shared"), Term::named("ex:base")]
        );
        // The subtype's own declaration wins the dedup.
        assert!(!sub.parameter(&Term::named("ex:shared")).unwrap().is_unique());
    }

    #[test]
    fn finalize_walks_deep_chains() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:A")).with_parameter(param("ex:a")),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:B"))
                    .with_parameter(param("ex:b"))
                    .with_extends(Term::named("ex:A")),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:C"))
                    .with_parameter(param("ex:c"))
                    .with_extends(Term::named("ex:B")),
            )
            .unwrap();

        registry.finalize().unwrap();

        let c = registry.component(&Term::named("ex:C")).unwrap();
        assert_eq!(c.parameters().len(), 3);
    }

    #[test]
    fn finalize_merges_template_fields() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Base")).with_constructor_arguments(
                    ArgumentTemplate::hash([(
                        Arc::from("inherited"),
                        ArgumentTemplate::value_ref(Term::named("ex:base")),
                    )]),
                ),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Sub"))
                    .with_extends(Term::named("ex:Base"))
                    .with_constructor_arguments(ArgumentTemplate::hash([(
                        Arc::from("own"),
                        ArgumentTemplate::value_ref(Term::named("ex:own")),
                    )])),
            )
            .unwrap();

        registry.finalize().unwrap();

        let sub = registry.component(&Term::named("ex:Sub")).unwrap();
        let Some(ArgumentTemplate::Hash { fields }) = sub.constructor_arguments() else {
            panic!("expected merged hash template");
        };
        let keys: Vec<_> = fields.iter().map(|f| f.key.to_string()).collect();
        assert_eq!(keys, ["own", "inherited"]);
    }

    #[test]
    fn supertype_cycle_is_refused() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:A")).with_extends(Term::named("ex:B")),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:B")).with_extends(Term::named("ex:A")),
            )
            .unwrap();

        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, RegistryError::SupertypeCycle { .. }));
    }

    #[test]
    fn unknown_supertype_is_refused() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:A")).with_extends(Term::named("ex:Ghost")),
            )
            .unwrap();

        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, RegistryError::UnknownSupertype { .. }));
    }

    #[test]
    #[should_panic(expected = "finalize")]
    fn finalize_twice_panics() {
        let (mut registry, _) = registry_with_module();
        registry.finalize().unwrap();
        let _ = registry.finalize();
    }

    #[test]
    fn diamond_inheritance_dedups_parameters() {
        let (mut registry, module) = registry_with_module();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Root")).with_parameter(param("ex:r")),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Left")).with_extends(Term::named("ex:Root")),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Right")).with_extends(Term::named("ex:Root")),
            )
            .unwrap();
        registry
            .register_component(
                &module,
                Component::new(Term::named("ex:Bottom"))
                    .with_extends(Term::named("ex:Left"))
                    .with_extends(Term::named("ex:Right")),
            )
            .unwrap();

        registry.finalize().unwrap();

        let bottom = registry.component(&Term::named("ex:Bottom")).unwrap();
        // ex:r arrives via both sides but is unioned once.
        assert_eq!(bottom.parameters().len(), 1);
    }
}
