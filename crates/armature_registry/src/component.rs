//! Components and the modules that own them.
//!
//! A [`Component`] is a construction template: declared parameters plus an
//! optional constructor-argument shape, possibly extending other components.
//! A [`Module`] is the unit of ownership; it carries an opaque require name
//! the engine passes through to the creation strategy without interpreting.

use std::sync::Arc;

use armature_graph::term::Term;

use crate::parameter::Parameter;
use crate::template::ArgumentTemplate;

// ─────────────────────────────────────────────────────────────────────────────
// Module
// ─────────────────────────────────────────────────────────────────────────────

/// The unit of component ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    iri: Term,
    require_name: Arc<str>,
}

impl Module {
    /// Creates a module.
    ///
    /// The require name is opaque to the engine; only the creation strategy
    /// gives it meaning.
    #[must_use]
    pub fn new(iri: Term, require_name: impl Into<Arc<str>>) -> Self {
        Self {
            iri,
            require_name: require_name.into(),
        }
    }

    /// Returns the module's identity.
    #[must_use]
    pub fn iri(&self) -> &Term {
        &self.iri
    }

    /// Returns the opaque require name.
    #[must_use]
    pub fn require_name(&self) -> &Arc<str> {
        &self.require_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Component
// ─────────────────────────────────────────────────────────────────────────────

/// A construction template for one component type.
///
/// # Example
///
/// ```
/// use armature_graph::term::Term;
/// use armature_registry::component::Component;
/// use armature_registry::parameter::Parameter;
///
/// let component = Component::new(Term::named("ex:Database"))
///     .with_parameter(Parameter::new(Term::named("ex:port")).unique())
///     .with_extends(Term::named("ex:Service"));
/// assert_eq!(component.parameters().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    type_iri: Term,
    parameters: Vec<Parameter>,
    constructor_arguments: Option<ArgumentTemplate>,
    extends: Vec<Term>,
    require_element: Option<Arc<str>>,
    call_constructor: bool,
}

impl Component {
    /// Creates a component with no parameters and a constructor call.
    #[must_use]
    pub fn new(type_iri: Term) -> Self {
        Self {
            type_iri,
            parameters: Vec::new(),
            constructor_arguments: None,
            extends: Vec::new(),
            require_element: None,
            call_constructor: true,
        }
    }

    /// Appends a parameter declaration.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the constructor-argument template.
    #[must_use]
    pub fn with_constructor_arguments(mut self, template: ArgumentTemplate) -> Self {
        self.constructor_arguments = Some(template);
        self
    }

    /// Declares a supertype to inherit parameters and template fields from.
    #[must_use]
    pub fn with_extends(mut self, supertype: Term) -> Self {
        self.extends.push(supertype);
        self
    }

    /// Selects an element within the module's require target.
    #[must_use]
    pub fn with_require_element(mut self, element: impl Into<Arc<str>>) -> Self {
        self.require_element = Some(element.into());
        self
    }

    /// Materializes instances without invoking a constructor.
    #[must_use]
    pub fn without_constructor(mut self) -> Self {
        self.call_constructor = false;
        self
    }

    /// Returns the component's type IRI.
    #[must_use]
    pub fn type_iri(&self) -> &Term {
        &self.type_iri
    }

    /// Returns the declared (or, after finalize, fully merged) parameters.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks up a parameter by identity.
    #[must_use]
    pub fn parameter(&self, id: &Term) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id() == id)
    }

    /// Returns the constructor-argument template, if declared.
    #[must_use]
    pub fn constructor_arguments(&self) -> Option<&ArgumentTemplate> {
        self.constructor_arguments.as_ref()
    }

    /// Returns the declared supertypes.
    #[must_use]
    pub fn extends(&self) -> &[Term] {
        &self.extends
    }

    /// Returns the require element, if declared.
    #[must_use]
    pub fn require_element(&self) -> Option<&Arc<str>> {
        self.require_element.as_ref()
    }

    /// Returns `true` if instances are produced by a constructor call.
    #[must_use]
    pub fn calls_constructor(&self) -> bool {
        self.call_constructor
    }

    /// Replaces the parameter list; used by the registry's finalize pass.
    pub(crate) fn set_parameters(&mut self, parameters: Vec<Parameter>) {
        self.parameters = parameters;
    }

    /// Replaces the template; used by the registry's finalize pass.
    pub(crate) fn set_constructor_arguments(&mut self, template: Option<ArgumentTemplate>) {
        self.constructor_arguments = template;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_defaults() {
        let component = Component::new(Term::named("ex:T"));
        assert!(component.parameters().is_empty());
        assert!(component.constructor_arguments().is_none());
        assert!(component.extends().is_empty());
        assert!(component.calls_constructor());
    }

    #[test]
    fn parameter_lookup_by_identity() {
        let component = Component::new(Term::named("ex:T"))
            .with_parameter(Parameter::new(Term::named("ex:a")))
            .with_parameter(Parameter::new(Term::named("ex:b")).unique());

        assert!(component.parameter(&Term::named("ex:a")).is_some());
        assert!(component.parameter(&Term::named("ex:b")).unwrap().is_unique());
        assert!(component.parameter(&Term::named("ex:c")).is_none());
    }

    #[test]
    fn module_carries_opaque_require_name() {
        let module = Module::new(Term::named("ex:mod"), "my-package");
        assert_eq!(module.require_name().as_ref(), "my-package");
    }
}
