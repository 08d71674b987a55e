//! Parameter declarations and their modifiers.
//!
//! A [`Parameter`] is a named slot on a component. Its modifiers drive the
//! whole resolution pipeline: defaulting (plain and scoped), fixed values,
//! uniqueness collapse, datatype coercion, lazy tagging, and cross-instance
//! value inheritance via [`Restriction`] rules.

use armature_graph::datatype::Datatype;
use armature_graph::term::Term;

// ─────────────────────────────────────────────────────────────────────────────
// ScopedDefault
// ─────────────────────────────────────────────────────────────────────────────

/// A default that only applies when the resolving config (or its component)
/// carries one of the listed scope types.
///
/// Scoped defaults are tried in declaration order; the first matching rule
/// wins and shadows the plain default.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedDefault {
    /// Types any one of which activates this rule.
    pub scope_types: Vec<Term>,
    /// The values supplied when the rule matches.
    pub values: Vec<Term>,
}

impl ScopedDefault {
    /// Creates a scoped default rule.
    #[must_use]
    pub fn new(scope_types: Vec<Term>, values: Vec<Term>) -> Self {
        Self {
            scope_types,
            values,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Restriction
// ─────────────────────────────────────────────────────────────────────────────

/// A value-inheritance rule: pull values of `on_parameter` from every
/// previously instantiated config of `from_type`.
///
/// Both fields are optional at declaration time because the declaration
/// arrives from external configuration data; completeness is validated when
/// the rule is applied, so a broken rule names the parameter that carried it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restriction {
    /// The component type whose earlier instances are consulted.
    pub from_type: Option<Term>,
    /// The parameter whose values are inherited.
    pub on_parameter: Option<Term>,
}

impl Restriction {
    /// Creates an empty rule; fill it with the builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a complete rule in one step.
    #[must_use]
    pub fn of(from_type: Term, on_parameter: Term) -> Self {
        Self {
            from_type: Some(from_type),
            on_parameter: Some(on_parameter),
        }
    }

    /// Sets the source component type.
    #[must_use]
    pub fn from_type(mut self, ty: Term) -> Self {
        self.from_type = Some(ty);
        self
    }

    /// Sets the inherited parameter.
    #[must_use]
    pub fn on_parameter(mut self, parameter: Term) -> Self {
        self.on_parameter = Some(parameter);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameter
// ─────────────────────────────────────────────────────────────────────────────

/// A named slot on a component, with its resolution modifiers.
///
/// # Example
///
/// ```
/// use armature_graph::datatype::Datatype;
/// use armature_graph::term::Term;
/// use armature_registry::parameter::Parameter;
///
/// let port = Parameter::new(Term::named("ex:port"))
///     .unique()
///     .required()
///     .with_range(Datatype::Integer)
///     .with_default(Term::literal("5432"));
/// assert!(port.is_unique());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    id: Term,
    unique: bool,
    required: bool,
    lazy: bool,
    default: Vec<Term>,
    default_scoped: Vec<ScopedDefault>,
    fixed: Vec<Term>,
    range: Option<Datatype>,
    inherit_values: Vec<Restriction>,
}

impl Parameter {
    /// Creates a parameter with no modifiers.
    #[must_use]
    pub fn new(id: Term) -> Self {
        Self {
            id,
            unique: false,
            required: false,
            lazy: false,
            default: Vec::new(),
            default_scoped: Vec::new(),
            fixed: Vec::new(),
            range: None,
            inherit_values: Vec::new(),
        }
    }

    /// Marks the parameter as single-valued.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the parameter as mandatory.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the parameter's values for deferred realization.
    #[must_use]
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Appends a plain default value.
    #[must_use]
    pub fn with_default(mut self, value: Term) -> Self {
        self.default.push(value);
        self
    }

    /// Appends a scoped default rule; rules are tried in this order.
    #[must_use]
    pub fn with_scoped_default(mut self, rule: ScopedDefault) -> Self {
        self.default_scoped.push(rule);
        self
    }

    /// Appends a fixed value.
    #[must_use]
    pub fn with_fixed(mut self, value: Term) -> Self {
        self.fixed.push(value);
        self
    }

    /// Constrains values to a datatype.
    #[must_use]
    pub fn with_range(mut self, range: Datatype) -> Self {
        self.range = Some(range);
        self
    }

    /// Appends a value-inheritance rule.
    #[must_use]
    pub fn with_inherited_values(mut self, rule: Restriction) -> Self {
        self.inherit_values.push(rule);
        self
    }

    /// Returns the parameter's identity.
    #[must_use]
    pub fn id(&self) -> &Term {
        &self.id
    }

    /// Returns the property-map key for this parameter, `None` if the
    /// identity is (bogusly) a literal.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.id.as_str()
    }

    /// Returns `true` if the parameter is single-valued.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Returns `true` if the parameter is mandatory.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns `true` if the parameter's values realize lazily.
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Returns the plain default values.
    #[must_use]
    pub fn default(&self) -> &[Term] {
        &self.default
    }

    /// Returns the scoped default rules, in declaration order.
    #[must_use]
    pub fn default_scoped(&self) -> &[ScopedDefault] {
        &self.default_scoped
    }

    /// Returns the fixed values.
    #[must_use]
    pub fn fixed(&self) -> &[Term] {
        &self.fixed
    }

    /// Returns the datatype constraint, if any.
    #[must_use]
    pub fn range(&self) -> Option<Datatype> {
        self.range
    }

    /// Returns the value-inheritance rules.
    #[must_use]
    pub fn inherit_values(&self) -> &[Restriction] {
        &self.inherit_values
    }
}
