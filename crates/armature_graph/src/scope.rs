//! The mutable per-instantiation view of a configuration node.
//!
//! The sealed graph is never written after loading. When a config is
//! instantiated, its identity, types, and property values are copied into a
//! [`Scope`], the one place cross-instance value inheritance is allowed to
//! append. Scopes are cheap: values are reference-counted terms.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::resource::Resource;
use crate::term::Term;

/// The working copy of one config during resolution.
///
/// # Example
///
/// ```
/// use armature_graph::resource::Resource;
/// use armature_graph::scope::Scope;
/// use armature_graph::term::Term;
///
/// let config = Resource::new(Term::named("ex:c"))
///     .with_type(Term::named("ex:T"))
///     .with_property("ex:p", Term::literal("declared"));
///
/// let mut scope = Scope::of(&config);
/// scope.append("ex:p", Term::literal("inherited"));
/// assert_eq!(scope.values("ex:p").len(), 2);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    id: Term,
    types: Vec<Term>,
    properties: IndexMap<Arc<str>, Vec<Term>>,
}

impl Scope {
    /// Copies a resource into a fresh scope.
    #[must_use]
    pub fn of(resource: &Resource) -> Self {
        Self {
            id: resource.id().clone(),
            types: resource.types().to_vec(),
            properties: resource
                .properties()
                .map(|(k, v)| (Arc::clone(k), v.to_vec()))
                .collect(),
        }
    }

    /// Returns the config's identity.
    #[must_use]
    pub fn id(&self) -> &Term {
        &self.id
    }

    /// Returns the config's declared types.
    #[must_use]
    pub fn types(&self) -> &[Term] {
        &self.types
    }

    /// Returns `true` if the scope declares the given type.
    #[must_use]
    pub fn is_a(&self, ty: &Term) -> bool {
        self.types.contains(ty)
    }

    /// Returns all values of a property, in order.
    #[must_use]
    pub fn values(&self, key: &str) -> &[Term] {
        self.properties.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the property has at least one value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        !self.values(key).is_empty()
    }

    /// Appends a value onto a property; the extension point for value
    /// inheritance.
    pub fn append(&mut self, key: impl Into<Arc<str>>, value: Term) {
        self.properties.entry(key.into()).or_default().push(value);
    }

    /// Iterates properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&Arc<str>, &[Term])> {
        self.properties.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Renders this scope as JSON for error messages.
    #[must_use]
    pub fn to_debug_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_copies_resource_contents() {
        let res = Resource::new(Term::named("ex:c"))
            .with_type(Term::named("ex:T"))
            .with_property("ex:p", Term::literal("v"));

        let scope = Scope::of(&res);
        assert_eq!(scope.id(), &Term::named("ex:c"));
        assert!(scope.is_a(&Term::named("ex:T")));
        assert_eq!(scope.values("ex:p").len(), 1);
    }

    #[test]
    fn appending_does_not_touch_the_resource() {
        let res = Resource::new(Term::named("ex:c")).with_property("ex:p", Term::literal("v"));
        let mut scope = Scope::of(&res);

        scope.append("ex:p", Term::literal("w"));
        scope.append("ex:q", Term::literal("new"));

        assert_eq!(scope.values("ex:p").len(), 2);
        assert!(scope.has("ex:q"));
        assert_eq!(res.values("ex:p").len(), 1);
        assert!(res.values("ex:q").is_empty());
    }
}
