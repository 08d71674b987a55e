//! Resources, the sealed graph store, and the provider seam.
//!
//! A [`Resource`] is one node of the configuration graph: an identity, a
//! type list, and an ordered-insertion multi-valued property map. Resources
//! are assembled while the graph is loading and become immutable once the
//! graph is [sealed](ResourceGraph::seal).
//!
//! # Lifecycle
//!
//! The graph progresses linearly, the same way the rest of the engine
//! freezes its metadata:
//!
//! ```text
//! Building ──seal()──▶ Sealed (immutable, shared)
//! ```
//!
//! Insertion after sealing is a programmer error and panics; data problems
//! (duplicate identities) are reported as [`GraphError`] values.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::term::Term;

// ─────────────────────────────────────────────────────────────────────────────
// Resource
// ─────────────────────────────────────────────────────────────────────────────

/// One node of the configuration graph.
///
/// Property values preserve document order and are always multi-valued;
/// cardinality rules are applied downstream, per parameter.
///
/// # Example
///
/// ```
/// use armature_graph::resource::Resource;
/// use armature_graph::term::Term;
///
/// let node = Resource::new(Term::named("ex:db"))
///     .with_type(Term::named("ex:Database"))
///     .with_property("ex:port", Term::literal("5432"))
///     .with_property("ex:replica", Term::named("ex:replicaA"))
///     .with_property("ex:replica", Term::named("ex:replicaB"));
///
/// assert_eq!(node.values("ex:replica").len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    id: Term,
    types: Vec<Term>,
    properties: IndexMap<Arc<str>, Vec<Term>>,
}

impl Resource {
    /// Creates a resource with the given identity and no types or properties.
    #[must_use]
    pub fn new(id: Term) -> Self {
        Self {
            id,
            types: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Adds a type and returns self, for chaining.
    #[must_use]
    pub fn with_type(mut self, ty: Term) -> Self {
        self.types.push(ty);
        self
    }

    /// Appends a property value and returns self, for chaining.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<Arc<str>>, value: Term) -> Self {
        self.append(key, value);
        self
    }

    /// Appends a value onto a property, creating the property if absent.
    pub fn append(&mut self, key: impl Into<Arc<str>>, value: Term) {
        self.properties.entry(key.into()).or_default().push(value);
    }

    /// Returns this resource's identity.
    #[must_use]
    pub fn id(&self) -> &Term {
        &self.id
    }

    /// Returns the declared types, in document order.
    #[must_use]
    pub fn types(&self) -> &[Term] {
        &self.types
    }

    /// Returns `true` if the resource declares the given type.
    #[must_use]
    pub fn is_a(&self, ty: &Term) -> bool {
        self.types.contains(ty)
    }

    /// Returns all values of a property, in document order.
    ///
    /// An absent property yields an empty slice.
    #[must_use]
    pub fn values(&self, key: &str) -> &[Term] {
        self.properties.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns the single value of a property, if there is exactly one.
    #[must_use]
    pub fn single_value(&self, key: &str) -> Option<&Term> {
        match self.values(key) {
            [one] => Some(one),
            _ => None,
        }
    }

    /// Iterates properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&Arc<str>, &[Term])> {
        self.properties.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Renders this resource as JSON for error messages.
    ///
    /// Every engine error that names a resource attaches this form so a
    /// failing configuration can be read without the source document.
    #[must_use]
    pub fn to_debug_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.id.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceProvider
// ─────────────────────────────────────────────────────────────────────────────

/// Read access to a loaded configuration graph.
///
/// This is the seam between the engine core and whatever loaded the graph;
/// the core never asks for more than identities, types, and property values.
/// [`ResourceGraph`] is the in-memory implementation.
pub trait ResourceProvider: Send + Sync {
    /// Looks up a resource by identity.
    fn resource(&self, id: &Term) -> Option<&Resource>;

    /// Returns the resources declaring the given type, in declaration order.
    fn resources_of_type(&self, ty: &Term) -> Vec<&Resource>;
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceGraph
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while loading a resource graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Two resources were inserted under the same identity.
    #[error("duplicate resource {id}: {serialized}")]
    DuplicateResource {
        /// The colliding identity.
        id: Term,
        /// Serialized form of the rejected resource.
        serialized: String,
    },

    /// A literal term was used as a resource identity.
    #[error("literal term {0} cannot identify a resource")]
    LiteralIdentity(Term),
}

/// The in-memory graph store: identity-indexed, sealed after loading.
///
/// A still-building graph accepts insertions; [`seal`](Self::seal) freezes
/// it into the shape every downstream layer shares.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    resources: IndexMap<Term, Resource>,
    by_type: hashbrown::HashMap<Term, Vec<Term>>,
    sealed: bool,
}

impl ResourceGraph {
    /// Creates an empty, still-building graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a resource.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateResource`] if the identity is taken,
    /// or [`GraphError::LiteralIdentity`] if the identity is a literal.
    ///
    /// # Panics
    ///
    /// Panics if the graph has already been sealed.
    pub fn insert(&mut self, resource: Resource) -> Result<(), GraphError> {
        assert!(
            !self.sealed,
            "ResourceGraph is sealed; resources can only be inserted while loading"
        );
        if resource.id().is_literal() {
            return Err(GraphError::LiteralIdentity(resource.id().clone()));
        }
        if self.resources.contains_key(resource.id()) {
            return Err(GraphError::DuplicateResource {
                id: resource.id().clone(),
                serialized: resource.to_debug_json(),
            });
        }
        for ty in resource.types() {
            self.by_type
                .entry(ty.clone())
                .or_default()
                .push(resource.id().clone());
        }
        self.resources.insert(resource.id().clone(), resource);
        Ok(())
    }

    /// Seals the graph, freezing its contents.
    #[must_use]
    pub fn seal(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Returns `true` once the graph is sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the graph holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates all resources in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Looks up a resource by identity.
    #[must_use]
    pub fn resource(&self, id: &Term) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Returns the resources declaring the given type, in declaration order.
    #[must_use]
    pub fn resources_of_type(&self, ty: &Term) -> Vec<&Resource> {
        self.by_type.get(ty).map_or_else(Vec::new, |ids| {
            ids.iter().filter_map(|id| self.resources.get(id)).collect()
        })
    }
}

impl ResourceProvider for ResourceGraph {
    fn resource(&self, id: &Term) -> Option<&Resource> {
        ResourceGraph::resource(self, id)
    }

    fn resources_of_type(&self, ty: &Term) -> Vec<&Resource> {
        ResourceGraph::resources_of_type(self, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, ty: &str) -> Resource {
        Resource::new(Term::named(id)).with_type(Term::named(ty))
    }

    #[test]
    fn property_values_preserve_order() {
        let res = Resource::new(Term::named("ex:a"))
            .with_property("ex:p", Term::literal("one"))
            .with_property("ex:p", Term::literal("two"))
            .with_property("ex:p", Term::literal("three"));

        let values: Vec<_> = res
            .values("ex:p")
            .iter()
            .map(|t| t.as_literal().unwrap().value.clone())
            .collect();
        assert_eq!(values, ["one", "two", "three"]);
    }

    #[test]
    fn single_value_requires_exactly_one() {
        let res = Resource::new(Term::named("ex:a"))
            .with_property("ex:one", Term::literal("x"))
            .with_property("ex:many", Term::literal("x"))
            .with_property("ex:many", Term::literal("y"));

        assert!(res.single_value("ex:one").is_some());
        assert!(res.single_value("ex:many").is_none());
        assert!(res.single_value("ex:absent").is_none());
    }

    #[test]
    fn graph_lookup_by_id_and_type() {
        let mut graph = ResourceGraph::new();
        graph.insert(node("ex:a", "ex:T")).unwrap();
        graph.insert(node("ex:b", "ex:T")).unwrap();
        graph.insert(node("ex:c", "ex:Other")).unwrap();
        let graph = graph.seal();

        assert!(graph.resource(&Term::named("ex:a")).is_some());
        assert!(graph.resource(&Term::named("ex:missing")).is_none());

        let of_type: Vec<_> = graph
            .resources_of_type(&Term::named("ex:T"))
            .iter()
            .map(|r| r.id().clone())
            .collect();
        assert_eq!(of_type, [Term::named("ex:a"), Term::named("ex:b")]);
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let mut graph = ResourceGraph::new();
        graph.insert(node("ex:a", "ex:T")).unwrap();
        let err = graph.insert(node("ex:a", "ex:T")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateResource { .. }));
    }

    #[test]
    fn literal_identity_is_rejected() {
        let mut graph = ResourceGraph::new();
        let err = graph.insert(Resource::new(Term::literal("nope"))).unwrap_err();
        assert!(matches!(err, GraphError::LiteralIdentity(_)));
    }

    #[test]
    #[should_panic(expected = "sealed")]
    fn insert_after_seal_panics() {
        let graph = ResourceGraph::new().seal();
        let mut graph = graph;
        let _ = graph.insert(node("ex:a", "ex:T"));
    }

    #[test]
    fn debug_json_names_the_resource() {
        let res = node("ex:a", "ex:T");
        let json = res.to_debug_json();
        assert!(json.contains("ex:a"));
        assert!(json.contains("ex:T"));
    }
}
