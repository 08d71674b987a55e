//! The resource-graph data model for Armature (Layer 1).
//!
//! `armature_graph` provides the primitives every other layer consumes:
//!
//! - [`term`] - Node identities and literal values
//! - [`datatype`] - Datatype decoding and literal coercion
//! - [`resource`] - Resources, the sealed graph store, and the provider seam
//! - [`scope`] - The mutable per-instantiation view of a configuration node
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Armature architecture:
//!
//! - **Layer 1** (`armature_graph`, `armature_registry`): immutable data model
//! - **Layer 2** (`armature_resolve`): parameter and argument resolution
//! - **Layer 3** (`armature_pool`): realization and instance orchestration
//!
//! # Example
//!
//! ```
//! use armature_graph::resource::{Resource, ResourceGraph};
//! use armature_graph::term::Term;
//!
//! let config = Resource::new(Term::named("ex:myConfig"))
//!     .with_type(Term::named("ex:MyComponent"))
//!     .with_property("ex:hello", Term::literal("WORLD"));
//!
//! let mut graph = ResourceGraph::new();
//! graph.insert(config).unwrap();
//! let graph = graph.seal();
//!
//! assert!(graph.resource(&Term::named("ex:myConfig")).is_some());
//! ```

/// Datatype decoding and literal coercion.
pub mod datatype;

/// Resources, the sealed graph store, and the provider seam.
pub mod resource;

/// The mutable per-instantiation view of a configuration node.
pub mod scope;

/// Node identities and literal values.
pub mod term;

/// Well-known property and type IRIs understood by the engine core.
pub mod vocab;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::datatype::*;
    pub use crate::resource::*;
    pub use crate::scope::*;
    pub use crate::term::*;
}
