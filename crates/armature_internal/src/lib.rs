//! # Armature Internal Library
//!
//! Re-exports the core Armature crates for convenience.

/// Layer 1: the resource-graph data model.
pub use armature_graph;

/// Layer 1: component metadata and the finalizing registry.
pub use armature_registry;

/// Layer 2: parameter and constructor-argument resolution.
pub use armature_resolve;

/// Layer 3: realization, strategies, and the instance pool.
pub use armature_pool;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use armature_graph::prelude::*;
    pub use armature_pool::prelude::*;
    pub use armature_registry::prelude::*;
    pub use armature_resolve::prelude::*;
}
