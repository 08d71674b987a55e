//! Instance orchestration for Armature (Layer 3).
//!
//! `armature_pool` turns resolved argument trees into live instances:
//!
//! - [`error`] - Instantiation and strategy errors
//! - [`strategy`] - The pluggable creation-strategy boundary
//! - [`realizer`] - The argument-realization handler chain
//! - [`pool`] - The memoizing, cycle-safe instance pool
//! - [`value`] - A reference backend materializing plain value trees
//!
//! # Example
//!
//! ```ignore
//! let pool = InstancePool::new(graph, registry, ValueStrategy);
//! let instance = pool.instantiate(&Term::named("ex:myConfig")).await?;
//! ```

/// Instantiation and strategy errors.
pub mod error;

/// The memoizing, cycle-safe instance pool.
pub mod pool;

/// The argument-realization handler chain.
pub mod realizer;

/// The pluggable creation-strategy boundary.
pub mod strategy;

/// A reference backend materializing plain value trees.
pub mod value;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::pool::*;
    pub use crate::strategy::*;
    pub use crate::value::*;
}
