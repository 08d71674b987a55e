//! Component metadata for Armature (Layer 1).
//!
//! `armature_registry` holds everything the engine knows *before* any config
//! is instantiated:
//!
//! - [`parameter`] - Parameter declarations and their modifiers
//! - [`template`] - The constructor-argument template tree
//! - [`component`] - Components and the modules that own them
//! - [`registry`] - The registry and its one-shot finalize pass
//!
//! # Lifecycle
//!
//! Modules and components are registered while the registry is open, then
//! [`finalize()`](registry::ComponentRegistry::finalize) runs exactly once:
//! it walks each component's supertype chain, unions inherited parameters,
//! merges inherited template fields, and freezes the result. Instantiation
//! never re-walks the hierarchy.

/// Components and the modules that own them.
pub mod component;

/// Parameter declarations and their modifiers.
pub mod parameter;

/// The registry and its one-shot finalize pass.
pub mod registry;

/// The constructor-argument template tree.
pub mod template;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::component::*;
    pub use crate::parameter::*;
    pub use crate::registry::*;
    pub use crate::template::*;
}
