//! A declarative object-graph instantiation engine for Rust.
//!

pub use armature_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use armature_internal::prelude::*;
}
