//! Well-known property and type IRIs understood by the engine core.
//!
//! Configuration documents use these IRIs to reach engine behavior that is
//! not tied to any registered component: variable placeholders and the raw
//! require bypass. Everything else in a document is plain data to the core.

/// Type IRI marking a configuration node as a variable placeholder.
///
/// Variable nodes are never constructed; they resolve through the variable
/// map supplied at instantiation time.
pub const VARIABLE: &str = "urn:armature:Variable";

/// Property IRI carrying a raw require name on a component-less config.
///
/// A config with this property bypasses component resolution entirely and is
/// handed to the creation strategy as-is.
pub const REQUIRE_NAME: &str = "urn:armature:requireName";

/// Property IRI selecting an element within a raw require target.
pub const REQUIRE_ELEMENT: &str = "urn:armature:requireElement";

/// Property IRI suppressing the constructor call on a raw require config.
pub const NO_CONSTRUCTOR: &str = "urn:armature:noConstructor";
