//! The resolution error taxonomy.
//!
//! Every variant names the offending parameter or entry and, where a whole
//! config is implicated, carries its serialized form. Nothing here is
//! retried; a resolution error fails the instantiation that triggered it.

use std::sync::Arc;

use armature_graph::datatype::CoercionError;
use armature_graph::term::Term;

/// Errors raised while resolving parameters or mapping argument templates.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A required parameter resolved to no values.
    #[error("required parameter {parameter} has no value on config {config}: {serialized}")]
    RequiredParameterMissing {
        /// The unsatisfied parameter.
        parameter: Term,
        /// The config being resolved.
        config: Term,
        /// Serialized form of the config.
        serialized: String,
    },

    /// A unique parameter carries both a fixed value and an explicit value.
    #[error("unique parameter {parameter} has a fixed value but config {config} also sets it: {serialized}")]
    FixedUniqueConflict {
        /// The contradicted parameter.
        parameter: Term,
        /// The config being resolved.
        config: Term,
        /// Serialized form of the config.
        serialized: String,
    },

    /// A literal failed datatype coercion.
    #[error("cannot coerce literal '{literal}' for {subject}: {source}")]
    TypeCoercion {
        /// The parameter (or config, for template literals) being coerced for.
        subject: Term,
        /// The offending source text.
        literal: String,
        /// The underlying coercion failure.
        #[source]
        source: CoercionError,
    },

    /// A value-inheritance rule lacks its source component type.
    #[error("value-inheritance rule on parameter {parameter} is missing its source component type")]
    MissingFrom {
        /// The parameter carrying the broken rule.
        parameter: Term,
    },

    /// A value-inheritance rule lacks its inherited parameter.
    #[error("value-inheritance rule on parameter {parameter} is missing its inherited parameter")]
    MissingOnParameter {
        /// The parameter carrying the broken rule.
        parameter: Term,
    },

    /// A value-inheritance rule references a literal where a type or
    /// parameter reference is required.
    #[error("value-inheritance rule on parameter {parameter} references literal {term} where a type or parameter is required")]
    InvalidReferenceType {
        /// The parameter carrying the broken rule.
        parameter: Term,
        /// The literal that appeared in reference position.
        term: Term,
    },

    /// A dynamic entry derived its key from something other than a literal.
    #[error("dynamic entry {entry} derives its key from non-literal {term}")]
    InvalidKeyType {
        /// The offending entry config.
        entry: Term,
        /// The non-literal term found in key position.
        term: Term,
    },

    /// A dynamic entry did not have exactly one value for a property that
    /// must be single-valued.
    #[error("dynamic entry {entry} expects exactly one value for {property}, found {actual}")]
    CardinalityMismatch {
        /// The offending entry config.
        entry: Term,
        /// The property that was read.
        property: Arc<str>,
        /// How many values were actually present.
        actual: usize,
    },
}
