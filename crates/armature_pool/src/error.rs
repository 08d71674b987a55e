//! Instantiation and strategy errors.
//!
//! Everything that can go wrong between "instantiate this config" and a
//! materialized instance. Failures are terminal: a failing subtree rejects
//! the whole top-level call, and nothing is retried. Sibling instances
//! cached by earlier calls stay cached.

use armature_graph::term::Term;
use armature_resolve::error::ResolveError;

/// A failure reported by a creation strategy.
///
/// Strategies are external collaborators; their failures are carried
/// opaquely with a human-readable message.
#[derive(Debug, thiserror::Error)]
#[error("creation strategy failed: {message}")]
pub struct StrategyError {
    message: String,
}

impl StrategyError {
    /// Creates a strategy error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while instantiating a config.
#[derive(Debug, thiserror::Error)]
pub enum InstantiationError {
    /// The config's types matched no registered component, or more than one,
    /// and no raw require bypass was present.
    #[error("config {config} matched {found} registered component types, expected exactly one: {serialized}")]
    ConfigTypeResolution {
        /// The offending config.
        config: Term,
        /// How many registered component types matched.
        found: usize,
        /// Serialized form of the config.
        serialized: String,
    },

    /// The resolved component has no owning module in the registry.
    #[error("component {component} has no owning module")]
    MissingModule {
        /// The module-less component type.
        component: Term,
    },

    /// A variable config had no binding in the variable map and the strategy
    /// could not supply one either.
    #[error("undefined variable: {name}")]
    UndefinedVariable {
        /// The variable's name (its identifier).
        name: String,
    },

    /// No realization handler claimed an argument value.
    #[error("unsupported argument while constructing {config}: {detail}")]
    UnsupportedArgument {
        /// The config whose arguments were being realized.
        config: Term,
        /// Serialized form of the value no handler claimed.
        detail: String,
    },

    /// A referenced config is not present in the resource graph.
    #[error("config {0} is not present in the resource graph")]
    UnknownConfig(Term),

    /// A parameter-resolution or argument-mapping failure.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A creation-strategy failure.
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}
