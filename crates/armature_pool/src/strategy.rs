//! The pluggable creation-strategy boundary.
//!
//! The pool is indifferent to how instances are actually produced; it hands
//! a [`CreationStrategy`] fully-resolved primitives, hashes, arrays, and
//! constructor calls and caches whatever comes back. Direct construction,
//! source-text emission, and the in-crate [`ValueStrategy`](crate::value::ValueStrategy)
//! are all implementations of this one trait.

use core::future::Future;
use core::pin::Pin;
use std::sync::Arc;

use armature_graph::datatype::Primitive;
use armature_graph::term::Term;
use async_trait::async_trait;

use crate::error::{InstantiationError, StrategyError};

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A zero-argument supplier deferring one instance's realization.
///
/// Suppliers are cheap to clone and may be invoked any number of times;
/// invoking one re-enters the pool, so memoization still applies.
pub type LazySupplier<I> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<I, InstantiationError>> + Send + Sync>;

/// Everything a strategy needs to materialize one constructed instance.
#[derive(Debug, Clone)]
pub struct CreationSettings<I> {
    /// The config's identity, for diagnostics and emitted names.
    pub instance_id: Term,
    /// The owning module's opaque require name.
    pub require_name: Arc<str>,
    /// An element within the require target, if the component names one.
    pub require_element: Option<Arc<str>>,
    /// Whether to invoke a constructor or take the require target verbatim.
    pub call_constructor: bool,
    /// The fully-realized constructor arguments, in declared order.
    pub args: Vec<I>,
}

/// Materializes instances from fully-resolved argument trees.
///
/// All methods except [`create_undefined`](Self::create_undefined) may fail;
/// a strategy failure rejects the instantiation that triggered it.
#[async_trait]
pub trait CreationStrategy: Send + Sync + 'static {
    /// The instance representation this strategy produces.
    ///
    /// Cloning must be cheap: the pool returns memoized instances by clone,
    /// so real backends typically use reference-counted handles.
    type Instance: Clone + Send + Sync + 'static;

    /// Materializes a constructed instance.
    async fn create_instance(
        &self,
        settings: CreationSettings<Self::Instance>,
    ) -> Result<Self::Instance, StrategyError>;

    /// Materializes a keyed collection, preserving entry order.
    async fn create_hash(
        &self,
        entries: Vec<(Arc<str>, Self::Instance)>,
    ) -> Result<Self::Instance, StrategyError>;

    /// Materializes a positional collection, preserving element order.
    async fn create_array(
        &self,
        elements: Vec<Self::Instance>,
    ) -> Result<Self::Instance, StrategyError>;

    /// Materializes a coerced literal.
    async fn create_primitive(&self, value: Primitive) -> Result<Self::Instance, StrategyError>;

    /// Wraps a deferred realization.
    fn create_lazy(
        &self,
        supplier: LazySupplier<Self::Instance>,
    ) -> Result<Self::Instance, StrategyError>;

    /// Supplies a value for a variable the instantiation settings did not
    /// bind, or `None` if the strategy cannot.
    ///
    /// Emission-style backends use this to produce named placeholders; value
    /// backends typically return `None`.
    fn variable_value(&self, name: &str) -> Option<Self::Instance>;

    /// The undefined sentinel: what a self-reference or a shallow reference
    /// realizes to.
    fn create_undefined(&self) -> Self::Instance;
}
