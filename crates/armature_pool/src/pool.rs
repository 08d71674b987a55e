//! The memoizing, cycle-safe instance pool.
//!
//! [`InstancePool`] orchestrates the whole pipeline per requested config:
//! component-type resolution, value inheritance, argument mapping and
//! realization, and the final hand-off to the creation strategy. Each config
//! is constructed at most once per pool lifetime; concurrent requests for
//! the same id observe the same in-flight construction.
//!
//! # Cycle safety
//!
//! Every call chain carries a [`Blacklist`] of the configs currently under
//! construction above it. A config that is its own transitive argument
//! realizes to the strategy's undefined sentinel instead of recursing, a
//! deliberate non-error. The blacklist is extended immutably per recursion
//! step and never shared across unrelated top-level calls, so two requests
//! meeting at a shared dependency do not falsely appear cyclic.

use std::sync::Arc;

use armature_graph::resource::{Resource, ResourceProvider};
use armature_graph::scope::Scope;
use armature_graph::term::Term;
use armature_graph::vocab;
use armature_registry::registry::ComponentRegistry;
use armature_resolve::mapper::ArgumentMapper;
use armature_resolve::params::EffectiveParameters;
use armature_resolve::restriction::{ConfigHistory, apply_value_inheritance};
use armature_resolve::value::ArgumentValue;
use hashbrown::HashMap;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::InstantiationError;
use crate::realizer::Realizer;
use crate::strategy::{BoxFuture, CreationSettings, CreationStrategy};

// ─────────────────────────────────────────────────────────────────────────────
// Blacklist
// ─────────────────────────────────────────────────────────────────────────────

/// The configs under construction above the current recursion step.
///
/// An immutable cons-list: extending produces a new list sharing its tail,
/// so sibling branches of a resolution tree never see each other's entries.
#[derive(Debug, Clone, Default)]
pub struct Blacklist(Option<Arc<BlacklistNode>>);

#[derive(Debug)]
struct BlacklistNode {
    id: Term,
    parent: Option<Arc<BlacklistNode>>,
}

impl Blacklist {
    /// Creates an empty blacklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a blacklist extended with one more config id.
    #[must_use]
    pub fn with(&self, id: Term) -> Self {
        Blacklist(Some(Arc::new(BlacklistNode {
            id,
            parent: self.0.clone(),
        })))
    }

    /// Returns `true` if the config id is on this call chain.
    #[must_use]
    pub fn contains(&self, id: &Term) -> bool {
        let mut node = self.0.as_deref();
        while let Some(current) = node {
            if current.id == *id {
                return true;
            }
            node = current.parent.as_deref();
        }
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InstantiationSettings
// ─────────────────────────────────────────────────────────────────────────────

/// Per-call knobs for one top-level instantiation.
#[derive(Debug, Clone)]
pub struct InstantiationSettings<I> {
    /// Realize references to the undefined sentinel instead of recursing.
    pub shallow: bool,
    /// Bindings for variable configs, keyed by the variable's identifier.
    pub variables: HashMap<String, I>,
}

impl<I> Default for InstantiationSettings<I> {
    fn default() -> Self {
        Self {
            shallow: false,
            variables: HashMap::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InstancePool
// ─────────────────────────────────────────────────────────────────────────────

/// The memoizing orchestrator mapping configs to instances.
///
/// Cloning a pool is cheap and shares the cache; lazy suppliers hold a
/// clone so deferred realizations re-enter the same pool.
///
/// # Example
///
/// ```ignore
/// let pool = InstancePool::new(graph, registry, ValueStrategy);
/// let first = pool.instantiate(&Term::named("ex:config")).await?;
/// let second = pool.instantiate(&Term::named("ex:config")).await?;
/// assert_eq!(first, second); // memoized
/// ```
pub struct InstancePool<S: CreationStrategy> {
    inner: Arc<PoolInner<S>>,
}

impl<S: CreationStrategy> Clone for InstancePool<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct PoolInner<S: CreationStrategy> {
    provider: Arc<dyn ResourceProvider>,
    registry: Arc<ComponentRegistry>,
    strategy: S,
    /// Memoization cells, insert-if-absent; a cell doubles as the in-flight
    /// marker while its initialization runs.
    instances: Mutex<HashMap<Term, Arc<OnceCell<S::Instance>>>>,
    /// Instantiation history for value-inheritance lookups.
    history: Mutex<ConfigHistory>,
}

impl<S: CreationStrategy> InstancePool<S> {
    /// Creates a pool over a sealed graph and a finalized registry.
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been finalized; component metadata
    /// must be frozen before any instantiation begins.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        registry: Arc<ComponentRegistry>,
        strategy: S,
    ) -> Self {
        assert!(
            registry.is_finalized(),
            "InstancePool requires a finalized ComponentRegistry"
        );
        Self {
            inner: Arc::new(PoolInner {
                provider,
                registry,
                strategy,
                instances: Mutex::new(HashMap::new()),
                history: Mutex::new(ConfigHistory::new()),
            }),
        }
    }

    /// Returns the creation strategy.
    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.inner.strategy
    }

    /// Returns `true` if the config has already been constructed.
    #[must_use]
    pub fn is_instantiated(&self, config: &Term) -> bool {
        self.inner
            .instances
            .lock()
            .get(config)
            .is_some_and(|cell| cell.initialized())
    }

    /// Instantiates a config with default settings.
    ///
    /// # Errors
    ///
    /// See [`InstantiationError`]; a failure anywhere in the resolution tree
    /// rejects this call.
    pub async fn instantiate(&self, config: &Term) -> Result<S::Instance, InstantiationError> {
        self.instantiate_with(config, InstantiationSettings::default())
            .await
    }

    /// Instantiates a config with explicit settings.
    ///
    /// # Errors
    ///
    /// See [`InstantiationError`].
    pub async fn instantiate_with(
        &self,
        config: &Term,
        settings: InstantiationSettings<S::Instance>,
    ) -> Result<S::Instance, InstantiationError> {
        let settings = Arc::new(settings);
        self.instantiate_inner(config, &settings, Blacklist::new())
            .await
    }

    /// The recursive entry point; boxed because references realize by
    /// re-entering this function.
    pub(crate) fn instantiate_inner<'a>(
        &'a self,
        config: &'a Term,
        settings: &'a Arc<InstantiationSettings<S::Instance>>,
        blacklist: Blacklist,
    ) -> BoxFuture<'a, Result<S::Instance, InstantiationError>> {
        Box::pin(async move {
            // A config that is its own transitive argument resolves to the
            // undefined sentinel instead of recursing forever.
            if blacklist.contains(config) {
                debug!(config = %config, "self-reference resolved to undefined");
                return Ok(self.inner.strategy.create_undefined());
            }

            let resource = self
                .inner
                .provider
                .resource(config)
                .ok_or_else(|| InstantiationError::UnknownConfig(config.clone()))?;

            // Variable placeholders resolve through the supplied bindings,
            // never through construction.
            if resource.is_a(&Term::named(vocab::VARIABLE)) {
                let name = config.as_str().unwrap_or_default();
                if let Some(bound) = settings.variables.get(name) {
                    return Ok(bound.clone());
                }
                if let Some(supplied) = self.inner.strategy.variable_value(name) {
                    return Ok(supplied);
                }
                return Err(InstantiationError::UndefinedVariable {
                    name: name.to_string(),
                });
            }

            // Single-flight memoization: the cell is the in-flight marker,
            // and concurrent callers of the same id await the same result.
            let cell = {
                let mut instances = self.inner.instances.lock();
                Arc::clone(instances.entry(config.clone()).or_default())
            };
            if let Some(cached) = cell.get() {
                debug!(config = %config, "instance cache hit");
                return Ok(cached.clone());
            }

            let instance = cell
                .get_or_try_init(|| self.construct(resource, settings, &blacklist))
                .await?;
            Ok(instance.clone())
        })
    }

    /// Runs the full construction pipeline for one config.
    async fn construct(
        &self,
        resource: &Resource,
        settings: &Arc<InstantiationSettings<S::Instance>>,
        blacklist: &Blacklist,
    ) -> Result<S::Instance, InstantiationError> {
        let config = resource.id().clone();
        let child_blacklist = blacklist.with(config.clone());
        let mut scope = Scope::of(resource);

        // Exactly one registered component type must match, unless the
        // config bypasses the registry with a raw require name.
        let matched: Vec<&Term> = resource
            .types()
            .iter()
            .filter(|ty| self.inner.registry.has_component(ty))
            .collect();

        let &[component_type] = matched.as_slice() else {
            if matched.is_empty()
                && let Some(instance) = self.raw_require(&scope).await?
            {
                return Ok(instance);
            }
            return Err(InstantiationError::ConfigTypeResolution {
                config,
                found: matched.len(),
                serialized: resource.to_debug_json(),
            });
        };

        let component = self
            .inner
            .registry
            .component(component_type)
            .expect("matched types come from the registry");
        let module = self.inner.registry.module_of(component_type).ok_or_else(|| {
            InstantiationError::MissingModule {
                component: component_type.clone(),
            }
        })?;

        // Value inheritance reads the history of earlier constructions and
        // appends onto this config's scope; the snapshot recorded afterwards
        // is what later configs will inherit from.
        let mut params = EffectiveParameters::of_component(component);
        {
            let mut history = self.inner.history.lock();
            apply_value_inheritance(component, &mut scope, &mut params, &history)?;
            history.record(&scope);
        }

        let args = match component.constructor_arguments() {
            None => Vec::new(),
            Some(template) => {
                let mapper = ArgumentMapper::new(self.inner.provider.as_ref());
                let mapped = mapper.map(template, &scope, &params)?;
                let realizer = Realizer::new(self, settings, child_blacklist.clone(), &config);
                match mapped {
                    // A top-level array template supplies positional
                    // constructor arguments.
                    ArgumentValue::Array(elements) => {
                        let mut realized = Vec::with_capacity(elements.len());
                        for element in &elements {
                            realized.push(realizer.realize(element).await?);
                        }
                        realized
                    }
                    other => vec![realizer.realize(&other).await?],
                }
            }
        };

        debug!(config = %config, component = %component_type, "constructing instance");
        let instance = self
            .inner
            .strategy
            .create_instance(CreationSettings {
                instance_id: config,
                require_name: Arc::clone(module.require_name()),
                require_element: component.require_element().cloned(),
                call_constructor: component.calls_constructor(),
                args,
            })
            .await?;
        Ok(instance)
    }

    /// Constructs a component-less config carrying a raw require name.
    ///
    /// Returns `Ok(None)` when the config has no require name, handing the
    /// decision back to the type-resolution error path.
    async fn raw_require(
        &self,
        scope: &Scope,
    ) -> Result<Option<S::Instance>, InstantiationError> {
        let Some(require_name) = scope
            .values(vocab::REQUIRE_NAME)
            .first()
            .and_then(|term| term.as_literal())
        else {
            return Ok(None);
        };
        let require_element = scope
            .values(vocab::REQUIRE_ELEMENT)
            .first()
            .and_then(|term| term.as_literal())
            .map(|lit| Arc::from(lit.value.as_str()));
        let skip_constructor = scope
            .values(vocab::NO_CONSTRUCTOR)
            .first()
            .and_then(|term| term.as_literal())
            .is_some_and(|lit| lit.value == "true");

        debug!(config = %scope.id(), require = %require_name.value, "raw require bypass");
        let instance = self
            .inner
            .strategy
            .create_instance(CreationSettings {
                instance_id: scope.id().clone(),
                require_name: Arc::from(require_name.value.as_str()),
                require_element,
                call_constructor: !skip_constructor,
                args: Vec::new(),
            })
            .await?;
        Ok(Some(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_contains_every_chain_entry() {
        let root = Blacklist::new();
        let a = root.with(Term::named("ex:a"));
        let b = a.with(Term::named("ex:b"));

        assert!(b.contains(&Term::named("ex:a")));
        assert!(b.contains(&Term::named("ex:b")));
        assert!(!b.contains(&Term::named("ex:c")));
    }

    #[test]
    fn blacklist_branches_do_not_leak_into_siblings() {
        let root = Blacklist::new().with(Term::named("ex:top"));
        let left = root.with(Term::named("ex:left"));
        let right = root.with(Term::named("ex:right"));

        assert!(left.contains(&Term::named("ex:left")));
        assert!(!left.contains(&Term::named("ex:right")));
        assert!(right.contains(&Term::named("ex:right")));
        assert!(!right.contains(&Term::named("ex:left")));
    }

    #[test]
    fn settings_default_is_eager_and_unbound() {
        let settings: InstantiationSettings<()> = InstantiationSettings::default();
        assert!(!settings.shallow);
        assert!(settings.variables.is_empty());
    }
}
