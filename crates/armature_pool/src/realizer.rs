//! The argument-realization handler chain.
//!
//! [`Realizer`] interprets a resolved [`ArgumentValue`] tree into strategy
//! instances through an ordered, first-match handler chain:
//!
//! 1. **Hash** - realize each field, keep entry order
//! 2. **Array** - realize each element, keep declared order
//! 3. **ValueWrapper** - recurse; a singleton-unique wrapper unwraps to its
//!    scalar, anything else becomes an array
//! 4. **Reference** - re-enter the pool, or the undefined sentinel in
//!    shallow mode, or a lazy supplier when tagged
//! 5. **Primitive** - the coerced raw value, lazily wrapped when tagged
//!
//! A value no handler claims (a reference whose target is a literal) is an
//! [`InstantiationError::UnsupportedArgument`].

use std::sync::Arc;

use armature_graph::datatype::Primitive;
use armature_graph::term::Term;
use armature_resolve::value::ArgumentValue;

use crate::error::InstantiationError;
use crate::pool::{Blacklist, InstancePool, InstantiationSettings};
use crate::strategy::{BoxFuture, CreationStrategy, LazySupplier};

/// Interprets resolved argument values for one construction.
pub(crate) struct Realizer<'a, S: CreationStrategy> {
    pool: &'a InstancePool<S>,
    settings: &'a Arc<InstantiationSettings<S::Instance>>,
    blacklist: Blacklist,
    config: &'a Term,
}

impl<'a, S: CreationStrategy> Realizer<'a, S> {
    /// Creates a realizer for one construction's argument tree.
    pub(crate) fn new(
        pool: &'a InstancePool<S>,
        settings: &'a Arc<InstantiationSettings<S::Instance>>,
        blacklist: Blacklist,
        config: &'a Term,
    ) -> Self {
        Self {
            pool,
            settings,
            blacklist,
            config,
        }
    }

    /// Runs the handler chain over one value.
    pub(crate) fn realize<'v>(
        &'v self,
        value: &'v ArgumentValue,
    ) -> BoxFuture<'v, Result<S::Instance, InstantiationError>> {
        Box::pin(async move {
            if let Some(instance) = self.try_hash(value).await? {
                return Ok(instance);
            }
            if let Some(instance) = self.try_array(value).await? {
                return Ok(instance);
            }
            if let Some(instance) = self.try_values(value).await? {
                return Ok(instance);
            }
            if let Some(instance) = self.try_reference(value).await? {
                return Ok(instance);
            }
            if let Some(instance) = self.try_primitive(value).await? {
                return Ok(instance);
            }
            Err(InstantiationError::UnsupportedArgument {
                config: self.config.clone(),
                detail: format!("{value:?}"),
            })
        })
    }

    /// Hash handler: realize fields in entry order.
    async fn try_hash(
        &self,
        value: &ArgumentValue,
    ) -> Result<Option<S::Instance>, InstantiationError> {
        let ArgumentValue::Hash(entries) = value else {
            return Ok(None);
        };
        let mut realized = Vec::with_capacity(entries.len());
        for entry in entries {
            realized.push((Arc::clone(&entry.key), self.realize(&entry.value).await?));
        }
        Ok(Some(self.pool.strategy().create_hash(realized).await?))
    }

    /// Array handler: realize elements in declared order.
    async fn try_array(
        &self,
        value: &ArgumentValue,
    ) -> Result<Option<S::Instance>, InstantiationError> {
        let ArgumentValue::Array(elements) = value else {
            return Ok(None);
        };
        let mut realized = Vec::with_capacity(elements.len());
        for element in elements {
            realized.push(self.realize(element).await?);
        }
        Ok(Some(self.pool.strategy().create_array(realized).await?))
    }

    /// Value-wrapper handler: singleton-unique unwraps to its scalar.
    async fn try_values(
        &self,
        value: &ArgumentValue,
    ) -> Result<Option<S::Instance>, InstantiationError> {
        let ArgumentValue::Values { items, unique } = value else {
            return Ok(None);
        };
        if *unique {
            return match items.as_slice() {
                [] => Ok(Some(self.pool.strategy().create_undefined())),
                [single] => Ok(Some(self.realize(single).await?)),
                _ => self.realize_as_array(items).await.map(Some),
            };
        }
        self.realize_as_array(items).await.map(Some)
    }

    async fn realize_as_array(
        &self,
        items: &[ArgumentValue],
    ) -> Result<S::Instance, InstantiationError> {
        let mut realized = Vec::with_capacity(items.len());
        for item in items {
            realized.push(self.realize(item).await?);
        }
        Ok(self.pool.strategy().create_array(realized).await?)
    }

    /// Reference handler: delegate to the pool, honor shallow mode and lazy
    /// tags. References to literal terms are left for the chain fallthrough.
    async fn try_reference(
        &self,
        value: &ArgumentValue,
    ) -> Result<Option<S::Instance>, InstantiationError> {
        let ArgumentValue::Reference { target, lazy } = value else {
            return Ok(None);
        };
        if target.is_literal() {
            return Ok(None);
        }
        if self.settings.shallow {
            return Ok(Some(self.pool.strategy().create_undefined()));
        }
        if *lazy {
            let supplier = self.lazy_reference(target.clone());
            return Ok(Some(self.pool.strategy().create_lazy(supplier)?));
        }
        let instance = self
            .pool
            .instantiate_inner(target, self.settings, self.blacklist.clone())
            .await?;
        Ok(Some(instance))
    }

    /// Primitive handler: the coerced raw value.
    async fn try_primitive(
        &self,
        value: &ArgumentValue,
    ) -> Result<Option<S::Instance>, InstantiationError> {
        let ArgumentValue::Primitive { value, lazy } = value else {
            return Ok(None);
        };
        if *lazy {
            let supplier = self.lazy_primitive(value.clone());
            return Ok(Some(self.pool.strategy().create_lazy(supplier)?));
        }
        Ok(Some(self.pool.strategy().create_primitive(value.clone()).await?))
    }

    /// Builds a supplier that re-enters the pool for a deferred reference.
    fn lazy_reference(&self, target: Term) -> LazySupplier<S::Instance> {
        let pool = self.pool.clone();
        let settings = Arc::clone(self.settings);
        let blacklist = self.blacklist.clone();
        Arc::new(move || {
            let pool = pool.clone();
            let settings = Arc::clone(&settings);
            let blacklist = blacklist.clone();
            let target = target.clone();
            Box::pin(async move { pool.instantiate_inner(&target, &settings, blacklist).await })
        })
    }

    /// Builds a supplier deferring a primitive's materialization.
    fn lazy_primitive(&self, value: Primitive) -> LazySupplier<S::Instance> {
        let pool = self.pool.clone();
        Arc::new(move || {
            let pool = pool.clone();
            let value = value.clone();
            Box::pin(async move {
                pool.strategy()
                    .create_primitive(value)
                    .await
                    .map_err(InstantiationError::from)
            })
        })
    }
}
