//! Scoped service resolution.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{ResolverContext, ServiceProvider};
use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Scoped service container for request-scoped dependency resolution.
///
/// - **Singleton**: resolved and cached in the root provider
/// - **Scoped**: resolved and cached within this scope
/// - **Transient**: created fresh on every resolution
///
/// # Examples
///
/// ```
/// use servfor_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct UnitOfWork(u32);
/// struct Handler { uow: Arc<UnitOfWork> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_scoped_factory::<UnitOfWork, _>(|_| UnitOfWork(1));
/// collection.add_transient_factory::<Handler, _>(|r| Handler { uow: r.get_required::<UnitOfWork>() });
///
/// let provider = collection.build();
/// let scope = provider.create_scope();
///
/// let h1 = scope.get_required::<Handler>();
/// let h2 = scope.get_required::<Handler>();
/// assert!(Arc::ptr_eq(&h1.uow, &h2.uow));
/// ```
pub struct Scope {
    pub(crate) root: ServiceProvider,
    pub(crate) scoped: Mutex<HashMap<Key, AnyArc>>,
}

impl Scope {
    /// The provider this scope was created from.
    pub fn root(&self) -> &ServiceProvider {
        &self.root
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .root
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        match reg.lifetime {
            Lifetime::Singleton => self.root.resolve_singleton(reg),
            Lifetime::Scoped => {
                if let Some(cached) = self.scoped.lock().get(key) {
                    return Ok(cached.clone());
                }

                // Never hold the lock while a factory runs; it may resolve
                // other scoped services.
                let ctx = ResolverContext::new(self);
                let value = (reg.ctor)(&ctx)?;

                let mut cache = self.scoped.lock();
                Ok(cache.entry(key.clone()).or_insert(value).clone())
            }
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key, || self.resolve_any_impl(key))
    }

    fn is_bound(&self, key: &Key) -> bool {
        self.root.is_bound(key)
    }
}
