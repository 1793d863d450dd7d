//! Service provider module for dependency injection.
//!
//! This module contains the ServiceProvider type and related functionality
//! for resolving registered services from the DI container.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::ResolverCore;

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::Scope;

/// Service provider for resolving dependencies from the DI container.
///
/// Built from a `ServiceCollection`. Bindings are resolved lazily: nothing is
/// constructed until the first request, singletons are then cached for the
/// provider's lifetime, transients are rebuilt on every request and scoped
/// bindings require a [`Scope`].
///
/// The provider is cheap to clone and can be shared across threads.
///
/// # Examples
///
/// ```
/// use servfor_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "oracle://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "oracle://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner { registry }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// Each scope caches its own scoped instances while sharing singletons
    /// with the root provider.
    pub fn create_scope(&self) -> Scope {
        Scope {
            root: self.clone(),
            scoped: Mutex::new(Default::default()),
        }
    }

    /// Number of bindings in the container.
    pub fn service_count(&self) -> usize {
        self.inner().registry.len()
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for (k, r) in self.inner().registry.iter() {
            s.push_str(&format!("  {:?}: {:?}\n", k, r.lifetime));
        }
        s
    }

    /// Singletons are always built against the root so they never capture
    /// scoped instances.
    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        if let Some(cell) = &reg.single_runtime {
            if let Some(value) = cell.get() {
                return Ok(value.clone());
            }

            let ctx = ResolverContext::new(self);
            let value = (reg.ctor)(&ctx)?;
            return Ok(cell.get_or_init(|| value).clone());
        }

        let ctx = ResolverContext::new(self);
        (reg.ctor)(&ctx)
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Scoped => Err(DiError::WrongLifetime(
                "Cannot resolve scoped service from root provider",
            )),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key, || self.resolve_any_impl(key))
    }

    fn is_bound(&self, key: &Key) -> bool {
        self.inner().registry.contains_key(key)
    }
}
