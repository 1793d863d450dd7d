//! Resolver traits for service resolution.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_trait, key_of_type, Key, ServiceKey};
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// Implemented by `ServiceProvider`, `Scope` and the `ResolverContext` handed
/// to factories. Most callers should use [`Resolver`] instead, which adds
/// typed helpers on top.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single binding, applying its lifetime rules.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (not found, wrong lifetime, circular, etc.)
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;

    /// True when a binding exists for `key`. Never constructs anything.
    fn is_bound(&self, key: &Key) -> bool;
}

fn downcast<T: Send + Sync + 'static>(any: AnyArc) -> DiResult<Arc<T>> {
    any.downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

// Trait objects are stored as Arc<Arc<dyn Trait>> inside the Any.
fn downcast_trait<T: ?Sized + Send + Sync + 'static>(any: AnyArc) -> DiResult<Arc<T>> {
    any.downcast::<Arc<T>>()
        .map(|boxed| (*boxed).clone())
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

fn keyed_type<T: 'static>(key: ServiceKey) -> Key {
    Key::TypeKeyed(std::any::TypeId::of::<T>(), std::any::type_name::<T>(), key)
}

fn keyed_trait<T: ?Sized + 'static>(key: ServiceKey) -> Key {
    Key::TraitKeyed(std::any::type_name::<T>(), key)
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Blanket-implemented for every [`ResolverCore`], so `ServiceProvider`,
/// `Scope` and factory contexts expose the same API.
///
/// # Examples
///
/// ```
/// use servfor_di::{ServiceCollection, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// trait Repo: Send + Sync {
///     fn table(&self) -> &str;
/// }
///
/// struct TableRepo(&'static str);
/// impl Repo for TableRepo {
///     fn table(&self) -> &str { self.0 }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_keyed_trait_factory::<dyn Repo, _>("orders", Lifetime::Singleton, |_| {
///     Ok(Arc::new(TableRepo("ORDERS")) as Arc<dyn Repo>)
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_keyed_trait::<dyn Repo, _>("orders").unwrap().table(), "ORDERS");
/// assert!(provider.get_keyed_trait::<dyn Repo, _>("invoices").is_err());
/// assert!(provider.try_get_trait::<dyn Repo>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        downcast(self.resolve_any(&key_of_type::<T>())?)
    }

    /// Resolves the unkeyed trait implementation.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        downcast_trait(self.resolve_any(&key_of_trait::<T>())?)
    }

    /// Resolves a concrete service registered under `key`.
    fn get_keyed<T, K>(&self, key: K) -> DiResult<Arc<T>>
    where
        T: 'static + Send + Sync,
        K: Hash + Eq + Debug + Send + Sync + 'static,
    {
        downcast(self.resolve_any(&keyed_type::<T>(ServiceKey::new(key)))?)
    }

    /// Resolves a trait implementation registered under `key`.
    fn get_keyed_trait<T, K>(&self, key: K) -> DiResult<Arc<T>>
    where
        T: ?Sized + 'static + Send + Sync,
        K: Hash + Eq + Debug + Send + Sync + 'static,
    {
        downcast_trait(self.resolve_any(&keyed_trait::<T>(ServiceKey::new(key)))?)
    }

    /// Resolves a concrete service if it is registered.
    ///
    /// Returns `Ok(None)` when no binding exists; failures while constructing
    /// a registered service are still reported as errors.
    fn try_get<T: 'static + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        let key = key_of_type::<T>();
        if !self.is_bound(&key) {
            return Ok(None);
        }
        downcast(self.resolve_any(&key)?).map(Some)
    }

    /// Resolves the unkeyed trait implementation if it is registered.
    fn try_get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        let key = key_of_trait::<T>();
        if !self.is_bound(&key) {
            return Ok(None);
        }
        downcast_trait(self.resolve_any(&key)?).map(Some)
    }

    /// Resolves a concrete service type, panicking on failure.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {:?}", std::any::type_name::<T>(), e))
    }

    /// Resolves a trait implementation, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T> {
        self.get_trait::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve trait {}: {:?}", std::any::type_name::<T>(), e))
    }

    /// Resolves a keyed trait implementation, panicking on failure.
    fn get_keyed_trait_required<T, K>(&self, key: K) -> Arc<T>
    where
        T: ?Sized + 'static + Send + Sync,
        K: Hash + Eq + Debug + Send + Sync + 'static,
    {
        let key = ServiceKey::new(key);
        self.get_keyed_trait::<T, _>(key.clone())
            .unwrap_or_else(|e| panic!("Failed to resolve keyed trait {} ({:?}): {:?}", std::any::type_name::<T>(), key, e))
    }

    /// True when an unkeyed binding for concrete type `T` exists.
    fn is_registered<T: 'static>(&self) -> bool {
        self.is_bound(&key_of_type::<T>())
    }

    /// True when an unkeyed binding for trait `T` exists.
    fn is_trait_registered<T: ?Sized + 'static>(&self) -> bool {
        self.is_bound(&key_of_trait::<T>())
    }

    /// True when concrete type `T` is bound under `key`.
    fn is_registered_with_key<T, K>(&self, key: K) -> bool
    where
        T: 'static,
        K: Hash + Eq + Debug + Send + Sync + 'static,
    {
        self.is_bound(&keyed_type::<T>(ServiceKey::new(key)))
    }

    /// True when trait `T` is bound under `key`.
    fn is_trait_registered_with_key<T, K>(&self, key: K) -> bool
    where
        T: ?Sized + 'static,
        K: Hash + Eq + Debug + Send + Sync + 'static,
    {
        self.is_bound(&keyed_trait::<T>(ServiceKey::new(key)))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
