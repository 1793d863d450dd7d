//! Service collection module for dependency injection.
//!
//! This module contains the ServiceCollection type and related functionality
//! for registering services and building service providers.

use std::any::TypeId;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::descriptors::ServiceDescriptor;
use crate::error::DiResult;
use crate::key::{key_of_trait, key_of_type, Key, ServiceKey};
use crate::lifetime::Lifetime;
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{AnyArc, Ctor, Registration, Registry};

pub mod module_system;
pub use module_system::*;

/// Registration target that accumulates bindings before a provider is built.
///
/// # Examples
///
/// ```rust
/// use servfor_di::{ServiceCollection, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync { fn now(&self) -> u64; }
/// struct Fixed(u64);
/// impl Clock for Fixed { fn now(&self) -> u64 { self.0 } }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_trait::<dyn Clock>(Arc::new(Fixed(5)));
/// services.add_keyed_trait_factory::<dyn Clock, _>("frozen", Lifetime::Singleton, |_| {
///     Ok(Arc::new(Fixed(0)) as Arc<dyn Clock>)
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required_trait::<dyn Clock>().now(), 5);
/// assert_eq!(provider.get_keyed_trait_required::<dyn Clock, _>("frozen").now(), 0);
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    registry: Registry,
}

fn type_ctor<T, F>(factory: F) -> Ctor
where
    T: 'static + Send + Sync,
    F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
{
    Arc::new(move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r)?)) })
}

// Trait objects are stored as Arc<Arc<dyn Trait>> inside the Any.
fn trait_ctor<Trait, F>(factory: F) -> Ctor
where
    Trait: ?Sized + 'static + Send + Sync,
    F: Fn(&ResolverContext) -> DiResult<Arc<Trait>> + Send + Sync + 'static,
{
    Arc::new(move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r)?)) })
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    fn bind(&mut self, key: Key, lifetime: Lifetime, ctor: Ctor, impl_id: Option<TypeId>) -> &mut Self {
        self.registry.insert(key, Registration::new(lifetime, ctor, impl_id));
        self
    }

    fn bind_if_absent(&mut self, key: Key, lifetime: Lifetime, ctor: Ctor, impl_id: Option<TypeId>) -> bool {
        self.registry.insert_if_absent(key, Registration::new(lifetime, ctor, impl_id))
    }

    // ----- Concrete Type Registrations -----

    /// Registers an existing instance as a singleton.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use servfor_di::ServiceCollection;
    /// struct Config { dsn: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config { dsn: "Data Source=db;".to_string() });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.bind(key_of_type::<T>(), Lifetime::Singleton, Arc::new(ctor), Some(TypeId::of::<T>()))
    }

    /// Registers a singleton factory that creates the instance on first request.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory that creates one instance per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory that creates a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let ctor = type_ctor::<T, _>(move |r: &ResolverContext| Ok(factory(r)));
        self.bind(key_of_type::<T>(), lifetime, ctor, Some(TypeId::of::<T>()))
    }

    // ----- Trait Registrations -----

    /// Registers an existing trait implementation as a singleton.
    ///
    /// ```rust
    /// # use servfor_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Audit: Send + Sync { fn record(&self, line: &str); }
    /// struct NoAudit;
    /// impl Audit for NoAudit { fn record(&self, _: &str) {} }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Audit>(Arc::new(NoAudit));
    /// assert!(services.is_trait_registered::<dyn Audit>());
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.bind(key_of_trait::<T>(), Lifetime::Singleton, Arc::new(ctor), None)
    }

    /// Registers a singleton trait factory.
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_fallible_trait_factory::<Trait, _>(Lifetime::Singleton, move |r: &ResolverContext| Ok(factory(r)))
    }

    /// Registers an unkeyed trait factory whose construction can fail.
    ///
    /// Errors returned by the factory surface from the resolving call.
    pub fn add_fallible_trait_factory<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<Arc<Trait>> + Send + Sync + 'static,
    {
        self.bind(key_of_trait::<Trait>(), lifetime, trait_ctor(factory), None)
    }

    // ----- Keyed Registrations -----

    /// Registers a concrete type resolvable only under `key`.
    ///
    /// ```rust
    /// # use servfor_di::{ServiceCollection, Resolver, Lifetime};
    /// struct Dsn(String);
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_keyed_factory::<Dsn, _>("hr", Lifetime::Transient, |_| Ok(Dsn("Data Source=hr;".into())));
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_keyed::<Dsn, _>("hr").unwrap().0, "Data Source=hr;");
    /// assert!(!provider.is_registered::<Dsn>());
    /// ```
    pub fn add_keyed_factory<T, F>(
        &mut self,
        key: impl Hash + Eq + fmt::Debug + Send + Sync + 'static,
        lifetime: Lifetime,
        factory: F,
    ) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let key = Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), ServiceKey::new(key));
        self.bind(key, lifetime, type_ctor(factory), Some(TypeId::of::<T>()))
    }

    /// Registers a trait implementation resolvable only under `key`.
    pub fn add_keyed_trait_factory<Trait, F>(
        &mut self,
        key: impl Hash + Eq + fmt::Debug + Send + Sync + 'static,
        lifetime: Lifetime,
        factory: F,
    ) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<Arc<Trait>> + Send + Sync + 'static,
    {
        let key = Key::TraitKeyed(std::any::type_name::<Trait>(), ServiceKey::new(key));
        self.bind(key, lifetime, trait_ctor(factory), None)
    }

    // ----- Conditional Registration (TryAdd*) -----

    /// Register a singleton if not already registered.
    ///
    /// Returns `true` if the service was registered, `false` if a binding
    /// for `T` already existed (the existing binding wins).
    ///
    /// ```
    /// use servfor_di::ServiceCollection;
    ///
    /// let mut services = ServiceCollection::new();
    /// assert!(services.try_add_singleton(42usize));
    /// assert!(!services.try_add_singleton(100usize));
    /// ```
    pub fn try_add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> bool {
        if self.is_registered::<T>() {
            return false;
        }
        self.add_singleton(value);
        true
    }

    /// Register a singleton factory if not already registered.
    pub fn try_add_singleton_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let ctor = type_ctor::<T, _>(move |r: &ResolverContext| Ok(factory(r)));
        self.bind_if_absent(key_of_type::<T>(), Lifetime::Singleton, ctor, Some(TypeId::of::<T>()))
    }

    /// Register a singleton factory whose construction can fail, if `T` is
    /// not registered yet.
    pub fn try_add_fallible_singleton_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.bind_if_absent(key_of_type::<T>(), Lifetime::Singleton, type_ctor::<T, _>(factory), Some(TypeId::of::<T>()))
    }

    /// Register a singleton trait if not already registered.
    pub fn try_add_singleton_trait<T>(&mut self, value: Arc<T>) -> bool
    where
        T: ?Sized + 'static + Send + Sync,
    {
        if self.is_trait_registered::<T>() {
            return false;
        }
        self.add_singleton_trait(value);
        true
    }

    /// Register a singleton trait factory if not already registered.
    pub fn try_add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> bool
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let ctor = trait_ctor::<Trait, _>(move |r: &ResolverContext| Ok(factory(r)));
        self.bind_if_absent(key_of_trait::<Trait>(), Lifetime::Singleton, ctor, None)
    }

    // ----- Introspection -----

    /// True when an unkeyed binding for concrete type `T` exists.
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registry.contains_key(&key_of_type::<T>())
    }

    /// True when an unkeyed binding for trait `T` exists.
    pub fn is_trait_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&key_of_trait::<T>())
    }

    /// True when concrete type `T` is bound under `key`.
    pub fn is_registered_with_key<T: 'static>(
        &self,
        key: impl Hash + Eq + fmt::Debug + Send + Sync + 'static,
    ) -> bool {
        let key = Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), ServiceKey::new(key));
        self.registry.contains_key(&key)
    }

    /// True when trait `T` is bound under `key`.
    pub fn is_trait_registered_with_key<T: ?Sized + 'static>(
        &self,
        key: impl Hash + Eq + fmt::Debug + Send + Sync + 'static,
    ) -> bool {
        self.registry
            .contains_key(&Key::TraitKeyed(std::any::type_name::<T>(), ServiceKey::new(key)))
    }

    /// Number of bindings registered so far.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Describes every binding in registration order.
    ///
    /// ```
    /// use servfor_di::{ServiceCollection, Lifetime};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_scoped_factory::<String, _>(|_| "hello".to_string());
    ///
    /// let descriptors = services.get_service_descriptors();
    /// assert_eq!(descriptors.len(), 2);
    /// assert_eq!(descriptors[0].lifetime, Lifetime::Singleton);
    /// assert_eq!(descriptors[1].lifetime, Lifetime::Scoped);
    /// ```
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: key.clone(),
                lifetime: registration.lifetime,
                impl_type_id: registration.impl_id,
            })
            .collect()
    }

    /// Consumes the collection and builds the provider.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.registry)
    }
}
