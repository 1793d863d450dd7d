//! Service registration types.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;

pub(crate) use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Implementation type for diagnostics (unknown for trait objects)
    pub(crate) impl_id: Option<TypeId>,
    /// Singleton cache, only present for `Lifetime::Singleton`
    pub(crate) single_runtime: Option<OnceCell<AnyArc>>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor, impl_id: Option<TypeId>) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };

        Self {
            lifetime,
            ctor,
            impl_id,
            single_runtime,
        }
    }
}

/// Service registry holding all registrations.
///
/// Insertion order is kept so descriptors list bindings the way they were
/// registered.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<Key, Registration>,
    order: Vec<Key>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a registration, replacing any existing binding for `key`.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        if self.entries.insert(key.clone(), registration).is_none() {
            self.order.push(key);
        }
    }

    /// Inserts only when `key` is not bound yet. Returns whether it inserted.
    pub(crate) fn insert_if_absent(&mut self, key: Key, registration: Registration) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.insert(key, registration);
        true
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterator over all key-registration pairs in registration order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|reg| (key, reg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of_type;

    fn ctor() -> Ctor {
        Arc::new(|_: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(1u8)) })
    }

    #[test]
    fn insert_if_absent_keeps_first_registration() {
        let mut registry = Registry::new();
        assert!(registry.insert_if_absent(key_of_type::<u8>(), Registration::new(Lifetime::Singleton, ctor(), None)));
        assert!(!registry.insert_if_absent(key_of_type::<u8>(), Registration::new(Lifetime::Transient, ctor(), None)));

        let reg = registry.get(&key_of_type::<u8>()).unwrap();
        assert_eq!(reg.lifetime, Lifetime::Singleton);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insert_replaces_and_keeps_order() {
        let mut registry = Registry::new();
        registry.insert(key_of_type::<u8>(), Registration::new(Lifetime::Singleton, ctor(), None));
        registry.insert(key_of_type::<u16>(), Registration::new(Lifetime::Scoped, ctor(), None));
        registry.insert(key_of_type::<u8>(), Registration::new(Lifetime::Transient, ctor(), None));

        let lifetimes: Vec<_> = registry.iter().map(|(_, r)| r.lifetime).collect();
        assert_eq!(lifetimes, vec![Lifetime::Transient, Lifetime::Scoped]);
        assert!(registry.get(&key_of_type::<u8>()).unwrap().single_runtime.is_none());
    }
}
