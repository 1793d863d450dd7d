//! Service descriptors for introspection and diagnostics.

use std::any::TypeId;

use crate::key::{Key, ServiceKey};
use crate::lifetime::Lifetime;

/// Describes one registered binding.
///
/// Useful for asserting what a registration module put into a collection
/// without building a provider.
///
/// # Examples
///
/// ```rust
/// use servfor_di::{ServiceCollection, Lifetime, ServiceKey};
///
/// struct Dsn(&'static str);
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42u32);
/// services.add_keyed_factory::<Dsn, _>("hr", Lifetime::Transient, |_| Ok(Dsn("Data Source=hr;")));
///
/// let descriptors = services.get_service_descriptors();
/// assert!(!descriptors[0].is_keyed());
/// assert_eq!(descriptors[1].service_key(), Some(&ServiceKey::from("hr")));
/// assert!(descriptors[1].type_name().ends_with("Dsn"));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The binding key (type or trait, with the selecting key if keyed)
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Implementation type ID (if available)
    pub impl_type_id: Option<TypeId>,
}

impl ServiceDescriptor {
    /// The selecting key for keyed bindings.
    pub fn service_key(&self) -> Option<&ServiceKey> {
        self.key.service_key()
    }

    /// The type or trait name, as produced by `std::any::type_name`.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn is_keyed(&self) -> bool {
        self.service_key().is_some()
    }

    /// True for trait-object bindings.
    pub fn is_trait(&self) -> bool {
        matches!(self.key, Key::Trait(_) | Key::TraitKeyed(_, _))
    }
}
