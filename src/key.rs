//! Service key types for the dependency injection container.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Object-safe view over any hashable, comparable key value.
trait DynKey: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DynKey) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> DynKey for T
where
    T: Hash + Eq + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynKey) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }

    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Opaque identity selecting one keyed registration.
///
/// A `ServiceKey` wraps any `Hash + Eq + Debug + Send + Sync + 'static`
/// value: strings, enum variants, integers, or custom structs. Two keys are
/// equal only when they wrap the same concrete type and the wrapped values
/// compare equal, so `ServiceKey::new(1u32)` and `ServiceKey::new(1u64)` are
/// different keys.
///
/// String slices are stored as `String`, which makes `"primary"` and
/// `String::from("primary")` the same key.
///
/// # Examples
///
/// ```rust
/// use servfor_di::ServiceKey;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Region { Emea, Apac }
///
/// let a = ServiceKey::new(Region::Emea);
/// assert_eq!(a, ServiceKey::new(Region::Emea));
/// assert_ne!(a, ServiceKey::new(Region::Apac));
/// assert_eq!(a.downcast_ref::<Region>(), Some(&Region::Emea));
///
/// assert_eq!(ServiceKey::from("primary"), ServiceKey::new("primary".to_string()));
/// ```
#[derive(Clone)]
pub struct ServiceKey(Arc<dyn DynKey>);

impl ServiceKey {
    /// Wraps `key`. Wrapping a `ServiceKey` returns a clone of it, and
    /// `&'static str` is stored as `String`.
    pub fn new<K>(key: K) -> Self
    where
        K: Hash + Eq + fmt::Debug + Send + Sync + 'static,
    {
        let any = &key as &dyn Any;
        if let Some(existing) = any.downcast_ref::<ServiceKey>() {
            return existing.clone();
        }
        if let Some(text) = any.downcast_ref::<&'static str>() {
            return ServiceKey(Arc::new(text.to_string()));
        }
        ServiceKey(Arc::new(key))
    }

    /// Returns the wrapped value if it is a `K`.
    pub fn downcast_ref<K: 'static>(&self) -> Option<&K> {
        self.0.as_any().downcast_ref::<K>()
    }

    /// True when the wrapped value is a `K`.
    pub fn is<K: 'static>(&self) -> bool {
        self.0.as_any().is::<K>()
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.dyn_fmt(f)
    }
}

impl From<&str> for ServiceKey {
    fn from(value: &str) -> Self {
        ServiceKey::new(value.to_string())
    }
}

impl From<String> for ServiceKey {
    fn from(value: String) -> Self {
        ServiceKey::new(value)
    }
}

/// Key for service storage and lookup.
///
/// Keys uniquely identify bindings in the container. Unkeyed bindings are
/// identified by their type or trait alone; keyed bindings additionally
/// carry a [`ServiceKey`].
///
/// # Examples
///
/// ```rust
/// use servfor_di::{Key, ServiceKey, key_of_type};
/// use std::any::TypeId;
///
/// let type_key = Key::Type(TypeId::of::<String>(), "alloc::string::String");
/// assert_eq!(type_key, key_of_type::<String>());
/// assert_eq!(type_key.service_key(), None);
///
/// let keyed = Key::TraitKeyed("dyn app::Repo", ServiceKey::from("reports"));
/// assert_eq!(keyed.display_name(), "dyn app::Repo");
/// assert_eq!(keyed.service_key(), Some(&ServiceKey::from("reports")));
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Single trait binding key
    ///
    /// Only stores the trait name since `dyn Trait` has no usable TypeId
    /// for unsized lookups.
    Trait(&'static str),
    /// Keyed concrete type: TypeId, type name and the selecting key
    TypeKeyed(TypeId, &'static str, ServiceKey),
    /// Keyed trait binding: trait name and the selecting key
    TraitKeyed(&'static str, ServiceKey),
}

impl Key {
    /// Get the type or trait name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
            Key::TypeKeyed(_, name, _) => name,
            Key::TraitKeyed(name, _) => name,
        }
    }

    /// The selecting key for keyed bindings, `None` for unkeyed ones.
    pub fn service_key(&self) -> Option<&ServiceKey> {
        match self {
            Key::Type(_, _) | Key::Trait(_) => None,
            Key::TypeKeyed(_, _, key) | Key::TraitKeyed(_, key) => Some(key),
        }
    }

    /// Returns the unkeyed key for the same type or trait.
    pub fn unkeyed(&self) -> Key {
        match self {
            Key::Type(id, name) | Key::TypeKeyed(id, name, _) => Key::Type(*id, name),
            Key::Trait(name) | Key::TraitKeyed(name, _) => Key::Trait(name),
        }
    }
}

// Type names are diagnostics only; TypeId decides identity for concrete types.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            (Key::TypeKeyed(a, _, key_a), Key::TypeKeyed(b, _, key_b)) => a == b && key_a == key_b,
            (Key::TraitKeyed(a, key_a), Key::TraitKeyed(b, key_b)) => a == b && key_a == key_b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Key::TypeKeyed(id, _, key) => {
                2u8.hash(state);
                id.hash(state);
                key.hash(state);
            }
            Key::TraitKeyed(name, key) => {
                3u8.hash(state);
                name.hash(state);
                key.hash(state);
            }
        }
    }
}

/// Key for the unkeyed binding of concrete type `T`.
#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Key for the unkeyed binding of trait object `T`.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
