//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use servfor_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Pool { url: String }
/// struct Session { id: u32 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Pool { url: "oracle://db".to_string() });
/// services.add_scoped_factory::<Session, _>(|_| Session { id: 7 });
///
/// let provider = services.build();
///
/// let scope1 = provider.create_scope();
/// let a = scope1.get_required::<Session>();
/// let b = scope1.get_required::<Session>();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let scope2 = provider.create_scope();
/// assert!(!Arc::ptr_eq(&a, &scope2.get_required::<Session>()));
/// assert!(Arc::ptr_eq(&provider.get_required::<Pool>(), &scope2.get_required::<Pool>()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// Single instance per root provider, created on first request and
    /// shared across all scopes and threads.
    Singleton,
    /// Single instance per scope. Cannot be resolved from the root provider.
    Scoped,
    /// New instance per resolution, never cached.
    #[default]
    Transient,
}
