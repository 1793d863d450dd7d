//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Context passed to factory functions for resolving dependencies.
///
/// ResolverContext wraps the resolver that triggered construction
/// (a `ServiceProvider` or a `Scope`), so a scoped factory sees the scope's
/// instances and a singleton factory sees the root's.
///
/// # Examples
///
/// ```
/// use servfor_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Settings { dsn: String }
/// struct Gateway { settings: Arc<Settings> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Settings { dsn: "Data Source=db;".to_string() });
/// services.add_transient_factory::<Gateway, _>(|resolver| Gateway {
///     settings: resolver.get_required::<Settings>(),
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<Gateway>().settings.dsn, "Data Source=db;");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn is_bound(&self, key: &Key) -> bool {
        self.resolver.is_bound(key)
    }
}
