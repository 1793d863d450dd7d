//! Service module system for modular registration.
//!
//! This module provides traits and functionality for organizing service
//! registrations into reusable modules.

use crate::{DiResult, ServiceCollection};

/// A module that can register services with a ServiceCollection.
///
/// # Example
///
/// ```rust
/// use servfor_di::{ServiceCollection, ServiceModule, ServiceCollectionExt, DiResult, Resolver};
///
/// struct Settings { schema: &'static str }
///
/// struct SettingsModule;
///
/// impl ServiceModule for SettingsModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(Settings { schema: "HR" });
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let provider = ServiceCollection::new().add_module(SettingsModule)?.build();
/// assert_eq!(provider.get_required::<Settings>().schema, "HR");
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's services with the ServiceCollection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Extension trait for chaining modules onto an owned collection.
pub trait ServiceCollectionExt {
    /// Add a module to the service collection using extension method syntax.
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        module.register_services(&mut self)?;
        Ok(self)
    }
}

/// Module registration that matches the `&mut Self` registration style.
pub trait ServiceCollectionModuleExt {
    /// Add a module to the service collection in-place.
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
