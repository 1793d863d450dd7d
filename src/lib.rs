//! # servfor-di
//!
//! Registration module for Oracle-backed services on a small dependency
//! injection container modelled on Microsoft.Extensions.DependencyInjection.
//!
//! A [`ServForOracleModule`] takes one connection string, or many selected by
//! key, and registers:
//!
//! - a shared [`CacheStorage`] and [`OracleCache`] (added only if absent),
//! - a [`DbConnectionFactory`] per connection string,
//! - a [`ServiceForOracle`] facade per connection string, which receives the
//!   shared cache, its factory and an optional [`ServiceLogger`].
//!
//! ## Single connection
//!
//! ```rust
//! use servfor_di::{Resolver, ServForOracleModule, ServiceCollection, ServiceCollectionExt, ServiceForOracle};
//!
//! # fn main() -> servfor_di::DiResult<()> {
//! let module = ServForOracleModule::from_connection_string("Data Source=db01:1521/ORCL;User Id=app")?;
//! let provider = ServiceCollection::new().add_module(module)?.build();
//!
//! let service = provider.get_trait::<dyn ServiceForOracle>()?;
//! assert_eq!(service.describe_connection()?.user_id.as_deref(), Some("app"));
//! assert!(!service.has_logger());
//! # Ok(())
//! # }
//! ```
//!
//! ## Enum-keyed connections
//!
//! ```rust
//! use servfor_di::{ConnectionEnum, Resolver, ServForOracleModule, ServiceCollection, ServiceForOracle};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Db { Hr, Sales }
//!
//! impl ConnectionEnum for Db {
//!     fn variants() -> &'static [Self] { &[Db::Hr, Db::Sales] }
//! }
//!
//! # fn main() -> servfor_di::DiResult<()> {
//! let module = ServForOracleModule::from_enum_sequence::<Db, _, _>(["Data Source=hr", "Data Source=sales"])?;
//! let mut services = ServiceCollection::new();
//! module.load(&mut services);
//!
//! let provider = services.build();
//! let hr = provider.get_keyed_trait::<dyn ServiceForOracle, _>(Db::Hr)?;
//! let sales = provider.get_keyed_trait::<dyn ServiceForOracle, _>(Db::Sales)?;
//! assert_eq!(hr.connection_factory().connection_string(), "Data Source=hr");
//! assert!(Arc::ptr_eq(hr.cache(), sales.cache()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once and shared across the entire application
//! - **Scoped**: Created once per scope
//! - **Transient**: Created fresh on every resolution (the module default)

// Module declarations
pub mod collection;
pub mod provider;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod oracle;
pub mod traits;

#[cfg(feature = "config")]
pub mod config;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::{ServiceCollection, ServiceModule, ServiceCollectionExt, ServiceCollectionModuleExt};
pub use provider::{ServiceProvider, Scope, ResolverContext};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use internal::CircularPanic;
pub use key::{Key, ServiceKey, key_of_type, key_of_trait};
pub use lifetime::Lifetime;
pub use traits::{Resolver, ResolverCore};

pub use oracle::{
    CacheOptions, CacheStorage, CacheValue, ConnectionEnum, ConnectionInfo, ConnectionMode, DbConnectionFactory,
    MemoryCache, OracleCache, OracleDbConnectionFactory, OracleService, ServForOracleModule, ServiceForOracle,
    ServiceLogger, TracingLogger,
};

#[cfg(feature = "config")]
pub use config::{CacheConfig, ConnectionConfig};
