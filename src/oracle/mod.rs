//! Oracle service registration: the module plus the collaborators it binds.

pub mod cache;
pub mod connection;
pub mod logging;
pub mod module;
pub mod service;

pub use cache::{CacheOptions, CacheStorage, CacheValue, MemoryCache, OracleCache};
pub use connection::{ConnectionInfo, DbConnectionFactory, OracleDbConnectionFactory};
pub use logging::{ServiceLogger, TracingLogger};
pub use module::{ConnectionEnum, ConnectionMode, ServForOracleModule};
pub use service::{OracleService, ServiceForOracle};
