//! Registration module wiring Oracle connection strings into a container.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, warn};

use super::cache::{CacheOptions, CacheStorage, MemoryCache, OracleCache};
use super::connection::{DbConnectionFactory, OracleDbConnectionFactory};
use super::logging::ServiceLogger;
use super::service::{OracleService, ServiceForOracle};
use crate::collection::{ServiceCollection, ServiceModule};
use crate::error::{DiError, DiResult};
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::traits::Resolver;

const CONNECTION_STRING: &str = "connection_string";
const PAIRS: &str = "key_name_connection_strings_pairs";
const CONNECTION_STRINGS: &str = "connection_strings";

/// Enum whose variants select keyed connections.
///
/// ```
/// use servfor_di::ConnectionEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Db { Hr, Sales }
///
/// impl ConnectionEnum for Db {
///     fn variants() -> &'static [Self] {
///         &[Db::Hr, Db::Sales]
///     }
/// }
/// ```
pub trait ConnectionEnum: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// All variants in declaration order.
    fn variants() -> &'static [Self];
}

/// How a module binds its connection strings.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// One unkeyed binding.
    Single(String),
    /// One binding per key.
    Keyed(HashMap<ServiceKey, String>),
}

impl fmt::Debug for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionMode::Single(_) => f.write_str("Single(..)"),
            ConnectionMode::Keyed(pairs) => f.debug_tuple("Keyed").field(&pairs.keys().collect::<Vec<_>>()).finish(),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Registers the Oracle cache, connection factories and service facades.
///
/// The cache storage and the cache wrapper are shared singletons added only
/// when absent, so several modules loaded into one collection share them.
/// Factories and facades are bound unkeyed for a single connection string,
/// or once per key otherwise.
///
/// # Examples
///
/// ```
/// use servfor_di::{Resolver, ServForOracleModule, ServiceCollection, ServiceCollectionExt, ServiceForOracle};
/// use std::collections::HashMap;
///
/// # fn main() -> servfor_di::DiResult<()> {
/// let module = ServForOracleModule::from_named(HashMap::from([
///     ("hr".to_string(), "Data Source=hr-db;User Id=hr".to_string()),
///     ("sales".to_string(), "Data Source=sales-db;User Id=sales".to_string()),
/// ]))?;
///
/// let provider = ServiceCollection::new().add_module(module)?.build();
/// let hr = provider.get_keyed_trait::<dyn ServiceForOracle, _>("hr")?;
/// assert_eq!(hr.describe_connection()?.data_source, "hr-db");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServForOracleModule {
    mode: ConnectionMode,
    cache_options: CacheOptions,
    cache_storage: Option<Arc<dyn CacheStorage>>,
    logger: Option<Arc<dyn ServiceLogger>>,
    service_lifetime: Lifetime,
}

impl ServForOracleModule {
    fn with_mode(mode: ConnectionMode) -> Self {
        Self {
            mode,
            cache_options: CacheOptions::default(),
            cache_storage: None,
            logger: None,
            service_lifetime: Lifetime::Transient,
        }
    }

    /// Single-connection module.
    ///
    /// Fails with `InvalidArgument("connection_string")` when the string is
    /// empty or whitespace.
    pub fn from_connection_string(connection_string: impl Into<String>) -> DiResult<Self> {
        let connection_string = connection_string.into();
        if is_blank(&connection_string) {
            return Err(DiError::InvalidArgument(CONNECTION_STRING));
        }
        Ok(Self::with_mode(ConnectionMode::Single(connection_string)))
    }

    /// Keyed module with string keys.
    pub fn from_named(pairs: HashMap<String, String>) -> DiResult<Self> {
        Self::from_keyed(pairs.into_iter().map(|(key, value)| (ServiceKey::new(key), value)).collect())
    }

    /// Keyed module with arbitrary keys.
    ///
    /// Fails with `InvalidArgument("key_name_connection_strings_pairs")` when
    /// the map is empty or holds a blank connection string.
    pub fn from_keyed(pairs: HashMap<ServiceKey, String>) -> DiResult<Self> {
        if pairs.is_empty() || pairs.values().any(|value| is_blank(value)) {
            return Err(DiError::InvalidArgument(PAIRS));
        }
        Ok(Self::with_mode(ConnectionMode::Keyed(pairs)))
    }

    /// Keyed module with enum keys and explicit pairs.
    pub fn from_enum_map<E: ConnectionEnum>(pairs: HashMap<E, String>) -> DiResult<Self> {
        Self::from_keyed(pairs.into_iter().map(|(key, value)| (ServiceKey::new(key), value)).collect())
    }

    /// Keyed module pairing `E`'s variants, in declaration order, with the
    /// given strings.
    ///
    /// Pairing stops at the shorter side; a length mismatch is logged. Fails
    /// with `InvalidArgument("connection_strings")` when the sequence is
    /// empty, holds a blank string, or `E` has no variants.
    pub fn from_enum_sequence<E, I, S>(connection_strings: I) -> DiResult<Self>
    where
        E: ConnectionEnum,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strings: Vec<String> = connection_strings.into_iter().map(Into::into).collect();
        if strings.is_empty() || strings.iter().any(|value| is_blank(value)) {
            return Err(DiError::InvalidArgument(CONNECTION_STRINGS));
        }

        let variants = E::variants();
        if variants.len() != strings.len() {
            warn!(
                enum_type = std::any::type_name::<E>(),
                variants = variants.len(),
                connection_strings = strings.len(),
                "variant count differs from connection string count; extra entries are ignored"
            );
        }

        let pairs: HashMap<ServiceKey, String> = variants
            .iter()
            .zip(strings)
            .map(|(variant, value)| (ServiceKey::new(*variant), value))
            .collect();
        if pairs.is_empty() {
            return Err(DiError::InvalidArgument(CONNECTION_STRINGS));
        }
        Ok(Self::with_mode(ConnectionMode::Keyed(pairs)))
    }

    /// Sizing for the memory cache created when no storage is registered.
    pub fn with_cache_options(mut self, options: CacheOptions) -> Self {
        self.cache_options = options;
        self
    }

    /// Storage to register instead of a fresh [`MemoryCache`], if the
    /// collection has none yet.
    pub fn with_cache_storage(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.cache_storage = Some(storage);
        self
    }

    /// Logger handed to every service this module registers. Without one,
    /// services get the container's `dyn ServiceLogger` if it has one.
    pub fn with_logger(mut self, logger: Arc<dyn ServiceLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Lifetime of factory and facade bindings. Defaults to transient.
    pub fn with_service_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.service_lifetime = lifetime;
        self
    }

    pub fn mode(&self) -> &ConnectionMode {
        &self.mode
    }

    pub fn single_connection_string(&self) -> Option<&str> {
        match &self.mode {
            ConnectionMode::Single(value) => Some(value),
            ConnectionMode::Keyed(_) => None,
        }
    }

    pub fn connection_strings(&self) -> Option<&HashMap<ServiceKey, String>> {
        match &self.mode {
            ConnectionMode::Single(_) => None,
            ConnectionMode::Keyed(pairs) => Some(pairs),
        }
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self.mode, ConnectionMode::Keyed(_))
    }

    /// Number of connection strings.
    pub fn len(&self) -> usize {
        match &self.mode {
            ConnectionMode::Single(_) => 1,
            ConnectionMode::Keyed(pairs) => pairs.len(),
        }
    }

    pub fn cache_options(&self) -> CacheOptions {
        self.cache_options
    }

    pub fn service_lifetime(&self) -> Lifetime {
        self.service_lifetime
    }

    /// Adds this module's bindings to `services`.
    pub fn load(&self, services: &mut ServiceCollection) {
        let storage_added = match &self.cache_storage {
            Some(storage) => services.try_add_singleton_trait::<dyn CacheStorage>(storage.clone()),
            None => {
                let options = self.cache_options;
                services.try_add_singleton_trait_factory::<dyn CacheStorage, _>(move |_| {
                    Arc::new(MemoryCache::new(options)) as Arc<dyn CacheStorage>
                })
            }
        };
        let cache_added = services.try_add_fallible_singleton_factory::<OracleCache, _>(|r| {
            Ok(OracleCache::create(r.get_trait::<dyn CacheStorage>()?))
        });
        debug!(storage_added, cache_added, "registered Oracle cache bindings");

        let lifetime = self.service_lifetime;
        match &self.mode {
            ConnectionMode::Single(connection_string) => {
                let connection_string = connection_string.clone();
                services.add_fallible_trait_factory::<dyn DbConnectionFactory, _>(lifetime, move |_| {
                    Ok(Arc::new(OracleDbConnectionFactory::new(connection_string.clone())) as Arc<dyn DbConnectionFactory>)
                });
                let logger = self.logger.clone();
                services.add_fallible_trait_factory::<dyn ServiceForOracle, _>(lifetime, move |r| {
                    let factory = r.get_trait::<dyn DbConnectionFactory>()?;
                    build_service(r, factory, logger.as_ref())
                });
                debug!(?lifetime, "registered Oracle service");
            }
            ConnectionMode::Keyed(pairs) => {
                for (key, connection_string) in pairs {
                    let connection_string = connection_string.clone();
                    services.add_keyed_trait_factory::<dyn DbConnectionFactory, _>(key.clone(), lifetime, move |_| {
                        Ok(Arc::new(OracleDbConnectionFactory::new(connection_string.clone())) as Arc<dyn DbConnectionFactory>)
                    });

                    let factory_key = key.clone();
                    let logger = self.logger.clone();
                    services.add_keyed_trait_factory::<dyn ServiceForOracle, _>(key.clone(), lifetime, move |r| {
                        let factory = r.get_keyed_trait::<dyn DbConnectionFactory, _>(factory_key.clone())?;
                        build_service(r, factory, logger.as_ref())
                    });
                    debug!(?key, ?lifetime, "registered keyed Oracle service");
                }
            }
        }
    }
}

fn build_service(
    r: &ResolverContext,
    factory: Arc<dyn DbConnectionFactory>,
    logger: Option<&Arc<dyn ServiceLogger>>,
) -> DiResult<Arc<dyn ServiceForOracle>> {
    let cache = r.get::<OracleCache>()?;
    let logger = match logger {
        Some(logger) => Some(logger.clone()),
        None => r.try_get_trait::<dyn ServiceLogger>()?,
    };
    Ok(Arc::new(OracleService::new(logger, cache, factory)))
}

impl fmt::Debug for ServForOracleModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServForOracleModule")
            .field("mode", &self.mode)
            .field("cache_options", &self.cache_options)
            .field("custom_cache_storage", &self.cache_storage.is_some())
            .field("has_logger", &self.logger.is_some())
            .field("service_lifetime", &self.service_lifetime)
            .finish()
    }
}

impl ServiceModule for ServForOracleModule {
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
        self.load(services);
        Ok(())
    }
}
