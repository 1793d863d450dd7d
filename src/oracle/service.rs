//! The Oracle service facade resolved by consumers.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::Level;

use super::cache::OracleCache;
use super::connection::{ConnectionInfo, DbConnectionFactory};
use super::logging::ServiceLogger;
use crate::error::DiResult;

/// Service facade over one connection factory and the shared cache.
pub trait ServiceForOracle: Send + Sync {
    fn connection_factory(&self) -> &Arc<dyn DbConnectionFactory>;

    /// The container-wide cache.
    fn cache(&self) -> &Arc<OracleCache>;

    fn has_logger(&self) -> bool;

    /// Parsed settings of the bound connection, memoized in the shared cache.
    fn describe_connection(&self) -> DiResult<Arc<ConnectionInfo>>;
}

// The hashed key can collide; the stored string decides whether a hit is ours.
struct MemoizedSettings {
    connection_string: String,
    info: Arc<ConnectionInfo>,
}

/// Default [`ServiceForOracle`].
pub struct OracleService {
    logger: Option<Arc<dyn ServiceLogger>>,
    cache: Arc<OracleCache>,
    factory: Arc<dyn DbConnectionFactory>,
}

impl OracleService {
    pub fn new(
        logger: Option<Arc<dyn ServiceLogger>>,
        cache: Arc<OracleCache>,
        factory: Arc<dyn DbConnectionFactory>,
    ) -> Self {
        Self { logger, cache, factory }
    }

    fn log(&self, level: Level, message: &str) {
        if let Some(logger) = &self.logger {
            logger.log(level, message);
        }
    }

    // Cache keys never carry the raw string; it may hold credentials.
    fn settings_cache_key(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.factory.connection_string().hash(&mut hasher);
        format!("connection-info:{:016x}", hasher.finish())
    }

    fn parse_settings(&self) -> DiResult<Arc<ConnectionInfo>> {
        self.log(Level::DEBUG, "parsing connection settings");
        let result = self.factory.connection_settings().map(Arc::new);
        if let Err(err) = &result {
            self.log(Level::WARN, &err.to_string());
        }
        result
    }
}

impl ServiceForOracle for OracleService {
    fn connection_factory(&self) -> &Arc<dyn DbConnectionFactory> {
        &self.factory
    }

    fn cache(&self) -> &Arc<OracleCache> {
        &self.cache
    }

    fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    fn describe_connection(&self) -> DiResult<Arc<ConnectionInfo>> {
        let key = self.settings_cache_key();
        let connection_string = self.factory.connection_string();
        match self.cache.get::<MemoizedSettings>(&key) {
            Some(entry) if entry.connection_string == connection_string => Ok(entry.info.clone()),
            // Another string owns this slot; leave it alone.
            Some(_) => self.parse_settings(),
            None => {
                let info = self.parse_settings()?;
                self.cache.set(
                    &key,
                    MemoizedSettings {
                        connection_string: connection_string.to_string(),
                        info: info.clone(),
                    },
                );
                Ok(info)
            }
        }
    }
}

impl fmt::Debug for OracleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleService")
            .field("has_logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}
