//! JSON and environment configuration for [`ServForOracleModule`].
//!
//! ```
//! use servfor_di::ConnectionConfig;
//!
//! let config = ConnectionConfig::from_json_str(r#"{
//!     "connections": { "hr": "Data Source=hr-db", "sales": "Data Source=sales-db" },
//!     "cache": { "max_capacity": 500, "time_to_live_secs": 60 },
//!     "service_lifetime": "singleton"
//! }"#).unwrap();
//!
//! let module = config.into_module().unwrap();
//! assert_eq!(module.len(), 2);
//! assert_eq!(module.cache_options().max_capacity, 500);
//! ```

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;
use crate::oracle::{CacheOptions, ServForOracleModule};

/// Cache sizing as it appears in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub max_capacity: Option<u64>,
    pub time_to_live_secs: Option<u64>,
}

impl CacheConfig {
    pub fn to_options(&self) -> CacheOptions {
        let defaults = CacheOptions::default();
        CacheOptions {
            max_capacity: self.max_capacity.unwrap_or(defaults.max_capacity),
            time_to_live: self.time_to_live_secs.map(Duration::from_secs).or(defaults.time_to_live),
        }
    }
}

/// Connection configuration. Exactly one of `connection_string` and
/// `connections` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub connection_string: Option<String>,
    pub connections: Option<HashMap<String, String>>,
    pub cache: CacheConfig,
    pub service_lifetime: Option<Lifetime>,
}

impl ConnectionConfig {
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> DiResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DiError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Reads `{PREFIX}_CONNECTION_STRING`, `{PREFIX}_CACHE_MAX_CAPACITY`,
    /// `{PREFIX}_CACHE_TTL_SECS` and `{PREFIX}_SERVICE_LIFETIME`.
    ///
    /// Unset variables stay unset; malformed numbers or lifetimes are errors.
    pub fn from_env(prefix: &str) -> DiResult<Self> {
        let var = |name: &str| env::var(format!("{}_{}", prefix.to_uppercase(), name)).ok();
        let number = |name: &str| -> DiResult<Option<u64>> {
            var(name)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| DiError::Config(format!("{}_{name}: {e}", prefix.to_uppercase())))
                })
                .transpose()
        };

        let service_lifetime = match var("SERVICE_LIFETIME") {
            Some(value) => Some(parse_lifetime(&value)?),
            None => None,
        };

        Ok(Self {
            connection_string: var("CONNECTION_STRING"),
            connections: None,
            cache: CacheConfig {
                max_capacity: number("CACHE_MAX_CAPACITY")?,
                time_to_live_secs: number("CACHE_TTL_SECS")?,
            },
            service_lifetime,
        })
    }

    /// Builds the module; constructor validation applies.
    pub fn into_module(self) -> DiResult<ServForOracleModule> {
        let module = match (self.connection_string, self.connections) {
            (Some(connection_string), None) => ServForOracleModule::from_connection_string(connection_string)?,
            (None, Some(connections)) => ServForOracleModule::from_named(connections)?,
            _ => return Err(DiError::InvalidArgument("connections")),
        };
        Ok(module
            .with_cache_options(self.cache.to_options())
            .with_service_lifetime(self.service_lifetime.unwrap_or_default()))
    }
}

fn parse_lifetime(value: &str) -> DiResult<Lifetime> {
    match value.trim().to_ascii_lowercase().as_str() {
        "singleton" => Ok(Lifetime::Singleton),
        "scoped" => Ok(Lifetime::Scoped),
        "transient" => Ok(Lifetime::Transient),
        other => Err(DiError::Config(format!("unknown service lifetime `{other}`"))),
    }
}
