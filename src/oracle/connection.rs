//! Connection factory bound per connection string.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DiError, DiResult};

/// Settings parsed from an Oracle connection string.
///
/// Recognized keys are matched case-insensitively; anything else lands in
/// [`options`](Self::options) under its lowercased name.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub data_source: String,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub options: BTreeMap<String, String>,
}

impl ConnectionInfo {
    /// Parses `key=value` pairs separated by `;`.
    ///
    /// ```
    /// use servfor_di::ConnectionInfo;
    ///
    /// let info = ConnectionInfo::parse("Data Source=hr-db:1521/HR;User Id=scott;Password=tiger;").unwrap();
    /// assert_eq!(info.data_source, "hr-db:1521/HR");
    /// assert_eq!(info.user_id.as_deref(), Some("scott"));
    /// assert!(!format!("{info:?}").contains("tiger"));
    /// ```
    pub fn parse(connection_string: &str) -> DiResult<Self> {
        let mut data_source = None;
        let mut user_id = None;
        let mut password = None;
        let mut options = BTreeMap::new();

        for (index, segment) in connection_string.split(';').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                DiError::InvalidConnectionString(format!("segment {index} is not a key=value pair"))
            })?;
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(DiError::InvalidConnectionString(format!("segment {index} has an empty key")));
            }
            let value = value.trim().to_string();

            match name.as_str() {
                "data source" | "datasource" | "server" => data_source = Some(value),
                "user id" | "userid" | "uid" | "user" => user_id = Some(value),
                "password" | "pwd" => password = Some(value),
                _ => {
                    options.insert(name, value);
                }
            }
        }

        let data_source = data_source
            .filter(|ds| !ds.is_empty())
            .ok_or_else(|| DiError::InvalidConnectionString("missing Data Source".to_string()))?;

        Ok(Self {
            data_source,
            user_id,
            password,
            options,
        })
    }
}

impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("data_source", &self.data_source)
            .field("user_id", &self.user_id)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("options", &self.options)
            .finish()
    }
}

/// Produces connections for one connection string.
pub trait DbConnectionFactory: Send + Sync {
    /// The connection string this factory was bound to.
    fn connection_string(&self) -> &str;

    /// Parsed settings for a new connection.
    fn connection_settings(&self) -> DiResult<ConnectionInfo>;
}

/// Oracle [`DbConnectionFactory`]; the string is validated lazily.
#[derive(Clone)]
pub struct OracleDbConnectionFactory {
    connection_string: String,
}

impl OracleDbConnectionFactory {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }
}

impl DbConnectionFactory for OracleDbConnectionFactory {
    fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn connection_settings(&self) -> DiResult<ConnectionInfo> {
        ConnectionInfo::parse(&self.connection_string)
    }
}

impl fmt::Debug for OracleDbConnectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleDbConnectionFactory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_and_extra_options() {
        let info = ConnectionInfo::parse(" server = db01 ; UID=app ; pwd=x ; Pooling=false ;;").unwrap();
        assert_eq!(info.data_source, "db01");
        assert_eq!(info.user_id.as_deref(), Some("app"));
        assert_eq!(info.password.as_deref(), Some("x"));
        assert_eq!(info.options.get("pooling").map(String::as_str), Some("false"));
    }

    #[test]
    fn rejects_segment_without_equals() {
        let err = ConnectionInfo::parse("Data Source=db;garbage").unwrap_err();
        assert_eq!(
            err,
            DiError::InvalidConnectionString("segment 1 is not a key=value pair".into())
        );
    }

    #[test]
    fn rejects_missing_data_source() {
        assert!(matches!(
            ConnectionInfo::parse("User Id=scott"),
            Err(DiError::InvalidConnectionString(_))
        ));
        assert!(ConnectionInfo::parse("Data Source=").is_err());
        assert!(ConnectionInfo::parse("=db").is_err());
    }

    #[test]
    fn factory_keeps_string_and_hides_it_from_debug() {
        let factory = OracleDbConnectionFactory::new("Data Source=db;Password=secret");
        assert_eq!(factory.connection_string(), "Data Source=db;Password=secret");
        assert!(!format!("{factory:?}").contains("secret"));
        assert_eq!(factory.connection_settings().unwrap().data_source, "db");
    }
}
