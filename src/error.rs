//! Error types for the container and the Oracle registration module.

use thiserror::Error;

/// Dependency injection errors
///
/// Represents the error conditions that can occur while constructing a
/// registration module, resolving services from the container, or using the
/// collaborators those services are built from.
///
/// # Examples
///
/// ```rust
/// use servfor_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use servfor_di::{DiError, ServForOracleModule};
///
/// let err = ServForOracleModule::from_connection_string("   ").unwrap_err();
/// assert!(matches!(err, DiError::InvalidArgument("connection_string")));
/// assert_eq!(err.to_string(), "Invalid argument: connection_string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Service not registered
    #[error("Service not found: {0}")]
    NotFound(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Invalid lifetime resolution (e.g., scoped from root)
    #[error("Lifetime error: {0}")]
    WrongLifetime(&'static str),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A required argument was empty or blank; carries the parameter name
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A connection string could not be parsed into connection settings
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use servfor_di::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::NotFound("some_service"))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
