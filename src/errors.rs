use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Pokedex query core
#[derive(Debug, Error)]
pub enum PokedexError {
    /// The caller sent a malformed query
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    /// The record collection could not be read
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Generation table or service configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PokedexError {
    /// True when the failure was caused by the caller's input rather than by
    /// the service. Unmatched filters never get here; they return empty pages.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PokedexError::Query(_))
    }
}

/// Errors raised while validating a filter request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Pagination input was missing a valid positive integer
    #[error("Invalid query parameter '{name}' = '{value}': {reason}")]
    InvalidQueryParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl QueryError {
    pub fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        QueryError::InvalidQueryParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Errors raised by a record store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed record data in {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Duplicate Pokemon ID {0} in collection")]
    DuplicateId(u32),
    #[error("Record collection unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading or extending the generation table
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Generation {generation} has an inverted range {start_id}-{end_id}")]
    InvalidRange {
        generation: u32,
        start_id: u32,
        end_id: u32,
    },
    #[error("Generation {0} is defined more than once")]
    DuplicateGeneration(u32),
    #[error("Generation {first} and generation {second} have overlapping ID ranges")]
    OverlappingRanges { first: u32, second: u32 },
    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed generation table in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Type alias for Results using PokedexError
pub type PokedexResult<T> = Result<T, PokedexError>;

/// Type alias for Results using QueryError
pub type QueryParamResult<T> = Result<T, QueryError>;

/// Type alias for Results using StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_are_client_errors() {
        let err: PokedexError = QueryError::invalid("page", 0, "must be at least 1").into();
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Query error: Invalid query parameter 'page' = '0': must be at least 1"
        );
    }

    #[test]
    fn storage_errors_are_not_client_errors() {
        let err: PokedexError = StorageError::Unavailable("offline".to_string()).into();
        assert!(!err.is_client_error());
    }
}
