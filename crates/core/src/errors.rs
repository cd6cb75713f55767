//! Core error types for the cap table engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use rust_decimal::Decimal;
use std::num::ParseFloatError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the cap table engine.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cap table operation failed: {0}")]
    CapTable(#[from] CapTableError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Returns the cap table error kind, if this error carries one.
    pub fn as_cap_table(&self) -> Option<&CapTableError> {
        match self {
            Error::CapTable(err) => Some(err),
            _ => None,
        }
    }

    /// True when the error was reported but left the simulator untouched
    /// and usable, i.e. an undo with nothing to undo.
    pub fn is_recoverable(&self) -> bool {
        self.as_cap_table()
            .map(CapTableError::is_recoverable)
            .unwrap_or(false)
    }
}

/// Errors raised by the round-modeling and dilution engine.
///
/// Any of these aborts the in-progress mutation before the ledger, the
/// round sequence or the cap table are written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapTableError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid weight {weight} for holder '{holder}'")]
    InvalidWeight { holder: String, weight: Decimal },

    #[error("Invalid pool size {0}%: a pool must be below 100%")]
    InvalidPoolSize(Decimal),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Nothing to undo")]
    EmptyHistory,
}

impl CapTableError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CapTableError::EmptyHistory)
    }
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
