// ABOUTME: Unified error handling for the coaching agent
// ABOUTME: Defines error codes, the AppError type, and failure-class labels for user-facing reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Centralized error handling for the coaching agent. Every fallible
//! operation returns [`AppError`], which carries a stable [`ErrorCode`]
//! so callers can branch on the error family without parsing message
//! strings. The controller uses [`ErrorCode::failure_class`] to produce
//! user-visible failure labels that never expose raw provider output.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller-supplied value is invalid (negative weight, zero age, ...)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Structured data does not match the required shape
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // External services (5000-5999)
    /// Planning engine returned an error response
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Planning engine could not be reached at all
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Planning engine rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Planning engine rate limit exceeded
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Configuration value is present but invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration value is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// A storage query or update failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// The storage connection could not be established
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Data serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage connection failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Stable failure-class label for user-visible reports
    ///
    /// The adaptive controller embeds this label in progress reports
    /// (e.g. `"FATAL ERROR: Planning failed due to: rate limiting."`).
    /// Raw provider error text never reaches end users.
    #[must_use]
    pub const fn failure_class(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid input",
            Self::InvalidFormat | Self::SerializationError => "malformed output",
            Self::ExternalAuthFailed => "authentication",
            Self::ExternalRateLimited => "rate limiting",
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => "network",
            Self::ConfigError | Self::ConfigMissing => "configuration",
            Self::DatabaseError | Self::StorageError => "storage",
            Self::InternalError => "internal error",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code identifying the failure family
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid data format
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// External service authentication failure
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Missing required configuration
    pub fn config_missing(variable: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{} is not set", variable.into()),
        )
    }

    /// Database query failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Storage connection failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Conversion from `sqlx` errors, distinguishing connection-level failures
/// from query failures so callers can treat them differently.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let message = error.to_string();
        let is_connection_failure = matches!(
            &error,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        );
        if is_connection_failure {
            Self::storage(message).with_source(error)
        } else {
            Self::database(message).with_source(error)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
