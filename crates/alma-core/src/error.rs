//! Error types for the alma client.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, parse and protocol status failures.

use thiserror::Error;

/// The unified error type for alma operations.
///
/// None of these are retried by the client; every failure propagates to
/// the caller as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid client configuration (base URL, batch size).
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Network transport errors, including non-success HTTP status codes.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body was not a well-formed document.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The response parsed but its status element was not `ok`.
    #[error("communication error: {0}")]
    Communication(#[from] CommunicationError),
}

impl Error {
    /// Returns the protocol error key if this is a communication error.
    pub fn communication_key(&self) -> Option<&str> {
        match self {
            Error::Communication(err) => Some(err.key()),
            _ => None,
        }
    }
}

/// Configuration errors raised while building a client.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    /// The detail batch size must be at least one.
    #[error("invalid batch size {0}: must be at least 1")]
    InvalidBatchSize(usize),

    /// An environment variable held a value that could not be interpreted.
    #[error("invalid value '{value}' for {name}")]
    InvalidEnv { name: String, value: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status code.
    #[error("Request error: {code}{message}")]
    Status { code: u16, message: String },

    /// Any other HTTP client failure.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl TransportError {
    /// Returns the HTTP status code for [`TransportError::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// The body could not be parsed as a document.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A response whose status element reported something other than `ok`.
///
/// The key is protocol data and is kept verbatim, including when empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Status is not okay: {key}")]
pub struct CommunicationError {
    key: String,
}

impl CommunicationError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The error key reported by the webservice.
    pub fn key(&self) -> &str {
        &self.key
    }
}
