//! # Error Types Module
//!
//! This module defines the error types shared by the calculator services:
//! exchange-rate lookups, configuration loading and the deal assistant.
//! Numeric input never produces an error; it is coerced to zero upstream.

/// Errors raised while looking up an exchange rate
#[derive(Debug, Clone, PartialEq)]
pub enum RateError {
    /// Currency code is not three ASCII letters
    InvalidCurrency(String),
    /// Transport failure (connection, timeout, TLS)
    Network(String),
    /// The rate service answered with a non-success status
    Status(u16),
    /// The response body could not be decoded
    Parse(String),
    /// Neither the dated nor the latest query returned a rate
    NotFound(String),
}

impl std::fmt::Display for RateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateError::InvalidCurrency(code) => write!(f, "Invalid currency code: {code}"),
            RateError::Network(msg) => write!(f, "Network error: {msg}"),
            RateError::Status(code) => write!(f, "Rate service returned HTTP {code}"),
            RateError::Parse(msg) => write!(f, "Parse error: {msg}"),
            RateError::NotFound(code) => write!(f, "No rate published for {code}"),
        }
    }
}

impl std::error::Error for RateError {}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RateError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            RateError::Status(status.as_u16())
        } else {
            RateError::Network(err.to_string())
        }
    }
}

/// Errors raised while reading process configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    Missing(&'static str),
    /// A variable is present but cannot be used
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing configuration: {key} must be set"),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid configuration: {key}={value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by the deal assistant
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantError {
    /// No API key configured
    MissingApiKey,
    /// The request failed or the service rejected it
    Request(String),
    /// The service answered without any text
    EmptyResponse,
}

impl std::fmt::Display for AssistantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantError::MissingApiKey => write!(f, "Assistant API key is not configured"),
            AssistantError::Request(msg) => write!(f, "Assistant request failed: {msg}"),
            AssistantError::EmptyResponse => write!(f, "Assistant returned an empty response"),
        }
    }
}

impl std::error::Error for AssistantError {}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Request(err.to_string())
    }
}
