//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check static header names and values are legal HTTP
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{PatchConfig, PolicyConfig, StaticValue};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("unknown log level {0:?}")]
    LogLevel(String),

    #[error("empty header name in policy.{0}")]
    EmptyName(&'static str),

    #[error("invalid static header name {0:?}")]
    StaticName(String),

    #[error("invalid static value for header {0:?}")]
    StaticValue(String),

    #[error("static header {0:?} has an empty value list")]
    EmptyStaticValue(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    validate_policy(&config.policy, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_policy(policy: &PolicyConfig, errors: &mut Vec<ValidationError>) {
    for (field, names) in [("allow", &policy.allow), ("remove", &policy.remove)] {
        if names.iter().flatten().any(|name| name.trim().is_empty()) {
            errors.push(ValidationError::EmptyName(field));
        }
    }

    for (name, value) in policy.static_headers.iter().flatten() {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::StaticName(name.clone()));
        }
        if matches!(value, Some(StaticValue::Many(values)) if values.is_empty()) {
            errors.push(ValidationError::EmptyStaticValue(name.clone()));
        }
        if value
            .iter()
            .flat_map(|v| v.iter())
            .any(|v| HeaderValue::from_str(v).is_err())
        {
            errors.push(ValidationError::StaticValue(name.clone()));
        }
    }
}
