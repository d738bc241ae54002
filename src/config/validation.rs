//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port non-zero, base path shape)
//! - Detect conflicting proxy prefixes
//! - Check proxy targets are plain HTTP origins
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BuildConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use crate::config::schema::BuildConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base path {0:?} must start and end with '/'")]
    InvalidBase(String),

    #[error("dev server port must be non-zero")]
    InvalidPort,

    #[error("proxy prefix {0:?} must start with '/'")]
    InvalidPrefix(String),

    #[error("proxy prefixes {first:?} and {second:?} overlap")]
    DuplicatePrefix { first: String, second: String },

    #[error("proxy target {target:?} for {prefix:?} is not an http origin: {reason}")]
    InvalidTarget {
        prefix: String,
        target: String,
        reason: String,
    },

    #[error("build output directory must not be empty")]
    EmptyOutDir,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &BuildConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.base.starts_with('/') || !config.base.ends_with('/') {
        errors.push(ValidationError::InvalidBase(config.base.clone()));
    }

    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if config.build.out_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyOutDir);
    }

    let mut seen: HashMap<String, &str> = HashMap::new();
    for (prefix, rule) in &config.server.proxy {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
            continue;
        }

        let normalized = normalize_prefix(prefix);
        if let Some(first) = seen.insert(normalized.to_string(), prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                first: first.to_string(),
                second: prefix.clone(),
            });
        }

        if let Err(reason) = check_origin(&rule.target) {
            errors.push(ValidationError::InvalidTarget {
                prefix: prefix.clone(),
                target: rule.target.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Strip trailing slashes so `/s` and `/s/` compare equal. The root prefix stays `/`.
pub fn normalize_prefix(prefix: &str) -> &str {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn check_origin(target: &str) -> Result<(), String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;

    if url.scheme() != "http" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("target must not carry a path, query or fragment".to_string());
    }
    Ok(())
}
