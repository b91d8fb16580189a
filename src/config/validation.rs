//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (TTL, timeouts, page size > 0)
//! - Check the host URL and bind address parse
//! - Check accepted query values are whitelisted parameters' values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FeedServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::FeedServiceConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid upstream api_host '{0}'")]
    ApiHost(String),

    #[error("{0} must not be empty")]
    EmptyList(&'static str),

    #[error("required query parameter '{0}' is missing from supported_params")]
    MissingParam(&'static str),
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &FeedServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.cache.ttl_minutes == 0 {
        errors.push(ValidationError::Zero { field: "cache.ttl_minutes" });
    }
    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.upstream_ms" });
    }
    if config.timeouts.deadline_ms == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.deadline_ms" });
    }
    if config.upstream.page_size == 0 {
        errors.push(ValidationError::Zero { field: "upstream.page_size" });
    }

    match url::Url::parse(&config.upstream.api_host) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::ApiHost(config.upstream.api_host.clone())),
    }

    if config.query.valid_types.is_empty() {
        errors.push(ValidationError::EmptyList("query.valid_types"));
    }
    if config.query.valid_lists.is_empty() {
        errors.push(ValidationError::EmptyList("query.valid_lists"));
    }
    for required in ["type", "list"] {
        if !config.query.supported_params.iter().any(|p| p == required) {
            errors.push(ValidationError::MissingParam(required));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FeedServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FeedServiceConfig::default();
        config.cache.ttl_minutes = 0;
        config.timeouts.deadline_ms = 0;
        config.upstream.api_host = "not a url".to_string();
        config.query.valid_lists.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "cache.ttl_minutes" }));
        assert!(errors.contains(&ValidationError::EmptyList("query.valid_lists")));
    }

    #[test]
    fn test_rejects_non_http_host() {
        let mut config = FeedServiceConfig::default();
        config.upstream.api_host = "ftp://api.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ApiHost("ftp://api.example.com".to_string())]
        );
    }

    #[test]
    fn test_requires_type_and_list_params() {
        let mut config = FeedServiceConfig::default();
        config.query.supported_params.retain(|p| p != "list");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingParam("list")]);
    }
}
