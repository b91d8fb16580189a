//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::FeedServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value '{}' for environment variable {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration for startup.
///
/// Reads the TOML file when one is given (defaults otherwise), layers the
/// deployment environment variables on top, then validates the result.
pub fn load(path: Option<&Path>) -> Result<FeedServiceConfig, ConfigError> {
    load_with_env(path, |name| std::env::var(name).ok())
}

fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<FeedServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => FeedServiceConfig::default(),
    };
    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<FeedServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply the environment variables the service has always been deployed with.
///
/// `REQUEST_TIMEOUT` and `API_TIMEOUT` are in seconds, `CACHE_TIME` in minutes.
pub fn apply_env_overrides<F>(config: &mut FeedServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parsed::<u16>(&lookup, "PORT")? {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }
    if let Some(minutes) = parsed::<u64>(&lookup, "CACHE_TIME")? {
        config.cache.ttl_minutes = minutes;
    }
    if let Some(secs) = parsed::<u64>(&lookup, "REQUEST_TIMEOUT")? {
        config.timeouts.deadline_ms = secs.saturating_mul(1000);
    }
    if let Some(secs) = parsed::<u64>(&lookup, "API_TIMEOUT")? {
        config.timeouts.upstream_ms = secs.saturating_mul(1000);
    }
    if let Some(size) = parsed::<u32>(&lookup, "PAGE_SIZE")? {
        config.upstream.page_size = size;
    }
    if let Some(len) = parsed::<usize>(&lookup, "DESC_TRUNC_LENGTH")? {
        config.feed.description_max_chars = len;
    }

    if let Some(host) = lookup("API_HOST") {
        config.upstream.api_host = host;
    }
    if let Some(title) = lookup("FEED_TITLE") {
        config.feed.title = title;
    }
    if let Some(desc) = lookup("FEED_DESC") {
        config.feed.description = desc;
    }
    if let Some(url) = lookup("FEED_URL") {
        config.feed.feed_url = url;
    }
    if let Some(url) = lookup("FEED_SITE_URL") {
        config.feed.site_url = url;
    }

    Ok(())
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}
