//! Configuration management for the PDF Logo Replacer

use std::env;

use thiserror::Error;

use crate::compositor::{ParsePolicyError, PlacementPolicy};
use crate::pdf::{ParseStrategyError, ReplacementStrategy};

/// Default multipart body limit (100 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub compositor: CompositorConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Defaults applied when a request does not override them
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorConfig {
    pub policy: PlacementPolicy,
    pub strategy: ReplacementStrategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
}

/// Environment variable holds a value that cannot be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{0}'")]
    InvalidPort(String),

    #[error("Invalid MAX_UPLOAD_BYTES '{0}'")]
    InvalidUploadLimit(String),

    #[error(transparent)]
    Policy(#[from] ParsePolicyError),

    #[error(transparent)]
    Strategy(#[from] ParseStrategyError),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            compositor: CompositorConfig {
                policy: PlacementPolicy::default(),
                strategy: ReplacementStrategy::default(),
            },
            limits: LimitsConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys take their defaults; a key
    /// with an unusable value is logged and falls back to its own default
    /// without affecting the others.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = parse_var(&lookup, "PORT", defaults.server.port, |raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
        });
        let max_upload_bytes = parse_var(
            &lookup,
            "MAX_UPLOAD_BYTES",
            defaults.limits.max_upload_bytes,
            |raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidUploadLimit(raw.to_string()))
            },
        );
        let policy = parse_var(&lookup, "PLACEMENT_POLICY", defaults.compositor.policy, |raw| {
            Ok(raw.parse()?)
        });
        let strategy = parse_var(
            &lookup,
            "REPLACEMENT_STRATEGY",
            defaults.compositor.strategy,
            |raw| Ok(raw.parse()?),
        );

        Config {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.server.host),
                port,
            },
            compositor: CompositorConfig { policy, strategy },
            limits: LimitsConfig { max_upload_bytes },
        }
    }
}

fn parse_var<F, T, P>(lookup: &F, key: &str, default: T, parse: P) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::fmt::Display,
    P: FnOnce(&str) -> Result<T, ConfigError>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|e| {
        tracing::warn!("{}, using default {} for {}", e, default, key);
        default
    })
}
