//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::service::ReplaceOptions;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Policy and strategy used when a request does not pick its own
    pub fn default_options(&self) -> ReplaceOptions {
        ReplaceOptions {
            policy: self.inner.config.compositor.policy,
            strategy: self.inner.config.compositor.strategy,
        }
    }
}
