//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::Config;

/// Application state managed by the router.
///
/// Cheap to clone; the configuration is shared behind an `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
