//! Shared application state.

use std::sync::Arc;

use snag_config::SnagConfig;
use snag_db::service::SnagService;

/// Cloned into every handler. Both fields are `Arc`s, so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SnagService>,
    pub config: Arc<SnagConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(service: SnagService, config: SnagConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}
