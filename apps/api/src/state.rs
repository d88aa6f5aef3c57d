use crate::config::Config;
use crate::layout::PageConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    /// Page geometry and type size for the fixed-page backend.
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let page_config = config.page_config();
        Self {
            config,
            page_config,
        }
    }
}
