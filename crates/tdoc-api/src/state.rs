//! Application state.

use std::sync::Arc;

use tdoc_bus::EventBus;
use tdoc_store::JobStore;

use crate::config::ApiConfig;

/// Shared application state.
///
/// Every dependency is constructed once at process start and injected;
/// handlers never reach for ambient state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn JobStore>,
    pub bus: EventBus,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig, store: Arc<dyn JobStore>, bus: EventBus) -> Self {
        Self { config, store, bus }
    }
}
