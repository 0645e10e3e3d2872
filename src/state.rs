use std::sync::Arc;

use crate::application::order_service::OrderService;
use crate::config::TrackingConfig;
use crate::domain::ports::OrderGateway;
use crate::domain::tracking::ZoneDirectory;

pub type SharedGateway = Arc<dyn OrderGateway>;

/// Shared state handed to every request handler.
pub struct AppState {
    pub orders: OrderService<SharedGateway>,
    pub zones: ZoneDirectory,
    pub tracking: TrackingConfig,
}

impl AppState {
    pub fn new(gateway: SharedGateway, tracking: TrackingConfig) -> Self {
        Self {
            orders: OrderService::new(gateway),
            zones: ZoneDirectory::iligan(),
            tracking,
        }
    }
}
