use burrow_core::{Resolver, Shortener};
use burrow_service::UrlFormatter;
use std::sync::Arc;

/// Shared handler state: the two services and the URL formatter.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub resolver: Arc<dyn Resolver>,
    pub formatter: Arc<UrlFormatter>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        resolver: Arc<dyn Resolver>,
        formatter: UrlFormatter,
    ) -> Self {
        Self {
            shortener,
            resolver,
            formatter: Arc::new(formatter),
        }
    }
}
