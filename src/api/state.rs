//! Application state for the API server

use crate::{Config, VideoFetcher};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the fetcher instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main VideoFetcher instance
    pub fetcher: Arc<VideoFetcher>,

    /// Configuration (for read access)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(fetcher: Arc<VideoFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }
}
