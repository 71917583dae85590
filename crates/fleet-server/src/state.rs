use std::sync::Arc;
use std::time::Instant;

use fleet_core::config::ConsoleConfig;
use fleet_core::status::Incident;
use tokio::sync::RwLock;

/// One fetched-and-classified snapshot of the status feed.
#[derive(Clone)]
pub struct StatusSnapshot {
    pub fetched_at: Instant,
    pub entries: Vec<Incident>,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    /// Upstream compute API base, no trailing slash.
    pub upstream_base: String,
    pub feed_url: String,
    pub status_cache: Arc<RwLock<Option<StatusSnapshot>>>,
}

impl AppState {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            upstream_base: config.upstream_base_url.trim_end_matches('/').to_string(),
            feed_url: config.status_feed_url.clone(),
            status_cache: Arc::new(RwLock::new(None)),
        }
    }
}
