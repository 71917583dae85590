//! Background status polling.
//!
//! A single owned tokio task fetches the gateway's `/status` endpoint on a
//! fixed cadence and publishes the latest classified, dismissal-filtered
//! snapshot. The loop is fetch-then-sleep, so ticks can never overlap: a slow
//! fetch simply delays the next one. Shutdown goes through a watch channel
//! observed inside the loop; dropping the poller aborts the task outright.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use fleet_core::status::{filter_dismissed, Incident};
use fleet_core::store::ConsoleStore;

/// Default polling cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// StatusPoller
// ---------------------------------------------------------------------------

pub struct StatusPoller {
    snapshot: Arc<RwLock<Vec<Incident>>>,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Start polling `{gateway_base}/status` at the default cadence.
    pub fn spawn(gateway_base: &str, store: Arc<ConsoleStore>) -> Self {
        Self::spawn_with_interval(gateway_base, store, POLL_INTERVAL)
    }

    pub fn spawn_with_interval(
        gateway_base: &str,
        store: Arc<ConsoleStore>,
        interval: Duration,
    ) -> Self {
        let url = format!("{}/status", gateway_base.trim_end_matches('/'));
        let snapshot = Arc::new(RwLock::new(Vec::new()));
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task_snapshot = Arc::clone(&snapshot);
        let handle = tokio::spawn(async move {
            let http = reqwest::Client::new();
            loop {
                match fetch_status(&http, &url).await {
                    Ok(entries) => {
                        let dismissed = store.dismissed().unwrap_or_default();
                        let kept = filter_dismissed(entries, &dismissed);
                        if let Ok(mut slot) = task_snapshot.write() {
                            *slot = kept;
                        }
                    }
                    // Keep the previous snapshot on failure; the next tick
                    // will try again.
                    Err(e) => tracing::warn!(error = %e, "status poll failed"),
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            return;
                        }
                    }
                }
            }
        });

        Self {
            snapshot,
            stop_tx,
            handle: Some(handle),
        }
    }

    /// The latest dismissal-filtered snapshot. Empty until the first
    /// successful fetch.
    pub fn incidents(&self) -> Vec<Incident> {
        self.snapshot.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Active incidents only.
    pub fn active_incidents(&self) -> Vec<Incident> {
        self.incidents()
            .into_iter()
            .filter(|i| i.is_incident)
            .collect()
    }

    /// Stop polling and wait for the task to wind down.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// Response shape of the gateway's `/status` endpoint.
#[derive(serde::Deserialize)]
struct StatusEnvelope {
    entries: Vec<Incident>,
}

async fn fetch_status(http: &reqwest::Client, url: &str) -> reqwest::Result<Vec<Incident>> {
    Ok(http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<StatusEnvelope>()
        .await?
        .entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
