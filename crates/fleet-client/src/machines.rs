//! Machine operations.
//!
//! Mutating calls issue exactly one request and never retry; a 2xx from the
//! gateway is the only success condition. State transitions are requested,
//! not guaranteed — callers re-read authoritative state after mutation.

use serde_json::{json, Value};

use crate::client::{items, Client};
use crate::error::{ClientError, Result};
use fleet_core::resource::{Machine, MachineSignal};

impl Client {
    pub async fn list_machines(&self, app: &str) -> Result<Vec<Machine>> {
        let value = self.get_json(&format!("apps/{app}/machines"), &[]).await?;
        Ok(items(value, "machines")
            .iter()
            .map(Machine::from_value)
            .collect())
    }

    pub async fn get_machine(&self, app: &str, id: &str) -> Result<Machine> {
        let value = self
            .get_json(&format!("apps/{app}/machines/{id}"), &[])
            .await?;
        Ok(Machine::from_value(&value))
    }

    /// Create a machine from a raw config payload. Presence of `config` is
    /// the only client-side check.
    pub async fn create_machine(&self, app: &str, payload: Value) -> Result<Machine> {
        if payload.get("config").is_none() {
            return Err(ClientError::InvalidRequest(
                "machine payload requires a config".into(),
            ));
        }
        let value = self.post_json(&format!("apps/{app}/machines"), payload).await?;
        Ok(Machine::from_value(&value))
    }

    pub async fn start_machine(&self, app: &str, id: &str) -> Result<()> {
        self.machine_verb(app, id, "start").await
    }

    pub async fn stop_machine(&self, app: &str, id: &str) -> Result<()> {
        self.machine_verb(app, id, "stop").await
    }

    pub async fn restart_machine(&self, app: &str, id: &str) -> Result<()> {
        self.machine_verb(app, id, "restart").await
    }

    pub async fn suspend_machine(&self, app: &str, id: &str) -> Result<()> {
        self.machine_verb(app, id, "suspend").await
    }

    /// Send a signal. Advisory: success only confirms the call was accepted.
    pub async fn signal_machine(&self, app: &str, id: &str, signal: MachineSignal) -> Result<()> {
        self.post_json(
            &format!("apps/{app}/machines/{id}/signal"),
            json!({ "signal": signal.as_str() }),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_machine(&self, app: &str, id: &str, force: bool) -> Result<()> {
        let query: &[(&str, &str)] = if force { &[("force", "true")] } else { &[] };
        self.delete_json(&format!("apps/{app}/machines/{id}"), query)
            .await?;
        Ok(())
    }

    /// Machines across many apps for global search. A single app's failure
    /// degrades to an empty subset instead of aborting the aggregate.
    pub async fn list_machines_across(&self, apps: &[String]) -> Vec<(String, Machine)> {
        let mut all = Vec::new();
        for app in apps {
            match self.list_machines(app).await {
                Ok(machines) => {
                    all.extend(machines.into_iter().map(|m| (app.clone(), m)));
                }
                Err(e) => {
                    tracing::warn!(app, error = %e, "skipping app in machine aggregation");
                }
            }
        }
        all
    }

    async fn machine_verb(&self, app: &str, id: &str, verb: &str) -> Result<()> {
        self.post_json(&format!("apps/{app}/machines/{id}/{verb}"), json!({}))
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
