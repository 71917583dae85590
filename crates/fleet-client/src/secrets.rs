//! Secret operations — metadata only, values are write-only.

use serde_json::json;

use crate::client::{items, Client};
use crate::error::{ClientError, Result};
use fleet_core::resource::Secret;

impl Client {
    pub async fn list_secrets(&self, app: &str) -> Result<Vec<Secret>> {
        let value = self.get_json(&format!("apps/{app}/secrets"), &[]).await?;
        Ok(items(value, "secrets")
            .iter()
            .map(Secret::from_value)
            .collect())
    }

    pub async fn set_secret(&self, app: &str, name: &str, value: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ClientError::InvalidRequest("secret name is required".into()));
        }
        self.post_json(
            &format!("apps/{app}/secrets"),
            json!({ "name": name, "value": value }),
        )
        .await?;
        Ok(())
    }

    pub async fn unset_secret(&self, app: &str, name: &str) -> Result<()> {
        self.delete_json(&format!("apps/{app}/secrets/{name}"), &[])
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
