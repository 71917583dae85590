//! Volume operations.

use serde_json::{json, Value};

use crate::client::{items, Client};
use crate::error::{ClientError, Result};
use fleet_core::resource::Volume;

impl Client {
    pub async fn list_volumes(&self, app: &str) -> Result<Vec<Volume>> {
        let value = self.get_json(&format!("apps/{app}/volumes"), &[]).await?;
        Ok(items(value, "volumes")
            .iter()
            .map(Volume::from_value)
            .collect())
    }

    pub async fn get_volume(&self, app: &str, id: &str) -> Result<Volume> {
        let value = self
            .get_json(&format!("apps/{app}/volumes/{id}"), &[])
            .await?;
        Ok(Volume::from_value(&value))
    }

    pub async fn create_volume(
        &self,
        app: &str,
        name: &str,
        region: &str,
        size_gb: u64,
    ) -> Result<Volume> {
        if name.trim().is_empty() {
            return Err(ClientError::InvalidRequest("volume name is required".into()));
        }
        if size_gb == 0 {
            return Err(ClientError::InvalidRequest(
                "volume size must be at least 1 GB".into(),
            ));
        }
        let body: Value = json!({ "name": name, "region": region, "size_gb": size_gb });
        let value = self.post_json(&format!("apps/{app}/volumes"), body).await?;
        Ok(Volume::from_value(&value))
    }

    pub async fn delete_volume(&self, app: &str, id: &str) -> Result<()> {
        self.delete_json(&format!("apps/{app}/volumes/{id}"), &[])
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
