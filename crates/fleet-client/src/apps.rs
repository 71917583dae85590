//! App operations.

use serde_json::json;

use crate::client::{items, Client};
use crate::error::{ClientError, Result};
use fleet_core::resource::App;

impl Client {
    /// List apps for an organization. Every item has its display fields
    /// populated, defaulting to `"unknown"` where upstream data is missing.
    pub async fn list_apps(&self, org_slug: &str) -> Result<Vec<App>> {
        let value = self.get_json("apps", &[("org_slug", org_slug)]).await?;
        Ok(items(value, "apps").iter().map(App::from_value).collect())
    }

    pub async fn get_app(&self, name: &str) -> Result<App> {
        let value = self.get_json(&format!("apps/{name}"), &[]).await?;
        Ok(App::from_value(&value))
    }

    /// Create an app. Only field presence is validated client-side; business
    /// rules are the upstream's job.
    pub async fn create_app(&self, name: &str, org_slug: &str) -> Result<App> {
        if name.trim().is_empty() {
            return Err(ClientError::InvalidRequest("app name is required".into()));
        }
        let body = json!({ "app_name": name, "org_slug": org_slug });
        let value = self.post_json("apps", body).await?;
        // Some create endpoints answer with the resource, some with an empty
        // acknowledgement; normalize either into a usable App.
        if value.is_null() {
            Ok(App::from_value(&json!({ "name": name })))
        } else {
            Ok(App::from_value(&value))
        }
    }

    pub async fn delete_app(&self, name: &str) -> Result<()> {
        self.delete_json(&format!("apps/{name}"), &[]).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::credential::Credential;
    use fleet_core::resource::UNKNOWN;

    fn test_client(base: &str) -> Client {
        Client::new(base, Credential::new("fo1_test", Some("acme")).unwrap())
    }

    #[tokio::test]
    async fn list_apps_normalizes_items() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/proxy/apps")
            .match_query(mockito::Matcher::UrlEncoded(
                "org_slug".into(),
                "acme".into(),
            ))
            .with_body(r#"{"apps":[{"id":"a1","name":"demo","status":"deployed"},{"name":"bare"}]}"#)
            .create_async()
            .await;

        let apps = test_client(&server.url()).list_apps("acme").await.unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "demo");
        assert_eq!(apps[1].id, UNKNOWN);
        assert_eq!(apps[1].status, UNKNOWN);
    }

    #[tokio::test]
    async fn get_missing_app_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/proxy/apps/ghost")
            .with_status(404)
            .with_body(r#"{"error":"App not found"}"#)
            .create_async()
            .await;

        let err = test_client(&server.url()).get_app("ghost").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(err.upstream_status(), Some(404));
    }

    #[tokio::test]
    async fn create_app_requires_name() {
        let client = test_client("http://127.0.0.1:1");
        let err = client.create_app("  ", "acme").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn delete_app_succeeds_on_2xx() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/proxy/apps/demo")
            .with_status(202)
            .create_async()
            .await;

        test_client(&server.url()).delete_app("demo").await.unwrap();
    }
}
