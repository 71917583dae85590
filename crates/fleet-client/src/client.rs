//! Gateway client plumbing.
//!
//! The only component allowed to reach the gateway. One `Client` carries one
//! immutable credential; login/logout builds a new client rather than
//! mutating shared state.

use serde_json::Value;

use crate::error::{ClientError, Result};
use fleet_core::credential::Credential;

#[derive(Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
    credential: Credential,
}

impl Client {
    /// `base_url` is the gateway origin, e.g. `http://localhost:3141`.
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            credential,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn org_slug(&self) -> &str {
        &self.credential.org_slug
    }

    // -- request plumbing ---------------------------------------------------

    pub(crate) async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request_json(reqwest::Method::GET, path, query, None)
            .await
    }

    pub(crate) async fn post_json(&self, path: &str, body: Value) -> Result<Value> {
        self.request_json(reqwest::Method::POST, path, &[], Some(body))
            .await
    }

    pub(crate) async fn delete_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request_json(reqwest::Method::DELETE, path, query, None)
            .await
    }

    async fn request_json(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}/proxy/{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(
                reqwest::header::AUTHORIZATION,
                self.credential.authorization_value(),
            );
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(ref b) = body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "gateway request failed");
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if (200..300).contains(&status) {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::Transport(format!("invalid JSON from gateway: {e}")));
        }

        let err = error_from_response(status, &bytes, path);
        tracing::warn!(%method, path, status, error = %err, "gateway request rejected");
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error_from_response(status: u16, body: &[u8], path: &str) -> ClientError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        401 => ClientError::Unauthenticated,
        404 => ClientError::NotFound(if message == format!("HTTP {status}") {
            path.to_string()
        } else {
            message
        }),
        _ => ClientError::Api { status, message },
    }
}

/// Normalize a list payload: accept either a bare array or an object wrapping
/// the array under `key` — upstream list endpoints drift between the two.
pub(crate) fn items(value: Value, key: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_accepts_bare_array() {
        let got = items(json!([{ "id": "a" }]), "apps");
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn items_unwraps_keyed_object() {
        let got = items(json!({ "apps": [{ "id": "a" }, { "id": "b" }] }), "apps");
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn items_degrades_to_empty_on_shape_mismatch() {
        assert!(items(json!({ "machines": [] }), "apps").is_empty());
        assert!(items(json!("nope"), "apps").is_empty());
        assert!(items(Value::Null, "apps").is_empty());
    }

    #[test]
    fn error_from_response_classifies_statuses() {
        assert!(matches!(
            error_from_response(401, b"{}", "apps"),
            ClientError::Unauthenticated
        ));
        assert!(matches!(
            error_from_response(404, br#"{"error":"App not found"}"#, "apps/x"),
            ClientError::NotFound(m) if m == "App not found"
        ));
        match error_from_response(500, br#"{"error":"boom"}"#, "apps") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
