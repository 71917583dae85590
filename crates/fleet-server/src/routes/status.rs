//! Status-feed endpoint with a short-lived cache.

use std::time::{Duration, Instant};

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::{AppState, StatusSnapshot};
use fleet_core::status::{parse_feed, Incident};

/// How long one fetched feed snapshot is served before refetching.
const STATUS_CACHE_TTL: Duration = Duration::from_secs(60);

/// GET /status — classified status-feed entries, cached for 60 seconds.
///
/// A warm-but-stale cache is still served when a refresh fails; only a
/// cold-cache failure surfaces an error.
pub async fn get_status(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    {
        let cache = app.status_cache.read().await;
        if let Some(snapshot) = cache.as_ref() {
            if snapshot.fetched_at.elapsed() < STATUS_CACHE_TTL {
                return Ok(Json(json!({ "entries": snapshot.entries })));
            }
        }
    }

    match fetch_feed(&app).await {
        Ok(entries) => {
            let mut cache = app.status_cache.write().await;
            *cache = Some(StatusSnapshot {
                fetched_at: Instant::now(),
                entries: entries.clone(),
            });
            Ok(Json(json!({ "entries": entries })))
        }
        Err(e) => {
            tracing::warn!(error = %e, "status feed refresh failed");
            let cache = app.status_cache.read().await;
            match cache.as_ref() {
                Some(stale) => Ok(Json(json!({ "entries": stale.entries }))),
                None => Err(AppError::bad_gateway(format!("status feed unavailable: {e}"))),
            }
        }
    }
}

async fn fetch_feed(app: &AppState) -> anyhow::Result<Vec<Incident>> {
    let response = app
        .http_client
        .get(&app.feed_url)
        .send()
        .await?
        .error_for_status()?;
    let body = response.text().await?;
    Ok(parse_feed(&body))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fleet_core::config::ConsoleConfig;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const FEED: &str = r#"<feed>
  <entry>
    <id>inc-1</id>
    <title>Incident: API errors</title>
    <updated>2026-08-20T10:00:00Z</updated>
    <link href="https://status.example.com/1"/>
    <content>We are investigating.</content>
  </entry>
</feed>"#;

    fn feed_router(feed_url: &str) -> axum::Router {
        let config = ConsoleConfig {
            status_feed_url: feed_url.to_string(),
            ..Default::default()
        };
        crate::build_router(&config)
    }

    async fn get(router: &axum::Router) -> (StatusCode, serde_json::Value) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn returns_classified_entries() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/history.atom")
            .with_body(FEED)
            .create_async()
            .await;

        let router = feed_router(&format!("{}/history.atom", server.url()));
        let (status, json) = get(&router).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["entries"][0]["id"], "inc-1");
        assert_eq!(json["entries"][0]["isIncident"], true);
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let feed_mock = server
            .mock("GET", "/history.atom")
            .with_body(FEED)
            .expect(1)
            .create_async()
            .await;

        let router = feed_router(&format!("{}/history.atom", server.url()));
        let (first, _) = get(&router).await;
        let (second, json) = get(&router).await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(json["entries"].as_array().unwrap().len(), 1);
        feed_mock.assert_async().await;
    }

    #[tokio::test]
    async fn cold_cache_failure_is_bad_gateway() {
        let router = feed_router("http://127.0.0.1:1/history.atom");
        let (status, json) = get(&router).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"].as_str().unwrap().contains("status feed"));
    }

    #[tokio::test]
    async fn upstream_http_error_with_cold_cache_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/history.atom")
            .with_status(500)
            .create_async()
            .await;

        let router = feed_router(&format!("{}/history.atom", server.url()));
        let (status, _) = get(&router).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
