//! Fire-and-forget reachability probe.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CheckSiteQuery {
    pub url: String,
}

/// GET /check-site?url=... — probe a URL for reachability.
///
/// Always answers 200 with `{isAccessible, status?, url}`; a connection
/// failure yields `{isAccessible: false, error, url}` rather than an error
/// status. Only a missing or non-HTTP url is a caller error.
pub async fn check_site(
    State(app): State<AppState>,
    Query(q): Query<CheckSiteQuery>,
) -> Result<Json<Value>, AppError> {
    if !q.url.starts_with("http://") && !q.url.starts_with("https://") {
        return Err(AppError::bad_request(format!(
            "url must be http(s): {}",
            q.url
        )));
    }

    match app.http_client.get(&q.url).send().await {
        Ok(resp) => Ok(Json(json!({
            "isAccessible": resp.status().is_success(),
            "status": resp.status().as_u16(),
            "url": q.url,
        }))),
        Err(e) => {
            tracing::debug!(url = %q.url, error = %e, "site probe failed");
            Ok(Json(json!({
                "isAccessible": false,
                "error": e.to_string(),
                "url": q.url,
            })))
        }
    }
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

    async fn probe(url: &str) -> (StatusCode, serde_json::Value) {
        let router = crate::build_router(&ConsoleConfig::default());
        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/check-site?url={url}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn reachable_site_is_accessible() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .create_async()
            .await;

        let (status, json) = probe(&server.url()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isAccessible"], true);
        assert_eq!(json["status"], 200);
    }

    #[tokio::test]
    async fn upstream_5xx_is_not_accessible_but_still_200() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let (status, json) = probe(&server.url()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isAccessible"], false);
        assert_eq!(json["status"], 500);
    }

    #[tokio::test]
    async fn connection_failure_never_throws() {
        let (status, json) = probe("http://127.0.0.1:1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isAccessible"], false);
        assert!(json["error"].as_str().is_some());
        assert_eq!(json["url"], "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn non_http_url_is_bad_request() {
        let (status, json) = probe("ftp://example.com").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("http"));
    }

    #[tokio::test]
    async fn missing_url_param_is_bad_request() {
        let router = crate::build_router(&ConsoleConfig::default());
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/check-site")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
