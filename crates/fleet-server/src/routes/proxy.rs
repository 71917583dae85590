//! Forwarding handlers for `/proxy/{*path}`.
//!
//! Single point of egress from the browser's origin to the upstream compute
//! API: requires an `Authorization` header, normalizes the bearer credential,
//! forwards method/query/body verbatim, and translates upstream failures into
//! a uniform `{error, details?}` envelope with the upstream status preserved.

use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::state::AppState;
use fleet_core::credential::normalize_bearer;

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// GET /proxy/{*path} — forward a read to the upstream API.
pub async fn proxy_get(
    State(app): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    forward(&app, reqwest::Method::GET, &path, query.as_deref(), &headers, None).await
}

/// POST /proxy/{*path} — forward a mutation with a JSON body.
///
/// A missing or non-JSON body is tolerated as `{}` rather than failing.
pub async fn proxy_post(
    State(app): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
    };
    forward(
        &app,
        reqwest::Method::POST,
        &path,
        query.as_deref(),
        &headers,
        Some(body),
    )
    .await
}

/// DELETE /proxy/{*path} — forward a deletion.
pub async fn proxy_delete(
    State(app): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    forward(
        &app,
        reqwest::Method::DELETE,
        &path,
        query.as_deref(),
        &headers,
        None,
    )
    .await
}

// ---------------------------------------------------------------------------
// Forwarding
// ---------------------------------------------------------------------------

async fn forward(
    app: &AppState,
    method: reqwest::Method,
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Option<Value>,
) -> Response {
    // Authentication gate: fail fast, never contact upstream without a token.
    let Some(raw_token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    else {
        return json_response(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "authentication required" }),
        );
    };

    if !is_valid_path(path) {
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({ "error": format!("invalid path: {path}") }),
        );
    }

    let mut url = format!("{}/{}", app.upstream_base, path);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(q);
    }

    let mut request = app
        .http_client
        .request(method.clone(), &url)
        .header(reqwest::header::AUTHORIZATION, normalize_bearer(raw_token));
    if let Some(ref b) = body {
        request = request.json(b);
    }

    let upstream = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(%method, path, error = %e, "upstream request failed");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "upstream request failed" }),
            );
        }
    };

    let status = upstream.status().as_u16();
    tracing::info!(%method, path, query = query.unwrap_or(""), status, "proxied");

    let bytes = upstream.bytes().await.unwrap_or_default();
    if (200..300).contains(&status) {
        return (
            StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            Body::from(bytes),
        )
            .into_response();
    }

    error_envelope(status, &bytes)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wrap a structured upstream error body, preserving the upstream status and
/// surfacing a top-level message.
fn error_envelope(status: u16, body: &[u8]) -> Response {
    let status_code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    let fallback = status_code
        .canonical_reason()
        .unwrap_or("upstream error")
        .to_string();

    match serde_json::from_slice::<Value>(body) {
        Ok(details) => {
            let message = details
                .get("error")
                .or_else(|| details.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(fallback);
            json_response(status_code, json!({ "error": message, "details": details }))
        }
        Err(_) => json_response(status_code, json!({ "error": fallback })),
    }
}

/// Reject empty segments and parent-directory traversal before forwarding.
fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('/').all(|segment| !segment.is_empty() && segment != "..")
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, axum::Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
