use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fleet_core::FleetError;

// ---------------------------------------------------------------------------
// Internal sentinels for explicit statuses
// ---------------------------------------------------------------------------

/// Private sentinel carrying an explicit HTTP 400 through the
/// `anyhow::Error` chain without touching the `FleetError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Private sentinel carrying an explicit HTTP 502.
#[derive(Debug)]
struct BadGatewayError(String);

impl std::fmt::Display for BadGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadGatewayError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 502 Bad Gateway error.
    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self(BadGatewayError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
        if let Some(g) = self.0.downcast_ref::<BadGatewayError>() {
            let body = serde_json::json!({ "error": g.0.clone() });
            return (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<FleetError>() {
            match e {
                FleetError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                FleetError::UnrecognizedToken | FleetError::NotLoggedIn => {
                    StatusCode::UNAUTHORIZED
                }
                FleetError::Upstream { status, .. } => StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                FleetError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
                FleetError::Store(_)
                | FleetError::Io(_)
                | FleetError::Yaml(_)
                | FleetError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("invalid path");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bad_gateway_constructor_maps_to_502() {
        let err = AppError::bad_gateway("feed unavailable");
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_path_maps_to_400() {
        let err = AppError(FleetError::InvalidPath("a//b".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_logged_in_maps_to_401() {
        let err = AppError(FleetError::NotLoggedIn.into());
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn upstream_error_preserves_status() {
        let err = AppError(
            FleetError::Upstream {
                status: 422,
                message: "unprocessable".into(),
            }
            .into(),
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn transport_error_maps_to_500() {
        let err = AppError(FleetError::Transport("connection refused".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn other_errors_map_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_is_json_error_envelope() {
        let err = AppError::bad_request("nope");
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
