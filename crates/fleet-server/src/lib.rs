pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use fleet_core::config::ConsoleConfig;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all gateway routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(config: &ConsoleConfig) -> Router {
    let app_state = state::AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/proxy/{*path}",
            get(routes::proxy::proxy_get)
                .post(routes::proxy::proxy_post)
                .delete(routes::proxy::proxy_delete),
        )
        .route("/check-site", get(routes::check_site::check_site))
        .route("/status", get(routes::status::get_status))
        .layer(cors)
        .with_state(app_state)
}

/// Start the console gateway on `config.listen_port` (or `port` override).
pub async fn serve(config: &ConsoleConfig, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.listen_port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(config, listener).await
}

/// Start the console gateway on a pre-bound listener.
///
/// Accepts a `TcpListener` that was already bound so the caller can read the
/// actual port before starting (useful when `port = 0` and the OS picks one).
pub async fn serve_on(
    config: &ConsoleConfig,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(config);

    tracing::info!(
        upstream = %config.upstream_base_url,
        "console gateway listening on http://localhost:{actual_port}"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
