pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{Result, config::Config, inference::WorkersAiClient};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, header},
    middleware,
    routing::{any, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;

pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", any(handlers::health))
        .route("/health", any(handlers::health))
        .route(
            "/chat",
            post(handlers::chat).fallback(handlers::method_not_allowed),
        )
        .route(
            "/stream",
            post(handlers::stream).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::fallback)
        // Conversation histories are forwarded whole, so no body cap here
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(handlers::preflight))
        .layer(TraceLayer::new_for_http());

    for (name, value) in CORS_HEADERS {
        app = app.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }

    app.with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let model = config.inference.model.clone();
    let engine = WorkersAiClient::new(config.inference);

    let app = router(AppState::new(Arc::new(engine), model.as_str()));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {} (model: {})", addr, model);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
