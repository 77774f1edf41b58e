//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handler
//! - Wire up middleware (tracing, timeout, header patching)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::PatchConfig;
use crate::http::middleware::PatchHeadersLayer;
use crate::patch::{HeaderPolicy, PolicyError};

/// HTTP server fronting a demo handler with the header patching layer.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server whose policy comes from the configuration.
    pub fn new(config: PatchConfig) -> Result<Self, PolicyError> {
        let policy = HeaderPolicy::try_from(&config.policy)?;
        Ok(Self::with_policy(config, policy))
    }

    /// Create a server with a policy built in code, e.g. one carrying a callback.
    pub fn with_policy(config: PatchConfig, policy: HeaderPolicy) -> Self {
        Self {
            router: Self::build_router(&config, Arc::new(policy)),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &PatchConfig, policy: Arc<HeaderPolicy>) -> Router {
        Router::new()
            .route("/{*path}", any(demo_handler))
            .route("/", any(demo_handler))
            .layer(PatchHeadersLayer::shared(policy))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Answers every request with a short text body and a few headers for the
/// policy to work on.
async fn demo_handler(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::debug!(method = %method, path = %uri.path(), "Serving demo response");
    (
        StatusCode::OK,
        [
            (header::SERVER, "patch-headers"),
            (header::HeaderName::from_static("x-powered-by"), "axum"),
            (header::HeaderName::from_static("nothing"), ""),
        ],
        format!("{method} {}\n", uri.path()),
    )
}
