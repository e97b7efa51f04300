//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the backend
//! set, HTTP client, aggregation policy, stats, and uptime),
//! [`build_router`] for constructing the Axum router with middleware
//! layers, [`build_http_client`] for the connection-pooled hyper client,
//! and [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::model::{Baseline, Config};
use crate::health::health_handler;
use crate::proxy;
use crate::proxy::backends::BackendSet;

#[derive(Debug)]
pub struct Stats {
    pub multicast: AtomicU64,
    pub failed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            multicast: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

pub type HttpClient = Client<HttpConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub backends: BackendSet,
    pub http_client: HttpClient,
    pub timeout: Duration,
    pub baseline: Baseline,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            backends: BackendSet::new(&config.backends),
            http_client: build_http_client(),
            timeout: config.client_timeout(),
            baseline: config.baseline,
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.backends.is_empty()
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(HttpConnector::new())
}

/// Build the router: every path is multicast, or dumped when the backend
/// set is empty. `health_path` mounts the health endpoint ahead of the
/// fallback.
pub fn build_router(state: Arc<AppState>, max_body: usize, health_path: Option<&str>) -> Router {
    let mut router = Router::new();
    if let Some(path) = health_path {
        router = router.route(path, get(health_handler));
    }

    let router = if state.is_debug() {
        router.fallback(proxy::debug::debug_handler)
    } else {
        router.fallback(proxy::multicast_handler)
    };

    // The explicit size limit replaces axum's default 2 MiB extractor cap.
    router
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
