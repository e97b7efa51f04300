//! `multicaster run` — start the multicast server.
//!
//! Loads the optional config file, applies CLI / environment overrides,
//! validates the result, and serves until Ctrl+C or SIGTERM. The backend
//! set is fixed for the lifetime of the process.

use std::path::Path;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::model::Config;
use crate::config::{self, validation};
use crate::error::MulticasterError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), MulticasterError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = resolve_config(&args, Path::new(".")).await?;
    let addr = config.listen_addr()?;

    for (backend, count) in validation::duplicate_backends(&config) {
        tracing::warn!(
            backend = %backend,
            count,
            "backend listed more than once, it receives each request once per entry"
        );
    }

    let state = Arc::new(AppState::from_config(&config));
    let router = server::build_router(
        Arc::clone(&state),
        config.max_body,
        config.health_path.as_deref(),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if state.is_debug() {
        tracing::warn!(
            addr = %addr,
            "no backends configured, running as debugger (requests are logged, not forwarded)"
        );
    } else {
        tracing::info!(
            addr = %addr,
            backends = state.backends.len(),
            timeout_ms = config.timeout,
            baseline = %config.baseline,
            "multicaster started"
        );
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("multicaster stopped");
    Ok(())
}

/// Load the config file (explicit or auto-detected in `dir`), overlay
/// CLI / environment overrides, then validate.
pub async fn resolve_config(args: &RunArgs, dir: &Path) -> Result<Config, MulticasterError> {
    let mut config = match config::resolve_file(args.config.as_deref(), dir).await {
        Some(path) => config::load_file(&path).await?,
        None => Config::default(),
    };

    apply_overrides(&mut config, args);

    if let Err(errors) = validation::validate(&config) {
        return Err(MulticasterError::ConfigValidation { errors });
    }
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(ref backends) = args.backends {
        config.backends = backends
            .iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
    }
    if let Some(ref listen) = args.listen {
        config.listen.clone_from(listen);
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(max_body) = args.max_body {
        config.max_body = max_body;
    }
    if let Some(baseline) = args.baseline {
        config.baseline = baseline;
    }
    if let Some(ref path) = args.health_path {
        config.health_path = Some(path.clone());
    }
}
