//! Unified error types for Multicaster.
//!
//! Defines [`MulticasterError`] (the process-level error enum),
//! [`ValidationError`] for config validation failures, and
//! [`DispatchError`] for the backend-local failures of a single
//! multicast. All use `thiserror` for `Display` and `Error` derives.

use std::path::PathBuf;
use std::time::Duration;

use hyper::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MulticasterError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

/// Failure of one backend dispatch.
///
/// Every variant is local to its backend: it becomes that backend's
/// outcome code and never aborts the other dispatches.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("cannot build request for {backend}: {source}")]
    RequestConstruction {
        backend: String,
        #[source]
        source: hyper::http::Error,
    },

    #[error("no response within {}ms", .timeout.as_millis())]
    TransportTimeout { timeout: Duration },

    #[error("backend unreachable: {source}")]
    TransportUnreachable {
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("response body read failed: {source}")]
    ResponseRead {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DispatchError {
    /// Outcome status reported for this backend.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::RequestConstruction { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TransportTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::TransportUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::ResponseRead { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Classify a client error, treating any timed-out I/O in its source
    /// chain as a timeout rather than an unreachable backend.
    #[must_use]
    pub fn from_transport(err: hyper_util::client::legacy::Error, timeout: Duration) -> Self {
        if is_timeout(&err) {
            Self::TransportTimeout { timeout }
        } else {
            Self::TransportUnreachable { source: err }
        }
    }
}

fn is_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}
