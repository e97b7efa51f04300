//! Serde data structures for the Multicaster configuration file.
//!
//! Contains [`Config`] (the root) and [`Baseline`], the status policy
//! applied when no backend outcome overrides the aggregated status.
//! `Config` derives `Serialize` and `Deserialize` with
//! `deny_unknown_fields` for strict parsing.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MulticasterError;

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

const fn default_timeout() -> u64 {
    10_000
}

const fn default_max_body() -> usize {
    1_048_576
}

fn is_default_baseline(v: &Baseline) -> bool {
    *v == Baseline::default()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Ordered backend set. Duplicates are dispatched to independently.
    #[serde(default)]
    pub backends: Vec<String>,

    /// Per-backend send timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Largest inbound body buffered for replication, in bytes.
    #[serde(default = "default_max_body")]
    pub max_body: usize,

    #[serde(default, skip_serializing_if = "is_default_baseline")]
    pub baseline: Baseline,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            backends: Vec::new(),
            timeout: default_timeout(),
            max_body: default_max_body(),
            baseline: Baseline::default(),
            health_path: None,
        }
    }
}

impl Config {
    /// Parse the listen address, accepting the `:port` shorthand.
    pub fn listen_addr(&self) -> Result<SocketAddr, MulticasterError> {
        let addr = if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        };
        Ok(addr.parse()?)
    }

    #[must_use]
    pub const fn client_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

/// Aggregated status used when no backend outcome is an overriding error.
///
/// `Success` reports 200 unconditionally. `Failure` reports 200 only
/// when at least one backend answered with something other than 503 and
/// 500 when none did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    #[default]
    Success,
    Failure,
}

impl std::fmt::Display for Baseline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure => f.write_str("failure"),
        }
    }
}
