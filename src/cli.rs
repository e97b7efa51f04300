//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, health), and their associated argument
//! structs. Every `run` flag has an environment variable equivalent for
//! container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::Baseline;

#[derive(Parser)]
#[command(
    name = "multicaster",
    version,
    about = "HTTP request multicasting proxy",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        multicaster run --backends b1:80,b2:80     Multicast to two backends\n  \
        multicaster run -c multicaster.yaml        Start with a config file\n  \
        multicaster run                            No backends: log requests only"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the multicast server
    Run(Box<RunArgs>),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        multicaster run                                   Auto-detect config\n  \
        BACKENDS=b1:80,b2:80 multicaster run              Backends from env\n  \
        multicaster run --backends b1:80 --timeout 2000   2s client timeout\n  \
        multicaster run --listen :9000 --pretty           Local dev mode")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Backend addresses (host:port), comma-separated
    #[arg(short, long, env = "BACKENDS", value_delimiter = ',')]
    pub backends: Option<Vec<String>>,

    /// Listen address (host:port or :port)
    #[arg(long, env = "LISTEN")]
    pub listen: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Per-backend client timeout in milliseconds
    #[arg(long, env = "HTTP_CLIENT_TIMEOUT", help_heading = "Tuning")]
    pub timeout: Option<u64>,

    /// Max request body size in bytes
    #[arg(long, env = "MAX_BODY_SIZE", help_heading = "Tuning")]
    pub max_body: Option<usize>,

    /// Status reported when no backend returns an error
    #[arg(long, env = "MULTICASTER_BASELINE", help_heading = "Tuning")]
    pub baseline: Option<Baseline>,

    /// Serve a JSON health endpoint at this path
    #[arg(long, env = "HEALTH_PATH", help_heading = "Tuning")]
    pub health_path: Option<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "multicaster.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Health endpoint path configured on the instance
    #[arg(long, default_value = "/health")]
    pub path: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
