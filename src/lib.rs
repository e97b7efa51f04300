//! Multicaster is an HTTP request multicasting proxy.
//!
//! Every inbound request is replicated concurrently to a fixed set of
//! backends. Once all backends have answered (or failed, or timed out),
//! the caller receives one response whose status summarizes the
//! outcomes, with a per-backend diagnostic header for each backend.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, health).
//! - [`config`] -- Configuration model, file loading, and validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- Optional health endpoint returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core multicast: backend set, request cloning, concurrent
//!   dispatch, status aggregation, and response assembly.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file formats |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
