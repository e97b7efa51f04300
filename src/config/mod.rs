//! Configuration loading and validation.
//!
//! Configuration is read once at startup from an optional file (YAML,
//! JSON, or TOML depending on enabled features) and then overlaid with
//! CLI / environment overrides by the `run` command. Submodules provide
//! the data model and validation logic.

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::MulticasterError;
use model::Config;

/// File names probed in the working directory when no `--config` is given.
pub const CANDIDATE_FILES: &[&str] = &[
    "multicaster.yaml",
    "multicaster.yml",
    "multicaster.json",
    "multicaster.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, MulticasterError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| MulticasterError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| MulticasterError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| MulticasterError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(MulticasterError::UnsupportedFormat(other.to_string())),
    }
}

/// Read and parse a config file. Validation is left to the caller so
/// that overrides can be applied first.
pub async fn load_file(path: &Path) -> Result<Config, MulticasterError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MulticasterError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MulticasterError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

/// Pick the config file to load: the explicit path, or the first
/// candidate present in `dir`.
pub async fn resolve_file(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    for name in CANDIDATE_FILES {
        let path = dir.join(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return Some(path);
        }
    }

    None
}
