//! `multicaster validate` — check a configuration file before deploying it.
//!
//! Errors fail the command. Duplicate backends are legal but reported as
//! warnings in both output formats.

use std::path::Path;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::parse_config_str;
use crate::config::validation;
use crate::error::{MulticasterError, ValidationError};

pub fn execute(args: &ValidateArgs) -> Result<(), MulticasterError> {
    let path = &args.config;
    let config = read_config(path)?;
    let shown = path.display().to_string();

    match validation::validate(&config) {
        Ok(()) => {
            let warnings = validation::duplicate_warnings(&config);
            match args.format {
                ValidateFormat::Text => println!("{}", text_report(&shown, &config, &warnings)),
                ValidateFormat::Json => println!("{}", json_report(&config, &warnings)),
            }
            Ok(())
        }
        Err(errors) => {
            match args.format {
                ValidateFormat::Text => eprintln!("{}", text_errors(&shown, &errors)),
                ValidateFormat::Json => println!("{}", json_errors(&errors)),
            }
            Err(MulticasterError::ConfigValidation { errors })
        }
    }
}

fn read_config(path: &Path) -> Result<Config, MulticasterError> {
    if !path.exists() {
        return Err(MulticasterError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

fn text_report(path: &str, config: &Config, warnings: &[String]) -> String {
    let mut out = format!(
        "\u{2713} {}",
        validation::format_validation_report(path, config)
    );
    for warning in warnings {
        out.push_str("\n  warning: ");
        out.push_str(warning);
    }
    out
}

fn text_errors(path: &str, errors: &[ValidationError]) -> String {
    let mut out = format!("\u{2717} {path} has {} errors\n", errors.len());
    for error in errors {
        out.push('\n');
        out.push_str(&error.to_string());
    }
    out
}

fn json_report(config: &Config, warnings: &[String]) -> serde_json::Value {
    let duplicates: Vec<serde_json::Value> = validation::duplicate_backends(config)
        .into_iter()
        .map(|(backend, count)| serde_json::json!({ "backend": backend, "count": count }))
        .collect();
    serde_json::json!({
        "valid": true,
        "backends": config.backends.len(),
        "duplicates": duplicates,
        "warnings": warnings,
        "timeout_ms": config.timeout,
        "max_body": config.max_body,
        "baseline": config.baseline,
    })
}

fn json_errors(errors: &[ValidationError]) -> serde_json::Value {
    let errors: Vec<serde_json::Value> = errors
        .iter()
        .map(|e| {
            serde_json::json!({
                "field": e.field,
                "message": e.message,
                "suggestion": e.suggestion,
            })
        })
        .collect();
    serde_json::json!({ "valid": false, "errors": errors })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(backends: &[&str]) -> Config {
        Config {
            backends: backends.iter().map(|s| (*s).to_string()).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn text_report_lists_duplicate_warnings() {
        let config = config_with(&["b1:80", "b2:80", "b1:80"]);
        let warnings = validation::duplicate_warnings(&config);
        let report = text_report("multicaster.yaml", &config, &warnings);
        assert!(report.starts_with("\u{2713} multicaster.yaml is valid"));
        assert!(report.ends_with(
            "  warning: backend 'b1:80' is listed 2 times and receives each request 2 times"
        ));
    }

    #[test]
    fn text_report_without_duplicates_has_no_warnings() {
        let config = config_with(&["b1:80"]);
        let report = text_report("multicaster.yaml", &config, &[]);
        assert!(!report.contains("warning"));
    }

    #[test]
    fn json_report_carries_duplicate_counts() {
        let config = config_with(&["b1:80", "b1:80", "b1:80"]);
        let warnings = validation::duplicate_warnings(&config);
        let report = json_report(&config, &warnings);
        assert_eq!(report["valid"], true);
        assert_eq!(report["backends"], 3);
        assert_eq!(report["duplicates"][0]["backend"], "b1:80");
        assert_eq!(report["duplicates"][0]["count"], 3);
        assert_eq!(report["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(report["baseline"], "success");
    }

    #[test]
    fn errors_render_in_both_formats() {
        let errors = validation::validate(&config_with(&["bücher.example:80"])).unwrap_err();
        assert!(text_errors("multicaster.yaml", &errors).starts_with("\u{2717} multicaster.yaml has 1 errors"));
        let json = json_errors(&errors);
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["field"], "backends[0]");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_config(Path::new("does-not-exist.yaml")).unwrap_err();
        assert!(matches!(err, MulticasterError::ConfigFileNotFound { .. }));
    }
}
