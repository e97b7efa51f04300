//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as malformed backend addresses, an unparseable listen
//! address, zero timeouts, or a bad health path. Returns a list of
//! [`ValidationError`] values with per-field suggestions.

use http::Uri;
use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate a request path. Returns `Ok(())` or a human-readable error.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err(format!("path must start with '/' (did you mean '/{path}'?)"));
    }
    Ok(())
}

/// Validate a backend address. It must be a bare `host[:port]` authority.
pub fn validate_backend(backend: &str) -> Result<(), (String, Option<String>)> {
    if backend.trim().is_empty() {
        return Err(("backend address cannot be empty".into(), None));
    }
    if let Some((scheme, rest)) = backend.split_once("://") {
        return Err((
            format!("'{backend}' must not include a scheme ('{scheme}://')"),
            Some(format!("use '{}'", rest.trim_end_matches('/'))),
        ));
    }

    if backend.trim() != backend {
        return Err((
            format!("'{backend}' has leading or trailing whitespace"),
            Some(format!("use '{}'", backend.trim())),
        ));
    }

    let parsed = Url::parse(&format!("http://{backend}"))
        .map_err(|_| (format!("'{backend}' is not a valid host:port"), None))?;

    if !backend.is_ascii() {
        let suggestion = parsed
            .host_str()
            .map(|host| match backend.rsplit_once(':') {
                Some((_, port)) => format!("use the ASCII form '{host}:{port}'"),
                None => format!("use the ASCII form '{host}'"),
            });
        return Err((
            format!("'{backend}' contains non-ASCII characters"),
            suggestion,
        ));
    }

    if parsed.host_str().is_none() {
        return Err((format!("'{backend}' has no host"), None));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err((format!("'{backend}' must not include credentials"), None));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        let authority = backend
            .split(|c: char| matches!(c, '/' | '?' | '#'))
            .next()
            .unwrap_or(backend)
            .to_string();
        return Err((
            format!("'{backend}' must not include a path or query"),
            Some(format!("use '{authority}'")),
        ));
    }

    // Outbound requests are built from this same URI form.
    if format!("http://{backend}/").parse::<Uri>().is_err() {
        return Err((format!("'{backend}' is not a valid request authority"), None));
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listen_addr() {
        errors.push(ValidationError {
            field: "listen".into(),
            message: e.to_string(),
            suggestion: Some("expected host:port or :port".into()),
        });
    }

    for (i, backend) in config.backends.iter().enumerate() {
        if let Err((message, suggestion)) = validate_backend(backend) {
            errors.push(ValidationError {
                field: format!("backends[{i}]"),
                message,
                suggestion,
            });
        }
    }

    if config.timeout == 0 {
        errors.push(ValidationError {
            field: "timeout".into(),
            message: "timeout must be greater than 0".into(),
            suggestion: Some("the default is 10000 (ms)".into()),
        });
    }

    if config.max_body == 0 {
        errors.push(ValidationError {
            field: "max_body".into(),
            message: "max_body must be greater than 0".into(),
            suggestion: None,
        });
    }

    if let Some(ref path) = config.health_path {
        if let Err(msg) = validate_path(path) {
            errors.push(ValidationError {
                field: "health_path".into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Backends listed more than once with their occurrence counts, in
/// first-seen order.
#[must_use]
pub fn duplicate_backends(config: &Config) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for backend in &config.backends {
        match counts.iter_mut().find(|(b, _)| *b == backend.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((backend.as_str(), 1)),
        }
    }
    counts.retain(|(_, n)| *n > 1);
    counts
}

/// One warning line per duplicated backend.
#[must_use]
pub fn duplicate_warnings(config: &Config) -> Vec<String> {
    duplicate_backends(config)
        .into_iter()
        .map(|(backend, n)| {
            format!("backend '{backend}' is listed {n} times and receives each request {n} times")
        })
        .collect()
}

/// Build a human-readable summary of a valid configuration.
#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  listen:   {}", config.listen));
    lines.push(format!("  timeout:  {}ms", config.timeout));
    lines.push(format!("  max body: {} bytes", config.max_body));
    lines.push(format!("  baseline: {}", config.baseline));

    if config.backends.is_empty() {
        lines.push("  backends: none (debug mode, requests are logged, not sent)".into());
    } else {
        lines.push(format!("  backends: {}", config.backends.len()));
        for backend in &config.backends {
            lines.push(format!("    {backend}"));
        }
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
