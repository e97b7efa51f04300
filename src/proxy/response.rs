//! Writes the aggregated result back to the caller.
//!
//! The response is assembled in one step from an [`AggregatedResult`],
//! so the status is set exactly once. Each outcome becomes one
//! `X-Multicaster-Backend-Response: {backend}={code}` header, in
//! backend-set order. The body is empty.

use std::fmt::Write;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use super::aggregate::AggregatedResult;
use super::dispatch::Outcome;

pub static BACKEND_RESPONSE_HEADER: HeaderName =
    HeaderName::from_static("x-multicaster-backend-response");

pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

#[must_use]
pub fn diagnostic_entry(outcome: &Outcome) -> String {
    format!("{}={}", outcome.backend, outcome.status.as_u16())
}

/// Percent-escape every byte outside visible ASCII, plus `%` itself.
fn escape_header_value(entry: &str) -> String {
    let mut escaped = String::with_capacity(entry.len());
    for byte in entry.bytes() {
        if byte.is_ascii_graphic() && byte != b'%' {
            escaped.push(char::from(byte));
        } else {
            let _ = write!(escaped, "%{byte:02X}");
        }
    }
    escaped
}

/// Header value for one outcome. Entries that are not valid header
/// values are sent percent-escaped, never omitted.
#[must_use]
pub fn diagnostic_value(outcome: &Outcome) -> HeaderValue {
    let entry = diagnostic_entry(outcome);
    HeaderValue::from_str(&entry).unwrap_or_else(|_| {
        tracing::warn!(
            backend = %outcome.backend,
            "backend address is not a valid header value, diagnostic escaped"
        );
        HeaderValue::from_str(&escape_header_value(&entry))
            .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
    })
}

#[must_use]
pub fn diagnostic_headers(result: &AggregatedResult) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(result.outcomes.len());
    for outcome in &result.outcomes {
        headers.append(BACKEND_RESPONSE_HEADER.clone(), diagnostic_value(outcome));
    }
    headers
}

pub fn write_response(result: &AggregatedResult, correlation_id: &str) -> Response {
    let mut builder = Response::builder().status(result.status);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(diagnostic_headers(result));
    }
    if let Ok(value) = HeaderValue::from_str(correlation_id) {
        builder = builder.header(&CORRELATION_ID_HEADER, value);
    }
    builder.body(Body::empty()).unwrap_or_else(|e| {
        tracing::error!(
            correlation_id = %correlation_id,
            error = %e,
            "failed to build response"
        );
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
