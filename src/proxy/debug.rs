//! Request dumper used when no backends are configured.
//!
//! Logs the inbound request and the outbound request that would have
//! been sent, then answers with an empty 200. Nothing leaves the process.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use super::backends::BackendAddress;
use super::request::{build_outbound_request, InboundRequest};

/// Placeholder target for the would-be outbound request.
pub const DEBUG_BACKEND: &str = "127.0.0.1:8080";

pub async fn debug_handler(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let inbound = InboundRequest {
        method,
        uri,
        headers,
        body,
    };

    tracing::info!(
        method = %inbound.method,
        uri = %inbound.uri,
        host = ?inbound.host(),
        headers = ?inbound.headers,
        body_bytes = inbound.body.len(),
        "inbound request"
    );

    match build_outbound_request(&inbound, &BackendAddress::from(DEBUG_BACKEND)) {
        Ok(outbound) => tracing::info!(
            method = %outbound.method(),
            uri = %outbound.uri(),
            headers = ?outbound.headers(),
            "would forward"
        ),
        Err(e) => tracing::warn!(error = %e, "outbound request could not be built"),
    }

    StatusCode::OK.into_response()
}
