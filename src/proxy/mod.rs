//! Core multicast handler.
//!
//! [`multicast_handler`] is the Axum fallback that receives every
//! request (other than the optional health path), replicates it to the
//! whole backend set, and answers with the aggregated status.
//! Submodules hold the backend set ([`backends`]), per-backend request
//! construction ([`request`]), concurrent dispatch ([`dispatch`]),
//! status reduction ([`aggregate`]), response assembly ([`response`]),
//! and the no-backend request dumper ([`debug`]).

pub mod aggregate;
pub mod backends;
pub mod debug;
pub mod dispatch;
pub mod request;
pub mod response;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;

use crate::server::AppState;

pub async fn multicast_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get(&response::CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        backends = state.backends.len(),
        body_bytes = body.len(),
        "request received"
    );

    let inbound = Arc::new(request::InboundRequest {
        method,
        uri,
        headers: req_headers,
        body,
    });

    let outcomes = dispatch::fan_out(dispatch::DispatchRequest {
        client: &state.http_client,
        backends: &state.backends,
        inbound,
        timeout: state.timeout,
        correlation_id: &correlation_id,
    })
    .await;

    let result = aggregate::aggregate(outcomes, state.baseline);

    state.stats.multicast.fetch_add(1, Ordering::Relaxed);
    if result.is_error() {
        state.stats.failed.fetch_add(1, Ordering::Relaxed);
    }

    let entries: Vec<String> = result
        .outcomes
        .iter()
        .map(response::diagnostic_entry)
        .collect();
    tracing::info!(
        correlation_id = %correlation_id,
        status = result.status.as_u16(),
        outcomes = ?entries,
        "request multicast"
    );

    response::write_response(&result, &correlation_id)
}
