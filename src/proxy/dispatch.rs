//! Concurrent dispatch of one request to every backend.
//!
//! [`fan_out`] spawns one task per backend. Each task builds its own
//! outbound request, sends it under a single deadline, drains the
//! response body, and yields exactly one [`Outcome`]. The join awaits
//! every task before returning, and outcomes come back in backend-set
//! order regardless of completion order.
//!
//! There is no cancellation: a slow backend is bounded only by the
//! client timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::BodyExt;
use hyper::StatusCode;

use super::backends::{BackendAddress, BackendSet};
use super::request::{build_outbound_request, InboundRequest};
use crate::error::DispatchError;
use crate::server::HttpClient;

/// Result of dispatching to one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub backend: BackendAddress,
    pub status: StatusCode,
    /// Why a synthesized status was reported. `None` when the backend answered.
    pub rationale: Option<String>,
}

impl Outcome {
    #[must_use]
    pub const fn answered(backend: BackendAddress, status: StatusCode) -> Self {
        Self {
            backend,
            status,
            rationale: None,
        }
    }

    #[must_use]
    pub fn failed(backend: BackendAddress, err: &DispatchError) -> Self {
        Self {
            backend,
            status: err.status(),
            rationale: Some(err.to_string()),
        }
    }
}

pub struct DispatchRequest<'a> {
    pub client: &'a HttpClient,
    pub backends: &'a BackendSet,
    pub inbound: Arc<InboundRequest>,
    pub timeout: Duration,
    pub correlation_id: &'a str,
}

pub async fn fan_out(req: DispatchRequest<'_>) -> Vec<Outcome> {
    let handles: Vec<_> = req
        .backends
        .iter()
        .map(|backend| {
            let client = req.client.clone();
            let inbound = Arc::clone(&req.inbound);
            let task_backend = backend.clone();
            let timeout = req.timeout;
            let correlation_id = req.correlation_id.to_string();

            let handle = tokio::spawn(async move {
                dispatch_one(&client, &inbound, task_backend, timeout, &correlation_id).await
            });
            (backend.clone(), handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (backend, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                tracing::error!(
                    correlation_id = %req.correlation_id,
                    backend = %backend,
                    error = %join_err,
                    "dispatch task panicked"
                );
                Outcome {
                    backend,
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    rationale: Some(format!("dispatch task failed: {join_err}")),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

#[allow(clippy::cast_possible_truncation)]
async fn dispatch_one(
    client: &HttpClient,
    inbound: &InboundRequest,
    backend: BackendAddress,
    timeout: Duration,
    correlation_id: &str,
) -> Outcome {
    let start = Instant::now();
    let result = send(client, inbound, &backend, timeout).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(status) => {
            tracing::debug!(
                correlation_id = %correlation_id,
                backend = %backend,
                status = status.as_u16(),
                latency_ms,
                "backend responded"
            );
            Outcome::answered(backend, status)
        }
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                backend = %backend,
                status = e.status().as_u16(),
                error = %e,
                latency_ms,
                "backend dispatch failed"
            );
            Outcome::failed(backend, &e)
        }
    }
}

/// Send to one backend and drain its body. One deadline covers both.
async fn send(
    client: &HttpClient,
    inbound: &InboundRequest,
    backend: &BackendAddress,
    timeout: Duration,
) -> Result<StatusCode, DispatchError> {
    let request = build_outbound_request(inbound, backend)?;
    let deadline = tokio::time::Instant::now() + timeout;

    let response = match tokio::time::timeout_at(deadline, client.request(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(DispatchError::from_transport(e, timeout)),
        Err(_) => return Err(DispatchError::TransportTimeout { timeout }),
    };

    let status = response.status();
    match tokio::time::timeout_at(deadline, response.into_body().collect()).await {
        Ok(Ok(_drained)) => Ok(status),
        Ok(Err(e)) => Err(DispatchError::ResponseRead {
            source: Box::new(e),
        }),
        Err(_) => Err(DispatchError::ResponseRead {
            source: format!("body not drained within {}ms", timeout.as_millis()).into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_http_client;
    use axum::http::{HeaderMap, Method};
    use bytes::Bytes;

    fn inbound() -> Arc<InboundRequest> {
        Arc::new(InboundRequest {
            method: Method::POST,
            uri: "/events".parse().unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        })
    }

    async fn closed_port() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string()
    }

    #[tokio::test]
    async fn every_backend_yields_one_outcome_in_order() {
        let closed = closed_port().await;
        let backends = BackendSet::new(["bad host", closed.as_str(), "bad host"]);
        let client = build_http_client();

        let outcomes = fan_out(DispatchRequest {
            client: &client,
            backends: &backends,
            inbound: inbound(),
            timeout: Duration::from_secs(2),
            correlation_id: "test",
        })
        .await;

        let codes: Vec<(&str, u16)> = outcomes
            .iter()
            .map(|o| (o.backend.as_str(), o.status.as_u16()))
            .collect();
        assert_eq!(
            codes,
            vec![("bad host", 500), (closed.as_str(), 503), ("bad host", 500)]
        );
        assert!(outcomes.iter().all(|o| o.rationale.is_some()));
    }

    #[test]
    fn failed_outcome_carries_rationale() {
        let err = DispatchError::TransportTimeout {
            timeout: Duration::from_millis(10),
        };
        let outcome = Outcome::failed("b1:80".into(), &err);
        assert_eq!(outcome.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(outcome.rationale.as_deref(), Some("no response within 10ms"));
    }
}
