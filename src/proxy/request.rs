//! Per-backend request construction.
//!
//! [`InboundRequest`] holds the caller's request with its body buffered
//! once. [`build_outbound_request`] derives an independent request for
//! one backend: same method, path, and query, a private copy of the
//! headers, `Host` forced to the caller's host, and a body that shares
//! the buffered bytes.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, Uri};
use http_body_util::Full;

use super::backends::BackendAddress;
use crate::error::DispatchError;

#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// `Host` the caller targeted, falling back to the request-target
    /// authority for absolute-form requests.
    #[must_use]
    pub fn host(&self) -> Option<HeaderValue> {
        self.headers.get(header::HOST).cloned().or_else(|| {
            self.uri
                .authority()
                .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
        })
    }

    /// Path and query as received, `/` when the target had none.
    #[must_use]
    pub fn path_and_query(&self) -> &str {
        self.uri.path_and_query().map_or("/", |pq| pq.as_str())
    }
}

pub type OutboundRequest = hyper::Request<Full<Bytes>>;

#[must_use]
pub fn target_uri(backend: &BackendAddress, inbound: &InboundRequest) -> String {
    format!("http://{backend}{}", inbound.path_and_query())
}

pub fn build_outbound_request(
    inbound: &InboundRequest,
    backend: &BackendAddress,
) -> Result<OutboundRequest, DispatchError> {
    let mut request = hyper::Request::builder()
        .method(inbound.method.clone())
        .uri(target_uri(backend, inbound))
        .body(Full::new(inbound.body.clone()))
        .map_err(|e| DispatchError::RequestConstruction {
            backend: backend.to_string(),
            source: e,
        })?;

    let headers = request.headers_mut();
    *headers = inbound.headers.clone();
    if let Some(host) = inbound.host() {
        headers.insert(header::HOST, host);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(uri: &str) -> InboundRequest {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "caller.example".parse().unwrap());
        headers.insert("x-trace", "abc".parse().unwrap());
        headers.append("accept", "text/plain".parse().unwrap());
        headers.append("accept", "application/json".parse().unwrap());
        InboundRequest {
            method: Method::PUT,
            uri: uri.parse().unwrap(),
            headers,
            body: Bytes::from_static(b"payload"),
        }
    }

    #[test]
    fn targets_backend_with_inbound_path_and_query() {
        let req = build_outbound_request(&inbound("/items/7?dry=1"), &"b1:80".into()).unwrap();
        assert_eq!(req.uri(), "http://b1:80/items/7?dry=1");
        assert_eq!(req.method(), &Method::PUT);
    }

    #[test]
    fn host_header_is_the_callers() {
        let req = build_outbound_request(&inbound("/"), &"b1:80".into()).unwrap();
        assert_eq!(req.headers().get(header::HOST).unwrap(), "caller.example");
    }

    #[test]
    fn headers_are_copied_including_repeats() {
        let req = build_outbound_request(&inbound("/"), &"b1:80".into()).unwrap();
        assert_eq!(req.headers().get("x-trace").unwrap(), "abc");
        assert_eq!(req.headers().get_all("accept").iter().count(), 2);
    }

    #[test]
    fn clones_do_not_share_headers() {
        let source = inbound("/");
        let mut first = build_outbound_request(&source, &"b1:80".into()).unwrap();
        let second = build_outbound_request(&source, &"b2:80".into()).unwrap();
        first.headers_mut().insert("x-trace", "mutated".parse().unwrap());
        assert_eq!(second.headers().get("x-trace").unwrap(), "abc");
        assert_eq!(source.headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn absolute_form_falls_back_to_uri_authority() {
        let mut source = inbound("http://proxy.example:8080/x");
        source.headers.remove(header::HOST);
        let req = build_outbound_request(&source, &"b1:80".into()).unwrap();
        assert_eq!(req.uri(), "http://b1:80/x");
        assert_eq!(req.headers().get(header::HOST).unwrap(), "proxy.example:8080");
    }

    #[test]
    fn malformed_backend_is_a_construction_error() {
        let err = build_outbound_request(&inbound("/"), &"bad host".into()).unwrap_err();
        assert!(matches!(err, DispatchError::RequestConstruction { .. }));
    }
}
