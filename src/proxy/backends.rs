//! The immutable backend set shared by every request.

use std::fmt;
use std::sync::Arc;

/// Opaque `host:port` of one backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendAddress(Arc<str>);

impl BackendAddress {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BackendAddress {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered list of backends, fixed at startup.
///
/// Order is significant: diagnostics are reported in this order.
/// Duplicates are kept and dispatched to independently.
#[derive(Debug, Clone, Default)]
pub struct BackendSet(Arc<[BackendAddress]>);

impl BackendSet {
    pub fn new<I, S>(backends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            backends
                .into_iter()
                .map(|b| BackendAddress::from(b.as_ref()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendAddress> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
