//! Loader configuration

use crate::parsers::DocumentFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`Loader`](crate::Loader) sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Wire format for the root and every fetched document
    pub format: DocumentFormat,
    /// Maximum distinct documents fetched per session
    ///
    /// Exceeding it fails the load with
    /// [`ResolveError::TooManyDocuments`](crate::ResolveError::TooManyDocuments).
    pub max_documents: u64,
    /// Maximum size of a single document in bytes
    pub max_document_bytes: usize,
    /// HTTP request timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            format: DocumentFormat::Json,
            max_documents: 10_000,
            max_document_bytes: 10 * 1024 * 1024, // 10MB
            fetch_timeout_secs: 30,
        }
    }
}

impl LoaderConfig {
    /// Create default config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set wire format
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder: set per-session document limit
    #[inline]
    #[must_use]
    pub fn with_max_documents(mut self, limit: u64) -> Self {
        self.max_documents = limit;
        self
    }

    /// Builder: set document size limit
    #[inline]
    #[must_use]
    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.max_document_bytes = bytes;
        self
    }

    /// Builder: set fetch timeout
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = timeout.as_secs();
        self
    }

    /// Fetch timeout as a duration
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
