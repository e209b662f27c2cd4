//! Loader - main entry point
//!
//! Runs a complete resolution for one top-level document:
//! - decode the root with the configured format
//! - let the root publish its context, then freeze it
//! - bind every node to the frozen context
//! - resolve every pending reference, depth first, failing fast
//!
//! Each load builds a fresh [`RemoteDecoder`], so caches never leak between
//! loads.

use crate::config::LoaderConfig;
use crate::context::DecodeContext;
use crate::decoder::{ensure_within_limit, RemoteDecoder};
use crate::error::{FetchError, RemoteResult, ResolveError};
use crate::fetch::{DefaultFetcher, Fetcher};
use crate::locator::Locator;
use crate::resolvable::Document;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Loads documents and resolves their references
#[derive(Clone)]
pub struct Loader {
    config: LoaderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Loader {
    /// Create loader with a transport
    #[inline]
    #[must_use]
    pub fn new(config: LoaderConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Create loader with the HTTP and file transports
    ///
    /// # Errors
    /// [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn with_default_fetcher(config: LoaderConfig) -> Result<Self, FetchError> {
        let fetcher = DefaultFetcher::new(&config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    /// Loader configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Start a resolution session with a frozen context
    #[must_use]
    pub fn session(&self, context: DecodeContext) -> RemoteDecoder {
        RemoteDecoder::new(&self.config, Arc::clone(&self.fetcher), context)
    }

    /// Decode `bytes` as a `T` and resolve all of its references
    ///
    /// # Errors
    /// [`RemoteError::Decode`](crate::RemoteError::Decode) if the root does
    /// not decode, [`RemoteError::Resolve`](crate::RemoteError::Resolve) on
    /// the first failing reference.
    pub async fn load<T: Document>(&self, bytes: &[u8]) -> RemoteResult<T> {
        self.load_with(bytes, DecodeContext::new()).await
    }

    /// [`load`](Self::load) with caller-supplied context entries
    ///
    /// Entries the root publishes replace caller entries of the same type.
    ///
    /// # Errors
    /// Same as [`load`](Self::load).
    pub async fn load_with<T: Document>(
        &self,
        bytes: &[u8],
        mut context: DecodeContext,
    ) -> RemoteResult<T> {
        let start = Instant::now();
        let kind = std::any::type_name::<T>();

        ensure_within_limit(bytes.len(), self.config.max_document_bytes)?;
        let mut root: T = self.config.format.decode(bytes)?;

        root.publish(&mut context);
        let decoder = self.session(context);
        root.bind(decoder.context());

        match root.resolve(&decoder).await {
            Ok(()) => {
                let stats = decoder.cache_stats().await;
                tracing::info!(
                    document = kind,
                    fetched = stats.entry_count,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Document resolved"
                );
                Ok(root)
            }
            Err(e) => {
                tracing::warn!(
                    document = kind,
                    locator = ?e.locator().map(Locator::as_str),
                    error = %e,
                    "Resolution failed"
                );
                Err(e.into())
            }
        }
    }

    /// Fetch the document at `locator` and load it
    ///
    /// # Errors
    /// [`RemoteError::Resolve`](crate::RemoteError::Resolve) if the root
    /// cannot be fetched, otherwise same as [`load`](Self::load).
    pub async fn load_locator<T: Document>(&self, locator: &Locator) -> RemoteResult<T> {
        let bytes = self
            .fetcher
            .fetch(locator)
            .await
            .map_err(|source| ResolveError::Fetch {
                locator: locator.clone(),
                source,
            })?;
        self.load(&bytes).await
    }
}

impl Debug for Loader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
