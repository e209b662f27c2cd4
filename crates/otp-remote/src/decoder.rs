//! Remote decoder - one resolution session
//!
//! Owns everything a resolution walk shares: the wire format, the fetch
//! transport, the typed document cache and the frozen decode context. A
//! decoder is built per top-level load and discarded with it.

use crate::cache::{CacheStats, DocumentCache};
use crate::config::LoaderConfig;
use crate::context::DecodeContext;
use crate::error::{DecodeError, ResolveError};
use crate::fetch::Fetcher;
use crate::locator::Locator;
use crate::parsers::DocumentFormat;
use crate::resolvable::Document;
use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Check a document against the configured size limit
///
/// # Errors
/// [`DecodeError::TooLarge`] when `size` exceeds `limit`.
pub fn ensure_within_limit(size: usize, limit: usize) -> Result<(), DecodeError> {
    if size > limit {
        return Err(DecodeError::TooLarge { size, limit });
    }
    Ok(())
}

/// Decoding session shared by every node of one document graph
pub struct RemoteDecoder {
    format: DocumentFormat,
    max_document_bytes: usize,
    max_documents: u64,
    fetched: AtomicU64,
    fetcher: Arc<dyn Fetcher>,
    cache: DocumentCache,
    context: Arc<DecodeContext>,
    /// Locators on the current resolution path, root first
    ///
    /// One path per session. Resolution walks the graph sequentially, so
    /// the stack is always a single root-to-leaf path. Resolving two cells
    /// of one session concurrently would interleave their paths and could
    /// report a cycle that does not exist.
    visiting: Mutex<Vec<Locator>>,
}

impl RemoteDecoder {
    /// Create session with a frozen context
    #[must_use]
    pub fn new(config: &LoaderConfig, fetcher: Arc<dyn Fetcher>, context: DecodeContext) -> Self {
        Self {
            format: config.format,
            max_document_bytes: config.max_document_bytes,
            max_documents: config.max_documents,
            fetched: AtomicU64::new(0),
            fetcher,
            cache: DocumentCache::new(),
            context: Arc::new(context),
            visiting: Mutex::new(Vec::new()),
        }
    }

    /// Wire format used for every document of the session
    #[inline]
    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Context published by the root
    #[inline]
    #[must_use]
    pub fn context(&self) -> &DecodeContext {
        &self.context
    }

    /// Session cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Session cache statistics
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Number of fetches started by the session
    #[inline]
    #[must_use]
    pub fn fetched(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }

    /// Decode bytes with the session format and bind the session context
    ///
    /// # Errors
    /// [`DecodeError`] if the bytes are too large or do not decode as `T`.
    pub fn decode<T: Document>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        ensure_within_limit(bytes.len(), self.max_document_bytes)?;
        let mut value: T = self.format.decode(bytes)?;
        value.bind(&self.context);
        Ok(value)
    }

    /// Fetch and decode the document at `locator` as a `T`
    ///
    /// At most one fetch per `(locator, type)` happens during the session;
    /// concurrent requests wait for the one in flight. The returned value is
    /// bound but not yet resolved.
    ///
    /// # Errors
    /// [`ResolveError::Fetch`] or [`ResolveError::Decode`] naming `locator`.
    /// [`ResolveError::TooManyDocuments`] if the fetch would exceed the
    /// session's document limit.
    pub async fn decode_remote<T: Document>(&self, locator: &Locator) -> Result<T, ResolveError> {
        if self.cache.contains::<T>(locator) {
            tracing::trace!(%locator, "Cache hit");
        }

        let fetched = self
            .cache
            .try_get_or_insert_with::<T, ResolveError, _>(locator, async {
                let count = self.fetched.fetch_add(1, Ordering::Relaxed) + 1;
                if count > self.max_documents {
                    tracing::warn!(%locator, limit = self.max_documents, "Document limit reached");
                    return Err(ResolveError::TooManyDocuments {
                        locator: locator.clone(),
                        limit: self.max_documents,
                    });
                }

                tracing::debug!(%locator, format = %self.format, count, "Fetching document");

                let bytes = self
                    .fetcher
                    .fetch(locator)
                    .await
                    .map_err(|source| ResolveError::Fetch {
                        locator: locator.clone(),
                        source,
                    })?;

                self.decode::<T>(&bytes)
                    .map_err(|source| ResolveError::Decode {
                        locator: locator.clone(),
                        source,
                    })
            })
            .await
            .map_err(|shared| Arc::try_unwrap(shared).unwrap_or_else(|e| (*e).clone()))?;

        fetched.ok_or_else(|| ResolveError::ContractViolation {
            locator: locator.clone(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Mark `locator` as being resolved until the returned guard drops
    ///
    /// # Errors
    /// [`ResolveError::Cycle`] if `locator` is already being resolved further
    /// up the current path.
    pub fn enter(&self, locator: &Locator) -> Result<VisitGuard<'_>, ResolveError> {
        let mut visiting = self.visiting.lock();
        if visiting.contains(locator) {
            tracing::warn!(%locator, depth = visiting.len(), "Reference cycle detected");
            return Err(ResolveError::Cycle(locator.clone()));
        }
        visiting.push(locator.clone());
        Ok(VisitGuard {
            decoder: self,
            locator: locator.clone(),
        })
    }
}

impl Debug for RemoteDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteDecoder")
            .field("format", &self.format)
            .field("max_document_bytes", &self.max_document_bytes)
            .field("max_documents", &self.max_documents)
            .field("fetched", &self.fetched())
            .field("context", &self.context)
            .field("visiting", &self.visiting.lock().len())
            .finish_non_exhaustive()
    }
}

/// Marks a locator as on the current resolution path
#[derive(Debug)]
pub struct VisitGuard<'a> {
    decoder: &'a RemoteDecoder,
    locator: Locator,
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        let mut visiting = self.decoder.visiting.lock();
        if let Some(position) = visiting.iter().rposition(|l| *l == self.locator) {
            visiting.remove(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetch::StaticFetcher;
    use crate::resolvable::Resolvable;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl Resolvable for Note {}

    #[derive(Debug, Clone, PartialEq)]
    struct Prefix(&'static str);

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        text: String,
        #[serde(skip)]
        prefix: Option<&'static str>,
    }

    impl Resolvable for Tagged {
        fn bind(&mut self, context: &DecodeContext) {
            self.prefix = context.get::<Prefix>().map(|p| p.0);
        }
    }

    fn locator(path: &str) -> Locator {
        Locator::parse(&format!("https://api.example.com/{path}")).unwrap()
    }

    fn session(fetcher: StaticFetcher, context: DecodeContext) -> RemoteDecoder {
        RemoteDecoder::new(&LoaderConfig::default(), Arc::new(fetcher), context)
    }

    #[tokio::test]
    async fn decode_remote_fetches_and_caches() {
        let fetcher = StaticFetcher::new().with_document(locator("notes/1"), r#"{"text": "hi"}"#);
        let decoder = session(fetcher, DecodeContext::new());

        let note: Note = decoder.decode_remote(&locator("notes/1")).await.unwrap();
        assert_eq!(note.text, "hi");
        assert!(decoder.cache().contains::<Note>(&locator("notes/1")));
        assert_eq!(decoder.cache_stats().await.entry_count, 1);
    }

    #[tokio::test]
    async fn decode_remote_binds_session_context() {
        let fetcher = StaticFetcher::new().with_document(locator("tags/1"), r#"{"text": "x"}"#);
        let decoder = session(fetcher, DecodeContext::new().with(Prefix("plan")));

        let tagged: Tagged = decoder.decode_remote(&locator("tags/1")).await.unwrap();
        assert_eq!(tagged.prefix, Some("plan"));
    }

    #[tokio::test]
    async fn missing_document_is_a_fetch_error() {
        let decoder = session(StaticFetcher::new(), DecodeContext::new());

        let err = decoder
            .decode_remote::<Note>(&locator("notes/404"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Fetch {
                locator: locator("notes/404"),
                source: FetchError::NotFound(locator("notes/404")),
            }
        );
    }

    #[tokio::test]
    async fn malformed_document_is_a_decode_error() {
        let fetcher = StaticFetcher::new().with_document(locator("notes/bad"), r#"{"txt": 1}"#);
        let decoder = session(fetcher, DecodeContext::new());

        let err = decoder
            .decode_remote::<Note>(&locator("notes/bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decode { .. }));
        assert_eq!(err.locator(), Some(&locator("notes/bad")));
    }

    #[tokio::test]
    async fn repeated_locator_counts_once_against_limit() {
        let fetcher = StaticFetcher::new().with_document(locator("notes/1"), r#"{"text": "hi"}"#);
        let config = LoaderConfig::default().with_max_documents(1);
        let decoder = RemoteDecoder::new(&config, Arc::new(fetcher), DecodeContext::new());

        for _ in 0..5 {
            let note: Note = decoder.decode_remote(&locator("notes/1")).await.unwrap();
            assert_eq!(note.text, "hi");
        }
        assert_eq!(decoder.fetched(), 1);
    }

    #[tokio::test]
    async fn distinct_locators_beyond_limit_fail() {
        let fetcher = StaticFetcher::new()
            .with_document(locator("notes/1"), r#"{"text": "one"}"#)
            .with_document(locator("notes/2"), r#"{"text": "two"}"#);
        let config = LoaderConfig::default().with_max_documents(1);
        let decoder = RemoteDecoder::new(&config, Arc::new(fetcher), DecodeContext::new());

        decoder.decode_remote::<Note>(&locator("notes/1")).await.unwrap();
        let err = decoder
            .decode_remote::<Note>(&locator("notes/2"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::TooManyDocuments {
                locator: locator("notes/2"),
                limit: 1,
            }
        );
        assert!(!decoder.cache().contains::<Note>(&locator("notes/2")));
    }

    #[test]
    fn decode_enforces_size_limit() {
        let config = LoaderConfig::default().with_max_document_bytes(8);
        let decoder = RemoteDecoder::new(&config, Arc::new(StaticFetcher::new()), DecodeContext::new());

        let err = decoder.decode::<Note>(br#"{"text": "too long"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { limit: 8, .. }));
    }

    #[test]
    fn enter_detects_cycles_and_releases_on_drop() {
        let decoder = session(StaticFetcher::new(), DecodeContext::new());
        let a = locator("a");

        let guard = decoder.enter(&a).unwrap();
        assert_eq!(decoder.enter(&a).unwrap_err(), ResolveError::Cycle(a.clone()));

        drop(guard);
        assert!(decoder.enter(&a).is_ok());
    }
}
