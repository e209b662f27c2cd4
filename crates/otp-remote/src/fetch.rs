//! Fetch transports
//!
//! A [`Fetcher`] turns a [`Locator`] into raw bytes. Implementations:
//! - [`HttpFetcher`] - `http`/`https` via reqwest
//! - [`FileFetcher`] - `file` URLs via tokio::fs
//! - [`StaticFetcher`] - in-memory documents
//! - [`DefaultFetcher`] - routes by scheme to the HTTP and file transports

use crate::config::LoaderConfig;
use crate::error::FetchError;
use crate::locator::Locator;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

/// Transport that retrieves raw document bytes
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the bytes stored at `locator`
    ///
    /// # Errors
    /// [`FetchError`] describing why nothing could be read.
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError>;
}

/// In-memory transport
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: HashMap<Locator, Vec<u8>>,
}

impl StaticFetcher {
    /// Create empty transport
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    #[must_use]
    pub fn with_document(mut self, locator: Locator, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(locator, bytes);
        self
    }

    /// Store a document
    pub fn insert(&mut self, locator: Locator, bytes: impl Into<Vec<u8>>) {
        self.documents.insert(locator, bytes.into());
    }

    /// Number of stored documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError> {
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(locator.clone()))
    }
}

/// Local file transport for `file://` locators
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError> {
        if locator.scheme() != "file" {
            return Err(FetchError::UnsupportedScheme(locator.scheme().to_string()));
        }
        let path = locator
            .url()
            .to_file_path()
            .map_err(|()| FetchError::UnsupportedScheme(locator.to_string()))?;

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(locator.clone())
            } else {
                FetchError::Io {
                    locator: locator.clone(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// HTTP transport for `http`/`https` locators
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create transport with a request timeout
    ///
    /// # Errors
    /// [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create transport around an existing client
    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(locator.url().clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(locator, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(locator.clone()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                locator: locator.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(locator, e))?;
        tracing::debug!(%locator, bytes = body.len(), "Fetched document");
        Ok(body.to_vec())
    }
}

/// Scheme-routing transport used when none is supplied
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    /// Create transport from loader configuration
    ///
    /// # Errors
    /// [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &LoaderConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new(config.fetch_timeout())?,
            file: FileFetcher,
        })
    }
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError> {
        match locator.scheme() {
            "http" | "https" => self.http.fetch(locator).await,
            "file" => self.file.fetch(locator).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn locator(input: &str) -> Locator {
        Locator::parse(input).unwrap()
    }

    #[tokio::test]
    async fn static_fetcher_serves_documents() {
        let fetcher = StaticFetcher::new().with_document(locator("https://a.test/doc"), "body");
        assert_eq!(fetcher.len(), 1);

        let bytes = fetcher.fetch(&locator("https://a.test/doc")).await.unwrap();
        assert_eq!(bytes, b"body");

        let err = fetcher.fetch(&locator("https://a.test/other")).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound(locator("https://a.test/other")));
    }

    #[tokio::test]
    async fn file_fetcher_reads_local_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"text\": \"local\"}").unwrap();
        let url = url::Url::from_file_path(file.path()).unwrap();

        let bytes = FileFetcher.fetch(&Locator::from(url)).await.unwrap();
        assert_eq!(bytes, b"{\"text\": \"local\"}");
    }

    #[tokio::test]
    async fn file_fetcher_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let url = url::Url::from_file_path(dir.path().join("missing.json")).unwrap();
        let locator = Locator::from(url);

        let err = FileFetcher.fetch(&locator).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound(locator));
    }

    #[tokio::test]
    async fn file_fetcher_rejects_other_schemes() {
        let err = FileFetcher.fetch(&locator("https://a.test/doc")).await.unwrap_err();
        assert_eq!(err, FetchError::UnsupportedScheme("https".to_string()));
    }

    #[tokio::test]
    async fn default_fetcher_routes_by_scheme() {
        let fetcher = DefaultFetcher::new(&LoaderConfig::default()).unwrap();

        let err = fetcher.fetch(&locator("ftp://a.test/doc")).await.unwrap_err();
        assert_eq!(err, FetchError::UnsupportedScheme("ftp".to_string()));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"routed").unwrap();
        let url = url::Url::from_file_path(file.path()).unwrap();
        assert_eq!(fetcher.fetch(&Locator::from(url)).await.unwrap(), b"routed");
    }
}
