//! Deferred reference resolution
//!
//! Documents decoded from JSON or YAML may carry, in any field that allows
//! it, either an inline value or the absolute URL of a document holding that
//! value. This crate decodes such documents lazily and resolves every
//! reference in a single asynchronous pass.
//!
//! # Core Operations
//!
//! - **Decode**: parse the root; URL strings become pending [`RemoteResource`] cells
//! - **Publish/Bind**: the root shares ambient state through a [`DecodeContext`]
//! - **Resolve**: fetch, decode and resolve each pending cell, depth first
//!
//! # Architecture
//!
//! ```text
//! bytes → DocumentFormat → root ──publish──→ DecodeContext (frozen)
//!                            │                     │
//!                            └──bind/resolve──→ RemoteDecoder → Fetcher
//!                                                  ↑_____↓
//!                                            DocumentCache (locator, type)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use otp_remote::{Loader, LoaderConfig, RemoteResource};
//!
//! #[derive(Clone, serde::Deserialize)]
//! struct User {
//!     name: String,
//!     profile: RemoteResource<Profile>,
//! }
//!
//! otp_remote::resolvable!(User { profile });
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = Loader::with_default_fetcher(LoaderConfig::default())?;
//! let user: User = loader
//!     .load(br#"{"name": "Ada", "profile": "https://api.example.com/profiles/1"}"#)
//!     .await?;
//! assert!(user.profile.is_resolved());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod context;
pub mod decoder;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod locator;
pub mod parsers;
pub mod resolvable;
pub mod resource;

// Re-exports for convenience
pub use cache::{CacheStats, DocumentCache, TypedCacheKey};
pub use config::LoaderConfig;
pub use context::DecodeContext;
pub use decoder::RemoteDecoder;
pub use error::{DecodeError, EncodeError, FetchError, RemoteError, RemoteResult, ResolveError};
pub use fetch::{DefaultFetcher, Fetcher, FileFetcher, HttpFetcher, StaticFetcher};
pub use loader::Loader;
pub use locator::Locator;
pub use parsers::{DocumentFormat, DocumentParser};
pub use resolvable::{Document, Resolvable};
pub use resource::{RemoteResource, RemoteResourceList};

#[doc(hidden)]
pub use async_trait::async_trait;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for declaring and loading resolvable documents
    pub use crate::context::DecodeContext;
    pub use crate::decoder::RemoteDecoder;
    pub use crate::error::{DecodeError, RemoteError, ResolveError};
    pub use crate::fetch::Fetcher;
    pub use crate::loader::Loader;
    pub use crate::locator::Locator;
    pub use crate::parsers::DocumentFormat;
    pub use crate::resolvable::{Document, Resolvable};
    pub use crate::resource::{RemoteResource, RemoteResourceList};
    pub use crate::LoaderConfig;
}
