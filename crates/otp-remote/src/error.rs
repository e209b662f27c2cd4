//! Error types for reference resolution
//!
//! Provides error handling for:
//! - Decode operations (bytes or scalars → typed values)
//! - Fetch operations (transport)
//! - Resolve operations (a fetch or decode failure tagged with its locator)
//!
//! Errors carry rendered messages rather than foreign error values so they can
//! be cloned and handed to every caller waiting on the same in-flight fetch.

use crate::locator::Locator;

/// Errors while decoding a document or a scalar field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Document is not well-formed in its wire format
    #[error("{format} syntax error: {message}")]
    Syntax {
        /// Wire format name
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// Document is well-formed but does not have the expected shape
    #[error("invalid document: {0}")]
    Schema(String),

    /// Scalar matched none of its accepted textual forms
    #[error("invalid {kind} format: '{input}'")]
    InvalidFormat {
        /// Value kind (`intensity`, `measure`, ...)
        kind: &'static str,
        /// Offending input
        input: String,
    },

    /// String is not an absolute URL
    #[error("invalid locator '{input}': {message}")]
    InvalidLocator {
        /// Offending input
        input: String,
        /// URL parser message
        message: String,
    },

    /// Document has no content
    #[error("empty {0} document")]
    Empty(&'static str),

    /// Document exceeds the configured size limit
    #[error("document too large: {size} bytes (max: {limit})")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured maximum
        limit: usize,
    },
}

impl DecodeError {
    /// Create syntax error for a wire format
    pub fn syntax(format: &'static str, message: impl Into<String>) -> Self {
        Self::Syntax {
            format,
            message: message.into(),
        }
    }

    /// Create invalid format error for a scalar kind
    pub fn invalid_format(kind: &'static str, input: impl Into<String>) -> Self {
        Self::InvalidFormat {
            kind,
            input: input.into(),
        }
    }
}

/// Errors while encoding a value into a wire format
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// Serializer rejected the value
    #[error("{format} encode error: {message}")]
    Format {
        /// Wire format name
        format: &'static str,
        /// Serializer message
        message: String,
    },
}

/// Errors raised by a fetch transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Nothing exists at the locator
    #[error("not found: {0}")]
    NotFound(Locator),

    /// Remote answered with a non-success status
    #[error("unexpected status {status} from {locator}")]
    Status {
        /// Requested locator
        locator: Locator,
        /// HTTP status code
        status: u16,
    },

    /// Request could not be completed
    #[error("transport error for {locator}: {message}")]
    Transport {
        /// Requested locator
        locator: Locator,
        /// Transport message
        message: String,
    },

    /// Local read failed
    #[error("io error reading {locator}: {message}")]
    Io {
        /// Requested locator
        locator: Locator,
        /// IO message
        message: String,
    },

    /// No transport handles this scheme
    #[error("unsupported locator scheme: '{0}'")]
    UnsupportedScheme(String),

    /// Transport could not be constructed
    #[error("client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Create transport error for locator
    pub fn transport(locator: &Locator, message: impl ToString) -> Self {
        Self::Transport {
            locator: locator.clone(),
            message: message.to_string(),
        }
    }
}

/// Errors while resolving the references of a document graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// Transport failed for a referenced document
    #[error("failed to fetch {locator}: {source}")]
    Fetch {
        /// Failing locator
        locator: Locator,
        /// Transport failure
        #[source]
        source: FetchError,
    },

    /// Referenced document could not be decoded
    #[error("failed to decode {locator}: {source}")]
    Decode {
        /// Failing locator
        locator: Locator,
        /// Decode failure
        #[source]
        source: DecodeError,
    },

    /// Document refers back to itself through its own references
    #[error("reference cycle through {0}")]
    Cycle(Locator),

    /// Session reached its distinct-document limit
    #[error("fetching {locator} exceeds the limit of {limit} documents per load")]
    TooManyDocuments {
        /// Locator that would exceed the limit
        locator: Locator,
        /// Configured limit
        limit: u64,
    },

    /// Cached entry does not hold the requested type
    #[error("cache contract violated for {locator}: entry is not a {expected}")]
    ContractViolation {
        /// Cached locator
        locator: Locator,
        /// Requested type name
        expected: &'static str,
    },

    /// A node rejected its resolved references
    #[error("resolution rejected: {0}")]
    Invalid(String),
}

impl ResolveError {
    /// Locator of the failing reference, if the failure is tied to one
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Self::Fetch { locator, .. }
            | Self::Decode { locator, .. }
            | Self::ContractViolation { locator, .. }
            | Self::TooManyDocuments { locator, .. }
            | Self::Cycle(locator) => Some(locator),
            Self::Invalid(_) => None,
        }
    }

    /// Check if error is a programming-contract violation
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}

/// Combined error for a top-level load
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// Root document failed to decode
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Reference resolution failed
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Encoding failed
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

/// Result type alias for top-level loads
pub type RemoteResult<T> = Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> Locator {
        Locator::parse("https://api.example.com/workouts/404").unwrap()
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::invalid_format("measure", "5 parsecs");
        assert_eq!(err.to_string(), "invalid measure format: '5 parsecs'");
    }

    #[test]
    fn resolve_error_names_locator() {
        let err = ResolveError::Fetch {
            locator: locator(),
            source: FetchError::NotFound(locator()),
        };
        assert_eq!(err.locator(), Some(&locator()));
        assert!(err.to_string().contains("https://api.example.com/workouts/404"));
        assert!(!err.is_contract_violation());

        assert_eq!(ResolveError::Invalid("bad".to_string()).locator(), None);

        let err = ResolveError::TooManyDocuments {
            locator: locator(),
            limit: 1,
        };
        assert_eq!(err.locator(), Some(&locator()));
        assert!(err.to_string().contains("limit of 1 documents"));
    }

    #[test]
    fn error_conversions() {
        let err: RemoteError = DecodeError::Empty("yaml").into();
        assert!(matches!(err, RemoteError::Decode(_)));

        let err: RemoteError = ResolveError::Cycle(locator()).into();
        assert!(matches!(err, RemoteError::Resolve(_)));
    }
}
