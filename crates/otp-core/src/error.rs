//! Error types for training plan documents

use otp_remote::{DecodeError, EncodeError, Locator, RemoteError, ResolveError};

/// Errors from zone system lookups and construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    /// No zone has the requested code
    #[error("zone not found: '{0}'")]
    ZoneNotFound(String),

    /// Zone code given but no zone system is available to look it up
    #[error("zone '{0}' referenced without a zone system")]
    NoZoneSystem(String),

    /// Two zones share a code
    #[error("duplicate zone code: '{0}'")]
    DuplicateCode(String),

    /// A zones map key differs from the code of its definition
    #[error("zone keyed '{key}' declares code '{code}'")]
    CodeMismatch {
        /// Map key
        key: String,
        /// Code in the definition
        code: String,
    },

    /// Range bounds are inverted or not finite
    #[error("invalid intensity range: [{lower}, {upper}]")]
    InvalidRange {
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },
}

impl From<ZoneError> for ResolveError {
    fn from(err: ZoneError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Errors from loading, converting or encoding a plan
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Document failed to decode
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A reference failed to resolve
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Plan failed to encode
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Zone lookup failed
    #[error("zone error: {0}")]
    Zone(#[from] ZoneError),

    /// Reference was never resolved
    #[error("unresolved reference at '{field}': {locator}")]
    Unresolved {
        /// Field holding the reference
        field: &'static str,
        /// Pending locator
        locator: Locator,
    },

    /// Required reference is absent
    #[error("missing required field '{0}'")]
    Missing(&'static str),
}

impl PlanError {
    /// Create unresolved error for a field
    #[inline]
    #[must_use]
    pub fn unresolved(field: &'static str) -> impl FnOnce(Locator) -> Self {
        move |locator| Self::Unresolved { field, locator }
    }

    /// Locator of the failing reference, if any
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Self::Resolve(err) => err.locator(),
            Self::Unresolved { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

impl From<RemoteError> for PlanError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Decode(e) => Self::Decode(e),
            RemoteError::Resolve(e) => Self::Resolve(e),
            RemoteError::Encode(e) => Self::Encode(e),
        }
    }
}

/// Result type alias for plan operations
pub type PlanResult<T> = Result<T, PlanError>;
