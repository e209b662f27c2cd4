//! Locators - absolute URLs naming fetchable documents
//!
//! A [`Locator`] is both the address handed to a [`Fetcher`](crate::Fetcher)
//! and the key under which the fetched document is cached for a session.

use crate::error::DecodeError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use url::Url;

/// Absolute URL identifying a fetchable document
///
/// Equality follows URL normalization, so `HTTPS://Example.com/a` and
/// `https://example.com/a` are the same locator.
///
/// # Example
/// ```
/// use otp_remote::Locator;
///
/// let locator = Locator::parse("https://api.example.com/workouts/tempo").unwrap();
/// assert_eq!(locator.scheme(), "https");
/// assert!(Locator::parse("tempo").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locator(Url);

impl Locator {
    /// Parse an absolute URL
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidLocator`] for relative or malformed input.
    pub fn parse(input: &str) -> Result<Self, DecodeError> {
        Url::parse(input)
            .map(Self)
            .map_err(|e| DecodeError::InvalidLocator {
                input: input.to_string(),
                message: e.to_string(),
            })
    }

    /// Normalized string form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Underlying URL
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// URL scheme (`https`, `file`, ...)
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }
}

impl From<Url> for Locator {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for Locator {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}
