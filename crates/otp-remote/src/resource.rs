//! Reference cells - fields that hold a value, a locator, or both
//!
//! When decoding, a string that parses as an absolute URL becomes a pending
//! reference; anything else decodes inline as the target type. Encoding
//! writes the locator back whenever one is known, so a resolved document
//! re-serializes to its original shape.

use crate::context::DecodeContext;
use crate::decoder::RemoteDecoder;
use crate::error::{DecodeError, ResolveError};
use crate::locator::Locator;
use crate::resolvable::{Document, Resolvable};
use async_trait::async_trait;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A value that may live behind a locator
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResource<T> {
    /// Field absent or null
    Empty,
    /// Locator known, value not yet fetched
    Unresolved(Locator),
    /// Value present, fetched from `locator` or written inline
    Resolved {
        /// The value
        value: T,
        /// Where the value came from, if fetched
        locator: Option<Locator>,
    },
}

impl<T> Default for RemoteResource<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> RemoteResource<T> {
    /// Create cell holding an inline value
    #[inline]
    #[must_use]
    pub fn inline(value: T) -> Self {
        Self::Resolved {
            value,
            locator: None,
        }
    }

    /// Create cell pending on a locator
    #[inline]
    #[must_use]
    pub fn remote(locator: Locator) -> Self {
        Self::Unresolved(locator)
    }

    /// Resolved value, if any
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved { value, .. } => Some(value),
            Self::Empty | Self::Unresolved(_) => None,
        }
    }

    /// Known locator, if any
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Self::Unresolved(locator)
            | Self::Resolved {
                locator: Some(locator),
                ..
            } => Some(locator),
            Self::Empty | Self::Resolved { locator: None, .. } => None,
        }
    }

    /// Check if the field was absent
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check if a locator is waiting to be fetched
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }

    /// Check if a value is present
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Take the value out of the cell
    ///
    /// # Errors
    /// Returns the locator of a cell that was never resolved.
    pub fn into_option(self) -> Result<Option<T>, Locator> {
        match self {
            Self::Empty => Ok(None),
            Self::Unresolved(locator) => Err(locator),
            Self::Resolved { value, .. } => Ok(Some(value)),
        }
    }

    /// Classify a raw field value
    ///
    /// # Errors
    /// [`DecodeError::Schema`] when the value is neither a locator nor a
    /// valid inline `T`.
    pub fn from_value(raw: Value) -> Result<Self, DecodeError>
    where
        T: DeserializeOwned,
    {
        match raw {
            Value::Null => Ok(Self::Empty),
            Value::String(text) => match Locator::parse(&text) {
                Ok(locator) => Ok(Self::Unresolved(locator)),
                Err(not_a_locator) => serde_json::from_value(Value::String(text.clone()))
                    .map(Self::inline)
                    .map_err(|inline| {
                        DecodeError::Schema(format!(
                            "'{}' is neither a locator ({}) nor an inline value ({})",
                            text, not_a_locator, inline
                        ))
                    }),
            },
            other => serde_json::from_value(other)
                .map(Self::inline)
                .map_err(|e| DecodeError::Schema(e.to_string())),
        }
    }
}

impl<T: Serialize> Serialize for RemoteResource<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unresolved(locator)
            | Self::Resolved {
                locator: Some(locator),
                ..
            } => locator.serialize(serializer),
            Self::Resolved {
                value,
                locator: None,
            } => value.serialize(serializer),
            Self::Empty => serializer.serialize_none(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RemoteResource<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(raw).map_err(D::Error::custom)
    }
}

#[async_trait]
impl<T: Document> Resolvable for RemoteResource<T> {
    fn bind(&mut self, context: &DecodeContext) {
        if let Self::Resolved { value, .. } = self {
            value.bind(context);
        }
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        match self {
            Self::Empty => Ok(()),
            Self::Resolved { value, .. } => value.resolve(decoder).await,
            Self::Unresolved(locator) => {
                let locator = locator.clone();
                let _visit = decoder.enter(&locator)?;

                let mut value: T = decoder.decode_remote(&locator).await?;
                value.resolve(decoder).await?;

                *self = Self::Resolved {
                    value,
                    locator: Some(locator),
                };
                Ok(())
            }
        }
    }
}

/// An ordered list whose elements may each live behind a locator
///
/// Elements resolve one at a time, in order, stopping at the first failure.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResourceList<T> {
    entries: Vec<RemoteResource<T>>,
}

impl<T> Default for RemoteResourceList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> RemoteResourceList<T> {
    /// Create list of inline values
    #[must_use]
    pub fn inline(values: Vec<T>) -> Self {
        values.into_iter().map(RemoteResource::inline).collect()
    }

    /// Elements in order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[RemoteResource<T>] {
        &self.entries
    }

    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list has no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over elements
    pub fn iter(&self) -> std::slice::Iter<'_, RemoteResource<T>> {
        self.entries.iter()
    }

    /// Check if every element holds a value
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.entries.iter().all(RemoteResource::is_resolved)
    }

    /// Take the values out of the list
    ///
    /// # Errors
    /// Returns the locator of the first element that was never resolved.
    pub fn into_values(self) -> Result<Vec<T>, Locator> {
        self.entries
            .into_iter()
            .filter_map(|entry| entry.into_option().transpose())
            .collect()
    }
}

impl<T> FromIterator<RemoteResource<T>> for RemoteResourceList<T> {
    fn from_iter<I: IntoIterator<Item = RemoteResource<T>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RemoteResourceList<T> {
    type Item = &'a RemoteResource<T>;
    type IntoIter = std::slice::Iter<'a, RemoteResource<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: Serialize> Serialize for RemoteResourceList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RemoteResourceList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = match Value::deserialize(deserializer)? {
            Value::Null => return Ok(Self::default()),
            Value::Array(items) => items,
            other => {
                return Err(D::Error::custom(format!(
                    "expected a list of values or locators, found {}",
                    other
                )))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                if item.is_null() {
                    return Err(D::Error::custom(format!("element {}: null entry", index)));
                }
                RemoteResource::from_value(item)
                    .map_err(|e| D::Error::custom(format!("element {}: {}", index, e)))
            })
            .collect()
    }
}

#[async_trait]
impl<T: Document> Resolvable for RemoteResourceList<T> {
    fn bind(&mut self, context: &DecodeContext) {
        self.entries.bind(context);
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        self.entries.resolve(decoder).await
    }
}
