//! Decode context - typed values published by a document root
//!
//! A root publishes entries before its subtree is bound; every node decoded
//! during the session, including fetched documents, can read them. Entries
//! are keyed by their Rust type, so each piece of ambient state gets its own
//! newtype.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// Type-keyed map of values published for a decoding session
///
/// # Example
/// ```
/// use otp_remote::DecodeContext;
///
/// #[derive(Debug, PartialEq)]
/// struct Units(&'static str);
///
/// let mut context = DecodeContext::new();
/// context.publish(Units("metric"));
/// assert_eq!(context.get::<Units>(), Some(&Units("metric")));
/// ```
#[derive(Default)]
pub struct DecodeContext {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl DecodeContext {
    /// Create empty context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a value, replacing any earlier value of the same type
    ///
    /// Returns the replaced value.
    pub fn publish<V: Any + Send + Sync>(&mut self, value: V) -> Option<V> {
        self.entries
            .insert(TypeId::of::<V>(), Box::new(value))
            .and_then(|previous| previous.downcast::<V>().ok())
            .map(|previous| *previous)
    }

    /// Builder-style [`publish`](Self::publish)
    #[must_use]
    pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.publish(value);
        self
    }

    /// Get the published value of type `V`
    #[must_use]
    pub fn get<V: Any>(&self) -> Option<&V> {
        self.entries
            .get(&TypeId::of::<V>())
            .and_then(|value| (**value).downcast_ref::<V>())
    }

    /// Check if a value of type `V` is published
    #[inline]
    #[must_use]
    pub fn contains<V: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<V>())
    }

    /// Number of published values
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is published
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Debug for DecodeContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("entries", &self.entries.len())
            .finish()
    }
}
