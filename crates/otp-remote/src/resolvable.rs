//! The resolvable capability
//!
//! Every node of a document graph implements [`Resolvable`]. Resolution is a
//! three step walk over a freshly decoded root:
//!
//! 1. [`publish`](Resolvable::publish) - the root places ambient values in the
//!    [`DecodeContext`]
//! 2. [`bind`](Resolvable::bind) - nodes capture what they need from the
//!    frozen context
//! 3. [`resolve`](Resolvable::resolve) - pending references are fetched,
//!    decoded and resolved, depth first, in declaration order
//!
//! Leaf types use the default no-op methods. Container nodes forward to their
//! reference-bearing fields, usually through [`resolvable!`](crate::resolvable).

use crate::context::DecodeContext;
use crate::decoder::RemoteDecoder;
use crate::error::ResolveError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// A node that may contain deferred references
#[async_trait]
pub trait Resolvable: Send {
    /// Publish values that the whole document must see
    ///
    /// Only document roots override this.
    fn publish(&self, _context: &mut DecodeContext) {}

    /// Capture decode-time context
    ///
    /// Runs once per decoded document, before any resolution.
    fn bind(&mut self, _context: &DecodeContext) {}

    /// Resolve pending references of this node and its children
    ///
    /// Stops at the first failure. Calling it again on a resolved node
    /// performs no fetches and leaves the node unchanged.
    ///
    /// # Errors
    /// The first [`ResolveError`] met in the subtree.
    async fn resolve(&mut self, _decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        Ok(())
    }
}

/// A type that can be fetched and decoded as a standalone document
///
/// Implemented for every resolvable, deserializable value that can be shared
/// through the session cache.
pub trait Document: Resolvable + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Document for T where T: Resolvable + DeserializeOwned + Clone + Send + Sync + 'static {}

#[async_trait]
impl<T: Resolvable> Resolvable for Vec<T> {
    fn bind(&mut self, context: &DecodeContext) {
        for item in self.iter_mut() {
            item.bind(context);
        }
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        for item in self.iter_mut() {
            item.resolve(decoder).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Resolvable> Resolvable for Box<T> {
    fn publish(&self, context: &mut DecodeContext) {
        (**self).publish(context);
    }

    fn bind(&mut self, context: &DecodeContext) {
        (**self).bind(context);
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        (**self).resolve(decoder).await
    }
}

#[async_trait]
impl<T: Resolvable> Resolvable for Option<T> {
    fn bind(&mut self, context: &DecodeContext) {
        if let Some(inner) = self {
            inner.bind(context);
        }
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        match self {
            Some(inner) => inner.resolve(decoder).await,
            None => Ok(()),
        }
    }
}

/// Implement [`Resolvable`] for a struct by forwarding to its node fields
///
/// Fields are bound and resolved in the order listed. Fields not listed are
/// treated as leaves.
///
/// ```ignore
/// #[derive(Clone, serde::Deserialize)]
/// struct Profile {
///     bio: String,
///     avatar: RemoteResource<Avatar>,
/// }
///
/// otp_remote::resolvable!(Profile { avatar });
/// ```
#[macro_export]
macro_rules! resolvable {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        #[$crate::async_trait]
        impl $crate::Resolvable for $ty {
            fn bind(&mut self, context: &$crate::DecodeContext) {
                $( $crate::Resolvable::bind(&mut self.$field, context); )+
            }

            async fn resolve(
                &mut self,
                decoder: &$crate::RemoteDecoder,
            ) -> ::core::result::Result<(), $crate::ResolveError> {
                $( $crate::Resolvable::resolve(&mut self.$field, decoder).await?; )+
                Ok(())
            }
        }
    };
    ($ty:ty) => {
        impl $crate::Resolvable for $ty {}
    };
}
