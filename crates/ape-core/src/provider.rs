//! Outbound side of a transport.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SendResult;

/// The outbound primitive every transport exposes.
///
/// Events hold a reference to the provider that produced them so that
/// [`Event::reply`](crate::Event::reply) can route back through it. The
/// meaning of `to` is transport-defined: a channel name, a user id, or a
/// pseudo-channel such as `#stdin`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the transport name (e.g. "terminal"), used in logs.
    fn name(&self) -> &str;

    /// Sends `message` to `to`.
    ///
    /// May block on network or terminal I/O. No retry or buffering is done
    /// on the caller's behalf.
    async fn send(&self, to: &str, message: &str) -> SendResult<()>;
}

/// A shared provider trait object.
pub type BoxedProvider = Arc<dyn Provider>;
