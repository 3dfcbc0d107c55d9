//! Unified error types for the Ape core.
//!
//! Only transports and their outbound primitive can fail. Routing itself has
//! no failure modes: a re-registered command silently replaces the previous
//! handler, and an event nobody wants is silently dropped.

use thiserror::Error;

// =============================================================================
// Send Errors
// =============================================================================

/// Errors returned by a provider's outbound `send` primitive.
///
/// These surface directly to the handler that called [`Event::reply`]; the
/// router never observes or retries them.
///
/// [`Event::reply`]: crate::Event::reply
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// Writing to the underlying stream or socket failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The transport has been shut down or was never started.
    #[error("transport is closed")]
    Closed,

    /// The platform refused the message.
    #[error("message to '{destination}' rejected: {reason}")]
    Rejected {
        /// The destination the message was addressed to.
        destination: String,
        /// Reason reported by the platform.
        reason: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for SendError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl SendError {
    /// Creates a rejection error.
    pub fn rejected(destination: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            destination: destination.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Adapter Errors
// =============================================================================

/// Errors that can occur while an adapter is running.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Reading inbound input failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),

    /// Outbound send failed.
    #[error(transparent)]
    Send(#[from] SendError),
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl AdapterError {
    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for outbound sends.
pub type SendResult<T> = Result<T, SendError>;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: SendError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, SendError::Io(ref m) if m == "pipe"));
    }

    #[test]
    fn test_send_error_wraps_transparently() {
        let err = AdapterError::from(SendError::rejected("#general", "muted"));
        assert_eq!(err.to_string(), "message to '#general' rejected: muted");
    }
}
