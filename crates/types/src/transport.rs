//! Transport-level failures at external boundaries.

use thiserror::Error;

/// Network failure talking to a collaborator.
///
/// Distinct from a rejection: the caller may retry the whole workflow, but
/// an already-sent submission cannot be unsent and may still commit.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established or was dropped.
    #[error("connection: {0}")]
    Connection(String),

    /// The transport-level timeout elapsed.
    #[error("timed out talking to {0}")]
    Timeout(String),

    /// The peer replied with bytes we could not interpret.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}
