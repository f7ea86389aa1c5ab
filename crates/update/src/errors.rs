//! Workflow errors.

use std::fmt;

use chancery_codec::CodecError;
use chancery_identity::IdentityError;
use chancery_types::{BroadcastStatus, TransportError, UpdateKind};
use thiserror::Error;

/// Failure applying an edit to a configuration tree.
#[derive(Debug, Error)]
pub enum MutationError {
    /// A group the edit requires is not present.
    #[error("target group '{0}' not present in configuration")]
    MissingTargetGroup(String),

    /// The organization has no membership definition to edit.
    #[error("organization '{0}' has no MSP value")]
    MissingMspValue(String),

    /// A structural template could not be loaded or parsed.
    #[error("template '{name}' unusable: {reason}")]
    BadTemplate { name: String, reason: String },
}

/// Which pipeline step a failure originated in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkflowPhase {
    Fetching,
    Transcoding,
    Mutating,
    Diffing,
    Signing,
    Submitting,
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fetching => "fetching",
            Self::Transcoding => "transcoding",
            Self::Mutating => "mutating",
            Self::Diffing => "diffing",
            Self::Signing => "signing",
            Self::Submitting => "submitting",
        };
        f.write_str(s)
    }
}

/// A component failure inside the update pipeline.
///
/// Every variant is terminal for the invocation that hit it; nothing here
/// is retried automatically. A rejected submission in particular is almost
/// always a stale read set, so the caller must restart from a fresh fetch
/// rather than resubmit the same delta.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The ordering service answered with a non-success status.
    #[error("ordering service rejected {operation} for channel '{channel}': {status} {info}")]
    SubmissionRejected {
        channel: String,
        operation: UpdateKind,
        status: BroadcastStatus,
        info: String,
    },
}

/// An [`UpdateError`] tagged with the channel and pipeline phase it hit.
#[derive(Debug, Error)]
#[error("channel '{channel}': {phase} failed: {source}")]
pub struct WorkflowError {
    channel: String,
    phase: WorkflowPhase,
    #[source]
    source: UpdateError,
}

impl WorkflowError {
    pub fn new(channel: impl Into<String>, phase: WorkflowPhase, source: UpdateError) -> Self {
        Self {
            channel: channel.into(),
            phase,
            source,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn source_err(&self) -> &UpdateError {
        &self.source
    }
}
