//! Identity errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure resolving or using an organizational signing identity.
///
/// All of these are fatal to the workflow and reported to the caller; a
/// missing credential usually means the administrator must re-enroll.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No identity configuration exists for the organization.
    #[error("no identity configured for organization '{0}'")]
    NotFound(String),

    /// The organization is configured but its admin credential is missing.
    #[error("admin credential for '{org}' not loadable from {path}: {reason}")]
    MissingAdminKey {
        org: String,
        path: PathBuf,
        reason: String,
    },

    /// The credential file did not contain a usable key.
    #[error("invalid admin key for '{org}': {reason}")]
    InvalidKey { org: String, reason: String },

    /// The signing operation itself failed.
    #[error("signing failed: {0}")]
    Signing(String),
}
