//! Codec errors.

use thiserror::Error;

/// Failure transcoding a configuration or computing a delta.
///
/// Fatal to the workflow that hit it; none of these are retried locally.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Decode was handed an empty blob.
    #[error("empty configuration blob")]
    EmptyInput,

    /// Input bytes or tree did not parse as a configuration.
    #[error("malformed configuration: {0}")]
    Malformed(String),

    /// The tree is missing structure an operation requires.
    #[error("missing required structure: {0}")]
    MissingStructure(String),

    /// The transcoding service could not be reached.
    #[error("transcoding service unreachable: {0}")]
    Unreachable(String),

    /// The transcoding service answered with a non-success status.
    #[error("transcoding service rejected input (http {status}): {detail}")]
    Rejected { status: u16, detail: String },
}
