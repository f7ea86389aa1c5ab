//! Ordering service reply types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status field of an ordering service reply.
///
/// Only `Success` commits the update. Everything else, including a reply
/// that failed to parse, is a rejection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BroadcastStatus {
    Success,
    BadRequest,
    Forbidden,
    NotFound,
    ServiceUnavailable,
    InternalServerError,
    Unknown,
}

impl BroadcastStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "SUCCESS",
            Self::BadRequest => "BAD_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A parsed ordering service reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    status: BroadcastStatus,

    /// Human-readable detail, often empty on success.
    #[serde(default)]
    info: String,
}

impl BroadcastResponse {
    pub fn new(status: BroadcastStatus, info: impl Into<String>) -> Self {
        Self {
            status,
            info: info.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(BroadcastStatus::Success, "")
    }

    pub fn status(&self) -> BroadcastStatus {
        self.status
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        let json = serde_json::to_string(&BroadcastStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");

        let back: BroadcastStatus = serde_json::from_str("\"SERVICE_UNAVAILABLE\"").unwrap();
        assert_eq!(back, BroadcastStatus::ServiceUnavailable);
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(BroadcastStatus::Success.is_success());
        for st in [
            BroadcastStatus::BadRequest,
            BroadcastStatus::Forbidden,
            BroadcastStatus::NotFound,
            BroadcastStatus::ServiceUnavailable,
            BroadcastStatus::InternalServerError,
            BroadcastStatus::Unknown,
        ] {
            assert!(!st.is_success(), "{st} should not be success");
        }
    }
}
