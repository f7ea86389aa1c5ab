//! Update envelopes: the minimal delta, its signed form and the request
//! submitted to the ordering service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ConfigGroup, ConfigSignature, TxId};

/// A minimal delta between an original and a modified configuration.
///
/// The read set pins the versions the delta was computed against; the write
/// set carries only the nodes that change. A node present in the read set
/// but absent from the write set is unchanged, not deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// Target channel.
    pub channel_id: String,

    /// Versions this update was computed against.
    pub read_set: ConfigGroup,

    /// Only the nodes that change, with bumped versions.
    pub write_set: ConfigGroup,
}

impl ConfigUpdate {
    pub fn new(channel_id: impl Into<String>, read_set: ConfigGroup, write_set: ConfigGroup) -> Self {
        Self {
            channel_id: channel_id.into(),
            read_set,
            write_set,
        }
    }

    /// Whether the write set carries no changes at all.
    pub fn is_noop(&self) -> bool {
        self.write_set.is_empty()
    }
}

/// An encoded delta together with the endorsement signatures collected so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUpdate {
    #[serde(with = "hex::serde")]
    config_update: Vec<u8>,

    signatures: Vec<ConfigSignature>,
}

impl SignedUpdate {
    pub fn new(config_update: Vec<u8>, signatures: Vec<ConfigSignature>) -> Self {
        Self {
            config_update,
            signatures,
        }
    }

    pub fn config_update(&self) -> &[u8] {
        &self.config_update
    }

    pub fn signatures(&self) -> &[ConfigSignature] {
        &self.signatures
    }
}

/// Which orderer operation a submission targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    /// Channel creation; no prior configuration exists.
    CreateChannel,
    /// Anchor peer list replacement for one organization.
    AnchorPeerUpdate,
    /// Certificate revocation list replacement for one organization.
    RevocationListUpdate,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateChannel => "create channel",
            Self::AnchorPeerUpdate => "anchor peer update",
            Self::RevocationListUpdate => "revocation list update",
        };
        f.write_str(s)
    }
}

/// The request handed to the ordering service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    update: SignedUpdate,
    channel_name: String,
    tx_id: TxId,
}

impl UpdateRequest {
    pub fn new(update: SignedUpdate, channel_name: impl Into<String>, tx_id: TxId) -> Self {
        Self {
            update,
            channel_name: channel_name.into(),
            tx_id,
        }
    }

    pub fn update(&self) -> &SignedUpdate {
        &self.update
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }
}

/// Terminal outcome of a workflow run, returned to the caller.
///
/// No retry state is retained; a failed submission must be retried by
/// restarting the whole workflow from a fresh configuration fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
    pub message: String,
}

impl UpdateResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
