//! Detached endorsement signatures over an encoded config update.

use serde::{Deserialize, Serialize};

/// Length of the fresh nonce carried in every signature header.
pub const NONCE_LEN: usize = 24;

/// Identifies who produced a signature and with what freshness nonce.
///
/// The nonce is drawn fresh per signing operation, so signing the same
/// payload twice yields distinct signature bytes. Both still verify.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeader {
    /// MSP id of the signing organization.
    creator_msp_id: String,

    /// Serialized public key of the signing identity.
    #[serde(with = "hex::serde")]
    creator_key: Vec<u8>,

    /// Fresh per-signature nonce.
    #[serde(with = "hex::serde")]
    nonce: Vec<u8>,
}

impl SignatureHeader {
    pub fn new(creator_msp_id: impl Into<String>, creator_key: Vec<u8>, nonce: Vec<u8>) -> Self {
        Self {
            creator_msp_id: creator_msp_id.into(),
            creator_key,
            nonce,
        }
    }

    pub fn creator_msp_id(&self) -> &str {
        &self.creator_msp_id
    }

    pub fn creator_key(&self) -> &[u8] {
        &self.creator_key
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// The exact bytes a signature over `payload` commits to.
    pub fn signed_bytes(&self, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.nonce.len() + self.creator_key.len() + payload.len());
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.creator_key);
        buf.extend_from_slice(payload);
        buf
    }
}

/// A detached signature plus the header identifying its producer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSignature {
    signature_header: SignatureHeader,

    #[serde(with = "hex::serde")]
    signature: Vec<u8>,
}

impl ConfigSignature {
    pub fn new(signature_header: SignatureHeader, signature: Vec<u8>) -> Self {
        Self {
            signature_header,
            signature,
        }
    }

    pub fn signature_header(&self) -> &SignatureHeader {
        &self.signature_header
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}
