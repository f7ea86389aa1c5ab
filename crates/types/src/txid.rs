//! Transaction identifiers for update submissions.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte transaction identifier, unique per submission.
///
/// Derived as `sha256(nonce || creator_key)` with a fresh nonce, so two
/// submissions never share an id. Reusing one is a caller error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId(#[serde(with = "hex::serde")] [u8; 32]);

impl TxId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derives a fresh id for a submission by the given creator.
    pub fn generate(creator_key: &[u8]) -> Self {
        let mut nonce = [0u8; 24];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::from_parts(&nonce, creator_key)
    }

    /// Deterministic derivation from an explicit nonce, for tests.
    pub fn from_parts(nonce: &[u8], creator_key: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(nonce);
        hasher.update(creator_key);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
