//! An organization's administrative signing identity.

use chancery_types::{ConfigSignature, SignatureHeader, NONCE_LEN};
use rand::RngCore;
use secp256k1::{ecdsa::Signature, Message, PublicKey, SecretKey, SECP256K1};
use sha2::{Digest, Sha256};

use crate::IdentityError;

/// A signing identity: the organization's MSP id plus its admin keypair.
#[derive(Clone)]
pub struct SigningIdentity {
    msp_id: String,
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret key.
        f.debug_struct("SigningIdentity")
            .field("msp_id", &self.msp_id)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl SigningIdentity {
    pub fn new(msp_id: impl Into<String>, secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key(SECP256K1);
        Self {
            msp_id: msp_id.into(),
            secret_key,
            public_key,
        }
    }

    /// Parses a 32-byte hex-encoded secret key.
    pub fn from_hex_key(msp_id: impl Into<String>, hex_key: &str) -> Result<Self, IdentityError> {
        let msp_id = msp_id.into();
        let bytes = hex::decode(hex_key.trim()).map_err(|e| IdentityError::InvalidKey {
            org: msp_id.clone(),
            reason: e.to_string(),
        })?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(|e| IdentityError::InvalidKey {
            org: msp_id.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(msp_id, secret_key))
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Serialized (compressed) public key, used as the creator bytes.
    pub fn creator_key(&self) -> Vec<u8> {
        self.public_key.serialize().to_vec()
    }

    /// Produces a detached endorsement signature over `payload`.
    ///
    /// A fresh nonce goes into the signature header, so repeated calls over
    /// the same payload yield distinct signature bytes; each verifies on its
    /// own against this identity's public key.
    pub fn sign_payload(&self, payload: &[u8]) -> Result<ConfigSignature, IdentityError> {
        let mut nonce = vec![0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let header = SignatureHeader::new(self.msp_id.clone(), self.creator_key(), nonce);
        let digest: [u8; 32] = Sha256::digest(header.signed_bytes(payload)).into();
        let msg = Message::from_digest(digest);
        let sig = SECP256K1.sign_ecdsa(&msg, &self.secret_key);

        Ok(ConfigSignature::new(header, sig.serialize_der().to_vec()))
    }
}

/// Verifies a detached signature against the public key carried in its own
/// header. Quorum evaluation stays with the ordering service; this only
/// checks individual validity.
pub fn verify_signature(sig: &ConfigSignature, payload: &[u8]) -> bool {
    let header = sig.signature_header();
    let Ok(public_key) = PublicKey::from_slice(header.creator_key()) else {
        return false;
    };
    let Ok(parsed) = Signature::from_der(sig.signature()) else {
        return false;
    };
    let digest: [u8; 32] = Sha256::digest(header.signed_bytes(payload)).into();
    let msg = Message::from_digest(digest);
    SECP256K1.verify_ecdsa(&msg, &parsed, &public_key).is_ok()
}
