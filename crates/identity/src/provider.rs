//! Resolving organizations to their administrative signing identities.

use std::{collections::BTreeMap, path::PathBuf};

use crate::{IdentityError, SigningIdentity};

/// Resolves an organization name to its administrative signing identity.
pub trait IdentityProvider: Send + Sync {
    fn admin_identity(&self, org: &str) -> Result<SigningIdentity, IdentityError>;
}

/// Where one organization's credentials live.
#[derive(Clone, Debug)]
pub struct OrgCredentials {
    /// MSP id the organization signs as (e.g. `Org1MSP`).
    pub msp_id: String,

    /// Path to the hex-encoded admin secret key file.
    pub admin_key: PathBuf,
}

/// File-backed identity provider over an explicit per-organization map.
///
/// The map is passed in at construction; there is deliberately no ambient
/// process-wide registry, so independent instances can serve different
/// organization sets in parallel.
#[derive(Clone, Debug, Default)]
pub struct FileIdentityProvider {
    orgs: BTreeMap<String, OrgCredentials>,
}

impl FileIdentityProvider {
    pub fn new(orgs: BTreeMap<String, OrgCredentials>) -> Self {
        Self { orgs }
    }
}

impl IdentityProvider for FileIdentityProvider {
    fn admin_identity(&self, org: &str) -> Result<SigningIdentity, IdentityError> {
        let creds = self
            .orgs
            .get(org)
            .ok_or_else(|| IdentityError::NotFound(org.to_string()))?;

        let hex_key = std::fs::read_to_string(&creds.admin_key).map_err(|e| {
            IdentityError::MissingAdminKey {
                org: org.to_string(),
                path: creds.admin_key.clone(),
                reason: e.to_string(),
            }
        })?;

        SigningIdentity::from_hex_key(creds.msp_id.clone(), &hex_key)
    }
}
