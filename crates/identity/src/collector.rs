//! Collecting endorsement signatures from the required organizations.

use std::sync::Arc;

use chancery_types::ConfigSignature;
use tracing::*;

use crate::{IdentityError, IdentityProvider};

/// Collects one detached signature per required organization.
///
/// Signing operations are independent and commutative, so the collector
/// signs for all organizations concurrently; the result order follows the
/// requested organization order but carries no protocol meaning.
#[derive(Clone)]
pub struct SignatureCollector {
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for SignatureCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureCollector").finish_non_exhaustive()
    }
}

impl SignatureCollector {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Signs `payload` with each organization's admin identity.
    ///
    /// Fails fast on the first organization whose credential cannot be
    /// resolved; partial signature sets are never returned.
    pub async fn collect(
        &self,
        payload: &[u8],
        orgs: &[String],
    ) -> Result<Vec<ConfigSignature>, IdentityError> {
        let signings = orgs.iter().map(|org| {
            let provider = self.provider.clone();
            let payload = payload.to_vec();
            let org = org.clone();
            async move {
                let identity = provider.admin_identity(&org)?;
                debug!(%org, msp_id = %identity.msp_id(), "signing config update");
                identity.sign_payload(&payload)
            }
        });

        futures::future::try_join_all(signings).await
    }
}
