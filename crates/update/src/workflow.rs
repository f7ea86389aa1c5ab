//! The end-to-end update pipeline.
//!
//! One invocation walks fetch → transcode → mutate → diff → sign → submit
//! and stops at the first failure, tagging it with the phase it hit. Channel
//! creation runs the same pipeline against an empty original configuration,
//! since no prior state exists to fetch.

use std::sync::Arc;

use chancery_codec::ConfigCodec;
use chancery_identity::{IdentityError, IdentityProvider, SignatureCollector, SigningIdentity};
use chancery_types::{ChannelConfig, SignedUpdate, UpdateResult};
use tracing::*;

use crate::{
    ConfigEdit, ConfigMutator, ConfigSource, SubmissionClient, UpdateError, WorkflowError,
    WorkflowPhase,
};

/// Orchestrates configuration updates against one ordering service.
///
/// Holds no per-channel state; the current configuration is fetched fresh on
/// every invocation so the delta's read set always reflects live versions.
#[derive(Clone)]
pub struct UpdateWorkflow {
    codec: Arc<dyn ConfigCodec>,
    mutator: ConfigMutator,
    collector: SignatureCollector,
    provider: Arc<dyn IdentityProvider>,
    submission: SubmissionClient,
    source: Arc<dyn ConfigSource>,
}

impl std::fmt::Debug for UpdateWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateWorkflow").finish_non_exhaustive()
    }
}

impl UpdateWorkflow {
    pub fn new(
        codec: Arc<dyn ConfigCodec>,
        mutator: ConfigMutator,
        provider: Arc<dyn IdentityProvider>,
        submission: SubmissionClient,
        source: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            codec,
            mutator,
            collector: SignatureCollector::new(provider.clone()),
            provider,
            submission,
            source,
        }
    }

    /// Creates a new channel from the creation template.
    ///
    /// `signer_orgs` are the organizations whose admins endorse the creation;
    /// the first one also submits the request.
    pub async fn create_channel(
        &self,
        channel: &str,
        consortium: &str,
        org_msp_ids: Vec<String>,
        signer_orgs: &[String],
    ) -> Result<UpdateResult, WorkflowError> {
        let edit = ConfigEdit::CreateChannel {
            consortium: consortium.to_string(),
            org_msp_ids,
        };
        self.run(channel, edit, signer_orgs).await
    }

    /// Replaces one organization's anchor peer list, endorsed and submitted
    /// by that organization alone.
    pub async fn update_anchor_peer(
        &self,
        channel: &str,
        org: &str,
        msp_id: &str,
        host: &str,
        port: u16,
    ) -> Result<UpdateResult, WorkflowError> {
        let edit = ConfigEdit::AnchorPeerUpdate {
            msp_id: msp_id.to_string(),
            host: host.to_string(),
            port,
        };
        self.run(channel, edit, &[org.to_string()]).await
    }

    /// Replaces one organization's certificate revocation list, endorsed and
    /// submitted by that organization alone.
    pub async fn update_revocation_list(
        &self,
        channel: &str,
        org: &str,
        msp_id: &str,
        crl: &str,
    ) -> Result<UpdateResult, WorkflowError> {
        let edit = ConfigEdit::RevocationListUpdate {
            msp_id: msp_id.to_string(),
            crl: crl.to_string(),
        };
        self.run(channel, edit, &[org.to_string()]).await
    }

    async fn run(
        &self,
        channel: &str,
        edit: ConfigEdit,
        signer_orgs: &[String],
    ) -> Result<UpdateResult, WorkflowError> {
        let kind = edit.kind();
        info!(%channel, operation = %kind, "starting configuration update workflow");

        // Resolve the submitter before touching the network so a credential
        // problem surfaces without a wasted round trip.
        let submitter = self
            .submitter_identity(signer_orgs)
            .map_err(fail(channel, WorkflowPhase::Signing))?;

        let original_raw = match edit {
            // A channel being created has no prior configuration to fetch.
            ConfigEdit::CreateChannel { .. } => self
                .codec
                .encode(&ChannelConfig::default())
                .await
                .map_err(fail(channel, WorkflowPhase::Transcoding))?,
            _ => self
                .source
                .fetch_config(channel)
                .await
                .map_err(fail(channel, WorkflowPhase::Fetching))?,
        };

        let original = self
            .codec
            .decode(&original_raw)
            .await
            .map_err(fail(channel, WorkflowPhase::Transcoding))?;

        let modified = self
            .mutator
            .apply_edit(&original, &edit)
            .map_err(fail(channel, WorkflowPhase::Mutating))?;
        let modified_raw = self
            .codec
            .encode(&modified)
            .await
            .map_err(fail(channel, WorkflowPhase::Transcoding))?;

        let delta = self
            .codec
            .compute_update(&original_raw, &modified_raw, channel)
            .await
            .map_err(fail(channel, WorkflowPhase::Diffing))?;
        if delta.is_noop() {
            warn!(%channel, operation = %kind, "computed delta is empty, submitting anyway");
        }
        let encoded_delta = self
            .codec
            .encode_update(&delta)
            .await
            .map_err(fail(channel, WorkflowPhase::Transcoding))?;

        let signatures = self
            .collector
            .collect(&encoded_delta, signer_orgs)
            .await
            .map_err(fail(channel, WorkflowPhase::Signing))?;
        debug!(%channel, count = signatures.len(), "endorsement signatures collected");

        let signed = SignedUpdate::new(encoded_delta, signatures);
        self.submission
            .submit(channel, kind, signed, &submitter.creator_key())
            .await
            .map_err(|e| WorkflowError::new(channel, WorkflowPhase::Submitting, e))
    }

    fn submitter_identity(&self, signer_orgs: &[String]) -> Result<SigningIdentity, IdentityError> {
        let org = signer_orgs
            .first()
            .ok_or_else(|| IdentityError::NotFound("no signing organizations given".to_string()))?;
        self.provider.admin_identity(org)
    }
}

fn fail<E: Into<UpdateError>>(
    channel: &str,
    phase: WorkflowPhase,
) -> impl FnOnce(E) -> WorkflowError + '_ {
    move |e| WorkflowError::new(channel, phase, e.into())
}
