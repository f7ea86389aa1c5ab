//! Submission to the ordering service and outcome interpretation.

use std::sync::Arc;

use chancery_types::{
    BroadcastResponse, SignedUpdate, TransportError, TxId, UpdateKind, UpdateRequest, UpdateResult,
};
use tracing::*;

use crate::UpdateError;

/// Fetches the current canonical configuration of a channel.
#[async_trait::async_trait]
pub trait ConfigSource: Send + Sync {
    /// Returns the channel's current configuration in canonical binary form.
    async fn fetch_config(&self, channel: &str) -> Result<Vec<u8>, TransportError>;
}

/// Broadcasts a signed update request to the ordering service.
#[async_trait::async_trait]
pub trait OrdererClient: Send + Sync {
    async fn broadcast(
        &self,
        kind: UpdateKind,
        request: &UpdateRequest,
    ) -> Result<BroadcastResponse, TransportError>;
}

/// HTTP gateway adapter for the ordering service.
///
/// Channel creation and config updates go to separate endpoints; the gateway
/// also exposes the current channel configuration, so this client doubles as
/// the workflow's [`ConfigSource`].
#[derive(Clone, Debug)]
pub struct HttpOrdererClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrdererClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint_for(&self, kind: UpdateKind, channel: &str) -> String {
        match kind {
            UpdateKind::CreateChannel => format!("{}/channels", self.base_url),
            UpdateKind::AnchorPeerUpdate | UpdateKind::RevocationListUpdate => {
                format!("{}/channels/{channel}/config-update", self.base_url)
            }
        }
    }
}

fn send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

#[async_trait::async_trait]
impl OrdererClient for HttpOrdererClient {
    async fn broadcast(
        &self,
        kind: UpdateKind,
        request: &UpdateRequest,
    ) -> Result<BroadcastResponse, TransportError> {
        let url = self.endpoint_for(kind, request.channel_name());
        trace!(%url, tx_id = %request.tx_id(), "broadcasting update request");

        let reply = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;
        reply
            .json::<BroadcastResponse>()
            .await
            .map_err(|e| TransportError::MalformedReply(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ConfigSource for HttpOrdererClient {
    async fn fetch_config(&self, channel: &str) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/channels/{channel}/config", self.base_url);
        trace!(%url, "fetching current channel configuration");

        let reply = self.client.get(&url).send().await.map_err(send_error)?;
        let body = reply
            .bytes()
            .await
            .map_err(|e| TransportError::MalformedReply(e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Wraps a signed update into a request, broadcasts it and interprets the
/// broadcast status.
#[derive(Clone)]
pub struct SubmissionClient {
    orderer: Arc<dyn OrdererClient>,
}

impl std::fmt::Debug for SubmissionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionClient").finish_non_exhaustive()
    }
}

impl SubmissionClient {
    pub fn new(orderer: Arc<dyn OrdererClient>) -> Self {
        Self { orderer }
    }

    /// Submits one signed update and maps the outcome.
    ///
    /// A fresh transaction id is minted per call, so resubmitting the same
    /// delta is a new transaction as far as the orderer is concerned. Any
    /// non-success status is an error; no retry happens here.
    pub async fn submit(
        &self,
        channel: &str,
        kind: UpdateKind,
        update: SignedUpdate,
        creator_key: &[u8],
    ) -> Result<UpdateResult, UpdateError> {
        let tx_id = TxId::generate(creator_key);
        let request = UpdateRequest::new(update, channel, tx_id);
        info!(%channel, operation = %kind, tx_id = %request.tx_id(), "submitting update");

        let response = self.orderer.broadcast(kind, &request).await?;
        if response.status().is_success() {
            let message = success_message(kind, channel);
            info!(%channel, %message, "ordering service accepted update");
            Ok(UpdateResult::ok(message))
        } else {
            warn!(%channel, status = %response.status(), "ordering service rejected update");
            Err(UpdateError::SubmissionRejected {
                channel: channel.to_string(),
                operation: kind,
                status: response.status(),
                info: response.info().to_string(),
            })
        }
    }
}

fn success_message(kind: UpdateKind, channel: &str) -> String {
    match kind {
        UpdateKind::CreateChannel => format!("Channel '{channel}' created Successfully"),
        UpdateKind::AnchorPeerUpdate => {
            format!("Channel '{channel}' updated with Anchor peer Successfully")
        }
        UpdateKind::RevocationListUpdate => {
            format!("Channel '{channel}' revocation list updated Successfully")
        }
    }
}
