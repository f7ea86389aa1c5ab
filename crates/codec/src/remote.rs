//! Adapter for an external transcoding service.
//!
//! Kept for deployments that already run a protolator-style transcoder; the
//! service is a black box reachable over a local endpoint. Any failure to
//! reach it, and any non-success reply, is fatal to the workflow that hit
//! it — there is no local fallback or retry here.

use chancery_types::{ChannelConfig, ConfigUpdate};
use serde_json::json;
use tracing::*;

use crate::{CodecError, ConfigCodec};

/// Paths on the transcoding service, relative to its base URL.
const DECODE_CONFIG_PATH: &str = "protolator/decode/common.Config";
const ENCODE_CONFIG_PATH: &str = "protolator/encode/common.Config";
const DECODE_UPDATE_PATH: &str = "protolator/decode/common.ConfigUpdate";
const ENCODE_UPDATE_PATH: &str = "protolator/encode/common.ConfigUpdate";
const COMPUTE_UPDATE_PATH: &str = "configtxlator/compute/update-from-configs";

/// HTTP client for a remote transcoding service.
#[derive(Clone, Debug)]
pub struct RemoteCodec {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteCodec {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:7059`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post_bytes(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        let url = self.url(path);
        trace!(%url, len = body.len(), "posting to transcoding service");

        let resp = self
            .client
            .post(&url)
            .body(body)
            .send()
            .await
            .map_err(|e| CodecError::Unreachable(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CodecError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(CodecError::Rejected {
                status: status.as_u16(),
                detail: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ConfigCodec for RemoteCodec {
    async fn decode(&self, raw: &[u8]) -> Result<ChannelConfig, CodecError> {
        if raw.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let body = self.post_bytes(DECODE_CONFIG_PATH, raw.to_vec()).await?;
        serde_json::from_slice(&body).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    async fn encode(&self, config: &ChannelConfig) -> Result<Vec<u8>, CodecError> {
        let body = serde_json::to_vec(config).map_err(|e| CodecError::Malformed(e.to_string()))?;
        self.post_bytes(ENCODE_CONFIG_PATH, body).await
    }

    async fn encode_update(&self, update: &ConfigUpdate) -> Result<Vec<u8>, CodecError> {
        if update.channel_id.is_empty() {
            return Err(CodecError::MissingStructure("channel_id".to_string()));
        }
        let body = serde_json::to_vec(update).map_err(|e| CodecError::Malformed(e.to_string()))?;
        self.post_bytes(ENCODE_UPDATE_PATH, body).await
    }

    async fn compute_update(
        &self,
        original: &[u8],
        updated: &[u8],
        channel_id: &str,
    ) -> Result<ConfigUpdate, CodecError> {
        let body = serde_json::to_vec(&json!({
            "channel": channel_id,
            "original": hex::encode(original),
            "updated": hex::encode(updated),
        }))
        .map_err(|e| CodecError::Malformed(e.to_string()))?;

        // The compute endpoint answers with encoded update bytes; run them
        // back through the decode endpoint to get the structured form.
        let encoded = self.post_bytes(COMPUTE_UPDATE_PATH, body).await?;
        let decoded = self.post_bytes(DECODE_UPDATE_PATH, encoded).await?;
        serde_json::from_slice(&decoded).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let codec = RemoteCodec::new(reqwest::Client::new(), "http://127.0.0.1:7059///");
        assert_eq!(
            codec.url(DECODE_CONFIG_PATH),
            "http://127.0.0.1:7059/protolator/decode/common.Config"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_maps_to_codec_error() {
        // Port 1 on localhost should refuse the connection immediately.
        let codec = RemoteCodec::new(reqwest::Client::new(), "http://127.0.0.1:1");
        let err = codec.decode(b"\x01\x02").await.unwrap_err();
        assert!(matches!(err, CodecError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_decode_rejects_empty_blob_before_network() {
        let codec = RemoteCodec::new(reqwest::Client::new(), "http://127.0.0.1:1");
        let err = codec.decode(&[]).await.unwrap_err();
        assert!(matches!(err, CodecError::EmptyInput));
    }
}
