//! In-process codec over the canonical deterministic encoding.
//!
//! The canonical binary form is the key-ordered JSON encoding of the typed
//! tree (all maps are `BTreeMap`s, so byte output is deterministic). Keeping
//! the codec in process removes a network hop and a failure mode compared
//! to delegating to a transcoding service.

use chancery_types::{ChannelConfig, ConfigUpdate};
use tracing::*;

use crate::{diff::compute_update_from_configs, CodecError, ConfigCodec};

/// The in-process codec. Stateless.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeCodec;

impl NativeCodec {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ConfigCodec for NativeCodec {
    async fn decode(&self, raw: &[u8]) -> Result<ChannelConfig, CodecError> {
        if raw.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let config: ChannelConfig =
            serde_json::from_slice(raw).map_err(|e| CodecError::Malformed(e.to_string()))?;
        Ok(config)
    }

    async fn encode(&self, config: &ChannelConfig) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(config).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    async fn encode_update(&self, update: &ConfigUpdate) -> Result<Vec<u8>, CodecError> {
        if update.channel_id.is_empty() {
            return Err(CodecError::MissingStructure("channel_id".to_string()));
        }
        serde_json::to_vec(update).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    async fn compute_update(
        &self,
        original: &[u8],
        updated: &[u8],
        channel_id: &str,
    ) -> Result<ConfigUpdate, CodecError> {
        let original = self.decode(original).await?;
        let updated = self.decode(updated).await?;
        let update = compute_update_from_configs(&original, &updated, channel_id);
        if update.is_noop() {
            debug!(%channel_id, "computed delta is a no-op");
        }
        Ok(update)
    }
}
