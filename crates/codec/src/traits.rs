//! The transcoding port.

use chancery_types::{ChannelConfig, ConfigUpdate};

use crate::CodecError;

/// Converts between the canonical binary configuration encoding and the
/// editable structured form, and computes minimal deltas.
///
/// Implementations must be deterministic: encoding the same tree twice
/// yields identical bytes, otherwise the read-set check at the orderer
/// becomes unreliable.
#[async_trait::async_trait]
pub trait ConfigCodec: Send + Sync {
    /// Decodes a canonical binary blob into the structured form.
    async fn decode(&self, raw: &[u8]) -> Result<ChannelConfig, CodecError>;

    /// Encodes a structured configuration into canonical bytes.
    async fn encode(&self, config: &ChannelConfig) -> Result<Vec<u8>, CodecError>;

    /// Encodes a computed delta into canonical bytes for signing.
    async fn encode_update(&self, update: &ConfigUpdate) -> Result<Vec<u8>, CodecError>;

    /// Computes the minimal delta between two canonical-encoded
    /// configurations of the same channel.
    async fn compute_update(
        &self,
        original: &[u8],
        updated: &[u8],
        channel_id: &str,
    ) -> Result<ConfigUpdate, CodecError>;
}
