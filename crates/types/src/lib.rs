//! Shared types for channel configuration update orchestration.
//!
//! The editable structured form of a channel configuration, the minimal
//! update (read set / write set) computed against it, and the envelope
//! types exchanged with the ordering service.

mod broadcast;
mod config_tree;
mod signature;
mod transport;
mod txid;
mod update;

pub use broadcast::{BroadcastResponse, BroadcastStatus};
pub use config_tree::{
    ChannelConfig, ConfigGroup, ConfigPolicy, ConfigValue, ANCHOR_PEERS_KEY, APPLICATION_GROUP,
    MSP_KEY,
};
pub use signature::{ConfigSignature, SignatureHeader, NONCE_LEN};
pub use transport::TransportError;
pub use txid::TxId;
pub use update::{ConfigUpdate, SignedUpdate, UpdateKind, UpdateRequest, UpdateResult};
