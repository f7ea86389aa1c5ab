//! The editable structured form of a channel configuration.
//!
//! A configuration is a hierarchical tree of groups, each carrying named
//! sub-groups (typically one per organization), named typed values and named
//! access-control policies. Every node carries a version number which the
//! ordering service uses to detect stale updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Name of the top-level group holding per-organization application config.
pub const APPLICATION_GROUP: &str = "Application";

/// Well-known value key for an organization's anchor peer list.
pub const ANCHOR_PEERS_KEY: &str = "AnchorPeers";

/// Well-known value key for an organization's membership definition.
pub const MSP_KEY: &str = "MSP";

/// A versioned node in the configuration tree.
///
/// Maps are `BTreeMap`s so the serialized form is key-ordered, which makes
/// the canonical encoding deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigGroup {
    /// Monotonically increasing version, bumped when group membership changes.
    #[serde(default)]
    pub version: u64,

    /// Policy governing modifications to this group.
    #[serde(default)]
    pub mod_policy: String,

    /// Named sub-groups, one per organization under the application group.
    #[serde(default)]
    pub groups: BTreeMap<String, ConfigGroup>,

    /// Named typed settings (anchor peer list, membership definition, ...).
    #[serde(default)]
    pub values: BTreeMap<String, ConfigValue>,

    /// Named access-control rules (Admins/Readers/Writers).
    #[serde(default)]
    pub policies: BTreeMap<String, ConfigPolicy>,
}

impl ConfigGroup {
    /// An empty group pinned at a version, used as a read/write set stub.
    pub fn at_version(version: u64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// Whether this group carries no members at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.values.is_empty() && self.policies.is_empty()
    }

    /// Looks up a nested sub-group by path.
    pub fn group_path(&self, path: &[&str]) -> Option<&ConfigGroup> {
        let mut cur = self;
        for seg in path {
            cur = cur.groups.get(*seg)?;
        }
        Some(cur)
    }
}

/// A versioned typed setting.
///
/// The payload is schema-opaque JSON; the orchestration layer only ever
/// rewrites the specific fields an edit targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub mod_policy: String,

    /// Opaque typed payload.
    #[serde(default)]
    pub value: JsonValue,
}

impl ConfigValue {
    pub fn new(version: u64, mod_policy: impl Into<String>, value: JsonValue) -> Self {
        Self {
            version,
            mod_policy: mod_policy.into(),
            value,
        }
    }
}

/// A versioned access-control rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPolicy {
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub mod_policy: String,

    /// Opaque policy body.
    #[serde(default)]
    pub policy: JsonValue,
}

/// A full decoded channel configuration.
///
/// Fetched fresh for every workflow invocation; caching one across calls
/// would corrupt the optimistic read-set check at the orderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Config sequence number assigned by the ordering service.
    #[serde(default)]
    pub sequence: u64,

    /// Root of the configuration tree.
    pub channel_group: ConfigGroup,
}

impl ChannelConfig {
    pub fn new(sequence: u64, channel_group: ConfigGroup) -> Self {
        Self {
            sequence,
            channel_group,
        }
    }

    /// The application group holding per-organization sub-groups, if present.
    pub fn application_group(&self) -> Option<&ConfigGroup> {
        self.channel_group.groups.get(APPLICATION_GROUP)
    }
}
