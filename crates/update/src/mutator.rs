//! Applying a high-level edit to a decoded configuration tree.
//!
//! Edits are pure: the mutator clones the input tree, rewrites exactly the
//! nodes the edit targets and leaves everything else untouched, so the diff
//! stage sees the smallest possible change.

use std::sync::Arc;

use chancery_types::{
    ChannelConfig, ConfigValue, UpdateKind, ANCHOR_PEERS_KEY, APPLICATION_GROUP, MSP_KEY,
};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::*;

use crate::{MutationError, TemplateStore};

/// Key under the channel group holding the consortium a new channel joins.
const CONSORTIUM_KEY: &str = "Consortium";

/// Key inside an MSP config body holding the revocation list.
const REVOCATION_LIST_KEY: &str = "revocation_list";

/// The closed set of supported configuration edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigEdit {
    /// Stamp out a new channel from the creation template.
    CreateChannel {
        consortium: String,
        org_msp_ids: Vec<String>,
    },

    /// Replace one organization's anchor peer list with a single peer.
    AnchorPeerUpdate {
        msp_id: String,
        host: String,
        port: u16,
    },

    /// Replace one organization's certificate revocation list.
    RevocationListUpdate { msp_id: String, crl: String },
}

impl ConfigEdit {
    /// The orderer operation this edit maps to.
    pub fn kind(&self) -> UpdateKind {
        match self {
            Self::CreateChannel { .. } => UpdateKind::CreateChannel,
            Self::AnchorPeerUpdate { .. } => UpdateKind::AnchorPeerUpdate,
            Self::RevocationListUpdate { .. } => UpdateKind::RevocationListUpdate,
        }
    }
}

/// Applies [`ConfigEdit`]s to configuration trees.
#[derive(Clone)]
pub struct ConfigMutator {
    templates: Arc<dyn TemplateStore>,
}

impl std::fmt::Debug for ConfigMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigMutator").finish_non_exhaustive()
    }
}

impl ConfigMutator {
    pub fn new(templates: Arc<dyn TemplateStore>) -> Self {
        Self { templates }
    }

    /// Returns a modified copy of `config` with `edit` applied.
    ///
    /// The input is never mutated. Version numbers are left as-is; bumping
    /// them is the diff stage's job, not the mutator's.
    pub fn apply_edit(
        &self,
        config: &ChannelConfig,
        edit: &ConfigEdit,
    ) -> Result<ChannelConfig, MutationError> {
        let mut modified = config.clone();
        match edit {
            ConfigEdit::CreateChannel {
                consortium,
                org_msp_ids,
            } => self.apply_creation(&mut modified, consortium, org_msp_ids)?,
            ConfigEdit::AnchorPeerUpdate { msp_id, host, port } => {
                self.apply_anchor_peer(&mut modified, msp_id, host, *port)?
            }
            ConfigEdit::RevocationListUpdate { msp_id, crl } => {
                apply_revocation_list(&mut modified, msp_id, crl)?
            }
        }
        Ok(modified)
    }

    /// Merges the creation template, the consortium name and one placeholder
    /// group per organization into the tree.
    fn apply_creation(
        &self,
        config: &mut ChannelConfig,
        consortium: &str,
        org_msp_ids: &[String],
    ) -> Result<(), MutationError> {
        let template = self.templates.creation_template()?;
        config.channel_group = template.channel_group;

        config.channel_group.values.insert(
            CONSORTIUM_KEY.to_string(),
            ConfigValue::new(0, "Admins", json!({ "name": consortium })),
        );

        let app = config
            .channel_group
            .groups
            .entry(APPLICATION_GROUP.to_string())
            .or_default();
        for msp_id in org_msp_ids {
            let placeholder = self.templates.org_placeholder()?;
            debug!(%msp_id, "adding organization placeholder to new channel");
            app.groups.insert(msp_id.clone(), placeholder);
        }
        Ok(())
    }

    /// Replaces `msp_id`'s anchor peer list with a single `host:port` entry.
    ///
    /// An organization missing from the application group gets a placeholder
    /// group first; a missing application group is an error, since anchor
    /// peers only make sense on a channel that already has one.
    fn apply_anchor_peer(
        &self,
        config: &mut ChannelConfig,
        msp_id: &str,
        host: &str,
        port: u16,
    ) -> Result<(), MutationError> {
        let app = config
            .channel_group
            .groups
            .get_mut(APPLICATION_GROUP)
            .ok_or_else(|| MutationError::MissingTargetGroup(APPLICATION_GROUP.to_string()))?;

        if !app.groups.contains_key(msp_id) {
            debug!(%msp_id, "organization absent, synthesizing placeholder group");
            let placeholder = self.templates.org_placeholder()?;
            app.groups.insert(msp_id.to_string(), placeholder);
        }
        let org = app
            .groups
            .get_mut(msp_id)
            .ok_or_else(|| MutationError::MissingTargetGroup(msp_id.to_string()))?;

        let prior_version = org
            .values
            .get(ANCHOR_PEERS_KEY)
            .map(|v| v.version)
            .unwrap_or(0);
        org.values.insert(
            ANCHOR_PEERS_KEY.to_string(),
            ConfigValue::new(
                prior_version,
                "Admins",
                json!({ "anchor_peers": [{ "host": host, "port": port }] }),
            ),
        );
        Ok(())
    }
}

/// Replaces `msp_id`'s revocation list inside its MSP config body.
///
/// Every sibling field of the MSP definition is preserved verbatim; only the
/// `revocation_list` entry is rewritten.
fn apply_revocation_list(
    config: &mut ChannelConfig,
    msp_id: &str,
    crl: &str,
) -> Result<(), MutationError> {
    let app = config
        .channel_group
        .groups
        .get_mut(APPLICATION_GROUP)
        .ok_or_else(|| MutationError::MissingTargetGroup(APPLICATION_GROUP.to_string()))?;
    let org = app
        .groups
        .get_mut(msp_id)
        .ok_or_else(|| MutationError::MissingTargetGroup(msp_id.to_string()))?;
    let msp = org
        .values
        .get_mut(MSP_KEY)
        .ok_or_else(|| MutationError::MissingMspValue(msp_id.to_string()))?;

    if msp.value.is_null() {
        msp.value = JsonValue::Object(JsonMap::new());
    }
    let body = msp
        .value
        .as_object_mut()
        .ok_or_else(|| MutationError::MissingMspValue(msp_id.to_string()))?;
    let inner = body
        .entry("config".to_string())
        .or_insert_with(|| JsonValue::Object(JsonMap::new()));
    let inner = inner
        .as_object_mut()
        .ok_or_else(|| MutationError::MissingMspValue(msp_id.to_string()))?;
    inner.insert(REVOCATION_LIST_KEY.to_string(), json!([crl]));
    Ok(())
}

#[cfg(test)]
mod tests {
    use chancery_types::ConfigGroup;

    use super::*;

    /// Fixed in-memory template store so tests need no filesystem.
    struct FixedTemplates;

    impl TemplateStore for FixedTemplates {
        fn creation_template(&self) -> Result<ChannelConfig, MutationError> {
            let mut root = ConfigGroup::default();
            root.mod_policy = "Admins".to_string();
            root.groups
                .insert(APPLICATION_GROUP.to_string(), ConfigGroup::default());
            Ok(ChannelConfig::new(0, root))
        }

        fn org_placeholder(&self) -> Result<ConfigGroup, MutationError> {
            let mut org = ConfigGroup::default();
            org.mod_policy = "Admins".to_string();
            for name in ["Admins", "Readers", "Writers"] {
                org.policies.insert(name.to_string(), Default::default());
            }
            org.values.insert(
                MSP_KEY.to_string(),
                ConfigValue::new(0, "Admins", json!({ "config": {} })),
            );
            Ok(org)
        }
    }

    fn mutator() -> ConfigMutator {
        ConfigMutator::new(Arc::new(FixedTemplates))
    }

    fn channel_with_org(msp_id: &str) -> ChannelConfig {
        let mut org = ConfigGroup::default();
        org.version = 1;
        org.values.insert(
            MSP_KEY.to_string(),
            ConfigValue::new(
                2,
                "Admins",
                json!({
                    "config": { "name": msp_id, "root_certs": ["cert-a"] }
                }),
            ),
        );

        let mut app = ConfigGroup::default();
        app.version = 1;
        app.groups.insert(msp_id.to_string(), org);

        let mut root = ConfigGroup::default();
        root.groups.insert(APPLICATION_GROUP.to_string(), app);
        ChannelConfig::new(3, root)
    }

    #[test]
    fn test_apply_edit_never_mutates_input() {
        let original = channel_with_org("Org1MSP");
        let before = original.clone();
        let edit = ConfigEdit::AnchorPeerUpdate {
            msp_id: "Org1MSP".to_string(),
            host: "peer0.org1.example.com".to_string(),
            port: 7051,
        };

        mutator().apply_edit(&original, &edit).unwrap();
        assert_eq!(original, before, "input tree must stay untouched");
    }

    #[test]
    fn test_creation_stamps_consortium_and_org_placeholders() {
        let edit = ConfigEdit::CreateChannel {
            consortium: "SampleConsortium".to_string(),
            org_msp_ids: vec!["Org1MSP".to_string(), "Org2MSP".to_string()],
        };

        let modified = mutator()
            .apply_edit(&ChannelConfig::default(), &edit)
            .unwrap();

        let consortium = modified
            .channel_group
            .values
            .get(CONSORTIUM_KEY)
            .expect("consortium value present");
        assert_eq!(consortium.value, json!({ "name": "SampleConsortium" }));

        let app = modified.application_group().expect("application group");
        assert_eq!(app.groups.len(), 2);
        for msp_id in ["Org1MSP", "Org2MSP"] {
            let org = app.groups.get(msp_id).expect("placeholder group");
            assert_eq!(org.policies.len(), 3);
            assert!(org.values.contains_key(MSP_KEY));
        }
    }

    #[test]
    fn test_anchor_peer_replaces_list_for_existing_org() {
        let config = channel_with_org("Org1MSP");
        let edit = ConfigEdit::AnchorPeerUpdate {
            msp_id: "Org1MSP".to_string(),
            host: "peer0.org1.example.com".to_string(),
            port: 7051,
        };

        let modified = mutator().apply_edit(&config, &edit).unwrap();
        let anchors = modified
            .channel_group
            .group_path(&[APPLICATION_GROUP, "Org1MSP"])
            .unwrap()
            .values
            .get(ANCHOR_PEERS_KEY)
            .expect("anchor peers value");
        assert_eq!(
            anchors.value,
            json!({ "anchor_peers": [{ "host": "peer0.org1.example.com", "port": 7051 }] })
        );
    }

    #[test]
    fn test_anchor_peer_synthesizes_missing_org_group() {
        let config = channel_with_org("Org1MSP");
        let edit = ConfigEdit::AnchorPeerUpdate {
            msp_id: "Org2MSP".to_string(),
            host: "peer0.org2.example.com".to_string(),
            port: 8051,
        };

        let modified = mutator().apply_edit(&config, &edit).unwrap();
        let org = modified
            .channel_group
            .group_path(&[APPLICATION_GROUP, "Org2MSP"])
            .expect("synthesized org group");
        assert!(org.values.contains_key(ANCHOR_PEERS_KEY));
        assert!(org.values.contains_key(MSP_KEY), "placeholder MSP present");
    }

    #[test]
    fn test_anchor_peer_without_application_group_fails() {
        let edit = ConfigEdit::AnchorPeerUpdate {
            msp_id: "Org1MSP".to_string(),
            host: "peer0".to_string(),
            port: 7051,
        };

        let err = mutator()
            .apply_edit(&ChannelConfig::default(), &edit)
            .unwrap_err();
        assert!(
            matches!(err, MutationError::MissingTargetGroup(ref g) if g == APPLICATION_GROUP)
        );
    }

    #[test]
    fn test_revocation_list_preserves_msp_siblings() {
        let config = channel_with_org("Org1MSP");
        let crl = "-----BEGIN X509 CRL-----\nabc\n-----END X509 CRL-----";
        let edit = ConfigEdit::RevocationListUpdate {
            msp_id: "Org1MSP".to_string(),
            crl: crl.to_string(),
        };

        let modified = mutator().apply_edit(&config, &edit).unwrap();
        let msp = modified
            .channel_group
            .group_path(&[APPLICATION_GROUP, "Org1MSP"])
            .unwrap()
            .values
            .get(MSP_KEY)
            .unwrap();

        let body = msp.value.get("config").unwrap();
        assert_eq!(
            body.get(REVOCATION_LIST_KEY).unwrap(),
            &json!([crl]),
            "CRL carried verbatim"
        );
        assert_eq!(
            body.get("name").unwrap(),
            &json!("Org1MSP"),
            "sibling fields untouched"
        );
        assert_eq!(body.get("root_certs").unwrap(), &json!(["cert-a"]));
        assert_eq!(msp.version, 2, "mutator leaves versions alone");
    }

    #[test]
    fn test_revocation_list_for_unknown_org_fails() {
        let config = channel_with_org("Org1MSP");
        let edit = ConfigEdit::RevocationListUpdate {
            msp_id: "Org9MSP".to_string(),
            crl: "crl".to_string(),
        };

        let err = mutator().apply_edit(&config, &edit).unwrap_err();
        assert!(matches!(err, MutationError::MissingTargetGroup(ref g) if g == "Org9MSP"));
    }

    #[test]
    fn test_revocation_list_without_msp_value_fails() {
        let mut config = channel_with_org("Org1MSP");
        config
            .channel_group
            .groups
            .get_mut(APPLICATION_GROUP)
            .unwrap()
            .groups
            .get_mut("Org1MSP")
            .unwrap()
            .values
            .clear();

        let edit = ConfigEdit::RevocationListUpdate {
            msp_id: "Org1MSP".to_string(),
            crl: "crl".to_string(),
        };
        let err = mutator().apply_edit(&config, &edit).unwrap_err();
        assert!(matches!(err, MutationError::MissingMspValue(_)));
    }
}
