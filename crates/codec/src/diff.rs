//! Minimal delta computation between two configuration trees.
//!
//! The diff is subtree-local: the sets produced for a node depend only on
//! that node's original and updated state, so edits under disjoint subtrees
//! commute and the delta for a given (original, final) pair is independent
//! of the order the edits were applied in.
//!
//! Member partition rules:
//! - unchanged members are omitted from both sets;
//! - modified members appear in the read set as a version-only witness at
//!   their prior version and in the write set at prior version + 1;
//! - added members appear only in the write set, at version 0;
//! - an addition or removal (or a mod_policy change) marks the parent
//!   group's membership updated, which bumps the parent's own version in
//!   the write set and carries its unchanged members into both sets.

use std::collections::BTreeMap;

use chancery_types::{ChannelConfig, ConfigGroup, ConfigPolicy, ConfigUpdate, ConfigValue};
use serde_json::Value as JsonValue;

/// Computes the minimal update turning `original` into `updated`.
///
/// Identical inputs produce an update whose write set is empty (a no-op
/// delta), not an error; whether to submit one is the caller's policy.
pub fn compute_update_from_configs(
    original: &ChannelConfig,
    updated: &ChannelConfig,
    channel_id: &str,
) -> ConfigUpdate {
    let (read_set, write_set, _) =
        compute_group_update(&original.channel_group, &updated.channel_group);
    ConfigUpdate::new(channel_id, read_set, write_set)
}

/// Diffs one group level, returning (read set, write set, updated).
fn compute_group_update(
    original: &ConfigGroup,
    updated: &ConfigGroup,
) -> (ConfigGroup, ConfigGroup, bool) {
    let (v_read, v_write, v_same, v_members_updated) =
        compute_values_update(&original.values, &updated.values);
    let (p_read, p_write, p_same, p_members_updated) =
        compute_policies_update(&original.policies, &updated.policies);
    let (g_read, g_write, g_same, g_members_updated) =
        compute_groups_update(&original.groups, &updated.groups);

    let members_updated = v_members_updated
        || p_members_updated
        || g_members_updated
        || original.mod_policy != updated.mod_policy;

    if !members_updated {
        // No additions/removals anywhere at this level. If nothing nested
        // changed either, both sets collapse to a version-only stub.
        if v_read.is_empty()
            && p_read.is_empty()
            && g_read.is_empty()
            && v_write.is_empty()
            && p_write.is_empty()
            && g_write.is_empty()
        {
            return (
                ConfigGroup::at_version(original.version),
                ConfigGroup::at_version(original.version),
                false,
            );
        }

        let read = ConfigGroup {
            version: original.version,
            mod_policy: String::new(),
            groups: g_read,
            values: v_read,
            policies: p_read,
        };
        let write = ConfigGroup {
            version: original.version,
            mod_policy: String::new(),
            groups: g_write,
            values: v_write,
            policies: p_write,
        };
        return (read, write, true);
    }

    // Membership changed: the group version itself bumps, and the unchanged
    // members travel in both sets so the orderer can validate the full
    // membership at the bumped version.
    let read = ConfigGroup {
        version: original.version,
        mod_policy: String::new(),
        groups: merged(g_read, g_same.clone()),
        values: merged(v_read, v_same.clone()),
        policies: merged(p_read, p_same.clone()),
    };
    let write = ConfigGroup {
        version: original.version + 1,
        mod_policy: updated.mod_policy.clone(),
        groups: merged(g_write, g_same),
        values: merged(v_write, v_same),
        policies: merged(p_write, p_same),
    };
    (read, write, true)
}

fn merged<T>(mut base: BTreeMap<String, T>, extra: BTreeMap<String, T>) -> BTreeMap<String, T> {
    base.extend(extra);
    base
}

type ValueSets = (
    BTreeMap<String, ConfigValue>,
    BTreeMap<String, ConfigValue>,
    BTreeMap<String, ConfigValue>,
    bool,
);

fn compute_values_update(
    original: &BTreeMap<String, ConfigValue>,
    updated: &BTreeMap<String, ConfigValue>,
) -> ValueSets {
    let mut read = BTreeMap::new();
    let mut write = BTreeMap::new();
    let mut same = BTreeMap::new();
    let mut members_updated = false;

    for (key, orig_value) in original {
        match updated.get(key) {
            None => members_updated = true,
            Some(upd_value) if upd_value == orig_value => {
                same.insert(key.clone(), orig_value.clone());
            }
            Some(upd_value) => {
                // Version-only witness at the prior version.
                read.insert(
                    key.clone(),
                    ConfigValue::new(orig_value.version, "", JsonValue::Null),
                );
                write.insert(
                    key.clone(),
                    ConfigValue::new(
                        orig_value.version + 1,
                        upd_value.mod_policy.clone(),
                        upd_value.value.clone(),
                    ),
                );
            }
        }
    }

    for (key, upd_value) in updated {
        if !original.contains_key(key) {
            members_updated = true;
            write.insert(
                key.clone(),
                ConfigValue::new(0, upd_value.mod_policy.clone(), upd_value.value.clone()),
            );
        }
    }

    (read, write, same, members_updated)
}

type PolicySets = (
    BTreeMap<String, ConfigPolicy>,
    BTreeMap<String, ConfigPolicy>,
    BTreeMap<String, ConfigPolicy>,
    bool,
);

fn compute_policies_update(
    original: &BTreeMap<String, ConfigPolicy>,
    updated: &BTreeMap<String, ConfigPolicy>,
) -> PolicySets {
    let mut read = BTreeMap::new();
    let mut write = BTreeMap::new();
    let mut same = BTreeMap::new();
    let mut members_updated = false;

    for (key, orig_policy) in original {
        match updated.get(key) {
            None => members_updated = true,
            Some(upd_policy) if upd_policy == orig_policy => {
                same.insert(key.clone(), orig_policy.clone());
            }
            Some(upd_policy) => {
                read.insert(
                    key.clone(),
                    ConfigPolicy {
                        version: orig_policy.version,
                        mod_policy: String::new(),
                        policy: JsonValue::Null,
                    },
                );
                write.insert(
                    key.clone(),
                    ConfigPolicy {
                        version: orig_policy.version + 1,
                        mod_policy: upd_policy.mod_policy.clone(),
                        policy: upd_policy.policy.clone(),
                    },
                );
            }
        }
    }

    for (key, upd_policy) in updated {
        if !original.contains_key(key) {
            members_updated = true;
            write.insert(
                key.clone(),
                ConfigPolicy {
                    version: 0,
                    mod_policy: upd_policy.mod_policy.clone(),
                    policy: upd_policy.policy.clone(),
                },
            );
        }
    }

    (read, write, same, members_updated)
}

type GroupSets = (
    BTreeMap<String, ConfigGroup>,
    BTreeMap<String, ConfigGroup>,
    BTreeMap<String, ConfigGroup>,
    bool,
);

fn compute_groups_update(
    original: &BTreeMap<String, ConfigGroup>,
    updated: &BTreeMap<String, ConfigGroup>,
) -> GroupSets {
    let mut read = BTreeMap::new();
    let mut write = BTreeMap::new();
    let mut same = BTreeMap::new();
    let mut members_updated = false;

    for (key, orig_group) in original {
        match updated.get(key) {
            None => members_updated = true,
            Some(upd_group) => {
                let (group_read, group_write, group_updated) =
                    compute_group_update(orig_group, upd_group);
                if group_updated {
                    read.insert(key.clone(), group_read);
                    write.insert(key.clone(), group_write);
                } else {
                    // Unchanged sub-group: version-only stub.
                    same.insert(key.clone(), group_read);
                }
            }
        }
    }

    for (key, upd_group) in updated {
        if !original.contains_key(key) {
            members_updated = true;
            let mut fresh = upd_group.clone();
            // A node the orderer has never seen starts at version 0.
            fresh.version = 0;
            write.insert(key.clone(), fresh);
        }
    }

    (read, write, same, members_updated)
}

#[cfg(test)]
mod tests {
    use chancery_types::APPLICATION_GROUP;
    use serde_json::json;

    use super::*;

    fn value(version: u64, body: JsonValue) -> ConfigValue {
        ConfigValue::new(version, "Admins", body)
    }

    fn org_group(anchor_host: &str) -> ConfigGroup {
        let mut org = ConfigGroup::default();
        org.version = 1;
        org.mod_policy = "Admins".to_string();
        org.values.insert(
            "AnchorPeers".to_string(),
            value(2, json!({ "anchor_peers": [{ "host": anchor_host, "port": 7051 }] })),
        );
        org.values
            .insert("MSP".to_string(), value(0, json!({ "config": {} })));
        org
    }

    fn sample_config() -> ChannelConfig {
        let mut app = ConfigGroup::default();
        app.version = 1;
        app.mod_policy = "Admins".to_string();
        app.groups
            .insert("Org1MSP".to_string(), org_group("peer0.org1.example.com"));
        app.groups
            .insert("Org2MSP".to_string(), org_group("peer0.org2.example.com"));

        let mut root = ConfigGroup::default();
        root.version = 4;
        root.groups.insert(APPLICATION_GROUP.to_string(), app);
        ChannelConfig::new(7, root)
    }

    #[test]
    fn test_identical_configs_give_noop_delta() {
        let config = sample_config();
        let update = compute_update_from_configs(&config, &config, "mychannel");

        assert!(update.is_noop(), "no-op edit should produce no delta");
        assert!(update.write_set.is_empty());
        assert_eq!(update.read_set.version, config.channel_group.version);
        assert_eq!(update.channel_id, "mychannel");
    }

    #[test]
    fn test_modified_value_bumps_version_with_read_witness() {
        let original = sample_config();
        let mut updated = original.clone();
        let org = updated
            .channel_group
            .groups
            .get_mut(APPLICATION_GROUP)
            .unwrap()
            .groups
            .get_mut("Org1MSP")
            .unwrap();
        org.values.insert(
            "AnchorPeers".to_string(),
            value(2, json!({ "anchor_peers": [{ "host": "peer1.org1.example.com", "port": 8051 }] })),
        );

        let update = compute_update_from_configs(&original, &updated, "mychannel");

        let write_org = update
            .write_set
            .group_path(&[APPLICATION_GROUP, "Org1MSP"])
            .expect("org in write set");
        let written = &write_org.values["AnchorPeers"];
        assert_eq!(written.version, 3, "prior version 2 should bump to 3");
        assert_eq!(
            written.value["anchor_peers"][0]["host"],
            "peer1.org1.example.com"
        );

        let read_org = update
            .read_set
            .group_path(&[APPLICATION_GROUP, "Org1MSP"])
            .expect("org in read set");
        assert_eq!(
            read_org.values["AnchorPeers"].version, 2,
            "read set should witness the prior version"
        );

        // The untouched sibling value is omitted: only changed members appear.
        assert!(!write_org.values.contains_key("MSP"));

        // Only nested modifications: the group version itself does not bump.
        assert_eq!(write_org.version, 1);

        // The untouched sibling org collapses out of both sets entirely.
        assert!(update
            .write_set
            .group_path(&[APPLICATION_GROUP, "Org2MSP"])
            .is_none());
    }

    #[test]
    fn test_added_org_group_bumps_parent_and_starts_at_zero() {
        let original = sample_config();
        let mut updated = original.clone();
        updated
            .channel_group
            .groups
            .get_mut(APPLICATION_GROUP)
            .unwrap()
            .groups
            .insert("Org3MSP".to_string(), org_group("peer0.org3.example.com"));

        let update = compute_update_from_configs(&original, &updated, "mychannel");

        let write_app = update
            .write_set
            .group_path(&[APPLICATION_GROUP])
            .expect("application group in write set");
        assert_eq!(
            write_app.version, 2,
            "membership change should bump the parent from 1 to 2"
        );
        assert_eq!(write_app.groups["Org3MSP"].version, 0);

        // Unchanged orgs travel in both sets so membership validates whole.
        assert!(write_app.groups.contains_key("Org1MSP"));
        let read_app = update
            .read_set
            .group_path(&[APPLICATION_GROUP])
            .expect("application group in read set");
        assert_eq!(read_app.version, 1, "read set pins the prior version");
        assert!(read_app.groups.contains_key("Org1MSP"));
        assert!(!read_app.groups.contains_key("Org3MSP"));
    }

    #[test]
    fn test_removed_value_marks_membership_updated() {
        let original = sample_config();
        let mut updated = original.clone();
        updated
            .channel_group
            .groups
            .get_mut(APPLICATION_GROUP)
            .unwrap()
            .groups
            .get_mut("Org1MSP")
            .unwrap()
            .values
            .remove("AnchorPeers");

        let update = compute_update_from_configs(&original, &updated, "mychannel");

        let write_org = update
            .write_set
            .group_path(&[APPLICATION_GROUP, "Org1MSP"])
            .expect("org in write set");
        assert_eq!(write_org.version, 2, "removal bumps the org group");
        assert!(!write_org.values.contains_key("AnchorPeers"));
        assert!(
            write_org.values.contains_key("MSP"),
            "surviving members travel in the write set"
        );
    }

    #[test]
    fn test_compute_update_is_order_independent() {
        let original = sample_config();

        // Same final state assembled in two different orders.
        let mut a = original.clone();
        {
            let app = a.channel_group.groups.get_mut(APPLICATION_GROUP).unwrap();
            app.groups.get_mut("Org1MSP").unwrap().values.insert(
                "AnchorPeers".to_string(),
                value(2, json!({ "anchor_peers": [{ "host": "h1", "port": 1 }] })),
            );
            app.groups.get_mut("Org2MSP").unwrap().values.insert(
                "MSP".to_string(),
                value(0, json!({ "config": { "revocation_list": ["crl"] } })),
            );
        }
        let mut b = original.clone();
        {
            let app = b.channel_group.groups.get_mut(APPLICATION_GROUP).unwrap();
            app.groups.get_mut("Org2MSP").unwrap().values.insert(
                "MSP".to_string(),
                value(0, json!({ "config": { "revocation_list": ["crl"] } })),
            );
            app.groups.get_mut("Org1MSP").unwrap().values.insert(
                "AnchorPeers".to_string(),
                value(2, json!({ "anchor_peers": [{ "host": "h1", "port": 1 }] })),
            );
        }

        let delta_a = compute_update_from_configs(&original, &a, "mychannel");
        let delta_b = compute_update_from_configs(&original, &b, "mychannel");
        assert_eq!(
            delta_a, delta_b,
            "non-overlapping edits should yield structurally equal deltas"
        );
    }

    #[test]
    fn test_every_bumped_write_node_has_read_witness() {
        let original = sample_config();
        let mut updated = original.clone();
        let app = updated
            .channel_group
            .groups
            .get_mut(APPLICATION_GROUP)
            .unwrap();
        app.groups.get_mut("Org1MSP").unwrap().values.insert(
            "AnchorPeers".to_string(),
            value(2, json!({ "anchor_peers": [] })),
        );
        app.groups
            .insert("Org3MSP".to_string(), org_group("peer0.org3.example.com"));

        let update = compute_update_from_configs(&original, &updated, "mychannel");
        assert_read_witnesses(&update.read_set, &update.write_set);
    }

    /// Every write-set value with a non-zero version bump must appear in the
    /// read set at its prior version.
    fn assert_read_witnesses(read: &ConfigGroup, write: &ConfigGroup) {
        for (key, wv) in &write.values {
            if wv.version > 0 {
                let rv = read
                    .values
                    .get(key)
                    .unwrap_or_else(|| panic!("bumped value {key} missing read witness"));
                assert_eq!(rv.version + 1, wv.version);
            }
        }
        for (key, wg) in &write.groups {
            if let Some(rg) = read.groups.get(key) {
                assert!(wg.version == rg.version || wg.version == rg.version + 1);
                assert_read_witnesses(rg, wg);
            } else {
                assert_eq!(wg.version, 0, "write-only group {key} must be fresh");
            }
        }
    }
}
