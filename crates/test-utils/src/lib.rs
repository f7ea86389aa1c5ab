//! Shared fixtures and mocks for chancery tests.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

use chancery_identity::{IdentityError, IdentityProvider, SigningIdentity};
use chancery_types::{
    BroadcastResponse, BroadcastStatus, ChannelConfig, ConfigGroup, ConfigValue, TransportError,
    UpdateKind, UpdateRequest, APPLICATION_GROUP, MSP_KEY,
};
use chancery_update::{ConfigSource, OrdererClient};
use secp256k1::SecretKey;
use serde_json::json;

/// In-memory ordering service double.
///
/// Answers every broadcast with one programmed response and records the
/// requests it saw; doubles as a [`ConfigSource`] serving one programmed
/// configuration blob.
#[derive(Debug)]
pub struct MockOrderer {
    response: BroadcastResponse,
    config: Option<Vec<u8>>,
    requests: Mutex<Vec<UpdateRequest>>,
    fetches: Mutex<usize>,
}

impl MockOrderer {
    /// Accepts every broadcast with `SUCCESS`.
    pub fn accepting() -> Self {
        Self::with_response(BroadcastResponse::success())
    }

    /// Rejects every broadcast with the given status and detail.
    pub fn rejecting(status: BroadcastStatus, info: &str) -> Self {
        Self::with_response(BroadcastResponse::new(status, info))
    }

    pub fn with_response(response: BroadcastResponse) -> Self {
        Self {
            response,
            config: None,
            requests: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
        }
    }

    /// Sets the configuration blob served to [`ConfigSource::fetch_config`].
    pub fn with_config(mut self, config: Vec<u8>) -> Self {
        self.config = Some(config);
        self
    }

    /// Every request broadcast so far, in order.
    pub fn requests(&self) -> Vec<UpdateRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    pub fn broadcast_count(&self) -> usize {
        self.requests.lock().expect("mock lock poisoned").len()
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().expect("mock lock poisoned")
    }
}

#[async_trait::async_trait]
impl OrdererClient for MockOrderer {
    async fn broadcast(
        &self,
        _kind: UpdateKind,
        request: &UpdateRequest,
    ) -> Result<BroadcastResponse, TransportError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());
        Ok(self.response.clone())
    }
}

#[async_trait::async_trait]
impl ConfigSource for MockOrderer {
    async fn fetch_config(&self, channel: &str) -> Result<Vec<u8>, TransportError> {
        *self.fetches.lock().expect("mock lock poisoned") += 1;
        self.config.clone().ok_or_else(|| {
            TransportError::Connection(format!("no configuration programmed for '{channel}'"))
        })
    }
}

/// In-memory identity provider with one fixed admin keypair per org.
#[derive(Debug)]
pub struct MapIdentityProvider(BTreeMap<String, SigningIdentity>);

impl MapIdentityProvider {
    pub fn new(identities: impl IntoIterator<Item = (String, SigningIdentity)>) -> Self {
        Self(identities.into_iter().collect())
    }
}

impl IdentityProvider for MapIdentityProvider {
    fn admin_identity(&self, org: &str) -> Result<SigningIdentity, IdentityError> {
        self.0
            .get(org)
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(org.to_string()))
    }
}

/// Deterministic admin identity for an org; `seed` picks the keypair.
pub fn org_identity(msp_id: &str, seed: u8) -> SigningIdentity {
    assert!(seed != 0, "all-zero secret keys are invalid");
    let key = SecretKey::from_slice(&[seed; 32]).expect("fixed test key");
    SigningIdentity::new(msp_id, key)
}

/// Provider with admins for `Org1` (Org1MSP) and `Org2` (Org2MSP).
pub fn two_org_provider() -> MapIdentityProvider {
    MapIdentityProvider::new([
        ("Org1".to_string(), org_identity("Org1MSP", 0x11)),
        ("Org2".to_string(), org_identity("Org2MSP", 0x22)),
    ])
}

/// A realistic two-org channel configuration at sequence 3.
pub fn sample_channel_config() -> ChannelConfig {
    let mut app = ConfigGroup {
        version: 1,
        mod_policy: "Admins".to_string(),
        ..Default::default()
    };
    for msp_id in ["Org1MSP", "Org2MSP"] {
        app.groups.insert(msp_id.to_string(), org_group(msp_id));
    }

    let mut root = ConfigGroup {
        mod_policy: "Admins".to_string(),
        ..Default::default()
    };
    root.groups.insert(APPLICATION_GROUP.to_string(), app);
    ChannelConfig::new(3, root)
}

/// A populated per-org group with a membership definition.
pub fn org_group(msp_id: &str) -> ConfigGroup {
    let mut org = ConfigGroup {
        version: 1,
        mod_policy: "Admins".to_string(),
        ..Default::default()
    };
    org.values.insert(
        MSP_KEY.to_string(),
        ConfigValue::new(
            1,
            "Admins",
            json!({
                "config": {
                    "name": msp_id,
                    "root_certs": [format!("root-cert-{msp_id}")],
                }
            }),
        ),
    );
    for name in ["Admins", "Readers", "Writers"] {
        org.policies.insert(name.to_string(), Default::default());
    }
    org
}

/// Writes usable channel/org templates into a fresh temp directory.
pub fn template_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create template dir");

    let channel = json!({
        "sequence": 0,
        "channel_group": {
            "version": 0,
            "mod_policy": "Admins",
            "groups": { APPLICATION_GROUP: { "mod_policy": "Admins" } },
        }
    });
    let org = json!({
        "version": 0,
        "mod_policy": "Admins",
        "policies": { "Admins": {}, "Readers": {}, "Writers": {} },
        "values": { MSP_KEY: { "mod_policy": "Admins", "value": { "config": {} } } },
    });

    for (name, body) in [("channel_template.json", channel), ("org_template.json", org)] {
        let mut f =
            std::fs::File::create(dir.path().join(name)).expect("create template file");
        f.write_all(body.to_string().as_bytes())
            .expect("write template file");
    }
    dir
}
