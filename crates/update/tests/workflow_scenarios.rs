//! End-to-end workflow runs against in-memory doubles.

use std::sync::Arc;

use chancery_codec::NativeCodec;
use chancery_identity::verify_signature;
use chancery_test_utils::{sample_channel_config, template_dir, two_org_provider, MockOrderer};
use chancery_types::{
    BroadcastStatus, ConfigUpdate, UpdateRequest, ANCHOR_PEERS_KEY, APPLICATION_GROUP, MSP_KEY,
};
use chancery_update::{
    ConfigMutator, FileTemplateStore, SubmissionClient, UpdateError, UpdateWorkflow, WorkflowPhase,
};
use serde_json::json;

fn workflow_over(orderer: Arc<MockOrderer>) -> (UpdateWorkflow, tempfile::TempDir) {
    let templates = template_dir();
    let workflow = UpdateWorkflow::new(
        Arc::new(NativeCodec),
        ConfigMutator::new(Arc::new(FileTemplateStore::new(templates.path()))),
        Arc::new(two_org_provider()),
        SubmissionClient::new(orderer.clone()),
        orderer,
    );
    (workflow, templates)
}

fn decode_delta(request: &UpdateRequest) -> ConfigUpdate {
    serde_json::from_slice(request.update().config_update()).expect("delta should decode")
}

#[tokio::test]
async fn test_channel_creation_end_to_end() {
    let orderer = Arc::new(MockOrderer::accepting());
    let (workflow, _templates) = workflow_over(orderer.clone());

    let result = workflow
        .create_channel(
            "mychannel",
            "SampleConsortium",
            vec!["Org1MSP".to_string(), "Org2MSP".to_string()],
            &["Org1".to_string(), "Org2".to_string()],
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.message, "Channel 'mychannel' created Successfully");
    assert_eq!(orderer.fetch_count(), 0, "creation reads no prior state");

    let requests = orderer.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.channel_name(), "mychannel");

    let sigs = request.update().signatures();
    assert_eq!(sigs.len(), 2, "one endorsement per organization");
    for sig in sigs {
        assert!(verify_signature(sig, request.update().config_update()));
    }

    let delta = decode_delta(request);
    assert_eq!(delta.channel_id, "mychannel");
    let consortium = delta
        .write_set
        .values
        .get("Consortium")
        .expect("consortium carried in write set");
    assert_eq!(consortium.value, json!({ "name": "SampleConsortium" }));
    let app = delta
        .write_set
        .groups
        .get(APPLICATION_GROUP)
        .expect("application group in write set");
    assert!(app.groups.contains_key("Org1MSP"));
    assert!(app.groups.contains_key("Org2MSP"));
}

#[tokio::test]
async fn test_anchor_peer_update_produces_minimal_delta() {
    let config = sample_channel_config();
    let raw = serde_json::to_vec(&config).unwrap();
    let orderer = Arc::new(MockOrderer::accepting().with_config(raw));
    let (workflow, _templates) = workflow_over(orderer.clone());

    let result = workflow
        .update_anchor_peer("mychannel", "Org1", "Org1MSP", "peer0.org1.example.com", 7051)
        .await
        .unwrap();

    assert_eq!(
        result.message,
        "Channel 'mychannel' updated with Anchor peer Successfully"
    );
    assert_eq!(orderer.fetch_count(), 1, "configuration fetched fresh");

    let requests = orderer.requests();
    let delta = decode_delta(&requests[0]);

    let write_org = delta
        .write_set
        .group_path(&[APPLICATION_GROUP, "Org1MSP"])
        .expect("touched org present in write set");
    let anchors = write_org
        .values
        .get(ANCHOR_PEERS_KEY)
        .expect("anchor peers value in write set");
    assert_eq!(
        anchors.value,
        json!({ "anchor_peers": [{ "host": "peer0.org1.example.com", "port": 7051 }] })
    );

    // Adding a value is a membership change, so the org group version bumps
    // and the delta carries a read witness at the prior version.
    assert_eq!(write_org.version, 2);
    let read_org = delta
        .read_set
        .group_path(&[APPLICATION_GROUP, "Org1MSP"])
        .expect("read witness for bumped group");
    assert_eq!(read_org.version, 1);

    let write_app = delta.write_set.groups.get(APPLICATION_GROUP).unwrap();
    assert!(
        !write_app.groups.contains_key("Org2MSP"),
        "untouched org must stay out of the write set"
    );
}

#[tokio::test]
async fn test_revocation_list_carried_verbatim_and_siblings_untouched() {
    let crl = "-----BEGIN X509 CRL-----\nMIIBozCB\n-----END X509 CRL-----";
    let config = sample_channel_config();
    let raw = serde_json::to_vec(&config).unwrap();
    let orderer = Arc::new(MockOrderer::accepting().with_config(raw));
    let (workflow, _templates) = workflow_over(orderer.clone());

    let result = workflow
        .update_revocation_list("mychannel", "Org1", "Org1MSP", crl)
        .await
        .unwrap();
    assert_eq!(
        result.message,
        "Channel 'mychannel' revocation list updated Successfully"
    );

    let delta = decode_delta(&orderer.requests()[0]);
    let write_org = delta
        .write_set
        .group_path(&[APPLICATION_GROUP, "Org1MSP"])
        .expect("org with modified MSP in write set");

    let msp = write_org.values.get(MSP_KEY).expect("MSP value in write set");
    let body = msp.value.get("config").unwrap();
    assert_eq!(body.get("revocation_list").unwrap(), &json!([crl]));
    assert_eq!(
        body.get("root_certs").unwrap(),
        &json!(["root-cert-Org1MSP"]),
        "untouched MSP fields carried unchanged"
    );

    // Only the value changed, not group membership, so the group version
    // holds while the value's own version bumps over a read witness.
    assert_eq!(write_org.version, 1);
    assert_eq!(msp.version, 2);
    assert_eq!(write_org.values.len(), 1, "unchanged values stay out");
}

#[tokio::test]
async fn test_rejected_submission_fails_without_retry() {
    let config = sample_channel_config();
    let raw = serde_json::to_vec(&config).unwrap();
    let orderer = Arc::new(
        MockOrderer::rejecting(BroadcastStatus::ServiceUnavailable, "backpressure")
            .with_config(raw),
    );
    let (workflow, _templates) = workflow_over(orderer.clone());

    let err = workflow
        .update_anchor_peer("mychannel", "Org1", "Org1MSP", "peer0", 7051)
        .await
        .unwrap_err();

    assert_eq!(err.phase(), WorkflowPhase::Submitting);
    assert_eq!(err.channel(), "mychannel");
    match err.source_err() {
        UpdateError::SubmissionRejected { status, info, .. } => {
            assert_eq!(*status, BroadcastStatus::ServiceUnavailable);
            assert_eq!(info, "backpressure");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(orderer.broadcast_count(), 1, "rejections are terminal");
}

#[tokio::test]
async fn test_missing_admin_credential_fails_in_signing_phase() {
    let orderer = Arc::new(MockOrderer::accepting());
    let (workflow, _templates) = workflow_over(orderer.clone());

    let err = workflow
        .create_channel(
            "mychannel",
            "SampleConsortium",
            vec!["Org9MSP".to_string()],
            &["Org9".to_string()],
        )
        .await
        .unwrap_err();

    assert_eq!(err.phase(), WorkflowPhase::Signing);
    assert_eq!(orderer.broadcast_count(), 0, "nothing reaches the orderer");
}
