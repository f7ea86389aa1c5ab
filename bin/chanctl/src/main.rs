//! Command line tool for channel configuration updates.

mod args;

use std::{collections::BTreeMap, sync::Arc};

use anyhow::Context;
use args::{Args, Subcommand};
use chancery_codec::{ConfigCodec, NativeCodec, RemoteCodec};
use chancery_common::logging;
use chancery_config::{ChanceryConfig, CodecMode};
use chancery_identity::{FileIdentityProvider, OrgCredentials};
use chancery_types::UpdateResult;
use chancery_update::{
    ConfigMutator, FileTemplateStore, HttpOrdererClient, SubmissionClient, UpdateWorkflow,
};
use tracing::*;

fn main() {
    let args: Args = argh::from_env();
    if let Err(e) = run(args) {
        eprintln!("ERROR\n{e:?}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    init_logging(&config);

    let rt = tokio::runtime::Runtime::new().context("initializing tokio runtime")?;
    let result = rt.block_on(exec_subc(args.subc, &config))?;
    println!("{}", result.message);
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<ChanceryConfig> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config file {}", args.config.display()))?;
    toml::from_str(&raw).context("parsing config file")
}

fn init_logging(config: &ChanceryConfig) {
    let service_name =
        logging::format_service_name("chanctl", config.logging.service_label.as_deref());
    let mut logger_config = logging::LoggerConfig::new(service_name)
        .with_json_logging(config.logging.json_format.unwrap_or(false));

    if let Some(log_dir) = &config.logging.log_dir {
        let prefix = config
            .logging
            .log_file_prefix
            .clone()
            .unwrap_or_else(|| "chanctl".to_string());
        logger_config = logger_config.with_file_logging(
            logging::FileLoggingConfig::new(log_dir.clone(), prefix)
                .with_json_format(config.logging.json_format.unwrap_or(false)),
        );
    }

    logging::init(logger_config);
}

fn build_workflow(config: &ChanceryConfig) -> UpdateWorkflow {
    let codec: Arc<dyn ConfigCodec> = match config.codec.mode {
        CodecMode::Native => Arc::new(NativeCodec),
        CodecMode::Remote => Arc::new(RemoteCodec::new(
            reqwest::Client::new(),
            config.codec.endpoint.clone(),
        )),
    };

    let orgs: BTreeMap<_, _> = config
        .orgs
        .iter()
        .map(|(name, org)| {
            (
                name.clone(),
                OrgCredentials {
                    msp_id: org.msp_id.clone(),
                    admin_key: org.admin_key.clone(),
                },
            )
        })
        .collect();
    let provider = Arc::new(FileIdentityProvider::new(orgs));

    let orderer = Arc::new(HttpOrdererClient::new(config.orderer.endpoint.clone()));
    let mutator = ConfigMutator::new(Arc::new(FileTemplateStore::new(
        config.templates.dir.clone(),
    )));

    UpdateWorkflow::new(
        codec,
        mutator,
        provider,
        SubmissionClient::new(orderer.clone()),
        orderer,
    )
}

async fn exec_subc(subc: Subcommand, config: &ChanceryConfig) -> anyhow::Result<UpdateResult> {
    let workflow = build_workflow(config);
    match subc {
        Subcommand::CreateChannel(subc) => {
            let msp_ids = subc
                .org
                .iter()
                .map(|org| {
                    config
                        .orgs
                        .get(org)
                        .map(|o| o.msp_id.clone())
                        .with_context(|| format!("organization '{org}' not configured"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            anyhow::ensure!(!msp_ids.is_empty(), "at least one --org is required");

            debug!(channel = %subc.channel, orgs = ?subc.org, "creating channel");
            let result = workflow
                .create_channel(&subc.channel, &subc.consortium, msp_ids, &subc.org)
                .await?;
            Ok(result)
        }
        Subcommand::UpdateAnchorPeer(subc) => {
            let msp_id = configured_msp_id(config, &subc.org)?;
            let result = workflow
                .update_anchor_peer(&subc.channel, &subc.org, &msp_id, &subc.host, subc.port)
                .await?;
            Ok(result)
        }
        Subcommand::UpdateCrl(subc) => {
            let crl = std::fs::read_to_string(&subc.crl_file)
                .with_context(|| format!("reading CRL file {}", subc.crl_file.display()))?;
            let msp_id = configured_msp_id(config, &subc.org)?;
            let result = workflow
                .update_revocation_list(&subc.channel, &subc.org, &msp_id, crl.trim_end())
                .await?;
            Ok(result)
        }
    }
}

fn configured_msp_id(config: &ChanceryConfig, org: &str) -> anyhow::Result<String> {
    config
        .orgs
        .get(org)
        .map(|o| o.msp_id.clone())
        .with_context(|| format!("organization '{org}' not configured"))
}
