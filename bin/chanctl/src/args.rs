//! Command line arguments for the `chanctl` binary.

use std::path::PathBuf;

use argh::FromArgs;

/// Args.
#[derive(FromArgs)]
pub(crate) struct Args {
    #[argh(
        option,
        description = "path to the TOML configuration file",
        short = 'c',
        default = "PathBuf::from(\"chancery.toml\")"
    )]
    pub(crate) config: PathBuf,

    #[argh(subcommand)]
    pub(crate) subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub(crate) enum Subcommand {
    CreateChannel(SubcCreateChannel),
    UpdateAnchorPeer(SubcUpdateAnchorPeer),
    UpdateCrl(SubcUpdateCrl),
}

/// Create a new channel under a consortium.
#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "create-channel",
    description = "creates a new channel with the given member organizations"
)]
pub(crate) struct SubcCreateChannel {
    #[argh(positional, description = "channel name")]
    pub(crate) channel: String,

    #[argh(option, description = "consortium the channel is created under")]
    pub(crate) consortium: String,

    #[argh(
        option,
        description = "member organization (configured org name, repeatable)"
    )]
    pub(crate) org: Vec<String>,
}

/// Replace one organization's anchor peer.
#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "update-anchor-peer",
    description = "replaces an organization's anchor peer on a channel"
)]
pub(crate) struct SubcUpdateAnchorPeer {
    #[argh(positional, description = "channel name")]
    pub(crate) channel: String,

    #[argh(option, description = "organization whose anchor peer to set")]
    pub(crate) org: String,

    #[argh(option, description = "anchor peer hostname")]
    pub(crate) host: String,

    #[argh(option, description = "anchor peer port")]
    pub(crate) port: u16,
}

/// Replace one organization's certificate revocation list.
#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "update-crl",
    description = "replaces an organization's certificate revocation list on a channel"
)]
pub(crate) struct SubcUpdateCrl {
    #[argh(positional, description = "channel name")]
    pub(crate) channel: String,

    #[argh(option, description = "organization whose revocation list to set")]
    pub(crate) org: String,

    #[argh(option, description = "path to the PEM-encoded CRL", short = 'f')]
    pub(crate) crl_file: PathBuf,
}
