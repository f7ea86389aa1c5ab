use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default value for `templates.dir` in [`TemplateConfig`].
const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Default value for `codec.endpoint` in [`CodecConfig`].
const DEFAULT_CODEC_ENDPOINT: &str = "http://127.0.0.1:7059";

/// One organization the tool can sign for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgConfig {
    /// MSP id the organization is known by on the channel.
    pub msp_id: String,

    /// Path to the hex-encoded admin signing key.
    pub admin_key: PathBuf,
}

/// Ordering service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdererConfig {
    /// Base URL of the ordering service gateway.
    pub endpoint: String,
}

/// Which transcoder implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecMode {
    /// In-process canonical JSON codec.
    Native,
    /// External transcoding service.
    Remote,
}

/// Transcoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    pub mode: CodecMode,

    /// Base URL of the transcoding service; only read in remote mode.
    #[serde(default = "default_codec_endpoint")]
    pub endpoint: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mode: CodecMode::Native,
            endpoint: default_codec_endpoint(),
        }
    }
}

/// Where the structural templates live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Service label to append to the service name (e.g., "prod", "dev").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_label: Option<String>,

    /// Directory path for file-based logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    /// Use JSON format for logs instead of compact format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChanceryConfig {
    /// Organizations keyed by the short name used on the command line.
    pub orgs: BTreeMap<String, OrgConfig>,

    pub orderer: OrdererConfig,

    /// Transcoder selection (optional section in TOML, native by default).
    #[serde(default)]
    pub codec: CodecConfig,

    /// Template directory (optional section in TOML).
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Logging configuration (optional section in TOML).
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_template_dir() -> PathBuf {
    DEFAULT_TEMPLATE_DIR.into()
}

fn default_codec_endpoint() -> String {
    DEFAULT_CODEC_ENDPOINT.to_string()
}
