//! TOML configuration types for chancery tools.

mod config;

pub use config::{
    ChanceryConfig, CodecConfig, CodecMode, LoggingConfig, OrdererConfig, OrgConfig,
    TemplateConfig,
};
