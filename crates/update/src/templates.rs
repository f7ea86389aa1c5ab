//! Static structural templates consumed by the mutator.

use std::path::{Path, PathBuf};

use chancery_types::{ChannelConfig, ConfigGroup};
use serde::de::DeserializeOwned;

use crate::MutationError;

/// File holding the channel-creation base tree.
const CHANNEL_TEMPLATE_FILE: &str = "channel_template.json";

/// File holding the empty per-organization placeholder group.
const ORG_TEMPLATE_FILE: &str = "org_template.json";

/// Read-only source of the structural templates.
pub trait TemplateStore: Send + Sync {
    /// Base configuration tree a new channel starts from.
    fn creation_template(&self) -> Result<ChannelConfig, MutationError>;

    /// Placeholder group synthesized for an organization that has no group
    /// in the configuration yet: empty Admins/Readers/Writers policies and
    /// an empty membership value.
    fn org_placeholder(&self) -> Result<ConfigGroup, MutationError>;
}

/// Template store over a directory of JSON files.
#[derive(Clone, Debug)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, MutationError> {
        let path = self.dir.join(name);
        let raw = std::fs::read_to_string(&path).map_err(|e| bad_template(name, &path, e))?;
        serde_json::from_str(&raw).map_err(|e| bad_template(name, &path, e))
    }
}

fn bad_template(name: &str, path: &Path, err: impl std::fmt::Display) -> MutationError {
    MutationError::BadTemplate {
        name: name.to_string(),
        reason: format!("{}: {err}", path.display()),
    }
}

impl TemplateStore for FileTemplateStore {
    fn creation_template(&self) -> Result<ChannelConfig, MutationError> {
        self.load(CHANNEL_TEMPLATE_FILE)
    }

    fn org_placeholder(&self) -> Result<ConfigGroup, MutationError> {
        self.load(ORG_TEMPLATE_FILE)
    }
}
