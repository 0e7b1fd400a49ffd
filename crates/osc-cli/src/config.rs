use std::path::Path;

use anyhow::Context;
use osc_changeset::SerializerOptions;
use osc_rewrite::{NetworkStripConfig, OverrideGroup};
use osc_snapshot::DuplicatePolicy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    pub changeset: ChangesetConfig,
    pub snapshot: SnapshotConfig,
    pub rewrite: RewriteConfig,
}

impl OscConfig {
    /// Read a TOML file. Missing sections and keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// The file's config, or defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangesetConfig {
    pub generator: String,
    pub version: String,
}

impl Default for ChangesetConfig {
    fn default() -> Self {
        let defaults = SerializerOptions::default();
        Self {
            generator: defaults.generator,
            version: defaults.version,
        }
    }
}

impl From<&ChangesetConfig> for SerializerOptions {
    fn from(config: &ChangesetConfig) -> Self {
        Self {
            generator: config.generator.clone(),
            version: config.version.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub duplicates: DuplicatePolicy,
    /// Build the two snapshots on separate threads.
    pub parallel: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            parallel: true,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub overrides: Vec<OverrideGroup>,
    pub networks: NetworkStripConfig,
}
