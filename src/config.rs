use std::fs;
use std::path::Path;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::ChromosomeId;
use crate::error::ForgeError;

pub const DEFAULT_SEQ_FILE_PATTERN: &str = "{id}.fa.gz";

/// Package metadata copied verbatim into the manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageMeta {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub title: Option<String>,
    pub organism: String,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_version: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Raw run-configuration document as it appears on disk.
#[derive(Debug, Deserialize, Serialize)]
pub struct RunConfig {
    pub package: PackageMeta,
    pub base_url: String,
    #[serde(default)]
    pub seq_file_pattern: Option<String>,
    #[serde(default)]
    pub workdir: Option<String>,
    pub chromosomes: Vec<String>,
    #[serde(default)]
    pub circular: Vec<String>,
}

/// Immutable resolved configuration, constructed once at startup and passed
/// into each component. No component reads ambient state.
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    pub package: PackageMeta,
    pub base_url: String,
    pub seq_file_pattern: String,
    pub workdir: Utf8PathBuf,
    pub chromosomes: Vec<ChromosomeId>,
    pub circular: Vec<ChromosomeId>,
}

impl ForgeConfig {
    /// Remote URL for one chromosome's sequence file.
    pub fn sequence_url(&self, id: &ChromosomeId) -> String {
        let base = self.base_url.trim_end_matches('/');
        let file = self.seq_file_pattern.replace("{id}", id.as_str());
        format!("{base}/{file}")
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: &Path) -> Result<ForgeConfig, ForgeError> {
        let content = fs::read_to_string(path)
            .map_err(|_| ForgeError::ConfigRead(path.to_path_buf()))?;
        let config: RunConfig = serde_json::from_str(&content)
            .map_err(|err| ForgeError::ConfigParse(err.to_string()))?;
        Self::resolve_config(config)
    }

    pub fn resolve_config(config: RunConfig) -> Result<ForgeConfig, ForgeError> {
        if config.package.name.trim().is_empty() {
            return Err(ForgeError::ConfigInvalid("package.name is empty".to_string()));
        }
        if config.package.version.trim().is_empty() {
            return Err(ForgeError::ConfigInvalid(
                "package.version is empty".to_string(),
            ));
        }
        if config.package.organism.trim().is_empty() {
            return Err(ForgeError::ConfigInvalid(
                "package.organism is empty".to_string(),
            ));
        }
        if config.base_url.trim().is_empty() {
            return Err(ForgeError::ConfigInvalid("base_url is empty".to_string()));
        }
        if config.chromosomes.is_empty() {
            return Err(ForgeError::ConfigInvalid(
                "chromosomes list is empty".to_string(),
            ));
        }

        let chromosomes = config
            .chromosomes
            .iter()
            .map(|value| value.parse())
            .collect::<Result<Vec<ChromosomeId>, ForgeError>>()?;
        let circular = config
            .circular
            .iter()
            .map(|value| value.parse())
            .collect::<Result<Vec<ChromosomeId>, ForgeError>>()?;

        for id in &circular {
            if !chromosomes.contains(id) {
                return Err(ForgeError::ConfigInvalid(format!(
                    "circular id {id} is not in the chromosomes list"
                )));
            }
        }

        Ok(ForgeConfig {
            package: config.package,
            base_url: config.base_url,
            seq_file_pattern: config
                .seq_file_pattern
                .unwrap_or_else(|| DEFAULT_SEQ_FILE_PATTERN.to_string()),
            workdir: Utf8PathBuf::from(config.workdir.unwrap_or_else(|| ".".to_string())),
            chromosomes,
            circular,
        })
    }
}
