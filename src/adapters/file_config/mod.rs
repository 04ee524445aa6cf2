// File config adapter - Pipeline configuration from TOML or YAML files

use std::path::{Path, PathBuf};

use crate::config_initialization::PipelineConfig;
use crate::domain::errors::*;
use crate::error::{TimelapseError, TimelapseResult};
use crate::ports::*;

const DEFAULT_CONFIG_FILES: &[&str] = &["timelapse.toml", "timelapse.yaml", "timelapse.yml"];

/// Reads `PipelineConfig` from `.toml`, `.yaml` or `.yml` files
#[derive(Debug, Clone)]
pub struct FileConfigAdapter {
    search_dir: PathBuf,
}

impl FileConfigAdapter {
    /// Adapter probing the current working directory for default files
    pub fn new() -> Self {
        Self {
            search_dir: PathBuf::from("."),
        }
    }

    /// Adapter probing a specific directory for default files
    pub fn with_search_dir(search_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: search_dir.into(),
        }
    }

    fn parse(path: &Path, content: &str) -> TimelapseResult<PipelineConfig> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
            _ => Err(TimelapseError::UnsupportedConfigFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

impl Default for FileConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn load_config(&self, file_path: &Path) -> Result<PipelineConfig, DomainError> {
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            DomainError::ConfigFail(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        Self::parse(file_path, &content).map_err(|e| {
            DomainError::ConfigFail(format!("{}: {}", file_path.display(), e))
        })
    }

    fn default_config_paths(&self) -> Vec<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| self.search_dir.join(name))
            .collect()
    }
}
