//! Configuration file resolution.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `deply.yaml`, `deply.yml` or `deply.toml` in the working directory
//! 3. Nothing found → [`ConfigError::NotFound`]

use std::path::{Path, PathBuf};

use deply::ConfigError;

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
}

impl ConfigSource {
    /// Returns the resolved path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Project(p) => p,
        }
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["deply.yaml", "deply.yml", "deply.toml"];

/// Resolves the configuration file path.
///
/// An explicit path is trusted as-is; loading reports a missing file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when no explicit path is given and no
/// project config exists in `project_dir`.
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> Result<ConfigSource, ConfigError> {
    if let Some(p) = explicit {
        return Ok(ConfigSource::Explicit(p.to_path_buf()));
    }

    PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|candidate| {
            tracing::debug!("Found project config: {}", candidate.display());
            ConfigSource::Project(candidate)
        })
        .ok_or_else(|| ConfigError::NotFound {
            dir: project_dir.to_path_buf(),
        })
}
