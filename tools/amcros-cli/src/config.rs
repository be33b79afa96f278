//! Locating and loading `amcros.toml`.

use std::path::{Path, PathBuf};

use amcros_app::AppConfig;
use anyhow::{Context, Result};

/// File names searched for, in order, in each directory from the cwd upwards.
pub const CONFIG_NAMES: [&str; 3] = ["amcros.toml", ".amcros.toml", "amcros.json"];

/// A loaded config and where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// `None` when running on defaults.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Load an explicit path, or search upwards from `cwd`.
    pub fn resolve(explicit: Option<&str>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(cwd.join(path)),
            None => find_config(cwd),
        };

        let Some(path) = path else {
            tracing::debug!("no config file found, using defaults");
            return Ok(Self::default().anchored(cwd));
        };

        let config = AppConfig::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");

        let base = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
        Ok(Self {
            config,
            path: Some(path),
        }
        .anchored(&base))
    }

    /// Make a relative data directory relative to `base` rather than the cwd.
    fn anchored(mut self, base: &Path) -> Self {
        if self.config.store.data_dir.is_relative() {
            self.config.store.data_dir = base.join(&self.config.store.data_dir);
        }
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.store.data_dir
    }
}

/// Find a config file in `start` or any parent directory.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcros_app::config::StoreBackend;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = LoadedConfig::resolve(None, dir.path()).unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.data_dir(), dir.path().join(".amcros"));
    }

    #[test]
    fn test_found_in_parent_and_data_dir_anchored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("amcros.toml"),
            "[store]\nbackend = \"memory\"\ndata_dir = \"state\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let loaded = LoadedConfig::resolve(None, &nested).unwrap();
        assert_eq!(loaded.path.as_deref(), Some(dir.path().join("amcros.toml").as_path()));
        assert_eq!(loaded.config.store.backend, StoreBackend::Memory);
        assert_eq!(loaded.data_dir(), dir.path().join("state"));
    }

    #[test]
    fn test_explicit_path_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.toml"), "[store\n").unwrap();
        let err = LoadedConfig::resolve(Some("bad.toml"), dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.toml"));
    }
}
