//! Configuration management for the thoughtnet CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thoughtnet_core::edge::EdgeParams;
use thoughtnet_runtime::engine::EngineConfig;
use thoughtnet_runtime::maintenance::MaintenanceConfig;

pub const CONFIG_FILE: &str = "thoughtnet.toml";

/// thoughtnet project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    #[serde(default)]
    pub edges: EdgeParams,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database, relative to the config file's directory.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".thoughtnet/thoughts.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// A config together with the directory it was found in.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    pub root: PathBuf,
}

impl Loaded {
    /// Absolute path of the SQLite mirror.
    pub fn store_path(&self) -> PathBuf {
        if self.config.store.path.is_absolute() {
            self.config.store.path.clone()
        } else {
            self.root.join(&self.config.store.path)
        }
    }
}

impl Config {
    /// Load config from thoughtnet.toml in the current or parent directories.
    pub fn load() -> Result<Loaded> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match find_config_file(&cwd) {
            Some(path) => {
                let config = Self::load_from(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                Ok(Loaded { config, root })
            }
            None => Ok(Loaded {
                config: Config::default(),
                root: cwd,
            }),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.maintenance.validate()?;
        self.edges.validate()?;
        Ok(())
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find thoughtnet.toml in `start` or its parent directories.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [engine]
            propagation_delay_ms = 100

            [maintenance]
            edge_decay_rate = 0.99
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.propagation_delay_ms, 100);
        assert_eq!(config.engine.min_propagated_energy, 0.001);
        assert_eq!(config.maintenance.interval_ms, 10_000);
        assert_eq!(config.maintenance.edge_decay_rate, 0.99);
        assert_eq!(config.store.path, PathBuf::from(".thoughtnet/thoughts.db"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.edges.initial_weight = 0.7;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.edges.initial_weight, 0.7);
        assert_eq!(loaded.engine, EngineConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[maintenance]\nedge_decay_rate = 2.0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_is_found_in_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(
            find_config_file(&nested),
            Some(dir.path().join(CONFIG_FILE))
        );
    }

    #[test]
    fn relative_store_path_is_resolved_against_root() {
        let loaded = Loaded {
            config: Config::default(),
            root: PathBuf::from("/projects/zoo"),
        };
        assert_eq!(
            loaded.store_path(),
            PathBuf::from("/projects/zoo/.thoughtnet/thoughts.db")
        );
    }
}
