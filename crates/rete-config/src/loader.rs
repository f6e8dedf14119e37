use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use rete_core::{ReteError, Result};

use crate::schema::ReteConfig;

/// Loads and reloads the rete configuration.
pub struct ConfigLoader {
    config: Arc<RwLock<ReteConfig>>,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > RETE_CONFIG env > ~/.rete/rete.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        Self::resolve_path_with(explicit, |key| std::env::var(key).ok())
    }

    fn resolve_path_with<F>(explicit: Option<&Path>, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Some(p) = lookup("RETE_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rete")
            .join("rete.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with environment variables read through `lookup`.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = Self::resolve_path_with(path, &lookup);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            Self::read(&config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            ReteConfig::default()
        };

        let config = Self::apply_overrides(config, lookup);
        Self::check(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> ReteConfig {
        self.config.read().clone()
    }

    /// Get a shared reference for subscription.
    pub fn shared(&self) -> Arc<RwLock<ReteConfig>> {
        Arc::clone(&self.config)
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Reload the config from disk. The current config is kept if the new
    /// file fails to parse or validate.
    pub fn reload(&self) -> Result<()> {
        self.reload_with(|key| std::env::var(key).ok())
    }

    /// [`reload`](Self::reload) with environment variables read through `lookup`.
    pub fn reload_with<F>(&self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.config_path.exists() {
            return Err(ReteError::Config(format!(
                "config file not found: {}",
                self.config_path.display()
            )));
        }
        let new_config = Self::read(&self.config_path)?;
        let new_config = Self::apply_overrides(new_config, lookup);
        Self::check(&new_config)?;
        *self.config.write() = new_config;
        info!("configuration reloaded");
        Ok(())
    }

    /// Apply overrides (RETE_LOG_LEVEL, RETE_FACT_CAPACITY, etc.) looked up
    /// through `lookup`. Unparseable numeric or boolean values are ignored
    /// with a warning.
    pub fn apply_overrides<F>(mut config: ReteConfig, lookup: F) -> ReteConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RETE_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("RETE_LOG_FORMAT") {
            config.logging.format = v;
        }
        let memory = &mut config.memory;
        override_capacity(&lookup, "RETE_FACT_CAPACITY", &mut memory.fact_capacity);
        override_capacity(&lookup, "RETE_NODE_CAPACITY", &mut memory.node_capacity);
        override_capacity(
            &lookup,
            "RETE_ACTIVATION_CAPACITY",
            &mut memory.activation_capacity,
        );
        if let Some(v) = lookup("RETE_TRACE_MUTATIONS") {
            match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => memory.trace_mutations = true,
                "0" | "false" | "no" | "off" => memory.trace_mutations = false,
                _ => warn!(value = %v, "ignoring invalid RETE_TRACE_MUTATIONS"),
            }
        }
        config
    }

    fn read(path: &Path) -> Result<ReteConfig> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str::<ReteConfig>(&raw).map_err(|e| {
            ReteError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    // Log warnings, fail on errors.
    fn check(config: &ReteConfig) -> Result<()> {
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
                Ok(())
            }
            Err(e) => Err(ReteError::Config(e)),
        }
    }
}

fn override_capacity<F>(lookup: &F, key: &str, target: &mut usize)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(key) {
        match v.parse::<usize>() {
            Ok(n) => *target = n,
            Err(_) => warn!(value = %v, "ignoring invalid {}", key),
        }
    }
}
