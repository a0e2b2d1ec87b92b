//! Relay configuration resource.
//!
//! Settings are read from an INI file. Missing keys keep their defaults.
//!
//! ```ini
//! [relay]
//! broadcast_pairs = true
//! broadcast_batches = true
//! warn_on_rejected = true
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_BROADCAST_PAIRS: bool = true;
const DEFAULT_BROADCAST_BATCHES: bool = true;
const DEFAULT_WARN_ON_REJECTED: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./relay.ini";
const SECTION: &str = "relay";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Trigger [`PairCollision`](crate::events::collision::PairCollision) for every pair.
    pub broadcast_pairs: bool,
    /// Trigger [`CollisionBroadcast`](crate::events::collision::CollisionBroadcast) for every batch.
    pub broadcast_batches: bool,
    /// Log rejected registrations as warnings; otherwise at debug level.
    pub warn_on_rejected: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self {
            broadcast_pairs: DEFAULT_BROADCAST_PAIRS,
            broadcast_batches: DEFAULT_BROADCAST_BATCHES,
            warn_on_rejected: DEFAULT_WARN_ON_REJECTED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        if let Some(v) = config.getbool(SECTION, "broadcast_pairs").ok().flatten() {
            self.broadcast_pairs = v;
        }
        if let Some(v) = config.getbool(SECTION, "broadcast_batches").ok().flatten() {
            self.broadcast_batches = v;
        }
        if let Some(v) = config.getbool(SECTION, "warn_on_rejected").ok().flatten() {
            self.warn_on_rejected = v;
        }

        info!(
            "Loaded relay config: broadcast_pairs={}, broadcast_batches={}, warn_on_rejected={}",
            self.broadcast_pairs, self.broadcast_batches, self.warn_on_rejected
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        config.set(SECTION, "broadcast_pairs", Some(self.broadcast_pairs.to_string()));
        config.set(SECTION, "broadcast_batches", Some(self.broadcast_batches.to_string()));
        config.set(SECTION, "warn_on_rejected", Some(self.warn_on_rejected.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved relay config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let config = RelayConfig::default();
        assert!(config.broadcast_pairs);
        assert!(config.broadcast_batches);
        assert!(config.warn_on_rejected);
    }

    #[test]
    fn partial_ini_keeps_other_defaults() {
        let mut config = RelayConfig::new();
        config
            .load_from_str("[relay]\nbroadcast_pairs = false\n")
            .unwrap();
        assert!(!config.broadcast_pairs);
        assert!(config.broadcast_batches);
        assert!(config.warn_on_rejected);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = RelayConfig::with_path("./does/not/exist/relay.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config, RelayConfig::with_path("./does/not/exist/relay.ini"));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("relay-{}.ini", std::process::id()));
        let mut saved = RelayConfig::with_path(&path);
        saved.broadcast_batches = false;
        saved.warn_on_rejected = false;
        saved.save_to_file().unwrap();

        let mut loaded = RelayConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, saved);
        let _ = std::fs::remove_file(&path);
    }
}
