//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use punch_core::{AdminOracle, HandleResolver, UserId};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Directory where active-presence marker files are kept.
    pub marker_dir: PathBuf,
    /// Acting user when `--user` is not given.
    pub user: Option<String>,
    /// Users allowed to run the admin-gated queries.
    pub admins: Vec<String>,
    /// Display handles for roster rendering, keyed by user ID.
    pub handles: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let state_dir = dirs_state_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("punch.db"),
            marker_dir: state_dir.join("active"),
            user: None,
            admins: Vec::new(),
            handles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PUNCH_*)
        figment = figment.merge(Env::prefixed("PUNCH_"));

        figment.extract()
    }
}

/// The `admins` list from the config is the permission oracle.
impl AdminOracle for Config {
    fn is_admin(&self, actor: &UserId) -> bool {
        self.admins.iter().any(|admin| admin == actor.as_str())
    }
}

/// The `[handles]` table resolves user IDs for roster rendering.
impl HandleResolver for Config {
    fn resolve(&self, user: &UserId) -> Option<String> {
        self.handles.get(user.as_str()).cloned()
    }
}

/// Returns the platform-specific config directory for punch.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("punch"))
}

/// Returns the platform-specific data directory for punch.
///
/// On Linux: `~/.local/share/punch`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("punch"))
}

/// Returns the platform-specific state directory for punch.
///
/// On Linux: `~/.local/state/punch`
pub fn dirs_state_path() -> Option<PathBuf> {
    dirs::state_dir().map(|p| p.join("punch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_returns_some() {
        assert!(dirs_data_path().is_some());
    }

    #[test]
    fn test_dirs_data_path_ends_with_punch() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "punch");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("punch.db"));
    }

    #[test]
    fn admin_oracle_matches_configured_ids() {
        let config = Config {
            admins: vec!["alice".to_string()],
            ..Config::default()
        };
        assert!(config.is_admin(&UserId::new("alice").unwrap()));
        assert!(!config.is_admin(&UserId::new("bob").unwrap()));
    }

    #[test]
    fn handle_resolver_returns_none_for_unknown_users() {
        let mut handles = BTreeMap::new();
        handles.insert("alice".to_string(), "Alice Example".to_string());
        let config = Config {
            handles,
            ..Config::default()
        };

        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();
        assert_eq!(config.resolve(&alice).as_deref(), Some("Alice Example"));
        assert!(config.resolve(&bob).is_none());
    }
}
