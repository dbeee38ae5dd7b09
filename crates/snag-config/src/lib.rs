//! # snag-config
//!
//! Layered configuration loading for Snagtrack using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SNAG_*` prefix, `__` as separator)
//! 2. Project-level `.snagtrack/config.toml`
//! 3. User-level `~/.config/snagtrack/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SNAG_SERVER__BIND` -> `server.bind`,
//! `SNAG_AUTH__BOOTSTRAP_PASSWORD` -> `auth.bootstrap_password`, etc. The
//! `__` (double underscore) separates nested config sections.

mod auth;
mod database;
mod error;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnagConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl SnagConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical server entry point.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".snagtrack/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("SNAG_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("snagtrack").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or the current dir
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = SnagConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.database.path, "snagtrack.db");
        assert_eq!(config.auth.session_ttl_hours, 72);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: SnagConfig = SnagConfig::figment().extract().expect("defaults");
            assert_eq!(config.server.bind, "127.0.0.1:8080");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SNAG_SERVER__BIND", "0.0.0.0:9999");
            jail.set_env("SNAG_AUTH__SESSION_TTL_HOURS", "12");
            let config: SnagConfig = SnagConfig::figment().extract().expect("env layer");
            assert_eq!(config.server.bind, "0.0.0.0:9999");
            assert_eq!(config.auth.session_ttl_hours, 12);
            Ok(())
        });
    }

    #[test]
    fn project_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".snagtrack")?;
            jail.create_file(
                ".snagtrack/config.toml",
                r#"
                [database]
                path = "custom.db"
                "#,
            )?;
            let config: SnagConfig = SnagConfig::figment().extract().expect("toml layer");
            assert_eq!(config.database.path, "custom.db");
            Ok(())
        });
    }
}
