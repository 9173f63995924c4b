//! Configuration loader with tier-based merging.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.yaml";

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let project_dir = std::env::var("TASKFLOW_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("taskflow")));

        let user_dir = std::env::var("TASKFLOW_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".taskflow")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }
}

/// Values taken from `TASKFLOW_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            config_path: std::env::var("TASKFLOW_CONFIG_PATH").ok().map(PathBuf::from),
            db_path: std::env::var("TASKFLOW_DB_PATH").ok().map(PathBuf::from),
            host: std::env::var("TASKFLOW_HOST").ok(),
            port: std::env::var("TASKFLOW_PORT").ok(),
            static_dir: std::env::var("TASKFLOW_STATIC_DIR").ok().map(PathBuf::from),
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(db_path) = &self.db_path {
            config.server.db_path = db_path.clone();
        }

        if let Some(host) = &self.host {
            match host.parse() {
                Ok(host) => config.server.host = host,
                Err(_) => warn!("Ignoring invalid TASKFLOW_HOST value '{}'", host),
            }
        }

        if let Some(port) = &self.port {
            match port.parse() {
                Ok(port) => config.server.port = port,
                Err(_) => warn!("Ignoring invalid TASKFLOW_PORT value '{}'", port),
            }
        }

        if let Some(static_dir) = &self.static_dir {
            config.server.static_dir = static_dir.clone();
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// Path to the config file that was used (if any)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers, reading the process environment.
    ///
    /// `explicit` (from `--config`) takes precedence over `TASKFLOW_CONFIG_PATH`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut env = EnvOverrides::from_env();
        if let Some(path) = explicit {
            env.config_path = Some(path.to_path_buf());
        }
        Self::load_with(ConfigPaths::discover(), &env)
    }

    /// Load configuration with explicit paths and overrides.
    pub fn load_with(paths: ConfigPaths, env: &EnvOverrides) -> Result<Self> {
        if let Some(path) = &env.config_path {
            let mut config = Config::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            env.apply(&mut config);
            return Ok(Self {
                paths,
                config,
                config_path: Some(path.clone()),
            });
        }

        let mut layers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut config_path = None;

        if let Some(dir) = &paths.project_dir
            && let Some(layer) = read_layer(&dir.join(CONFIG_FILE))
        {
            layers.push(layer);
            config_path = Some(dir.join(CONFIG_FILE));
        }

        if let Some(dir) = &paths.user_dir
            && let Some(layer) = read_layer(&dir.join(CONFIG_FILE))
        {
            layers.push(layer);
            config_path.get_or_insert_with(|| dir.join(CONFIG_FILE));
        }

        let mut config: Config = serde_json::from_value(deep_merge_all(layers))?;
        env.apply(&mut config);

        Ok(Self {
            paths,
            config,
            config_path,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Read one YAML layer. Missing files are skipped silently, unreadable or
/// malformed ones with a warning.
fn read_layer(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) => {
            debug!("Loaded config layer {}", path.display());
            Some(value)
        }
        Err(e) => {
            warn!("Ignoring malformed config {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use tempfile::TempDir;

    fn empty_paths(temp: &TempDir) -> ConfigPaths {
        ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        )
    }

    #[test]
    fn load_defaults_only() {
        let temp = TempDir::new().unwrap();

        let loader = ConfigLoader::load_with(empty_paths(&temp), &EnvOverrides::default()).unwrap();

        assert_eq!(loader.config().server.port, 2009);
        assert!(loader.config_path().is_none());
    }

    #[test]
    fn user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskflow");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            project_dir.join("config.yaml"),
            "server:\n  port: 3000\n  static_dir: web\n",
        )
        .unwrap();
        std::fs::write(user_dir.join("config.yaml"), "server:\n  port: 4000\n").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir.clone()), Some(user_dir));
        let loader = ConfigLoader::load_with(paths, &EnvOverrides::default()).unwrap();
        let config = loader.config();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.static_dir, PathBuf::from("web"));
        assert_eq!(loader.config_path(), Some(project_dir.join("config.yaml").as_path()));
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskflow");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "server: [unclosed").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let loader = ConfigLoader::load_with(paths, &EnvOverrides::default()).unwrap();

        assert_eq!(loader.config().server.port, 2009);
    }

    #[test]
    fn env_overrides_win_over_files() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskflow");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "server:\n  port: 3000\n").unwrap();

        let env = EnvOverrides {
            port: Some("5000".to_string()),
            host: Some("0.0.0.0".to_string()),
            db_path: Some(PathBuf::from("/tmp/tasks.db")),
            ..Default::default()
        };
        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let config = ConfigLoader::load_with(paths, &env).unwrap().into_config();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0".parse::<IpAddr>().unwrap());
        assert_eq!(config.server.db_path, PathBuf::from("/tmp/tasks.db"));
    }

    #[test]
    fn invalid_env_port_is_ignored() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverrides {
            port: Some("not-a-port".to_string()),
            ..Default::default()
        };

        let loader = ConfigLoader::load_with(empty_paths(&temp), &env).unwrap();

        assert_eq!(loader.config().server.port, 2009);
    }

    #[test]
    fn explicit_config_file_skips_tiers() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("custom.yaml");
        std::fs::write(&explicit, "server:\n  port: 9999\n").unwrap();

        let env = EnvOverrides {
            config_path: Some(explicit.clone()),
            ..Default::default()
        };
        let loader = ConfigLoader::load_with(empty_paths(&temp), &env).unwrap();

        assert_eq!(loader.config().server.port, 9999);
        assert_eq!(loader.config_path(), Some(explicit.as_path()));
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverrides {
            config_path: Some(temp.path().join("nope.yaml")),
            ..Default::default()
        };

        assert!(ConfigLoader::load_with(empty_paths(&temp), &env).is_err());
    }
}
