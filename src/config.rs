use anyhow::{Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MOUNT_PATH: &str = "/api/bookmarks";

#[derive(Parser, Debug)]
#[command(name = "bookmark-api")]
#[command(about = "Runs the bookmarks service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Overrides `app.port` from the config file.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookmarks")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    database: String,
    port: u16,
    #[serde(default = "default_mount_path")]
    mount_path: String,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
}

fn default_mount_path() -> String {
    DEFAULT_MOUNT_PATH.to_string()
}

fn default_sync_interval() -> u64 {
    60
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Mount path normalised to a leading slash and no trailing slash.
    pub fn get_mount_path(&self) -> String {
        let trimmed = self.mount_path.trim().trim_matches('/');
        format!("/{}", trimmed)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Auth {
    pub api_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: App,
    pub auth: Auth,
}

impl Config {
    pub fn new(path: &Path) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        if cfg.auth.api_token.trim().is_empty() {
            bail!("auth.api_token must not be empty");
        }
        if cfg.app.get_mount_path() == "/" {
            bail!("app.mount_path must not be the server root");
        }
        Ok(cfg)
    }

    fn load_config(path: &Path) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str);
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> String {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            let Some(end) = result[actual_start..].find('}') else {
                break;
            };
            let var_name = &result[actual_start + 2..actual_start + end];

            // ${VAR:-default}
            let env_value = match var_name.split_once(":-") {
                Some((actual_var, default_val)) => {
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                }
                None => env::var(var_name).unwrap_or_else(|_| {
                    eprintln!("warning: environment variable '{}' not found", var_name);
                    String::new()
                }),
            };

            result.replace_range(actual_start..actual_start + end + 1, &env_value);
            offset = actual_start + env_value.len();
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
app:
  database: bookmarks.db
  port: 8000
auth:
  api_token: secret
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(cfg.app.get_db(), "bookmarks.db");
        assert_eq!(cfg.app.get_port(), 8000);
        assert_eq!(cfg.app.get_mount_path(), DEFAULT_MOUNT_PATH);
        assert_eq!(cfg.app.sync_interval_seconds, 60);
        assert!(cfg.app.turso_url.is_none());
        assert_eq!(cfg.auth.api_token, "secret");
    }

    #[test]
    fn normalises_mount_path() {
        let yaml = SAMPLE.replace("port: 8000", "port: 8000\n  mount_path: bookmarks/");
        let cfg = Config::from_yaml(&yaml).unwrap();
        assert_eq!(cfg.app.get_mount_path(), "/bookmarks");
    }

    #[test]
    fn substitutes_default_when_variable_is_unset() {
        let out = Config::substitute_env_vars("token: ${BOOKMARKS_TEST_SURELY_UNSET_VAR:-fallback}");
        assert_eq!(out, "token: fallback");
    }

    #[test]
    fn substitutes_set_variable() {
        // PATH is set in every test environment.
        let path = env::var("PATH").unwrap();
        let out = Config::substitute_env_vars("p: ${PATH}");
        assert_eq!(out, format!("p: {}", path));
    }

    #[test]
    fn leaves_unterminated_placeholder_alone() {
        let out = Config::substitute_env_vars("token: ${OOPS");
        assert_eq!(out, "token: ${OOPS");
    }

    #[test]
    fn rejects_empty_api_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, SAMPLE.replace("api_token: secret", "api_token: \"\"")).unwrap();
        assert!(Config::new(&path).is_err());
    }

    #[test]
    fn rejects_root_mount_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, SAMPLE.replace("port: 8000", "port: 8000\n  mount_path: /")).unwrap();
        assert!(Config::new(&path).is_err());
    }

    #[test]
    fn loads_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, SAMPLE).unwrap();
        let cfg = Config::new(&path).unwrap();
        assert_eq!(cfg.auth.api_token, "secret");
    }
}
