use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::{engine_debug, engine_info};
use rowtrim_engine::{EngineConfig, ServiceSettings};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "rowtrim.ron";
const SERVER_URL_ENV: &str = "ROWTRIM_SERVER_URL";

/// Settings read from `rowtrim.ron`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_archive_bytes: u64,
    pub keep_remote: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            server_url: service.base_url,
            output_dir: PathBuf::from("output"),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_archive_bytes: service.max_archive_bytes,
            keep_remote: false,
        }
    }
}

impl AppConfig {
    /// File, then `ROWTRIM_SERVER_URL`, then command-line flags; later wins.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    load(default_path)?
                } else {
                    engine_debug!("No {} found; using defaults", DEFAULT_CONFIG_FILENAME);
                    AppConfig::default()
                }
            }
        };
        Ok(config.with_overrides(std::env::var(SERVER_URL_ENV).ok(), cli))
    }

    fn with_overrides(mut self, env_server_url: Option<String>, cli: &Cli) -> Self {
        if let Some(url) = env_server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = url;
        }
        if let Some(url) = &cli.server {
            self.server_url = url.clone();
        }
        if let Some(dir) = &cli.output {
            self.output_dir = dir.clone();
        }
        self.keep_remote |= cli.keep_remote;
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            service: ServiceSettings {
                base_url: self.server_url.clone(),
                connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
                max_archive_bytes: self.max_archive_bytes,
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

fn load(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: AppConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    engine_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("rowtrim").chain(args.iter().copied()))
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("rowtrim.ron");
        fs::write(
            &path,
            r#"(server_url: "http://files.internal:9000", request_timeout_secs: Some(90))"#,
        )
        .unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.server_url, "http://files.internal:9000");
        assert_eq!(config.request_timeout_secs, Some(90));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(!config.keep_remote);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("rowtrim.ron");
        fs::write(&path, "(server_url: 12").unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn cli_flags_override_environment_and_file() {
        let args = cli(&["--server", "http://cli:1", "--output", "out", "--keep-remote"]);
        let config = AppConfig::default().with_overrides(Some("http://env:2".into()), &args);

        assert_eq!(config.server_url, "http://cli:1");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.keep_remote);
    }

    #[test]
    fn environment_overrides_file_when_no_flag() {
        let config = AppConfig::default().with_overrides(Some("http://env:2".into()), &cli(&[]));
        assert_eq!(config.server_url, "http://env:2");

        let engine = config.engine_config();
        assert_eq!(engine.service.base_url, "http://env:2");
        assert_eq!(engine.service.request_timeout, None);
    }
}
