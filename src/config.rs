use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::cli::{Cli, RunArgs};
use crate::error::{Error, Result};
use crate::report::line::{DEFAULT_IMAGE_URL_TEMPLATE, HASH_TOKEN};
use crate::source::{DEFAULT_CATALOG_PATTERN, DEFAULT_LANDING_URL};

const DEFAULT_SNAPSHOT_DIR: &str = "catalog";
const DEFAULT_LOG_FILE: &str = "log.txt";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub landing_url: String,
    pub catalog_pattern: Regex,
    pub snapshot_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub image_url_template: String,
    pub timeout: Duration,
}

/// On-disk form of `config.toml`; every key is optional
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    landing_url: Option<String>,
    catalog_pattern: Option<String>,
    snapshot_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
    image_url_template: Option<String>,
    timeout: Option<String>,
}

impl Config {
    /// Built-in deployment constants
    pub fn defaults() -> Result<Self> {
        Ok(Config {
            landing_url: DEFAULT_LANDING_URL.to_string(),
            catalog_pattern: Regex::new(DEFAULT_CATALOG_PATTERN)?,
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            image_url_template: DEFAULT_IMAGE_URL_TEMPLATE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Defaults overlaid with the config file.
    ///
    /// An explicit `--config` path must exist; the platform default is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => Some((path.to_path_buf(), read_file(path)?)),
            None => match default_config_path() {
                Some(path) if path.is_file() => {
                    let parsed = read_file(&path)?;
                    Some((path, parsed))
                }
                _ => None,
            },
        };

        let mut config = Config::defaults()?;
        if let Some((path, file)) = file {
            config.merge_file(&path, file)?;
        }
        Ok(config)
    }

    /// Command line flags win over the config file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.snapshot_dir {
            self.snapshot_dir = dir.clone();
        }
    }

    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if args.no_log_file {
            self.log_file = None;
        } else if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    fn merge_file(&mut self, path: &Path, file: FileConfig) -> Result<()> {
        let invalid = |reason: String| Error::Config {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(url) = file.landing_url {
            self.landing_url = url;
        }
        if let Some(pattern) = file.catalog_pattern {
            self.catalog_pattern = Regex::new(&pattern)
                .map_err(|e| invalid(format!("catalog_pattern: {e}")))?;
        }
        if let Some(dir) = file.snapshot_dir {
            self.snapshot_dir = dir;
        }
        if let Some(log_file) = file.log_file {
            self.log_file = Some(log_file);
        }
        if let Some(template) = file.image_url_template {
            if !template.contains(HASH_TOKEN) {
                return Err(invalid(format!(
                    "image_url_template must contain {HASH_TOKEN}"
                )));
            }
            self.image_url_template = template;
        }
        if let Some(timeout) = file.timeout {
            self.timeout = humantime::parse_duration(&timeout)
                .map_err(|e| invalid(format!("timeout: {e}")))?;
        }
        Ok(())
    }
}

/// `~/.config/gemwatch/config.toml` or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gemwatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let invalid = |reason: String| Error::Config {
        path: path.to_path_buf(),
        reason,
    };
    let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    toml::from_str(&text).map_err(|e| invalid(e.to_string()))
}
