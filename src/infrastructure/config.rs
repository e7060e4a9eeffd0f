//! Location, first-run seeding and loading of the `hc` configuration.

use crate::domain::api_config::ApiConfig;
use crate::infrastructure::logging;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Dispatch;

/// Directory under the home directory holding config and log files
pub const CONFIG_DIR_NAME: &str = ".hc";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV_VAR: &str = "HC_CONFIG_DIR";

pub const API_CONFIG_FILE_NAME: &str = "api_config.yml";
pub const LOG_FILE_NAME: &str = "hc.log";

/// Written to `api_config.yml` when the config directory is first created.
pub const API_CONFIG_SAMPLE: &str = r#"services:
  - name: HttpBin
    environments:
      - name: default
        base_url: "https://httpbin.org"
        auth:
          type: "none"
        headers:
          Content-Type: "application/json"

    routes:
      - name: post-json
        description: "POST JSON test payload"
        method: POST
        path: "/post"
        body: '{"hippo": "rules"}'

      - name: get-ip
        description: "Get your IP address"
        method: GET
        path: "/ip"
        body: ""

  - name: DuckDuckGo
    environments:
      - name: default
        base_url: "https://duckduckgo.com"
        auth:
          type: "none"

    routes:
      - name: homepage
        description: "Fetch DuckDuckGo homepage"
        method: GET
        path: "/"
        body: ""
"#;

/// Files used by one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub api_config_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            api_config_file: config_dir.join(API_CONFIG_FILE_NAME),
            log_file: config_dir.join(LOG_FILE_NAME),
            config_dir,
        }
    }

    /// Uses `config_dir` when given, otherwise `$HOME/.hc`.
    pub fn resolve(config_dir: Option<PathBuf>) -> Result<Self> {
        match config_dir {
            Some(dir) => Ok(Self::in_dir(dir)),
            None => {
                let home = dirs::home_dir().context("failed to detect home directory")?;
                Ok(Self::in_dir(home.join(CONFIG_DIR_NAME)))
            }
        }
    }
}

/// What `prepare` had to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeded {
    Nothing,
    /// New directory with the sample API config.
    Sample,
    /// Existing directory that lacked an API config; an empty one was written.
    Empty,
}

/// Creates the config directory and API config file when they are missing.
pub fn prepare(paths: &AppPaths) -> Result<Seeded> {
    if !paths.config_dir.exists() {
        fs::create_dir_all(&paths.config_dir).with_context(|| {
            format!("failed to create config directory {}", paths.config_dir.display())
        })?;
        write_api_config(&paths.api_config_file, API_CONFIG_SAMPLE)?;
        return Ok(Seeded::Sample);
    }

    if !paths.api_config_file.exists() {
        let empty = serde_yaml::to_string(&ApiConfig::default())
            .context("failed to serialize empty API config")?;
        write_api_config(&paths.api_config_file, &empty)?;
        return Ok(Seeded::Empty);
    }

    Ok(Seeded::Nothing)
}

fn write_api_config(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed to write API config {}", path.display()))
}

pub fn load_api_config(path: &Path) -> Result<ApiConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read API config {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(ApiConfig::default());
    }
    serde_yaml::from_str(&raw).with_context(|| format!("failed to parse API config {}", path.display()))
}

/// Everything a module needs, built once per invocation and never mutated.
pub struct AppContext {
    pub paths: AppPaths,
    pub api_config: ApiConfig,
    /// Log sink for this invocation, installed by the caller as the scoped
    /// default subscriber.
    pub dispatch: Dispatch,
}

impl AppContext {
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self> {
        let paths = AppPaths::resolve(config_dir)?;
        let seeded = prepare(&paths)?;
        let dispatch = logging::build_dispatch(&paths.log_file)?;

        let api_config = tracing::dispatcher::with_default(&dispatch, || {
            if seeded != Seeded::Nothing {
                tracing::info!(?seeded, path = %paths.api_config_file.display(), "seeded API config");
            }
            load_api_config(&paths.api_config_file)
        })?;

        Ok(Self {
            paths,
            api_config,
            dispatch,
        })
    }
}
