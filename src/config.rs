use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app::PullOptions;
use crate::domain::{BatchSize, DEFAULT_BATCH_SIZE, LayerUrl};
use crate::error::GeotableError;
use crate::service::DEFAULT_TIMEOUT;

pub const CONFIG_FILE_NAME: &str = "agol-pull.json";
pub const DEFAULT_TOKEN_ENV: &str = "AGOL_TOKEN";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub layer_url: Option<String>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub reproject: Option<bool>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub token_env: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub layer_url: Option<String>,
    pub batch_size: Option<usize>,
    pub reproject: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub layer_url: LayerUrl,
    pub options: PullOptions,
    pub timeout: Duration,
    pub token: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: Option<&str>) -> Result<Config, GeotableError> {
        let config_path = match path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_paths().into_iter().find(|path| path.exists()),
        };
        let Some(config_path) = config_path else {
            debug!("no config file found, using defaults");
            return Ok(Config::default());
        };

        debug!(path = %config_path.display(), "reading config file");
        let content = fs::read_to_string(&config_path)
            .map_err(|_| GeotableError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| GeotableError::ConfigParse(err.to_string()))
    }

    pub fn resolve(
        path: Option<&str>,
        overrides: Overrides,
    ) -> Result<ResolvedConfig, GeotableError> {
        let config = Self::load(path)?;
        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: Overrides,
    ) -> Result<ResolvedConfig, GeotableError> {
        let layer_url: LayerUrl = overrides
            .layer_url
            .or(config.layer_url)
            .ok_or(GeotableError::MissingLayerUrl)?
            .parse()?;
        if !layer_url.has_layer_index() {
            warn!(
                layer_url = %layer_url,
                "url does not end in a layer index; the service's default layer will be queried"
            );
        }

        let batch_size = BatchSize::new(
            overrides
                .batch_size
                .or(config.batch_size)
                .unwrap_or(DEFAULT_BATCH_SIZE),
        )?;
        let reproject = overrides.reproject.or(config.reproject).unwrap_or(true);
        let timeout = overrides
            .timeout_secs
            .or(config.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let token_env = config
            .token_env
            .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
        let token = overrides
            .token
            .or_else(|| std::env::var(&token_env).ok())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Ok(ResolvedConfig {
            layer_url,
            options: PullOptions {
                batch_size,
                reproject,
            },
            timeout,
            token,
        })
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dirs) = ProjectDirs::from("", "", "agol-pull") {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }
        paths
    }
}
