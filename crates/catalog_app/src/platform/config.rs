use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_engine::{ApiSettings, EngineSettings, FetcherSettings, PushSettings, PushTopic};
use catalog_logging::{catalog_info, catalog_warn};
use serde::{Deserialize, Serialize};

/// Key of the local Reverb development server.
const DEFAULT_APP_KEY: &str = "hkrw5yhybhgasis7vrev";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub push: PushConfig,
    pub fetcher: FetcherConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let settings = ApiSettings::default();
        Self {
            base_url: settings.base_url,
            connect_timeout_ms: millis(settings.connect_timeout),
            request_timeout_ms: millis(settings.request_timeout),
            max_bytes: settings.max_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub host: String,
    pub port: u16,
    pub app_key: String,
    pub channel: String,
    pub event: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        let settings = PushSettings::default();
        Self {
            host: settings.host,
            port: settings.port,
            app_key: DEFAULT_APP_KEY.to_string(),
            channel: settings.topic.channel,
            event: settings.topic.event,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub quiet_period_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: millis(FetcherSettings::default().quiet_period),
        }
    }
}

impl AppConfig {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api.base_url.clone(),
            connect_timeout: Duration::from_millis(self.api.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.api.request_timeout_ms),
            max_bytes: self.api.max_bytes,
        }
    }

    pub fn push_settings(&self) -> PushSettings {
        PushSettings {
            host: self.push.host.clone(),
            port: self.push.port,
            app_key: self.push.app_key.clone(),
            topic: self.topic(),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fetcher: FetcherSettings {
                quiet_period: Duration::from_millis(self.fetcher.quiet_period_ms),
            },
            topic: self.topic(),
        }
    }

    fn topic(&self) -> PushTopic {
        PushTopic {
            channel: self.push.channel.clone(),
            event: self.push.event.clone(),
        }
    }
}

/// Loads the config file. No path, or a path that does not exist, yields the defaults.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            catalog_warn!("config file {:?} not found, using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    catalog_info!("loaded config from {:?}", path);
    Ok(config)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
