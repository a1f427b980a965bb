use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::errors::ConfigError;

const APP_DIR: &str = "customer_desk";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

pub const CONFIG_DIR_ENV: &str = "CUSTOMER_DESK_CONFIG_DIR";
pub const API_URL_ENV: &str = "CUSTOMER_DESK_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_secs: u64,
    /// Unset means requests may wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_notification_ttl() -> u64 {
    DEFAULT_NOTIFICATION_TTL_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Applies environment overrides on top of the persisted values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(API_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.api_base_url = trimmed.to_string();
            }
        }
        self
    }

    /// Updates a single key from its textual representation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key.to_ascii_lowercase().replace('-', "_").as_str() {
            "api_base_url" | "api_url" => {
                if value.is_empty() {
                    return Err(invalid(key, "URL cannot be empty"));
                }
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "notification_ttl_secs" => {
                self.notification_ttl_secs = value
                    .parse::<u64>()
                    .map_err(|_| invalid(key, "enter a whole number of seconds"))?;
            }
            "request_timeout_secs" => {
                if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    self.request_timeout_secs = None;
                } else {
                    let secs = value
                        .parse::<u64>()
                        .map_err(|_| invalid(key, "enter a whole number of seconds or `none`"))?;
                    self.request_timeout_secs = Some(secs);
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.validate()
    }

    /// Rejects values that would silence notifications.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_ttl_secs == 0 {
            return Err(invalid(
                "notification_ttl_secs",
                "must be at least one second",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Resolves the configuration directory from `CUSTOMER_DESK_CONFIG_DIR`,
    /// falling back to the platform config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let base = match env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(APP_DIR),
        };
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
