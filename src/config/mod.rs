use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "rpeetracker";

/// Default cache generation. Bump the version marker whenever the shell
/// assets change so that `cache activate` evicts the previous generation.
pub const DEFAULT_CACHE_GENERATION: &str = "pee-tracker-cache-v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Seconds between two "has the day rolled over?" checks in `watch`.
    #[serde(default = "default_day_check_interval")]
    pub day_check_interval: u64,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_database")]
    pub database: String,
    #[serde(default = "default_generation")]
    pub generation: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,
}

fn default_day_check_interval() -> u64 {
    60
}
fn default_cache_database() -> String {
    Config::cache_database_file().to_string_lossy().to_string()
}
fn default_generation() -> String {
    DEFAULT_CACHE_GENERATION.to_string()
}
fn default_origin() -> String {
    "http://localhost:8080/".to_string()
}
fn default_manifest() -> Vec<String> {
    ["/", "/index.html", "/app.js", "/styles.css"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            database: default_cache_database(),
            generation: default_generation(),
            origin: default_origin(),
            manifest: default_manifest(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            day_check_interval: default_day_check_interval(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_NAME)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(format!(".{APP_NAME}"))
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_NAME}.conf"))
    }

    /// Return the full path of the event database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_NAME}.sqlite"))
    }

    /// Return the full path of the asset cache database
    pub fn cache_database_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_NAME}-cache.sqlite"))
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize the configuration directory and file.
    ///
    /// Returns the database path the new configuration points to. In test
    /// mode the config file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())
                .map_err(|e| AppError::ConfigSave(e.to_string()))?;
            file.write_all(yaml.as_bytes())
                .map_err(|e| AppError::ConfigSave(e.to_string()))?;
        }

        Ok(config)
    }
}
