use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::feed::{PageSize, PageSizeError};
use crate::feed::pagination::{DEFAULT_ITEMS_PER_LOAD, DEFAULT_ITEMS_PER_PAGE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid pagination: {0}")]
    Pagination(#[from] PageSizeError),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub admin_token: String,
    pub log_dir: String,
    pub page_size: PageSize,
    pub view_ttl: Duration,
    pub max_views: usize,
    pub db_max_connections: u32,
    pub backdrop_bucket: Duration,
    pub auto_create_schema: bool,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug, PartialEq)]
struct PartialServerConfig {
    database_url: Option<String>,
    listen_addr: Option<String>,
    admin_token: Option<String>,
    log_dir: Option<String>,
    items_per_page: Option<usize>,
    items_per_load: Option<usize>,
    view_ttl_secs: Option<u64>,
    max_views: Option<usize>,
    db_max_connections: Option<u32>,
    backdrop_bucket_secs: Option<u64>,
    auto_create_schema: Option<bool>,
}

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_VIEW_TTL_SECS: u64 = 30 * 60;
const DEFAULT_MAX_VIEWS: usize = 10_000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_BACKDROP_BUCKET_SECS: u64 = 60 * 60;

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

impl PartialServerConfig {
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: lookup("DATABASE_URL"),
            listen_addr: lookup("LISTEN_ADDR"),
            admin_token: lookup("ADMIN_TOKEN"),
            log_dir: lookup("LOG_DIR"),
            items_per_page: parse_var(&lookup, "ITEMS_PER_PAGE")?,
            items_per_load: parse_var(&lookup, "ITEMS_PER_LOAD")?,
            view_ttl_secs: parse_var(&lookup, "VIEW_TTL_SECS")?,
            max_views: parse_var(&lookup, "MAX_VIEWS")?,
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS")?,
            backdrop_bucket_secs: parse_var(&lookup, "BACKDROP_BUCKET_SECS")?,
            auto_create_schema: parse_var(&lookup, "AUTO_CREATE_SCHEMA")?,
        })
    }

    /// Fields set in `self` win over `fallback`.
    fn or(self, fallback: Self) -> Self {
        Self {
            database_url: self.database_url.or(fallback.database_url),
            listen_addr: self.listen_addr.or(fallback.listen_addr),
            admin_token: self.admin_token.or(fallback.admin_token),
            log_dir: self.log_dir.or(fallback.log_dir),
            items_per_page: self.items_per_page.or(fallback.items_per_page),
            items_per_load: self.items_per_load.or(fallback.items_per_load),
            view_ttl_secs: self.view_ttl_secs.or(fallback.view_ttl_secs),
            max_views: self.max_views.or(fallback.max_views),
            db_max_connections: self.db_max_connections.or(fallback.db_max_connections),
            backdrop_bucket_secs: self.backdrop_bucket_secs.or(fallback.backdrop_bucket_secs),
            auto_create_schema: self.auto_create_schema.or(fallback.auto_create_schema),
        }
    }
}

impl TryFrom<PartialServerConfig> for ServerConfig {
    type Error = ConfigError;

    fn try_from(partial: PartialServerConfig) -> Result<Self, Self::Error> {
        let page_size = PageSize::new(
            partial.items_per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE),
            partial.items_per_load.unwrap_or(DEFAULT_ITEMS_PER_LOAD),
        )?;
        let bucket_secs = partial.backdrop_bucket_secs.unwrap_or(DEFAULT_BACKDROP_BUCKET_SECS);
        if bucket_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "BACKDROP_BUCKET_SECS",
                value: bucket_secs.to_string(),
            });
        }
        let max_views = partial.max_views.unwrap_or(DEFAULT_MAX_VIEWS);
        if max_views == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_VIEWS",
                value: max_views.to_string(),
            });
        }

        Ok(ServerConfig {
            database_url: partial.database_url.ok_or(ConfigError::Missing("DATABASE_URL"))?,
            admin_token: partial
                .admin_token
                .filter(|token| !token.trim().is_empty())
                .ok_or(ConfigError::Missing("ADMIN_TOKEN"))?,
            listen_addr: partial.listen_addr.unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            log_dir: partial.log_dir.unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()),
            page_size,
            view_ttl: Duration::from_secs(partial.view_ttl_secs.unwrap_or(DEFAULT_VIEW_TTL_SECS)),
            max_views,
            db_max_connections: partial.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            backdrop_bucket: Duration::from_secs(bucket_secs),
            auto_create_schema: partial.auto_create_schema.unwrap_or(true),
        })
    }
}

impl ServerConfig {
    /// Loads `.env`, then the optional TOML file, then lets environment variables
    /// override whatever the file set.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path) => PartialServerConfig::from_file(Path::new(path))?,
            None => PartialServerConfig::default(),
        };
        let env_config = PartialServerConfig::from_lookup(|key| env::var(key).ok())?;

        env_config.or(file_config).try_into()
    }
}
