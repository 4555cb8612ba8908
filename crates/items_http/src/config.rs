//! Environment-driven server configuration.
//!
//! # Responsibility
//! - Resolve every runtime setting from `ITEMS_*` variables with defaults.
//! - Reject malformed values before anything is opened or bound.

use items_core::{default_log_level, ImportOptions};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ITEMS_DB_PATH";
pub const ENV_BIND_ADDR: &str = "ITEMS_BIND_ADDR";
pub const ENV_LOG_LEVEL: &str = "ITEMS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ITEMS_LOG_DIR";
pub const ENV_CSV_DELIMITER: &str = "ITEMS_CSV_DELIMITER";
pub const ENV_MAX_UPLOAD_BYTES: &str = "ITEMS_MAX_UPLOAD_BYTES";

const DEFAULT_DB_FILE_NAME: &str = "items.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "items_logs";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr(String),
    InvalidDelimiter(String),
    InvalidMaxUploadBytes(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr(value) => {
                write!(f, "{ENV_BIND_ADDR}=`{value}` is not a socket address")
            }
            Self::InvalidDelimiter(value) => write!(
                f,
                "{ENV_CSV_DELIMITER}=`{value}` must be exactly one ASCII character"
            ),
            Self::InvalidMaxUploadBytes(value) => write!(
                f,
                "{ENV_MAX_UPLOAD_BYTES}=`{value}` must be a positive integer"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absolute directory; validated by `init_logging`.
    pub log_dir: String,
    pub csv_delimiter: u8,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let log_level = get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = get(ENV_LOG_DIR).unwrap_or_else(|| {
            std::env::temp_dir()
                .join(DEFAULT_LOG_DIR_NAME)
                .to_string_lossy()
                .into_owned()
        });

        // Not routed through `get`: a lone space or tab is a legitimate delimiter.
        let csv_delimiter = match lookup(ENV_CSV_DELIMITER).filter(|value| !value.is_empty()) {
            Some(value) => parse_delimiter(&value)?,
            None => ImportOptions::default().delimiter,
        };

        let max_upload_bytes = match get(ENV_MAX_UPLOAD_BYTES) {
            Some(value) => match value.parse::<usize>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => return Err(ConfigError::InvalidMaxUploadBytes(value)),
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_dir,
            csv_delimiter,
            max_upload_bytes,
        })
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            delimiter: self.csv_delimiter,
            ..ImportOptions::default()
        }
    }
}

fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() && *byte != b'\n' && *byte != b'\r' && *byte != b'"' => {
            Ok(*byte)
        }
        _ => Err(ConfigError::InvalidDelimiter(value.to_string())),
    }
}
