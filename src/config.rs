use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const DEFAULT_PORT: &str = "8888";
pub const DEFAULT_API_URL: &str = "http://localhost:8888";
pub const DEFAULT_LOG_FILE: &str = "mashup-suggestions.log";

/// How long the success banner stays up before the form closes.
pub const SUCCESS_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    MySql,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(StoreKind::MySql),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store kind \"{other}\"")),
        }
    }
}

/// Server settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Left unset on purpose when missing: the endpoints answer with a
    /// configuration error instead of refusing to start.
    pub database_url: Option<String>,
    pub store: StoreKind,
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            warn!("DATABASE_URL is not set, suggestion endpoints will fail");
        }

        Ok(Self {
            port: try_load("RUST_PORT", DEFAULT_PORT)?,
            database_url,
            store: try_load("MASHUP_STORE", "mysql")?,
        })
    }
}

/// Terminal client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub success_delay: Duration,
}

impl ClientConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            api_url: try_load::<String>("MASHUP_API_URL", DEFAULT_API_URL)?
                .trim_end_matches('/')
                .to_string(),
            success_delay: SUCCESS_DELAY,
        })
    }
}

/// Log file for the client. Read before logging is up, so it never logs.
pub fn log_file() -> PathBuf {
    env::var("MASHUP_LOG_FILE")
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value \"{raw}\": {e}"))
}
