use std::str::FromStr;
use std::time::Duration;

use crate::errors::{KeeperError, KeeperResult};

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SYNC_WORKERS: usize = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub fetch_timeout: Duration,
    pub sync_workers: usize,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> KeeperResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        // Default db_path is relative to executable directory
        let db_path = std::env::var("FEEDKEEPER_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("feeds.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./feeds.db".to_string())
        });

        let timeout_secs = parse_positive(
            "FEEDKEEPER_FETCH_TIMEOUT",
            std::env::var("FEEDKEEPER_FETCH_TIMEOUT").ok(),
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?;

        let sync_workers = parse_positive(
            "FEEDKEEPER_SYNC_WORKERS",
            std::env::var("FEEDKEEPER_SYNC_WORKERS").ok(),
            DEFAULT_SYNC_WORKERS,
        )?;

        Ok(Self {
            db_path,
            fetch_timeout: Duration::from_secs(timeout_secs),
            sync_workers,
        })
    }
}

/// Parse an optional numeric setting, rejecting zero and garbage.
fn parse_positive<T>(name: &str, value: Option<String>, default: T) -> KeeperResult<T>
where
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = value else {
        return Ok(default);
    };

    let parsed: T = raw
        .trim()
        .parse()
        .map_err(|_| KeeperError::Config(format!("{} must be a number, got '{}'", name, raw)))?;

    if parsed == T::default() {
        return Err(KeeperError::Config(format!("{} must be greater than zero", name)));
    }

    Ok(parsed)
}
