use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub page_size: u64,
    pub search_debounce_ms: u64,
    pub session_path: PathBuf,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, applying defaults for optional keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("{} is not set", key))
        };

        let base_url = required("VITTA_BASE_URL")?;
        let username = required("VITTA_USERNAME")?;
        let password = required("VITTA_PASSWORD")?;

        let page_size = match lookup("VITTA_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| anyhow!("VITTA_PAGE_SIZE must be a positive integer, got {}", raw))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let search_debounce_ms = match lookup("VITTA_SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("VITTA_SEARCH_DEBOUNCE_MS: {}", e))?,
            None => DEFAULT_SEARCH_DEBOUNCE_MS,
        };

        let session_path = lookup("VITTA_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_path);

        let log_level = lookup("VITTA_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Settings {
            base_url,
            username,
            password,
            page_size,
            search_debounce_ms,
            session_path,
            log_level,
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_session_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vitta")
        .join("session")
}
