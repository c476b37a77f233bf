use crate::SpiderError;
use dotenv::var;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "./scraped_data";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (FintechScraper/1.0)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Runtime settings, read from the environment (and a `.env` file, if present).
///
/// | variable                       | default                            |
/// |--------------------------------|------------------------------------|
/// | `IRDUMP_DATA_DIR`              | `./scraped_data`                   |
/// | `IRDUMP_USER_AGENT`            | `Mozilla/5.0 (FintechScraper/1.0)` |
/// | `IRDUMP_TIMEOUT_SECS`          | `10`                               |
/// | `IRDUMP_DOWNLOAD_TIMEOUT_SECS` | `300`                              |
/// | `IRDUMP_RENDER_TIMEOUT_SECS`   | `60`                               |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory holding one subdirectory per company.
    pub data_root: PathBuf,
    pub user_agent: String,
    /// Timeout for connecting, and for each page or quote request as a whole.
    pub page_timeout: Duration,
    /// Timeout for a document download, body included.
    pub download_timeout: Duration,
    /// Longest wait for a hyperlink to appear in a headless render.
    pub render_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, SpiderError> {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            data_root: var("IRDUMP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_root),
            user_agent: var("IRDUMP_USER_AGENT").unwrap_or(defaults.user_agent),
            page_timeout: secs_var("IRDUMP_TIMEOUT_SECS")?.unwrap_or(defaults.page_timeout),
            download_timeout: secs_var("IRDUMP_DOWNLOAD_TIMEOUT_SECS")?
                .unwrap_or(defaults.download_timeout),
            render_timeout: secs_var("IRDUMP_RENDER_TIMEOUT_SECS")?
                .unwrap_or(defaults.render_timeout),
        })
    }

    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = data_root.into();
        self
    }
}

fn secs_var(key: &str) -> Result<Option<Duration>, SpiderError> {
    match var(key) {
        Ok(raw) => parse_secs(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, SpiderError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            SpiderError::Config(format!(
                "{key} must be a whole number of seconds, got {raw:?}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.data_root, PathBuf::from("./scraped_data"));
        assert_eq!(config.user_agent, "Mozilla/5.0 (FintechScraper/1.0)");
        assert_eq!(config.page_timeout, Duration::from_secs(10));
        assert_eq!(config.render_timeout, Duration::from_secs(60));
        assert_eq!(config.download_timeout, Duration::from_secs(300));
    }

    #[test]
    fn seconds_must_be_numeric() {
        assert_eq!(parse_secs("K", " 30 ").unwrap(), Duration::from_secs(30));
        assert!(matches!(parse_secs("K", "ten"), Err(SpiderError::Config(_))));
    }
}
