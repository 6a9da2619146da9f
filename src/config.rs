use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_LIMIT: u32 = 25;
const API_URL_ENV: &str = "CHATWATCH_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiConfig,
    #[serde(default)]
    ui: UiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiConfig {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct UiConfig {
    default_limit: Option<u32>,
    timezone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Option<Duration>,
    pub default_limit: u32,
    pub timezone: Tz,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_file = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            info!("No config file at {}, using defaults", path.display());
            ConfigFile::default()
        };

        Self::from_parts(config_file, std::env::var(API_URL_ENV).ok())
    }

    pub fn load(path: &Path, api_url_override: Option<String>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        if let Some(url) = api_url_override {
            config.api_url = url;
        }
        Ok(config)
    }

    fn from_parts(config_file: ConfigFile, env_api_url: Option<String>) -> Result<Self> {
        let api_url = env_api_url
            .or(config_file.api.url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let default_limit = config_file.ui.default_limit.unwrap_or(DEFAULT_LIMIT).max(1);

        let timezone = match config_file.ui.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", name, e))?,
            None => local_timezone(),
        };

        Ok(Self {
            api_url,
            request_timeout: config_file.api.timeout_secs.map(Duration::from_secs),
            default_limit,
            timezone,
        })
    }
}

fn local_timezone() -> Tz {
    match iana_time_zone::get_timezone()
        .map_err(|e| e.to_string())
        .and_then(|name| name.parse::<Tz>().map_err(|e| e.to_string()))
    {
        Ok(tz) => tz,
        Err(e) => {
            warn!("Could not detect local timezone, falling back to UTC: {}", e);
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> ConfigFile {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_parts(parse("[ui]\ntimezone = \"UTC\"\n"), None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.default_limit, 25);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[test]
    fn env_url_wins_over_file() {
        let file = parse(
            r#"
            [api]
            url = "http://file.example/api"
            timeout_secs = 5

            [ui]
            default_limit = 10
            timezone = "Europe/Paris"
            "#,
        );
        let config =
            Config::from_parts(file, Some("http://env.example/api".to_string())).unwrap();
        assert_eq!(config.api_url, "http://env.example/api");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let file = parse("[ui]\ntimezone = \"Mars/Olympus\"\n");
        assert!(Config::from_parts(file, None).is_err());
    }

    #[test]
    fn missing_file_is_not_fatal() {
        let config = Config::load(
            Path::new("/nonexistent/chatwatch.toml"),
            Some("http://cli.example".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_url, "http://cli.example");
    }
}
