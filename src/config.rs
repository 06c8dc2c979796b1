//! Server configuration
//!
//! All configuration comes from environment variables, read and validated
//! once at startup. Missing required credentials abort the process with a
//! clear message instead of surfacing as cryptic tool-call failures later.

use anyhow::{bail, Result};

/// Configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the FreshRSS instance, without trailing slash
    pub base_url: String,
    /// FreshRSS account username
    pub username: String,
    /// FreshRSS account password (or API password)
    pub password: String,
    /// Path of the Google Reader compatible API under the base URL
    pub api_path: String,
    /// Bind host accepted for compatibility with HTTP-transport deployments;
    /// the stdio transport ignores it
    #[allow(dead_code)]
    pub server_host: String,
    /// Bind port, same caveat as `server_host`
    #[allow(dead_code)]
    pub server_port: u16,
}

const DEFAULT_API_PATH: &str = "/api/greader.php";
const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8000;

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injected variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = require(&lookup, "FRESHRSS_URL")?;
        let username = require(&lookup, "FRESHRSS_USERNAME")?;
        let password = require(&lookup, "FRESHRSS_PASSWORD")?;

        let api_path = lookup("FRESHRSS_API_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_PATH.to_string());

        let server_host = lookup("MCP_SERVER_HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());

        let server_port = match lookup("MCP_SERVER_PORT") {
            Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => bail!("MCP_SERVER_PORT is not a valid port number: {}", raw),
            },
            _ => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            api_path: api_path.trim_end_matches('/').to_string(),
            server_host,
            server_port,
        })
    }

    /// Root of the Google Reader API, e.g. `https://rss.example/api/greader.php`
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url, self.api_path)
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Required environment variable {} is not set", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let vars = env(&[
            ("FRESHRSS_URL", "https://rss.example/"),
            ("FRESHRSS_USERNAME", "alice"),
            ("FRESHRSS_PASSWORD", "secret"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.base_url, "https://rss.example");
        assert_eq!(config.api_path, "/api/greader.php");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.api_url(), "https://rss.example/api/greader.php");
    }

    #[test]
    fn test_missing_required_variable() {
        let vars = env(&[("FRESHRSS_URL", "https://rss.example")]);
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("FRESHRSS_USERNAME"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let vars = env(&[
            ("FRESHRSS_URL", "https://rss.example"),
            ("FRESHRSS_USERNAME", "alice"),
            ("FRESHRSS_PASSWORD", "secret"),
            ("MCP_SERVER_PORT", "not-a-port"),
        ]);
        assert!(Config::from_lookup(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn test_custom_api_path() {
        let vars = env(&[
            ("FRESHRSS_URL", "https://rss.example"),
            ("FRESHRSS_USERNAME", "alice"),
            ("FRESHRSS_PASSWORD", "secret"),
            ("FRESHRSS_API_PATH", "/greader/"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.api_url(), "https://rss.example/greader");
    }
}
