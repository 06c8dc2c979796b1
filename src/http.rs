//! HTTP client utilities
//!
//! Builds a reqwest::Client configured with a fixed timeout and system
//! proxy support, and adapts it to the `Transport` trait the reader core
//! speaks.
//!
//! Recognized proxy env vars:
//! - HTTP_PROXY / http_proxy
//! - HTTPS_PROXY / https_proxy
//! - ALL_PROXY / all_proxy
//! - NO_PROXY / no_proxy

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::time::Duration;
use url::Url;

use crate::error::AppError;
use crate::reader::transport::{Transport, WireResponse};

/// Build a reqwest Client with the given timeout, honoring proxy env vars
pub fn client_with_timeout(timeout: Duration) -> Client {
    let mut builder = Client::builder().timeout(timeout);

    let https_proxy = getenv_first(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]);
    let http_proxy = getenv_first(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]);
    let no_proxy = getenv_first(&["NO_PROXY", "no_proxy"]).unwrap_or_default();

    if https_proxy.is_some() || http_proxy.is_some() {
        let proxy = Proxy::custom(move |url: &Url| {
            let host = url.host_str().unwrap_or("");
            if bypasses_proxy(host, &no_proxy) {
                return None;
            }
            match url.scheme() {
                "https" => https_proxy.clone().or_else(|| http_proxy.clone()),
                "http" => http_proxy.clone().or_else(|| https_proxy.clone()),
                _ => None,
            }
        });
        builder = builder.proxy(proxy);
    }

    builder
        .user_agent(concat!("freshrss-mcp/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
}

fn getenv_first(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}

/// NO_PROXY matching: `*` bypasses everything; a leading dot or a bare
/// domain matches as a suffix; localhost and IP literals match exactly
fn bypasses_proxy(host: &str, no_proxy: &str) -> bool {
    if host.is_empty() {
        return false;
    }
    let host = host.to_ascii_lowercase();
    no_proxy
        .split(',')
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .any(|token| {
            if token == "*" {
                return true;
            }
            let suffix = token.trim_start_matches('.');
            if token == "localhost" || token.parse::<std::net::IpAddr>().is_ok() {
                host == token
            } else {
                host == suffix || host.ends_with(&format!(".{}", suffix))
            }
        })
}

/// `Transport` implementation backed by reqwest
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: client_with_timeout(timeout),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<WireResponse, AppError> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request.send().await?;
        Ok(WireResponse {
            status: response.status().as_u16(),
            body: response.text().await?,
        })
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &[(String, String)],
    ) -> Result<WireResponse, AppError> {
        let mut request = self.client.post(url).form(form);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request.send().await?;
        Ok(WireResponse {
            status: response.status().as_u16(),
            body: response.text().await?,
        })
    }
}
