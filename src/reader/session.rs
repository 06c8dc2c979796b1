//! Authenticated session against the Google Reader API
//!
//! Owns the SID token and the credential exchange. The token is written
//! once by `authenticate()` and read without locking afterwards; there is
//! no automatic refresh, so a 401/403 on a later call surfaces as an
//! ordinary network error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::error::AppError;
use crate::reader::transport::Transport;

pub struct Session<T: Transport> {
    transport: T,
    api_url: String,
    username: String,
    password: String,
    token: OnceLock<String>,
    closed: AtomicBool,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, api_url: String, username: String, password: String) -> Self {
        Self {
            transport,
            api_url,
            username,
            password,
            token: OnceLock::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Exchange credentials for a SID token via `accounts/ClientLogin`
    ///
    /// Single-flight: once a token is held, further calls return it
    /// without another network round-trip.
    pub async fn authenticate(&self) -> Result<(), AppError> {
        self.ensure_open()?;
        if self.token.get().is_some() {
            return Ok(());
        }

        let url = self.endpoint("/accounts/ClientLogin");
        debug!("Authenticating to {}", url);

        let form = [
            ("Email".to_string(), self.username.clone()),
            ("Passwd".to_string(), self.password.clone()),
        ];
        let response = self
            .transport
            .post_form(&url, &[], &form)
            .await
            .map_err(|e| AppError::Authentication(format!("Authentication error: {}", e)))?;

        if !response.is_success() {
            return Err(AppError::Authentication(format!(
                "Authentication failed: {}",
                response.status
            )));
        }

        let sid = response
            .body
            .lines()
            .find_map(|line| line.strip_prefix("SID="))
            .ok_or_else(|| {
                AppError::Authentication("No SID found in authentication response".to_string())
            })?;

        // A concurrent winner is fine; both got the same credential exchange
        let _ = self.token.set(sid.to_string());
        info!("Authentication successful");
        Ok(())
    }

    /// Authorization header for authenticated calls
    pub fn auth_headers(&self) -> Result<Vec<(String, String)>, AppError> {
        let token = self.token.get().ok_or_else(|| {
            AppError::Authentication("Not authenticated. Call authenticate() first.".to_string())
        })?;
        Ok(vec![(
            "Authorization".to_string(),
            format!("GoogleLogin auth={}", token),
        )])
    }

    /// Authenticated GET; returns the body of a 2xx response
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<String, AppError> {
        self.ensure_open()?;
        let headers = self.auth_headers()?;
        let response = self
            .transport
            .get(&self.endpoint(path), &headers, query)
            .await?;
        if !response.is_success() {
            return Err(AppError::Network(format!(
                "GET {} failed with status {}",
                path, response.status
            )));
        }
        Ok(response.body)
    }

    /// Authenticated form POST; returns the body of a 2xx response
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<String, AppError> {
        self.ensure_open()?;
        let headers = self.auth_headers()?;
        let response = self
            .transport
            .post_form(&self.endpoint(path), &headers, form)
            .await?;
        if !response.is_success() {
            return Err(AppError::Network(format!(
                "POST {} failed with status {}",
                path, response.status
            )));
        }
        Ok(response.body)
    }

    /// Mark the session closed. Idempotent and safe from a signal handler;
    /// in-flight calls are not cancelled, later calls fail fast.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("Session closed");
        }
    }

    fn ensure_open(&self) -> Result<(), AppError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AppError::Network("Session is closed".to_string()));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::testing::MockTransport;

    fn session(transport: MockTransport) -> Session<MockTransport> {
        Session::new(
            transport,
            "https://rss.example/api/greader.php".to_string(),
            "alice".to_string(),
            "secret".to_string(),
        )
    }

    #[tokio::test]
    async fn test_authenticate_extracts_sid() {
        let transport = MockTransport::new();
        transport.push_ok("SID=token123\nLSID=ignored\nAuth=ignored");
        let session = session(transport.clone());

        session.authenticate().await.unwrap();
        let headers = session.auth_headers().unwrap();
        assert_eq!(
            headers,
            vec![(
                "Authorization".to_string(),
                "GoogleLogin auth=token123".to_string()
            )]
        );

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].url.ends_with("/accounts/ClientLogin"));
        assert!(recorded[0]
            .form
            .contains(&("Email".to_string(), "alice".to_string())));
    }

    #[tokio::test]
    async fn test_authenticate_is_single_flight() {
        let transport = MockTransport::new();
        transport.push_ok("SID=token123");
        let session = session(transport.clone());

        session.authenticate().await.unwrap();
        session.authenticate().await.unwrap();
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_bad_status() {
        let transport = MockTransport::new();
        transport.push_status(401, "Unauthorized");
        let session = session(transport);

        let err = session.authenticate().await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_authenticate_missing_sid_line() {
        let transport = MockTransport::new();
        transport.push_ok("Auth=something\nLSID=other");
        let session = session(transport);

        let err = session.authenticate().await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_auth_headers_before_authenticate() {
        let transport = MockTransport::new();
        let session = session(transport);
        let err = session.auth_headers().unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_get_before_authenticate_makes_no_call() {
        let transport = MockTransport::new();
        let session = session(transport.clone());
        let err = session.get("/reader/api/0/unread-count", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_closed_session_fails_fast() {
        let transport = MockTransport::new();
        transport.push_ok("SID=token123");
        let session = session(transport.clone());
        session.authenticate().await.unwrap();

        session.close();
        session.close(); // idempotent

        let err = session
            .get("/reader/api/0/subscription/list", &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("closed"));
        assert_eq!(transport.call_count(), 1); // only the auth call
    }
}
