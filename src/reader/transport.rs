//! The HTTP seam between the Google Reader core and the outside world
//!
//! The session and client operate against this trait rather than a concrete
//! HTTP client, so tests exercise the full protocol path with a scripted
//! transport and no network.

use async_trait::async_trait;

use crate::error::AppError;

/// A raw HTTP exchange result, before any protocol interpretation
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP operations the Google Reader protocol needs
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with the given headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<WireResponse, AppError>;

    /// POST `url` with a form-urlencoded body; repeated keys are allowed
    /// (the edit-tag endpoint takes repeated `i` fields)
    async fn post_form(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &[(String, String)],
    ) -> Result<WireResponse, AppError>;
}
