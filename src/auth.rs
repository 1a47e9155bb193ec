//! Credential exchange against the service's login endpoint.
//!
//! The exchange is a form POST: `act=login&name=...&pass=...&challstr=...`.
//! The session machine validates the response body; this module only moves
//! bytes.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Timeout for the login exchange. The protocol itself enforces none; a
/// hung exchange would otherwise stall the session forever.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the credential exchange. Always fatal: the bot cannot
/// function unauthenticated.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The login endpoint, as the session driver sees it.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// POST the login form and return the raw response body.
    async fn exchange(
        &self,
        url: &str,
        username: &str,
        password: &str,
        challenge: &str,
    ) -> Result<String, AuthError>;
}

/// Production [`AuthClient`] over HTTPS.
pub struct HttpAuthClient {
    client: reqwest::Client,
}

impl HttpAuthClient {
    /// Build the client with a bounded timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(LOGIN_TIMEOUT)
            .user_agent("warble/0.4")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn exchange(
        &self,
        url: &str,
        username: &str,
        password: &str,
        challenge: &str,
    ) -> Result<String, AuthError> {
        let form = [
            ("act", "login"),
            ("name", username),
            ("pass", password),
            ("challstr", challenge),
        ];
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
