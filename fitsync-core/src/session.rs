//! Session acquisition against the upstream site.
//!
//! The upstream exposes no API token scheme; identity is carried entirely by
//! server-issued cookies from a form login. [`Session`] therefore wraps a
//! cookie-jar [`reqwest::Client`] together with the authenticated username
//! (the diet export endpoint embeds it in the URL path). The session lives for
//! one pipeline run and is never persisted.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::contract::{AuthError, Authenticator};

/// Login form endpoint and field names of the upstream site.
pub const DEFAULT_LOGIN_URL: &str = "https://www.livestrong.com/login/";
const LOGIN_USERNAME_FIELD: &str = "login_username";
const LOGIN_PASSWORD_FIELD: &str = "login_password";

/// Upper bound on any single upstream request; expiry surfaces as a request
/// error instead of hanging the run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An authenticated handle on the upstream site: the cookie-bearing HTTP
/// client plus the username it was authenticated as.
///
/// The same Session must be reused for every feed request in a run — it is the
/// sole carrier of authenticated identity.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    username: String,
}

impl Session {
    /// The cookie-carrying client for feed requests.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Build a session around an already-constructed client. Used by tests
    /// and by authenticators.
    pub fn from_parts(client: reqwest::Client, username: impl Into<String>) -> Self {
        Self {
            client,
            username: username.into(),
        }
    }
}

/// Authenticator performing the upstream's form POST login.
pub struct FormLoginAuthenticator {
    login_url: String,
}

impl FormLoginAuthenticator {
    pub fn new() -> Self {
        Self::with_login_url(DEFAULT_LOGIN_URL)
    }

    /// Point the login exchange at a different host (test servers).
    pub fn with_login_url(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
        }
    }
}

impl Default for FormLoginAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for FormLoginAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        info!(username, login_url = %self.login_url, "Logging into upstream site");
        let response = client
            .post(&self.login_url)
            .form(&[
                (LOGIN_USERNAME_FIELD, username),
                (LOGIN_PASSWORD_FIELD, password),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }
        debug!(username, %status, "Login exchange completed");

        Ok(Session::from_parts(client, username))
    }
}
