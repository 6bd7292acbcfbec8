use std::env;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use korean_core::model::UserId;

use crate::error::AuthError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The learner identity a service instance is bound to.
///
/// Anonymous sessions can read (and see empty progress) but never mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthSession {
    #[default]
    Anonymous,
    SignedIn(UserId),
}

impl AuthSession {
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthSession::Anonymous => None,
            AuthSession::SignedIn(user) => Some(*user),
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthSession::SignedIn(_))
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl AuthConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("KOREAN_AUTH_URL").ok()?;
        let anon_key = env::var("KOREAN_AUTH_ANON_KEY").ok()?;
        if base_url.trim().is_empty() || anon_key.trim().is_empty() {
            return None;
        }
        Some(Self { base_url, anon_key })
    }
}

/// Resolves access tokens against the hosted auth endpoint.
///
/// The app never implements login flows itself; it only exchanges a bearer
/// token for a stable user id.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    config: Option<AuthConfig>,
}

impl AuthClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AuthConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AuthConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Exchange an access token for a signed-in session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the client is unconfigured, the request
    /// fails, or the backend responds without a usable user id.
    pub async fn verify_token(&self, access_token: &str) -> Result<AuthSession, AuthError> {
        let config = self.config.as_ref().ok_or(AuthError::Disabled)?;

        let url = format!("{}/auth/v1/user", config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .header("apikey", &config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::HttpStatus(response.status()));
        }

        let body: UserResponse = response.json().await?;
        let user = body
            .id
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedUser)?;

        debug!(%user, "verified access token");
        Ok(AuthSession::SignedIn(user))
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_has_no_user() {
        let session = AuthSession::Anonymous;
        assert!(!session.is_signed_in());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn signed_in_session_exposes_user() {
        let user = UserId::random();
        let session = AuthSession::SignedIn(user);
        assert!(session.is_signed_in());
        assert_eq!(session.user_id(), Some(user));
    }

    #[tokio::test]
    async fn unconfigured_client_refuses_verification() {
        let client = AuthClient::new(None);
        assert!(!client.enabled());
        let err = client.verify_token("token").await.unwrap_err();
        assert!(matches!(err, AuthError::Disabled));
    }
}
