//! HTTP identity provider
//!
//! Talks to the console's user/session API:
//! - `POST {api}/auth/login` (form: `username`, `password`) → `{access_token, token_type}`
//! - `GET {api}/users/me` with `Authorization: Bearer <token>` → user record

use crate::access_control::UserIdentity;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::session::provider::IdentityProvider;
use crate::session::token::AccessToken;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: AccessToken,
    #[serde(default)]
    token_type: Option<String>,
}

/// Identity provider backed by the console REST API
pub struct HttpIdentityProvider {
    http: Client,
    base_url: String,
}

impl HttpIdentityProvider {
    /// Create a new provider from configuration
    pub fn new(config: &SessionConfig) -> SessionResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("console-guard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SessionError::Request)?;

        Ok(Self {
            http,
            base_url: config.api_base(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response(response: Response) -> SessionResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SessionError::from_response(status.as_u16(), &body))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> SessionResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SessionError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(&self, username: &str, password: &str) -> SessionResult<AccessToken> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST
        ) {
            return Err(SessionError::InvalidCredentials);
        }

        let response = Self::handle_response(response).await?;
        let login: LoginResponse = Self::parse(response).await?;
        if login.access_token.is_empty() {
            return Err(SessionError::InvalidResponse(
                "empty access_token in login response".to_string(),
            ));
        }

        debug!(token_type = ?login.token_type, "Login succeeded");
        Ok(login.access_token)
    }

    #[instrument(skip(self, token))]
    async fn current_identity(&self, token: &AccessToken) -> SessionResult<UserIdentity> {
        let response = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(token.expose())
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        Self::parse(response).await
    }

    fn provider_type(&self) -> &'static str {
        "HTTP"
    }
}
