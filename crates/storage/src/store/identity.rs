use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::store::{Identity, Session};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: String,
}

/// Client for a GoTrue-compatible identity service.
pub struct HttpIdentity {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentity {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::Remote(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Remote(format!(
            "identity service returned {status}: {body}"
        )))
    }
}

#[async_trait]
impl Identity for HttpIdentity {
    async fn register(&self, email: &str, password: &str) -> Result<Uuid> {
        let response = self
            .client
            .post(self.url("/signup"))
            .header("apikey", &self.api_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(|e| StorageError::Remote(format!("signup request failed: {e}")))?;

        let signup: SignupResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Remote(format!("malformed signup response: {e}")))?;

        Ok(signup.id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.api_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(|e| StorageError::Remote(format!("login request failed: {e}")))?;

        let token: TokenResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Remote(format!("malformed token response: {e}")))?;

        Ok(token.access_token)
    }

    async fn logout(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::Remote(format!("logout request failed: {e}")))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn session(&self, token: &str) -> Result<Option<Session>> {
        let response = self
            .client
            .get(self.url("/user"))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::Remote(format!("session request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let user: UserResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Remote(format!("malformed user response: {e}")))?;

        Ok(Some(Session {
            user_id: user.id,
            email: user.email,
        }))
    }
}
