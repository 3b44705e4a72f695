//! OAuth2 Client Credentials flow against battle.net.
//!
//! Tokens are cached in memory and refreshed shortly before expiry; every
//! API call goes through [`TokenProvider::get_token`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Blizzard as BlizzardConfig;

pub struct TokenProvider {
    token_url: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
    token: Arc<RwLock<Option<AccessToken>>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl TokenProvider {
    pub fn new(config: &BlizzardConfig, http: reqwest::Client) -> Self {
        Self {
            token_url: config.token_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            http,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns a valid access token, requesting a new one if the cached
    /// token is missing or within five minutes of expiry.
    pub async fn get_token(&self) -> anyhow::Result<String> {
        {
            let token_guard = self.token.read().await;
            if let Some(ref token) = *token_guard {
                if token.expires_at > Utc::now() + chrono::Duration::minutes(5) {
                    return Ok(token.token.clone());
                }
            }
        }

        tracing::info!("fetching new access token from {}", self.token_url);
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("battle.net OAuth failed: {} - {}", status, body);
        }

        let token_response: TokenResponse = response.json().await?;

        let access_token = AccessToken {
            token: token_response.access_token.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(token_response.expires_in),
        };

        {
            let mut token_guard = self.token.write().await;
            *token_guard = Some(access_token);
        }

        Ok(token_response.access_token)
    }
}
