//! Authenticated Game Data API client.
//!
//! Every call fetches a bearer token from the [`TokenProvider`], takes a
//! slot from the shared [`RateLimiter`], and logs the request and response
//! so a high-fan-out crawl leaves a usable trail.

use anyhow::Context;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use crate::blizzard::{RateLimiter, TokenProvider};
use crate::config::{Blizzard as BlizzardConfig, Crawler as CrawlerConfig};

/// Outcome of a GET, distinguishing a missing resource from a transport or
/// server failure (which is an `Err`) and from a present-but-empty document.
#[derive(Debug)]
pub enum Fetched {
    Json(Value),
    NotFound,
}

impl Fetched {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Fetched::Json(value) => Some(value),
            Fetched::NotFound => None,
        }
    }
}

pub struct ApiClient {
    base_url: String,
    locale: String,
    http: reqwest::Client,
    auth: TokenProvider,
    limiter: RateLimiter,
}

impl ApiClient {
    pub fn new(blizzard: &BlizzardConfig, crawler: &CrawlerConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            base_url: blizzard.api_url(),
            locale: blizzard.locale.clone(),
            auth: TokenProvider::new(blizzard, http.clone()),
            limiter: RateLimiter::new(
                crawler.max_calls,
                Duration::from_secs_f64(crawler.period_secs),
            ),
            http,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// GET `path` with the standard namespace/locale parameters. Non-2xx
    /// statuses other than 404 are errors; 404 is [`Fetched::NotFound`].
    pub async fn get(
        &self,
        path: &str,
        namespace: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<Fetched> {
        let token = self.auth.get_token().await?;
        self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::info!("CALL -> GET {} namespace={} locale={}", url, namespace, self.locale);

        let response = self
            .http
            .get(&url)
            .query(&[("namespace", namespace), ("locale", self.locale.as_str())])
            .query(params)
            .bearer_auth(&token)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!("RESP <- {} {}", status, url);
            return Ok(Fetched::NotFound);
        }
        if !status.is_success() {
            tracing::error!("FAILED <- {} {}", status, url);
            anyhow::bail!("Blizzard API error: {} for {}", status, url);
        }

        tracing::info!("RESP <- {} {}", status, url);
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("decoding response body from {}", url))?;
        Ok(Fetched::Json(body))
    }
}
