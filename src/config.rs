use serde::Deserialize;
use std::path::PathBuf;

/// Default battle.net token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://oauth.battle.net/token";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub blizzard: Blizzard,
    #[serde(default)]
    pub crawler: Crawler,
    #[serde(default)]
    pub guild: Option<Guild>,
    /// Ordered list of expansions with their curated name lists. A synthetic
    /// bucket like "current season" is just another entry here.
    #[serde(default, rename = "expansion")]
    pub expansions: Vec<Expansion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Blizzard {
    pub client_id: String,
    pub client_secret: String,
    /// Region code, e.g. "eu" or "us". Drives the API host and namespaces.
    pub region: String,
    /// Locale code, e.g. "en_US".
    pub locale: String,
    /// Override for the Game Data API base URL. Tests point this at a fake.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Override for the OAuth token endpoint.
    #[serde(default)]
    pub token_url: Option<String>,
}

impl Blizzard {
    pub fn api_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.api.blizzard.com", self.region),
        }
    }

    pub fn token_url(&self) -> String {
        self.token_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
    }

    pub fn static_namespace(&self) -> String {
        format!("static-{}", self.region)
    }

    pub fn dynamic_namespace(&self) -> String {
        format!("dynamic-{}", self.region)
    }

    pub fn profile_namespace(&self) -> String {
        format!("profile-{}", self.region)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Crawler {
    /// Aggregate outbound call budget shared by the whole worker pool.
    pub max_calls: usize,
    pub period_secs: f64,
    /// Concurrent in-flight instance-processing tasks.
    pub workers: usize,
    pub output_dir: PathBuf,
}

impl Default for Crawler {
    fn default() -> Self {
        Self {
            max_calls: 10,
            period_secs: 1.0,
            workers: 10,
            output_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Guild {
    /// Realm slug as used in profile API paths, e.g. "argent-dawn".
    pub realm_slug: String,
    /// Guild name slug, e.g. "the-errant-vanguard".
    pub name_slug: String,
    #[serde(default = "default_level_cap")]
    pub level_cap: u32,
}

fn default_level_cap() -> u32 {
    80
}

#[derive(Debug, Clone, Deserialize)]
pub struct Expansion {
    pub name: String,
    #[serde(default)]
    pub dungeons: Vec<String>,
    #[serde(default)]
    pub raids: Vec<String>,
}
