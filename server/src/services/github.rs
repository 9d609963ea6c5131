//! GitHub activity summary for the portfolio's metrics section.
//!
//! DESIGN
//! ======
//! A thin client over the GitHub REST events feed. Recent public push
//! events are folded into a per-month commit timeline and cached in
//! memory with a TTL, so the metrics section can poll freely without
//! hammering the upstream API. Configuration comes from environment
//! variables and is optional: an unconfigured server serves an empty
//! summary instead of failing startup.

#[cfg(test)]
#[path = "github_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("missing env var {0}")]
    MissingUser(&'static str),
    #[error("github request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Commit activity summary served by `GET /api/github-stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubStats {
    pub total_commits: u64,
    pub timeline: Vec<TimelinePoint>,
}

/// Commits attributed to one `YYYY-MM` period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub period: String,
    pub commits: u64,
}

/// The slice of a GitHub event this service cares about.
#[derive(Debug, Deserialize)]
pub struct GithubEvent {
    #[serde(rename = "type")]
    kind: String,
    created_at: String,
    #[serde(default)]
    payload: EventPayload,
}

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(default)]
    commits: Vec<serde_json::Value>,
}

pub struct GithubClient {
    user: String,
    token: Option<String>,
    api_base: String,
    cache_ttl: Duration,
    http: reqwest::Client,
    cache: RwLock<Option<(Instant, GithubStats)>>,
}

impl GithubClient {
    /// Build the client from environment variables.
    ///
    /// Required: `GITHUB_STATS_USER`. Optional: `GITHUB_TOKEN` (raises
    /// the upstream rate limit), `GITHUB_API_BASE`,
    /// `GITHUB_STATS_TTL_SECS` (default 300).
    ///
    /// # Errors
    ///
    /// Returns an error when the user is unset or the HTTP client cannot
    /// be built.
    pub fn from_env() -> Result<Self, GithubError> {
        let user =
            std::env::var("GITHUB_STATS_USER").map_err(|_| GithubError::MissingUser("GITHUB_STATS_USER"))?;
        let token = std::env::var("GITHUB_TOKEN").ok();
        let api_base = std::env::var("GITHUB_API_BASE")
            .unwrap_or_else(|_| DEFAULT_GITHUB_API_BASE.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let cache_ttl = Duration::from_secs(env_parse_u64("GITHUB_STATS_TTL_SECS", DEFAULT_CACHE_TTL_SECS));
        let http = reqwest::Client::builder()
            .user_agent("skysite-server")
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { user, token, api_base, cache_ttl, http, cache: RwLock::new(None) })
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Current summary, served from cache while it is fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream fetch fails; the stale cache is
    /// not served in that case, the route degrades to an empty summary.
    pub async fn stats(&self) -> Result<GithubStats, GithubError> {
        {
            let cache = self.cache.read().await;
            if let Some((fetched_at, stats)) = cache.as_ref() {
                if fetched_at.elapsed() < self.cache_ttl {
                    return Ok(stats.clone());
                }
            }
        }

        let events = self.fetch_events().await?;
        let stats = summarize_push_events(&events);

        let mut cache = self.cache.write().await;
        *cache = Some((Instant::now(), stats.clone()));
        Ok(stats)
    }

    async fn fetch_events(&self) -> Result<Vec<GithubEvent>, GithubError> {
        let url = format!("{}/users/{}/events/public?per_page=100", self.api_base, self.user);
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let events = request
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<GithubEvent>>()
            .await?;
        Ok(events)
    }
}

/// Fold push events into totals and a per-month timeline, oldest first.
#[must_use]
pub fn summarize_push_events(events: &[GithubEvent]) -> GithubStats {
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_commits = 0_u64;

    for event in events {
        if event.kind != "PushEvent" {
            continue;
        }
        // Timestamps arrive as RFC 3339; the YYYY-MM prefix is the bucket.
        let Some(period) = event.created_at.get(..7) else {
            continue;
        };
        let commits = u64::try_from(event.payload.commits.len()).unwrap_or_default();
        total_commits += commits;
        *buckets.entry(period.to_owned()).or_insert(0) += commits;
    }

    GithubStats {
        total_commits,
        timeline: buckets
            .into_iter()
            .map(|(period, commits)| TimelinePoint { period, commits })
            .collect(),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
