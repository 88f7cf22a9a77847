use super::http::join_url;
use crate::health_analysis::domain::{RepositoryActivity, RepositoryRef};
use crate::ports::outbound::{cached_or_fetch, CacheStore, RepositoryActivitySource};
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const GITHUB_HOST: &str = "github.com";

/// Weeks averaged for the commit frequency
const COMMIT_WINDOW_WEEKS: usize = 4;

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    subscribers_count: u64,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    license: Option<GitHubLicense>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubLicense {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitWeek {
    #[serde(default)]
    total: u64,
}

/// GitHubClient adapter for repository activity on GitHub
///
/// Implements the RepositoryActivitySource port. A cache miss costs up to
/// three calls: repository metadata (required), weekly commit activity and
/// a one-per-page contributors listing. The latter two degrade to zero on
/// their own without failing the whole fetch.
///
/// # Approximations
/// `contributors_count` is read from the `rel="last"` page number of the
/// contributors listing at one item per page, or the number of items on
/// the single page when there is no pagination. GitHub caps and filters
/// that listing, so treat it as an estimate.
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    enabled: bool,
    cache: Arc<dyn CacheStore>,
}

impl GitHubClient {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token: Option<String>,
        enabled: bool,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token,
            enabled,
            cache,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("token {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    warn!("GitHub token contains invalid header characters, sending unauthenticated")
                }
            }
        }
        headers
    }

    async fn fetch_activity(&self, repo: &RepositoryRef) -> Result<RepositoryActivity> {
        let base = join_url(&self.api_url, &format!("repos/{}/{}", repo.owner, repo.repo));

        let response = self.client.get(&base).headers(self.headers()).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("GitHub API returned status code {} for {}", response.status(), repo);
        }
        let metadata: GitHubRepo = response.json().await?;

        let commit_frequency = self.fetch_commit_frequency(&base).await;
        let contributors_count = self.fetch_contributors_count(&base).await;

        Ok(RepositoryActivity {
            stars: metadata.stargazers_count,
            forks: metadata.forks_count,
            open_issues: metadata.open_issues_count,
            commit_frequency,
            contributors_count,
            watchers_count: metadata.subscribers_count,
            archived: metadata.archived,
            license: metadata.license.and_then(|l| l.name),
            description: metadata.description,
        })
    }

    async fn fetch_commit_frequency(&self, repo_base: &str) -> f64 {
        let url = format!("{}/stats/commit_activity", repo_base);
        let response = match self.client.get(&url).headers(self.headers()).send().await {
            Ok(r) if r.status() == reqwest::StatusCode::OK => r,
            Ok(r) => {
                debug!(url = %url, status = %r.status(), "Commit activity not available");
                return 0.0;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to fetch commit activity");
                return 0.0;
            }
        };

        match response.json::<Vec<CommitWeek>>().await {
            Ok(weeks) => average_recent_commits(&weeks),
            Err(e) => {
                warn!(url = %url, error = %e, "Unexpected commit activity payload");
                0.0
            }
        }
    }

    async fn fetch_contributors_count(&self, repo_base: &str) -> u64 {
        let url = format!("{}/contributors?per_page=1", repo_base);
        let response = match self.client.get(&url).headers(self.headers()).send().await {
            Ok(r) if r.status() == reqwest::StatusCode::OK => r,
            Ok(r) => {
                debug!(url = %url, status = %r.status(), "Contributors not available");
                return 0;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to fetch contributors");
                return 0;
            }
        };

        let last_page = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(last_page_from_link);
        if let Some(count) = last_page {
            return count;
        }

        match response.json::<Vec<serde_json::Value>>().await {
            Ok(items) => items.len() as u64,
            Err(e) => {
                warn!(url = %url, error = %e, "Unexpected contributors payload");
                0
            }
        }
    }
}

#[async_trait]
impl RepositoryActivitySource for GitHubClient {
    async fn fetch_repository_activity(&self, repository_url: &str) -> Option<RepositoryActivity> {
        if !self.enabled {
            return None;
        }

        let Some(repo) = RepositoryRef::parse(repository_url, GITHUB_HOST) else {
            debug!(url = %repository_url, "No GitHub repository association");
            return None;
        };

        let key = format!("github_{}", repo.cache_identity());
        cached_or_fetch(self.cache.as_ref(), &key, self.fetch_activity(&repo)).await
    }
}

/// Mean of the trailing weekly commit totals, always divided by the full window.
fn average_recent_commits(weeks: &[CommitWeek]) -> f64 {
    let start = weeks.len().saturating_sub(COMMIT_WINDOW_WEEKS);
    let recent: u64 = weeks[start..].iter().map(|w| w.total).sum();
    recent as f64 / COMMIT_WINDOW_WEEKS as f64
}

/// Extracts the `page` query parameter of the `rel="last"` link.
fn last_page_from_link(header: &str) -> Option<u64> {
    header
        .split(',')
        .find(|part| part.contains("rel=\"last\""))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part.find('>')?;
            part.get(start..end)
        })
        .and_then(|url| url.split_once('?').map(|(_, query)| query))
        .and_then(|query| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(name, _)| *name == "page")
                .and_then(|(_, value)| value.parse().ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::cache::InMemoryCache;
    use crate::adapters::outbound::network::build_http_client;
    use crate::shared::SystemClock;

    fn client(api_url: &str, enabled: bool) -> (Arc<InMemoryCache>, GitHubClient) {
        let cache = Arc::new(InMemoryCache::new(
            chrono::Duration::hours(1),
            Arc::new(SystemClock),
        ));
        let http = build_http_client(std::time::Duration::from_secs(2)).unwrap();
        (
            cache.clone(),
            GitHubClient::new(http, api_url, None, enabled, cache),
        )
    }

    #[test]
    fn test_last_page_from_link() {
        let header = r#"<https://api.github.com/repositories/1/contributors?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1/contributors?per_page=1&page=347>; rel="last""#;
        assert_eq!(last_page_from_link(header), Some(347));
    }

    #[test]
    fn test_last_page_from_link_without_last() {
        let header = r#"<https://api.github.com/x?page=1>; rel="prev""#;
        assert_eq!(last_page_from_link(header), None);
        assert_eq!(last_page_from_link(""), None);
    }

    #[test]
    fn test_average_recent_commits_uses_last_four_weeks() {
        let weeks: Vec<CommitWeek> = [50, 1, 2, 3, 6]
            .into_iter()
            .map(|total| CommitWeek { total })
            .collect();
        assert_eq!(average_recent_commits(&weeks), 3.0);
    }

    #[test]
    fn test_average_recent_commits_short_history() {
        let weeks = vec![CommitWeek { total: 2 }];
        assert_eq!(average_recent_commits(&weeks), 0.5);
        assert_eq!(average_recent_commits(&[]), 0.0);
    }

    #[test]
    fn test_repo_payload_missing_fields() {
        let repo: GitHubRepo = serde_json::from_str(r#"{"stargazers_count": 3, "license": null}"#).unwrap();
        assert_eq!(repo.stargazers_count, 3);
        assert!(!repo.archived);
        assert!(repo.license.is_none());
    }

    #[tokio::test]
    async fn test_disabled_client_returns_none() {
        let (_cache, client) = client("http://127.0.0.1:9/", false);
        assert!(client
            .fetch_repository_activity("https://github.com/pallets/flask")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_non_github_url_returns_none() {
        let (_cache, client) = client("http://127.0.0.1:9/", true);
        assert!(client
            .fetch_repository_activity("https://gitlab.com/group/project")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unreachable_api_returns_none_and_caches_nothing() {
        let (cache, client) = client("http://127.0.0.1:9/", true);
        assert!(client
            .fetch_repository_activity("https://github.com/pallets/flask")
            .await
            .is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_uses_owner_repo_key() {
        let (cache, client) = client("http://127.0.0.1:9/", true);
        let activity = RepositoryActivity {
            stars: 42,
            ..Default::default()
        };
        cache.set("github_pallets_flask", &serde_json::to_value(&activity).unwrap());

        let fetched = client
            .fetch_repository_activity("git+https://github.com/pallets/flask.git")
            .await;
        assert_eq!(fetched, Some(activity));
    }
}
