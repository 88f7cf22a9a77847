use serde::{Deserialize, Serialize};

/// Activity signals for a source repository.
///
/// A dependency without a resolvable repository simply has no activity;
/// callers model that as `Option<RepositoryActivity>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryActivity {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    /// Average commits per week over the trailing four weeks
    pub commit_frequency: f64,
    /// Approximate, see `GitHubClient` for how it is derived
    pub contributors_count: u64,
    pub watchers_count: u64,
    pub archived: bool,
    pub license: Option<String>,
    pub description: Option<String>,
}

/// Owner/name pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    /// Extracts `(owner, repo)` from a repository URL on `host`.
    ///
    /// Accepted shapes include `https://host/owner/repo`, `git+https://host/owner/repo.git`,
    /// `git@host:owner/repo.git` and `host:owner/repo`. Trailing path segments,
    /// query strings and fragments are ignored. `host` must be the whole
    /// host name (optionally behind `www.`), so `notgithub.com` or
    /// `github.com.example.org` never match `github.com`. Anything else
    /// yields `None`.
    pub fn parse(url: &str, host: &str) -> Option<Self> {
        let authority = url.trim().split_once("://").map_or(url.trim(), |(_, rest)| rest);
        let authority = match authority.split_once('@') {
            Some((user, rest)) if !user.contains('/') => rest,
            _ => authority,
        };
        let authority = authority.strip_prefix("www.").unwrap_or(authority);

        let matched = authority.get(..host.len())?;
        if !matched.eq_ignore_ascii_case(host) {
            return None;
        }
        let rest = &authority[host.len()..];
        let rest = rest.strip_prefix('/').or_else(|| rest.strip_prefix(':'))?;

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut segments = rest.split('/');
        let owner = segments.next()?.trim();
        let repo = segments.next()?.trim();
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if owner.is_empty() || repo.is_empty() || !is_valid_segment(owner) || !is_valid_segment(repo)
        {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Cache identity, e.g. `pallets_flask`.
    pub fn cache_identity(&self) -> String {
        format!("{}_{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
