use crate::health_analysis::domain::RepositoryActivity;
use async_trait::async_trait;

/// RepositoryActivitySource port for source-hosting activity (GitHub-style hosts)
#[async_trait]
pub trait RepositoryActivitySource: Send + Sync {
    /// Fetches activity for the repository behind `repository_url`
    ///
    /// # Returns
    /// `None` when the URL does not point at a supported host, tracking is
    /// disabled, or the repository could not be fetched. This is a normal
    /// state, not an error.
    async fn fetch_repository_activity(&self, repository_url: &str) -> Option<RepositoryActivity>;
}
