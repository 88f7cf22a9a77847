use async_trait::async_trait;
use dep_health::prelude::*;
use std::collections::HashMap;

/// Mock RepositoryActivitySource keyed by repository URL
#[derive(Default)]
pub struct MockRepositorySource {
    repositories: HashMap<String, RepositoryActivity>,
}

impl MockRepositorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activity(mut self, url: &str, activity: RepositoryActivity) -> Self {
        self.repositories.insert(url.to_string(), activity);
        self
    }

    pub fn with_archived(self, url: &str) -> Self {
        self.with_activity(
            url,
            RepositoryActivity {
                stars: 5_000,
                forks: 600,
                contributors_count: 40,
                archived: true,
                ..Default::default()
            },
        )
    }
}

#[async_trait]
impl RepositoryActivitySource for MockRepositorySource {
    async fn fetch_repository_activity(&self, repository_url: &str) -> Option<RepositoryActivity> {
        self.repositories.get(repository_url).cloned()
    }
}
