use async_trait::async_trait;
use dep_health::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock PackageRegistry serving canned metadata
///
/// Packages without an entry get the same fallback a real client degrades
/// to when the registry is unreachable.
pub struct MockPackageRegistry {
    ecosystem: String,
    threshold_days: u32,
    packages: HashMap<String, PackageInfo>,
    calls: AtomicUsize,
}

impl MockPackageRegistry {
    pub fn new(ecosystem: &str) -> Self {
        Self {
            ecosystem: ecosystem.to_string(),
            threshold_days: 180,
            packages: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_package(
        mut self,
        name: &str,
        latest_version: &str,
        last_published: &str,
        repository_url: Option<&str>,
        maintainers: u32,
    ) -> Self {
        self.packages.insert(
            name.to_string(),
            PackageInfo {
                name: name.to_string(),
                latest_version: latest_version.to_string(),
                last_published: Some(last_published.to_string()),
                repository_url: repository_url.map(str::to_string),
                maintainers_count: maintainers,
                license: Some("MIT".to_string()),
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageRegistry for MockPackageRegistry {
    fn ecosystem(&self) -> &str {
        &self.ecosystem
    }

    fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    async fn fetch_package_info(&self, package_name: &str) -> PackageInfo {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.packages
            .get(package_name)
            .cloned()
            .unwrap_or_else(|| PackageInfo::fallback(package_name))
    }
}
