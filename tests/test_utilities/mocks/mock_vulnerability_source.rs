use async_trait::async_trait;
use dep_health::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock VulnerabilitySource keyed by `package@version`
pub struct MockVulnerabilitySource {
    advisories: HashMap<String, Vec<Vulnerability>>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockVulnerabilitySource {
    pub fn new() -> Self {
        Self {
            advisories: HashMap::new(),
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn with_advisory(
        mut self,
        package: &str,
        version: &str,
        id: &str,
        severity: Severity,
        fixed_in: &str,
    ) -> Self {
        self.advisories
            .entry(format!("{}@{}", package, version))
            .or_default()
            .push(Vulnerability {
                id: id.to_string(),
                summary: format!("{} in {}", id, package),
                details: String::new(),
                severity,
                published: None,
                modified: None,
                references: vec![format!("https://osv.dev/vulnerability/{}", id)],
                affected_versions: vec![format!("<{}", fixed_in)],
                fixed_versions: vec![fixed_in.to_string()],
            });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockVulnerabilitySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VulnerabilitySource for MockVulnerabilitySource {
    async fn query(
        &self,
        _ecosystem: &str,
        package_name: &str,
        version: &str,
    ) -> Result<Vec<Vulnerability>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("Mock vulnerability source failure");
        }
        Ok(self
            .advisories
            .get(&format!("{}@{}", package_name, version))
            .cloned()
            .unwrap_or_default())
    }
}
