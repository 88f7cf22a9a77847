use crate::health_analysis::domain::normalize_ecosystem;
use crate::ports::outbound::PackageRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup table from ecosystem tag to the registry that serves it
///
/// Scoring and orchestration never branch on the ecosystem string; they ask
/// the selector and treat a miss as "no source configured".
#[derive(Clone, Default)]
pub struct RegistrySelector {
    registries: HashMap<String, Arc<dyn PackageRegistry>>,
}

impl RegistrySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `registry` under its own ecosystem tag, replacing any
    /// registry previously registered for that tag
    pub fn register(&mut self, registry: Arc<dyn PackageRegistry>) {
        let key = normalize_ecosystem(registry.ecosystem());
        self.registries.insert(key, registry);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, registry: Arc<dyn PackageRegistry>) -> Self {
        self.register(registry);
        self
    }

    /// Registry for `ecosystem`, matched case-insensitively
    pub fn select(&self, ecosystem: &str) -> Option<Arc<dyn PackageRegistry>> {
        self.registries.get(&normalize_ecosystem(ecosystem)).cloned()
    }

    /// Configured ecosystem tags, sorted
    pub fn ecosystems(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.registries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}
