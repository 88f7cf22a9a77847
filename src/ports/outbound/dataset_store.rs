use crate::health_analysis::domain::DependencyRecord;
use crate::shared::Result;

/// DatasetStore port for the tabular dependency dataset
///
/// Analysis reads the whole dataset, then writes back a full replacement.
pub trait DatasetStore: Send + Sync {
    /// Reads every tracked dependency
    ///
    /// # Errors
    /// Returns an error if the dataset exists but cannot be read or parsed.
    /// A dataset that does not exist yet reads as empty.
    fn read_dependencies(&self) -> Result<Vec<DependencyRecord>>;

    /// Replaces the stored dataset with `records`
    fn write_dependencies(&self, records: &[DependencyRecord]) -> Result<()>;
}
