use crate::health_analysis::domain::{DependencyRecord, VulnerabilityDetail};
use crate::ports::outbound::DatasetStore;
use crate::shared::error::MonitorError;
use crate::shared::security::{validate_input_file, validate_write_target};
use crate::shared::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Columns this store reads and writes itself, in written order. Any other
/// column in the file rides along in `DependencyRecord::extra_columns`.
const KNOWN_COLUMNS: [&str; 16] = [
    "project",
    "ecosystem",
    "package_name",
    "version",
    "license",
    "last_updated",
    "needs_update",
    "latest_version",
    "health_score",
    "abandonment_risk",
    "repository_url",
    "has_vulnerabilities",
    "vulnerability_count",
    "vulnerability_details",
    "safe_upgrade_version",
    "highest_severity",
];

/// One CSV row. Every cell is optional text so hand-edited files with
/// blanks, extra columns or a different column order still load.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    project: Option<String>,
    ecosystem: Option<String>,
    package_name: Option<String>,
    version: Option<String>,
    license: Option<String>,
    last_updated: Option<String>,
    needs_update: Option<String>,
    latest_version: Option<String>,
    health_score: Option<String>,
    abandonment_risk: Option<String>,
    repository_url: Option<String>,
    has_vulnerabilities: Option<String>,
    vulnerability_count: Option<String>,
    vulnerability_details: Option<String>,
    safe_upgrade_version: Option<String>,
    highest_severity: Option<String>,
}

impl CsvRow {
    fn into_record(self, line: usize) -> DependencyRecord {
        let vulnerability_details = match non_blank(self.vulnerability_details) {
            Some(cell) => serde_json::from_str::<Vec<VulnerabilityDetail>>(&cell).unwrap_or_else(|e| {
                warn!(line, error = %e, "Unreadable vulnerability_details cell, dropping it");
                Vec::new()
            }),
            None => Vec::new(),
        };

        DependencyRecord {
            project: self.project.unwrap_or_default().trim().to_string(),
            ecosystem: self.ecosystem.unwrap_or_default().trim().to_string(),
            package_name: self.package_name.unwrap_or_default().trim().to_string(),
            version: self.version.unwrap_or_default().trim().to_string(),
            license: non_blank(self.license),
            latest_version: non_blank(self.latest_version),
            needs_update: non_blank(self.needs_update).and_then(|c| parse_bool(&c)),
            last_updated: non_blank(self.last_updated),
            health_score: non_blank(self.health_score)
                .and_then(|c| c.parse::<f64>().ok())
                .map(|s| s.clamp(0.0, 100.0) as u8),
            abandonment_risk: non_blank(self.abandonment_risk).and_then(|c| c.parse().ok()),
            repository_url: non_blank(self.repository_url),
            has_vulnerabilities: non_blank(self.has_vulnerabilities).and_then(|c| parse_bool(&c)),
            vulnerability_count: non_blank(self.vulnerability_count)
                .and_then(|c| c.parse::<f64>().ok())
                .map(|n| n.max(0.0) as u32),
            vulnerability_details,
            safe_upgrade_version: non_blank(self.safe_upgrade_version),
            highest_severity: non_blank(self.highest_severity).and_then(|c| c.parse().ok()),
            extra_columns: Vec::new(),
        }
    }

    /// Cells for [`KNOWN_COLUMNS`], in the same order
    fn cells(record: &DependencyRecord) -> Result<[String; 16]> {
        let vulnerability_details = if record.vulnerability_details.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&record.vulnerability_details)?
        };
        let text = |cell: &Option<String>| cell.clone().unwrap_or_default();
        let shown = |cell: Option<String>| cell.unwrap_or_default();

        Ok([
            record.project.clone(),
            record.ecosystem.clone(),
            record.package_name.clone(),
            record.version.clone(),
            text(&record.license),
            text(&record.last_updated),
            shown(record.needs_update.map(|b| b.to_string())),
            text(&record.latest_version),
            shown(record.health_score.map(|s| s.to_string())),
            shown(record.abandonment_risk.map(|r| r.to_string())),
            text(&record.repository_url),
            shown(record.has_vulnerabilities.map(|b| b.to_string())),
            shown(record.vulnerability_count.map(|n| n.to_string())),
            vulnerability_details,
            text(&record.safe_upgrade_version),
            shown(record.highest_severity.map(|s| s.to_string())),
        ])
    }
}

/// Unknown columns across all records, in first-seen order
fn extra_headers(records: &[DependencyRecord]) -> Vec<&str> {
    let mut headers: Vec<&str> = Vec::new();
    for (column, _) in records.iter().flat_map(|r| &r.extra_columns) {
        if !headers.contains(&column.as_str()) {
            headers.push(column);
        }
    }
    headers
}

fn non_blank(cell: Option<String>) -> Option<String> {
    cell.map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("nan"))
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// CsvDatasetStore adapter for the dependency dataset on disk
///
/// Implements the DatasetStore port. Reading is lenient (see [`CsvRow`]);
/// writing always emits the header and full augmented column set, followed
/// by any columns the input carried that this store does not know.
pub struct CsvDatasetStore {
    path: PathBuf,
}

impl CsvDatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, details: impl ToString) -> anyhow::Error {
        MonitorError::DatasetReadError {
            path: self.path.clone(),
            details: details.to_string(),
        }
        .into()
    }

    fn write_error(&self, details: impl ToString) -> anyhow::Error {
        MonitorError::DatasetWriteError {
            path: self.path.clone(),
            details: details.to_string(),
        }
        .into()
    }
}

impl DatasetStore for CsvDatasetStore {
    fn read_dependencies(&self) -> Result<Vec<DependencyRecord>> {
        if fs::symlink_metadata(&self.path).is_err() {
            warn!(path = %self.path.display(), "Dependency dataset not found, starting with an empty dataset");
            return Ok(Vec::new());
        }

        validate_input_file(&self.path, "dependency dataset").map_err(|e| self.read_error(e))?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.read_error(e))?;

        let headers = reader.headers().map_err(|e| self.read_error(e))?.clone();

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| self.read_error(e))?;
            let parsed: CsvRow = row
                .deserialize(Some(&headers))
                .map_err(|e| self.read_error(e))?;

            // Line 1 is the header
            let mut record = parsed.into_record(index + 2);
            record.extra_columns = headers
                .iter()
                .zip(row.iter())
                .filter(|(column, _)| !KNOWN_COLUMNS.contains(column))
                .map(|(column, cell)| (column.to_string(), cell.to_string()))
                .collect();
            records.push(record);
        }

        info!(path = %self.path.display(), count = records.len(), "Loaded dependency dataset");
        Ok(records)
    }

    fn write_dependencies(&self, records: &[DependencyRecord]) -> Result<()> {
        validate_write_target(&self.path).map_err(|e| self.write_error(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let extras = extra_headers(records);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| self.write_error(e))?;

        writer
            .write_record(KNOWN_COLUMNS.iter().chain(extras.iter()))
            .map_err(|e| self.write_error(e))?;

        for record in records {
            let known = CsvRow::cells(record)?;
            let carried = extras.iter().map(|column| {
                record
                    .extra_columns
                    .iter()
                    .find(|(name, _)| name.as_str() == *column)
                    .map_or("", |(_, cell)| cell.as_str())
            });
            writer
                .write_record(known.iter().map(String::as_str).chain(carried))
                .map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e))?;

        info!(path = %self.path.display(), count = records.len(), "Updated dependency data written");
        Ok(())
    }
}
