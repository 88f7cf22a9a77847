use crate::application::read_models::{
    DependencyView, HealthReport, ProjectReport, ReportSummary, VulnerabilityView,
};
use crate::health_analysis::domain::Severity;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for the per-project dependency table
const TABLE_HEADER: &str = "| Package | Version | Latest | Health Score | Risk Level | License |\n";

/// Markdown table separator line
const TABLE_SEPARATOR: &str =
    "|---------|---------|--------|--------------|------------|---------|\n";

/// Placeholder for cells whose value was never derived
const NOT_AVAILABLE: &str = "N/A";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// MarkdownReportFormatter renders the health read model as Markdown
///
/// The summary report lists counts, vulnerable packages with severity
/// markers, high-risk and outdated packages, and closing recommendations.
/// Project reports carry their own counts plus a full dependency table.
pub struct MarkdownReportFormatter;

impl MarkdownReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn severity_marker(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical | Severity::High => "🔴",
            Severity::Medium => "🟠",
            _ => "🟡",
        }
    }
}

/// Helper methods for rendering sections
impl MarkdownReportFormatter {
    fn render_summary_counts(&self, output: &mut String, summary: &ReportSummary) {
        output.push_str("## Summary\n\n");
        output.push_str(&format!("- Total Dependencies: {}\n", summary.total));
        output.push_str(&format!(
            "- Dependencies Needing Updates: {}\n",
            summary.needing_update
        ));
        output.push_str(&format!(
            "- Dependencies at High/Critical Risk: {}\n",
            summary.high_risk
        ));
        output.push_str(&format!(
            "- Dependencies with Vulnerabilities: {}\n",
            summary.with_vulnerabilities
        ));
        output.push_str(&format!("- Healthy Dependencies: {}\n", summary.healthy));
        if summary.unanalyzed > 0 {
            output.push_str(&format!("- Not Analyzed: {}\n", summary.unanalyzed));
        }
    }

    fn render_security(&self, output: &mut String, report: &HealthReport) {
        output.push_str("## Security Vulnerabilities\n\n");

        if report.vulnerable.is_empty() {
            output.push_str("No security vulnerabilities detected!\n\n");
            return;
        }

        output.push_str(&format!(
            "- Critical Severity Vulnerabilities: {}\n",
            report.summary.critical_vulnerabilities
        ));
        output.push_str(&format!(
            "- High Severity Vulnerabilities: {}\n\n",
            report.summary.high_vulnerabilities
        ));
        output.push_str(&format!(
            "Found {} dependencies with security vulnerabilities:\n\n",
            report.vulnerable.len()
        ));

        for dep in &report.vulnerable {
            output.push_str(&format!(
                "- **{}** ({}): {} vulnerabilities",
                dep.package_name, dep.version, dep.vulnerability_count
            ));
            if let Some(safe) = &dep.safe_upgrade_version {
                output.push_str(&format!(", recommend upgrading to v{}", safe));
            }
            output.push('\n');

            for (index, vuln) in dep.vulnerabilities.iter().enumerate() {
                self.render_vulnerability_line(output, vuln, index == 0);
            }
        }
        output.push('\n');
    }

    /// Only the first advisory of a package carries its reference link
    fn render_vulnerability_line(&self, output: &mut String, vuln: &VulnerabilityView, first: bool) {
        output.push_str(&format!(
            "  {} {}: {}\n",
            Self::severity_marker(vuln.severity),
            vuln.severity,
            vuln.summary.replace('\n', " ")
        ));
        if first {
            if let Some(reference) = &vuln.reference {
                output.push_str(&format!("    [More details]({})\n", reference));
            }
        }
    }

    fn render_high_risk(&self, output: &mut String, high_risk: &[DependencyView]) {
        output.push_str("## High Risk Dependencies\n\n");

        if high_risk.is_empty() {
            output.push_str("No dependencies at high risk!\n\n");
            return;
        }

        for dep in high_risk {
            let risk = dep
                .abandonment_risk
                .map(|r| r.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let score = dep
                .health_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            output.push_str(&format!(
                "- **{}** ({}): {} risk, Health Score: {}\n",
                dep.package_name, dep.version, risk, score
            ));
        }
        output.push('\n');
    }

    fn render_outdated(&self, output: &mut String, outdated: &[DependencyView]) {
        output.push_str("## Update Needed\n\n");

        if outdated.is_empty() {
            output.push_str("All dependencies are up to date!\n\n");
            return;
        }

        for dep in outdated {
            output.push_str(&format!(
                "- **{}**: Current {} → Latest {}\n",
                dep.package_name,
                dep.version,
                dep.latest_version.as_deref().unwrap_or(NOT_AVAILABLE)
            ));
        }
        output.push('\n');
    }

    fn render_recommendations(&self, output: &mut String, report: &HealthReport) {
        output.push_str("## Recommendations\n\n");

        if !report.vulnerable.is_empty() {
            output.push_str("- 🔴 **URGENT**: Update dependencies with security vulnerabilities\n");
        }
        if !report.high_risk.is_empty() {
            output.push_str("- Consider finding alternatives for high-risk dependencies\n");
        }
        if !report.outdated.is_empty() {
            output.push_str("- Schedule time to update outdated dependencies\n");
        }
        output.push_str("- Review dependencies with health scores below 50\n");
        output.push_str(
            "- Consider implementing automated dependency updates with tools like Dependabot\n",
        );
    }

    fn render_dependency_table(&self, output: &mut String, records: &[DependencyView]) {
        output.push_str("## All Dependencies\n\n");
        output.push_str(TABLE_HEADER);
        output.push_str(TABLE_SEPARATOR);

        for dep in records {
            let score = dep
                .health_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let risk = dep
                .abandonment_risk
                .map(|r| r.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());

            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&dep.package_name),
                Self::escape_markdown_table_cell(&dep.version),
                Self::escape_markdown_table_cell(
                    dep.latest_version.as_deref().unwrap_or(NOT_AVAILABLE)
                ),
                score,
                risk,
                Self::escape_markdown_table_cell(dep.license.as_deref().unwrap_or(NOT_AVAILABLE)),
            ));
        }
    }
}

impl Default for MarkdownReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownReportFormatter {
    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn format_summary(&self, report: &HealthReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Dependency Health Report\n\n");
        output.push_str(&format!(
            "Generated on {}\n\n",
            report.generated_at.format(TIMESTAMP_FORMAT)
        ));

        self.render_summary_counts(&mut output, &report.summary);
        output.push('\n');
        self.render_security(&mut output, report);
        self.render_high_risk(&mut output, &report.high_risk);
        self.render_outdated(&mut output, &report.outdated);
        self.render_recommendations(&mut output, report);

        Ok(output)
    }

    fn format_project(&self, report: &HealthReport, project: &ProjectReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# Dependency Health Report: {}\n\n", project.project));
        output.push_str(&format!(
            "Generated on {}\n\n",
            report.generated_at.format(TIMESTAMP_FORMAT)
        ));

        self.render_summary_counts(&mut output, &project.summary);
        output.push('\n');
        self.render_dependency_table(&mut output, &project.records);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_models::HealthReportBuilder;
    use crate::health_analysis::domain::{AbandonmentRisk, DependencyRecord, VulnerabilityDetail};
    use chrono::{TimeZone, Utc};

    fn record(name: &str, score: u8, risk: AbandonmentRisk, latest: &str) -> DependencyRecord {
        DependencyRecord {
            latest_version: Some(latest.to_string()),
            needs_update: Some(latest != "1.0.0"),
            health_score: Some(score),
            abandonment_risk: Some(risk),
            has_vulnerabilities: Some(false),
            vulnerability_count: Some(0),
            ..DependencyRecord::new("web", "npm", name, "1.0.0").with_license("MIT")
        }
    }

    fn report(records: &[DependencyRecord]) -> HealthReport {
        HealthReportBuilder::build(records, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    fn vulnerable_record() -> DependencyRecord {
        let mut rec = record("lodash", 35, AbandonmentRisk::High, "4.17.21");
        rec.has_vulnerabilities = Some(true);
        rec.vulnerability_count = Some(2);
        rec.safe_upgrade_version = Some("4.17.21".to_string());
        rec.vulnerability_details = vec![
            VulnerabilityDetail {
                id: "GHSA-1".to_string(),
                summary: "Prototype pollution".to_string(),
                severity: Severity::Critical,
                references: vec!["https://osv.dev/GHSA-1".to_string()],
                fixed_versions: vec!["4.17.21".to_string()],
            },
            VulnerabilityDetail {
                id: "GHSA-2".to_string(),
                summary: "ReDoS".to_string(),
                severity: Severity::Medium,
                references: vec!["https://osv.dev/GHSA-2".to_string()],
                fixed_versions: vec![],
            },
        ];
        rec
    }

    #[test]
    fn test_escape_markdown_table_cell() {
        let escaped = MarkdownReportFormatter::escape_markdown_table_cell("a | b\nc");
        assert_eq!(escaped, "a \\| b c");
    }

    #[test]
    fn test_summary_of_clean_dataset() {
        let model = report(&[record("express", 90, AbandonmentRisk::Low, "1.0.0")]);
        let markdown = MarkdownReportFormatter::new().format_summary(&model).unwrap();

        assert!(markdown.starts_with("# Dependency Health Report\n"));
        assert!(markdown.contains("Generated on 2024-06-01 12:00:00 UTC"));
        assert!(markdown.contains("- Total Dependencies: 1"));
        assert!(markdown.contains("- Healthy Dependencies: 1"));
        assert!(markdown.contains("No security vulnerabilities detected!"));
        assert!(markdown.contains("No dependencies at high risk!"));
        assert!(markdown.contains("All dependencies are up to date!"));
        assert!(!markdown.contains("URGENT"));
        assert!(markdown.contains("- Review dependencies with health scores below 50"));
    }

    #[test]
    fn test_summary_with_vulnerabilities() {
        let model = report(&[
            record("express", 90, AbandonmentRisk::Low, "1.0.0"),
            vulnerable_record(),
        ]);
        let markdown = MarkdownReportFormatter::new().format_summary(&model).unwrap();

        assert!(markdown.contains("Found 1 dependencies with security vulnerabilities:"));
        assert!(markdown.contains(
            "- **lodash** (1.0.0): 2 vulnerabilities, recommend upgrading to v4.17.21"
        ));
        assert!(markdown.contains("  🔴 Critical: Prototype pollution"));
        assert!(markdown.contains("  🟠 Medium: ReDoS"));
        assert!(markdown.contains("    [More details](https://osv.dev/GHSA-1)"));
        assert!(!markdown.contains("https://osv.dev/GHSA-2"));
        assert!(markdown.contains("- Critical Severity Vulnerabilities: 1"));
        assert!(markdown.contains("- **lodash** (1.0.0): High risk, Health Score: 35"));
        assert!(markdown.contains("- **lodash**: Current 1.0.0 → Latest 4.17.21"));
        assert!(markdown.contains("🔴 **URGENT**"));
        assert!(markdown.contains("Consider finding alternatives"));
        assert!(markdown.contains("Schedule time to update"));
    }

    #[test]
    fn test_project_report_table() {
        let mut unanalyzed = DependencyRecord::new("web", "cargo", "a|b", "0.1.0");
        unanalyzed.license = None;
        let model = report(&[record("express", 90, AbandonmentRisk::Low, "1.0.0"), unanalyzed]);
        let formatter = MarkdownReportFormatter::new();

        let markdown = formatter
            .format_project(&model, &model.projects[0])
            .unwrap();

        assert!(markdown.starts_with("# Dependency Health Report: web\n"));
        assert!(markdown.contains(TABLE_HEADER));
        assert!(markdown.contains("| express | 1.0.0 | 1.0.0 | 90 | Low | MIT |"));
        assert!(markdown.contains("| a\\|b | 0.1.0 | N/A | N/A | N/A | N/A |"));
        assert!(markdown.contains("- Not Analyzed: 1"));
        assert_eq!(formatter.file_extension(), "md");
    }
}
