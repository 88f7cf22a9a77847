use clap::Parser;
use dep_health::application::dto::OutputFormat;
use dep_health::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

/// Score the health, abandonment risk and known vulnerabilities of your dependencies
#[derive(Parser, Debug)]
#[command(name = "dep-health")]
#[command(version)]
#[command(about = "Score the health, abandonment risk and known vulnerabilities of your dependencies", long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Report format: markdown or json (overrides output.report_format)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Run the analysis as a background task and wait for it to finish
    #[arg(long)]
    pub background: bool,

    /// Exit with code 1 when any dependency has known vulnerabilities
    #[arg(long)]
    pub fail_on_vulnerabilities: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["dep-health"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config/config.yaml"));
        assert_eq!(args.format, None);
        assert!(!args.background);
        assert!(!args.fail_on_vulnerabilities);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "dep-health",
            "--config",
            "custom.yaml",
            "--format",
            "JSON",
            "--background",
            "--fail-on-vulnerabilities",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("custom.yaml"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.background);
        assert!(args.fail_on_vulnerabilities);
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let result = Args::try_parse_from(["dep-health", "--format", "html"]);
        assert!(result.is_err());
    }
}
