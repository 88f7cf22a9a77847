mod cli;

use cli::Args;
use clap::Parser;
use dep_health::adapters::outbound::console::StderrProgressReporter;
use dep_health::application::factories::MonitorFactory;
use dep_health::application::read_models::{HealthReportBuilder, ReportSummary};
use dep_health::config::load_config_from_path;
use dep_health::ports::inbound::{AnalysisControlPort, StartOutcome};
use dep_health::shared::error::ExitCode;
use dep_health::shared::{Result, SystemClock};
use owo_colors::OwoColorize;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// How often a background run is polled for completion
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version go through the error path too
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            process::exit(code.as_i32());
        }
    };

    init_tracing();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut config = load_config_from_path(&args.config)?;
    if let Some(format) = args.format {
        config.output.report_format = format;
    }

    tracing::info!(config = %args.config.display(), "dep-health starting");

    let monitor = MonitorFactory::create(
        &config,
        Arc::new(SystemClock),
        Arc::new(StderrProgressReporter::new()),
    )?;

    match monitor.start_analysis(!args.background).await? {
        StartOutcome::Completed(run) => {
            tracing::debug!(reports = run.reports_written, "Synchronous run completed");
        }
        StartOutcome::Started => wait_for_completion(&monitor).await,
        StartOutcome::AlreadyRunning => {
            eprintln!("⚠️  An analysis is already running");
        }
    }

    let records = monitor.list_current_dataset()?;
    let summary = HealthReportBuilder::summarize(&records);
    print_summary(&summary, &config.output.report_dir.display().to_string());

    if args.fail_on_vulnerabilities && summary.with_vulnerabilities > 0 {
        return Ok(ExitCode::VulnerabilitiesDetected);
    }
    Ok(ExitCode::Success)
}

async fn wait_for_completion(monitor: &impl AnalysisControlPort) {
    eprintln!("⏳ Analysis running in the background...");
    while monitor.get_status().analyzing {
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
    }
}

fn print_summary(summary: &ReportSummary, report_dir: &str) {
    println!();
    println!("{}", "Dependency Health Summary".bold());
    println!("  Total dependencies:          {}", summary.total);
    println!("  Healthy:                     {}", summary.healthy.green());
    println!("  Need updates:                {}", summary.needing_update.yellow());
    println!("  High abandonment risk:       {}", summary.high_risk.red());
    println!(
        "  With vulnerabilities:        {}",
        summary.with_vulnerabilities.red().bold()
    );
    if summary.critical_vulnerabilities + summary.high_vulnerabilities > 0 {
        println!(
            "    Critical / High:           {} / {}",
            summary.critical_vulnerabilities.red(),
            summary.high_vulnerabilities.yellow()
        );
    }
    if summary.unanalyzed > 0 {
        println!("  Not analyzed:                {}", summary.unanalyzed.dimmed());
    }
    println!();
    println!("📁 Reports written to {}", report_dir.cyan());
}

