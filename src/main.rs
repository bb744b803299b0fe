// SoakGate - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Running the analysis and printing the report
// 4. Mapping the verdict (or a fatal error) to the exit status

use clap::Parser;
use soakgate::app::analysis::{self, AnalysisRequest, AnalysisSettings};
use soakgate::platform::config::{self, PlatformPaths};
use soakgate::util;
use std::path::PathBuf;
use std::process::ExitCode;

/// SoakGate - soak-test memory drift and leak-trend analyser.
///
/// Reads the sampler CSV of a long-running process, checks sample density,
/// RSS drift and sustained growth, optionally scans the application log,
/// and prints a PASS / REVIEW / FAIL verdict. Exit status is 0 only on PASS.
#[derive(Parser, Debug)]
#[command(name = "soakgate", version, about)]
struct Cli {
    /// Path to the memory CSV written by the soak sampler.
    csv: PathBuf,

    /// Path to the application log captured during the run.
    #[arg(long = "app-log")]
    app_log: Option<PathBuf>,

    /// Config file overriding thresholds (defaults to the platform config dir).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Also write the summary as JSON to this path.
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging exists; problems are logged once it does.
    let (config_path, explicit) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let (app_config, config_problems) = config::load_config(&config_path, explicit);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "SoakGate starting"
    );
    for problem in &config_problems {
        tracing::warn!(error = %problem, "Config problem; using defaults for affected values");
    }

    let request = AnalysisRequest {
        csv_path: cli.csv,
        app_log: cli.app_log,
    };
    let settings = AnalysisSettings::from(&app_config);

    let report = match analysis::run_analysis(&request, &settings) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Analysis aborted");
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    print!("{}", soakgate::core::verdict::render_report(&report));

    if let Some(ref json_path) = cli.json {
        if let Err(e) = analysis::write_json_report(&report, json_path) {
            tracing::error!(error = %e, "JSON export failed");
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    }

    if report.exit_code() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
