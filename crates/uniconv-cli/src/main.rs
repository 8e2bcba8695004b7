//! uniconv CLI - copy rows between databases as described by a configuration file.

mod confirm;
mod progress;

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{info, Level};
use uniconv::{Config, Orchestrator, RunResult, UniconvError};

use crate::progress::BarProgress;

/// Log file used when `settings.log_file` is non-zero.
const DEFAULT_LOG_FILE: &str = "uniconv.log";

#[derive(Parser)]
#[command(name = "uniconv")]
#[command(about = "Copy rows between MySQL and SQLite databases, entity by entity")]
#[command(version)]
struct Cli {
    /// Path to JSON (or YAML) configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every configured entity from source to target
    Run {
        /// Print the INSERT statements instead of executing them
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,

        /// Do not draw progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Validate the configuration and print the conversion plan
    Check,

    /// Test database connections
    HealthCheck,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), UniconvError> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    let log_file = cli.log_file.clone().or_else(|| {
        config
            .settings()
            .log_to_file()
            .then(|| PathBuf::from(DEFAULT_LOG_FILE))
    });
    setup_logging(&cli.verbosity, cli.log_format, log_file.as_deref())?;
    info!("Loaded configuration from {:?}", cli.config);

    let orchestrator = Orchestrator::new(config)?;

    match cli.command {
        Commands::Run {
            dry_run,
            yes,
            no_progress,
        } => {
            let progress = BarProgress::new(!no_progress);

            let result = if dry_run {
                let result = orchestrator.dry_run(&progress, std::io::stdout()).await?;
                std::io::stdout().flush()?;
                result
            } else {
                if !yes {
                    confirm::confirm_run(&orchestrator)?;
                }
                orchestrator.run(&progress).await?
            };

            print_result(&result, cli.output_json)?;
        }

        Commands::Check => {
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(orchestrator.plans())?);
            } else {
                print_plan(&orchestrator);
            }
        }

        Commands::HealthCheck => {
            let result = orchestrator.health_check().await?;
            let config = orchestrator.config();

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!(
                    "  Source ({}): {} ({}ms)",
                    config.source().r#type,
                    if result.source_connected { "OK" } else { "FAILED" },
                    result.source_latency_ms
                );
                if let Some(ref err) = result.source_error {
                    println!("    Error: {}", err);
                }
                println!(
                    "  Target ({}): {} ({}ms)",
                    config.target().r#type,
                    if result.target_connected { "OK" } else { "FAILED" },
                    result.target_latency_ms
                );
                if let Some(ref err) = result.target_error {
                    println!("    Error: {}", err);
                }
                println!(
                    "\n  Overall: {}",
                    if result.healthy { "HEALTHY" } else { "UNHEALTHY" }
                );
            }

            if let Some(err) = result.into_error() {
                return Err(err);
            }
        }
    }

    Ok(())
}

fn print_result(result: &RunResult, output_json: bool) -> Result<(), UniconvError> {
    if output_json {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    let status_msg = if result.status == "dry_run" {
        "Dry run completed!"
    } else {
        "Conversion completed!"
    };
    println!("\n{}", status_msg);
    println!("  Run ID: {}", result.run_id);
    println!("  Duration: {:.2}s", result.duration_seconds);
    println!("  Entities: {}", result.entities_total);
    println!("  Rows: {}", result.rows_transferred);
    println!("  Throughput: {} rows/sec", result.rows_per_second);
    Ok(())
}

fn print_plan(orchestrator: &Orchestrator) {
    let config = orchestrator.config();
    let plans = orchestrator.plans();

    println!("Configuration OK");
    println!("  Source: {}", config.source().describe());
    println!("  Target: {}", config.target().describe());
    println!("  Timezone: {:?}", config.settings().timezone);
    println!("  Entities ({}):", plans.len());
    for plan in plans {
        println!(
            "    {}: {} -> {}",
            plan.name, plan.source_table, plan.target_table
        );
        if let Some(ref filter) = plan.filter {
            println!("      where {}", filter);
        }
        for field in &plan.fields {
            println!(
                "      {} -> {} [{}]",
                field.source_column,
                field.target_column,
                field.converter.name()
            );
        }
    }
}

fn setup_logging(
    verbosity: &str,
    format: LogFormat,
    log_file: Option<&Path>,
) -> Result<(), UniconvError> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = subscriber.with_ansi(false).with_writer(Mutex::new(file));
            match format {
                LogFormat::Json => subscriber.json().init(),
                LogFormat::Text => subscriber.init(),
            }
        }
        None => {
            let subscriber = subscriber.with_writer(std::io::stderr);
            match format {
                LogFormat::Json => subscriber.json().init(),
                LogFormat::Text => subscriber.init(),
            }
        }
    }

    Ok(())
}
