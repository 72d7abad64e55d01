mod commands;

use anyhow::Result;
use ascend_common::Config;
use ascend_tester::{LanguageConfigManager, StrategyRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ascend-cli")]
#[command(about = "AscendDev tester - prepare test runs and normalize their results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported languages and their tester images
    Languages,

    /// Write the test files for a submission into an execution directory
    Prepare {
        /// Lesson descriptor (JSON)
        #[arg(short, long)]
        lesson: PathBuf,

        /// File containing the submitted code
        #[arg(short, long)]
        code: PathBuf,

        /// Execution directory (created if missing)
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Print the container descriptor for an execution directory
    ContainerConfig {
        /// Lesson descriptor (JSON)
        #[arg(short, long)]
        lesson: PathBuf,

        /// Execution directory to mount
        #[arg(short, long)]
        dir: PathBuf,

        /// Container name (defaults to ascenddev-exec-<uuid>)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Turn the artifacts of a finished run into a TestResult
    Process {
        /// Lesson descriptor (JSON)
        #[arg(short, long)]
        lesson: PathBuf,

        /// Execution directory the container ran against
        #[arg(short, long)]
        dir: PathBuf,

        /// Captured container stdout
        #[arg(long)]
        stdout_file: Option<PathBuf>,

        /// Captured container stderr
        #[arg(long)]
        stderr_file: Option<PathBuf>,

        /// Container exit code
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        exit_code: i64,

        /// Wall-clock duration of the run
        #[arg(long, default_value = "0")]
        elapsed_ms: u64,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout carries command output, logs go to stderr
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();
    let languages = LanguageConfigManager::load_or_default(&config.languages_config)?;
    let registry = StrategyRegistry::with_defaults(&config, &languages);

    info!(
        languages_config = %config.languages_config.display(),
        keep_raw_results = config.keep_raw_results,
        "Tester configuration loaded"
    );

    match cli.command {
        Commands::Languages => {
            for line in commands::list_languages(&registry) {
                println!("{}", line);
            }
        }
        Commands::Prepare { lesson, code, dir } => {
            commands::prepare(&registry, &lesson, &code, &dir).await?;
            println!("{}", dir.display());
        }
        Commands::ContainerConfig { lesson, dir, name } => {
            let container = commands::container_config(&registry, &lesson, &dir, name).await?;
            println!("{}", serde_json::to_string_pretty(&container)?);
        }
        Commands::Process {
            lesson,
            dir,
            stdout_file,
            stderr_file,
            exit_code,
            elapsed_ms,
        } => {
            let result = commands::process(
                &registry,
                &lesson,
                &dir,
                stdout_file.as_deref(),
                stderr_file.as_deref(),
                exit_code,
                elapsed_ms,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
