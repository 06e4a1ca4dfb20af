use anyhow::Context;
use clap::{Parser, Subcommand};
use codelens_core::{AnalysisEngine, CodelensConfig, ImprovementKind, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "codelens")]
#[command(about = "Codelens.rs - heuristic static analysis for code snippets")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the usual search paths)
    #[arg(long, global = true, env = "CODELENS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the analysis worker budget
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a file, or stdin when PATH is `-` or absent
    Analyze {
        #[arg(help = "Source file to analyze")]
        path: Option<PathBuf>,

        /// Language tag; inferred from the file extension when absent
        #[arg(short, long)]
        language: Option<String>,

        /// Only report complexity metrics
        #[arg(long)]
        complexity_only: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the best-practice list for a language
    Practices {
        #[arg(help = "Language tag, e.g. python")]
        language: String,
    },

    /// Print a static improvement plan
    Improve {
        #[arg(long, default_value_t = ImprovementKind::General)]
        kind: ImprovementKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CodelensConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CodelensConfig::discover().context("Failed to load configuration")?,
    };

    if let Some(workers) = cli.workers {
        config.engine.max_workers = workers;
    }

    init_tracing(&config.logging, cli.verbose);

    let engine = AnalysisEngine::with_config(config.engine).context("Failed to start engine")?;

    let output = match cli.command {
        Commands::Analyze {
            path,
            language,
            complexity_only,
            pretty,
        } => {
            commands::analyze(
                &engine,
                path.as_deref(),
                language.as_deref(),
                complexity_only,
                pretty,
            )
            .await?
        }
        Commands::Practices { language } => commands::practices(&engine, &language)?,
        Commands::Improve { kind } => commands::improve(&engine, kind)?,
    };

    println!("{}", output);
    Ok(())
}

/// Logs go to stderr so stdout carries only JSON
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
