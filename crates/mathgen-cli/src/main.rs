//! Mathgen CLI
//!
//! Generates elementary maths questions from the command line, parses saved
//! completions offline, or serves the HTTP API.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mathgen_client::ChatCompletionClient;
use mathgen_core::{GenerateRequest, QuestionBatch, QuestionType, ResponseParser, DEFAULT_NUM_QUESTIONS};
use mathgen_service::{create_router, AppState, Config, MathGenError, Pipeline};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Mathgen - Elementary Maths Question Generator
///
/// Builds a curriculum-aware prompt, asks a hosted language model for
/// questions, and parses the reply into structured records.
#[derive(Parser, Debug)]
#[command(name = "mathgen")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: mathgen.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of questions and print it as JSON
    Generate {
        /// Year level (1-6)
        #[arg(short, long)]
        year: i64,

        /// Difficulty: easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: String,

        /// Question type: multiple_choice, numerical, comparison or problem_solving
        #[arg(short = 't', long = "type", default_value = "multiple_choice")]
        question_type: String,

        /// Topic: arithmetic, algebra or geometry
        #[arg(long, default_value = "arithmetic")]
        topic: String,

        /// Number of questions to request
        #[arg(short = 'n', long, default_value_t = i64::from(DEFAULT_NUM_QUESTIONS))]
        count: i64,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse a saved completion without calling the provider
    Parse {
        /// Question type the completion was generated for
        #[arg(short = 't', long = "type")]
        question_type: QuestionType,

        /// File containing the raw completion text
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on (overrides mathgen.json)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine; the environment may already carry the key.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Generate {
            year,
            difficulty,
            question_type,
            topic,
            count,
            pretty,
        } => {
            let config = load_config(args.config.as_deref())?;
            let request = GenerateRequest {
                year_level: year,
                difficulty,
                question_type,
                topic,
                num_questions: count,
            };
            let batch = generate(&config, &request).await?;
            print_batch(&batch, pretty)
        }
        Command::Parse {
            question_type,
            file,
            pretty,
        } => {
            let raw = std::fs::read_to_string(&file).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to read completion file '{}': {e}\n\nSuggestion: Check the path",
                    file.display()
                )
            })?;
            let report = ResponseParser::parse_report(&raw, question_type);
            for skipped in &report.skipped {
                eprintln!("Skipped block {}: {}", skipped.index, skipped.reason);
            }
            print_batch(&QuestionBatch::from(report.questions), pretty)
        }
        Command::Serve { port } => {
            let mut config = load_config(args.config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
    }
}

/// Builds the real completion client from configuration.
fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let settings = config.provider_settings()?;
    tracing::info!(
        provider = %config.provider,
        model = %settings.model,
        "Using completion provider"
    );
    Ok(Pipeline::new(Arc::new(ChatCompletionClient::new(settings))))
}

async fn generate(config: &Config, request: &GenerateRequest) -> anyhow::Result<QuestionBatch> {
    let pipeline = build_pipeline(config)?;
    let deadline = config.timeout_duration();

    let batch = tokio::time::timeout(deadline, pipeline.generate(request))
        .await
        .map_err(|_| MathGenError::timeout(deadline.as_secs()))??;

    if batch.count < usize::try_from(request.num_questions).unwrap_or(usize::MAX) {
        tracing::warn!(
            requested = request.num_questions,
            returned = batch.count,
            "Fewer questions than requested"
        );
    }
    Ok(batch)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&config)?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            anyhow::anyhow!(
                "Invalid listen address '{}:{}': {e}\n\nSuggestion: Set host to an IP address in mathgen.json",
                config.host,
                config.port
            )
        })?;

    let router = create_router(AppState::new(config, pipeline));

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    tracing::info!(%addr, "HTTP API server running");
    axum::serve(listener, router).await?;
    Ok(())
}

fn print_batch(batch: &QuestionBatch, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(batch)?
    } else {
        serde_json::to_string(batch)?
    };
    println!("{json}");
    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}
