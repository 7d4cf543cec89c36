//! CLI binary for kenning.
//!
//! Prints one JSON document per invocation on stdout. Diagnostics go to
//! stderr so stdout can be piped straight into other tools.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kenning::{ErrorClass, KenningConfig, KenningError, KeywordInput, ResolutionPipeline};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Kenning: resolve a keyword or URL into a readable summary.
#[derive(Parser)]
#[command(name = "kenning", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed JSON.
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Fetch a web page and summarise it.
    Url {
        /// Page address; `https://` is assumed when no scheme is given.
        url: String,
    },

    /// Summarise a term from the encyclopedia.
    Wiki {
        term: String,
        /// Encyclopedia language code (defaults to the configured language).
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Search a term and summarise the best-ranked hit.
    Force {
        term: String,
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Recommend resources for keywords.
    ///
    /// A single argument is split on commas; several arguments are taken
    /// as separate keywords.
    Resources {
        #[arg(required = true)]
        keywords: Vec<String>,
        /// Maximum number of results (1-10).
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Report whether the summarisation service is configured.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kenning=info,kenning_fetch=info")),
        )
        .init();

    let cli = Cli::parse();

    let (document, code) = match run(&cli).await {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(e) => {
            let class = e.class();
            tracing::error!(error = %e, class = class.as_str(), "request failed");
            (error_document(&e), exit_code(class))
        }
    };

    let rendered = if cli.compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    println!("{rendered}");
    Ok(code)
}

async fn run(cli: &Cli) -> Result<Value, KenningError> {
    let config = KenningConfig::load(cli.config.as_deref())?;
    let pipeline = ResolutionPipeline::from_config(&config)?;

    let value = match &cli.command {
        Command::Url { url } => to_value(pipeline.summarize_url(url).await?)?,
        Command::Wiki { term, lang } => {
            to_value(pipeline.lookup_keyword(term, lang.as_deref()).await?)?
        }
        Command::Force { term, lang } => {
            to_value(pipeline.force_lookup(term, lang.as_deref()).await?)?
        }
        Command::Resources { keywords, limit } => {
            let input = keyword_input(keywords);
            to_value(pipeline.research_resources(&input, *limit).await?)?
        }
        Command::Status => to_value(pipeline.gateway_status())?,
    };
    Ok(value)
}

fn keyword_input(args: &[String]) -> KeywordInput {
    match args {
        [single] => KeywordInput::from(single.as_str()),
        many => KeywordInput::from(many.to_vec()),
    }
}

fn to_value(value: impl serde::Serialize) -> Result<Value, KenningError> {
    serde_json::to_value(value).map_err(|e| KenningError::Io(std::io::Error::other(e)))
}

fn error_label(error: &KenningError) -> &'static str {
    match error {
        KenningError::EmptyInput(_) => "empty input",
        KenningError::Fetch(_) => "could not load page",
        KenningError::EmptyContent(_) => "no extractable content",
        KenningError::Config(_) => "configuration error",
        KenningError::Io(_) => "I/O error",
    }
}

fn error_document(error: &KenningError) -> Value {
    json!({
        "error": error_label(error),
        "detail": error.to_string(),
        "class": error.class().as_str(),
    })
}

fn exit_code(class: ErrorClass) -> ExitCode {
    match class {
        ErrorClass::BadRequest => ExitCode::from(2),
        ErrorClass::UpstreamUnavailable => ExitCode::from(3),
        ErrorClass::Internal => ExitCode::FAILURE,
    }
}
