//! One-shot translation CLI
//!
//! # Usage
//!
//! ```bash
//! # Table output
//! translate "Hello John, welcome to New York"
//!
//! # Same JSON body the HTTP API returns, model-free NER
//! echo "thanks Mary" | translate --format json --heuristic-ner
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use signbridge::api::schemas::TranslateResponse;
use signbridge::config::NerBackend;
use signbridge::translation::{TranslationItem, TranslationKind};
use signbridge::{bootstrap, Settings};

#[derive(Parser)]
#[command(name = "translate")]
#[command(version)]
#[command(about = "Translate text into sign videos and fingerspelling")]
#[command(long_about = None)]
struct Cli {
    /// Text to translate (reads stdin if not provided)
    text: Vec<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", value_enum)]
    format: OutputFormat,

    /// Use capitalisation rules instead of the BERT NER model
    #[arg(long)]
    heuristic_ner: bool,

    /// Directory of <word>.mp4 sign videos
    #[arg(long, env = "SIGNBRIDGE_VIDEOS_DIR")]
    videos_dir: Option<PathBuf>,

    /// Minimum similarity for a semantic match
    #[arg(long)]
    threshold: Option<f32>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signbridge=warn,sign_semantic_matcher=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                let body = serde_json::json!({ "success": false, "detail": format!("{e:#}") });
                println!("{body}");
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = input_text(&cli.text)?;

    let mut settings = Settings::from_env().context("Invalid configuration")?;
    if cli.heuristic_ner {
        settings.ner_backend = NerBackend::Heuristic;
    }
    if let Some(dir) = &cli.videos_dir {
        settings.videos_dir = dir.clone();
    }
    if let Some(threshold) = cli.threshold {
        settings.similarity_threshold = threshold;
    }
    settings.validate()?;

    let service = bootstrap::build_service(&settings)?;
    let result = service.translate(&text)?;

    match cli.format {
        OutputFormat::Json => {
            let response = TranslateResponse::from(result);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Table => {
            for item in result.items() {
                println!("{}", table_row(item));
            }
            println!(
                "\n{} video, {} fingerspell, {} skipped ({} words)",
                result.video_count(),
                result.fingerspell_count(),
                result.skipped_count(),
                result.total()
            );
        }
    }
    Ok(())
}

fn input_text(args: &[String]) -> Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn table_row(item: &TranslationItem) -> String {
    let similarity = item
        .similarity
        .map(|s| format!("{s:.3}"))
        .unwrap_or_default();
    let kind = format!("{:<11}", item.kind.to_string());
    match item.kind {
        TranslationKind::Video => format!(
            "{:<16} {} {:<16} {} {}",
            item.original_word,
            kind.green(),
            item.matched_word.as_deref().unwrap_or(""),
            similarity,
            item.url.as_deref().unwrap_or("").dimmed()
        ),
        TranslationKind::Fingerspell => {
            let letters: String = item
                .letters
                .iter()
                .flatten()
                .map(|c| c.to_ascii_uppercase().to_string())
                .collect::<Vec<_>>()
                .join("-");
            format!(
                "{:<16} {} {:<16} {}",
                item.original_word,
                kind.yellow(),
                letters,
                similarity
            )
        }
        TranslationKind::Skipped => format!(
            "{:<16} {} {:<16} {}",
            item.original_word,
            kind.dimmed(),
            "",
            similarity
        ),
    }
}
