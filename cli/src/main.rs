//! Earthworm CLI - runs the analyzer on one file and prints its markers.
//!
//! ```text
//! config -> AnalyzerRunner::run_or_empty -> AnnotationSession::apply -> markers -> render
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`) so stdout carries only
//! marker output.

mod render;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use earthworm_analyzer::AnalyzerRunner;
use earthworm_config::EarthwormConfig;
use earthworm_markers::{AnnotationSession, TextDocument};

use crate::render::Format;

#[derive(Parser, Debug)]
#[command(name = "earthworm", version, about = "Show Earthworm refactoring suggestions for a Python file")]
struct Cli {
    /// Interpreter version appended to the configured interpreter (e.g. "3").
    #[arg(long, value_name = "VERSION")]
    python_version: Option<String>,

    /// Config file to use instead of ~/.earthworm/config.toml.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Python source file to analyze.
    file: PathBuf,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<EarthwormConfig> {
    match explicit {
        Some(path) => Ok(EarthwormConfig::load_from(path)?),
        None => Ok(EarthwormConfig::load()?.unwrap_or_default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let runner = AnalyzerRunner::new(config.analyzer());
    let suggestions = runner
        .run_or_empty(&cli.file, cli.python_version.as_deref())
        .await;

    let mut session =
        AnnotationSession::new(TextDocument::new(source)).with_style(config.marker_style());
    let summary = session.apply(suggestions);
    tracing::info!(bound = summary.bound, dropped = summary.dropped, "Suggestions applied");

    let markers = session.markers().into_markers();
    let mut out = io::stdout().lock();
    render::write_markers(&mut out, &cli.file, session.document(), &markers, cli.format)?;
    out.flush()?;
    Ok(())
}
