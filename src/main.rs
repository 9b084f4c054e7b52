//! code-telescope: generate a markdown code map for a project

use anyhow::{Context, Result};
use clap::Parser;
use code_telescope::config::Config;
use code_telescope::orchestrator::CodeMapper;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "code-telescope",
    version,
    about = "Code maps for Go, JavaScript/TypeScript and Python projects"
)]
struct Cli {
    /// Project root to scan.
    #[arg(long, default_value = ".")]
    project_path: PathBuf,

    /// Configuration file (default: first of configs/default.yaml, config.yaml, code-telescope.yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the markdown code map.
    #[arg(long, default_value = "code-map.md")]
    output: PathBuf,

    /// Override the configured provider (openai, anthropic, none).
    #[arg(long)]
    llm_provider: Option<String>,

    /// Also dump the structural models as JSON.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Debug logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let mut config = Config::discover(cli.config.as_deref(), &cwd)?;
    if let Some(provider) = cli.llm_provider {
        config.llm.provider = provider;
    }
    config.validate()?;

    let mapper = CodeMapper::from_config(config)?;
    let map = mapper.generate(&cli.project_path)?;

    CodeMapper::save(&map.markdown, &cli.output)?;
    if let Some(json) = &cli.json {
        CodeMapper::save_json(&map.files, json)?;
    }

    let stats = map.stats;
    info!(
        "✅ {} of {} file(s) mapped, {} description(s) generated, {} missing, {} failed batch(es)",
        stats.files_parsed,
        stats.files_scanned,
        stats.callables_described,
        stats.descriptions_missing,
        stats.batches_failed
    );
    Ok(())
}
