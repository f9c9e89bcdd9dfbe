use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use permalink_core::config::Config;
use permalink_core::permalink;
use permalink_core::providers::PermalinkService;
use permalink_core::LineRange;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "git-permalink",
    version,
    about = "Print a shareable link to lines of a git-hosted file"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link to lines of a file in the enclosing repository
    Link {
        /// File to link to
        file: PathBuf,
        /// First line (1-based); omit for a link without a line anchor
        #[arg(short, long, default_value_t = 0)]
        start: u32,
        /// Last line (1-based); defaults to the first line
        #[arg(short, long)]
        end: Option<u32>,
        /// Repository provider id (overrides the config file)
        #[arg(short, long)]
        provider: Option<String>,
        /// Config file to use instead of ./.permalink.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Build a link from explicit parts without reading a repository
    Build {
        /// Remote URL, SSH or HTTPS
        #[arg(long)]
        remote: String,
        /// Commit hash or branch name
        #[arg(long = "ref")]
        reference: String,
        /// Path relative to the repository root
        #[arg(long)]
        path: String,
        /// First line (1-based)
        #[arg(short, long, default_value_t = 0)]
        start: u32,
        /// Last line (1-based)
        #[arg(short, long)]
        end: Option<u32>,
    },
    /// List the available repository providers
    Providers {
        /// Config file to use instead of ./.permalink.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Link {
            file,
            start,
            end,
            provider,
            config,
        } => {
            let service = PermalinkService::from_config(load_config(config.as_deref())?);
            let provider = provider.unwrap_or_else(|| service.default_provider().to_string());
            let link = service
                .permalink(&provider, &file, lines(start, end))
                .with_context(|| format!("failed to link {}", file.display()))?;
            println!("{link}");
        }
        Commands::Build {
            remote,
            reference,
            path,
            start,
            end,
        } => {
            let link = permalink::build_for_lines(&remote, &reference, &path, lines(start, end));
            println!("{link}");
        }
        Commands::Providers { config } => {
            let service = PermalinkService::from_config(load_config(config.as_deref())?);
            for summary in service.summaries() {
                let marker = if summary.id == service.default_provider() {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {:<10} {}", summary.id, summary.label);
            }
        }
    }
    Ok(())
}

fn lines(start: u32, end: Option<u32>) -> LineRange {
    LineRange::new(start, end.unwrap_or(start))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Config::load(Path::new(".")).context("failed to load .permalink.toml"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
