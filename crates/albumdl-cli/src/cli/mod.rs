//! CLI for the albumdl album downloader.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use albumdl_core::catalog::{CatalogAudioResolver, CatalogClient, CatalogTrackList};
use albumdl_core::config::{self, AlbumdlConfig};
use albumdl_core::downloader::FileDownloader;
use albumdl_core::pipeline::Orchestrator;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub use report::{exit_code, EXIT_FAILURE};

/// Download every track of an album, one at a time.
#[derive(Debug, Parser)]
#[command(name = "albumdl")]
#[command(about = "albumdl: download all tracks of a catalog album", long_about = None)]
pub struct Cli {
    /// Album identifier (positive base-10 integer).
    #[arg(allow_negative_numbers = true)]
    pub album_id: String,

    /// Directory to create album folders in (default: config, then current directory).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Read configuration from this TOML file instead of the XDG config location.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn load_config(explicit: Option<&Path>) -> Result<AlbumdlConfig> {
    let mut cfg = match explicit {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    cfg.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(cfg)
}

pub fn run_from_args() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    tracing::debug!("loaded config: {:?}", cfg);

    let cwd = std::env::current_dir().context("resolve current directory")?;
    let output_root = cfg.output_root(cli.output_dir.as_deref(), &cwd);

    let client = CatalogClient::new(&cfg.catalog)?;
    let mut audio_headers = cfg.catalog.headers.clone();
    audio_headers
        .entry("User-Agent".to_string())
        .or_insert_with(|| cfg.catalog.user_agent.clone());

    let orchestrator = Orchestrator::new(
        CatalogTrackList::new(client.clone()),
        CatalogAudioResolver::new(client),
        FileDownloader::new(&output_root, cfg.download.clone()).with_headers(audio_headers),
    );
    tracing::info!(output_root = %output_root.display(), album = %cli.album_id, "starting run");

    let run = orchestrator.run_raw(&cli.album_id, report::print_event);
    report::print_terminal(&run.terminal);
    Ok(ExitCode::from(exit_code(&run.terminal)))
}

#[cfg(test)]
mod tests;
