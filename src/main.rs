// SPDX-License-Identifier: MPL-2.0

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use vkexport::api::HttpTransport;
use vkexport::config::{API_HOST, ExportConfig};
use vkexport::store::ArchiveDb;
use vkexport::Exporter;

/// Export the full history of a VK conversation into a local SQLite archive
/// and download the media it references.
#[derive(Parser, Debug)]
#[command(name = "vkexport")]
#[command(version, about, long_about = None)]
struct Args {
    /// Access token of the exporting account
    #[arg(short = 't', long, env = "VK_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Conversation to export (user id, -group id, or 2000000000 + chat id)
    #[arg(short, long, allow_negative_numbers = true)]
    peer_id: i64,

    /// Output directory [default: <data dir>/vkexport/<peer id>]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Log per-message and per-file progress
    #[arg(long)]
    progress: bool,

    /// API host
    #[arg(long, default_value = API_HOST)]
    api_host: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "vkexport=debug"
    } else {
        "vkexport=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let destination = match args.output {
        Some(dir) => dir,
        None => ExportConfig::default_destination(args.peer_id)
            .context("no data directory available, pass --output")?,
    };
    let config = ExportConfig::new(args.access_token, args.peer_id, destination)
        .with_progress(args.progress)
        .with_api_host(args.api_host);

    let transport = HttpTransport::new(&config.api_host)?;
    let db = ArchiveDb::open(&config.database_path())
        .with_context(|| format!("opening {}", config.database_path().display()))?;

    let summary = Exporter::new(&config, &transport, &db).run()?;
    info!(
        "Done: {} messages ({} new), {} new users, {} files in {}",
        summary.messages_seen,
        summary.messages_inserted,
        summary.users_inserted,
        summary.files_downloaded,
        config.destination().display()
    );

    Ok(())
}
