mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fotd-cli")]
#[command(about = "Frozen custard flavor-of-the-day collector")]
struct Cli {
    /// Snapshot file; defaults to FOTD_SNAPSHOT_PATH
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run every source once and save the snapshot
    Collect {
        /// Print the snapshot instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the stored snapshot
    Show {
        /// Print only the location with this id
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = fotd_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let snapshot_path = cli
        .snapshot
        .unwrap_or_else(|| config.snapshot_path.clone());

    match cli.command {
        Commands::Collect { dry_run } => commands::collect(&config, &snapshot_path, dry_run).await,
        Commands::Show { id } => commands::show(&snapshot_path, id.as_deref()),
    }
}
