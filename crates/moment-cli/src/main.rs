//! Moment CLI - a meditation timer with generated ambient sound and bells.

mod commands;
mod timer;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moment")]
#[command(author, version, about = "Meditation timer with ambient sound and bells", long_about = None)]
struct Cli {
    /// Configuration directory (default: the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sit a timed session
    Sit(commands::sit::SitArgs),

    /// Ring a bell
    Bell(commands::bell::BellArgs),

    /// Play an ambient channel
    Ambient(commands::ambient::AmbientArgs),

    /// Render a bell or ambient channel to a WAV file
    Render(commands::render::RenderArgs),

    /// Show, export, or clear session history
    History(commands::history::HistoryArgs),

    /// Show or change settings
    Settings(commands::settings::SettingsArgs),

    /// List ambient channels and bells
    Catalog(commands::catalog::CatalogArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_dir = commands::common::config_dir(cli.config_dir.as_deref());

    match cli.command {
        Commands::Sit(args) => commands::sit::run(args, &config_dir),
        Commands::Bell(args) => commands::bell::run(args, &config_dir),
        Commands::Ambient(args) => commands::ambient::run(args, &config_dir),
        Commands::Render(args) => commands::render::run(args, &config_dir),
        Commands::History(args) => commands::history::run(args, &config_dir),
        Commands::Settings(args) => commands::settings::run(args, &config_dir),
        Commands::Catalog(args) => commands::catalog::run(args, &config_dir),
    }
}
