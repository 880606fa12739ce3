//! List the available ambient channels and bells.

use super::common;
use clap::Args;
use moment_config::{paths, save_catalog};
use moment_engine::{Catalog, ChannelKind};
use std::path::Path;

#[derive(Args)]
pub struct CatalogArgs {
    /// Write the built-in catalog to catalog.toml for editing
    #[arg(long)]
    init: bool,
}

pub fn run(args: CatalogArgs, config_dir: &Path) -> anyhow::Result<()> {
    if args.init {
        let path = paths::catalog_path(config_dir);
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        save_catalog(&Catalog::default(), &path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let catalog = common::catalog(config_dir)?;

    println!("Ambient channels:");
    for channel in &catalog.channels {
        let kind = match &channel.kind {
            ChannelKind::Silence => "silence".to_string(),
            ChannelKind::GeneratedNoise => "pink noise".to_string(),
            ChannelKind::GeneratedWaves => "filtered noise, slow swell".to_string(),
            ChannelKind::GeneratedDrone { frequency_hz } => format!("{frequency_hz} Hz drone"),
            ChannelKind::FileBacked { path } => format!("file {}", path.display()),
        };
        println!("  {:>3}  {:<14} {kind}", channel.id, channel.name);
    }

    println!("\nBells:");
    for bell in &catalog.bells {
        println!(
            "  {:>3}  {:<14} {} Hz, {:.1} s",
            bell.id, bell.name, bell.frequency_hz, bell.decay_seconds
        );
    }
    Ok(())
}
