//! Play an ambient channel until interrupted.

use super::common::{self, OutputArgs, parse_volume};
use anyhow::Context;
use clap::Args;
use std::path::Path;
use std::time::Duration;

#[derive(Args)]
pub struct AmbientArgs {
    /// Channel id (see `moment catalog`)
    #[arg(value_name = "ID")]
    id: u32,

    /// Ambient volume from 0 to 1 (defaults to the saved volume)
    #[arg(short, long, value_parser = parse_volume)]
    volume: Option<f32>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(short, long)]
    seconds: Option<f64>,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: AmbientArgs, config_dir: &Path) -> anyhow::Result<()> {
    let catalog = common::catalog(config_dir)?;
    let settings = common::settings(config_dir)?;
    let channel = catalog
        .channel(args.id)
        .cloned()
        .with_context(|| format!("Unknown channel {}. Run 'moment catalog' to list channels.", args.id))?;

    let mut session = common::open_session(&args.output, catalog, &settings);
    if let Some(volume) = args.volume {
        session.set_ambient_volume(volume);
    }
    session.set_ambient_channel(args.id)?;

    if channel.is_silence() {
        println!("{} selected; nothing to play.", channel.name);
        return Ok(());
    }

    let running = common::interrupt_flag()?;
    match args.seconds {
        Some(s) if s.is_finite() && s > 0.0 => {
            println!("Playing {} for {s:.0} s. Press Ctrl+C to stop.", channel.name);
            common::sleep_while(&running, Duration::from_secs_f64(s));
        }
        _ => {
            println!("Playing {}. Press Ctrl+C to stop.", channel.name);
            while common::sleep_while(&running, Duration::from_secs(1)) {}
        }
    }

    session.stop_ambient();
    println!("Stopped.");
    Ok(())
}
