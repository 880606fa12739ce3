//! Ring a bell and wait for it to die away.

use super::common::{self, OutputArgs, parse_volume};
use anyhow::Context;
use clap::Args;
use std::path::Path;
use std::time::Duration;

#[derive(Args)]
pub struct BellArgs {
    /// Bell id (defaults to the selected bell)
    #[arg(value_name = "ID")]
    id: Option<u32>,

    /// Bell volume from 0 to 1 (defaults to the saved volume)
    #[arg(short, long, value_parser = parse_volume)]
    volume: Option<f32>,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: BellArgs, config_dir: &Path) -> anyhow::Result<()> {
    let catalog = common::catalog(config_dir)?;
    let settings = common::settings(config_dir)?;
    let id = args.id.unwrap_or(settings.bell_id);
    let bell = catalog
        .bell(id)
        .cloned()
        .with_context(|| format!("Unknown bell {id}. Run 'moment catalog' to list bells."))?;

    let mut session = common::open_session(&args.output, catalog, &settings);
    if let Some(volume) = args.volume {
        session.set_bell_volume(volume);
    }

    println!("{} ({} Hz, {:.1} s)", bell.name, bell.frequency_hz, bell.decay_seconds);
    let running = common::interrupt_flag()?;
    if let Some(Some(done)) = common::soften(session.play_bell(id)) {
        let wait = (done - session.current_time()).max(0.0) + 0.1;
        common::sleep_while(&running, Duration::from_secs_f64(wait));
    }
    Ok(())
}
