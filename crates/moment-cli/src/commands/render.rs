//! Offline rendering of bells and ambient channels to WAV.

use super::common::{self, parse_volume};
use anyhow::Context;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use moment_engine::{AudioSessionController, OfflinePlatform, write_wav};
use std::path::{Path, PathBuf};

const BLOCK_FRAMES: usize = 1024;
/// Silence kept after a bell's decay.
const BELL_TAIL_SECONDS: f64 = 0.5;
/// Default length of an ambient render.
const DEFAULT_AMBIENT_SECONDS: f64 = 10.0;

#[derive(Args)]
pub struct RenderArgs {
    #[command(subcommand)]
    target: RenderTarget,
}

#[derive(Subcommand)]
enum RenderTarget {
    /// Render a bell strike
    Bell {
        /// Bell id
        id: u32,
        /// Output WAV file
        output: PathBuf,
        #[command(flatten)]
        options: RenderOptions,
    },
    /// Render an ambient channel
    Ambient {
        /// Channel id
        id: u32,
        /// Output WAV file
        output: PathBuf,
        #[command(flatten)]
        options: RenderOptions,
    },
}

#[derive(Args)]
struct RenderOptions {
    /// Length in seconds (bell: decay plus a short tail; ambient: 10)
    #[arg(short, long)]
    seconds: Option<f64>,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,

    /// Volume from 0 to 1 (defaults to the saved volume)
    #[arg(short, long, value_parser = parse_volume)]
    volume: Option<f32>,

    /// Noise seed, for reproducible ambient renders
    #[arg(long)]
    seed: Option<u32>,
}

pub fn run(args: RenderArgs, config_dir: &Path) -> anyhow::Result<()> {
    let catalog = common::catalog(config_dir)?;
    let settings = common::settings(config_dir)?;

    let (output, options, label) = match &args.target {
        RenderTarget::Bell { id, output, options } => {
            let bell = catalog
                .bell(*id)
                .with_context(|| format!("Unknown bell {id}"))?;
            (output, options, bell.name.clone())
        }
        RenderTarget::Ambient { id, output, options } => {
            let channel = catalog
                .channel(*id)
                .with_context(|| format!("Unknown channel {id}"))?;
            (output, options, channel.name.clone())
        }
    };
    if !(1000..=384_000).contains(&options.sample_rate) {
        anyhow::bail!("Sample rate {} Hz is out of range", options.sample_rate);
    }

    let mut session =
        AudioSessionController::new(OfflinePlatform::new(options.sample_rate as f32), catalog);
    if let Some(seed) = options.seed {
        session = session.with_noise_seed(seed);
    }
    session.ensure_context()?;
    session.set_bell_volume(options.volume.unwrap_or(settings.bell_volume));
    session.set_ambient_volume(options.volume.unwrap_or(settings.ambient_volume));

    let seconds = match &args.target {
        RenderTarget::Bell { id, .. } => {
            let done = session.play_bell(*id)?.unwrap_or(0.0);
            options.seconds.unwrap_or(done + BELL_TAIL_SECONDS)
        }
        RenderTarget::Ambient { id, .. } => {
            session.set_ambient_channel(*id)?;
            options.seconds.unwrap_or(DEFAULT_AMBIENT_SECONDS)
        }
    };
    if !(seconds.is_finite() && seconds > 0.0) {
        anyhow::bail!("Render length must be a positive number of seconds");
    }

    let total = (seconds * f64::from(options.sample_rate)).round() as usize;
    let mut samples = vec![0.0f32; total];

    println!("Rendering {label} ({seconds:.1} s at {} Hz)...", options.sample_rate);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let ctx = session
        .context_mut()
        .context("Offline context was not created")?;
    for (i, block) in samples.chunks_mut(BLOCK_FRAMES).enumerate() {
        ctx.render_into(block);
        pb.set_position(((i + 1) * BLOCK_FRAMES).min(total) as u64);
    }
    pb.finish_with_message("done");

    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    write_wav(output, &samples, options.sample_rate)?;
    println!(
        "Wrote {} ({} frames, peak {:.3})",
        output.display(),
        samples.len(),
        peak
    );
    Ok(())
}
