//! A timed sitting: ambient sound, countdown, closing bell, journal entry.

use super::common::{self, OutputArgs};
use crate::timer::{Timer, TimerState, format_clock};
use anyhow::Context;
use chrono::Utc;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use moment_config::{DURATION_PRESETS_MINUTES, SessionJournal, SessionRecord, paths};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Args)]
pub struct SitArgs {
    /// Session length in minutes (1-180)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=180), conflicts_with = "preset")]
    minutes: Option<u32>,

    /// Preset session length in minutes: 5, 10, 15, 20, or 30
    #[arg(short, long)]
    preset: Option<u32>,

    /// Ambient channel id (see `moment catalog`)
    #[arg(short, long)]
    channel: Option<u32>,

    /// Closing bell id
    #[arg(short, long)]
    bell: Option<u32>,

    /// Intention to record with the session
    #[arg(short, long)]
    intention: Option<String>,

    /// Reflection to record afterwards
    #[arg(short, long)]
    reflection: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: SitArgs, config_dir: &Path) -> anyhow::Result<()> {
    let catalog = common::catalog(config_dir)?;
    let mut settings = common::settings(config_dir)?;

    let minutes = match (args.minutes, args.preset) {
        (Some(m), _) => Some(m),
        (None, Some(p)) if DURATION_PRESETS_MINUTES.contains(&p) => Some(p),
        (None, Some(p)) => anyhow::bail!(
            "No {p}-minute preset. Choose one of {DURATION_PRESETS_MINUTES:?}, or use --minutes"
        ),
        (None, None) => None,
    };
    let channel_id = args.channel.unwrap_or(settings.channel_id);
    let bell_id = args.bell.unwrap_or(settings.bell_id);

    let channel_name = catalog
        .channel(channel_id)
        .map(|c| c.name.clone())
        .with_context(|| format!("Unknown channel {channel_id}. Run 'moment catalog' to list channels."))?;
    let bell = catalog
        .bell(bell_id)
        .cloned()
        .with_context(|| format!("Unknown bell {bell_id}. Run 'moment catalog' to list bells."))?;

    let mut timer = Timer::new(settings.duration_seconds);
    if let Some(m) = minutes {
        timer.set_duration(m * 60)?;
    }

    // Remember explicit choices for next time.
    settings.channel_id = channel_id;
    settings.bell_id = bell_id;
    settings.duration_seconds = timer.duration();
    settings.save(paths::settings_path(config_dir))?;

    let intention = args.intention.unwrap_or_default().trim().to_string();
    let mut session = common::open_session(&args.output, catalog, &settings);
    common::soften(session.ensure_context());
    common::soften(session.set_ambient_channel(channel_id));

    let running = common::interrupt_flag()?;
    let pause_requested = spawn_pause_listener();

    println!(
        "Sitting for {} with {} and {}. Press Enter to pause, Ctrl+C to finish early.",
        format_clock(timer.duration()),
        channel_name,
        bell.name
    );
    if !intention.is_empty() {
        println!("Intention: \"{intention}\"");
    }

    let pb = ProgressBar::new(u64::from(timer.duration()));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:>6} [{bar:40.cyan/blue}]")?
            .progress_chars("##-"),
    );
    pb.set_message(timer.to_string());

    let started_at = Utc::now();
    timer.start();
    let finished_early = loop {
        if !common::sleep_while(&running, Duration::from_secs(1)) {
            break true;
        }

        let want_paused = pause_requested.load(Ordering::SeqCst);
        if want_paused != (timer.state() == TimerState::Paused) {
            timer.toggle();
            if want_paused {
                session.suspend();
                pb.set_message("paused");
            } else {
                common::soften(session.ensure_context());
            }
            continue;
        }
        if timer.state() != TimerState::Running {
            continue;
        }

        if timer.tick() {
            break false;
        }
        pb.set_position(u64::from(timer.elapsed()));
        pb.set_message(timer.to_string());
    };

    let sat = if finished_early {
        let progress = timer.progress();
        let sat = timer.finish_early().unwrap_or_else(|| timer.elapsed());
        pb.abandon_with_message("done");
        println!("\nFinished early after {} ({:.0}%).", format_clock(sat), progress * 100.0);
        sat
    } else {
        pb.set_position(u64::from(timer.duration()));
        pb.finish_with_message("0:00");
        timer.duration()
    };

    // Make sure sound can play again after a pause.
    common::soften(session.ensure_context());
    session.stop_ambient();
    if let Some(Some(done)) = common::soften(session.play_bell(bell_id)) {
        let wait = (done - session.current_time()).max(0.0);
        std::thread::sleep(Duration::from_secs_f64(wait));
    }

    let journal = SessionJournal::open(paths::journal_path(config_dir));
    let record = SessionRecord::new(started_at, sat, intention, channel_name, bell.name);
    let id = journal.record(record)?;
    if let Some(reflection) = args.reflection.filter(|r| !r.trim().is_empty()) {
        journal.update_reflection(&id, &reflection)?;
    }

    println!("Session recorded ({} sat).", format_clock(sat));
    Ok(())
}

/// Flip a pause flag each time a line is read from stdin.
fn spawn_pause_listener() -> Arc<AtomicBool> {
    let paused = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&paused);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if line.is_err() {
                break;
            }
            flag.fetch_xor(true, Ordering::SeqCst);
        }
    });
    paused
}
