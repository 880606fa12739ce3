//! Session history: list, export, clear.

use clap::{Args, Subcommand};
use moment_config::{DEFAULT_LIST_LIMIT, SessionJournal, default_export_name, paths};
use std::path::{Path, PathBuf};

use crate::timer::format_clock;

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    action: Option<HistoryAction>,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show recent sessions, newest first
    List {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },
    /// Write every session to a JSON file
    Export {
        /// Destination (default: moment-sessions-YYYY-MM-DD.json)
        path: Option<PathBuf>,
    },
    /// Delete every session
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(args: HistoryArgs, config_dir: &Path) -> anyhow::Result<()> {
    let journal = SessionJournal::open(paths::journal_path(config_dir));
    let action = args.action.unwrap_or(HistoryAction::List {
        limit: DEFAULT_LIST_LIMIT,
    });

    match action {
        HistoryAction::List { limit } => {
            let sessions = journal.list(limit);
            if sessions.is_empty() {
                println!("No sessions yet.");
                return Ok(());
            }
            for s in &sessions {
                let local = s.date.with_timezone(&chrono::Local);
                println!(
                    "{}  {:>6}  {} / {}",
                    local.format("%Y-%m-%d %H:%M"),
                    format_clock(s.duration_seconds),
                    s.channel,
                    s.bell_sound
                );
                if !s.intention.is_empty() {
                    println!("    Intention:  {}", s.intention);
                }
                if !s.reflection.is_empty() {
                    println!("    Reflection: {}", s.reflection);
                }
            }
            let total: u32 = journal.sessions().iter().map(|s| s.duration_seconds).sum();
            println!("\n{} session(s) shown, {} minutes in total.", sessions.len(), total / 60);
        }
        HistoryAction::Export { path } => {
            let dest = path.unwrap_or_else(|| PathBuf::from(default_export_name(chrono::Utc::now())));
            let count = journal.export(&dest)?;
            println!("Exported {count} session(s) to {}", dest.display());
        }
        HistoryAction::Clear { yes } => {
            if !yes {
                anyhow::bail!("This deletes every recorded session. Re-run with --yes to confirm.");
            }
            journal.clear()?;
            println!("History cleared.");
        }
    }
    Ok(())
}
