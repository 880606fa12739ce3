//! Show and change saved settings.

use super::common;
use clap::{Args, Subcommand};
use moment_config::{Settings, paths};
use std::path::Path;

use crate::timer::format_clock;

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    action: Option<SettingsAction>,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Change one setting: bell, channel, bell_volume, ambient_volume, duration (minutes)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Restore the defaults
    Reset,
}

pub fn run(args: SettingsArgs, config_dir: &Path) -> anyhow::Result<()> {
    let path = paths::settings_path(config_dir);
    let mut settings = Settings::load(&path)?;

    match args.action.unwrap_or(SettingsAction::Show) {
        SettingsAction::Show => {
            let catalog = common::catalog(config_dir)?;
            let bell = catalog.bell(settings.bell_id).map_or("?", |b| b.name.as_str());
            let channel = catalog
                .channel(settings.channel_id)
                .map_or("?", |c| c.name.as_str());
            println!("bell            {} ({bell})", settings.bell_id);
            println!("channel         {} ({channel})", settings.channel_id);
            println!("bell_volume     {:.2}", settings.bell_volume);
            println!("ambient_volume  {:.2}", settings.ambient_volume);
            println!("duration        {}", format_clock(settings.duration_seconds));
            println!("\n{}", path.display());
        }
        SettingsAction::Set { key, value } => {
            settings.set(&key, &value)?;
            let catalog = common::catalog(config_dir)?;
            if catalog.bell(settings.bell_id).is_none() {
                anyhow::bail!("Unknown bell {}. Run 'moment catalog' to list bells.", settings.bell_id);
            }
            if catalog.channel(settings.channel_id).is_none() {
                anyhow::bail!(
                    "Unknown channel {}. Run 'moment catalog' to list channels.",
                    settings.channel_id
                );
            }
            settings.save(&path)?;
            println!("{key} updated.");
        }
        SettingsAction::Reset => {
            Settings::default().save(&path)?;
            println!("Settings reset to defaults.");
        }
    }
    Ok(())
}
