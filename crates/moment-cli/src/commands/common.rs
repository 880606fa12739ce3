//! Shared CLI helpers used across multiple commands.

use clap::Args;
use moment_config::{Settings, load_catalog, paths};
use moment_engine::backend::BackendStreamConfig;
use moment_engine::{AudioSessionController, Catalog, CpalPlatform, EngineError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Resolve the configuration directory: the `--config-dir` flag, else the
/// platform default.
pub fn config_dir(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(paths::user_config_dir, Path::to_path_buf)
}

/// Load the catalog for a configuration directory.
pub fn catalog(dir: &Path) -> anyhow::Result<Catalog> {
    Ok(load_catalog(paths::catalog_path(dir))?)
}

/// Load settings for a configuration directory.
pub fn settings(dir: &Path) -> anyhow::Result<Settings> {
    Ok(Settings::load(paths::settings_path(dir))?)
}

/// Parse a volume in [0, 1] for clap's `value_parser`.
pub fn parse_volume(s: &str) -> Result<f32, String> {
    let v: f32 = s
        .parse()
        .map_err(|_| format!("invalid volume: '{s}' (expected a number from 0 to 1)"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("volume {v} is out of range (expected 0 to 1)"))
    }
}

/// Output device selection shared by the playing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output device name (default device if omitted)
    #[arg(short, long, value_name = "NAME")]
    pub device: Option<String>,
}

/// Build a real-time session with the saved volumes applied.
pub fn open_session(
    output: &OutputArgs,
    catalog: Catalog,
    settings: &Settings,
) -> AudioSessionController<CpalPlatform> {
    let platform = CpalPlatform::new(BackendStreamConfig {
        device_name: output.device.clone(),
        ..BackendStreamConfig::default()
    });
    let mut session = AudioSessionController::new(platform, catalog);
    session.set_bell_volume(settings.bell_volume);
    session.set_ambient_volume(settings.ambient_volume);
    if !session.is_supported() {
        eprintln!("No audio output available; continuing without sound.");
    }
    session
}

/// Treat audio failures as non-fatal: a sit goes on without sound.
pub fn soften<T>(result: Result<T, EngineError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(EngineError::AutoplayBlocked) => {
            tracing::warn!("audio output is suspended");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "audio error");
            eprintln!("Audio error: {e}");
            None
        }
    }
}

/// Install a Ctrl+C handler. The returned flag turns false when it fires.
pub fn interrupt_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}

/// Sleep for `duration` unless the flag drops first. Returns whether the
/// full time passed.
pub fn sleep_while(running: &AtomicBool, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep((deadline - now).min(Duration::from_millis(50)));
    }
    false
}
