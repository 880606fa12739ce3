//! Audio session engine for the moment meditation timer.
//!
//! This crate provides:
//!
//! - **Render graph**: [`graph::RenderGraph`], a small Web-Audio-style node
//!   graph with sample-accurate start/stop and parameter automation
//! - **Contexts**: [`OfflineContext`] for deterministic rendering and
//!   [`RealtimeContext`] for playback through cpal
//! - **Sound**: [`ToneSynthesizer`] and [`BellPlayer`] for bells,
//!   [`AmbientVoice`] for rain, waves, drones, and looping files
//! - **Control**: [`AudioSessionController`], which owns the context, the
//!   single active ambient voice, and the volumes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moment_engine::{AudioSessionController, Catalog, CpalPlatform};
//!
//! let mut session = AudioSessionController::new(CpalPlatform::default(), Catalog::default());
//! if !session.is_supported() {
//!     eprintln!("no audio output; running silently");
//! }
//! session.set_ambient_channel(1)?; // Rain
//! session.play_bell(0)?;           // Singing Bowl
//! # Ok::<(), moment_engine::EngineError>(())
//! ```

pub mod backend;
pub mod bell;
pub mod catalog;
pub mod context;
pub mod cpal_backend;
mod error;
pub mod graph;
pub mod media;
pub mod platform;
pub mod session;
pub mod tone;
pub mod voice;

pub use bell::BellPlayer;
pub use catalog::{AmbientChannelSpec, BellSpec, Catalog, ChannelKind};
pub use context::{AudioContext, ContextState, OfflineContext, RealtimeContext};
pub use error::{EngineError, Result};
pub use media::{AudioClip, load_clip, write_wav};
pub use platform::{AudioPlatform, CpalPlatform, OfflinePlatform};
pub use session::{AmbientState, AudioSessionController, SessionState};
pub use tone::{ScheduledPartial, ToneSynthesizer};
pub use voice::{AmbientVoice, AmbientVoiceHandle, PreparedVoice};
