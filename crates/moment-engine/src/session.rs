//! The audio session controller.

use moment_core::clamp_unit;
use moment_synth::NoiseGenerator;

use crate::bell::BellPlayer;
use crate::catalog::{AmbientChannelSpec, Catalog};
use crate::context::{AudioContext, ContextState};
use crate::error::{EngineError, Result};
use crate::platform::AudioPlatform;
use crate::voice::{AmbientVoice, AmbientVoiceHandle};

/// Default bell volume.
pub const DEFAULT_BELL_VOLUME: f32 = 0.8;
/// Default ambient volume.
pub const DEFAULT_AMBIENT_VOLUME: f32 = 0.5;

/// Lifecycle of the shared audio context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The platform has no audio output; every operation is a no-op.
    Unsupported,
    /// No context has been created yet.
    Uninitialized,
    /// The context exists but is not rendering.
    Suspended,
    /// The context is rendering.
    Running,
}

/// What the ambient output is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmbientState {
    /// No voice.
    Silent,
    /// A voice for this channel is playing.
    Playing(u32),
}

/// Owns the shared audio context, the one active ambient voice, and the
/// bell and ambient volumes.
///
/// The context is created lazily by [`ensure_context`](Self::ensure_context)
/// (called implicitly by anything that makes sound). If the platform has no
/// audio output, every operation succeeds without doing anything; check
/// [`is_supported`](Self::is_supported) once to tell the user.
///
/// # Example
///
/// ```rust
/// use moment_engine::{AudioSessionController, Catalog, OfflinePlatform};
///
/// let mut session = AudioSessionController::new(OfflinePlatform::new(48000.0), Catalog::default());
/// session.set_ambient_channel(2)?; // Waves
/// session.set_ambient_volume(0.3);
/// session.play_bell(0)?;
/// assert!(session.is_ambient_playing());
///
/// session.set_ambient_channel(0)?; // Silence
/// assert!(!session.is_ambient_playing());
/// # Ok::<(), moment_engine::EngineError>(())
/// ```
pub struct AudioSessionController<P: AudioPlatform> {
    platform: P,
    catalog: Catalog,
    supported: bool,
    context: Option<P::Context>,
    active: Option<AmbientVoiceHandle>,
    ambient_volume: f32,
    bell_volume: f32,
    noise: NoiseGenerator,
}

impl<P: AudioPlatform> AudioSessionController<P> {
    /// Create a controller. Probes the platform once; creates no context.
    pub fn new(platform: P, catalog: Catalog) -> Self {
        let supported = platform.is_supported();
        if !supported {
            tracing::warn!("no audio output available; sound is disabled");
        }
        Self {
            platform,
            catalog,
            supported,
            context: None,
            active: None,
            ambient_volume: DEFAULT_AMBIENT_VOLUME,
            bell_volume: DEFAULT_BELL_VOLUME,
            noise: NoiseGenerator::default(),
        }
    }

    /// Seed the noise generator, for reproducible renders.
    #[must_use]
    pub fn with_noise_seed(mut self, seed: u32) -> Self {
        self.noise = NoiseGenerator::new(seed);
        self
    }

    /// Whether audio output is available.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Context lifecycle state.
    pub fn state(&self) -> SessionState {
        if !self.supported {
            return SessionState::Unsupported;
        }
        match &self.context {
            None => SessionState::Uninitialized,
            Some(ctx) => match ctx.state() {
                ContextState::Suspended => SessionState::Suspended,
                ContextState::Running => SessionState::Running,
            },
        }
    }

    /// The catalog this controller was built with.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The context, if it has been created.
    pub fn context(&self) -> Option<&P::Context> {
        self.context.as_ref()
    }

    /// Mutable access to the context, if it has been created.
    pub fn context_mut(&mut self) -> Option<&mut P::Context> {
        self.context.as_mut()
    }

    /// Clock time of the context, or zero before it exists.
    pub fn current_time(&self) -> f64 {
        self.context.as_ref().map_or(0.0, |c| c.current_time())
    }

    /// Create the context if needed and resume it if suspended.
    ///
    /// A refused resume returns [`EngineError::AutoplayBlocked`] and leaves
    /// the context suspended; nothing is retried. On an unsupported
    /// platform this does nothing.
    pub fn ensure_context(&mut self) -> Result<()> {
        if !self.supported {
            return Ok(());
        }
        if self.context.is_none() {
            let ctx = self.platform.create_context()?;
            tracing::info!(sample_rate = ctx.sample_rate(), "audio context created");
            self.context = Some(ctx);
        }
        let Some(ctx) = self.context.as_mut() else {
            return Ok(());
        };
        if ctx.state() == ContextState::Suspended {
            ctx.resume()?;
            tracing::debug!("audio context resumed");
        }
        Ok(())
    }

    /// Like [`ensure_context`](Self::ensure_context), but a blocked resume
    /// only warns: sound is scheduled anyway and plays once the context runs.
    fn context_for_playback(&mut self) -> Result<Option<&mut P::Context>> {
        match self.ensure_context() {
            Ok(()) => {}
            Err(EngineError::AutoplayBlocked) => {
                tracing::warn!("audio context is suspended; sound will start on resume");
            }
            Err(e) => return Err(e),
        }
        Ok(self.context.as_mut())
    }

    /// Suspend the context, freezing the clock. Does nothing before the
    /// context exists.
    pub fn suspend(&mut self) {
        if let Some(ctx) = &mut self.context
            && ctx.state() == ContextState::Running
        {
            ctx.suspend();
            tracing::debug!("audio context suspended");
        }
    }

    /// Switch the ambient output to a channel.
    ///
    /// Silence stops the current voice. Any other channel replaces the
    /// current voice: the new one is prepared first, so if a file cannot be
    /// decoded the old voice keeps playing and the error is returned. An
    /// unknown id returns [`EngineError::InvalidChannelId`] and changes
    /// nothing.
    pub fn set_ambient_channel(&mut self, channel_id: u32) -> Result<()> {
        if !self.supported {
            return Ok(());
        }
        let channel = self
            .catalog
            .channel(channel_id)
            .cloned()
            .ok_or(EngineError::InvalidChannelId(channel_id))?;

        if channel.is_silence() {
            self.stop_ambient();
            return Ok(());
        }
        self.start_voice(&channel)
    }

    fn start_voice(&mut self, channel: &AmbientChannelSpec) -> Result<()> {
        let volume = self.ambient_volume;
        let Some(ctx) = self.context_for_playback()? else {
            return Ok(());
        };
        let sample_rate = ctx.sample_rate();

        let Some(prepared) = AmbientVoice::prepare(channel, sample_rate, &mut self.noise)? else {
            self.stop_ambient();
            return Ok(());
        };

        let Some(ctx) = self.context.as_mut() else {
            return Ok(());
        };
        if let Some(mut previous) = self.active.take() {
            previous.stop(ctx);
        }
        self.active = Some(prepared.start(ctx, volume));
        Ok(())
    }

    /// Click-to-toggle: stop the channel if it is the one playing, else
    /// switch to it.
    pub fn toggle_ambient_channel(&mut self, channel_id: u32) -> Result<()> {
        if self.active_channel() == Some(channel_id) {
            let silence = self.catalog.silence().map(|c| c.id);
            match silence {
                Some(id) => self.set_ambient_channel(id),
                None => {
                    self.stop_ambient();
                    Ok(())
                }
            }
        } else {
            self.set_ambient_channel(channel_id)
        }
    }

    /// Stop the ambient voice, if any.
    pub fn stop_ambient(&mut self) {
        if let Some(mut voice) = self.active.take()
            && let Some(ctx) = self.context.as_mut()
        {
            voice.stop(ctx);
        }
    }

    /// Set the ambient volume, clamped to [0, 1]. Applies to the playing
    /// voice immediately and to later voices.
    pub fn set_ambient_volume(&mut self, volume: f32) {
        self.ambient_volume = clamp_unit(volume);
        if let (Some(voice), Some(ctx)) = (&self.active, self.context.as_mut()) {
            voice.set_volume(ctx, self.ambient_volume);
        }
    }

    /// Set the bell volume, clamped to [0, 1].
    pub fn set_bell_volume(&mut self, volume: f32) {
        self.bell_volume = clamp_unit(volume);
    }

    /// Current ambient volume.
    pub fn ambient_volume(&self) -> f32 {
        self.ambient_volume
    }

    /// Current bell volume.
    pub fn bell_volume(&self) -> f32 {
        self.bell_volume
    }

    /// Strike a bell now.
    ///
    /// Returns the clock time at which it will have died away, or `None` on
    /// an unsupported platform.
    pub fn play_bell(&mut self, bell_id: u32) -> Result<Option<f64>> {
        if !self.supported {
            return Ok(None);
        }
        let bell = self
            .catalog
            .bell(bell_id)
            .cloned()
            .ok_or(EngineError::InvalidBellId(bell_id))?;
        let volume = self.bell_volume;
        let Some(ctx) = self.context_for_playback()? else {
            return Ok(None);
        };
        BellPlayer::play(ctx, &bell, volume).map(Some)
    }

    /// What the ambient output is doing.
    pub fn ambient_state(&self) -> AmbientState {
        match &self.active {
            Some(voice) => AmbientState::Playing(voice.channel_id()),
            None => AmbientState::Silent,
        }
    }

    /// Whether an ambient voice is playing.
    pub fn is_ambient_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Channel of the playing voice.
    pub fn active_channel(&self) -> Option<u32> {
        self.active.as_ref().map(AmbientVoiceHandle::channel_id)
    }

    /// The playing voice.
    pub fn active_voice(&self) -> Option<&AmbientVoiceHandle> {
        self.active.as_ref()
    }

    /// Display name of a channel.
    pub fn channel_name(&self, channel_id: u32) -> Option<&str> {
        self.catalog.channel(channel_id).map(|c| c.name.as_str())
    }

    /// Display name of a bell.
    pub fn bell_name(&self, bell_id: u32) -> Option<&str> {
        self.catalog.bell(bell_id).map(|b| b.name.as_str())
    }
}

impl<P: AudioPlatform> std::fmt::Debug for AudioSessionController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSessionController")
            .field("state", &self.state())
            .field("ambient", &self.ambient_state())
            .field("ambient_volume", &self.ambient_volume)
            .field("bell_volume", &self.bell_volume)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OfflinePlatform;

    fn session() -> AudioSessionController<OfflinePlatform> {
        AudioSessionController::new(OfflinePlatform::new(48000.0), Catalog::default())
    }

    #[test]
    fn test_context_is_lazy() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::Uninitialized);
        s.set_ambient_volume(0.3);
        assert_eq!(s.state(), SessionState::Uninitialized);
        s.ensure_context().unwrap();
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_suspend_then_ensure_resumes() {
        let mut s = session();
        s.ensure_context().unwrap();
        s.suspend();
        assert_eq!(s.state(), SessionState::Suspended);
        s.ensure_context().unwrap();
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_toggle_same_channel_goes_silent() {
        let mut s = session();
        s.toggle_ambient_channel(1).unwrap();
        assert_eq!(s.ambient_state(), AmbientState::Playing(1));
        s.toggle_ambient_channel(1).unwrap();
        assert_eq!(s.ambient_state(), AmbientState::Silent);
        s.toggle_ambient_channel(3).unwrap();
        s.toggle_ambient_channel(2).unwrap();
        assert_eq!(s.active_channel(), Some(2));
    }

    #[test]
    fn test_volumes_are_clamped() {
        let mut s = session();
        s.set_ambient_volume(1.7);
        s.set_bell_volume(-0.5);
        assert_eq!(s.ambient_volume(), 1.0);
        assert_eq!(s.bell_volume(), 0.0);
    }

    #[test]
    fn test_name_lookups() {
        let s = session();
        assert_eq!(s.channel_name(2), Some("Waves"));
        assert_eq!(s.bell_name(3), Some("Deep Gong"));
        assert_eq!(s.bell_name(42), None);
    }
}
