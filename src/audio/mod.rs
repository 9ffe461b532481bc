//! Sound cache and channel bookkeeping on top of a playback backend.

use crate::error::AudioError;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundMode {
    pub looping: bool,
    /// Decode while playing instead of loading the whole file up front.
    pub stream: bool,
}

/// Playback device. Handles are opaque to the engine.
pub trait AudioBackend {
    type Sound;
    type Channel;

    fn create_sound(&mut self, name: &str, mode: SoundMode) -> Result<Self::Sound, String>;
    fn release_sound(&mut self, sound: Self::Sound);
    fn play(&mut self, sound: &Self::Sound, volume: f32) -> Result<Self::Channel, String>;
    fn stop(&mut self, channel: &Self::Channel);
    fn is_playing(&self, channel: &Self::Channel) -> bool;
    /// Advances the device by one frame.
    fn update(&mut self);
}

pub struct AudioEngine<B: AudioBackend> {
    backend: B,
    sounds: HashMap<String, B::Sound>,
    channels: BTreeMap<ChannelId, B::Channel>,
    next_channel: u32,
}

impl<B: AudioBackend> AudioEngine<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sounds: HashMap::new(),
            channels: BTreeMap::new(),
            next_channel: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Creates and caches `name`. Already cached sounds are left as they are.
    pub fn load(&mut self, name: &str, mode: SoundMode) -> Result<(), AudioError> {
        if self.sounds.contains_key(name) {
            return Ok(());
        }
        let sound = self.backend.create_sound(name, mode).map_err(|message| {
            warn!(sound = name, %message, "failed to load sound");
            AudioError::Backend {
                name: name.to_string(),
                message,
            }
        })?;
        debug!(sound = name, ?mode, "loaded sound");
        self.sounds.insert(name.to_string(), sound);
        Ok(())
    }

    pub fn unload(&mut self, name: &str) {
        if let Some(sound) = self.sounds.remove(name) {
            self.backend.release_sound(sound);
            debug!(sound = name, "unloaded sound");
        }
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Plays a one-shot sound, loading it first if needed.
    pub fn play_sound(&mut self, name: &str, volume: f32) -> Result<ChannelId, AudioError> {
        self.play_with_mode(name, volume, SoundMode::default())
    }

    /// Plays a looping, streamed sound, loading it first if needed.
    pub fn play_music(&mut self, name: &str, volume: f32) -> Result<ChannelId, AudioError> {
        self.play_with_mode(
            name,
            volume,
            SoundMode {
                looping: true,
                stream: true,
            },
        )
    }

    fn play_with_mode(
        &mut self,
        name: &str,
        volume: f32,
        mode: SoundMode,
    ) -> Result<ChannelId, AudioError> {
        self.load(name, mode)?;
        let Some(sound) = self.sounds.get(name) else {
            return Err(AudioError::Backend {
                name: name.to_string(),
                message: "sound missing after load".to_string(),
            });
        };
        let channel = self
            .backend
            .play(sound, volume)
            .map_err(|message| AudioError::Backend {
                name: name.to_string(),
                message,
            })?;

        let id = ChannelId(self.next_channel);
        self.next_channel += 1;
        self.channels.insert(id, channel);
        debug!(sound = name, channel = id.0, volume, "playing");
        Ok(id)
    }

    pub fn stop_channel(&mut self, id: ChannelId) {
        if let Some(channel) = self.channels.remove(&id) {
            self.backend.stop(&channel);
        }
    }

    pub fn stop_all_channels(&mut self) {
        for (_, channel) in std::mem::take(&mut self.channels) {
            self.backend.stop(&channel);
        }
    }

    #[must_use]
    pub fn is_playing(&self, id: ChannelId) -> bool {
        self.channels
            .get(&id)
            .is_some_and(|channel| self.backend.is_playing(channel))
    }

    #[must_use]
    pub fn active_channels(&self) -> usize {
        self.channels.len()
    }

    /// Forgets channels that finished playing, then ticks the backend.
    pub fn update(&mut self) {
        let backend = &self.backend;
        self.channels
            .retain(|_, channel| backend.is_playing(channel));
        self.backend.update();
    }
}

/// Backend that produces no output. One-shot sounds finish after a fixed number of
/// updates; looping sounds play until stopped.
#[derive(Debug)]
pub struct SilentBackend {
    one_shot_ticks: u32,
    sounds_created: usize,
    voices: Vec<Voice>,
}

#[derive(Debug)]
struct Voice {
    remaining: Option<u32>,
    stopped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilentSound {
    pub name: String,
    pub mode: SoundMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilentChannel(usize);

impl SilentBackend {
    #[must_use]
    pub fn new(one_shot_ticks: u32) -> Self {
        Self {
            one_shot_ticks,
            sounds_created: 0,
            voices: Vec::new(),
        }
    }

    #[must_use]
    pub fn sounds_created(&self) -> usize {
        self.sounds_created
    }
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new(60)
    }
}

impl AudioBackend for SilentBackend {
    type Sound = SilentSound;
    type Channel = SilentChannel;

    fn create_sound(&mut self, name: &str, mode: SoundMode) -> Result<SilentSound, String> {
        if name.is_empty() {
            return Err("empty sound name".to_string());
        }
        self.sounds_created += 1;
        Ok(SilentSound {
            name: name.to_string(),
            mode,
        })
    }

    fn release_sound(&mut self, _sound: SilentSound) {}

    fn play(&mut self, sound: &SilentSound, _volume: f32) -> Result<SilentChannel, String> {
        let remaining = (!sound.mode.looping).then_some(self.one_shot_ticks);
        self.voices.push(Voice {
            remaining,
            stopped: false,
        });
        Ok(SilentChannel(self.voices.len() - 1))
    }

    fn stop(&mut self, channel: &SilentChannel) {
        if let Some(voice) = self.voices.get_mut(channel.0) {
            voice.stopped = true;
        }
    }

    fn is_playing(&self, channel: &SilentChannel) -> bool {
        self.voices
            .get(channel.0)
            .is_some_and(|v| !v.stopped && v.remaining != Some(0))
    }

    fn update(&mut self) {
        for voice in &mut self.voices {
            if let Some(remaining) = voice.remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_loads_lazily_and_caches() {
        let mut engine = AudioEngine::new(SilentBackend::new(2));
        let first = engine.play_sound("hit.ogg", 1.0).unwrap();
        let second = engine.play_sound("hit.ogg", 0.5).unwrap();
        assert_ne!(first, second);
        assert!(engine.is_loaded("hit.ogg"));
        assert_eq!(engine.backend().sounds_created(), 1);
        assert_eq!(engine.active_channels(), 2);
    }

    #[test]
    fn finished_channels_are_reaped() {
        let mut engine = AudioEngine::new(SilentBackend::new(2));
        let shot = engine.play_sound("hit.ogg", 1.0).unwrap();
        let music = engine.play_music("theme.ogg", 0.5).unwrap();

        engine.update();
        assert!(engine.is_playing(shot));
        engine.update();
        engine.update();
        assert!(!engine.is_playing(shot));
        assert!(engine.is_playing(music));
        assert_eq!(engine.active_channels(), 1);
    }

    #[test]
    fn stop_channels() {
        let mut engine = AudioEngine::new(SilentBackend::default());
        let a = engine.play_music("a.ogg", 1.0).unwrap();
        let b = engine.play_music("b.ogg", 1.0).unwrap();

        engine.stop_channel(a);
        assert!(!engine.is_playing(a));
        assert!(engine.is_playing(b));

        engine.stop_all_channels();
        assert!(!engine.is_playing(b));
        assert_eq!(engine.active_channels(), 0);
    }

    #[test]
    fn unload_forgets_sound() {
        let mut engine = AudioEngine::new(SilentBackend::default());
        engine.load("a.ogg", SoundMode::default()).unwrap();
        engine.unload("a.ogg");
        assert!(!engine.is_loaded("a.ogg"));
        engine.unload("a.ogg");
    }

    #[test]
    fn backend_failure_is_reported() {
        let mut engine = AudioEngine::new(SilentBackend::default());
        let err = engine.play_sound("", 1.0).unwrap_err();
        assert!(matches!(err, AudioError::Backend { .. }));
        assert_eq!(engine.active_channels(), 0);
    }
}
