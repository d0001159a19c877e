//! Audio cues
//!
//! The session turns game events into [`AudioCue`]s and hands them to an
//! [`AudioSink`]. In the browser the sink synthesizes every cue with Web Audio
//! oscillators, so no sound files are needed. Playback failures are ignored.

use crate::sim::FallerKind;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Single aimed shot
    Fire,
    /// Bullet destroyed an enemy
    EnemyHit,
    /// A pickup appeared
    PickupSpawn(FallerKind),
    /// A pickup was shot
    PickupHit(FallerKind),
    GameOver,
    /// Background loop on
    MusicStart,
    /// Background loop off
    MusicStop,
    /// UI button pressed
    ButtonClick,
}

/// Anything that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Sink that records cues and logs them at trace level
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    pub played: Vec<AudioCue>,
    pub music_on: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `cue` was played
    pub fn count(&self, cue: AudioCue) -> usize {
        self.played.iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        log::trace!("audio cue {cue:?}");
        match cue {
            AudioCue::MusicStart => self.music_on = true,
            AudioCue::MusicStop => self.music_on = false,
            _ => {}
        }
        self.played.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;
    use crate::sim::FallerKind;

    /// Web Audio synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        sfx_gain: f32,
        music_gain: f32,
        /// Oscillators of the running background loop
        music: Vec<OscillatorNode>,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_gain: settings.sfx_gain(),
                music_gain: settings.music_gain(),
                music: Vec::new(),
            }
        }

        /// Pick up changed volume settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_gain = settings.sfx_gain();
            self.music_gain = settings.music_gain();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One enveloped note starting `delay` seconds from now
        fn note(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            vol: f32,
            delay: f64,
            length: f64,
        ) -> Option<OscillatorNode> {
            let (osc, gain) = Self::create_osc(ctx, freq, osc_type)?;
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
            Some(osc)
        }

        /// Short arpeggio, one note every `step` seconds
        fn arpeggio(ctx: &AudioContext, freqs: &[f32], osc_type: OscillatorType, vol: f32, step: f64) {
            for (i, freq) in freqs.iter().enumerate() {
                Self::note(ctx, *freq, osc_type, vol, i as f64 * step, step * 1.5);
            }
        }

        /// Shot - short falling zap
        fn play_fire(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 900.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.06)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Enemy destroyed - low pop with a crack
        fn play_enemy_hit(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = Self::create_osc(ctx, 160.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(50.0, t + 0.15)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }
            Self::note(ctx, 1400.0, OscillatorType::Square, vol * 0.1, 0.0, 0.04);
        }

        fn play_pickup_spawn(ctx: &AudioContext, kind: FallerKind, vol: f32) {
            let freqs: &[f32] = match kind {
                FallerKind::GoldenBox => &[800.0, 1000.0],
                FallerKind::BlueBox => &[500.0, 700.0],
                _ => &[300.0, 250.0],
            };
            Self::arpeggio(ctx, freqs, OscillatorType::Sine, vol * 0.2, 0.06);
        }

        fn play_pickup_hit(ctx: &AudioContext, kind: FallerKind, vol: f32) {
            match kind {
                FallerKind::GoldenBox => {
                    Self::arpeggio(ctx, &[600.0, 800.0, 1000.0], OscillatorType::Sine, vol * 0.25, 0.08)
                }
                FallerKind::BlueBox => Self::arpeggio(
                    ctx,
                    &[400.0, 600.0, 900.0, 1200.0],
                    OscillatorType::Triangle,
                    vol * 0.3,
                    0.04,
                ),
                // Power-down and health-down: ominous descend
                _ => Self::arpeggio(ctx, &[400.0, 300.0, 200.0], OscillatorType::Sawtooth, vol * 0.2, 0.08),
            }
        }

        fn play_game_over(ctx: &AudioContext, vol: f32) {
            Self::arpeggio(ctx, &[400.0, 350.0, 300.0, 200.0], OscillatorType::Sine, vol * 0.3, 0.2);
        }

        fn play_click(ctx: &AudioContext, vol: f32) {
            Self::note(ctx, 700.0, OscillatorType::Triangle, vol * 0.2, 0.0, 0.04);
        }

        /// Quiet two-oscillator drone that runs until stopped
        fn start_music(&mut self) {
            self.stop_music();
            let Some(ctx) = &self.ctx else { return };
            if self.music_gain <= 0.0 {
                return;
            }
            for (freq, level) in [(55.0, 0.08), (82.5, 0.05)] {
                if let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Triangle) {
                    gain.gain().set_value(self.music_gain * level);
                    if osc.start().is_ok() {
                        self.music.push(osc);
                    }
                }
            }
        }

        fn stop_music(&mut self) {
            for osc in self.music.drain(..) {
                osc.stop().ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: AudioCue) {
            match cue {
                AudioCue::MusicStart => return self.start_music(),
                AudioCue::MusicStop => return self.stop_music(),
                _ => {}
            }

            let vol = self.sfx_gain;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                AudioCue::Fire => Self::play_fire(ctx, vol),
                AudioCue::EnemyHit => Self::play_enemy_hit(ctx, vol),
                AudioCue::PickupSpawn(kind) => Self::play_pickup_spawn(ctx, kind, vol),
                AudioCue::PickupHit(kind) => Self::play_pickup_hit(ctx, kind, vol),
                AudioCue::GameOver => Self::play_game_over(ctx, vol),
                AudioCue::ButtonClick => Self::play_click(ctx, vol),
                AudioCue::MusicStart | AudioCue::MusicStop => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_audio_tracks_music() {
        let mut audio = LogAudio::new();
        audio.play(AudioCue::MusicStart);
        audio.play(AudioCue::Fire);
        audio.play(AudioCue::Fire);
        assert!(audio.music_on);
        assert_eq!(audio.count(AudioCue::Fire), 2);

        audio.play(AudioCue::MusicStop);
        assert!(!audio.music_on);
    }
}
