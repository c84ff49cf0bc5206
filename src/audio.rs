//! Audio cues
//!
//! The simulation only names a cue; a sink decides what it sounds like. On
//! the web the sink synthesizes a short oscillator tone per cue, no external
//! files needed.

use serde::{Deserialize, Serialize};

use crate::error::GameResult;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Ball grabbed
    Stretch,
    /// Ball launched
    Snap,
    /// Vertex popped
    Pop,
    /// Spinner, jelly or bouncy hit
    Bounce,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Stretch => "stretch",
            Cue::Snap => "snap",
            Cue::Pop => "pop",
            Cue::Bounce => "bounce",
        }
    }

    /// Tone shape for this cue
    pub fn tone(&self) -> Tone {
        match self {
            Cue::Stretch => Tone::new(200.0, 0.1, Waveform::Sine),
            Cue::Snap => Tone::new(400.0, 0.15, Waveform::Square),
            Cue::Pop => Tone::new(800.0, 0.2, Waveform::Sine),
            Cue::Bounce => Tone::new(300.0, 0.1, Waveform::Triangle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// A single enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
}

impl Tone {
    const fn new(frequency: f32, duration: f64, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
        }
    }
}

/// Peak gain of every cue before volume scaling
pub const CUE_GAIN: f32 = 0.3;

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: Cue) -> GameResult<()>;
}

/// Silent sink (native builds, tests, muted sessions)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) -> GameResult<()> {
        Ok(())
    }
}

/// Keeps every cue it is asked to play
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<Cue>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) -> GameResult<()> {
        self.played.push(cue);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, CUE_GAIN, Cue, Tone, Waveform};
    use crate::error::{GameError, GameResult};
    use crate::settings::Settings;

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up changed volume settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
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

        fn play_tone(ctx: &AudioContext, tone: Tone, vol: f32) -> GameResult<()> {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Triangle => OscillatorType::Triangle,
            };
            let (osc, gain) = Self::create_osc(ctx, tone.frequency, osc_type)
                .ok_or_else(|| GameError::Audio("oscillator setup failed".into()))?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(CUE_GAIN * vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
                .ok();

            osc.start_with_when(t)
                .map_err(|e| GameError::Audio(format!("{e:?}")))?;
            osc.stop_with_when(t + tone.duration).ok();
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: Cue) -> GameResult<()> {
            if self.volume <= 0.0 {
                return Ok(());
            }
            let Some(ctx) = &self.ctx else {
                return Ok(());
            };

            // Browsers start suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            Self::play_tone(ctx, cue.tone(), self.volume)
        }
    }
}
