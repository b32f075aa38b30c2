//! Envelope targets for the desert soundscape.
//!
//! Nothing in here makes sound. Each frame the web layer asks
//! [`AmbienceEngine::targets`] for gains, filter cut-offs and pans and glides
//! the audio graph toward them. Time comes from the same session clock the
//! camera uses, so wind swells and breath sway stay locked together.

use crate::breath::BreathPattern;
use crate::constants::{
    BROWN_LEAK, BROWN_MAKEUP_GAIN, BROWN_STEP, GUST_DURATION_MAX_SEC, GUST_DURATION_MIN_SEC,
    GUST_INTERVAL_MAX_SEC, GUST_INTERVAL_MIN_SEC, REVERB_DECAY_POWER, REVERB_SECONDS,
    RUMBLE_BASE_GAIN, RUMBLE_BREATH_GAIN, SAND_GAIN, SAND_JITTER, SAND_THRESHOLD,
    WHISTLE_BASE_FREQ_HZ, WHISTLE_GAIN, WIND_BASE_FREQ_HZ, WIND_BASE_GAIN, WIND_GUST_FREQ_HZ,
    WIND_GUST_GAIN,
};
use crate::error::{self, ConfigError};
use rand::prelude::*;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GustParams {
    pub interval_min: f64,
    pub interval_max: f64,
    pub duration_min: f64,
    pub duration_max: f64,
}

impl Default for GustParams {
    fn default() -> Self {
        Self {
            interval_min: GUST_INTERVAL_MIN_SEC,
            interval_max: GUST_INTERVAL_MAX_SEC,
            duration_min: GUST_DURATION_MIN_SEC,
            duration_max: GUST_DURATION_MAX_SEC,
        }
    }
}

impl GustParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        error::positive("gust.interval_min", self.interval_min)?;
        error::positive("gust.interval_max", self.interval_max)?;
        error::ordered("gust.interval", self.interval_min, self.interval_max)?;
        error::positive("gust.duration_min", self.duration_min)?;
        error::positive("gust.duration_max", self.duration_max)?;
        error::ordered("gust.duration", self.duration_min, self.duration_max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GustPhase {
    Calm { next_start: f64 },
    Gusting { start: f64, duration: f64 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GustSample {
    pub is_gusting: bool,
    /// sin² envelope over the gust, 0 when calm.
    pub strength: f64,
}

/// Calm / gusting state machine with randomised timing. The calm interval
/// is counted from the end of the previous gust.
#[derive(Clone, Debug)]
pub struct GustMachine {
    params: GustParams,
    rng: StdRng,
    phase: GustPhase,
}

impl GustMachine {
    pub fn new(params: GustParams, seed: u64, start_time: f64) -> Result<Self, ConfigError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let first = start_time + uniform(&mut rng, params.interval_min, params.interval_max);
        Ok(Self {
            params,
            rng,
            phase: GustPhase::Calm { next_start: first },
        })
    }

    pub fn phase(&self) -> GustPhase {
        self.phase
    }

    /// Advance to time `t` and sample the envelope. A large jump in `t`
    /// (backgrounded tab) walks through every gust it skipped so the
    /// schedule stays anchored to session time.
    pub fn update(&mut self, t: f64) -> GustSample {
        loop {
            match self.phase {
                GustPhase::Calm { next_start } if t >= next_start => {
                    let duration =
                        uniform(&mut self.rng, self.params.duration_min, self.params.duration_max);
                    log::debug!("[gust] start t={:.1}s duration={:.1}s", next_start, duration);
                    self.phase = GustPhase::Gusting {
                        start: next_start,
                        duration,
                    };
                }
                GustPhase::Gusting { start, duration } if t >= start + duration => {
                    let end = start + duration;
                    let interval =
                        uniform(&mut self.rng, self.params.interval_min, self.params.interval_max);
                    log::debug!("[gust] end t={:.1}s next in {:.1}s", end, interval);
                    self.phase = GustPhase::Calm {
                        next_start: end + interval,
                    };
                }
                _ => break,
            }
        }
        match self.phase {
            GustPhase::Calm { .. } => GustSample::default(),
            GustPhase::Gusting { start, duration } => {
                let u = ((t - start) / duration).clamp(0.0, 1.0);
                let s = (PI * u).sin();
                GustSample {
                    is_gusting: true,
                    strength: s * s,
                }
            }
        }
    }
}

#[inline]
fn uniform(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbienceParams {
    pub gust: GustParams,
    pub rumble_base: f64,
    pub rumble_breath: f64,
    pub wind_base_gain: f64,
    pub wind_gust_gain: f64,
    pub wind_base_freq: f64,
    pub wind_gust_freq: f64,
    pub whistle_base_freq: f64,
    pub whistle_gain: f64,
    pub sand_gain: f64,
    pub sand_threshold: f64,
    pub sand_jitter: f64,
}

impl Default for AmbienceParams {
    fn default() -> Self {
        Self {
            gust: GustParams::default(),
            rumble_base: RUMBLE_BASE_GAIN,
            rumble_breath: RUMBLE_BREATH_GAIN,
            wind_base_gain: WIND_BASE_GAIN,
            wind_gust_gain: WIND_GUST_GAIN,
            wind_base_freq: WIND_BASE_FREQ_HZ,
            wind_gust_freq: WIND_GUST_FREQ_HZ,
            whistle_base_freq: WHISTLE_BASE_FREQ_HZ,
            whistle_gain: WHISTLE_GAIN,
            sand_gain: SAND_GAIN,
            sand_threshold: SAND_THRESHOLD,
            sand_jitter: SAND_JITTER,
        }
    }
}

impl AmbienceParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gust.validate()?;
        for (name, v) in [
            ("ambience.rumble_base", self.rumble_base),
            ("ambience.rumble_breath", self.rumble_breath),
            ("ambience.wind_base_gain", self.wind_base_gain),
            ("ambience.wind_gust_gain", self.wind_gust_gain),
            ("ambience.whistle_gain", self.whistle_gain),
            ("ambience.sand_gain", self.sand_gain),
            ("ambience.sand_jitter", self.sand_jitter),
        ] {
            error::in_range(name, v, 0.0, 1.0)?;
        }
        error::positive("ambience.wind_base_freq", self.wind_base_freq)?;
        error::finite("ambience.wind_gust_freq", self.wind_gust_freq)?;
        error::positive("ambience.whistle_base_freq", self.whistle_base_freq)?;
        error::finite("ambience.sand_threshold", self.sand_threshold)
    }
}

/// Per-frame targets for the four layers. Gains are linear, pans in [-1, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AmbienceTargets {
    pub breath: f64,
    pub gust: GustSample,
    pub rumble_gain: f64,
    pub wind_gain: f64,
    pub wind_cutoff_hz: f64,
    pub wind_pan: f64,
    pub whistle_gain: f64,
    pub whistle_center_hz: f64,
    pub whistle_pan: f64,
    pub sand_gain: f64,
    pub sand_pan: f64,
}

#[derive(Clone, Debug)]
pub struct AmbienceEngine {
    pub params: AmbienceParams,
    pub breath: BreathPattern,
    gust: GustMachine,
    jitter_rng: StdRng,
}

impl AmbienceEngine {
    pub fn new(
        params: AmbienceParams,
        breath: BreathPattern,
        seed: u64,
        start_time: f64,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        breath.validate()?;
        // Separate streams so sand jitter never reshuffles the gust schedule.
        let gust = GustMachine::new(params.gust, seed, start_time)?;
        let jitter_rng = StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
        Ok(Self {
            params,
            breath,
            gust,
            jitter_rng,
        })
    }

    pub fn gust_phase(&self) -> GustPhase {
        self.gust.phase()
    }

    pub fn targets(&mut self, t: f64) -> AmbienceTargets {
        let p = &self.params;
        let breath = self.breath.phase(t);
        let gust = self.gust.update(t);
        let g = gust.strength;

        // Deep rumble rises and falls with the breath
        let rumble_gain = p.rumble_base + breath * p.rumble_breath;

        // Main wind: slow low-pass sweep, lifted by gusts
        let wind_cutoff_hz = p.wind_base_freq
            + (t * 0.1).sin() * 100.0
            + (t * 0.05).sin() * 50.0
            + g * p.wind_gust_freq;
        let wind_gain = p.wind_base_gain + ((t * 0.15).sin() * 0.1).max(0.0) + g * p.wind_gust_gain;
        let wind_pan = (t * 0.05).sin() * 0.4;

        // High whistle: band-pass sweep with sharp bursts, whipping around
        let whistle_center_hz =
            p.whistle_base_freq + (t * 0.2).sin() * 400.0 + (t * 1.5).sin() * 100.0;
        let whistle_gain =
            ((t * 0.3).sin() * (t * 1.1).sin()).max(0.0) * p.whistle_gain * (1.0 + g);
        let whistle_pan = (t * 0.4).sin() * 0.8;

        // Granular sand: only where three waves pile up
        let wave = (t * 0.7).sin() + (t * 0.35).sin() + (t * 1.1).cos();
        let swish = ((wave - p.sand_threshold) * p.sand_gain).max(0.0);
        let jitter = self.jitter_rng.gen::<f64>() * p.sand_jitter;
        let sand_gain = swish + jitter;
        let sand_pan = (t * 0.15).cos() * 0.9;

        AmbienceTargets {
            breath,
            gust,
            rumble_gain,
            wind_gain,
            wind_cutoff_hz,
            wind_pan,
            whistle_gain,
            whistle_center_hz,
            whistle_pan,
            sand_gain,
            sand_pan,
        }
    }
}

/// How a stop silences the audio graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopAction {
    /// The context is running: ramp the gains down, then suspend.
    FadeOut,
    /// The context is not running yet (a resume may still be pending): pin
    /// the gains to zero now, then suspend, so a late resume comes back muted.
    Mute,
}

/// Play/stop bookkeeping for the audio graph. Each start opens a new
/// generation; a delayed suspend armed by a stop only fires while no later
/// start or close has happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackGate {
    playing: bool,
    generation: u32,
}

impl PlaybackGate {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn start(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.playing = true;
        self.generation
    }

    /// `None` when already stopped. Otherwise the silencing action and the
    /// generation the follow-up suspend belongs to. A stop always arms a
    /// suspend, whatever the context state.
    pub fn stop(&mut self, context_running: bool) -> Option<(StopAction, u32)> {
        if !self.playing {
            return None;
        }
        self.playing = false;
        let action = if context_running {
            StopAction::FadeOut
        } else {
            StopAction::Mute
        };
        Some((action, self.generation))
    }

    pub fn close(&mut self) {
        self.playing = false;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn suspend_allowed(&self, stopped_at: u32) -> bool {
        !self.playing && self.generation == stopped_at
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    /// Leaky-integrated white noise with makeup gain.
    Brown,
}

/// Mono noise for a looping buffer source.
pub fn noise_samples(color: NoiseColor, len: usize, rng: &mut impl Rng) -> Vec<f32> {
    let mut out = Vec::with_capacity(len);
    match color {
        NoiseColor::White => {
            out.extend((0..len).map(|_| rng.gen_range(-1.0f32..1.0)));
        }
        NoiseColor::Brown => {
            let mut last = 0.0f32;
            for _ in 0..len {
                let white = rng.gen_range(-1.0f32..1.0);
                last = (last + BROWN_STEP * white) / BROWN_LEAK;
                out.push(last * BROWN_MAKEUP_GAIN);
            }
        }
    }
    out
}

/// Stereo impulse for a wide, dry desert space: white noise under a
/// `(1 - t/T)^k` decay.
pub fn reverb_impulse(sample_rate: f32, rng: &mut impl Rng) -> [Vec<f32>; 2] {
    let len = (sample_rate * REVERB_SECONDS).max(1.0) as usize;
    let mut channels = [Vec::with_capacity(len), Vec::with_capacity(len)];
    for i in 0..len {
        let n = i as f32 / sample_rate;
        let envelope = (1.0 - n / REVERB_SECONDS).max(0.0).powf(REVERB_DECAY_POWER);
        for ch in channels.iter_mut() {
            ch.push(rng.gen_range(-1.0f32..1.0) * envelope);
        }
    }
    channels
}
