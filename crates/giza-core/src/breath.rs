//! The shared breathing oracle.
//!
//! A pure function of session time: the camera sway and the rumble layer of
//! the ambience both evaluate it against the same clock, so they cannot drift
//! apart no matter how long the session runs.

use crate::constants::{BREATH_EXHALE_SEC, BREATH_HOLD_SEC, BREATH_INHALE_SEC, BREATH_PAUSE_SEC};
use crate::error::ConfigError;
use std::f64::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreathStage {
    Inhale,
    Hold,
    Exhale,
    Pause,
}

/// Stage lengths in seconds. The cycle period is their sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathPattern {
    pub inhale: f64,
    pub hold: f64,
    pub exhale: f64,
    pub pause: f64,
}

/// 4 s in, 2 s hold, 6 s out, no pause.
pub const LONG_EXHALE: BreathPattern = BreathPattern {
    inhale: BREATH_INHALE_SEC,
    hold: BREATH_HOLD_SEC,
    exhale: BREATH_EXHALE_SEC,
    pause: BREATH_PAUSE_SEC,
};

/// 4 s in, 2 s hold, 4 s out, 2 s rest.
pub const BOX_BREATH: BreathPattern = BreathPattern {
    inhale: 4.0,
    hold: 2.0,
    exhale: 4.0,
    pause: 2.0,
};

impl Default for BreathPattern {
    fn default() -> Self {
        LONG_EXHALE
    }
}

impl BreathPattern {
    pub fn new(inhale: f64, hold: f64, exhale: f64, pause: f64) -> Result<Self, ConfigError> {
        let pattern = Self {
            inhale,
            hold,
            exhale,
            pause,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let stages = [self.inhale, self.hold, self.exhale, self.pause];
        let well_formed = stages.iter().all(|s| s.is_finite() && *s >= 0.0)
            && self.period() > 0.0
            && self.inhale > 0.0
            && self.exhale > 0.0;
        if well_formed {
            Ok(())
        } else {
            Err(ConfigError::BadBreathPattern {
                inhale: self.inhale,
                hold: self.hold,
                exhale: self.exhale,
                pause: self.pause,
            })
        }
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.inhale + self.hold + self.exhale + self.pause
    }

    /// Position inside the current cycle, in [0, period).
    #[inline]
    pub fn cycle_time(&self, time_s: f64) -> f64 {
        time_s.rem_euclid(self.period())
    }

    /// Stage and normalised progress through it (0..1).
    pub fn stage_at(&self, time_s: f64) -> (BreathStage, f64) {
        let mut t = self.cycle_time(time_s);
        if t < self.inhale {
            return (BreathStage::Inhale, t / self.inhale);
        }
        t -= self.inhale;
        if t < self.hold {
            return (BreathStage::Hold, t / self.hold);
        }
        t -= self.hold;
        if t < self.exhale {
            return (BreathStage::Exhale, t / self.exhale);
        }
        t -= self.exhale;
        let progress = if self.pause > 0.0 { t / self.pause } else { 0.0 };
        (BreathStage::Pause, progress)
    }

    /// Lung fullness in [0, 1]: sine rise, flat top, cosine fall, flat bottom.
    pub fn phase(&self, time_s: f64) -> f64 {
        match self.stage_at(time_s) {
            (BreathStage::Inhale, u) => (u * FRAC_PI_2).sin(),
            (BreathStage::Hold, _) => 1.0,
            (BreathStage::Exhale, u) => (u * FRAC_PI_2).cos(),
            (BreathStage::Pause, _) => 0.0,
        }
    }
}

/// Breath phase under the default 12 s pattern.
#[inline]
pub fn breath_phase(time_s: f64) -> f64 {
    LONG_EXHALE.phase(time_s)
}
