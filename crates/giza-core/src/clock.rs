use instant::Instant;
use std::time::Duration;

/// The one time source for sway, breath and gusts.
///
/// Everything time-driven reads seconds since mount from here; the frame
/// delta used for physics is measured separately so a clamped delta never
/// shifts the phase of the breath or the wind.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    origin: Instant,
    offset: Duration,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
            offset: Duration::ZERO,
        }
    }

    /// A clock that reports `offset` at the moment of creation.
    pub fn starting_at(offset: Duration) -> Self {
        Self {
            origin: Instant::now(),
            offset,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.offset + self.origin.elapsed()
    }

    #[inline]
    pub fn seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}
