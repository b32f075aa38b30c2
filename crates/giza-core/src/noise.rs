//! 2D simplex gradient noise and its fractal (FBM) sum.
//!
//! The lattice hash is the permutation polynomial `(34x² + x) mod 289` and the
//! gradients sit on a rotated cross-polytope, i.e. the formulation that is
//! cheap to evaluate in a vertex shader. Every operation here is written in
//! the same order the shader evaluates it (see [`crate::shader`]) so the two
//! only differ by single- vs double-precision rounding.

use crate::constants::{FBM_LACUNARITY, FBM_OCTAVES, FBM_PERSISTENCE, FBM_ROTATION, FBM_SHIFT};
use crate::error::{self, ConfigError};

/// Skew/unskew factors: (3 - sqrt 3)/6, (sqrt 3 - 1)/2, -1 + 2·(3 - sqrt 3)/6, 1/41.
pub const SIMPLEX_C: [f64; 4] = [
    0.211324865405187,
    0.366025403784439,
    -0.577350269189626,
    0.024390243902439,
];
/// Normalisation so the output spans roughly [-1, 1].
pub const SIMPLEX_SCALE: f64 = 130.0;
pub const GRADIENT_NORM_A: f64 = 1.79284291400159;
pub const GRADIENT_NORM_B: f64 = 0.85373472095314;

#[inline]
fn mod289(x: f64) -> f64 {
    x - 289.0 * (x / 289.0).floor()
}

#[inline]
fn permute(x: f64) -> f64 {
    mod289((x * 34.0 + 1.0) * x)
}

#[inline]
fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Simplex noise at `(x, y)`. Deterministic, continuous, approximately in [-1, 1].
///
/// Non-finite input yields NaN; callers sanitise coordinates upstream.
pub fn simplex2(x: f64, y: f64) -> f64 {
    let c = SIMPLEX_C;

    // First corner
    let skew = x * c[1] + y * c[1];
    let ix = (x + skew).floor();
    let iy = (y + skew).floor();
    let unskew = ix * c[0] + iy * c[0];
    let x0 = [x - ix + unskew, y - iy + unskew];

    // Middle corner depends on which triangle of the rhombus we are in
    let i1 = if x0[0] > x0[1] { [1.0, 0.0] } else { [0.0, 1.0] };

    // Offsets to the other two corners
    let x12 = [
        x0[0] + c[0] - i1[0],
        x0[1] + c[0] - i1[1],
        x0[0] + c[2],
        x0[1] + c[2],
    ];

    let ix = mod289(ix);
    let iy = mod289(iy);
    let p = [
        permute(permute(iy) + ix),
        permute(permute(iy + i1[1]) + ix + i1[0]),
        permute(permute(iy + 1.0) + ix + 1.0),
    ];

    let offsets = [[x0[0], x0[1]], [x12[0], x12[1]], [x12[2], x12[3]]];

    let mut sum = 0.0;
    for (corner, hash) in offsets.iter().zip(p) {
        let falloff = (0.5 - (corner[0] * corner[0] + corner[1] * corner[1])).max(0.0);
        let falloff = falloff * falloff;
        let falloff = falloff * falloff;

        // Gradients: 41 points uniformly over a line, mapped onto a diamond
        let gx = 2.0 * fract(hash * c[3]) - 1.0;
        let h = gx.abs() - 0.5;
        let ox = (gx + 0.5).floor();
        let a0 = gx - ox;

        // Approximate gradient normalisation folded into the falloff
        let weight = falloff * (GRADIENT_NORM_A - GRADIENT_NORM_B * (a0 * a0 + h * h));
        sum += weight * (a0 * corner[0] + h * corner[1]);
    }
    SIMPLEX_SCALE * sum
}

/// Fractal sum of rotated, shifted simplex octaves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fbm {
    pub octaves: u32,
    /// Amplitude of the first octave and the per-octave amplitude multiplier.
    pub persistence: f64,
    pub lacunarity: f64,
    /// Rotation (radians) applied to the domain between octaves.
    pub rotation: f64,
    /// Offset added to both axes between octaves.
    pub shift: f64,
}

impl Default for Fbm {
    fn default() -> Self {
        Self {
            octaves: FBM_OCTAVES,
            persistence: FBM_PERSISTENCE,
            lacunarity: FBM_LACUNARITY,
            rotation: FBM_ROTATION,
            shift: FBM_SHIFT,
        }
    }
}

impl Fbm {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::NonPositive {
                name: "fbm.octaves",
                value: 0.0,
            });
        }
        error::in_range("fbm.persistence", self.persistence, 0.0, 1.0)?;
        error::positive("fbm.lacunarity", self.lacunarity)?;
        error::finite("fbm.rotation", self.rotation)?;
        error::finite("fbm.shift", self.shift)
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (s, c) = self.rotation.sin_cos();
        let mut value = 0.0;
        let mut amplitude = self.persistence;
        let mut p = [x, y];
        for _ in 0..self.octaves {
            value += amplitude * simplex2(p[0], p[1]);
            // column-major mat2(c, s, -s, c) * p, scaled, then shifted
            p = [
                (p[0] * c + p[1] * -s) * self.lacunarity + self.shift,
                (p[0] * s + p[1] * c) * self.lacunarity + self.shift,
            ];
            amplitude *= self.persistence;
        }
        value
    }

    /// Upper bound on `|sample|` given simplex output within [-1, 1].
    pub fn amplitude_bound(&self) -> f64 {
        (1..=self.octaves)
            .map(|i| self.persistence.powi(i as i32))
            .sum()
    }
}

/// FBM with the dune defaults (5 octaves, persistence 0.5, lacunarity 2, 0.5 rad).
#[inline]
pub fn fbm(x: f64, y: f64) -> f64 {
    Fbm::default().sample(x, y)
}
