//! Dune height field shared by collision (here) and vertex displacement
//! (generated WGSL in [`crate::shader`]).
//!
//! The terrain mesh is a plane in its own XY, rotated -90° about X and
//! lowered by [`TERRAIN_BASE_Y`]. In world space that means
//! `local.x = world.x`, `local.y = -world.z` and `world.y = base + elevation`.

use crate::constants::{
    DETAIL_AMPLITUDE, DETAIL_FREQUENCY, DUNE_AMPLITUDE, DUNE_FREQUENCY, HEAT_AMPLITUDE,
    RIPPLE_AMPLITUDE, RIPPLE_SPEED, TERRAIN_BASE_Y,
};
use crate::error::{self, ConfigError};
use crate::noise::{simplex2, Fbm};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub base_y: f64,
    pub dune_frequency: f64,
    pub dune_amplitude: f64,
    pub detail_frequency: f64,
    pub detail_amplitude: f64,
    pub fbm: Fbm,
    // GPU-only surface motion
    pub ripple_speed: f64,
    pub ripple_amplitude: f64,
    pub heat_amplitude: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_y: TERRAIN_BASE_Y,
            dune_frequency: DUNE_FREQUENCY,
            dune_amplitude: DUNE_AMPLITUDE,
            detail_frequency: DETAIL_FREQUENCY,
            detail_amplitude: DETAIL_AMPLITUDE,
            fbm: Fbm::default(),
            ripple_speed: RIPPLE_SPEED,
            ripple_amplitude: RIPPLE_AMPLITUDE,
            heat_amplitude: HEAT_AMPLITUDE,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        error::finite("terrain.base_y", self.base_y)?;
        error::positive("terrain.dune_frequency", self.dune_frequency)?;
        error::finite("terrain.dune_amplitude", self.dune_amplitude)?;
        error::positive("terrain.detail_frequency", self.detail_frequency)?;
        error::finite("terrain.detail_amplitude", self.detail_amplitude)?;
        error::finite("terrain.ripple_speed", self.ripple_speed)?;
        error::finite("terrain.ripple_amplitude", self.ripple_amplitude)?;
        error::finite("terrain.heat_amplitude", self.heat_amplitude)?;
        self.fbm.validate()
    }
}

/// World (x, z) to terrain-local plane coordinates.
#[inline]
pub fn world_to_local(world_x: f64, world_z: f64) -> (f64, f64) {
    (world_x, -world_z)
}

/// Collision surface of the dunes.
#[derive(Clone, Debug, Default)]
pub struct TerrainHeightField {
    params: TerrainParams,
}

impl TerrainHeightField {
    pub fn new(params: TerrainParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Displacement along the plane normal at a terrain-local point, without
    /// the time-dependent ripple/shimmer terms.
    pub fn elevation_local(&self, lx: f64, ly: f64) -> f64 {
        let p = &self.params;
        let dunes = simplex2(lx * p.dune_frequency, ly * p.dune_frequency) * p.dune_amplitude;
        let details =
            p.fbm.sample(lx * p.detail_frequency, ly * p.detail_frequency) * p.detail_amplitude;
        dunes + details
    }

    /// World-space surface height under `(world_x, world_z)`.
    pub fn height(&self, world_x: f64, world_z: f64) -> f64 {
        let (lx, ly) = world_to_local(world_x, world_z);
        self.params.base_y + self.elevation_local(lx, ly)
    }

    /// Single-precision convenience for the navigation code.
    #[inline]
    pub fn height_f32(&self, world_x: f32, world_z: f32) -> f32 {
        self.height(world_x as f64, world_z as f64) as f32
    }

    /// Ripple and heat-shimmer displacement the vertex shader adds on top of
    /// [`Self::elevation_local`]. Visual only; collision never sees it.
    pub fn surface_motion_local(&self, lx: f64, ly: f64, time_s: f64) -> f64 {
        let p = &self.params;
        let rx = lx + time_s * p.ripple_speed;
        let ry = ly + time_s * p.ripple_speed * 0.5;
        let ripples = ((rx * 0.8 + ry * 0.2) * 2.0).sin() * p.ripple_amplitude;
        let heat =
            (lx * 10.0 + time_s * 5.0).sin() * (ly * 10.0 + time_s * 3.0).sin() * p.heat_amplitude;
        ripples + heat
    }

    /// The full rendered surface height, including the GPU-only motion.
    pub fn rendered_height(&self, world_x: f64, world_z: f64, time_s: f64) -> f64 {
        let (lx, ly) = world_to_local(world_x, world_z);
        self.params.base_y + self.elevation_local(lx, ly) + self.surface_motion_local(lx, ly, time_s)
    }

    /// Bound on how far the rendered surface may sit from the collision surface.
    pub fn max_visual_deviation(&self) -> f64 {
        self.params.ripple_amplitude.abs() + self.params.heat_amplitude.abs()
    }

    /// Heights for a batch of interleaved `[x0, z0, x1, z1, ...]` world coordinates.
    pub fn heights_interleaved(&self, xz: &[f32]) -> Vec<f32> {
        xz.chunks_exact(2)
            .map(|p| self.height_f32(p[0], p[1]))
            .collect()
    }
}
