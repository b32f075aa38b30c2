//! Camera pose handed to the renderer, plus the "living body" motion layered
//! on top of the physics position: breath sway, hover, head bob and tremor.

use crate::breath::BreathPattern;
use crate::constants::{
    BOB_AMP_RUN, BOB_AMP_WALK, BOB_FREQ_RUN, BOB_FREQ_WALK, BREATH_SWAY_AMPLITUDE,
    BREATH_SWAY_MODULATION, BREATH_SWAY_MODULATION_FREQ, HOVER_AMPLITUDE, HOVER_FREQ,
    PITCH_SWAY_AMPLITUDE, ROLL_SWAY_AMPLITUDE, TREMOR_AMPLITUDE,
};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Final eye transform for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    /// Yaw about +Y first, then pitch about the local X, then roll.
    pub fn from_yaw_pitch_roll(position: Vec3, yaw: f32, pitch: f32, roll: f32) -> Self {
        Self {
            position,
            orientation: Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll),
        }
    }

    /// Cameras look down their local -Z.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// `[px, py, pz, qx, qy, qz, qw]`, the layout the web surface exports.
    pub fn to_array(&self) -> [f32; 7] {
        let p = self.position;
        let q = self.orientation;
        [p.x, p.y, p.z, q.x, q.y, q.z, q.w]
    }
}

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug)]
pub struct Lens {
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            aspect: 16.0 / 9.0,
            fovy_radians: 60f32.to_radians(),
            znear: 0.1,
            zfar: 2000.0,
        }
    }
}

impl Lens {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self, pose: &CameraPose) -> Mat4 {
        self.projection_matrix() * pose.view_matrix()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwayParams {
    pub breath_amplitude: f64,
    pub breath_modulation: f64,
    pub breath_modulation_freq: f64,
    pub hover_amplitude: f64,
    pub hover_freq: f64,
    pub bob_freq_walk: f64,
    pub bob_freq_run: f64,
    pub bob_amp_walk: f64,
    pub bob_amp_run: f64,
    pub tremor_amplitude: f64,
    pub roll_amplitude: f64,
    pub pitch_amplitude: f64,
}

impl Default for SwayParams {
    fn default() -> Self {
        Self {
            breath_amplitude: BREATH_SWAY_AMPLITUDE,
            breath_modulation: BREATH_SWAY_MODULATION,
            breath_modulation_freq: BREATH_SWAY_MODULATION_FREQ,
            hover_amplitude: HOVER_AMPLITUDE,
            hover_freq: HOVER_FREQ,
            bob_freq_walk: BOB_FREQ_WALK,
            bob_freq_run: BOB_FREQ_RUN,
            bob_amp_walk: BOB_AMP_WALK,
            bob_amp_run: BOB_AMP_RUN,
            tremor_amplitude: TREMOR_AMPLITUDE,
            roll_amplitude: ROLL_SWAY_AMPLITUDE,
            pitch_amplitude: PITCH_SWAY_AMPLITUDE,
        }
    }
}

/// Vertical offset and small rotational jitter for one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodySway {
    pub vertical: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl SwayParams {
    /// Breath lifts the eye; the lift itself slowly wobbles so no two cycles match.
    pub fn breath_offset(&self, breath: &BreathPattern, t: f64) -> f64 {
        let amp = self.breath_amplitude + (t * self.breath_modulation_freq).sin() * self.breath_modulation;
        breath.phase(t) * amp
    }

    pub fn hover_offset(&self, t: f64) -> f64 {
        (t * self.hover_freq).sin() * self.hover_amplitude
    }

    /// Step bob, scaled by horizontal speed relative to `max_speed`.
    pub fn head_bob(&self, t: f64, horizontal_speed: f32, max_speed: f32, sprint: bool) -> f64 {
        let (freq, amp) = if sprint {
            (self.bob_freq_run, self.bob_amp_run)
        } else {
            (self.bob_freq_walk, self.bob_amp_walk)
        };
        let speed_ratio = if max_speed > 0.0 {
            (horizontal_speed.min(max_speed) / max_speed) as f64
        } else {
            0.0
        };
        (t * freq).sin() * amp * speed_ratio
    }

    /// Involuntary micro-motion, two incommensurate sines.
    pub fn tremor(&self, t: f64) -> f64 {
        (t * 0.5).sin() * self.tremor_amplitude + (t * 0.3).cos() * self.tremor_amplitude
    }

    pub fn sway(
        &self,
        breath: &BreathPattern,
        t: f64,
        horizontal_speed: f32,
        max_speed: f32,
        sprint: bool,
    ) -> BodySway {
        let vertical = self.breath_offset(breath, t)
            + self.hover_offset(t)
            + self.head_bob(t, horizontal_speed, max_speed, sprint);
        BodySway {
            vertical: vertical as f32,
            pitch: ((t * 0.09).sin() * self.pitch_amplitude) as f32,
            roll: ((t * 0.12).sin() * self.roll_amplitude + self.tremor(t)) as f32,
        }
    }

    /// Largest vertical offset `sway` can produce.
    pub fn max_vertical(&self) -> f64 {
        (self.breath_amplitude + self.breath_modulation).abs()
            + self.hover_amplitude.abs()
            + self.bob_amp_walk.abs().max(self.bob_amp_run.abs())
    }
}
