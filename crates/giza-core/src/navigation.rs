//! First-person walker: integrates input and gravity, rests on the dunes,
//! slides around the pyramids, and produces the camera pose.
//!
//! One frame is one call to [`NavigationController::step`]; the order of the
//! sub-steps is fixed:
//!
//! 1. take the smoothed, unit-clamped move vector from the input sample
//! 2. rotate it into world space by the current (smoothed) yaw
//! 3. accelerate horizontally, `v += dir · speed · damping · dt`
//! 4. apply gravity
//! 5. ground check; a held jump launches only while grounded
//! 6. exponential horizontal friction, `v *= exp(-damping · dt)`
//! 7. integrate position
//! 8. clamp onto the terrain if we sank below it
//! 9. push out of obstacle footprints and kill the inward velocity, then
//!    re-clamp onto the terrain if anything moved
//! 10. move the look target and ease the orientation toward it
//!
//! The pose (sway, bob, tremor) is derived afterwards from the state and the
//! session time by [`NavigationController::camera_pose`].

use crate::breath::BreathPattern;
use crate::camera::{CameraPose, SwayParams};
use crate::constants::{
    start_position_vec3, DAMPING, GRAVITY, GROUND_TOLERANCE, JUMP_IMPULSE, PITCH_LIMIT,
    PLAYER_HEIGHT, PYRAMID_OBSTACLES, ROTATION_SMOOTHING, RUN_SPEED, START_PITCH, START_YAW,
    WALK_SPEED,
};
use crate::error::{self, ConfigError};
use crate::input::FrameInput;
use crate::terrain::TerrainHeightField;
use glam::{Quat, Vec3};
use smallvec::SmallVec;

/// Static upright cylinder, e.g. a pyramid footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
}

impl Obstacle {
    pub const fn new(x: f32, z: f32, radius: f32) -> Self {
        Self { x, z, radius }
    }

    pub fn horizontal_distance(&self, position: Vec3) -> f32 {
        let dx = position.x - self.x;
        let dz = position.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Push `position` radially out to the rim and drop any velocity pointing
    /// inward. Returns whether the point was inside.
    pub fn resolve(&self, position: &mut Vec3, velocity: &mut Vec3) -> bool {
        let dx = position.x - self.x;
        let dz = position.z - self.z;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist >= self.radius {
            return false;
        }
        // Dead centre has no direction; leave along +X.
        let (nx, nz) = if dist > f32::EPSILON {
            (dx / dist, dz / dist)
        } else {
            (1.0, 0.0)
        };
        position.x = self.x + nx * self.radius;
        position.z = self.z + nz * self.radius;

        let inward = velocity.x * nx + velocity.z * nz;
        if inward < 0.0 {
            velocity.x -= inward * nx;
            velocity.z -= inward * nz;
        }
        true
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let ok = self.x.is_finite()
            && self.z.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::BadObstacle {
                index,
                x: self.x,
                z: self.z,
                radius: self.radius,
            })
        }
    }
}

pub type Obstacles = SmallVec<[Obstacle; 4]>;

/// The three pyramid footprints.
pub fn pyramid_obstacles() -> Obstacles {
    PYRAMID_OBSTACLES
        .iter()
        .map(|[x, z, r]| Obstacle::new(*x, *z, *r))
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }
}

/// Everything the walker owns. Mutated once per frame by `step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationState {
    /// Eye position on the physics body (before sway).
    pub position: Vec3,
    pub velocity: Vec3,
    /// Smoothed orientation used for the camera and for steering.
    pub rotation: Orientation,
    /// Orientation the look input asks for.
    pub target_rotation: Orientation,
    /// Sprint flag of the last step, for the head bob.
    pub sprinting: bool,
    /// Ground contact as of the last step's check.
    pub grounded: bool,
}

impl NavigationState {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let rotation = Orientation::new(yaw, pitch);
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation,
            target_rotation: rotation,
            sprinting: false,
            grounded: false,
        }
    }

    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        (self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z).sqrt()
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(start_position_vec3(), START_YAW, START_PITCH)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationParams {
    pub player_height: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    pub damping: f32,
    pub ground_tolerance: f32,
    pub pitch_limit: f32,
    /// Per-frame fraction of the remaining look error removed. Frame-rate
    /// dependent on purpose: it is a feel knob, not a filter.
    pub rotation_smoothing: f32,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            player_height: PLAYER_HEIGHT,
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
            gravity: GRAVITY,
            damping: DAMPING,
            ground_tolerance: GROUND_TOLERANCE,
            pitch_limit: PITCH_LIMIT,
            rotation_smoothing: ROTATION_SMOOTHING,
        }
    }
}

impl NavigationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        error::positive("nav.player_height", self.player_height as f64)?;
        error::positive("nav.walk_speed", self.walk_speed as f64)?;
        error::positive("nav.run_speed", self.run_speed as f64)?;
        error::ordered("nav.walk_speed..run_speed", self.walk_speed as f64, self.run_speed as f64)?;
        error::positive("nav.jump_impulse", self.jump_impulse as f64)?;
        error::positive("nav.gravity", self.gravity as f64)?;
        error::positive("nav.damping", self.damping as f64)?;
        error::in_range("nav.ground_tolerance", self.ground_tolerance as f64, 0.0, 1.0)?;
        error::in_range(
            "nav.pitch_limit",
            self.pitch_limit as f64,
            0.0,
            std::f64::consts::FRAC_PI_2,
        )?;
        error::in_range(
            "nav.rotation_smoothing",
            self.rotation_smoothing as f64,
            0.0,
            1.0,
        )
    }

    /// Horizontal steady state under constant full input:
    /// `v* = v* · f + speed · damping · dt · f` with `f = exp(-damping·dt)`.
    pub fn terminal_speed(&self, sprint: bool, dt: f32) -> f32 {
        let speed = if sprint { self.run_speed } else { self.walk_speed };
        let f = (-self.damping * dt).exp();
        speed * self.damping * dt * f / (1.0 - f)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub grounded: bool,
    pub jumped: bool,
    /// At least one obstacle pushed the walker out this frame.
    pub collided: bool,
    /// The terrain clamp caught the walker this frame.
    pub landed: bool,
}

#[derive(Clone, Debug)]
pub struct NavigationController {
    pub params: NavigationParams,
    pub sway: SwayParams,
    pub breath: BreathPattern,
    terrain: TerrainHeightField,
    obstacles: Obstacles,
    state: NavigationState,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self {
            params: NavigationParams::default(),
            sway: SwayParams::default(),
            breath: BreathPattern::default(),
            terrain: TerrainHeightField::default(),
            obstacles: pyramid_obstacles(),
            state: NavigationState::default(),
        }
    }
}

impl NavigationController {
    pub fn new(
        params: NavigationParams,
        terrain: TerrainHeightField,
        obstacles: impl IntoIterator<Item = Obstacle>,
        state: NavigationState,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let obstacles: Obstacles = obstacles.into_iter().collect();
        for (i, o) in obstacles.iter().enumerate() {
            o.validate(i)?;
        }
        Ok(Self {
            params,
            sway: SwayParams::default(),
            breath: BreathPattern::default(),
            terrain,
            obstacles,
            state,
        })
    }

    pub fn with_breath(mut self, breath: BreathPattern) -> Result<Self, ConfigError> {
        breath.validate()?;
        self.breath = breath;
        Ok(self)
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut NavigationState {
        &mut self.state
    }

    pub fn terrain(&self) -> &TerrainHeightField {
        &self.terrain
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Eye height when standing at `(x, z)`.
    #[inline]
    pub fn ground_y(&self, x: f32, z: f32) -> f32 {
        self.terrain.height_f32(x, z) + self.params.player_height
    }

    pub fn is_grounded(&self) -> bool {
        let p = self.state.position;
        p.y <= self.ground_y(p.x, p.z) + self.params.ground_tolerance
    }

    /// Advance the walker by `dt` seconds. Non-positive or non-finite `dt`
    /// leaves the state untouched.
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> StepReport {
        let mut report = StepReport::default();
        if !(dt.is_finite() && dt > 0.0) {
            return report;
        }
        let p = self.params;

        // 1-2. steering direction in world space
        let local = input.move_vector.clamp_length_max(1.0);
        let local = Vec3::new(local.x, 0.0, -local.y);
        let world_move = Quat::from_rotation_y(self.state.rotation.yaw) * local;

        // 3. acceleration
        let speed = if input.sprint { p.run_speed } else { p.walk_speed };
        let s = &mut self.state;
        s.velocity.x += world_move.x * speed * p.damping * dt;
        s.velocity.z += world_move.z * speed * p.damping * dt;

        // 4. gravity
        s.velocity.y -= p.gravity * dt;

        // 5. ground check + jump
        report.grounded = self.is_grounded();
        let s = &mut self.state;
        s.grounded = report.grounded;
        if report.grounded && input.jump {
            s.velocity.y = p.jump_impulse;
            report.jumped = true;
            log::debug!("[nav] jump at ({:.2}, {:.2}, {:.2})", s.position.x, s.position.y, s.position.z);
        }

        // 6. friction
        let friction = (-p.damping * dt).exp();
        s.velocity.x *= friction;
        s.velocity.z *= friction;

        // 7. integrate
        s.position += s.velocity * dt;

        // 8. terrain clamp
        report.landed = self.clamp_to_ground();

        // 9. obstacles, resolved one after another
        let s = &mut self.state;
        for obstacle in &self.obstacles {
            if obstacle.resolve(&mut s.position, &mut s.velocity) {
                report.collided = true;
            }
        }
        if report.collided {
            self.clamp_to_ground();
        }

        // 10. look
        let s = &mut self.state;
        s.target_rotation.yaw += input.look_delta.x;
        s.target_rotation.pitch =
            (s.target_rotation.pitch + input.look_delta.y).clamp(-p.pitch_limit, p.pitch_limit);
        let k = p.rotation_smoothing;
        s.rotation.yaw += (s.target_rotation.yaw - s.rotation.yaw) * k;
        s.rotation.pitch += (s.target_rotation.pitch - s.rotation.pitch) * k;

        s.sprinting = input.sprint;
        report
    }

    fn clamp_to_ground(&mut self) -> bool {
        let ground = {
            let p = self.state.position;
            self.ground_y(p.x, p.z)
        };
        let s = &mut self.state;
        if s.position.y < ground {
            s.position.y = ground;
            s.velocity.y = 0.0;
            true
        } else {
            false
        }
    }

    /// Eye pose at session time `t` for the current state.
    pub fn camera_pose(&self, t: f64) -> CameraPose {
        let s = &self.state;
        let sway = self.sway.sway(
            &self.breath,
            t,
            s.horizontal_speed(),
            self.params.run_speed,
            s.sprinting,
        );
        CameraPose::from_yaw_pitch_roll(
            s.position + Vec3::Y * sway.vertical,
            s.rotation.yaw,
            s.rotation.pitch + sway.pitch,
            sway.roll,
        )
    }

    /// `step` followed by `camera_pose`.
    pub fn frame(&mut self, input: &FrameInput, dt: f32, t: f64) -> CameraPose {
        self.step(input, dt);
        self.camera_pose(t)
    }
}
