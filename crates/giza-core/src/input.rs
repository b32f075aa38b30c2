//! Turns raw keyboard / mouse / touch events into one per-frame sample.
//!
//! Event handlers only write into [`InputAggregator`]; the frame loop calls
//! [`InputAggregator::sample`] once at the start of its step. Nothing here
//! touches the navigation state directly.

use crate::constants::{
    JOYSTICK_CURVE_EXPONENT, JOYSTICK_DEADZONE, JOYSTICK_MAX_RADIUS, KEY_SMOOTHING_RATE,
    MAX_POINTER_DELTA, MOUSE_SENSITIVITY, TOUCH_LOOK_SENSITIVITY, TOUCH_SPLIT_FRACTION,
};
use crate::error::{self, ConfigError};
use fnv::FnvHashMap;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Sprint,
}

/// `KeyboardEvent.code` -> action. Codes are layout independent, so WASD
/// stays under the same fingers on AZERTY.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    map: FnvHashMap<String, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            map: FnvHashMap::default(),
        };
        for (code, action) in [
            ("KeyW", KeyAction::Forward),
            ("ArrowUp", KeyAction::Forward),
            ("KeyS", KeyAction::Backward),
            ("ArrowDown", KeyAction::Backward),
            ("KeyA", KeyAction::Left),
            ("ArrowLeft", KeyAction::Left),
            ("KeyD", KeyAction::Right),
            ("ArrowRight", KeyAction::Right),
            ("Space", KeyAction::Jump),
            ("ShiftLeft", KeyAction::Sprint),
            ("ShiftRight", KeyAction::Sprint),
        ] {
            bindings.bind(code, action);
        }
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: FnvHashMap::default(),
        }
    }

    pub fn bind(&mut self, code: &str, action: KeyAction) {
        self.map.insert(code.to_owned(), action);
    }

    pub fn unbind(&mut self, code: &str) -> Option<KeyAction> {
        self.map.remove(code)
    }

    #[inline]
    pub fn action_for(&self, code: &str) -> Option<KeyAction> {
        self.map.get(code).copied()
    }
}

/// Latched key state; written on keydown/keyup, read every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
}

impl MoveFlags {
    pub fn set(&mut self, action: KeyAction, pressed: bool) {
        match action {
            KeyAction::Forward => self.forward = pressed,
            KeyAction::Backward => self.backward = pressed,
            KeyAction::Left => self.left = pressed,
            KeyAction::Right => self.right = pressed,
            KeyAction::Jump => self.jump = pressed,
            KeyAction::Sprint => self.sprint = pressed,
        }
    }

    /// Unsmoothed direction: `x` strafes right, `y` walks forward.
    pub fn raw_vector(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.forward {
            v.y += 1.0;
        }
        if self.backward {
            v.y -= 1.0;
        }
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        v
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputParams {
    /// 1/s; keyboard direction approaches its target by `1 - exp(-rate·dt)` per frame.
    pub key_smoothing_rate: f32,
    pub joystick_max_radius: f32,
    /// Fraction of the joystick radius that produces no motion.
    pub joystick_deadzone: f32,
    pub joystick_curve_exponent: f32,
    pub mouse_sensitivity: f32,
    pub touch_look_sensitivity: f32,
    /// Largest accepted pointer delta per event, in px.
    pub max_pointer_delta: f32,
    /// Touches left of `width * fraction` drive the joystick, the rest look.
    pub touch_split_fraction: f32,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            key_smoothing_rate: KEY_SMOOTHING_RATE,
            joystick_max_radius: JOYSTICK_MAX_RADIUS,
            joystick_deadzone: JOYSTICK_DEADZONE,
            joystick_curve_exponent: JOYSTICK_CURVE_EXPONENT,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            touch_look_sensitivity: TOUCH_LOOK_SENSITIVITY,
            max_pointer_delta: MAX_POINTER_DELTA,
            touch_split_fraction: TOUCH_SPLIT_FRACTION,
        }
    }
}

impl InputParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        error::positive("input.key_smoothing_rate", self.key_smoothing_rate as f64)?;
        error::positive("input.joystick_max_radius", self.joystick_max_radius as f64)?;
        error::in_range("input.joystick_deadzone", self.joystick_deadzone as f64, 0.0, 0.95)?;
        error::positive(
            "input.joystick_curve_exponent",
            self.joystick_curve_exponent as f64,
        )?;
        error::positive("input.mouse_sensitivity", self.mouse_sensitivity as f64)?;
        error::positive(
            "input.touch_look_sensitivity",
            self.touch_look_sensitivity as f64,
        )?;
        error::positive("input.max_pointer_delta", self.max_pointer_delta as f64)?;
        error::in_range(
            "input.touch_split_fraction",
            self.touch_split_fraction as f64,
            0.0,
            1.0,
        )
    }
}

/// Clamp a raw pointer delta; drop it entirely if the device sent garbage.
#[inline]
pub fn sanitize_delta(value: f32, max_abs: f32) -> Option<f32> {
    value.is_finite().then(|| value.clamp(-max_abs, max_abs))
}

/// Map a joystick thumb offset (screen px, +y down) to a movement vector.
///
/// The offset is clamped to the stick radius, the dead zone is cut away and
/// the remaining travel goes through a power curve so small deflections give
/// fine, slow control.
pub fn shape_joystick(offset: Vec2, params: &InputParams) -> Vec2 {
    let radius = params.joystick_max_radius;
    let len = offset.length();
    if !len.is_finite() || len <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let deflection = (len / radius).min(1.0);
    let dz = params.joystick_deadzone;
    if deflection <= dz {
        return Vec2::ZERO;
    }
    let magnitude = ((deflection - dz) / (1.0 - dz)).powf(params.joystick_curve_exponent);
    let dir = offset / len;
    // screen down is walking backward
    Vec2::new(dir.x, -dir.y) * magnitude
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Joystick {
    pub touch_id: Option<i32>,
    pub origin: Vec2,
    /// Thumb offset from `origin`, already clamped to the stick radius.
    pub offset: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookTouch {
    pub touch_id: Option<i32>,
    pub last: Vec2,
}

/// Everything the navigation step needs from the input side for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// `x` strafes right, `y` walks forward; length <= 1.
    pub move_vector: Vec2,
    /// Change of the look target since the last sample: `x` yaw, `y` pitch (radians).
    pub look_delta: Vec2,
    pub jump: bool,
    pub sprint: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InputAggregator {
    pub params: InputParams,
    pub bindings: KeyBindings,
    flags: MoveFlags,
    smoothed_keys: Vec2,
    joystick: Joystick,
    look_touch: LookTouch,
    pending_look: Vec2,
    pointer_locked: bool,
    dragging: bool,
}

impl InputAggregator {
    pub fn new(params: InputParams, bindings: KeyBindings) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            bindings,
            ..Default::default()
        })
    }

    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Returns true when the code is bound, so the caller can suppress the
    /// browser default (page scroll on Space/arrows).
    pub fn key_down(&mut self, code: &str) -> bool {
        match self.bindings.action_for(code) {
            Some(action) => {
                self.flags.set(action, true);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match self.bindings.action_for(code) {
            Some(action) => {
                self.flags.set(action, false);
                true
            }
            None => false,
        }
    }

    /// Drop every held key and touch, e.g. when the window loses focus and
    /// the matching keyup events will never arrive.
    pub fn release_all(&mut self) {
        self.flags = MoveFlags::default();
        self.joystick = Joystick::default();
        self.look_touch = LookTouch::default();
        self.dragging = false;
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        if self.pointer_locked != locked {
            log::info!("[input] pointer lock {}", if locked { "on" } else { "off" });
        }
        self.pointer_locked = locked;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Relative mouse motion; ignored unless the pointer is locked or dragging.
    pub fn mouse_move(&mut self, movement_x: f32, movement_y: f32) {
        if !(self.pointer_locked || self.dragging) {
            return;
        }
        let max = self.params.max_pointer_delta;
        match (
            sanitize_delta(movement_x, max),
            sanitize_delta(movement_y, max),
        ) {
            (Some(dx), Some(dy)) => {
                let s = self.params.mouse_sensitivity;
                self.pending_look += Vec2::new(-dx * s, -dy * s);
            }
            _ => log::warn!(
                "[input] dropped non-finite mouse delta ({}, {})",
                movement_x,
                movement_y
            ),
        }
    }

    pub fn touch_start(&mut self, id: i32, x: f32, y: f32, viewport_width: f32) {
        if !(x.is_finite() && y.is_finite()) {
            log::warn!("[input] dropped non-finite touch start");
            return;
        }
        let pos = Vec2::new(x, y);
        if x < viewport_width * self.params.touch_split_fraction {
            if self.joystick.touch_id.is_none() {
                self.joystick = Joystick {
                    touch_id: Some(id),
                    origin: pos,
                    offset: Vec2::ZERO,
                };
            }
        } else if self.look_touch.touch_id.is_none() {
            self.look_touch = LookTouch {
                touch_id: Some(id),
                last: pos,
            };
        }
    }

    pub fn touch_move(&mut self, id: i32, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            log::warn!("[input] dropped non-finite touch move");
            return;
        }
        let pos = Vec2::new(x, y);
        if self.joystick.touch_id == Some(id) {
            self.joystick.offset =
                (pos - self.joystick.origin).clamp_length_max(self.params.joystick_max_radius);
        }
        if self.look_touch.touch_id == Some(id) {
            let max = self.params.max_pointer_delta;
            let delta = (pos - self.look_touch.last).clamp(Vec2::splat(-max), Vec2::splat(max));
            let s = self.params.touch_look_sensitivity;
            self.pending_look += Vec2::new(-delta.x * s, -delta.y * s);
            self.look_touch.last = pos;
        }
    }

    pub fn touch_end(&mut self, id: i32) {
        if self.joystick.touch_id == Some(id) {
            self.joystick = Joystick::default();
        }
        if self.look_touch.touch_id == Some(id) {
            self.look_touch = LookTouch::default();
        }
    }

    /// Consume this frame's input. Advances keyboard smoothing by `dt` and
    /// drains the accumulated look delta.
    pub fn sample(&mut self, dt: f32) -> FrameInput {
        let alpha = 1.0 - (-self.params.key_smoothing_rate * dt.max(0.0)).exp();
        let raw = self.flags.raw_vector();
        self.smoothed_keys += (raw - self.smoothed_keys) * alpha;

        let stick = if self.joystick.touch_id.is_some() {
            shape_joystick(self.joystick.offset, &self.params)
        } else {
            Vec2::ZERO
        };

        let look_delta = std::mem::take(&mut self.pending_look);
        FrameInput {
            move_vector: (self.smoothed_keys + stick).clamp_length_max(1.0),
            look_delta,
            jump: self.flags.jump,
            sprint: self.flags.sprint,
        }
    }
}
