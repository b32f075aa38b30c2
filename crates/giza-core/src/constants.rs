// Shared navigation/terrain/audio tuning constants used by the core and the web frontend.

// Terrain placement: the dune plane is laid flat (rotated -90 deg about X) and dropped by 2 units
pub const TERRAIN_BASE_Y: f64 = -2.0;
pub const TERRAIN_SIZE: f32 = 1000.0; // plane edge length in world units
pub const TERRAIN_SEGMENTS: u32 = 256; // grid subdivisions per edge

// Large rolling dunes (single simplex term)
pub const DUNE_FREQUENCY: f64 = 0.005;
pub const DUNE_AMPLITUDE: f64 = 3.0;

// Medium detail (FBM term)
pub const DETAIL_FREQUENCY: f64 = 0.02;
pub const DETAIL_AMPLITUDE: f64 = 1.0;

// FBM composition
pub const FBM_OCTAVES: u32 = 5;
pub const FBM_PERSISTENCE: f64 = 0.5; // amplitude multiplier per octave
pub const FBM_LACUNARITY: f64 = 2.0; // frequency multiplier per octave
pub const FBM_ROTATION: f64 = 0.5; // radians between octaves
pub const FBM_SHIFT: f64 = 100.0; // domain offset between octaves

// GPU-only surface motion (never part of the collision surface)
pub const RIPPLE_SPEED: f64 = 0.2;
pub const RIPPLE_AMPLITUDE: f64 = 0.2;
pub const HEAT_AMPLITUDE: f64 = 0.005;

// Player body
pub const PLAYER_HEIGHT: f32 = 1.8; // eye height above the sand
pub const WALK_SPEED: f32 = 5.0;
pub const RUN_SPEED: f32 = 9.0;
pub const JUMP_IMPULSE: f32 = 5.0;
pub const GRAVITY: f32 = 15.0;
pub const DAMPING: f32 = 5.0; // low enough for a drifting, floaty glide
pub const GROUND_TOLERANCE: f32 = 0.1; // how far above the sand still counts as grounded

// Start pose: outside the complex, looking at its centre
pub const START_POSITION: [f32; 3] = [20.0, 6.0, 20.0];
pub const START_YAW: f32 = std::f32::consts::FRAC_PI_4;
pub const START_PITCH: f32 = 0.0;

// Look
pub const MOUSE_SENSITIVITY: f32 = 0.002; // radians per pixel
pub const TOUCH_LOOK_SENSITIVITY: f32 = 0.005; // radians per pixel
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;
pub const ROTATION_SMOOTHING: f32 = 0.15; // per-frame lerp toward the look target
pub const MAX_POINTER_DELTA: f32 = 200.0; // px per event, larger jumps are clamped

// Movement input shaping
pub const KEY_SMOOTHING_RATE: f32 = 8.0; // 1/s, exponential approach to the held direction
pub const JOYSTICK_MAX_RADIUS: f32 = 50.0; // px
pub const JOYSTICK_DEADZONE: f32 = 0.12; // fraction of the radius ignored
pub const JOYSTICK_CURVE_EXPONENT: f32 = 2.0;
pub const TOUCH_SPLIT_FRACTION: f32 = 0.5; // left of this: joystick, right: look

// Pyramid footprints as (x, z, radius)
pub const PYRAMID_OBSTACLES: [[f32; 3]; 3] = [
    [0.0, 0.0, 7.0],     // Khufu
    [-12.0, -12.0, 6.5], // Khafre
    [10.0, 8.0, 4.0],    // Menkaure
];

// Body sway layered on top of the physics position
pub const BREATH_SWAY_AMPLITUDE: f64 = 0.05;
pub const BREATH_SWAY_MODULATION: f64 = 0.02; // slow wobble of the sway amplitude
pub const BREATH_SWAY_MODULATION_FREQ: f64 = 0.05; // rad/s
pub const HOVER_AMPLITUDE: f64 = 0.05;
pub const HOVER_FREQ: f64 = 0.5; // rad/s
pub const BOB_FREQ_WALK: f64 = 8.0;
pub const BOB_FREQ_RUN: f64 = 14.0;
pub const BOB_AMP_WALK: f64 = 0.08;
pub const BOB_AMP_RUN: f64 = 0.15;
pub const TREMOR_AMPLITUDE: f64 = 0.0001;
pub const ROLL_SWAY_AMPLITUDE: f64 = 0.002;
pub const PITCH_SWAY_AMPLITUDE: f64 = 0.001;

// Breathing cycle (seconds per stage)
pub const BREATH_INHALE_SEC: f64 = 4.0;
pub const BREATH_HOLD_SEC: f64 = 2.0;
pub const BREATH_EXHALE_SEC: f64 = 6.0;
pub const BREATH_PAUSE_SEC: f64 = 0.0;

// Wind gusts
pub const GUST_INTERVAL_MIN_SEC: f64 = 20.0;
pub const GUST_INTERVAL_MAX_SEC: f64 = 60.0;
pub const GUST_DURATION_MIN_SEC: f64 = 4.0;
pub const GUST_DURATION_MAX_SEC: f64 = 8.0;

// Ambience layer levels
pub const RUMBLE_BASE_GAIN: f64 = 0.10;
pub const RUMBLE_BREATH_GAIN: f64 = 0.10;
pub const WIND_BASE_GAIN: f64 = 0.10;
pub const WIND_GUST_GAIN: f64 = 0.25;
pub const WIND_BASE_FREQ_HZ: f64 = 300.0;
pub const WIND_GUST_FREQ_HZ: f64 = 250.0;
pub const WHISTLE_BASE_FREQ_HZ: f64 = 800.0;
pub const WHISTLE_GAIN: f64 = 0.15;
pub const SAND_GAIN: f64 = 0.08;
pub const SAND_THRESHOLD: f64 = 1.2; // swish only where the three waves overlap
pub const SAND_JITTER: f64 = 0.005;

// Synthesized buffers
pub const NOISE_BUFFER_SECONDS: f32 = 2.0;
pub const BROWN_LEAK: f32 = 1.02;
pub const BROWN_STEP: f32 = 0.02;
pub const BROWN_MAKEUP_GAIN: f32 = 3.5;
pub const REVERB_SECONDS: f32 = 2.5;
pub const REVERB_DECAY_POWER: f32 = 2.0;

#[inline]
pub fn start_position_vec3() -> glam::Vec3 {
    glam::Vec3::from_array(START_POSITION)
}
