// Browser-side tuning: DOM ids, frame pacing and the WebAudio graph

pub const CANVAS_ID: &str = "giza-canvas";

// Frame pacing
pub const MAX_FRAME_DT: f32 = 0.1; // seconds; longer stalls (tab switch) are clamped

// Envelope smoothing, in seconds (AudioParam.setTargetAtTime time constants)
pub const AUDIO_TAU_SLOW: f64 = 0.1;
pub const AUDIO_TAU_FAST: f64 = 0.05;

// Stop fade
pub const FADE_OUT_SEC: f64 = 1.0;
pub const FADE_FLOOR_GAIN: f32 = 0.001; // exponential ramps cannot reach zero
pub const SUSPEND_DELAY_MS: i32 = 1000;

// Reverb return level
pub const REVERB_WET_GAIN: f32 = 0.4;

// Layer filters
pub const RUMBLE_LOWPASS_HZ: f32 = 120.0;
pub const WIND_LOWPASS_Q: f32 = 0.5;
pub const WHISTLE_BANDPASS_Q: f32 = 4.0; // narrow enough to whistle
pub const SAND_HIGHPASS_HZ: f32 = 3000.0;
pub const SAND_HIGHPASS_Q: f32 = 1.0;
