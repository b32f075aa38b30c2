//! Simulation core for the Giza dune walk: terrain height field, first-person
//! navigation, breath rhythm and ambience envelopes. No browser types in here;
//! `giza-web` drives it from the page.

pub mod ambience;
pub mod breath;
pub mod camera;
pub mod clock;
pub mod constants;
pub mod error;
pub mod input;
pub mod navigation;
pub mod noise;
pub mod shader;
pub mod terrain;

pub use ambience::{
    AmbienceEngine, AmbienceParams, AmbienceTargets, GustMachine, GustParams, PlaybackGate,
    StopAction,
};
pub use breath::{breath_phase, BreathPattern, BreathStage};
pub use camera::{CameraPose, Lens, SwayParams};
pub use clock::SessionClock;
pub use error::ConfigError;
pub use input::{FrameInput, InputAggregator, InputParams, KeyAction, KeyBindings};
pub use navigation::{NavigationController, NavigationParams, NavigationState, Obstacle};
pub use noise::{fbm, simplex2, Fbm};
pub use shader::{terrain_wgsl, TerrainUniforms};
pub use terrain::{TerrainHeightField, TerrainParams};
