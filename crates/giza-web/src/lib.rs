#![cfg(target_arch = "wasm32")]
//! Browser front-end for the Giza dune walk.
//!
//! Owns the DOM listeners, the requestAnimationFrame loop and the WebAudio
//! ambience. The renderer lives in JavaScript and pulls everything it needs
//! from [`Experience`]: the camera pose each frame, terrain heights for
//! placing props, and the WGSL that displaces the dune plane.

mod audio;
mod constants;
mod dom;
mod events;
mod frame;

use crate::audio::AmbienceGraph;
use crate::events::Listener;
use crate::frame::{FrameContext, FrameLoop};
use anyhow::anyhow;
use giza_core::{
    AmbienceEngine, AmbienceParams, BreathPattern, InputAggregator, InputParams, KeyBindings,
    NavigationController, TerrainUniforms,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("giza-web starting");
    Ok(())
}

fn to_js(e: anyhow::Error) -> JsValue {
    log::error!("{:#}", e);
    JsValue::from_str(&format!("{:#}", e))
}

#[wasm_bindgen]
pub struct Experience {
    frame_ctx: Rc<RefCell<FrameContext>>,
    listeners: Vec<Listener>,
    frame_loop: Option<FrameLoop>,
}

#[wasm_bindgen]
impl Experience {
    /// Attach to `#giza-canvas` (or the given id), wire input and start the
    /// frame loop. Audio stays off until [`Experience::start_audio`] runs
    /// inside a user gesture.
    pub fn mount(canvas_id: Option<String>) -> Result<Experience, JsValue> {
        Self::try_mount(canvas_id.as_deref().unwrap_or(constants::CANVAS_ID)).map_err(to_js)
    }

    /// `[x, y, z, qx, qy, qz, qw]` of the eye for the latest frame.
    pub fn camera_pose(&self) -> js_sys::Float32Array {
        let pose = self.frame_ctx.borrow().pose.to_array();
        js_sys::Float32Array::from(&pose[..])
    }

    /// Column-major view-projection for the latest pose and canvas aspect.
    pub fn view_projection(&self) -> js_sys::Float32Array {
        let c = self.frame_ctx.borrow();
        let m = c.lens.view_projection(&c.pose).to_cols_array();
        js_sys::Float32Array::from(&m[..])
    }

    /// The 80-byte uniform block for `terrain_shader()` at the current frame.
    pub fn terrain_uniforms(&self) -> js_sys::Uint8Array {
        let c = self.frame_ctx.borrow();
        let uniforms =
            TerrainUniforms::new(c.lens.view_projection(&c.pose), c.clock.seconds() as f32);
        js_sys::Uint8Array::from(bytemuck::bytes_of(&uniforms))
    }

    pub fn session_time(&self) -> f64 {
        self.frame_ctx.borrow().clock.seconds()
    }

    /// Collision surface height at world `(x, z)`.
    pub fn terrain_height(&self, x: f32, z: f32) -> f32 {
        self.frame_ctx.borrow().nav.terrain().height_f32(x, z)
    }

    /// Heights for interleaved `[x0, z0, x1, z1, ..]`.
    pub fn heights(&self, xz: &[f32]) -> Vec<f32> {
        self.frame_ctx.borrow().nav.terrain().heights_interleaved(xz)
    }

    pub fn grounded(&self) -> bool {
        self.frame_ctx.borrow().nav.is_grounded()
    }

    /// Build the graph on first use, then fade it in. Call from a click.
    pub fn start_audio(&mut self) -> Result<(), JsValue> {
        let mut c = self.frame_ctx.borrow_mut();
        if c.audio.is_none() {
            c.audio = Some(AmbienceGraph::build()?);
        }
        if let Some(audio) = c.audio.as_mut() {
            audio.start();
        }
        Ok(())
    }

    pub fn stop_audio(&mut self) {
        if let Some(audio) = self.frame_ctx.borrow_mut().audio.as_mut() {
            audio.stop();
        }
    }

    /// Returns whether audio is playing afterwards.
    pub fn toggle_audio(&mut self) -> Result<bool, JsValue> {
        if self.audio_playing() {
            self.stop_audio();
        } else {
            self.start_audio()?;
        }
        Ok(self.audio_playing())
    }

    pub fn audio_playing(&self) -> bool {
        self.frame_ctx
            .borrow()
            .audio
            .as_ref()
            .map_or(false, AmbienceGraph::is_playing)
    }

    /// Stop the loop, detach every listener, close audio and release
    /// pointer lock. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        let detached = self.listeners.len();
        self.listeners.clear();

        let mut c = self.frame_ctx.borrow_mut();
        if let Some(mut audio) = c.audio.take() {
            audio.close();
        }
        c.input.release_all();
        if c.input.pointer_locked() {
            if let Some(document) = dom::window_document() {
                document.exit_pointer_lock();
            }
            c.input.set_pointer_locked(false);
        }
        if detached > 0 {
            log::info!("[input] {} listeners detached", detached);
        }
    }
}

impl Experience {
    fn try_mount(canvas_id: &str) -> anyhow::Result<Experience> {
        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;
        let canvas = dom::canvas_by_id(&document, canvas_id)?;
        dom::sync_canvas_backing_size(&canvas);

        let input = InputAggregator::new(InputParams::default(), KeyBindings::default())?;
        let nav = NavigationController::default();
        let ambience = AmbienceEngine::new(
            AmbienceParams::default(),
            BreathPattern::default(),
            rand::random::<u64>(),
            0.0,
        )?;

        let frame_ctx = Rc::new(RefCell::new(FrameContext::new(
            canvas.clone(),
            input,
            nav,
            ambience,
        )));
        let listeners = events::wire_input(&window, &document, &canvas, &frame_ctx)?;
        let frame_loop = FrameLoop::start(frame_ctx.clone());

        let p = frame_ctx.borrow().nav.state().position;
        log::info!("[nav] mounted at ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
        Ok(Experience {
            frame_ctx,
            listeners,
            frame_loop: Some(frame_loop),
        })
    }
}

impl Drop for Experience {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Breath phase in `[0, 1]` for the default pattern at `t` seconds.
#[wasm_bindgen]
pub fn breath_phase(t: f64) -> f64 {
    giza_core::breath_phase(t)
}

/// WGSL for the dune plane, generated from the default terrain parameters.
#[wasm_bindgen]
pub fn terrain_shader() -> String {
    giza_core::terrain_wgsl(&giza_core::TerrainParams::default())
}
