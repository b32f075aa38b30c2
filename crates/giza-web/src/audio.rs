//! WebAudio graph for the desert ambience.
//!
//! Four looping noise layers, each `source -> filter -> [panner] -> gain`,
//! straight to the destination. Rumble and wind also feed a convolution
//! reverb; whistle and sand stay dry and close. The graph never computes an
//! envelope itself: [`AmbienceGraph::apply`] glides every parameter toward
//! the targets produced by `giza_core::ambience`.

use crate::constants::{
    AUDIO_TAU_FAST, AUDIO_TAU_SLOW, FADE_FLOOR_GAIN, FADE_OUT_SEC, REVERB_WET_GAIN,
    RUMBLE_LOWPASS_HZ, SAND_HIGHPASS_HZ, SAND_HIGHPASS_Q, SUSPEND_DELAY_MS, WHISTLE_BANDPASS_Q,
    WIND_LOWPASS_Q,
};
use giza_core::ambience::{
    noise_samples, reverb_impulse, AmbienceTargets, NoiseColor, PlaybackGate, StopAction,
};
use giza_core::constants::NOISE_BUFFER_SECONDS;
use rand::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode, JsValue> {
    let g = web::GainNode::new(ctx).map_err(|e| {
        log::error!("[audio] {} GainNode error: {:?}", label, e);
        e
    })?;
    g.gain().set_value(value);
    Ok(g)
}

fn noise_buffer(
    ctx: &web::AudioContext,
    color: NoiseColor,
    rng: &mut StdRng,
) -> Result<web::AudioBuffer, JsValue> {
    let sr = ctx.sample_rate();
    let len = (sr * NOISE_BUFFER_SECONDS) as usize;
    let mut samples = noise_samples(color, len, rng);
    let buffer = ctx.create_buffer(1, len as u32, sr)?;
    buffer.copy_to_channel(&mut samples, 0)?;
    Ok(buffer)
}

fn impulse_buffer(ctx: &web::AudioContext, rng: &mut StdRng) -> Result<web::AudioBuffer, JsValue> {
    let sr = ctx.sample_rate();
    let channels = reverb_impulse(sr, rng);
    let len = channels[0].len() as u32;
    let buffer = ctx.create_buffer(2, len, sr)?;
    for (ch, mut data) in channels.into_iter().enumerate() {
        buffer.copy_to_channel(&mut data, ch as i32)?;
    }
    Ok(buffer)
}

struct LayerConfig<'a> {
    label: &'static str,
    buffer: &'a web::AudioBuffer,
    filter: web::BiquadFilterType,
    frequency: Option<f32>,
    q: Option<f32>,
    panned: bool,
    reverb: Option<&'a web::ConvolverNode>,
}

struct Layer {
    source: web::AudioBufferSourceNode,
    filter: web::BiquadFilterNode,
    panner: Option<web::StereoPannerNode>,
    gain: web::GainNode,
}

impl Layer {
    fn build(ctx: &web::AudioContext, cfg: LayerConfig<'_>) -> Result<Self, JsValue> {
        let source = ctx.create_buffer_source()?;
        source.set_buffer(Some(cfg.buffer));
        source.set_loop(true);

        let filter = web::BiquadFilterNode::new(ctx)?;
        filter.set_type(cfg.filter);
        if let Some(f) = cfg.frequency {
            filter.frequency().set_value(f);
        }
        if let Some(q) = cfg.q {
            filter.q().set_value(q);
        }

        // silent until the first envelope update
        let gain = create_gain(ctx, 0.0, cfg.label)?;

        source.connect_with_audio_node(&filter)?;
        let panner = if cfg.panned {
            let p = web::StereoPannerNode::new(ctx)?;
            filter.connect_with_audio_node(&p)?;
            p.connect_with_audio_node(&gain)?;
            Some(p)
        } else {
            filter.connect_with_audio_node(&gain)?;
            None
        };
        gain.connect_with_audio_node(&ctx.destination())?;
        if let Some(reverb) = cfg.reverb {
            gain.connect_with_audio_node(reverb)?;
        }
        web::AudioScheduledSourceNode::start(&source)?;
        Ok(Self {
            source,
            filter,
            panner,
            gain,
        })
    }

    fn glide_gain(&self, value: f64, now: f64, tau: f64) {
        let _ = self.gain.gain().set_target_at_time(value as f32, now, tau);
    }

    fn glide_frequency(&self, hz: f64, now: f64, tau: f64) {
        let _ = self.filter.frequency().set_target_at_time(hz as f32, now, tau);
    }

    fn glide_pan(&self, pan: f64, now: f64) {
        if let Some(p) = &self.panner {
            let _ = p.pan().set_target_at_time(pan as f32, now, AUDIO_TAU_SLOW);
        }
    }

    fn fade_out(&self, now: f64) {
        let param = self.gain.gain();
        let _ = param.cancel_scheduled_values(now);
        // anchor the ramp at the current level
        let _ = param.set_value_at_time(param.value().max(FADE_FLOOR_GAIN), now);
        let _ = param.exponential_ramp_to_value_at_time(FADE_FLOOR_GAIN, now + FADE_OUT_SEC);
    }

    fn silence(&self, now: f64) {
        let param = self.gain.gain();
        let _ = param.cancel_scheduled_values(now);
        let _ = param.set_value_at_time(0.0, now);
    }

    fn release_schedule(&self, now: f64) {
        let _ = self.gain.gain().cancel_scheduled_values(now);
    }
}

pub struct AmbienceGraph {
    ctx: web::AudioContext,
    rumble: Layer,
    wind: Layer,
    whistle: Layer,
    sand: Layer,
    // shared with the delayed suspend so a later start cancels it
    gate: Rc<Cell<PlaybackGate>>,
}

impl AmbienceGraph {
    /// Must run inside a user gesture or the context starts suspended.
    pub fn build() -> Result<Self, JsValue> {
        let ctx = web::AudioContext::new()?;
        let mut rng = StdRng::from_entropy();

        let white = noise_buffer(&ctx, NoiseColor::White, &mut rng)?;
        let brown = noise_buffer(&ctx, NoiseColor::Brown, &mut rng)?;

        let reverb = web::ConvolverNode::new(&ctx)?;
        reverb.set_buffer(Some(&impulse_buffer(&ctx, &mut rng)?));
        let reverb_wet = create_gain(&ctx, REVERB_WET_GAIN, "reverb wet")?;
        reverb.connect_with_audio_node(&reverb_wet)?;
        reverb_wet.connect_with_audio_node(&ctx.destination())?;

        let rumble = Layer::build(
            &ctx,
            LayerConfig {
                label: "rumble",
                buffer: &brown,
                filter: web::BiquadFilterType::Lowpass,
                frequency: Some(RUMBLE_LOWPASS_HZ),
                q: None,
                panned: false,
                reverb: Some(&reverb),
            },
        )?;
        let wind = Layer::build(
            &ctx,
            LayerConfig {
                label: "wind",
                buffer: &white,
                filter: web::BiquadFilterType::Lowpass,
                frequency: None,
                q: Some(WIND_LOWPASS_Q),
                panned: true,
                reverb: Some(&reverb),
            },
        )?;
        let whistle = Layer::build(
            &ctx,
            LayerConfig {
                label: "whistle",
                buffer: &white,
                filter: web::BiquadFilterType::Bandpass,
                frequency: None,
                q: Some(WHISTLE_BANDPASS_Q),
                panned: true,
                reverb: None,
            },
        )?;
        let sand = Layer::build(
            &ctx,
            LayerConfig {
                label: "sand",
                buffer: &white,
                filter: web::BiquadFilterType::Highpass,
                frequency: Some(SAND_HIGHPASS_HZ),
                q: Some(SAND_HIGHPASS_Q),
                panned: true,
                reverb: None,
            },
        )?;

        log::info!("[audio] graph built at {} Hz", ctx.sample_rate());
        Ok(Self {
            ctx,
            rumble,
            wind,
            whistle,
            sand,
            gate: Rc::new(Cell::new(PlaybackGate::default())),
        })
    }

    pub fn is_playing(&self) -> bool {
        self.gate.get().is_playing()
    }

    fn update_gate<R>(&self, f: impl FnOnce(&mut PlaybackGate) -> R) -> R {
        let mut gate = self.gate.get();
        let out = f(&mut gate);
        self.gate.set(gate);
        out
    }

    fn layers(&self) -> [&Layer; 4] {
        [&self.rumble, &self.wind, &self.whistle, &self.sand]
    }

    /// Resume the context and hand the gains back to the envelope.
    pub fn start(&mut self) {
        self.update_gate(PlaybackGate::start);
        let now = self.ctx.current_time();
        for layer in self.layers() {
            layer.release_schedule(now);
        }
        if self.ctx.state() == web::AudioContextState::Suspended {
            match self.ctx.resume() {
                Ok(promise) => spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("[audio] resume rejected: {:?}", e);
                    }
                }),
                Err(e) => log::warn!("[audio] resume failed: {:?}", e),
            }
        }
        log::info!("[audio] start");
    }

    /// Ramp every layer down over a second, then suspend the context. A
    /// context that is not running yet (resume still pending) is silenced at
    /// once so the late resume comes back muted.
    pub fn stop(&mut self) {
        let running = self.ctx.state() == web::AudioContextState::Running;
        let Some((action, stopped_at)) = self.update_gate(|g| g.stop(running)) else {
            return;
        };
        let now = self.ctx.current_time();
        for layer in self.layers() {
            match action {
                StopAction::FadeOut => layer.fade_out(now),
                StopAction::Mute => layer.silence(now),
            }
        }

        let ctx = self.ctx.clone();
        let gate = self.gate.clone();
        let suspend = Closure::once_into_js(move || {
            if !gate.get().suspend_allowed(stopped_at) {
                return;
            }
            if let Err(e) = ctx.suspend() {
                log::warn!("[audio] suspend failed: {:?}", e);
            }
        });
        if let Some(w) = web::window() {
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                suspend.unchecked_ref(),
                SUSPEND_DELAY_MS,
            );
        }
        log::info!("[audio] stop ({:?})", action);
    }

    /// Glide the graph toward this frame's targets.
    pub fn apply(&self, t: &AmbienceTargets) {
        if !self.is_playing() {
            return;
        }
        let now = self.ctx.current_time();

        self.rumble.glide_gain(t.rumble_gain, now, AUDIO_TAU_SLOW);

        self.wind.glide_frequency(t.wind_cutoff_hz, now, AUDIO_TAU_SLOW);
        self.wind.glide_gain(t.wind_gain, now, AUDIO_TAU_SLOW);
        self.wind.glide_pan(t.wind_pan, now);

        self.whistle.glide_frequency(t.whistle_center_hz, now, AUDIO_TAU_FAST);
        self.whistle.glide_gain(t.whistle_gain, now, AUDIO_TAU_FAST);
        self.whistle.glide_pan(t.whistle_pan, now);

        self.sand.glide_gain(t.sand_gain, now, AUDIO_TAU_FAST);
        self.sand.glide_pan(t.sand_pan, now);
    }

    /// Stop the sources and release the context for good.
    pub fn close(&mut self) {
        self.update_gate(PlaybackGate::close);
        for layer in self.layers() {
            let _ = web::AudioScheduledSourceNode::stop(&layer.source);
        }
        if let Err(e) = self.ctx.close() {
            log::warn!("[audio] close failed: {:?}", e);
        }
        log::info!("[audio] closed");
    }
}
