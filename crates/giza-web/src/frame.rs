use crate::audio::AmbienceGraph;
use crate::constants::MAX_FRAME_DT;
use crate::dom;
use giza_core::{
    AmbienceEngine, CameraPose, InputAggregator, Lens, NavigationController, SessionClock,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one animation frame reads or writes. Event handlers share it
/// through `Rc<RefCell<..>>` and only ever touch `input`.
pub struct FrameContext {
    pub canvas: web::HtmlCanvasElement,
    pub input: InputAggregator,
    pub nav: NavigationController,
    pub ambience: AmbienceEngine,
    pub audio: Option<AmbienceGraph>,
    pub clock: SessionClock,
    pub lens: Lens,
    pub pose: CameraPose,
    pub last_instant: Instant,
    pub frames: u64,
}

impl FrameContext {
    pub fn new(
        canvas: web::HtmlCanvasElement,
        input: InputAggregator,
        nav: NavigationController,
        ambience: AmbienceEngine,
    ) -> Self {
        let clock = SessionClock::start();
        let lens = Lens {
            aspect: dom::canvas_aspect(&canvas),
            ..Lens::default()
        };
        let pose = nav.camera_pose(0.0);
        Self {
            canvas,
            input,
            nav,
            ambience,
            audio: None,
            clock,
            lens,
            pose,
            last_instant: Instant::now(),
            frames: 0,
        }
    }

    /// Input, physics, pose, then audio targets; in that order.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let raw_dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let dt = raw_dt.min(MAX_FRAME_DT);
        if raw_dt > MAX_FRAME_DT {
            log::debug!("[frame] stalled {:.3}s, stepping {:.3}s", raw_dt, dt);
        }

        let input = self.input.sample(dt);
        let report = self.nav.step(&input, dt);

        // sway and wind read session time, never the clamped delta
        let t = self.clock.seconds();
        self.pose = self.nav.camera_pose(t);
        let targets = self.ambience.targets(t);
        if let Some(audio) = &self.audio {
            audio.apply(&targets);
        }

        self.frames += 1;
        if self.frames % 600 == 0 {
            let p = self.nav.state().position;
            log::debug!(
                "[frame] #{} t={:.1}s pos=({:.1},{:.1},{:.1}) grounded={} breath={:.2} gust={:.2}",
                self.frames,
                t,
                p.x,
                p.y,
                p.z,
                report.grounded,
                targets.breath,
                targets.gust.strength
            );
        }
    }

    pub fn resize(&mut self) {
        dom::sync_canvas_backing_size(&self.canvas);
        self.lens.aspect = dom::canvas_aspect(&self.canvas);
    }
}

/// A running requestAnimationFrame chain. Dropping it cancels the pending
/// frame and frees the callback.
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(frame_ctx: Rc<RefCell<FrameContext>>) -> Self {
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let tick_clone = tick.clone();
        let handle_clone = handle.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            frame_ctx.borrow_mut().frame();
            handle_clone.set(request_frame(&tick_clone));
        }) as Box<dyn FnMut()>));

        handle.set(request_frame(&tick));
        log::info!("[frame] loop started");
        Self { tick, handle }
    }

    pub fn stop(&mut self) {
        if let Some(h) = self.handle.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(h);
            }
        }
        // breaks the closure's reference back to `tick`
        if self.tick.borrow_mut().take().is_some() {
            log::info!("[frame] loop stopped");
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let w = web::window()?;
    let tick = tick.borrow();
    let cb = tick.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
