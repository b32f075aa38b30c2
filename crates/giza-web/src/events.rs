use crate::dom;
use crate::frame::FrameContext;
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An attached DOM listener. Dropping it detaches the callback, so a
/// `Vec<Listener>` is the whole teardown story for input.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let attached = match passive {
            Some(p) => {
                let opts = web::AddEventListenerOptions::new();
                opts.set_passive(p);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    callback.as_ref().unchecked_ref(),
                    &opts,
                )
            }
            None => {
                target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            }
        };
        attached.map_err(|e| anyhow!("[input] failed to attach {kind}: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Keyboard, mouse look, pointer lock and touch, all funnelled into the
/// shared `InputAggregator`.
pub fn wire_input(
    window: &web::Window,
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    frame_ctx: &Rc<RefCell<FrameContext>>,
) -> Result<Vec<Listener>> {
    let win: &web::EventTarget = window.as_ref();
    let doc: &web::EventTarget = document.as_ref();
    let cnv: &web::EventTarget = canvas.as_ref();
    let mut listeners = Vec::with_capacity(14);

    // Keyboard
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(win, "keydown", None, move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() {
                if ctx.borrow_mut().input.key_down(&ev.code()) {
                    // keep Space and arrows from scrolling the page
                    ev.prevent_default();
                }
            }
        })?);
    }
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(win, "keyup", None, move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() {
                ctx.borrow_mut().input.key_up(&ev.code());
            }
        })?);
    }
    {
        // keyup never arrives once focus is gone
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(win, "blur", None, move |_| {
            log::debug!("[input] blur, releasing held keys");
            ctx.borrow_mut().input.release_all();
        })?);
    }

    // Mouse look: pointer lock on desktop, click-drag as a fallback
    {
        let canvas = canvas.clone();
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(cnv, "click", None, move |_| {
            if !ctx.borrow().input.pointer_locked() {
                canvas.request_pointer_lock();
            }
        })?);
    }
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(cnv, "mousedown", None, move |_| {
            ctx.borrow_mut().input.set_dragging(true);
        })?);
    }
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(win, "mouseup", None, move |_| {
            ctx.borrow_mut().input.set_dragging(false);
        })?);
    }
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(doc, "mousemove", None, move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
                ctx.borrow_mut()
                    .input
                    .mouse_move(ev.movement_x() as f32, ev.movement_y() as f32);
            }
        })?);
    }
    {
        let document = document.clone();
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(doc, "pointerlockchange", None, move |_| {
            let locked = document.pointer_lock_element().is_some();
            ctx.borrow_mut().input.set_pointer_locked(locked);
        })?);
    }

    // Touch: left half steers, right half looks
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(cnv, "touchstart", Some(false), move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::TouchEvent>() {
                ev.prevent_default();
                let width = dom::viewport_width();
                let mut c = ctx.borrow_mut();
                for_each_changed_touch(ev, |id, x, y| c.input.touch_start(id, x, y, width));
            }
        })?);
    }
    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(cnv, "touchmove", Some(false), move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::TouchEvent>() {
                ev.prevent_default();
                let mut c = ctx.borrow_mut();
                for_each_changed_touch(ev, |id, x, y| c.input.touch_move(id, x, y));
            }
        })?);
    }
    for kind in ["touchend", "touchcancel"] {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(cnv, kind, Some(false), move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::TouchEvent>() {
                ev.prevent_default();
                let mut c = ctx.borrow_mut();
                for_each_changed_touch(ev, |id, _, _| c.input.touch_end(id));
            }
        })?);
    }

    {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::new(win, "resize", None, move |_| {
            ctx.borrow_mut().resize();
        })?);
    }

    log::info!("[input] {} listeners attached", listeners.len());
    Ok(listeners)
}

fn for_each_changed_touch(ev: &web::TouchEvent, mut f: impl FnMut(i32, f32, f32)) {
    let touches = ev.changed_touches();
    for i in 0..touches.length() {
        if let Some(t) = touches.get(i) {
            f(t.identifier(), t.client_x() as f32, t.client_y() as f32);
        }
    }
}
