use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::window;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Owned requestAnimationFrame loop.
///
/// The frame closure re-arms itself only while `active` is set, so stopping
/// is a flag flip plus cancelling the one pending request.
pub struct RenderTask {
    active: Rc<Cell<bool>>,
    // `f` holds the animation-frame closure so it can keep requesting
    // itself. The `Option` lets the closure be created first and then
    // reach itself through the shared cell.
    frame: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl RenderTask {
    /// Schedules `step` once per display refresh with the frame timestamp in
    /// milliseconds.
    pub fn start(mut step: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let active = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let f: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        let (a, p) = (active.clone(), pending.clone());
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            p.set(None);
            if !a.get() {
                return;
            }
            step(now);

            // schedule next
            match request_frame(&f) {
                Ok(id) => p.set(Some(id)),
                Err(e) => {
                    log::error!("render loop stopped: {e:?}");
                    a.set(false);
                }
            }
        }) as Box<dyn FnMut(f64)>));

        pending.set(Some(request_frame(&g)?));

        Ok(Self {
            active,
            frame: g,
            pending,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stops re-arming and releases the frame closure. Must not be called
    /// from inside the frame step.
    pub fn stop(&self) {
        self.active.set(false);
        if let Some(id) = self.pending.take() {
            if let Some(w) = window() {
                w.cancel_animation_frame(id).ok();
            }
        }
        self.frame.borrow_mut().take();
    }
}

impl Drop for RenderTask {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(frame: &Rc<RefCell<Option<FrameCallback>>>) -> Result<i32, JsValue> {
    let frame = frame.borrow();
    let cb = frame.as_ref().ok_or("render task released")?;
    window()
        .ok_or("no window")?
        .request_animation_frame(cb.as_ref().unchecked_ref())
}
