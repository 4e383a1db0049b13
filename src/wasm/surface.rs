use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, Node, ResizeObserver,
    WebGl2RenderingContext as GL,
};

use super::gl::{self as glutil, CardGeometry, GlProgram};
use super::render::RenderTask;
use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::pointer::{self, ClientRect, PointerCell};
use crate::shader::{self, UniformValue};
use crate::state::CardModel;

/// A DOM listener we registered and must remove on dispose.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, SurfaceError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }

    fn remove(self) {
        self.target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            .ok();
    }
}

/// Watches the host element's own box, which can change without the window
/// resizing (layout, container queries, style changes).
struct HostObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl HostObserver {
    fn observe(host: &HtmlElement, dirty: Rc<Cell<bool>>) -> Result<Self, SurfaceError> {
        let callback = Closure::wrap(Box::new(move |_entries: js_sys::Array| dirty.set(true))
            as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(host);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    fn disconnect(self) {
        self.observer.disconnect();
    }
}

/// Fractional `clientX`/`clientY` of a pointer event. `MouseEvent::client_x`
/// truncates to whole pixels.
pub fn client_position(event: &JsValue) -> Option<(f64, f64)> {
    let read = |key: &str| {
        js_sys::Reflect::get(event, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    Some((read("clientX")?, read("clientY")?))
}

/// Everything the frame step touches.
struct Frame {
    gl: GL,
    canvas: HtmlCanvasElement,
    host: HtmlElement,
    program: GlProgram,
    geometry: CardGeometry,
    model: CardModel,
    config: SurfaceConfig,
}

impl Frame {
    fn render(&mut self, now: f64, pointer: &PointerCell, resize_dirty: &Cell<bool>) {
        if resize_dirty.replace(false) {
            self.resync_size();
        }
        if let Err(e) = self.model.step(now, pointer.take()) {
            log::error!("frame step failed: {e}");
            return;
        }

        let (w, h) = self.model.state().viewport;
        let [r, g, b, a] = self.config.clear_color;
        self.gl.viewport(0, 0, w as i32, h as i32);
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        self.program.upload(&self.gl, self.model.uniforms());
        self.geometry.draw(&self.gl);
    }

    /// Re-derives backing size, camera aspect and `resolution` in one go.
    fn resync_size(&mut self) {
        let (w, h) = backing_size(&self.host, &self.config);
        if (w, h) == self.model.state().viewport {
            return;
        }
        size_canvas(&self.canvas, &self.host, w, h);
        match self.model.resize(w, h) {
            Ok(()) => log::debug!("card surface resized to {w}x{h}"),
            Err(e) => log::error!("resize failed: {e}"),
        }
    }

    fn release(&self) {
        self.geometry.delete(&self.gl);
        self.program.delete(&self.gl);
        glutil::lose_context(&self.gl);
    }
}

/// A mounted holographic card: canvas, WebGL2 context, program, geometry,
/// listeners and render loop, all owned by one value.
pub struct CardSurface {
    host: HtmlElement,
    canvas: HtmlCanvasElement,
    frame: Rc<RefCell<Frame>>,
    task: Option<RenderTask>,
    listeners: Vec<Listener>,
    observer: Option<HostObserver>,
    disposed: bool,
}

impl CardSurface {
    pub fn mount(host: &HtmlElement, config: SurfaceConfig) -> Result<Self, SurfaceError> {
        config.validate()?;
        let document = host
            .owner_document()
            .ok_or_else(|| SurfaceError::Dom("host is not in a document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| SurfaceError::Dom("created element is not a canvas".into()))?;

        let (width, height) = backing_size(host, &config);
        size_canvas(&canvas, host, width, height);
        host.append_child(&canvas)?;

        let built = Self::build(host, &canvas, config, width, height);
        if built.is_err() {
            detach(host, &canvas);
        }
        built
    }

    fn build(
        host: &HtmlElement,
        canvas: &HtmlCanvasElement,
        config: SurfaceConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .ok_or(SurfaceError::RenderContextUnavailable)?
            .dyn_into()
            .map_err(|_| SurfaceError::RenderContextUnavailable)?;
        gl.enable(GL::DEPTH_TEST);

        let model = CardModel::new(&config, width, height)?;
        let program = GlProgram::build(&gl, model.program())?;
        let geometry = match CardGeometry::upload(&gl, &model.scene().card) {
            Ok(g) => g,
            Err(e) => {
                program.delete(&gl);
                return Err(e);
            }
        };

        let frame = Rc::new(RefCell::new(Frame {
            gl,
            canvas: canvas.clone(),
            host: host.clone(),
            program,
            geometry,
            model,
            config: config.clone(),
        }));

        // from here on, dropping `surface` on error releases everything
        let mut surface = Self {
            host: host.clone(),
            canvas: canvas.clone(),
            frame: frame.clone(),
            task: None,
            listeners: Vec::new(),
            observer: None,
            disposed: false,
        };

        let pointer_cell = PointerCell::new();
        let resize_dirty = Rc::new(Cell::new(false));

        let writer = pointer_cell.clone();
        let bounds = host.clone();
        surface.listeners.push(Listener::add(
            host.clone().into(),
            "mousemove",
            move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let r = bounds.get_bounding_client_rect();
                let rect = ClientRect {
                    left: r.left(),
                    top: r.top(),
                    width: r.width(),
                    height: r.height(),
                };
                if rect.width <= 0.0 || rect.height <= 0.0 {
                    return;
                }
                let js: &JsValue = event;
                let (x, y) = client_position(js)
                    .unwrap_or((event.client_x() as f64, event.client_y() as f64));
                writer.push(pointer::normalize(x, y, &rect));
            },
        )?);

        if config.track_resize {
            let win = window().ok_or_else(|| SurfaceError::Dom("no window".into()))?;
            let dirty = resize_dirty.clone();
            surface
                .listeners
                .push(Listener::add(win.into(), "resize", move |_| dirty.set(true))?);
            surface.observer = Some(HostObserver::observe(host, resize_dirty.clone())?);
        }

        surface.task = Some(RenderTask::start(move |now| {
            frame
                .borrow_mut()
                .render(now, &pointer_cell, &resize_dirty);
        })?);

        log::info!("card surface mounted at {width}x{height}");
        Ok(surface)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(RenderTask::is_active)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame.borrow().model.frame_index()
    }

    pub fn elapsed_time(&self) -> f64 {
        self.frame.borrow().model.state().elapsed_time
    }

    /// Latest normalized pointer applied by the frame step.
    pub fn pointer(&self) -> Vec2 {
        self.frame.borrow().model.state().pointer
    }

    /// Current card rotation about X and Y, radians.
    pub fn rotation(&self) -> Vec2 {
        self.frame.borrow().model.state().rotation
    }

    pub fn mouse_uniform(&self) -> Option<Vec2> {
        match self.frame.borrow().model.uniforms().get(shader::U_MOUSE) {
            Some(UniformValue::Vec2(v)) => Some(v),
            _ => None,
        }
    }

    pub fn is_observing_host(&self) -> bool {
        self.observer.is_some()
    }

    pub fn is_context_lost(&self) -> bool {
        self.frame.borrow().gl.is_context_lost()
    }

    /// Stops the loop, removes listeners, frees GPU objects and detaches the
    /// canvas. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(task) = self.task.take() {
            task.stop();
        }
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.frame.borrow().release();
        detach(&self.host, &self.canvas);
        log::info!("card surface disposed");
    }
}

impl Drop for CardSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn device_pixel_ratio() -> f64 {
    window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Backing-store size in device pixels for the host's current CSS size.
fn backing_size(host: &HtmlElement, config: &SurfaceConfig) -> (u32, u32) {
    config.backing_size(
        host.client_width().max(0) as u32,
        host.client_height().max(0) as u32,
        device_pixel_ratio(),
    )
}

fn size_canvas(canvas: &HtmlCanvasElement, host: &HtmlElement, width: u32, height: u32) {
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    style
        .set_property("width", &format!("{}px", host.client_width()))
        .ok();
    style
        .set_property("height", &format!("{}px", host.client_height()))
        .ok();
    style.set_property("display", "block").ok();
}

fn detach(host: &HtmlElement, canvas: &HtmlCanvasElement) {
    let host_node: &Node = host;
    let attached = canvas
        .parent_node()
        .is_some_and(|parent| parent.is_same_node(Some(host_node)));
    if attached {
        host.remove_child(canvas).ok();
    }
}
