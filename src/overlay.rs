// overlay.rs - Mount session and frame driver
//
// One Session per mount, owned behind an Rc shared with the event and
// animation-frame callbacks. All shared state lives in Cells/RefCells; the
// host's single-threaded dispatch is the only synchronization needed.
// teardown() is the sole release path for every acquired resource.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver};

use crate::audio::AudioLoop;
use crate::config::OverlayConfig;
use crate::render::Painter;
use crate::sim::{PointerPos, RainWorld};

/// Handle to a mounted overlay. Dropping it without calling `unmount`
/// leaves the animation running; the host page owns the lifecycle.
#[wasm_bindgen]
pub struct RainOverlay {
    session: Option<Rc<Session>>,
}

#[wasm_bindgen]
impl RainOverlay {
    /// Mount the overlay into `container`: a transparent, click-through
    /// canvas stacked above the page content. A missing 2d context aborts
    /// the mount silently and returns an inert handle.
    pub fn mount(container: HtmlElement, config: &OverlayConfig) -> Result<RainOverlay, JsValue> {
        let session = match Session::create(container, config)? {
            Some(session) => session,
            None => return Ok(RainOverlay { session: None }),
        };

        session.attach_listeners()?;
        session.start_frame_loop();

        if config.sound() && !config.sound_src().is_empty() {
            session.audio.start(&config.sound_src(), config.volume());
        }

        Ok(RainOverlay {
            session: Some(session),
        })
    }

    /// Tear down: cancel the pending frame, detach listeners, release
    /// audio, remove the canvas. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(session) = self.session.take() {
            session.teardown();
        }
    }
}

struct Session {
    alive: Cell<bool>,
    container: HtmlElement,
    canvas: HtmlCanvasElement,

    world: RefCell<RainWorld>,
    painter: Painter,
    pointer: Cell<PointerPos>,
    audio: AudioLoop,

    // Pending animation frame and the callbacks kept alive for its lifetime
    frame: Cell<Option<i32>>,
    raf: RefCell<Option<Closure<dyn FnMut()>>>,
    on_pointer: RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>,
    observer: RefCell<Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>>,
}

impl Session {
    fn create(container: HtmlElement, config: &OverlayConfig) -> Result<Option<Rc<Session>>, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        let style = canvas.style();
        style.set_property("position", "absolute")?;
        style.set_property("inset", "0")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("z-index", "2")?;
        container.append_child(&canvas)?;

        let rect = container.get_bounding_client_rect();
        let (w, h) = (rect.width() as u32, rect.height() as u32);
        canvas.set_width(w);
        canvas.set_height(h);

        let ctx = match canvas.get_context("2d")? {
            Some(ctx) => ctx,
            None => {
                // No drawing surface: leave the page untouched.
                let _ = container.remove_child(&canvas);
                return Ok(None);
            }
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;

        let umbrella_src = config.umbrella_src();
        let sprite_src = (config.umbrella() && !umbrella_src.is_empty())
            .then_some(umbrella_src.as_str());

        Ok(Some(Rc::new(Session {
            alive: Cell::new(true),
            container,
            canvas,
            world: RefCell::new(RainWorld::new(w, h, config.umbrella())),
            painter: Painter::new(ctx, sprite_src),
            pointer: Cell::new(PointerPos::centered(w, h)),
            audio: AudioLoop::new(),
            frame: Cell::new(None),
            raf: RefCell::new(None),
            on_pointer: RefCell::new(None),
            observer: RefCell::new(None),
        })))
    }

    fn attach_listeners(self: &Rc<Self>) -> Result<(), JsValue> {
        let on_pointer = {
            let session = Rc::clone(self);
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let rect = session.container.get_bounding_client_rect();
                session.pointer.set(PointerPos::new(
                    (event.client_x() as f64 - rect.left()) as f32,
                    (event.client_y() as f64 - rect.top()) as f32,
                ));
            })
        };
        self.container
            .add_event_listener_with_callback("mousemove", on_pointer.as_ref().unchecked_ref())?;
        *self.on_pointer.borrow_mut() = Some(on_pointer);

        let on_resize = {
            let session = Rc::clone(self);
            Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
                session.sync_size();
            })
        };
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(&self.container);
        *self.observer.borrow_mut() = Some((observer, on_resize));

        Ok(())
    }

    fn start_frame_loop(self: &Rc<Self>) {
        let raf = {
            let session = Rc::clone(self);
            Closure::<dyn FnMut()>::new(move || {
                if !session.alive.get() {
                    return;
                }
                let pointer = session.pointer.get();
                session.world.borrow_mut().tick(pointer);
                session.painter.draw(&session.world.borrow(), pointer);
                session.schedule();
            })
        };
        *self.raf.borrow_mut() = Some(raf);
        self.schedule();
    }

    fn schedule(&self) {
        let raf = self.raf.borrow();
        if let (Some(window), Some(raf)) = (web_sys::window(), raf.as_ref()) {
            if let Ok(id) = window.request_animation_frame(raf.as_ref().unchecked_ref()) {
                self.frame.set(Some(id));
            }
        }
    }

    /// Resync canvas pixel dimensions with the container box. Setting
    /// canvas width clears the surface, so equal dimensions are left alone.
    fn sync_size(&self) {
        if !self.alive.get() {
            return;
        }
        let rect = self.container.get_bounding_client_rect();
        let (w, h) = (rect.width() as u32, rect.height() as u32);
        if w == self.canvas.width() && h == self.canvas.height() {
            return;
        }
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.world.borrow_mut().resize(w, h);
    }

    fn teardown(&self) {
        if !self.alive.replace(false) {
            return;
        }

        if let (Some(window), Some(id)) = (web_sys::window(), self.frame.take()) {
            let _ = window.cancel_animation_frame(id);
        }

        if let Some((observer, _cb)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }

        if let Some(on_pointer) = self.on_pointer.borrow_mut().take() {
            let _ = self
                .container
                .remove_event_listener_with_callback("mousemove", on_pointer.as_ref().unchecked_ref());
        }

        // The frame closure holds an Rc back to this session; dropping it
        // here breaks the cycle. Never reached from inside the closure
        // itself, which bails on the dead liveness flag.
        *self.raf.borrow_mut() = None;

        self.audio.shutdown();
        let _ = self.container.remove_child(&self.canvas);
    }
}
