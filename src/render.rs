// render.rs - Canvas 2D painter
//
// Draw order each frame: drops, splashes, umbrella sprite on top.
// Reads the particle stores, never mutates them.

use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::sim::{Droplets, PointerPos, RainWorld, Splashes};

// Splash alpha is life / SPLASH_FADE, so particles fade toward removal.
const SPLASH_FADE: f32 = 30.0;
const SPLASH_RADIUS: f64 = 1.5;

// Umbrella sprite placement: canopy above and ahead of the pointer, handle
// ending near it. Must stay in step with the sim's shield constants.
const UMBRELLA_SIZE: f64 = 350.0;
const UMBRELLA_OFFSET_X: f64 = 225.0;
const UMBRELLA_OFFSET_Y: f64 = 275.0;

pub struct Painter {
    ctx: CanvasRenderingContext2d,
    umbrella: Option<Sprite>,
}

/// Umbrella image plus a shared flag flipped by its onload callback.
struct Sprite {
    image: HtmlImageElement,
    loaded: Rc<Cell<bool>>,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl Sprite {
    fn load(src: &str) -> Result<Sprite, JsValue> {
        let image = HtmlImageElement::new()?;
        let loaded = Rc::new(Cell::new(false));

        let onload = {
            let loaded = Rc::clone(&loaded);
            Closure::<dyn FnMut()>::new(move || loaded.set(true))
        };
        let onerror = Closure::<dyn FnMut()>::new(move || {
            web_sys::console::warn_1(&"rain-overlay: umbrella sprite failed to load".into());
        });

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        image.set_src(src);

        Ok(Sprite {
            image,
            loaded,
            _onload: onload,
            _onerror: onerror,
        })
    }
}

impl Painter {
    /// `umbrella_src` is None when the umbrella is disabled or the host
    /// supplied no sprite; the overlay then simply never draws one.
    pub fn new(ctx: CanvasRenderingContext2d, umbrella_src: Option<&str>) -> Self {
        let umbrella = umbrella_src.and_then(|src| Sprite::load(src).ok());
        Self { ctx, umbrella }
    }

    pub fn draw(&self, world: &RainWorld, pointer: PointerPos) {
        self.ctx
            .clear_rect(0.0, 0.0, world.width() as f64, world.height() as f64);
        self.draw_drops(world.drops());
        self.draw_splashes(world.splashes());
        self.draw_umbrella(pointer);
    }

    fn draw_drops(&self, drops: &Droplets) {
        for i in 0..drops.n {
            let x = drops.x[i] as f64;
            let y = drops.y[i] as f64;
            let r = drops.radius[i] as f64;
            let h = r * 5.0;

            // Hue and alpha differ per drop, so fill style is per drop too.
            self.ctx
                .set_fill_style_str(&hsla(drops.hue[i], 80, 70, drops.alpha[i]));

            // Teardrop: pointed cap from two bezier flanks, half-circle base.
            self.ctx.begin_path();
            self.ctx.move_to(x, y - h);
            self.ctx
                .bezier_curve_to(x + r * 0.2, y - h * 0.5, x + r * 1.6, y - r * 0.2, x + r, y);
            let _ = self.ctx.arc(x, y, r, 0.0, PI);
            self.ctx
                .bezier_curve_to(x - r * 1.6, y - r * 0.2, x - r * 0.2, y - h * 0.5, x, y - h);
            self.ctx.close_path();
            self.ctx.fill();
        }
    }

    fn draw_splashes(&self, splashes: &Splashes) {
        for i in 0..splashes.n {
            let alpha = (splashes.life[i] / SPLASH_FADE).min(1.0);
            self.ctx
                .set_fill_style_str(&hsla(splashes.hue[i], 80, 75, alpha));
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                splashes.x[i] as f64,
                splashes.y[i] as f64,
                SPLASH_RADIUS,
                0.0,
                PI * 2.0,
            );
            self.ctx.fill();
        }
    }

    fn draw_umbrella(&self, pointer: PointerPos) {
        let Some(sprite) = &self.umbrella else {
            return;
        };
        if !sprite.loaded.get() {
            return;
        }
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &sprite.image,
            pointer.x as f64 - UMBRELLA_OFFSET_X,
            pointer.y as f64 - UMBRELLA_OFFSET_Y,
            UMBRELLA_SIZE,
            UMBRELLA_SIZE,
        );
    }
}

fn hsla(hue: f32, s: u8, l: u8, alpha: f32) -> String {
    format!("hsla({hue}, {s}%, {l}%, {alpha})")
}
