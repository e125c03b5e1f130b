//! Decorative rain overlay with a pointer-following umbrella.
//!
//! The simulation core (`sim`) is pure Rust and runs on any target; the
//! canvas painting, pointer/resize wiring and ambient audio live behind
//! `cfg(target_arch = "wasm32")` and mount into a container element
//! supplied by the hosting page.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod overlay;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use config::OverlayConfig;
pub use sim::{PointerPos, RainWorld};

#[cfg(target_arch = "wasm32")]
pub use overlay::RainOverlay;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&format!("[rain-overlay] wasm loaded v{}", env!("CARGO_PKG_VERSION")).into());
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
