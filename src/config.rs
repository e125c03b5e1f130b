// config.rs - Mount configuration
//
// One immutable struct per mount. Feature toggles are checked at decision
// points in the sim, painter and audio controller rather than forking code
// paths up front.

use wasm_bindgen::prelude::*;

const DEFAULT_VOLUME: f64 = 0.3;

/// Settings supplied by the hosting page. Asset URLs are plain references;
/// an empty string leaves the corresponding feature off.
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct OverlayConfig {
    sound: bool,
    volume: f64,
    umbrella: bool,
    umbrella_src: String,
    sound_src: String,
}

#[wasm_bindgen]
impl OverlayConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            sound: true,
            volume: DEFAULT_VOLUME,
            umbrella: true,
            umbrella_src: String::new(),
            sound_src: String::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn sound(&self) -> bool {
        self.sound
    }

    #[wasm_bindgen(setter)]
    pub fn set_sound(&mut self, on: bool) {
        self.sound = on;
    }

    #[wasm_bindgen(getter)]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Clamped to [0, 1]; a non-finite value falls back to the default.
    #[wasm_bindgen(setter)]
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
    }

    #[wasm_bindgen(getter)]
    pub fn umbrella(&self) -> bool {
        self.umbrella
    }

    #[wasm_bindgen(setter)]
    pub fn set_umbrella(&mut self, on: bool) {
        self.umbrella = on;
    }

    #[wasm_bindgen(getter)]
    pub fn umbrella_src(&self) -> String {
        self.umbrella_src.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_umbrella_src(&mut self, src: String) {
        self.umbrella_src = src;
    }

    #[wasm_bindgen(getter)]
    pub fn sound_src(&self) -> String {
        self.sound_src.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_sound_src(&mut self, src: String) {
        self.sound_src = src;
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = OverlayConfig::new();
        assert!(config.sound());
        assert_eq!(config.volume(), 0.3);
        assert!(config.umbrella());
        assert!(config.umbrella_src().is_empty());
        assert!(config.sound_src().is_empty());
    }

    #[test]
    fn volume_is_clamped_to_unit_range() {
        let mut config = OverlayConfig::new();
        config.set_volume(1.7);
        assert_eq!(config.volume(), 1.0);
        config.set_volume(-0.2);
        assert_eq!(config.volume(), 0.0);
        config.set_volume(0.45);
        assert_eq!(config.volume(), 0.45);
    }

    #[test]
    fn non_finite_volume_falls_back_to_default() {
        let mut config = OverlayConfig::new();
        config.set_volume(f64::NAN);
        assert_eq!(config.volume(), 0.3);
        config.set_volume(f64::INFINITY);
        assert_eq!(config.volume(), 0.3);
    }
}
