// pointer.rs - Latest pointer position in surface coordinates

/// Pointer position relative to the drawing surface origin.
///
/// `Copy` value, always replaced wholesale through a `Cell`, so a reader can
/// never observe one updated coordinate paired with a stale one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Default before any pointer event arrives: center of the surface.
    pub fn centered(w: u32, h: u32) -> Self {
        Self {
            x: w as f32 / 2.0,
            y: h as f32 / 2.0,
        }
    }
}
