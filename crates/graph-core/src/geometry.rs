// File: crates/graph-core/src/geometry.rs
// Summary: Pixel rectangle supplied top-down from the host surface.

/// Axis-aligned pixel rectangle the engine may lay geometry out in.
/// Supplied by the host whenever the surface size changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawableArea {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl DrawableArea {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, width, height }
    }

    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

impl Default for DrawableArea {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}
