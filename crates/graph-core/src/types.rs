// File: crates/graph-core/src/types.rs
// Summary: Shared constants and pass-through line styling.

use std::time::Duration;

/// Number of major grid lines per axis at 100% zoom.
pub const DEFAULT_GRID_LINE_COUNT: usize = 6;
/// Number of lines a minor grid segment carries.
pub const MINOR_GRID_LINE_COUNT: usize = 11;
/// On-screen spacing (px) between adjacent majors above which minors are inserted.
pub const MINOR_GRID_SPACING_PX: f32 = 500.0;
/// Render-tick budget: ~50 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(20);

/// Stroke styling carried by a grid line node. The engine never interprets
/// these values; they pass straight through to the host's renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    /// ARGB, 8 bits per channel.
    pub color: u32,
    pub stroke_width: f32,
}

impl LineStyle {
    // Even stroke widths so all grid line strokes rasterize alike.
    pub const MAJOR: LineStyle = LineStyle { color: 0xFF88_8888, stroke_width: 4.0 };
    pub const MINOR: LineStyle = LineStyle { color: 0xFF44_4444, stroke_width: 2.0 };
}
