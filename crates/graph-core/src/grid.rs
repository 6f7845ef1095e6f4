// File: crates/graph-core/src/grid.rs
// Summary: Per-axis grid line tree with adaptive minor-line subdivision.

use std::collections::BTreeMap;

use crate::axis::AxisParameters;
use crate::error::GraphError;
use crate::geometry::DrawableArea;
use crate::types::{LineStyle, MINOR_GRID_LINE_COUNT, MINOR_GRID_SPACING_PX};
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisOrientation {
    X,
    Y,
}

/// How the lines of one grid node are spaced.
///
/// `Log` nodes carry the decade their lines subdivide: line `i` sits at the
/// value `decade * i / (count - 1)`, positioned at
/// `log10(value) / log10(axis_span)` — classic log-paper ruling. Line zero
/// anchors the decade origin at position 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridScale {
    Linear,
    Log { decade: f32, axis_span: f32 },
}

/// Spacing scheme for adaptively inserted children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChildScale {
    Linear,
    /// Log-paper minors; `axis_top` is the full axis span rounded up to a
    /// power of ten, from which each segment's decade is derived.
    Log { axis_top: f32 },
}

/// Where a grid line falls relative to the current viewport window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinePosition {
    /// Normalized [0, 1] position inside the visible window.
    Visible(f32),
    BelowViewport,
    AboveViewport,
    OutOfRange,
}

/// One visible line, ready for the host renderer: normalized position along
/// the drawable extent plus the pass-through stroke style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleLine {
    pub position: f32,
    pub is_minor: bool,
    pub style: LineStyle,
}

/// A hierarchy of grid lines for one axis. The node owns `count` lines laid
/// out by its `scale` over its parent segment, and a child node per adjacent
/// major pair wherever the on-screen spacing justifies subdividing.
///
/// Children are re-derived on every viewport change and on every drawable
/// area change; a resize alone can make them appear or disappear.
pub struct GridLines {
    orientation: AxisOrientation,
    scale: GridScale,
    count: usize,
    style: LineStyle,
    viewport: Viewport,
    drawable: DrawableArea,
    /// Parent-segment geometry, normalized: minors express their spacing
    /// relative to the slice of the axis between their bounding majors.
    segment_offset: f32,
    segment_extent: f32,
    child_scale: ChildScale,
    is_minor: bool,
    children: BTreeMap<usize, GridLines>,
}

impl GridLines {
    pub fn new(
        orientation: AxisOrientation,
        scale: GridScale,
        count: usize,
        viewport: Viewport,
    ) -> Result<Self, GraphError> {
        if count < 2 {
            return Err(GraphError::TooFewGridLines { count });
        }
        if let GridScale::Log { decade, axis_span } = scale {
            if decade <= 0.0 {
                return Err(GraphError::InvalidLogInput { value: decade });
            }
            // A span of 1 has no decades to rule.
            if axis_span <= 1.0 {
                return Err(GraphError::InvalidLogInput { value: axis_span });
            }
        }
        Ok(Self {
            orientation,
            scale,
            count,
            style: LineStyle::MAJOR,
            viewport,
            drawable: DrawableArea::default(),
            segment_offset: 0.0,
            segment_extent: 1.0,
            child_scale: ChildScale::Linear,
            is_minor: false,
            children: BTreeMap::new(),
        })
    }

    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub fn set_style(&mut self, style: LineStyle) {
        self.style = style;
    }

    pub fn set_count(&mut self, count: usize) -> Result<(), GraphError> {
        if count < 2 {
            return Err(GraphError::TooFewGridLines { count });
        }
        self.count = count;
        self.refresh_children();
        Ok(())
    }

    /// Choose the spacing scheme for adaptively inserted minors.
    pub fn set_child_scale(&mut self, child_scale: ChildScale) {
        self.child_scale = child_scale;
        self.children.clear();
        self.refresh_children();
    }

    /// Track a different viewport (e.g. the one owned by a newly registered
    /// signal). Existing children hold the old handle, so they are rebuilt.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.children.clear();
        self.refresh_children();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.clone()
    }

    /// Number of minor children currently inserted (direct level only).
    pub fn minor_segment_count(&self) -> usize {
        self.children.len()
    }

    /// Normalized [0, 1] position of line `line` over the full axis, ignoring
    /// the viewport. `None` when `line` is outside `[0, count)`.
    pub fn intersect(&self, line: usize) -> Option<f32> {
        if line >= self.count {
            return None;
        }
        let fraction = line as f32 / (self.count - 1) as f32;
        Some(match self.scale {
            GridScale::Linear => self.segment_offset + fraction * self.segment_extent,
            GridScale::Log { decade, axis_span } => {
                if line == 0 {
                    0.0
                } else {
                    (decade * fraction).log10() / axis_span.log10()
                }
            }
        })
    }

    /// Line position expressed relative to the currently visible window.
    pub fn intersect_zoom_compensated(&self, line: usize) -> LinePosition {
        let Some(intersect) = self.intersect(line) else {
            return LinePosition::OutOfRange;
        };
        let (offset, zoom) = self.viewport.window();
        if intersect < offset {
            LinePosition::BelowViewport
        } else if intersect > offset + zoom {
            LinePosition::AboveViewport
        } else {
            LinePosition::Visible((intersect - offset) / zoom)
        }
    }

    /// React to a surface resize: adopt the new drawable area, push it to
    /// every child, then re-run the subdivision check (pixel spacing changed
    /// even if the zoom did not).
    pub fn set_drawable_area(&mut self, area: DrawableArea) {
        self.propagate_drawable_area(area);
        self.refresh_children();
    }

    fn propagate_drawable_area(&mut self, area: DrawableArea) {
        self.drawable = area;
        for child in self.children.values_mut() {
            child.propagate_drawable_area(area);
        }
    }

    /// Insert or remove minor children according to the current geometry.
    /// Decisions are collected first and applied afterwards, so the child map
    /// is never edited while being consulted.
    pub fn refresh_children(&mut self) {
        let (_, zoom) = self.viewport.window();
        let spacing =
            (self.dimension_length() * self.segment_extent / (self.count - 1) as f32) / zoom;

        let mut pending: Vec<(usize, bool)> = Vec::with_capacity(self.count - 1);
        for major in 0..self.count - 1 {
            let adequate = spacing > MINOR_GRID_SPACING_PX
                && self.intersect(major) != self.intersect(major + 1);
            pending.push((major, adequate));
        }

        for (major, adequate) in pending {
            if adequate {
                if !self.children.contains_key(&major) {
                    if let Some(child) = self.build_minor(major) {
                        self.children.insert(major, child);
                    }
                }
            } else {
                self.children.remove(&major);
            }
        }

        for child in self.children.values_mut() {
            child.refresh_children();
        }
    }

    /// A minor node sized from the parent's intersects of its bounding
    /// majors, sharing the parent's viewport and drawable area.
    fn build_minor(&self, major: usize) -> Option<GridLines> {
        let left = self.intersect(major)?;
        let right = self.intersect(major + 1)?;

        let scale = match self.child_scale {
            ChildScale::Linear => GridScale::Linear,
            ChildScale::Log { axis_top } => GridScale::Log {
                decade: axis_top / 10f32.powi((self.count - 2 - major) as i32),
                axis_span: axis_top,
            },
        };
        let mut child = GridLines::new(
            self.orientation,
            scale,
            MINOR_GRID_LINE_COUNT,
            self.viewport.clone(),
        )
        .ok()?;
        child.style = LineStyle::MINOR;
        child.is_minor = true;
        child.drawable = self.drawable;
        child.segment_offset = left;
        child.segment_extent = right - left;
        Some(child)
    }

    /// Collect every line inside the visible window, this node's and its
    /// children's, as normalized positions with pass-through styling.
    pub fn visible_lines(&self) -> Vec<VisibleLine> {
        let mut out = Vec::new();
        self.collect_visible(&mut out);
        out
    }

    fn collect_visible(&self, out: &mut Vec<VisibleLine>) {
        for line in 0..self.count {
            if let LinePosition::Visible(position) = self.intersect_zoom_compensated(line) {
                out.push(VisibleLine {
                    position,
                    is_minor: self.is_minor,
                    style: self.style,
                });
            }
        }
        for child in self.children.values() {
            child.collect_visible(out);
        }
    }

    /// Pixel extent along this node's axis: width for X, height for Y.
    fn dimension_length(&self) -> f32 {
        match self.orientation {
            AxisOrientation::X => self.drawable.width as f32,
            AxisOrientation::Y => self.drawable.height as f32,
        }
    }
}

/// Log-display layout for an axis: the span rounded up to the next power of
/// ten (one full decade above the maximum's magnitude) and the fixed zoom
/// trimming the window back down to the declared maximum.
pub fn log_axis_layout(axis: &AxisParameters) -> (f32, f32) {
    let max = axis.maximum_value();
    let decades = max.log10().floor() as i32 + 1;
    let axis_top = 10f32.powi(decades);
    (axis_top, max.log10() / axis_top.log10())
}
