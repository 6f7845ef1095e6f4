// File: crates/graph-core/src/frame.rs
// Summary: Event-driven per-frame recomputation of grid geometry and traces.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::axis::{AxisParameters, ScaleKind};
use crate::error::GraphError;
use crate::geometry::DrawableArea;
use crate::grid::{log_axis_layout, AxisOrientation, ChildScale, GridLines, GridScale, VisibleLine};
use crate::signal::{ResampleMode, SignalBuffer};
use crate::types::DEFAULT_GRID_LINE_COUNT;
use crate::viewport::Viewport;

/// Per-signal resample output: one value per pixel column, already
/// normalized through the signal's Y viewport.
#[derive(Clone, Debug, Default)]
pub struct TraceOutput {
    pub minimum: Vec<f32>,
    pub maximum: Vec<f32>,
}

/// Everything the host renderer consumes for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    pub x_lines: Vec<VisibleLine>,
    pub y_lines: Vec<VisibleLine>,
    pub traces: Vec<TraceOutput>,
}

struct SignalSlot {
    buffer: Arc<SignalBuffer>,
    mode: ResampleMode,
    last_generation: Option<u64>,
}

/// Ties viewports, grid trees and signal buffers into a render-tick cycle.
///
/// Recomputation is event-driven, not polled: viewport listeners and drawable
/// area changes raise a dirty flag, and `tick` recomputes grid geometry only
/// when the flag was raised, re-resampling a signal only when geometry or its
/// buffer content moved. An unchanged frame is returned verbatim.
///
/// The signal registry itself is mutated by the consumer role only; producer
/// threads write solely through the `Arc<SignalBuffer>` they were handed at
/// registration.
pub struct FrameCoordinator {
    x_axis: AxisParameters,
    /// Destination display axis; linear by default, decade-log after
    /// `set_x_axis_logarithmic`.
    scale_to: AxisParameters,
    x_viewport: Viewport,
    x_grid: GridLines,
    y_grid: GridLines,
    signals: Vec<SignalSlot>,
    drawable: DrawableArea,
    geometry_dirty: Arc<AtomicBool>,
    frame: FrameOutput,
}

impl FrameCoordinator {
    pub fn new(x_axis: AxisParameters) -> Result<Self, GraphError> {
        let x_viewport = Viewport::new();
        let x_grid = GridLines::new(
            AxisOrientation::X,
            GridScale::Linear,
            DEFAULT_GRID_LINE_COUNT,
            x_viewport.clone(),
        )?;
        let y_grid = GridLines::new(
            AxisOrientation::Y,
            GridScale::Linear,
            DEFAULT_GRID_LINE_COUNT,
            Viewport::new(),
        )?;
        let geometry_dirty = Arc::new(AtomicBool::new(true));
        watch(&x_viewport, &geometry_dirty);
        Ok(Self {
            x_axis,
            scale_to: x_axis,
            x_viewport,
            x_grid,
            y_grid,
            signals: Vec::new(),
            drawable: DrawableArea::default(),
            geometry_dirty,
            frame: FrameOutput::default(),
        })
    }

    /// The pan/zoom window over the X display axis, for the host's gesture
    /// handling. Shared with the X grid tree.
    pub fn x_viewport(&self) -> Viewport {
        self.x_viewport.clone()
    }

    pub fn x_grid(&mut self) -> &mut GridLines {
        &mut self.x_grid
    }

    pub fn y_grid(&mut self) -> &mut GridLines {
        &mut self.y_grid
    }

    /// Add a signal to the frame cycle. The Y grid follows the most recently
    /// registered signal's Y viewport, keeping grid lines and trace in
    /// lock-step when the host zooms vertically.
    pub fn register_signal(&mut self, buffer: Arc<SignalBuffer>, mode: ResampleMode) {
        let y_viewport = buffer.y_viewport();
        watch(&y_viewport, &self.geometry_dirty);
        self.y_grid.set_viewport(y_viewport);
        self.signals.push(SignalSlot { buffer, mode, last_generation: None });
        self.frame.traces.push(TraceOutput::default());
        self.geometry_dirty.store(true, Ordering::Release);
    }

    /// Switch the X display to a logarithmic (decade) layout: one major per
    /// decade, log-paper minors, and the viewport trimmed so the window ends
    /// at the axis maximum rather than at the next full decade.
    pub fn set_x_axis_logarithmic(&mut self) -> Result<(), GraphError> {
        let (axis_top, display_zoom) = log_axis_layout(&self.x_axis);
        self.scale_to = AxisParameters::new(0.0, axis_top, ScaleKind::Log10)?;
        let majors = axis_top.log10().round() as usize + 1;
        self.x_grid.set_count(majors)?;
        self.x_grid.set_child_scale(ChildScale::Log { axis_top });
        self.x_viewport.set_limits(0.0, display_zoom);
        debug!(axis_top, display_zoom, "x axis switched to logarithmic display");
        Ok(())
    }

    /// Adopt a new surface size: grid geometry and trace widths follow.
    pub fn on_drawable_area_changed(&mut self, area: DrawableArea) {
        debug!(?area, "drawable area changed");
        self.drawable = area;
        self.x_grid.set_drawable_area(area);
        self.y_grid.set_drawable_area(area);
        let target = area.width.max(1) as usize;
        for trace in &mut self.frame.traces {
            trace.minimum.resize(target, 0.0);
            trace.maximum.resize(target, 0.0);
        }
        self.geometry_dirty.store(true, Ordering::Release);
    }

    /// The frame output produced by the last `tick`.
    pub fn output(&self) -> &FrameOutput {
        &self.frame
    }

    /// One render tick. Grid lines are recomputed only if a viewport or the
    /// drawable area changed since the previous tick; each trace is
    /// re-resampled only if geometry changed or its buffer was written to.
    pub fn tick(&mut self) -> Result<&FrameOutput, GraphError> {
        let geometry_changed = self.geometry_dirty.swap(false, Ordering::AcqRel);
        if geometry_changed {
            self.x_grid.refresh_children();
            self.y_grid.refresh_children();
            self.frame.x_lines = self.x_grid.visible_lines();
            self.frame.y_lines = self.y_grid.visible_lines();
        }

        let (offset, zoom) = self.x_viewport.window();
        let src_range = (
            self.scale_to.position_to_value(offset),
            self.scale_to.position_to_value(offset + zoom),
        );
        let target = self.drawable.width.max(1) as usize;

        for (slot, trace) in self.signals.iter_mut().zip(&mut self.frame.traces) {
            let generation = slot.buffer.generation();
            if !geometry_changed && slot.last_generation == Some(generation) {
                continue;
            }
            trace.minimum.resize(target, 0.0);
            trace.maximum.resize(target, 0.0);
            slot.buffer.resample_into(
                &mut trace.minimum,
                &mut trace.maximum,
                src_range,
                &self.scale_to,
                slot.mode,
            )?;
            slot.last_generation = Some(generation);
        }
        Ok(&self.frame)
    }
}

fn watch(viewport: &Viewport, flag: &Arc<AtomicBool>) {
    let flag = Arc::clone(flag);
    viewport.subscribe(move || flag.store(true, Ordering::Release));
}
