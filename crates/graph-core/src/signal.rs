// File: crates/graph-core/src/signal.rs
// Summary: Signal sample buffer and the viewport-aware resampling algorithm.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::axis::AxisParameters;
use crate::error::GraphError;
use crate::viewport::Viewport;

/// How a destination column condenses the source samples it owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleMode {
    /// Always interpolate at the column centre; no envelope scan.
    Interpolate,
    /// Anti-aliased envelope: report the minimum and maximum across the
    /// source interval owned by the column.
    MinMax,
    /// Envelope peak only; both outputs receive the maximum.
    PeakOnly,
}

/// A buffer of normalized [0, 1] samples plus the metadata needed to map it
/// onto a pixel-width display window: the X axis it was produced against and
/// the Y viewport its output is normalized through.
///
/// One producer thread may `write` while a consumer `resample`s; each call
/// holds the buffer mutex for its whole traversal, so a resample always sees
/// one consistent snapshot and never a torn write.
pub struct SignalBuffer {
    samples: Mutex<Vec<f32>>,
    x_axis: AxisParameters,
    y_viewport: Viewport,
    /// Bumped on every content change; lets a frame loop skip resampling
    /// when neither data nor geometry moved.
    generation: AtomicU64,
}

impl SignalBuffer {
    /// Create a buffer expecting `size_of_buffer` samples per write. The Y
    /// viewport starts at full scale.
    pub fn new(size_of_buffer: usize, x_axis: AxisParameters) -> Self {
        Self {
            samples: Mutex::new(vec![0.0; size_of_buffer.max(1)]),
            x_axis,
            y_viewport: Viewport::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn x_axis(&self) -> AxisParameters {
        self.x_axis
    }

    /// Shared handle to the Y viewport this buffer normalizes through.
    pub fn y_viewport(&self) -> Viewport {
        self.y_viewport.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        false // at least one sample by construction
    }

    /// Content version; changes whenever `write` or `set_length` succeeds.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Replace the whole buffer. The incoming slice must match the declared
    /// length exactly; on mismatch nothing is copied.
    pub fn write(&self, samples: &[f32]) -> Result<(), GraphError> {
        let mut guard = self.lock();
        if guard.len() != samples.len() {
            return Err(GraphError::BufferSizeMismatch {
                expected: guard.len(),
                got: samples.len(),
            });
        }
        guard.copy_from_slice(samples);
        self.generation.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Reallocate to `new_length` samples, discarding current content.
    /// Lengths below one are raised to one.
    pub fn set_length(&self, new_length: usize) {
        *self.lock() = vec![0.0; new_length.max(1)];
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Map the buffer onto `min_out`/`max_out` (one value per pixel column),
    /// showing the source value range `src_range` as laid out by `scale_to`.
    ///
    /// `scale_to` may be logarithmic while the buffer itself is linearly
    /// indexed; each column centre is pushed through the destination scale's
    /// inverse transform before being located in the source index space.
    /// Outputs are already normalized through the Y viewport, so a zoomed-in
    /// view can legitimately produce values outside [0, 1]; clipping is the
    /// renderer's job.
    pub fn resample_into(
        &self,
        min_out: &mut [f32],
        max_out: &mut [f32],
        src_range: (f32, f32),
        scale_to: &AxisParameters,
        mode: ResampleMode,
    ) -> Result<(), GraphError> {
        if min_out.len() != max_out.len() {
            return Err(GraphError::BufferSizeMismatch {
                expected: min_out.len(),
                got: max_out.len(),
            });
        }
        let target_len = min_out.len();
        self.resample_columns(target_len, src_range, scale_to, mode, |i, lo, hi| {
            min_out[i] = lo;
            max_out[i] = hi;
        })
    }

    /// Single-output envelope-peak variant of
    /// [`resample_into`](Self::resample_into).
    pub fn resample_peak_into(
        &self,
        out: &mut [f32],
        src_range: (f32, f32),
        scale_to: &AxisParameters,
    ) -> Result<(), GraphError> {
        let target_len = out.len();
        self.resample_columns(
            target_len,
            src_range,
            scale_to,
            ResampleMode::PeakOnly,
            |i, _lo, hi| out[i] = hi,
        )
    }

    /// Interpolated, viewport-normalized value at an X axis value. Positions
    /// outside the axis range read as zero.
    pub fn value_at_position(&self, axis_value: f32) -> f32 {
        if axis_value < self.x_axis.minimum_value() || axis_value > self.x_axis.maximum_value() {
            return 0.0;
        }
        let guard = self.lock();
        let (y_offset, y_zoom) = self.y_viewport.window();
        let index = self.x_axis.value_to_position(axis_value) * (guard.len() - 1) as f32;
        (interpolate(&guard, index) - y_offset) / y_zoom
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f32>> {
        self.samples.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn resample_columns(
        &self,
        target_len: usize,
        (src_min, src_max): (f32, f32),
        scale_to: &AxisParameters,
        mode: ResampleMode,
        mut emit: impl FnMut(usize, f32, f32),
    ) -> Result<(), GraphError> {
        if target_len == 0 {
            return Err(GraphError::EmptyTarget);
        }
        if src_min >= src_max {
            return Err(GraphError::InvalidRange { min: src_min, max: src_max });
        }

        // One lock scope for the whole traversal: the snapshot the producer
        // last wrote stays coherent across every column.
        let samples = self.lock();
        let (y_offset, y_zoom) = self.y_viewport.window();
        let normalize = |v: f32| (v - y_offset) / y_zoom;

        // Source positions the destination range edges occupy, in the
        // destination scale's linear position space.
        let min_position = scale_to.value_to_position(src_min);
        let max_position = scale_to.value_to_position(src_max);
        let position_span = max_position - min_position;
        let denominator = target_len.saturating_sub(1).max(1) as f32;
        let last_index = (samples.len() - 1) as f32;

        // Source array index a destination column centre lands on, after the
        // destination scale's transform is inverted.
        let source_index = |column: isize| -> f32 {
            let position = min_position + (column as f32 / denominator) * position_span;
            let value = scale_to.position_to_scaled_value(position);
            self.x_axis.value_to_position(value) * last_index
        };

        for i in 0..target_len {
            let centre = source_index(i as isize);
            let lower_neighbour = source_index(i as isize - 1);
            let upper_neighbour = source_index(i as isize + 1);

            // Half-open source interval owned by this column: halfway to each
            // neighbouring column centre.
            let low_bound = centre + (lower_neighbour - centre) / 2.0;
            let high_bound = centre + (upper_neighbour - centre) / 2.0;

            let spans_fewer_than_two =
                centre - low_bound < 2.0 && high_bound - centre < 2.0;

            if mode == ResampleMode::Interpolate || spans_fewer_than_two {
                // Fewer than two source samples per side: interpolate between
                // the surrounding samples so slow traces stay smooth.
                let v = normalize(interpolate(&samples, centre.clamp(0.0, last_index)));
                emit(i, v, v);
            } else {
                // Many source samples collapse into this column: report the
                // true envelope instead of an aliased single line.
                let low = (low_bound.round().max(0.0) as usize).min(samples.len() - 1);
                let high = (high_bound.round().max(0.0) as usize).min(samples.len() - 1);
                let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
                for &sample in &samples[low..=high] {
                    lo = lo.min(sample);
                    hi = hi.max(sample);
                }
                let (lo, hi) = (normalize(lo), normalize(hi));
                match mode {
                    ResampleMode::MinMax => emit(i, lo, hi),
                    _ => emit(i, hi, hi),
                }
            }
        }
        Ok(())
    }
}

/// Linear interpolation at a fractional index; exact at integral indices.
fn interpolate(samples: &[f32], index: f32) -> f32 {
    let remainder = index.fract();
    if remainder == 0.0 {
        samples[index as usize]
    } else {
        let lower = samples[index.floor() as usize];
        let upper = samples[index.ceil() as usize];
        lower + (upper - lower) * remainder
    }
}
