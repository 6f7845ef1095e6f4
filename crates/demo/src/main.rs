// File: crates/demo/src/main.rs
// Summary: Demo drives the engine with a synthetic sweeping-peak spectrum and
// prints ASCII envelope frames on a logarithmic frequency axis.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use graph_core::{
    AxisParameters, DrawableArea, FrameCoordinator, GraphError, Producer, ResampleMode,
    SampleSource, SignalBuffer, FRAME_INTERVAL,
};
use tracing::info;

const BLOCK_SIZE: usize = 2048;
const SAMPLE_RATE_HZ: f32 = 44_100.0;
const COLUMNS: i32 = 96;
const ROWS: usize = 16;
const FRAMES: usize = 150;

/// Synthetic spectrum: a narrow peak sweeping slowly up the band over a
/// pink-ish noise floor. Stands in for a microphone + FFT pipeline.
struct SweepingPeak {
    block: usize,
    open: bool,
}

impl SweepingPeak {
    fn new() -> Self {
        Self { block: 0, open: false }
    }
}

impl SampleSource for SweepingPeak {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn start(&mut self) -> Result<(), GraphError> {
        self.open = true;
        Ok(())
    }

    fn read_block(&mut self, out: &mut [f32]) -> Result<(), GraphError> {
        if !self.open {
            return Err(GraphError::Source { reason: "source not started".into() });
        }
        // Pace like a real capture device: one block per frame interval.
        thread::sleep(FRAME_INTERVAL);

        let peak_bin = ((self.block as f32 * 0.004).sin() * 0.4 + 0.5) * (BLOCK_SIZE - 1) as f32;
        for (bin, slot) in out.iter_mut().enumerate() {
            let floor = 0.08 / (1.0 + bin as f32 / 64.0);
            let distance = (bin as f32 - peak_bin).abs();
            let peak = 0.85 * (-distance * distance / 800.0).exp();
            *slot = (floor + peak).min(1.0);
        }
        self.block += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.open = false;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let axis = AxisParameters::linear(0.0, SAMPLE_RATE_HZ)
        .context("frequency axis")?;
    let mut coordinator = FrameCoordinator::new(axis).context("frame coordinator")?;
    coordinator.on_drawable_area_changed(DrawableArea::new(0, 0, COLUMNS, ROWS as i32));
    coordinator
        .set_x_axis_logarithmic()
        .context("logarithmic display")?;

    let buffer = Arc::new(SignalBuffer::new(BLOCK_SIZE, axis));
    coordinator.register_signal(Arc::clone(&buffer), ResampleMode::MinMax);

    let producer = Producer::start(Box::new(SweepingPeak::new()), buffer)
        .context("start producer")?;

    for frame_index in 0..FRAMES {
        // A brief hold in the middle: the trace freezes while paused.
        if frame_index == 60 {
            producer.pause();
        }
        if frame_index == 80 {
            producer.resume();
        }

        let frame = coordinator.tick().context("frame tick")?;
        print_frame(&frame.traces[0].maximum, producer.is_paused());
        thread::sleep(FRAME_INTERVAL);
    }

    if producer.stop().is_some() {
        info!("source released");
    }
    Ok(())
}

/// One envelope frame as a bar per column, tallest row first.
fn print_frame(maximum: &[f32], paused: bool) {
    let mut lines = String::with_capacity((maximum.len() + 1) * ROWS);
    for row in (0..ROWS).rev() {
        let threshold = row as f32 / ROWS as f32;
        for &value in maximum {
            lines.push(if value.clamp(0.0, 1.0) > threshold { '#' } else { ' ' });
        }
        lines.push('\n');
    }
    let status = if paused { " [paused]" } else { "" };
    println!("\x1B[2J\x1B[H{lines}0 Hz {:-^1$} 44.1 kHz{status}", "log", COLUMNS as usize - 16);
}
