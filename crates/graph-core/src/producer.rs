// File: crates/graph-core/src/producer.rs
// Summary: Sample acquisition thread: blocking source, pause flag, join on stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{error, info, warn};

use crate::error::GraphError;
use crate::signal::SignalBuffer;

/// An upstream producer of normalized [0, 1] sample blocks — a microphone
/// plus FFT pipeline, a file reader, a synthesizer. The engine only consumes;
/// acquisition and transform math live behind this trait.
pub trait SampleSource: Send + 'static {
    /// Samples per block; must match the length of the signal buffer fed.
    fn block_size(&self) -> usize;

    /// Acquire the underlying resource. Called once before the loop starts.
    fn start(&mut self) -> Result<(), GraphError>;

    /// Block until one full block has been read into `out`.
    fn read_block(&mut self, out: &mut [f32]) -> Result<(), GraphError>;

    /// Release the underlying resource. Called on the producer thread after
    /// the loop exits, before the source is handed back.
    fn stop(&mut self);
}

struct ProducerShared {
    running: AtomicBool,
    paused: AtomicBool,
}

/// Runs a [`SampleSource`] on its own thread, writing each block into the
/// [`SignalBuffer`] it was given at start. Pausing skips the write without
/// tearing the source down; stopping signals the flag, joins the thread and
/// only then releases (and returns) the source.
pub struct Producer {
    shared: Arc<ProducerShared>,
    thread: Option<JoinHandle<Box<dyn SampleSource>>>,
}

impl Producer {
    pub fn start(
        mut source: Box<dyn SampleSource>,
        buffer: Arc<SignalBuffer>,
    ) -> Result<Self, GraphError> {
        source.start()?;
        if buffer.len() != source.block_size() {
            buffer.set_length(source.block_size());
        }

        let shared = Arc::new(ProducerShared {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        });
        let loop_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("signal-producer".into())
            .spawn(move || run_loop(source, buffer, loop_shared))
            .map_err(|e| GraphError::Source { reason: e.to_string() })?;

        info!("producer started");
        Ok(Self { shared, thread: Some(thread) })
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Keep the acquisition loop (and its resource) alive but stop feeding
    /// the buffer.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::Release);
        info!("producer paused");
    }

    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::Release);
        info!("producer resumed");
    }

    /// Graceful shutdown: flag the loop, block until the thread observes it
    /// and exits, then hand the released source back. Returns `None` only if
    /// the producer thread panicked, which is reported rather than
    /// propagated.
    pub fn stop(mut self) -> Option<Box<dyn SampleSource>> {
        self.shared.running.store(false, Ordering::Release);
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(source) => {
                info!("producer stopped");
                Some(source)
            }
            Err(_) => {
                error!("producer thread panicked during shutdown");
                None
            }
        }
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("producer thread panicked during drop");
            }
        }
    }
}

fn run_loop(
    mut source: Box<dyn SampleSource>,
    buffer: Arc<SignalBuffer>,
    shared: Arc<ProducerShared>,
) -> Box<dyn SampleSource> {
    let mut block = vec![0.0f32; source.block_size()];
    while shared.running.load(Ordering::Acquire) {
        match source.read_block(&mut block) {
            Ok(()) => {
                if shared.paused.load(Ordering::Acquire) {
                    continue;
                }
                if let Err(e) = buffer.write(&block) {
                    // Buffer length changed under us; skip this block.
                    warn!(error = %e, "dropping block");
                }
            }
            Err(e) => {
                error!(error = %e, "sample source read failed, stopping");
                shared.running.store(false, Ordering::Release);
                break;
            }
        }
    }
    source.stop();
    source
}
