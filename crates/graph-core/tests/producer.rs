// File: crates/graph-core/tests/producer.rs
// Purpose: Validate the producer thread lifecycle: feeding, pause/resume,
// graceful stop, and shutdown on source failure.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use graph_core::{AxisParameters, GraphError, Producer, SampleSource, SignalBuffer};

const BLOCK: usize = 64;

#[derive(Default)]
struct SourceProbe {
    started: AtomicBool,
    stopped: AtomicBool,
    blocks_read: AtomicUsize,
    fail_reads: AtomicBool,
}

struct CountingSource {
    probe: Arc<SourceProbe>,
}

impl SampleSource for CountingSource {
    fn block_size(&self) -> usize {
        BLOCK
    }

    fn start(&mut self) -> Result<(), GraphError> {
        self.probe.started.store(true, Ordering::Release);
        Ok(())
    }

    fn read_block(&mut self, out: &mut [f32]) -> Result<(), GraphError> {
        if self.probe.fail_reads.load(Ordering::Acquire) {
            return Err(GraphError::Source { reason: "device lost".into() });
        }
        // Pace the loop like a real blocking device would.
        thread::sleep(Duration::from_millis(1));
        let block = self.probe.blocks_read.fetch_add(1, Ordering::AcqRel);
        out.fill((block % 100) as f32 / 100.0);
        Ok(())
    }

    fn stop(&mut self) {
        self.probe.stopped.store(true, Ordering::Release);
    }
}

fn spawn_producer() -> (Producer, Arc<SignalBuffer>, Arc<SourceProbe>) {
    let probe = Arc::new(SourceProbe::default());
    let source = Box::new(CountingSource { probe: Arc::clone(&probe) });
    let axis = AxisParameters::linear(0.0, 1.0).unwrap();
    let buffer = Arc::new(SignalBuffer::new(BLOCK, axis));
    let producer = Producer::start(source, Arc::clone(&buffer)).unwrap();
    (producer, buffer, probe)
}

fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

#[test]
fn started_producer_feeds_the_buffer() {
    let (producer, buffer, probe) = spawn_producer();
    assert!(probe.started.load(Ordering::Acquire));
    assert!(producer.is_running());

    let fed = wait_until(Duration::from_secs(2), || buffer.generation() >= 3);
    assert!(fed, "buffer generation never advanced");
    drop(producer);
}

#[test]
fn start_resizes_a_mismatched_buffer() {
    let probe = Arc::new(SourceProbe::default());
    let source = Box::new(CountingSource { probe });
    let axis = AxisParameters::linear(0.0, 1.0).unwrap();
    let buffer = Arc::new(SignalBuffer::new(BLOCK * 2, axis));
    let producer = Producer::start(source, Arc::clone(&buffer)).unwrap();
    assert_eq!(buffer.len(), BLOCK);
    drop(producer);
}

#[test]
fn pause_stops_feeding_without_releasing_the_source() {
    let (producer, buffer, probe) = spawn_producer();
    assert!(wait_until(Duration::from_secs(2), || buffer.generation() >= 2));

    producer.pause();
    assert!(producer.is_paused());
    // One block may already be in flight; after it lands the generation
    // must hold still.
    thread::sleep(Duration::from_millis(20));
    let settled = buffer.generation();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(buffer.generation(), settled);
    // The loop keeps draining the source while paused.
    assert!(!probe.stopped.load(Ordering::Acquire));

    producer.resume();
    assert!(!producer.is_paused());
    assert!(wait_until(Duration::from_secs(2), || buffer.generation() > settled));
    drop(producer);
}

#[test]
fn stop_joins_and_returns_the_released_source() {
    let (producer, _buffer, probe) = spawn_producer();
    assert!(wait_until(Duration::from_secs(2), || {
        probe.blocks_read.load(Ordering::Acquire) >= 1
    }));

    let source = producer.stop();
    assert!(source.is_some());
    // `stop` joined the thread, so the source release already happened.
    assert!(probe.stopped.load(Ordering::Acquire));
}

#[test]
fn read_failure_shuts_the_loop_down() {
    let (producer, _buffer, probe) = spawn_producer();
    probe.fail_reads.store(true, Ordering::Release);

    let halted = wait_until(Duration::from_secs(2), || !producer.is_running());
    assert!(halted, "producer kept running after a read failure");
    assert!(wait_until(Duration::from_secs(2), || {
        probe.stopped.load(Ordering::Acquire)
    }));
    drop(producer);
}
