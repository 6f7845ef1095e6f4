// File: crates/graph-core/src/lib.rs
// Summary: Core library entry point; viewport, resampling and grid geometry engine.

pub mod axis;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod producer;
pub mod signal;
pub mod types;
pub mod viewport;

pub use axis::{AxisParameters, ScaleKind};
pub use error::GraphError;
pub use frame::{FrameCoordinator, FrameOutput, TraceOutput};
pub use geometry::DrawableArea;
pub use grid::{AxisOrientation, ChildScale, GridLines, GridScale, LinePosition, VisibleLine};
pub use producer::{Producer, SampleSource};
pub use signal::{ResampleMode, SignalBuffer};
pub use types::{LineStyle, FRAME_INTERVAL};
pub use viewport::Viewport;
