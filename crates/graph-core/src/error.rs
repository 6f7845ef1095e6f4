// File: crates/graph-core/src/error.rs
// Summary: Typed, recoverable error taxonomy for the engine.

use thiserror::Error;

/// Every failure the engine can report. All variants are recoverable:
/// a rejected call leaves the component's state unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("axis has zero span at {value}")]
    ZeroAxisSpan { value: f32 },

    #[error("logarithmic transform requires a positive value, got {value}")]
    InvalidLogInput { value: f32 },

    #[error("grid needs at least 2 lines, got {count}")]
    TooFewGridLines { count: usize },

    #[error("buffer length {got} does not match expected length {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("invalid source range: minimum {min} is not below maximum {max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("resample target must hold at least one column")]
    EmptyTarget,

    #[error("sample source failed: {reason}")]
    Source { reason: String },
}
