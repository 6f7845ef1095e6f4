// File: crates/graph-core/src/axis.rs
// Summary: Immutable per-axis value range and linear/log position transforms.

use crate::error::GraphError;

/// How values are laid out along an axis. All logarithmic math in the engine
/// is base 10 (decade semantics), both here and in the grid-line geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Log10,
}

/// The value range of one axis plus its display scale. Immutable once
/// constructed; every transform is a pure function.
///
/// A position is a normalized [0, 1] coordinate along the axis; a value is
/// in axis units (e.g. Hz).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisParameters {
    minimum: f32,
    maximum: f32,
    kind: ScaleKind,
}

impl AxisParameters {
    pub fn new(minimum: f32, maximum: f32, kind: ScaleKind) -> Result<Self, GraphError> {
        if maximum == minimum {
            return Err(GraphError::ZeroAxisSpan { value: minimum });
        }
        if kind == ScaleKind::Log10 {
            if minimum < 0.0 {
                return Err(GraphError::InvalidLogInput { value: minimum });
            }
            if maximum <= 0.0 {
                return Err(GraphError::InvalidLogInput { value: maximum });
            }
        }
        Ok(Self { minimum, maximum, kind })
    }

    pub fn linear(minimum: f32, maximum: f32) -> Result<Self, GraphError> {
        Self::new(minimum, maximum, ScaleKind::Linear)
    }

    pub fn minimum_value(&self) -> f32 {
        self.minimum
    }

    pub fn maximum_value(&self) -> f32 {
        self.maximum
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn span(&self) -> f32 {
        self.maximum - self.minimum
    }

    /// Linear position of a value along the axis range.
    pub fn value_to_position(&self, value: f32) -> f32 {
        (value - self.minimum) / self.span()
    }

    /// Value at a linear position along the axis range.
    pub fn position_to_value(&self, position: f32) -> f32 {
        self.minimum + position * self.span()
    }

    /// Value at a position once the display scale is applied. Linear axes
    /// reduce to [`position_to_value`](Self::position_to_value); log axes
    /// follow the decade curve `lo * (max / lo)^p`, where `lo` is the axis
    /// minimum or 1.0 when the axis starts at zero (an audio axis declared
    /// as 0..44100 Hz spans the decades of its maximum).
    pub fn position_to_scaled_value(&self, position: f32) -> f32 {
        match self.kind {
            ScaleKind::Linear => self.position_to_value(position),
            ScaleKind::Log10 => {
                let lo = self.log_floor();
                lo * (self.maximum / lo).powf(position)
            }
        }
    }

    /// Inverse of [`position_to_scaled_value`](Self::position_to_scaled_value).
    /// For log axes a non-positive value has no position and is reported.
    pub fn scaled_value_to_position(&self, value: f32) -> Result<f32, GraphError> {
        match self.kind {
            ScaleKind::Linear => Ok(self.value_to_position(value)),
            ScaleKind::Log10 => {
                if value <= 0.0 {
                    return Err(GraphError::InvalidLogInput { value });
                }
                let lo = self.log_floor();
                Ok((value / lo).log10() / (self.maximum / lo).log10())
            }
        }
    }

    fn log_floor(&self) -> f32 {
        if self.minimum > 0.0 {
            self.minimum
        } else {
            1.0
        }
    }
}
