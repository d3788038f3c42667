//! Error types for measurement operations.

use thiserror::Error;

use super::estimator::SegmentRole;

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors that can occur while calibrating or measuring.
///
/// Every variant is an input-validation failure. None of them is retried: the
/// attempt stops and the caller decides how to let the user try again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// Fewer than two points were supplied for a segment.
    #[error("{role} segment needs two points, got {supplied}")]
    InsufficientInput { role: SegmentRole, supplied: usize },

    /// Both reference points coincide, so no scale can be derived.
    #[error("reference segment has zero pixel length (both points are identical)")]
    DegenerateReference,

    /// A numeric parameter is zero, negative or not finite.
    #[error("invalid {name}: {value} (expected a finite number greater than zero)")]
    InvalidParameter { name: &'static str, value: f64 },

    /// No size limit is configured for the requested species.
    #[error("unknown species: {0:?}")]
    UnknownClassificationTarget(String),
}

impl MeasureError {
    /// Create an insufficient input error.
    #[must_use]
    pub const fn insufficient_input(role: SegmentRole, supplied: usize) -> Self {
        Self::InsufficientInput { role, supplied }
    }

    /// Create an invalid parameter error.
    #[must_use]
    pub const fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }

    /// Create an unknown classification target error.
    #[must_use]
    pub fn unknown_species(label: impl Into<String>) -> Self {
        Self::UnknownClassificationTarget(label.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeasureError::insufficient_input(SegmentRole::Target, 1);
        let text = format!("{err}");
        assert!(text.contains("target"));
        assert!(text.contains("got 1"));

        let err = MeasureError::DegenerateReference;
        assert!(format!("{err}").contains("zero pixel length"));

        let err = MeasureError::invalid_parameter("perspective_factor", -1.0);
        assert!(format!("{err}").contains("perspective_factor"));
        assert!(format!("{err}").contains("-1"));

        let err = MeasureError::unknown_species("Sandre");
        assert!(format!("{err}").contains("Sandre"));
    }
}
