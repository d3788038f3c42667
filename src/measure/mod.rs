//! Calibrated length measurement: scale derivation, length estimation and
//! size classification.

mod error;
mod estimator;
mod session;

pub use error::{MeasureError, MeasureResult};
pub use estimator::{
    classify, derive_scale, estimate_length, estimate_length_uncorrected, segment_length,
    CalibrationScale, MeasurementResult, Point, Segment, SegmentRole, SizeVerdict,
    DEFAULT_PERSPECTIVE_FACTOR,
};
pub use session::{
    run_session, Calibration, MeasurementSession, SessionConfig, SessionReport,
    DEFAULT_LURE_LENGTH_CM, DEFAULT_SESSION_PERSPECTIVE,
};
