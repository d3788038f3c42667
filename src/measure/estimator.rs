//! Calibrated length estimation.
//!
//! A reference object of known length (the lure) fixes how many centimetres one
//! pixel covers in the photo. The target (the fish) is then converted with that
//! scale and optionally multiplied by a perspective correction factor.
//!
//! Everything in this module is a pure function over value types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{MeasureError, MeasureResult};

/// Correction factor applied when no perspective correction is configured.
pub const DEFAULT_PERSPECTIVE_FACTOR: f64 = 1.0;

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in pixels.
    pub fn distance_to(&self, other: &Point) -> f64 {
        segment_length(*self, *other)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Which segment of a measurement a set of points belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentRole {
    /// The calibration object (lure).
    Reference,
    /// The measured object (fish).
    Target,
}

impl fmt::Display for SegmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentRole::Reference => write!(f, "reference"),
            SegmentRole::Target => write!(f, "target"),
        }
    }
}

/// Two points delimiting an object on the image. Point order does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Build a segment from picked points.
    ///
    /// The first two points are used. Fewer than two is an
    /// [`MeasureError::InsufficientInput`] tagged with `role`.
    pub fn from_points(points: &[Point], role: SegmentRole) -> MeasureResult<Self> {
        match points {
            [start, end, ..] => Ok(Self::new(*start, *end)),
            _ => Err(MeasureError::insufficient_input(role, points.len())),
        }
    }

    /// Pixel length of the segment.
    pub fn length_px(&self) -> f64 {
        segment_length(self.start, self.end)
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// True when both endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.length_px() == 0.0
    }
}

/// Physical length covered by one pixel, in cm/px.
///
/// Only obtainable through [`derive_scale`] or [`CalibrationScale::from_cm_per_px`],
/// so the wrapped value is always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CalibrationScale(f64);

impl CalibrationScale {
    /// Wrap an already known scale.
    pub fn from_cm_per_px(cm_per_px: f64) -> MeasureResult<Self> {
        ensure_positive("cm_per_px", cm_per_px).map(Self)
    }

    pub const fn cm_per_px(self) -> f64 {
        self.0
    }

    /// Convert a pixel distance to centimetres.
    pub fn to_cm(self, length_px: f64) -> f64 {
        length_px * self.0
    }

    /// Convert a physical length to pixels.
    pub fn to_px(self, length_cm: f64) -> f64 {
        length_cm / self.0
    }
}

impl TryFrom<f64> for CalibrationScale {
    type Error = MeasureError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_cm_per_px(value)
    }
}

impl From<CalibrationScale> for f64 {
    fn from(scale: CalibrationScale) -> Self {
        scale.0
    }
}

impl fmt::Display for CalibrationScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} cm/px", self.0)
    }
}

/// Outcome of comparing a length with a species size limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeVerdict {
    pub species: String,
    pub size_limit_cm: f64,
    /// `true` when the corrected length reaches the limit.
    pub meets_limit: bool,
}

/// A converted length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Pixel length of the target segment.
    pub target_length_px: f64,
    /// Length before perspective correction.
    pub raw_length_cm: f64,
    /// Multiplier applied to the raw length.
    pub perspective_factor: f64,
    /// `raw_length_cm * perspective_factor`
    pub corrected_length_cm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<SizeVerdict>,
}

impl MeasurementResult {
    pub fn with_classification(mut self, verdict: SizeVerdict) -> Self {
        self.classification = Some(verdict);
        self
    }

    /// Pass/fail of the attached classification, if any.
    pub fn meets_limit(&self) -> Option<bool> {
        self.classification.as_ref().map(|v| v.meets_limit)
    }
}

/// Euclidean distance between two points, in pixels.
pub fn segment_length(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Derive the cm/px scale from the reference segment and its real length.
///
/// # Errors
/// * [`MeasureError::InvalidParameter`] when `reference_length_cm` is not a
///   positive finite number.
/// * [`MeasureError::DegenerateReference`] when both reference points coincide.
pub fn derive_scale(
    reference_segment: &Segment,
    reference_length_cm: f64,
) -> MeasureResult<CalibrationScale> {
    ensure_positive("reference_length_cm", reference_length_cm)?;

    let length_px = reference_segment.length_px();
    if length_px == 0.0 {
        return Err(MeasureError::DegenerateReference);
    }

    CalibrationScale::from_cm_per_px(reference_length_cm / length_px)
}

/// Convert the target segment to centimetres and apply the perspective factor.
///
/// # Errors
/// [`MeasureError::InvalidParameter`] when `perspective_factor` is not a
/// positive finite number.
pub fn estimate_length(
    target_segment: &Segment,
    scale: CalibrationScale,
    perspective_factor: f64,
) -> MeasureResult<MeasurementResult> {
    ensure_positive("perspective_factor", perspective_factor)?;

    let target_length_px = target_segment.length_px();
    let raw_length_cm = scale.to_cm(target_length_px);

    Ok(MeasurementResult {
        target_length_px,
        raw_length_cm,
        perspective_factor,
        corrected_length_cm: raw_length_cm * perspective_factor,
        classification: None,
    })
}

/// [`estimate_length`] without perspective correction.
pub fn estimate_length_uncorrected(
    target_segment: &Segment,
    scale: CalibrationScale,
) -> MeasurementResult {
    let target_length_px = target_segment.length_px();
    let raw_length_cm = scale.to_cm(target_length_px);

    MeasurementResult {
        target_length_px,
        raw_length_cm,
        perspective_factor: DEFAULT_PERSPECTIVE_FACTOR,
        corrected_length_cm: raw_length_cm,
        classification: None,
    }
}

/// `true` iff the length meets or exceeds the size limit (inclusive).
pub fn classify(corrected_length_cm: f64, size_limit_cm: f64) -> bool {
    corrected_length_cm >= size_limit_cm
}

/// Accept finite values strictly greater than zero.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> MeasureResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeasureError::invalid_parameter(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_segment_length_matches_formula() {
        let p1 = Point::new(3.0, -4.5);
        let p2 = Point::new(-7.25, 10.0);
        let expected = ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt();

        assert!(approx(segment_length(p1, p2), expected));
        assert!(approx(segment_length(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0));
    }

    #[test]
    fn test_segment_length_symmetric() {
        let pairs = [
            (Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
            (Point::new(12.5, 7.0), Point::new(-3.0, 44.0)),
            (Point::new(1e6, 1e-3), Point::new(-1e6, 2.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(segment_length(a, b), segment_length(b, a));
        }
    }

    #[test]
    fn test_segment_from_points() {
        let points = [Point::new(1.0, 2.0), Point::new(4.0, 6.0)];
        let segment = Segment::from_points(&points, SegmentRole::Reference).unwrap();
        assert!(approx(segment.length_px(), 5.0));

        let extra = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(99.0, 99.0),
        ];
        let segment = Segment::from_points(&extra, SegmentRole::Target).unwrap();
        assert_eq!(segment.end, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_segment_from_too_few_points() {
        let err = Segment::from_points(&[], SegmentRole::Reference).unwrap_err();
        assert_eq!(
            err,
            MeasureError::InsufficientInput {
                role: SegmentRole::Reference,
                supplied: 0
            }
        );

        let err = Segment::from_points(&[Point::new(1.0, 1.0)], SegmentRole::Target).unwrap_err();
        assert_eq!(
            err,
            MeasureError::InsufficientInput {
                role: SegmentRole::Target,
                supplied: 1
            }
        );
    }

    #[test]
    fn test_derive_scale() {
        let scale = derive_scale(&seg(0.0, 0.0, 100.0, 0.0), 12.0).unwrap();
        assert!(approx(scale.cm_per_px(), 0.12));
    }

    #[test]
    fn test_derive_scale_roundtrips_reference_length() {
        let cases = [
            (seg(0.0, 0.0, 100.0, 0.0), 12.0),
            (seg(5.0, 9.0, 17.0, -3.0), 7.5),
            (seg(-120.0, 40.0, 880.0, 1320.5), 0.3),
            (seg(0.0, 0.0, 0.5, 0.5), 250.0),
        ];
        for (segment, length_cm) in cases {
            let scale = derive_scale(&segment, length_cm).unwrap();
            let back = scale.cm_per_px() * segment.length_px();
            assert!((back - length_cm).abs() < 1e-9 * length_cm.max(1.0));
        }
    }

    #[test]
    fn test_derive_scale_degenerate_reference() {
        let err = derive_scale(&seg(5.0, 5.0, 5.0, 5.0), 12.0).unwrap_err();
        assert_eq!(err, MeasureError::DegenerateReference);

        // Any distinct pair is accepted.
        assert!(derive_scale(&seg(5.0, 5.0, 5.0, 5.5), 12.0).is_ok());
    }

    #[test]
    fn test_derive_scale_invalid_reference_length() {
        let segment = seg(0.0, 0.0, 100.0, 0.0);
        for bad in [0.0, -12.0, f64::NAN, f64::INFINITY] {
            match derive_scale(&segment, bad) {
                Err(MeasureError::InvalidParameter { name, .. }) => {
                    assert_eq!(name, "reference_length_cm")
                }
                other => panic!("unexpected result for {bad}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_estimate_length_with_correction() {
        let scale = derive_scale(&seg(0.0, 0.0, 100.0, 0.0), 12.0).unwrap();
        let result = estimate_length(&seg(0.0, 10.0, 250.0, 10.0), scale, 1.15).unwrap();

        assert!(approx(result.target_length_px, 250.0));
        assert!(approx(result.raw_length_cm, 30.0));
        assert!(approx(result.corrected_length_cm, 34.5));
        assert!(result.classification.is_none());
    }

    #[test]
    fn test_estimate_length_unit_factor() {
        let scale = CalibrationScale::from_cm_per_px(0.037).unwrap();
        let target = seg(14.0, 3.0, 611.0, 402.0);

        let result = estimate_length(&target, scale, 1.0).unwrap();
        assert_eq!(result.corrected_length_cm, result.raw_length_cm);

        let plain = estimate_length_uncorrected(&target, scale);
        assert_eq!(plain, result);
    }

    #[test]
    fn test_estimate_length_invalid_factor() {
        let scale = CalibrationScale::from_cm_per_px(0.12).unwrap();
        let target = seg(0.0, 10.0, 350.0, 10.0);

        for bad in [-1.0, 0.0, f64::NAN] {
            match estimate_length(&target, scale, bad) {
                Err(MeasureError::InvalidParameter { name, .. }) => {
                    assert_eq!(name, "perspective_factor")
                }
                other => panic!("unexpected result for {bad}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_classify_inclusive_boundary() {
        assert!(classify(42.0, 42.0));
        assert!(classify(42.01, 42.0));
        assert!(!classify(41.99, 42.0));
        assert!(!classify(34.5, 42.0));
        assert!(classify(34.5, 30.0));
    }

    #[test]
    fn test_calibration_scale_rejects_non_positive() {
        assert!(CalibrationScale::from_cm_per_px(0.0).is_err());
        assert!(CalibrationScale::from_cm_per_px(-0.1).is_err());
        assert!(CalibrationScale::try_from(f64::INFINITY).is_err());

        let scale = CalibrationScale::from_cm_per_px(0.25).unwrap();
        assert!(approx(scale.to_px(scale.to_cm(80.0)), 80.0));
    }

    #[test]
    fn test_calibration_scale_serde() {
        let scale = CalibrationScale::from_cm_per_px(0.12).unwrap();
        let json = serde_json::to_string(&scale).unwrap();
        assert_eq!(json, "0.12");

        let parsed: CalibrationScale = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scale);
        assert!(serde_json::from_str::<CalibrationScale>("-1.0").is_err());
    }
}
