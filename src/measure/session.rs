//! One measurement session: calibrate on the lure, then measure the fish.
//!
//! All parameters the user entered travel in an explicit [`SessionConfig`]
//! value. Nothing is kept between sessions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::MeasureResult;
use super::estimator::{
    derive_scale, ensure_positive, estimate_length, CalibrationScale, MeasurementResult, Point,
    Segment, SegmentRole, DEFAULT_PERSPECTIVE_FACTOR,
};
use crate::config::{SizeClass, SpeciesTable};

/// Default lure length, in cm.
pub const DEFAULT_LURE_LENGTH_CM: f64 = 12.0;

/// Correction pre-filled by the front ends for a fish held in front of the lure.
pub const DEFAULT_SESSION_PERSPECTIVE: f64 = 1.15;

/// Parameters of a measurement session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Real length of the reference object, in cm.
    pub reference_length_cm: f64,
    /// Multiplier applied to the raw fish length. 1.0 unless configured.
    pub perspective_factor: f64,
    /// Species to classify against, if any.
    pub species: Option<String>,
    /// Photo the points were taken from. Only used for display.
    pub image_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reference_length_cm: DEFAULT_LURE_LENGTH_CM,
            perspective_factor: DEFAULT_PERSPECTIVE_FACTOR,
            species: None,
            image_path: None,
        }
    }
}

impl SessionConfig {
    pub fn with_reference_length(mut self, reference_length_cm: f64) -> Self {
        self.reference_length_cm = reference_length_cm;
        self
    }

    pub fn with_perspective_factor(mut self, perspective_factor: f64) -> Self {
        self.perspective_factor = perspective_factor;
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn without_species(mut self) -> Self {
        self.species = None;
        self
    }

    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Check the numeric parameters and resolve the species.
    ///
    /// Runs before any point is looked at, in the same order a form would be
    /// checked: lure length, perspective factor, species.
    pub fn validate(&self, table: &SpeciesTable) -> MeasureResult<Option<SizeClass>> {
        ensure_positive("reference_length_cm", self.reference_length_cm)?;
        ensure_positive("perspective_factor", self.perspective_factor)?;

        self.species
            .as_deref()
            .map(|label| table.resolve(label).cloned())
            .transpose()
    }
}

/// Scale derived from the reference segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub reference: Segment,
    pub reference_length_cm: f64,
    pub scale: CalibrationScale,
}

/// Everything produced by one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub calibration: Calibration,
    pub target: Segment,
    pub result: MeasurementResult,
}

/// A validated session, ready to take points.
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    config: SessionConfig,
    size_class: Option<SizeClass>,
}

impl MeasurementSession {
    /// Validate `config` against `table` and open a session.
    pub fn new(config: SessionConfig, table: &SpeciesTable) -> MeasureResult<Self> {
        let size_class = config.validate(table)?;
        Ok(Self { config, size_class })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Size limit the result will be classified against, if any.
    pub fn size_class(&self) -> Option<&SizeClass> {
        self.size_class.as_ref()
    }

    /// Derive the scale from the lure points.
    pub fn calibrate(&self, reference_points: &[Point]) -> MeasureResult<Calibration> {
        let reference = Segment::from_points(reference_points, SegmentRole::Reference)?;
        let scale = derive_scale(&reference, self.config.reference_length_cm)?;

        Ok(Calibration {
            reference,
            reference_length_cm: self.config.reference_length_cm,
            scale,
        })
    }

    /// Measure the fish with an existing calibration.
    pub fn measure_with(
        &self,
        calibration: &Calibration,
        target_points: &[Point],
    ) -> MeasureResult<SessionReport> {
        let target = Segment::from_points(target_points, SegmentRole::Target)?;
        let mut result = estimate_length(&target, calibration.scale, self.config.perspective_factor)?;

        if let Some(class) = &self.size_class {
            let verdict = class.verdict(result.corrected_length_cm);
            result = result.with_classification(verdict);
        }

        Ok(SessionReport {
            calibration: *calibration,
            target,
            result,
        })
    }

    /// Calibrate, measure and classify in one go.
    pub fn measure(
        &self,
        reference_points: &[Point],
        target_points: &[Point],
    ) -> MeasureResult<SessionReport> {
        let calibration = self.calibrate(reference_points)?;
        self.measure_with(&calibration, target_points)
    }
}

/// Run a whole session from a config and two point lists.
pub fn run_session(
    config: SessionConfig,
    table: &SpeciesTable,
    reference_points: &[Point],
    target_points: &[Point],
) -> MeasureResult<SessionReport> {
    MeasurementSession::new(config, table)?.measure(reference_points, target_points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MeasureError;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    fn lure() -> Vec<Point> {
        pts(&[(0.0, 0.0), (100.0, 0.0)])
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::default()
            .with_reference_length(9.5)
            .with_perspective_factor(1.0)
            .with_species("Bar")
            .with_image_path("photo.jpg");

        assert_eq!(config.reference_length_cm, 9.5);
        assert_eq!(config.perspective_factor, 1.0);
        assert_eq!(config.species.as_deref(), Some("Bar"));
        assert_eq!(config.image_path, Some(PathBuf::from("photo.jpg")));
        assert!(config.without_species().species.is_none());
    }

    #[test]
    fn test_validate_order() {
        let table = SpeciesTable::default();

        let config = SessionConfig::default()
            .with_reference_length(0.0)
            .with_perspective_factor(-1.0)
            .with_species("Sandre");
        assert!(matches!(
            config.validate(&table),
            Err(MeasureError::InvalidParameter {
                name: "reference_length_cm",
                ..
            })
        ));

        let config = config.with_reference_length(12.0);
        assert!(matches!(
            config.validate(&table),
            Err(MeasureError::InvalidParameter {
                name: "perspective_factor",
                ..
            })
        ));

        let config = config.with_perspective_factor(1.15);
        assert_eq!(
            config.validate(&table),
            Err(MeasureError::UnknownClassificationTarget("Sandre".to_string()))
        );
    }

    #[test]
    fn test_default_config_applies_no_correction() {
        let report = run_session(
            SessionConfig::default(),
            &SpeciesTable::empty(),
            &lure(),
            &pts(&[(0.0, 10.0), (250.0, 10.0)]),
        )
        .unwrap();

        assert_eq!(report.result.perspective_factor, 1.0);
        assert_eq!(report.result.corrected_length_cm, report.result.raw_length_cm);
        assert!((report.result.raw_length_cm - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_below_limit() {
        let config = SessionConfig::default()
            .with_perspective_factor(DEFAULT_SESSION_PERSPECTIVE)
            .with_species("Bar");
        let session = MeasurementSession::new(config, &SpeciesTable::default()).unwrap();

        let report = session
            .measure(&lure(), &pts(&[(0.0, 10.0), (250.0, 10.0)]))
            .unwrap();

        assert!((report.calibration.scale.cm_per_px() - 0.12).abs() < 1e-9);
        assert!((report.result.raw_length_cm - 30.0).abs() < 1e-9);
        assert!((report.result.corrected_length_cm - 34.5).abs() < 1e-9);
        assert_eq!(report.result.meets_limit(), Some(false));
    }

    #[test]
    fn test_measure_above_limit() {
        let table = SpeciesTable::from_entries([SizeClass::new("Test", 30.0)]).unwrap();
        let config = SessionConfig::default().with_species("Test");

        let report = run_session(config, &table, &lure(), &pts(&[(0.0, 10.0), (250.0, 10.0)]))
            .unwrap();
        assert_eq!(report.result.meets_limit(), Some(true));
    }

    #[test]
    fn test_measure_without_species() {
        let config = SessionConfig::default().with_perspective_factor(1.0);
        let report = run_session(
            config,
            &SpeciesTable::empty(),
            &lure(),
            &pts(&[(0.0, 10.0), (350.0, 10.0)]),
        )
        .unwrap();

        assert!((report.result.raw_length_cm - 42.0).abs() < 1e-9);
        assert_eq!(report.result.corrected_length_cm, report.result.raw_length_cm);
        assert!(report.result.classification.is_none());
    }

    #[test]
    fn test_missing_points_name_the_segment() {
        let session =
            MeasurementSession::new(SessionConfig::default(), &SpeciesTable::default()).unwrap();

        let err = session.measure(&pts(&[(1.0, 1.0)]), &lure()).unwrap_err();
        assert_eq!(err, MeasureError::insufficient_input(SegmentRole::Reference, 1));

        let err = session.measure(&lure(), &[]).unwrap_err();
        assert_eq!(err, MeasureError::insufficient_input(SegmentRole::Target, 0));
    }

    #[test]
    fn test_identical_lure_points() {
        let session =
            MeasurementSession::new(SessionConfig::default(), &SpeciesTable::default()).unwrap();
        let err = session
            .calibrate(&pts(&[(5.0, 5.0), (5.0, 5.0)]))
            .unwrap_err();
        assert_eq!(err, MeasureError::DegenerateReference);
    }

    #[test]
    fn test_report_json_round_trip() {
        let config = SessionConfig::default()
            .with_reference_length(7.3)
            .with_perspective_factor(1.07)
            .with_species("Bar");
        let report = run_session(
            config,
            &SpeciesTable::default(),
            &pts(&[(0.0, 0.0), (33.3, 17.1)]),
            &pts(&[(12.7, 4.1), (219.9, 83.3)]),
        )
        .unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: SessionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(
            back.calibration.scale.cm_per_px().to_bits(),
            report.calibration.scale.cm_per_px().to_bits()
        );
    }
}
