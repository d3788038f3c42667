// Copyright 2025 The fish-gauge Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # fish-gauge
//!
//! Estimate the length of a fish from a photo, using a lure of known length
//! lying in the same picture as the scale reference.
//!
//! Two points mark the ends of the lure, two more mark the fish from head to
//! tail. The lure fixes the centimetres-per-pixel scale, the fish's pixel
//! length is converted with it and multiplied by a perspective factor, and the
//! result can be checked against a species' legal size.
//!
//! ## Example
//!
//! ```rust
//! use fish_gauge::{run_session, Point, SessionConfig, SpeciesTable};
//!
//! let config = SessionConfig::default()
//!     .with_reference_length(12.0)
//!     .with_perspective_factor(1.15)
//!     .with_species("Bar");
//!
//! let report = run_session(
//!     config,
//!     &SpeciesTable::default(),
//!     &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
//!     &[Point::new(0.0, 10.0), Point::new(250.0, 10.0)],
//! )?;
//!
//! assert!((report.result.corrected_length_cm - 34.5).abs() < 1e-9);
//! assert_eq!(report.result.meets_limit(), Some(false));
//! # Ok::<(), fish_gauge::MeasureError>(())
//! ```

pub mod annotate;
pub mod config;
pub mod gui;
pub mod measure;
pub mod points;
pub mod settings;

pub use annotate::{AnnotateError, AnnotationStyle, Annotator};
pub use config::{SizeClass, SpeciesTable, SpeciesTableError};
pub use measure::{
    classify, derive_scale, estimate_length, estimate_length_uncorrected, run_session,
    segment_length, Calibration, CalibrationScale, MeasureError, MeasureResult,
    MeasurementResult, MeasurementSession, Point, Segment, SegmentRole, SessionConfig,
    SessionReport, SizeVerdict,
};
pub use points::{parse_decimal, parse_point, parse_points, PointParseError};
pub use settings::AppSettings;
