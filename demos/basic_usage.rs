//! Basic usage example for fish-gauge.

use fish_gauge::config::summary_lines;
use fish_gauge::{MeasurementSession, Point, SessionConfig, SizeClass, SpeciesTable};

fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Size limits to check against
    let mut table = SpeciesTable::default();
    table.insert(SizeClass::new("Sandre", 50.0))?;

    // A 12 cm lure, fish held a bit closer to the camera
    let config = SessionConfig::default()
        .with_reference_length(12.0)
        .with_perspective_factor(1.15)
        .with_species("Bar");

    let session = MeasurementSession::new(config, &table)?;

    println!("🎣 Calibrating on the lure...\n");
    let calibration = session.calibrate(&[Point::new(120.0, 340.0), Point::new(220.0, 340.0)])?;
    println!("Scale: {}", calibration.scale);

    let report = session.measure_with(
        &calibration,
        &[Point::new(90.0, 520.0), Point::new(340.0, 520.0)],
    )?;

    for line in summary_lines(&report, "en") {
        println!("{}", line);
    }

    match report.result.meets_limit() {
        Some(true) => println!("\n✅ Keep it"),
        Some(false) => println!("\n❌ Release it"),
        None => {}
    }

    Ok(())
}
