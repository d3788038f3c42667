//! Draw a measurement onto the photo.
//!
//! The lure and fish segments are drawn as lines with their length written at
//! the middle, plus a title line with the corrected length. Text needs a font
//! file; without one only the lines are drawn.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{get_messages, verdict_label};
use crate::measure::{Point, Segment, SessionReport};

/// Annotation errors.
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Failed to read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to read font file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid font file: {0}")]
    InvalidFont(String),
}

/// Colors and sizes used when drawing.
#[derive(Debug, Clone)]
pub struct AnnotationStyle {
    pub reference_color: Rgb<u8>,
    pub target_color: Rgb<u8>,
    pub legal_color: Rgb<u8>,
    pub undersized_color: Rgb<u8>,
    /// Line thickness as a fraction of the image's shorter side.
    pub thickness_ratio: f64,
    /// Label height as a fraction of the image's shorter side.
    pub text_ratio: f64,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            reference_color: Rgb([31u8, 119u8, 180u8]),
            target_color: Rgb([255u8, 127u8, 14u8]),
            legal_color: Rgb([0u8, 150u8, 0u8]),
            undersized_color: Rgb([200u8, 0u8, 0u8]),
            thickness_ratio: 0.004,
            text_ratio: 0.035,
        }
    }
}

/// Renders measurement reports onto images.
pub struct Annotator {
    font: Option<FontVec>,
    style: AnnotationStyle,
    lang: String,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    /// Create an annotator that draws lines only.
    pub fn new() -> Self {
        Self {
            font: None,
            style: AnnotationStyle::default(),
            lang: "fr".to_string(),
        }
    }

    /// Load a TTF/OTF font used for labels.
    pub fn with_font_file(self, path: impl AsRef<Path>) -> Result<Self, AnnotateError> {
        let data = fs::read(path.as_ref())?;
        self.with_font_data(data)
    }

    pub fn with_font_data(mut self, data: Vec<u8>) -> Result<Self, AnnotateError> {
        let font = FontVec::try_from_vec(data).map_err(|e| AnnotateError::InvalidFont(e.to_string()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Return a copy of `image` with the measurement drawn on it.
    pub fn render(&self, image: &RgbImage, report: &SessionReport) -> RgbImage {
        let mut canvas = image.clone();
        let short_side = canvas.width().min(canvas.height()).max(1) as f64;
        let thickness = ((short_side * self.style.thickness_ratio).round() as i32).max(1);
        let text_px = ((short_side * self.style.text_ratio) as f32).max(12.0);

        let reference = &report.calibration.reference;
        draw_thick_segment(&mut canvas, reference, thickness, self.style.reference_color);
        draw_thick_segment(&mut canvas, &report.target, thickness, self.style.target_color);

        let Some(font) = &self.font else {
            return canvas;
        };

        let scale = PxScale::from(text_px);
        let lure_label = format!("{:.1} cm", report.calibration.reference_length_cm);
        let fish_label = format!("{:.1} cm", report.result.corrected_length_cm);
        draw_label(&mut canvas, font, scale, reference.midpoint(), &lure_label);
        draw_label(&mut canvas, font, scale, report.target.midpoint(), &fish_label);

        let messages = get_messages(&self.lang);
        let mut title = format!(
            "{} ≈ {:.1} cm",
            messages.corrected_length, report.result.corrected_length_cm
        );
        let mut title_color = Rgb([0u8, 0u8, 0u8]);
        if let Some(verdict) = &report.result.classification {
            title.push_str(&format!(" - {}", verdict_label(verdict.meets_limit, &self.lang)));
            title_color = if verdict.meets_limit {
                self.style.legal_color
            } else {
                self.style.undersized_color
            };
        }
        let margin = (text_px / 2.0) as i32;
        let (w, h) = text_size(scale, font, &title);
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(margin / 2, margin / 2).of_size(w + margin as u32, h + margin as u32),
            Rgb([255u8, 255u8, 255u8]),
        );
        draw_text_mut(&mut canvas, title_color, margin, margin, scale, font, &title);

        canvas
    }

    /// Open `input`, draw the report and save to `output` (format from extension).
    pub fn annotate_file(
        &self,
        input: &Path,
        output: &Path,
        report: &SessionReport,
    ) -> Result<(), AnnotateError> {
        let image = load_photo(input)?;
        let points = [
            report.calibration.reference.start,
            report.calibration.reference.end,
            report.target.start,
            report.target.end,
        ];
        for point in points_outside(&points, image.width(), image.height()) {
            tracing::warn!("Point {} lies outside the {}x{} image", point, image.width(), image.height());
        }

        let annotated = self.render(&image, report);
        annotated.save(output)?;
        tracing::info!("Annotated image written to {}", output.display());
        Ok(())
    }
}

/// Decode a photo into RGB.
pub fn load_photo(path: &Path) -> Result<RgbImage, AnnotateError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Points that fall outside a `width` x `height` image.
pub fn points_outside(points: &[Point], width: u32, height: u32) -> Vec<Point> {
    points
        .iter()
        .copied()
        .filter(|p| p.x < 0.0 || p.y < 0.0 || p.x > width as f64 || p.y > height as f64)
        .collect()
}

/// `photo.jpg` -> `photo_mesure.png` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    input.with_file_name(format!("{stem}_mesure.png"))
}

fn draw_thick_segment(canvas: &mut RgbImage, segment: &Segment, thickness: i32, color: Rgb<u8>) {
    let dx = segment.end.x - segment.start.x;
    let dy = segment.end.y - segment.start.y;
    let length = dx.hypot(dy);
    // Offset along the normal; a zero-length segment is drawn as a single dot.
    let (nx, ny) = if length > 0.0 {
        (-dy / length, dx / length)
    } else {
        (0.0, 0.0)
    };

    let half = thickness / 2;
    for offset in -half..=half {
        let ox = nx * offset as f64;
        let oy = ny * offset as f64;
        draw_line_segment_mut(
            canvas,
            ((segment.start.x + ox) as f32, (segment.start.y + oy) as f32),
            ((segment.end.x + ox) as f32, (segment.end.y + oy) as f32),
            color,
        );
    }
}

fn draw_label(canvas: &mut RgbImage, font: &FontVec, scale: PxScale, at: Point, label: &str) {
    let (w, h) = text_size(scale, font, label);
    let pad = (scale.y / 4.0) as i32;
    let x = at.x as i32 - w as i32 / 2;
    let y = at.y as i32 - h as i32 - pad * 2;

    draw_filled_rect_mut(
        canvas,
        Rect::at(x - pad, y - pad).of_size(w + pad as u32 * 2, h + pad as u32 * 2),
        Rgb([255u8, 255u8, 255u8]),
    );
    draw_text_mut(canvas, Rgb([0u8, 0u8, 0u8]), x, y, scale, font, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeciesTable;
    use crate::measure::{run_session, SessionConfig};
    use std::env;

    fn report() -> SessionReport {
        run_session(
            SessionConfig::default().with_species("Bar"),
            &SpeciesTable::default(),
            &[Point::new(10.0, 10.0), Point::new(110.0, 10.0)],
            &[Point::new(10.0, 60.0), Point::new(260.0, 60.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_render_draws_segments() {
        let image = RgbImage::from_fn(300, 100, |_, _| Rgb([255u8, 255u8, 255u8]));
        let annotated = Annotator::new().render(&image, &report());

        assert_eq!(annotated.dimensions(), (300, 100));
        assert_eq!(*annotated.get_pixel(60, 10), AnnotationStyle::default().reference_color);
        assert_eq!(*annotated.get_pixel(150, 60), AnnotationStyle::default().target_color);
        assert_eq!(*annotated.get_pixel(150, 90), Rgb([255u8, 255u8, 255u8]));
    }

    #[test]
    fn test_annotate_file() {
        let dir = env::temp_dir();
        let input = dir.join("fish_gauge_test_input.png");
        let output = dir.join("fish_gauge_test_output.png");
        RgbImage::from_fn(300, 100, |_, _| Rgb([20u8, 40u8, 60u8]))
            .save(&input)
            .unwrap();

        Annotator::new().annotate_file(&input, &output, &report()).unwrap();
        let written = load_photo(&output).unwrap();
        assert_eq!(written.dimensions(), (300, 100));

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
    }

    #[test]
    fn test_invalid_font() {
        let result = Annotator::new().with_font_data(vec![0u8; 16]);
        assert!(matches!(result, Err(AnnotateError::InvalidFont(_))));
    }

    #[test]
    fn test_points_outside() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(640.0, 480.0),
            Point::new(-1.0, 5.0),
            Point::new(10.0, 481.0),
        ];
        assert_eq!(
            points_outside(&points, 640, 480),
            vec![Point::new(-1.0, 5.0), Point::new(10.0, 481.0)]
        );
    }

    #[test]
    fn test_default_output_path() {
        let out = default_output_path(Path::new("/tmp/peche/bar.jpg"));
        assert_eq!(out, PathBuf::from("/tmp/peche/bar_mesure.png"));
    }
}
