//! Parsing of typed coordinates and numbers.
//!
//! Points can be typed as `x,y`, `(x, y)`, `[x, y]` or `x=.. y=..`. Several
//! points can be given on one line: `0,0 100,0` or `(0, 0) (100, 0)`.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::measure::Point;

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

static PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({NUMBER})\s*,\s*({NUMBER})")).expect("valid pair pattern")
});

static KEYED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"x\s*[=:]\s*({NUMBER}).*?y\s*[=:]\s*({NUMBER})"))
        .expect("valid keyed pattern")
});

/// Point/number parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointParseError {
    #[error("No coordinates found in: {0:?}")]
    NoCoordinates(String),
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
}

/// Parse every point found in `text`. Blank input yields no points.
pub fn parse_points(text: &str) -> Result<Vec<Point>, PointParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let lowered = text.to_lowercase();
    let keyed: Vec<_> = KEYED.captures_iter(&lowered).collect();
    let captures = if keyed.is_empty() {
        let pairs: Vec<_> = PAIR.captures_iter(text).collect();
        if let Some(glued) = pairs.iter().find_map(|caps| glued_token(text, &caps[0])) {
            return Err(PointParseError::InvalidNumber(glued));
        }
        pairs
    } else {
        keyed
    };

    if captures.is_empty() {
        return Err(PointParseError::NoCoordinates(text.to_string()));
    }

    captures
        .iter()
        .map(|caps| {
            let x = parse_number(&caps[1])?;
            let y = parse_number(&caps[2])?;
            Ok(Point::new(x, y))
        })
        .collect()
}

/// Parse exactly one point.
pub fn parse_point(text: &str) -> Result<Point, PointParseError> {
    parse_points(text)?
        .into_iter()
        .next()
        .ok_or_else(|| PointParseError::NoCoordinates(text.to_string()))
}

/// Parse a number typed in a form, accepting a decimal comma (`12,5`).
pub fn parse_decimal(text: &str) -> Result<f64, PointParseError> {
    let normalized = text.trim().replace(',', ".");
    parse_number(&normalized)
}

/// Format points back into the `x,y x,y` form accepted by [`parse_points`].
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The whitespace-delimited token around `matched` when the match is glued to
/// other digits or letters, as in `1x2,3`.
fn glued_token(text: &str, matched: &str) -> Option<String> {
    let start = matched.as_ptr() as usize - text.as_ptr() as usize;
    let end = start + matched.len();
    let is_glue = |c: char| c.is_alphanumeric() || c == '.';

    let before = text[..start].chars().next_back().is_some_and(is_glue);
    let after = text[end..].chars().next().is_some_and(is_glue);
    if !(before || after) {
        return None;
    }

    let token_start = text[..start]
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + 1);
    let token_end = text[end..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| end + i);
    Some(text[token_start..token_end].to_string())
}

fn parse_number(text: &str) -> Result<f64, PointParseError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PointParseError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point_bracket() {
        let point = parse_point("[540, 960]").unwrap();
        assert_eq!(point, Point::new(540.0, 960.0));
    }

    #[test]
    fn test_parse_point_parenthesis() {
        let point = parse_point("The lure tip is at (300.5, 500)").unwrap();
        assert_eq!(point, Point::new(300.5, 500.0));
    }

    #[test]
    fn test_parse_point_keyed() {
        let point = parse_point("X=12 Y: -4.25").unwrap();
        assert_eq!(point, Point::new(12.0, -4.25));
    }

    #[test]
    fn test_parse_points_line() {
        let points = parse_points("0,0 100,0").unwrap();
        assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);

        let points = parse_points("(0, 10) (350, 10)").unwrap();
        assert_eq!(points, vec![Point::new(0.0, 10.0), Point::new(350.0, 10.0)]);

        let points = parse_points("1.5,2;  -3,.5").unwrap();
        assert_eq!(points, vec![Point::new(1.5, 2.0), Point::new(-3.0, 0.5)]);
    }

    #[test]
    fn test_parse_points_exponent() {
        let points = parse_points("1e3,2 2.5E-1,-4").unwrap();
        assert_eq!(points, vec![Point::new(1000.0, 2.0), Point::new(0.25, -4.0)]);
    }

    #[test]
    fn test_parse_points_rejects_glued_digits() {
        assert_eq!(
            parse_points("1x2,3 4,5"),
            Err(PointParseError::InvalidNumber("1x2,3".to_string()))
        );
        assert_eq!(
            parse_points("0,0 100,0px"),
            Err(PointParseError::InvalidNumber("100,0px".to_string()))
        );
    }

    #[test]
    fn test_parse_points_blank_and_garbage() {
        assert!(parse_points("   ").unwrap().is_empty());
        assert!(matches!(
            parse_points("head and tail"),
            Err(PointParseError::NoCoordinates(_))
        ));
        assert!(parse_point("").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12").unwrap(), 12.0);
        assert_eq!(parse_decimal(" 12,5 ").unwrap(), 12.5);
        assert_eq!(parse_decimal("1.15").unwrap(), 1.15);
        assert!(parse_decimal("douze").is_err());
        assert!(parse_decimal("inf").is_err());
    }

    #[test]
    fn test_format_points_roundtrip() {
        let points = vec![Point::new(0.0, 10.0), Point::new(250.5, -3.0)];
        assert_eq!(format_points(&points), "0,10 250.5,-3");
        assert_eq!(parse_points(&format_points(&points)).unwrap(), points);
    }
}
