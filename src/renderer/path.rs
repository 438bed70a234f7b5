//! Line outlines for glissando segments
//!
//! Segments are drawn along the positive x axis from the origin; the caller
//! rotates them into place.

use crate::layout::Point;

/// A segment in a resolved path
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Move to starting point
    MoveTo(Point),
    /// Straight line to point
    LineTo(Point),
    /// Quadratic Bezier curve
    QuadraticTo { control: Point, end: Point },
    /// Smooth quadratic continuation; the control point is reflected from the previous curve
    SmoothQuadraticTo(Point),
}

/// A resolved path ready for SVG rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedPath {
    pub segments: Vec<PathSegment>,
}

impl ResolvedPath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Convert to SVG path `d` attribute string
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();

        for seg in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            match seg {
                PathSegment::MoveTo(p) => {
                    d.push_str(&format!("M{:.2} {:.2}", p.x, p.y));
                }
                PathSegment::LineTo(p) => {
                    d.push_str(&format!("L{:.2} {:.2}", p.x, p.y));
                }
                PathSegment::QuadraticTo { control, end } => {
                    d.push_str(&format!(
                        "Q{:.2} {:.2} {:.2} {:.2}",
                        control.x, control.y, end.x, end.y
                    ));
                }
                PathSegment::SmoothQuadraticTo(end) => {
                    d.push_str(&format!("T{:.2} {:.2}", end.x, end.y));
                }
            }
        }

        d
    }
}

/// A straight line of `length`
pub fn straight_path(length: f64) -> ResolvedPath {
    ResolvedPath {
        segments: vec![
            PathSegment::MoveTo(Point::zero()),
            PathSegment::LineTo(Point::new(length, 0.0)),
        ],
    }
}

/// A train of whole wiggles centered in `length`.
///
/// The number of wiggles is rounded down so they never overlap the ends;
/// a length shorter than one `advance` draws nothing.
pub fn wavy_path(length: f64, advance: f64, height: f64) -> ResolvedPath {
    if advance <= 0.0 || !length.is_finite() {
        return ResolvedPath::default();
    }
    let count = (length / advance).floor() as usize;
    if count == 0 {
        return ResolvedPath::default();
    }

    let start = (length - count as f64 * advance) * 0.5;
    let half = advance * 0.5;
    let mut segments = Vec::with_capacity(2 * count + 1);
    segments.push(PathSegment::MoveTo(Point::new(start, 0.0)));
    segments.push(PathSegment::QuadraticTo {
        control: Point::new(start + half * 0.5, -height * 2.0),
        end: Point::new(start + half, 0.0),
    });
    for i in 1..2 * count {
        segments.push(PathSegment::SmoothQuadraticTo(Point::new(
            start + half * (i + 1) as f64,
            0.0,
        )));
    }
    ResolvedPath { segments }
}
