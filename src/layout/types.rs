//! Core geometric types for the layout engine

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::Deserialize;

/// A 2D point (or displacement) in the coordinate system, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean length when the point is read as a vector
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle; width and height are never negative once normalized
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Rectangle spanned by two corner points, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x - a.x, b.y - a.y).normalized()
    }

    /// Flip negative extents so width and height are positive or zero
    pub fn normalized(&self) -> BoundingBox {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        BoundingBox::new(x, y, width, height)
    }

    /// Grow the box by `pad` on every side
    pub fn padded(&self, pad: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - pad,
            self.y - pad,
            self.width + 2.0 * pad,
            self.height + 2.0 * pad,
        )
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// The same box moved by `offset`
    pub fn translated(&self, offset: Point) -> BoundingBox {
        BoundingBox::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// What produced a rectangle of a chord outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Notehead,
    Stem,
    Hook,
    Accidental,
    Dot,
    Articulation,
    Arpeggio,
    Lyrics,
    Text,
    /// A rectangle with no owning item
    Anonymous,
}

impl ShapeKind {
    /// Text-like items are ignored when measuring how far a shape reaches left
    pub fn is_text(&self) -> bool {
        matches!(self, ShapeKind::Lyrics | ShapeKind::Text)
    }
}

/// One rectangle of a chord outline, relative to the chord origin
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ShapeElement {
    pub bbox: BoundingBox,
    pub kind: ShapeKind,
}

impl ShapeElement {
    pub fn new(kind: ShapeKind, bbox: BoundingBox) -> Self {
        Self { bbox, kind }
    }
}

/// Combined outline of a chord's child elements
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    pub elements: Vec<ShapeElement>,
}

impl Shape {
    pub fn new(elements: Vec<ShapeElement>) -> Self {
        Self { elements }
    }

    /// The outline without lyrics and without rectangles that belong to no item
    pub fn without_lyrics(&self) -> Shape {
        Shape::new(
            self.elements
                .iter()
                .filter(|e| !matches!(e.kind, ShapeKind::Lyrics | ShapeKind::Anonymous))
                .copied()
                .collect(),
        )
    }

    /// Distance the outline reaches left of the origin, as a non-negative number.
    ///
    /// Zero-height rectangles and text are not counted.
    pub fn left(&self) -> f64 {
        let dist = self
            .elements
            .iter()
            .filter(|e| e.bbox.height != 0.0 && !e.kind.is_text())
            .map(|e| e.bbox.x)
            .fold(0.0_f64, f64::min);
        -dist
    }

    /// Rightmost x of the outline, never less than zero
    pub fn right(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.bbox.right())
            .fold(0.0_f64, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);
        assert_eq!(a + b, Point::new(4.0, 1.0));
        assert_eq!(a - b, Point::new(-2.0, 3.0));
        assert_eq!(-a, Point::new(-1.0, -2.0));
    }

    #[test]
    fn test_bounding_box_edges() {
        let bb = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bb.right(), 110.0);
        assert_eq!(bb.bottom(), 70.0);
    }

    #[test]
    fn test_normalized_flips_negative_extents() {
        let bb = BoundingBox::new(10.0, 10.0, -4.0, -6.0).normalized();
        assert_eq!(bb, BoundingBox::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn test_from_corners_any_order() {
        let a = BoundingBox::from_corners(Point::new(5.0, 0.0), Point::new(0.0, 3.0));
        let b = BoundingBox::from_corners(Point::new(0.0, 3.0), Point::new(5.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(a, BoundingBox::new(0.0, 0.0, 5.0, 3.0));
    }

    #[test]
    fn test_padded() {
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 0.0).padded(0.5);
        assert_eq!(bb, BoundingBox::new(-0.5, -0.5, 11.0, 1.0));
    }

    #[test]
    fn test_default_box_is_zero() {
        assert_eq!(BoundingBox::default(), BoundingBox::zero());
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let b = BoundingBox::new(100.0, 100.0, 50.0, 50.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn test_shape_extents() {
        let shape = Shape::new(vec![
            ShapeElement::new(ShapeKind::Notehead, BoundingBox::new(0.0, -0.5, 1.2, 1.0)),
            ShapeElement::new(ShapeKind::Accidental, BoundingBox::new(-1.0, -1.5, 0.8, 2.5)),
            ShapeElement::new(ShapeKind::Lyrics, BoundingBox::new(-3.0, 4.0, 8.0, 1.5)),
        ]);
        assert_eq!(shape.left(), 1.0);
        assert_eq!(shape.right(), 5.0);
        assert_eq!(shape.without_lyrics().right(), 1.2);
    }

    #[test]
    fn test_shape_left_ignores_flat_rects() {
        let shape = Shape::new(vec![ShapeElement::new(
            ShapeKind::Stem,
            BoundingBox::new(-2.0, 0.0, 0.1, 0.0),
        )]);
        assert_eq!(shape.left(), 0.0);
    }

    #[test]
    fn test_empty_shape_extents() {
        let shape = Shape::default();
        assert_eq!(shape.left(), 0.0);
        assert_eq!(shape.right(), 0.0);
    }
}
