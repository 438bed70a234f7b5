//! Rendered fragments of a glissando, one per system it crosses

use crate::host::SystemId;

use super::types::{BoundingBox, Point};

/// Where a segment sits within the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// The whole connector fits on one system
    Single,
    Begin,
    Middle,
    End,
}

/// One visually contiguous piece of a glissando
///
/// `pos` is the start point relative to the containing system and `pos2`
/// the end point relative to `pos`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlissandoSegment {
    /// None for the detached placeholder
    pub system: Option<SystemId>,
    pub role: SegmentRole,
    pub pos: Point,
    pub pos2: Point,
    /// Set by [`GlissandoSegment::layout`], relative to `pos`
    pub bbox: BoundingBox,
}

impl GlissandoSegment {
    pub fn new(system: Option<SystemId>, role: SegmentRole, pos: Point, pos2: Point) -> Self {
        Self {
            system,
            role,
            pos,
            pos2,
            bbox: BoundingBox::zero(),
        }
    }

    /// End point relative to the containing system
    pub fn end(&self) -> Point {
        self.pos + self.pos2
    }

    /// Length of the drawn line
    pub fn length(&self) -> f64 {
        self.pos2.length()
    }

    /// Compute the bounding box, padded by half the pen width on every side
    pub fn layout(&mut self, line_width: f64) {
        self.bbox = BoundingBox::from_corners(Point::zero(), self.pos2).padded(line_width * 0.5);
    }
}
