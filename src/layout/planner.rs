//! Splitting a connector into one raw segment per system
//!
//! The engine only post-processes what a [`SegmentPlanner`] hands it, so hosts
//! with their own line-breaking rules can plug in a different planner.

use crate::host::{NoteId, ScoreView, SystemId};

use super::segment::{GlissandoSegment, SegmentRole};
use super::types::Point;

/// Produces the naive segment placements for a connector between two notes.
///
/// Segments run notehead origin to notehead origin, in system order. An empty
/// result means the connector cannot be placed.
pub trait SegmentPlanner {
    fn plan(&self, score: &dyn ScoreView, start: NoteId, end: NoteId) -> Vec<GlissandoSegment>;
}

/// Default planner: one segment per non-frame system between the two anchors
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpanPlanner;

impl SystemSpanPlanner {
    pub fn new() -> Self {
        Self
    }
}

/// Anchor note origin relative to its system
fn line_pos(score: &dyn ScoreView, note: NoteId) -> Option<(SystemId, Point)> {
    let geometry = score.note(note)?;
    let chord = score.chord(geometry.chord)?;
    let Some(system_id) = chord.system else {
        log::debug!("no system for note {:?}", note);
        return None;
    };
    let system = score.system(system_id)?;
    Some((system_id, geometry.page_pos - system.page_pos))
}

impl SegmentPlanner for SystemSpanPlanner {
    fn plan(&self, score: &dyn ScoreView, start: NoteId, end: NoteId) -> Vec<GlissandoSegment> {
        let (Some((s1, p1)), Some((s2, p2))) = (line_pos(score, start), line_pos(score, end))
        else {
            return vec![];
        };

        let systems = score.systems();
        let (Some(idx1), Some(idx2)) = (
            systems.iter().position(|s| *s == s1),
            systems.iter().position(|s| *s == s2),
        ) else {
            return vec![];
        };
        if idx1 > idx2 {
            log::debug!("glissando ends on a system before it starts");
            return vec![];
        }

        let mut segments = Vec::with_capacity(idx2 - idx1 + 1);
        for (i, &system_id) in systems.iter().enumerate().take(idx2 + 1).skip(idx1) {
            let Some(system) = score.system(system_id) else {
                continue;
            };
            if system.is_vbox {
                continue;
            }

            let segment = if idx1 == idx2 {
                GlissandoSegment::new(
                    Some(system_id),
                    SegmentRole::Single,
                    p1,
                    Point::new(p2.x - p1.x, p2.y - p1.y),
                )
            } else if i == idx1 {
                GlissandoSegment::new(
                    Some(system_id),
                    SegmentRole::Begin,
                    p1,
                    Point::new(system.last_note_x - p1.x, 0.0),
                )
            } else if i == idx2 {
                let len = (p2.x - system.first_note_x).max(0.0);
                GlissandoSegment::new(
                    Some(system_id),
                    SegmentRole::End,
                    Point::new(p2.x - len, p2.y),
                    Point::new(len, 0.0),
                )
            } else {
                GlissandoSegment::new(
                    Some(system_id),
                    SegmentRole::Middle,
                    Point::new(system.first_note_x, p1.y),
                    Point::new(system.last_note_x - system.first_note_x, 0.0),
                )
            };
            segments.push(segment);
        }
        segments
    }
}
