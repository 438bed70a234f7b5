//! Glissando layout computation
//!
//! Turns the naive per-system segments of a [`SegmentPlanner`] into the final
//! connector geometry. The pipeline runs once per arrangement pass, after the
//! host has placed notes and finalized chord shapes:
//!
//! 1. **Detached mode**: without two note anchors, emit the placeholder segment
//! 2. **Planning**: ask the planner for one raw segment per system
//! 3. **Notehead centers**: move the outer ends from notehead origin to center
//!    (right edge of the start note on tablature)
//! 4. **Horizontal-line avoidance**: tilt lines between notes on the same line
//! 5. **System-initial widening**: reclaim room left of a system-initial end note
//! 6. **Interpolation**: put every system break on one constant slope
//! 7. **Chord-shape avoidance**: pull the outer ends clear of both chords
//! 8. **Finalize**: segment boxes and the connector bounding box
//! 9. **Attachment points**: spacing hints for anchors in the same measure
//!
//! ## Key Functions
//!
//! - [`layout_glissando`]: runs the whole pipeline
//! - [`endpoint_offsets`], [`reserves_system_start`], [`interpolate_segments`],
//!   [`avoid_chord_shapes`]: the individual steps

use crate::host::{
    Anchor, AttachPoint, ChordGeometry, ChordId, NoteGeometry, NoteId, ScoreView,
};

use super::config::LayoutConfig;
use super::planner::SegmentPlanner;
use super::segment::{GlissandoSegment, SegmentRole};
use super::types::{BoundingBox, Point};

/// Result of laying out one glissando
#[derive(Debug, Clone, PartialEq)]
pub struct GlissandoLayout {
    pub segments: Vec<GlissandoSegment>,
    /// Bounding box of the whole connector
    pub bbox: BoundingBox,
    /// Spacing hints for the anchor notes (empty unless both share a measure)
    pub attach_points: Vec<AttachPoint>,
    /// True when the placeholder geometry was used
    pub detached: bool,
}

impl GlissandoLayout {
    /// A layout with nothing to draw
    pub fn empty() -> Self {
        Self {
            segments: vec![],
            bbox: BoundingBox::zero(),
            attach_points: vec![],
            detached: false,
        }
    }
}

impl Default for GlissandoLayout {
    fn default() -> Self {
        Self::empty()
    }
}

/// A note anchor with its chord, resolved against the host document
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEnd {
    pub id: NoteId,
    pub note: NoteGeometry,
    pub chord_id: ChordId,
    pub chord: ChordGeometry,
}

impl ResolvedEnd {
    pub fn resolve(score: &dyn ScoreView, anchor: Option<Anchor>) -> Option<Self> {
        let id = anchor?.note()?;
        let note = score.note(id)?;
        let chord = score.chord(note.chord)?;
        Some(Self {
            id,
            chord_id: note.chord,
            note,
            chord,
        })
    }
}

/// Lay out a glissando between `start` and `end`.
///
/// `line_width` is in staff spaces. Missing or non-note anchors produce the
/// detached placeholder; an empty plan produces an empty layout.
pub fn layout_glissando(
    start: Option<Anchor>,
    end: Option<Anchor>,
    line_width: f64,
    score: &dyn ScoreView,
    planner: &dyn SegmentPlanner,
    config: &LayoutConfig,
) -> GlissandoLayout {
    let lw = config.sp(line_width);

    let (Some(first), Some(second)) = (
        ResolvedEnd::resolve(score, start),
        ResolvedEnd::resolve(score, end),
    ) else {
        if start.is_some() && end.is_some() {
            log::debug!("glissando anchors {:?} -> {:?} did not resolve to notes", start, end);
        }
        return placeholder_layout(config, lw);
    };

    let mut segments = planner.plan(score, first.id, second.id);
    if segments.is_empty() {
        log::debug!("no segments");
        return GlissandoLayout::empty();
    }

    let (offs1, offs2) = endpoint_offsets(&first, &second, config);
    apply_endpoint_offsets(&mut segments, offs1, offs2);

    if reserves_system_start(&first, &second) {
        widen_system_start(&mut segments, config.sp(config.system_start_widening));
    }

    interpolate_segments(&mut segments);
    avoid_chord_shapes(&mut segments, &first, &second, offs1, offs2, config);

    for segment in &mut segments {
        segment.layout(lw);
    }

    let bbox = connector_bbox(&segments, &second, score, lw);
    let attach_points = attach_points(&segments, &first, &second);

    GlissandoLayout {
        segments,
        bbox,
        attach_points,
        detached: false,
    }
}

/// The fixed-size single segment used in palettes and while dragging
pub fn placeholder_layout(config: &LayoutConfig, line_width: f64) -> GlissandoLayout {
    let (w, h) = config.palette_size;
    let mut segment = GlissandoSegment::new(
        None,
        SegmentRole::Single,
        Point::new(-config.sp(w) / 2.0, config.sp(h) / 2.0),
        Point::new(config.sp(w), -config.sp(h)),
    );
    segment.layout(line_width);
    let bbox = segment.bbox.translated(segment.pos);

    GlissandoLayout {
        segments: vec![segment],
        bbox,
        attach_points: vec![],
        detached: true,
    }
}

/// Sign of the pitch interval: 1 rising, -1 falling, 0 unison
pub fn pitch_direction(start_pitch: i32, end_pitch: i32) -> i32 {
    end_pitch.cmp(&start_pitch) as i32
}

/// Offsets moving the line ends from notehead origins to notehead centers,
/// plus the vertical tilt that keeps the line from being horizontal.
///
/// The start offset is added to the first segment's origin, the end offset
/// to the last segment's end point.
pub fn endpoint_offsets(
    start: &ResolvedEnd,
    end: &ResolvedEnd,
    config: &LayoutConfig,
) -> (Point, Point) {
    let start_tab = start.chord.staff.is_tab;
    let mut offs1 = if start_tab {
        Point::new(start.note.bbox.right(), 0.0)
    } else {
        Point::new(start.note.head_width * 0.5, 0.0)
    };
    let mut offs2 = Point::new(end.note.head_width * 0.5, 0.0);

    // On tablature both notes are on one string, so the line is always flat
    let nudge = if start_tab {
        config.sp(start.chord.staff.line_distance * config.tab_nudge_factor)
    } else if start.note.line == end.note.line {
        config.sp(config.same_line_nudge)
    } else {
        0.0
    };
    let up_down = f64::from(pitch_direction(start.note.pitch, end.note.pitch));
    if up_down != 0.0 {
        offs1.y += nudge * up_down;
        offs2.y -= nudge * up_down;
    }

    (offs1, offs2)
}

fn apply_endpoint_offsets(segments: &mut [GlissandoSegment], offs1: Point, offs2: Point) {
    if let Some(first) = segments.first_mut() {
        first.pos += offs1;
        first.pos2 -= offs1;
    }
    if let Some(last) = segments.last_mut() {
        last.pos2 += offs2;
    }
}

/// Whether the end chord opens its system and needs room taken from the header margin.
///
/// Grace notes after a chord never open a system, and a grace-before start
/// chord hanging off the end chord shares its space already.
pub fn reserves_system_start(start: &ResolvedEnd, end: &ResolvedEnd) -> bool {
    end.chord.first_in_system
        && !end.chord.note_type.is_grace_after()
        && start.chord.grace_parent != Some(end.chord_id)
}

fn widen_system_start(segments: &mut [GlissandoSegment], width: f64) {
    if let Some(last) = segments.last_mut() {
        last.pos.x -= width;
        last.pos2.x += width;
    }
}

/// Place every system break on the constant slope of the whole connector.
///
/// Total horizontal and vertical extents are preserved. Returns false when
/// nothing was changed: a single segment, or a zero total width.
pub fn interpolate_segments(segments: &mut [GlissandoSegment]) -> bool {
    let n = segments.len();
    if n < 2 {
        return false;
    }

    let x_tot: f64 = segments.iter().map(|s| s.pos2.x).sum();
    if x_tot == 0.0 || !x_tot.is_finite() {
        log::warn!("glissando spans {} segments with zero total width, skipping interpolation", n);
        return false;
    }

    let y0 = segments[0].pos.y;
    let y_tot = segments[n - 1].end().y - y0;
    let ratio = y_tot / x_tot;

    let mut x_curr = 0.0;
    for i in 0..n - 1 {
        x_curr += segments[i].pos2.x;
        let y_curr = y0 + ratio * x_curr;

        let segment = &mut segments[i];
        segment.pos2.y = y_curr - segment.pos.y;

        let next = &mut segments[i + 1];
        next.pos2.y += next.pos.y - y_curr;
        next.pos.y = y_curr;
    }
    true
}

/// Vertical change matching a horizontal change along `vector`
fn proportional_rise(vector: Point, dx: f64) -> f64 {
    if vector.x == 0.0 {
        0.0
    } else {
        vector.y * dx / vector.x
    }
}

/// Shorten the outer ends so the line starts and stops clear of both chords.
///
/// `offs1`/`offs2` are the notehead-center offsets applied earlier; they are
/// undone here before measuring against the chord outlines. Each end keeps
/// its segment's slope.
pub fn avoid_chord_shapes(
    segments: &mut [GlissandoSegment],
    start: &ResolvedEnd,
    end: &ResolvedEnd,
    offs1: Point,
    offs2: Point,
    config: &LayoutConfig,
) {
    let mut offs1 = -offs1;
    let mut offs2 = -offs2;

    let start_shape = start.chord.shape.without_lyrics();
    offs1.x += start_shape.right() - start.note.pos.x;
    if !end.chord.staff.is_tab {
        offs2.x -= end.chord.shape.left() + end.note.pos.x;
    }

    let clearance = config.sp(config.note_clearance);
    offs1.x += clearance;
    offs2.x -= clearance;

    if let Some(first) = segments.first_mut() {
        offs1.y = proportional_rise(first.pos2, offs1.x);
        first.pos += offs1;
        first.pos2 -= offs1;
    }
    if let Some(last) = segments.last_mut() {
        offs2.y = proportional_rise(last.pos2, offs2.x);
        last.pos2 += offs2;
    }
}

/// Bounding box of the last segment, measured from the end anchor within its system
fn connector_bbox(
    segments: &[GlissandoSegment],
    end: &ResolvedEnd,
    score: &dyn ScoreView,
    line_width: f64,
) -> BoundingBox {
    let Some(last) = segments.last() else {
        return BoundingBox::zero();
    };

    let system_page_pos = match end.chord.system.and_then(|id| score.system(id)) {
        Some(system) => system.page_pos,
        None => {
            log::warn!("end chord of glissando has no system, using segment position");
            last.pos
        }
    };

    let anchor = end.note.page_pos - system_page_pos;
    BoundingBox::from_corners(anchor - last.pos, anchor - last.pos - last.pos2)
        .padded(line_width * 0.5)
}

/// Horizontal reservations for anchor notes that share a measure
fn attach_points(
    segments: &[GlissandoSegment],
    start: &ResolvedEnd,
    end: &ResolvedEnd,
) -> Vec<AttachPoint> {
    let Some(first) = segments.first() else {
        return vec![];
    };
    match (start.note.measure, end.note.measure) {
        (Some(m1), Some(m2)) if m1 == m2 => {
            // Same measure means a single segment, so the front one spans both notes
            vec![
                AttachPoint {
                    note: start.id,
                    x: first.pos.x,
                },
                AttachPoint {
                    note: end.id,
                    x: first.pos.x + first.pos2.x,
                },
            ]
        }
        _ => vec![],
    }
}
