//! Self-contained host document read from TOML
//!
//! A [`Scene`] holds already-placed systems, chords and notes plus the
//! glissandi between them. It implements the read-only host interfaces so
//! the layout engine, the pitch resolver and the note guesser can run
//! without a full notation program.
//!
//! ```toml
//! [scale]
//! clef = "treble"
//! key = 0
//!
//! [[systems]]
//! id = 0
//! page_pos = { x = 10.0, y = 20.0 }
//! first_note_x = 8.0
//! last_note_x = 100.0
//!
//! [[chords]]
//! id = 0
//! system = 0
//! tick = 0
//!
//! [[notes]]
//! id = 0
//! chord = 0
//! page_pos = { x = 20.0, y = 25.0 }
//! pitch = 60
//! line = 10
//! measure = 0
//!
//! [[glissandi]]
//! start = { note = 0 }
//! end = { note = 1 }
//! style = "diatonic"
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use toml::Spanned;

use crate::error::SceneError;
use crate::glissando::{Glissando, GlissandoRecord};
use crate::guess::{TimelineChord, TimelineColumn, TimelineView};
use crate::host::{
    Anchor, AttachPoint, ChordGeometry, ChordId, MeasureId, NoteGeometry, NoteId, NoteType,
    ScoreView, StaffInfo, SystemGeometry, SystemId,
};
use crate::layout::{BoundingBox, GlissandoLayout, LayoutConfig, Point, Shape, SystemSpanPlanner};
use crate::playback::{Clef, StaffScale, MIDDLE_C, PITCH_RANGE};
use crate::style::EngravingStyle;

/// Notehead width used when a note does not give one, in staff spaces
const DEFAULT_HEAD_WIDTH: f64 = 1.18;

/// Chord length used when a chord does not give one, in ticks
const DEFAULT_DURATION: i64 = 480;

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    scale: ScaleEntry,
    #[serde(default)]
    systems: Vec<SystemEntry>,
    #[serde(default)]
    chords: Vec<ChordEntry>,
    #[serde(default)]
    notes: Vec<NoteEntry>,
    #[serde(default)]
    glissandi: Vec<GlissandoEntry>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ScaleEntry {
    clef: Clef,
    key: i32,
    transpose: i32,
}

#[derive(Deserialize)]
struct SystemEntry {
    id: Spanned<SystemId>,
    #[serde(default)]
    page_pos: Point,
    #[serde(default)]
    first_note_x: f64,
    #[serde(default)]
    last_note_x: f64,
    #[serde(default)]
    vbox: bool,
}

#[derive(Deserialize)]
struct ChordEntry {
    id: Spanned<ChordId>,
    system: Option<Spanned<SystemId>>,
    #[serde(default)]
    staff: StaffInfo,
    #[serde(default)]
    shape: Shape,
    #[serde(default)]
    first_in_system: bool,
    #[serde(default)]
    note_type: NoteType,
    grace_parent: Option<Spanned<ChordId>>,
    #[serde(default)]
    track: u32,
    #[serde(default)]
    part: u32,
    #[serde(default)]
    tick: i64,
    duration: Option<i64>,
}

#[derive(Deserialize)]
struct NoteEntry {
    id: Spanned<NoteId>,
    chord: Spanned<ChordId>,
    #[serde(default)]
    pos: Point,
    #[serde(default)]
    page_pos: Point,
    head_width: Option<f64>,
    bbox: Option<BoundingBox>,
    #[serde(default)]
    line: i32,
    pitch: Option<Spanned<i32>>,
    measure: Option<MeasureId>,
}

#[derive(Deserialize)]
struct GlissandoEntry {
    start: Option<Anchor>,
    end: Option<Anchor>,
    line_width: Option<f64>,
    #[serde(flatten)]
    record: GlissandoRecord,
}

#[derive(Debug, Clone)]
struct SceneChord {
    geometry: ChordGeometry,
    timeline: TimelineChord,
}

/// In-memory host document
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Systems in document order
    systems: Vec<(SystemId, SystemGeometry)>,
    chords: BTreeMap<ChordId, SceneChord>,
    notes: BTreeMap<NoteId, NoteGeometry>,
    scale: StaffScale,
    glissandi: Vec<Glissando>,
}

fn check_unique<T: Copy + Eq + std::hash::Hash>(
    seen: &mut HashSet<T>,
    id: &Spanned<T>,
    kind: &'static str,
    raw: impl Fn(T) -> u32,
) -> Result<(), SceneError> {
    if seen.insert(*id.get_ref()) {
        Ok(())
    } else {
        Err(SceneError::DuplicateId {
            kind,
            id: raw(*id.get_ref()),
            span: id.span(),
        })
    }
}

impl Scene {
    /// Load a scene from a TOML file, styling its glissandi with the default style
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        Self::from_str_with_style(content, &EngravingStyle::default())
    }

    /// Load a scene, taking glissando display defaults from `style`
    pub fn from_str_with_style(content: &str, style: &EngravingStyle) -> Result<Self, SceneError> {
        let file: SceneFile = toml::from_str(content)?;

        let mut seen_systems = HashSet::new();
        let mut systems = Vec::with_capacity(file.systems.len());
        for entry in &file.systems {
            check_unique(&mut seen_systems, &entry.id, "system", |id| id.0)?;
            systems.push((
                *entry.id.get_ref(),
                SystemGeometry {
                    page_pos: entry.page_pos,
                    first_note_x: entry.first_note_x,
                    last_note_x: entry.last_note_x,
                    is_vbox: entry.vbox,
                },
            ));
        }

        let mut seen_chords = HashSet::new();
        for entry in &file.chords {
            check_unique(&mut seen_chords, &entry.id, "chord", |id| id.0)?;
        }

        let mut chords = BTreeMap::new();
        for entry in &file.chords {
            if let Some(system) = &entry.system {
                if !seen_systems.contains(system.get_ref()) {
                    return Err(SceneError::UnknownReference {
                        kind: "system",
                        id: system.get_ref().0,
                        span: Some(system.span()),
                    });
                }
            }
            if let Some(parent) = &entry.grace_parent {
                if !seen_chords.contains(parent.get_ref()) {
                    return Err(SceneError::UnknownReference {
                        kind: "chord",
                        id: parent.get_ref().0,
                        span: Some(parent.span()),
                    });
                }
            }

            let grace_parent = entry.grace_parent.as_ref().map(|p| *p.get_ref());
            chords.insert(
                *entry.id.get_ref(),
                SceneChord {
                    geometry: ChordGeometry {
                        system: entry.system.as_ref().map(|s| *s.get_ref()),
                        staff: entry.staff,
                        shape: entry.shape.clone(),
                        first_in_system: entry.first_in_system,
                        note_type: entry.note_type,
                        grace_parent,
                    },
                    timeline: TimelineChord {
                        note_type: entry.note_type,
                        parent: grace_parent,
                        track: entry.track,
                        part: entry.part,
                        tick: entry.tick,
                        duration: entry.duration.unwrap_or(DEFAULT_DURATION),
                        notes: vec![],
                        graces_before: vec![],
                        graces_after: vec![],
                    },
                },
            );
        }

        // Grace chords in file order
        for entry in &file.chords {
            let Some(parent) = &entry.grace_parent else {
                continue;
            };
            if let Some(parent) = chords.get_mut(parent.get_ref()) {
                let list = if entry.note_type.is_grace_after() {
                    &mut parent.timeline.graces_after
                } else {
                    &mut parent.timeline.graces_before
                };
                list.push(*entry.id.get_ref());
            }
        }

        let mut seen_notes = HashSet::new();
        let mut notes = BTreeMap::new();
        for entry in &file.notes {
            check_unique(&mut seen_notes, &entry.id, "note", |id| id.0)?;
            let chord_id = *entry.chord.get_ref();
            let Some(chord) = chords.get_mut(&chord_id) else {
                return Err(SceneError::UnknownReference {
                    kind: "chord",
                    id: chord_id.0,
                    span: Some(entry.chord.span()),
                });
            };
            let pitch = match &entry.pitch {
                Some(pitch) if !PITCH_RANGE.contains(pitch.get_ref()) => {
                    return Err(SceneError::PitchOutOfRange {
                        pitch: *pitch.get_ref(),
                        span: pitch.span(),
                    });
                }
                Some(pitch) => *pitch.get_ref(),
                None => MIDDLE_C,
            };
            chord.timeline.notes.push(*entry.id.get_ref());

            let head_width = entry.head_width.unwrap_or(DEFAULT_HEAD_WIDTH);
            notes.insert(
                *entry.id.get_ref(),
                NoteGeometry {
                    chord: chord_id,
                    pos: entry.pos,
                    page_pos: entry.page_pos,
                    head_width,
                    bbox: entry
                        .bbox
                        .unwrap_or_else(|| BoundingBox::new(0.0, -0.5, head_width, 1.0)),
                    line: entry.line,
                    pitch,
                    measure: entry.measure,
                },
            );
        }

        // Chord notes run from lowest to highest
        for chord in chords.values_mut() {
            chord
                .timeline
                .notes
                .sort_by_key(|id| notes.get(id).map(|n: &NoteGeometry| n.pitch));
        }

        let mut glissandi = Vec::with_capacity(file.glissandi.len());
        for entry in &file.glissandi {
            for note in [entry.start, entry.end].iter().flatten().filter_map(|a| a.note()) {
                if !notes.contains_key(&note) {
                    return Err(SceneError::UnknownReference {
                        kind: "note",
                        id: note.0,
                        span: None,
                    });
                }
            }
            let mut glissando =
                Glissando::from_record(&entry.record, style).with_anchors(entry.start, entry.end);
            if let Some(line_width) = entry.line_width {
                glissando.line_width = line_width;
            }
            glissandi.push(glissando);
        }

        Ok(Scene {
            systems,
            chords,
            notes,
            scale: StaffScale::new(file.scale.clef, file.scale.key)
                .with_transpose(file.scale.transpose),
            glissandi,
        })
    }

    pub fn glissandi(&self) -> &[Glissando] {
        &self.glissandi
    }

    pub fn glissandi_mut(&mut self) -> &mut [Glissando] {
        &mut self.glissandi
    }

    /// Line-to-pitch mapping of the scene's staff
    pub fn scale(&self) -> &StaffScale {
        &self.scale
    }

    /// Lay out every glissando with the default planner
    pub fn layout_all(&mut self, config: &LayoutConfig) -> Vec<GlissandoLayout> {
        let planner = SystemSpanPlanner::new();
        let mut glissandi = std::mem::take(&mut self.glissandi);
        let score: &Scene = self;
        let layouts: Vec<GlissandoLayout> = glissandi
            .iter_mut()
            .map(|g| g.layout(score, &planner, config).clone())
            .collect();
        self.glissandi = glissandi;
        layouts
    }

    /// Attachment points reported to `note` by the last layout pass
    pub fn attach_points(&self, note: NoteId) -> Vec<AttachPoint> {
        self.glissandi
            .iter()
            .flat_map(|g| g.last_layout().attach_points.iter())
            .filter(|p| p.note == note)
            .copied()
            .collect()
    }
}

impl ScoreView for Scene {
    fn note(&self, id: NoteId) -> Option<NoteGeometry> {
        self.notes.get(&id).cloned()
    }

    fn chord(&self, id: ChordId) -> Option<ChordGeometry> {
        self.chords.get(&id).map(|c| c.geometry.clone())
    }

    fn system(&self, id: SystemId) -> Option<SystemGeometry> {
        self.systems
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, geometry)| geometry.clone())
    }

    fn systems(&self) -> Vec<SystemId> {
        self.systems.iter().map(|(id, _)| *id).collect()
    }
}

impl TimelineView for Scene {
    fn timeline_chord(&self, id: ChordId) -> Option<TimelineChord> {
        self.chords.get(&id).map(|c| c.timeline.clone())
    }

    fn columns(&self) -> Vec<TimelineColumn> {
        let mut by_tick: BTreeMap<i64, Vec<(u32, ChordId)>> = BTreeMap::new();
        for (&id, chord) in &self.chords {
            if !chord.timeline.note_type.is_grace() {
                by_tick
                    .entry(chord.timeline.tick)
                    .or_default()
                    .push((chord.timeline.track, id));
            }
        }
        by_tick
            .into_iter()
            .map(|(tick, mut chords)| {
                chords.sort();
                TimelineColumn {
                    tick,
                    chords: chords.into_iter().map(|(_, id)| id).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glissando::GlissandoStyle;
    use crate::guess::{guess_final_note, guess_initial_note};
    use pretty_assertions::assert_eq;

    const SCENE: &str = r#"
[scale]
clef = "bass"
key = -1

[[systems]]
id = 0
page_pos = { x = 10.0, y = 20.0 }
first_note_x = 8.0
last_note_x = 100.0

[[chords]]
id = 0
system = 0
tick = 0

[[chords]]
id = 1
system = 0
tick = 480
note_type = "normal"

[[notes]]
id = 0
chord = 0
page_pos = { x = 20.0, y = 25.0 }
pitch = 64
measure = 0

[[notes]]
id = 2
chord = 0
page_pos = { x = 20.0, y = 24.0 }
pitch = 48
measure = 0

[[notes]]
id = 1
chord = 1
page_pos = { x = 50.0, y = 22.0 }
pitch = 60
measure = 0

[[glissandi]]
start = { note = 0 }
end = { note = 1 }
style = "white-keys"
line_width = 0.2
"#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_str(SCENE).expect("Should parse");
        assert_eq!(scene.systems(), vec![SystemId(0)]);
        assert_eq!(scene.glissandi().len(), 1);

        let gliss = &scene.glissandi()[0];
        assert_eq!(gliss.style, GlissandoStyle::WhiteKeys);
        assert_eq!(gliss.line_width, 0.2);
        assert_eq!(gliss.text, "gliss.");

        let note = scene.note(NoteId(1)).expect("Should exist");
        assert_eq!(note.head_width, DEFAULT_HEAD_WIDTH);
        assert_eq!(note.chord, ChordId(1));
        assert_eq!(scene.scale().clef, Clef::Bass);
        assert_eq!(scene.scale().key_fifths, -1);
    }

    #[test]
    fn test_timeline_orders_notes_by_pitch() {
        let scene = Scene::from_str(SCENE).expect("Should parse");
        let chord = scene.timeline_chord(ChordId(0)).expect("Should exist");
        assert_eq!(chord.notes, vec![NoteId(2), NoteId(0)]);
        assert_eq!(chord.up_note(), Some(NoteId(0)));
    }

    #[test]
    fn test_guessing_over_scene() {
        let scene = Scene::from_str(SCENE).expect("Should parse");
        assert_eq!(guess_initial_note(&scene, ChordId(1)), Some(NoteId(0)));
        assert_eq!(guess_final_note(&scene, ChordId(0), NoteId(0)), Some(NoteId(1)));
    }

    #[test]
    fn test_layout_all_reports_attach_points() {
        let mut scene = Scene::from_str(SCENE).expect("Should parse");
        let layouts = scene.layout_all(&LayoutConfig::default());
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].segments.len(), 1);

        let start_points = scene.attach_points(NoteId(0));
        assert_eq!(start_points.len(), 1);
        assert_eq!(start_points[0].x, layouts[0].segments[0].pos.x);
        assert_eq!(scene.attach_points(NoteId(1)).len(), 1);
        assert!(scene.attach_points(NoteId(2)).is_empty());
    }

    #[test]
    fn test_unknown_chord_reference() {
        let err = Scene::from_str("[[notes]]\nid = 0\nchord = 7\n").expect_err("Should fail");
        assert!(matches!(
            err,
            SceneError::UnknownReference {
                kind: "chord",
                id: 7,
                span: Some(_)
            }
        ));
    }

    #[test]
    fn test_unknown_glissando_note() {
        let source = "[[glissandi]]\nstart = { note = 3 }\n";
        let err = Scene::from_str(source).expect_err("Should fail");
        assert!(matches!(err, SceneError::UnknownReference { kind: "note", id: 3, .. }));
    }

    #[test]
    fn test_pitch_outside_midi_range() {
        let source = "[[chords]]\nid = 0\n\n[[notes]]\nid = 0\nchord = 0\npitch = -2000000000\n";
        let err = Scene::from_str(source).expect_err("Should fail");
        let SceneError::PitchOutOfRange { pitch, span } = err else {
            panic!("expected pitch range error");
        };
        assert_eq!(pitch, -2_000_000_000);
        assert_eq!(&source[span], "-2000000000");

        let edge = "[[chords]]\nid = 0\n\n[[notes]]\nid = 0\nchord = 0\npitch = 127\n";
        assert!(Scene::from_str(edge).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let err =
            Scene::from_str("[[systems]]\nid = 1\n[[systems]]\nid = 1\n").expect_err("Should fail");
        let SceneError::DuplicateId { kind, id, span } = err else {
            panic!("expected duplicate id error");
        };
        assert_eq!((kind, id), ("system", 1));
        assert_eq!(&"[[systems]]\nid = 1\n[[systems]]\nid = 1\n"[span], "1");
    }

    #[test]
    fn test_glissando_to_chord_stays_detached() {
        let source = r#"
[[chords]]
id = 0

[[glissandi]]
start = { chord = 0 }
"#;
        let mut scene = Scene::from_str(source).expect("Should parse");
        let layouts = scene.layout_all(&LayoutConfig::default());
        assert!(layouts[0].detached);
        assert!(scene.glissandi()[0].is_detached());
    }
}
