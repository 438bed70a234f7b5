//! Read-only view of the host document
//!
//! The layout engine never owns notes, chords or systems. It queries them
//! through [`ScoreView`], which hands out small geometry snapshots by value.

use serde::Deserialize;

use crate::layout::{BoundingBox, Point, Shape};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);
    };
}

id_type!(
    /// Identifies a note in the host document
    NoteId
);
id_type!(
    /// Identifies a chord in the host document
    ChordId
);
id_type!(
    /// Identifies a system (one line of music) in the host document
    SystemId
);
id_type!(
    /// Identifies a measure in the host document
    MeasureId
);

/// The element a glissando end is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Note(NoteId),
    /// Attached to a chord or rest rather than a single note
    Chord(ChordId),
}

impl Anchor {
    pub fn note(&self) -> Option<NoteId> {
        match self {
            Anchor::Note(id) => Some(*id),
            Anchor::Chord(_) => None,
        }
    }
}

/// Grace-note classification of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteType {
    #[default]
    Normal,
    Acciaccatura,
    Appoggiatura,
    Grace4,
    Grace16,
    Grace32,
    Grace8After,
    Grace16After,
    Grace32After,
}

impl NoteType {
    /// Grace notes written before their parent chord
    pub fn is_grace_before(&self) -> bool {
        matches!(
            self,
            NoteType::Acciaccatura
                | NoteType::Appoggiatura
                | NoteType::Grace4
                | NoteType::Grace16
                | NoteType::Grace32
        )
    }

    /// Grace notes written after their parent chord
    pub fn is_grace_after(&self) -> bool {
        matches!(
            self,
            NoteType::Grace8After | NoteType::Grace16After | NoteType::Grace32After
        )
    }

    pub fn is_grace(&self) -> bool {
        self.is_grace_before() || self.is_grace_after()
    }
}

/// Staff properties that matter to glissando layout
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaffInfo {
    /// Tablature staves draw glissandi along a single string
    pub is_tab: bool,
    /// Distance between staff lines, in staff spaces
    pub line_distance: f64,
}

impl Default for StaffInfo {
    fn default() -> Self {
        Self {
            is_tab: false,
            line_distance: 1.0,
        }
    }
}

/// Snapshot of one note's geometry and pitch
#[derive(Debug, Clone, PartialEq)]
pub struct NoteGeometry {
    pub chord: ChordId,
    /// Origin of the note relative to its chord
    pub pos: Point,
    /// Origin of the note in page coordinates
    pub page_pos: Point,
    pub head_width: f64,
    /// Bounding box relative to the note origin
    pub bbox: BoundingBox,
    /// Vertical notation position, in half staff spaces from the top line (downward)
    pub line: i32,
    /// Sounding pitch in semitones (MIDI numbering)
    pub pitch: i32,
    pub measure: Option<MeasureId>,
}

/// Snapshot of one chord
#[derive(Debug, Clone, PartialEq)]
pub struct ChordGeometry {
    /// None until the host has placed the chord on a system
    pub system: Option<SystemId>,
    pub staff: StaffInfo,
    /// Combined outline of the chord, relative to the chord origin
    pub shape: Shape,
    /// The chord is the first rhythmic unit of its system
    pub first_in_system: bool,
    pub note_type: NoteType,
    /// Parent chord of a grace chord
    pub grace_parent: Option<ChordId>,
}

/// Snapshot of one system
#[derive(Debug, Clone, PartialEq)]
pub struct SystemGeometry {
    pub page_pos: Point,
    /// x of the first note/rest segment, relative to the system
    pub first_note_x: f64,
    /// x just after the last note/rest segment, relative to the system
    pub last_note_x: f64,
    /// Vertical frames take a place in the system list but carry no music
    pub is_vbox: bool,
}

/// Read-only queries the layout engine makes against the host document.
///
/// The host guarantees the document is not mutated while these are called.
pub trait ScoreView {
    fn note(&self, id: NoteId) -> Option<NoteGeometry>;

    fn chord(&self, id: ChordId) -> Option<ChordGeometry>;

    fn system(&self, id: SystemId) -> Option<SystemGeometry>;

    /// All systems in document order
    fn systems(&self) -> Vec<SystemId>;
}

/// Horizontal position a connector reserves on one of its anchor notes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachPoint {
    pub note: NoteId,
    /// x relative to the note's system
    pub x: f64,
}
