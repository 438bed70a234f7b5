//! Best-effort anchor guessing for interactive editing
//!
//! When a glissando is dropped on a single note, or read from a document that
//! only recorded one end, the other end is guessed from the neighboring
//! chords. Both searches prefer the same track, then any chord of the same
//! part, and step through grace notes first. A failed search returns `None`.

use crate::host::{ChordId, NoteId, NoteType};

/// Rhythmic position and relations of one chord
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineChord {
    pub note_type: NoteType,
    /// Parent chord of a grace chord
    pub parent: Option<ChordId>,
    pub track: u32,
    pub part: u32,
    pub tick: i64,
    pub duration: i64,
    /// Notes from lowest to highest
    pub notes: Vec<NoteId>,
    /// Grace chords written before this chord, in order
    pub graces_before: Vec<ChordId>,
    /// Grace chords written after this chord, in order
    pub graces_after: Vec<ChordId>,
}

impl TimelineChord {
    /// The highest note
    pub fn up_note(&self) -> Option<NoteId> {
        self.notes.last().copied()
    }
}

/// Chords starting at the same tick
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineColumn {
    pub tick: i64,
    /// Non-grace chords, in track order
    pub chords: Vec<ChordId>,
}

/// Time-ordered queries used by the guessing heuristics
pub trait TimelineView {
    fn timeline_chord(&self, id: ChordId) -> Option<TimelineChord>;

    /// All chord columns in tick order
    fn columns(&self) -> Vec<TimelineColumn>;
}

fn up_note_of(view: &dyn TimelineView, chord: ChordId) -> Option<NoteId> {
    view.timeline_chord(chord)?.up_note()
}

/// Pick the chord in `column` a glissando from or to `chord` should use
fn column_target(
    view: &dyn TimelineView,
    column: &TimelineColumn,
    chord: &TimelineChord,
) -> Option<(ChordId, TimelineChord)> {
    let candidates: Vec<(ChordId, TimelineChord)> = column
        .chords
        .iter()
        .filter_map(|&id| view.timeline_chord(id).map(|c| (id, c)))
        .collect();

    let same_track = candidates.iter().position(|(_, c)| c.track == chord.track);
    let same_part = candidates.iter().position(|(_, c)| c.part == chord.part);
    let index = same_track.or(same_part)?;
    candidates.into_iter().nth(index)
}

/// Guess the note a glissando ending on `chord` starts from.
///
/// Returns the top note of the previous chord of the same part.
pub fn guess_initial_note(view: &dyn TimelineView, chord: ChordId) -> Option<NoteId> {
    let found = initial_note(view, chord);
    if found.is_none() {
        log::debug!("no first note for glissando found");
    }
    found
}

fn initial_note(view: &dyn TimelineView, chord_id: ChordId) -> Option<NoteId> {
    let mut chord = view.timeline_chord(chord_id)?;

    if chord.note_type.is_grace_before() {
        // continue from the parent chord
        chord = view.timeline_chord(chord.parent?)?;
    } else if chord.note_type.is_grace_after() {
        return up_note_of(view, chord.parent?);
    } else if let Some(&last) = chord.graces_before.last() {
        return up_note_of(view, last);
    }

    let columns = view.columns();
    for column in columns.iter().rev().filter(|c| c.tick < chord.tick) {
        if let Some((_, target)) = column_target(view, column, &chord) {
            return match target.graces_after.last() {
                Some(&grace) => up_note_of(view, grace),
                None => target.up_note(),
            };
        }
    }
    None
}

/// Guess the note a glissando starting on `start_note` of `chord` ends on.
///
/// Prefers the note at the same index within the next chord, clamped to its
/// note count.
pub fn guess_final_note(
    view: &dyn TimelineView,
    chord: ChordId,
    start_note: NoteId,
) -> Option<NoteId> {
    let found = final_note(view, chord, start_note);
    if found.is_none() {
        log::debug!("no second note for glissando found");
    }
    found
}

fn final_note(view: &dyn TimelineView, chord_id: ChordId, start_note: NoteId) -> Option<NoteId> {
    let mut chord = view.timeline_chord(chord_id)?;

    if chord.note_type.is_grace_before() {
        return up_note_of(view, chord.parent?);
    } else if chord.note_type.is_grace_after() {
        chord = view.timeline_chord(chord.parent?)?;
    } else if let Some(&first) = chord.graces_after.first() {
        return up_note_of(view, first);
    }

    let start_index = chord
        .notes
        .iter()
        .position(|&n| n == start_note)
        .unwrap_or(chord.notes.len());
    let elapsed = chord.tick + chord.duration;

    let columns = view.columns();
    for column in columns.iter().filter(|c| c.tick >= elapsed) {
        if let Some((_, target)) = column_target(view, column, &chord) {
            if let Some(&grace) = target.graces_before.first() {
                return up_note_of(view, grace);
            }
            let last = target.notes.len().checked_sub(1)?;
            return target.notes.get(start_index.min(last)).copied();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Minimal timeline: chords keyed by id, columns derived from ticks
    #[derive(Default)]
    struct Timeline {
        chords: BTreeMap<u32, TimelineChord>,
    }

    impl Timeline {
        fn chord(mut self, id: u32, track: u32, tick: i64, notes: &[u32]) -> Self {
            self.chords.insert(
                id,
                TimelineChord {
                    track,
                    tick,
                    duration: 480,
                    notes: notes.iter().map(|&n| NoteId(n)).collect(),
                    ..Default::default()
                },
            );
            self
        }

        fn grace(mut self, id: u32, parent: u32, note_type: NoteType, note: u32) -> Self {
            let tick = self.chords[&parent].tick;
            self.chords.insert(
                id,
                TimelineChord {
                    note_type,
                    parent: Some(ChordId(parent)),
                    tick,
                    notes: vec![NoteId(note)],
                    ..Default::default()
                },
            );
            if let Some(p) = self.chords.get_mut(&parent) {
                if note_type.is_grace_before() {
                    p.graces_before.push(ChordId(id));
                } else {
                    p.graces_after.push(ChordId(id));
                }
            }
            self
        }
    }

    impl TimelineView for Timeline {
        fn timeline_chord(&self, id: ChordId) -> Option<TimelineChord> {
            self.chords.get(&id.0).cloned()
        }

        fn columns(&self) -> Vec<TimelineColumn> {
            let mut by_tick: BTreeMap<i64, Vec<ChordId>> = BTreeMap::new();
            for (&id, chord) in &self.chords {
                if !chord.note_type.is_grace() {
                    by_tick.entry(chord.tick).or_default().push(ChordId(id));
                }
            }
            by_tick
                .into_iter()
                .map(|(tick, chords)| TimelineColumn { tick, chords })
                .collect()
        }
    }

    #[test]
    fn test_initial_is_top_note_of_previous_chord() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10, 11])
            .chord(1, 0, 480, &[12]);
        assert_eq!(guess_initial_note(&view, ChordId(1)), Some(NoteId(11)));
    }

    #[test]
    fn test_initial_prefers_same_track() {
        let view = Timeline::default()
            .chord(0, 1, 0, &[10])
            .chord(1, 0, 0, &[20])
            .chord(2, 0, 480, &[30]);
        assert_eq!(guess_initial_note(&view, ChordId(2)), Some(NoteId(20)));
    }

    #[test]
    fn test_initial_falls_back_to_same_part() {
        let view = Timeline::default()
            .chord(0, 1, 0, &[10])
            .chord(2, 0, 480, &[30]);
        assert_eq!(guess_initial_note(&view, ChordId(2)), Some(NoteId(10)));
    }

    #[test]
    fn test_initial_uses_own_grace_before() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10])
            .chord(1, 0, 480, &[12])
            .grace(5, 1, NoteType::Acciaccatura, 50);
        assert_eq!(guess_initial_note(&view, ChordId(1)), Some(NoteId(50)));
    }

    #[test]
    fn test_initial_from_grace_before_skips_to_parent() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10])
            .chord(1, 0, 480, &[12])
            .grace(5, 1, NoteType::Appoggiatura, 50);
        assert_eq!(guess_initial_note(&view, ChordId(5)), Some(NoteId(10)));
    }

    #[test]
    fn test_initial_uses_previous_grace_after() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10])
            .chord(1, 0, 480, &[12])
            .grace(5, 0, NoteType::Grace16After, 50);
        assert_eq!(guess_initial_note(&view, ChordId(1)), Some(NoteId(50)));
        assert_eq!(guess_initial_note(&view, ChordId(5)), Some(NoteId(10)));
    }

    #[test]
    fn test_initial_none_at_start() {
        let view = Timeline::default().chord(0, 0, 0, &[10]);
        assert_eq!(guess_initial_note(&view, ChordId(0)), None);
        assert_eq!(guess_initial_note(&view, ChordId(9)), None);
    }

    #[test]
    fn test_final_keeps_note_index() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10, 11, 12])
            .chord(1, 0, 480, &[20, 21]);
        assert_eq!(guess_final_note(&view, ChordId(0), NoteId(10)), Some(NoteId(20)));
        assert_eq!(guess_final_note(&view, ChordId(0), NoteId(12)), Some(NoteId(21)));
    }

    #[test]
    fn test_final_skips_chords_still_sounding() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10])
            .chord(1, 1, 240, &[15])
            .chord(2, 0, 480, &[20]);
        assert_eq!(guess_final_note(&view, ChordId(0), NoteId(10)), Some(NoteId(20)));
    }

    #[test]
    fn test_final_grace_rules() {
        let view = Timeline::default()
            .chord(0, 0, 0, &[10])
            .chord(1, 0, 480, &[20])
            .grace(5, 1, NoteType::Acciaccatura, 50)
            .grace(6, 0, NoteType::Grace8After, 60);

        // own grace after comes first
        assert_eq!(guess_final_note(&view, ChordId(0), NoteId(10)), Some(NoteId(60)));
        // from a grace before, the parent's top note
        assert_eq!(guess_final_note(&view, ChordId(5), NoteId(50)), Some(NoteId(20)));
        // from a grace after, the next chord's grace before
        assert_eq!(guess_final_note(&view, ChordId(6), NoteId(60)), Some(NoteId(50)));
    }

    #[test]
    fn test_final_none_at_end() {
        let view = Timeline::default().chord(0, 0, 0, &[10]);
        assert_eq!(guess_final_note(&view, ChordId(0), NoteId(10)), None);
    }
}
