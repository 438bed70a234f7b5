//! Discrete pitch paths for glissando playback

use std::ops::RangeInclusive;

use crate::glissando::GlissandoStyle;

/// Pitch of middle C; the white/black key pattern is anchored here
pub const MIDDLE_C: i32 = 60;

/// Pitches a glide can step through
pub const PITCH_RANGE: RangeInclusive<i32> = 0..=127;

/// Key colors of the twelve pitch classes starting at C
const WHITE_KEYS: [bool; 12] = [
    true, false, true, false, true, true, false, true, false, true, false, true,
];

/// Maps a notated line position to a sounding pitch.
///
/// Implementations apply whatever accidentals are in effect at that position:
/// key signature, earlier accidentals in the measure, transposition.
pub trait LinePitchMap {
    fn pitch_at_line(&self, line: i32) -> i32;
}

/// Line context needed by the diatonic style
#[derive(Clone, Copy)]
pub struct DiatonicContext<'a> {
    pub map: &'a dyn LinePitchMap,
    /// Line of the start note
    pub start_line: i32,
}

impl<'a> DiatonicContext<'a> {
    pub fn new(map: &'a dyn LinePitchMap, start_line: i32) -> Self {
        Self { map, start_line }
    }
}

/// Whether `pitch` falls on a white piano key
pub fn is_white_key(pitch: i32) -> bool {
    // MIDDLE_C is a multiple of 12
    WHITE_KEYS[pitch.rem_euclid(12) as usize]
}

/// Semitone offsets, relative to `start_pitch`, of the intermediate pitches a glide sounds.
///
/// Offsets run from the start toward the end and exclude both end points.
/// Returns `None` when the glide has no discrete steps: equal pitches, a pitch
/// outside [`PITCH_RANGE`], portamento, or a diatonic glide without line context.
pub fn resolve_steps(
    start_pitch: i32,
    end_pitch: i32,
    style: GlissandoStyle,
    diatonic: Option<DiatonicContext<'_>>,
) -> Option<Vec<i32>> {
    if start_pitch == end_pitch {
        return None;
    }
    if !PITCH_RANGE.contains(&start_pitch) || !PITCH_RANGE.contains(&end_pitch) {
        log::debug!("glissando pitches {} -> {} out of range", start_pitch, end_pitch);
        return None;
    }
    let direction = if end_pitch > start_pitch { 1 } else { -1 };
    let between = || {
        (1..(end_pitch - start_pitch).abs()).map(move |step| start_pitch + step * direction)
    };

    match style {
        GlissandoStyle::Portamento => None,
        GlissandoStyle::Chromatic => Some(between().map(|p| p - start_pitch).collect()),
        GlissandoStyle::WhiteKeys | GlissandoStyle::BlackKeys => {
            let want_white = style == GlissandoStyle::WhiteKeys;
            Some(
                between()
                    .filter(|&p| is_white_key(p) == want_white)
                    .map(|p| p - start_pitch)
                    .collect(),
            )
        }
        GlissandoStyle::Diatonic => {
            let Some(context) = diatonic else {
                log::debug!("diatonic glissando without line context");
                return None;
            };
            Some(diatonic_steps(start_pitch, end_pitch, direction, context))
        }
    }
}

fn diatonic_steps(
    start_pitch: i32,
    end_pitch: i32,
    direction: i32,
    context: DiatonicContext<'_>,
) -> Vec<i32> {
    let before_end = |pitch: i32| {
        if direction == 1 {
            pitch < end_pitch
        } else {
            pitch > end_pitch
        }
    };

    // A line step moves at least one semitone in any sane spelling; the
    // bound only stops a broken map from looping forever.
    let max_lines = 2 * (end_pitch - start_pitch).unsigned_abs() as usize + 7;

    let mut offsets = Vec::new();
    // Lines count downward, so rising pitch means decreasing line
    let mut line = context.start_line - direction;
    for _ in 0..max_lines {
        let pitch = context.map.pitch_at_line(line);
        if !before_end(pitch) {
            break;
        }
        offsets.push(pitch - start_pitch);
        line -= direction;
    }
    offsets
}
