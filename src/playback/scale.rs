//! Line-to-pitch mapping for a staff with clef, key signature and accidentals

use std::collections::BTreeMap;

use serde::Deserialize;

use super::steps::LinePitchMap;

/// Semitones above C of the seven natural steps C D E F G A B
const STEP_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Steps sharpened by a key signature, in order of appearance (F C G D A E B)
const SHARP_ORDER: [i32; 7] = [3, 0, 4, 1, 5, 2, 6];

/// Steps flattened by a key signature, in order of appearance (B E A D G C F)
const FLAT_ORDER: [i32; 7] = [6, 2, 5, 1, 4, 0, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    #[default]
    Treble,
    Bass,
    Alto,
    Tenor,
}

impl Clef {
    /// Absolute diatonic step (octave * 7 + step) written on the top staff line
    fn top_line_step(&self) -> i32 {
        match self {
            Clef::Treble => 5 * 7 + 3, // F5
            Clef::Bass => 3 * 7 + 5,   // A3
            Clef::Alto => 4 * 7 + 4,   // G4
            Clef::Tenor => 4 * 7 + 2,  // E4
        }
    }
}

impl std::str::FromStr for Clef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "treble" => Ok(Clef::Treble),
            "bass" => Ok(Clef::Bass),
            "alto" => Ok(Clef::Alto),
            "tenor" => Ok(Clef::Tenor),
            other => Err(format!("unknown clef '{}'", other)),
        }
    }
}

/// Accidental-aware pitch of each line of a staff
///
/// Lines count half staff spaces downward from the top line. Accidentals
/// placed earlier in the measure override the key signature on their line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaffScale {
    pub clef: Clef,
    /// Sharps (positive) or flats (negative) in the key signature
    pub key_fifths: i32,
    /// Alteration in semitones by line, for accidentals in effect
    pub accidentals: BTreeMap<i32, i32>,
    /// Semitones added to the written pitch to get the sounding pitch
    pub transpose: i32,
}

impl StaffScale {
    pub fn new(clef: Clef, key_fifths: i32) -> Self {
        Self {
            clef,
            key_fifths: key_fifths.clamp(-7, 7),
            accidentals: BTreeMap::new(),
            transpose: 0,
        }
    }

    /// Mark an accidental in effect on `line`
    pub fn with_accidental(mut self, line: i32, alter: i32) -> Self {
        self.accidentals.insert(line, alter);
        self
    }

    pub fn with_transpose(mut self, semitones: i32) -> Self {
        self.transpose = semitones;
        self
    }

    /// Alteration the key signature gives to a natural step (0 = C)
    fn key_alter(&self, step: i32) -> i32 {
        let count = self.key_fifths.unsigned_abs() as usize;
        if self.key_fifths > 0 && SHARP_ORDER[..count].contains(&step) {
            1
        } else if self.key_fifths < 0 && FLAT_ORDER[..count].contains(&step) {
            -1
        } else {
            0
        }
    }
}

impl LinePitchMap for StaffScale {
    fn pitch_at_line(&self, line: i32) -> i32 {
        let absolute = self.clef.top_line_step() - line;
        let step = absolute.rem_euclid(7);
        let octave = absolute.div_euclid(7);
        let natural = (octave + 1) * 12 + STEP_SEMITONES[step as usize];
        let alter = self
            .accidentals
            .get(&line)
            .copied()
            .unwrap_or_else(|| self.key_alter(step));
        natural + alter + self.transpose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_treble_lines() {
        let scale = StaffScale::new(Clef::Treble, 0);
        assert_eq!(scale.pitch_at_line(0), 77); // F5
        assert_eq!(scale.pitch_at_line(8), 64); // E4
        assert_eq!(scale.pitch_at_line(10), 60); // C4
        assert_eq!(scale.pitch_at_line(-1), 79); // G5
    }

    #[test]
    fn test_bass_lines() {
        let scale = StaffScale::new(Clef::Bass, 0);
        assert_eq!(scale.pitch_at_line(0), 57); // A3
        assert_eq!(scale.pitch_at_line(8), 43); // G2
    }

    #[test]
    fn test_key_signature_alterations() {
        let d_major = StaffScale::new(Clef::Treble, 2);
        assert_eq!(d_major.pitch_at_line(0), 78); // F#5
        assert_eq!(d_major.pitch_at_line(3), 73); // C#5
        assert_eq!(d_major.pitch_at_line(1), 76); // E5 untouched

        let b_flat = StaffScale::new(Clef::Treble, -2);
        assert_eq!(b_flat.pitch_at_line(4), 70); // Bb4
        assert_eq!(b_flat.pitch_at_line(1), 75); // Eb5
    }

    #[test]
    fn test_accidental_overrides_key() {
        let scale = StaffScale::new(Clef::Treble, 1).with_accidental(0, 0);
        assert_eq!(scale.pitch_at_line(0), 77);
        assert_eq!(scale.pitch_at_line(7), 66); // F#4 keeps the key sharp
    }

    #[test]
    fn test_transpose() {
        let scale = StaffScale::new(Clef::Treble, 0).with_transpose(-12);
        assert_eq!(scale.pitch_at_line(10), 48);
    }

    #[test]
    fn test_clef_from_str() {
        assert_eq!("bass".parse::<Clef>(), Ok(Clef::Bass));
        assert!("soprano".parse::<Clef>().is_err());
    }
}
