//! Playback semantics of a glissando
//!
//! - [`resolve_steps`]: the discrete pitches a glide sounds
//! - [`StaffScale`]: clef and key aware line-to-pitch mapping for the diatonic style
//! - [`GlideSchedule`]: eased onsets for the resolved steps

pub mod ease;
pub mod scale;
pub mod steps;

pub use ease::{Ease, GlideEvent, GlideSchedule};
pub use scale::{Clef, StaffScale};
pub use steps::{
    is_white_key, resolve_steps, DiatonicContext, LinePitchMap, MIDDLE_C, PITCH_RANGE,
};
