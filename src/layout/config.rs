//! Configuration for the layout engine
//!
//! Every distance except `spatium` is expressed in staff-space units.

use serde::Deserialize;

/// Configuration options for glissando layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Size of one staff space in output units
    pub spatium: f64,

    /// Placeholder segment size (width, height) used when the glissando has no anchors
    pub palette_size: (f64, f64),

    /// Clearance kept between the line ends and the chord outlines
    pub note_clearance: f64,

    /// Vertical nudge applied to each end when both notes sit on the same staff line
    pub same_line_nudge: f64,

    /// Fraction of the tablature line distance used to tilt same-string glissandi
    pub tab_nudge_factor: f64,

    /// Extra room taken to the left of a system-initial end note
    pub system_start_widening: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spatium: 1.0,
            palette_size: (4.0, 4.0),
            note_clearance: 0.25,
            same_line_nudge: 0.25,
            tab_nudge_factor: 0.4,
            system_start_widening: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staff space size
    pub fn with_spatium(mut self, spatium: f64) -> Self {
        self.spatium = spatium;
        self
    }

    /// Set the detached placeholder size
    pub fn with_palette_size(mut self, width: f64, height: f64) -> Self {
        self.palette_size = (width, height);
        self
    }

    /// Set the clearance between line ends and chords
    pub fn with_note_clearance(mut self, clearance: f64) -> Self {
        self.note_clearance = clearance;
        self
    }

    /// Staff spaces converted to output units
    pub fn sp(&self, staff_spaces: f64) -> f64 {
        staff_spaces * self.spatium
    }
}
