//! Glissando - geometry layout and pitch stepping for glissando connectors
//!
//! This library lays out a glissando between two notes of an engraved score
//! (segments per system, endpoint corrections, interpolation across system
//! breaks, chord-shape avoidance) and resolves the discrete pitches a glide
//! sounds during playback.
//!
//! # Example
//!
//! ```rust
//! use glissando::render_scene;
//!
//! let svg = render_scene(r#"
//!     [[systems]]
//!     id = 0
//!
//!     [[chords]]
//!     id = 0
//!     system = 0
//!
//!     [[chords]]
//!     id = 1
//!     system = 0
//!
//!     [[notes]]
//!     id = 0
//!     chord = 0
//!     page_pos = { x = 0.0, y = 4.0 }
//!
//!     [[notes]]
//!     id = 1
//!     chord = 1
//!     page_pos = { x = 20.0, y = 1.0 }
//!     pitch = 67
//!
//!     [[glissandi]]
//!     start = { note = 0 }
//!     end = { note = 1 }
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod glissando;
pub mod guess;
pub mod host;
pub mod layout;
pub mod playback;
pub mod renderer;
pub mod scene;
pub mod style;

pub use error::SceneError;
pub use glissando::{FontSpec, FontStyle, Glissando, GlissandoRecord, GlissandoStyle, GlissandoType};
pub use guess::{guess_final_note, guess_initial_note, TimelineView};
pub use host::{Anchor, AttachPoint, ChordId, NoteId, ScoreView, SystemId};
pub use layout::{layout_glissando, GlissandoLayout, LayoutConfig, SegmentPlanner, SystemSpanPlanner};
pub use playback::{resolve_steps, GlideSchedule, LinePitchMap, StaffScale};
pub use renderer::{render_glissando_svg, render_scene_svg, EstimatedMetrics, SvgConfig, TextMetrics};
pub use scene::Scene;
pub use style::EngravingStyle;

/// Configuration for the complete scene pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Styled glissando defaults and layout constants
    pub style: EngravingStyle,
    /// SVG output configuration
    pub svg: SvgConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engraving style; the SVG spatium follows its layout spatium
    pub fn with_style(mut self, style: EngravingStyle) -> Self {
        self.svg.spatium = style.layout.spatium;
        self.style = style;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }
}

/// Lay out and render a TOML scene with default configuration
pub fn render_scene(source: &str) -> Result<String, SceneError> {
    render_scene_with_config(source, &RenderConfig::default())
}

/// Lay out and render a TOML scene
pub fn render_scene_with_config(source: &str, config: &RenderConfig) -> Result<String, SceneError> {
    let mut scene = Scene::from_str_with_style(source, &config.style)?;
    scene.layout_all(&config.style.layout);
    Ok(render_scene_svg(&scene, &config.svg, &EstimatedMetrics))
}
