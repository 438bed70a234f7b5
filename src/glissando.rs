//! The glissando spanner
//!
//! A [`Glissando`] connects two notes. It owns its display and playback
//! properties and the segments computed by the last layout pass; the notes
//! themselves belong to the host document and are referenced by [`Anchor`].

use serde::{Deserialize, Serialize};

use crate::host::{Anchor, ScoreView};
use crate::layout::{
    layout_glissando, BoundingBox, GlissandoLayout, GlissandoSegment, LayoutConfig, SegmentPlanner,
};
use crate::playback::{resolve_steps, DiatonicContext, GlideSchedule, LinePitchMap};
use crate::style::EngravingStyle;

/// How the connector is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlissandoType {
    #[default]
    Straight,
    Wavy,
}

/// Pitch path sounded by the glide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlissandoStyle {
    #[default]
    Chromatic,
    WhiteKeys,
    BlackKeys,
    Diatonic,
    /// Continuous glide without discrete steps
    Portamento,
}

impl std::str::FromStr for GlissandoStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromatic" => Ok(GlissandoStyle::Chromatic),
            "white-keys" => Ok(GlissandoStyle::WhiteKeys),
            "black-keys" => Ok(GlissandoStyle::BlackKeys),
            "diatonic" => Ok(GlissandoStyle::Diatonic),
            "portamento" => Ok(GlissandoStyle::Portamento),
            other => Err(format!("unknown glissando style '{}'", other)),
        }
    }
}

/// Font style flags, persisted as a bit mask (1 bold, 2 italic, 4 underline, 8 strike)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle {
        bold: false,
        italic: false,
        underline: false,
        strike: false,
    };

    pub const ITALIC: FontStyle = FontStyle {
        bold: false,
        italic: true,
        underline: false,
        strike: false,
    };
}

impl From<u8> for FontStyle {
    fn from(bits: u8) -> Self {
        Self {
            bold: bits & 1 != 0,
            italic: bits & 2 != 0,
            underline: bits & 4 != 0,
            strike: bits & 8 != 0,
        }
    }
}

impl From<FontStyle> for u8 {
    fn from(style: FontStyle) -> u8 {
        u8::from(style.bold)
            | u8::from(style.italic) << 1
            | u8::from(style.underline) << 2
            | u8::from(style.strike) << 3
    }
}

/// Font used for the glissando text
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub face: String,
    /// Point size
    pub size: f64,
    pub style: FontStyle,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            face: "FreeSerif".to_string(),
            size: 8.0,
            style: FontStyle::ITALIC,
        }
    }
}

/// A glissando between two notes
#[derive(Debug, Clone, PartialEq)]
pub struct Glissando {
    pub glissando_type: GlissandoType,
    pub style: GlissandoStyle,
    pub text: String,
    pub show_text: bool,
    pub font: FontSpec,
    /// Playback ease-in, percent
    pub ease_in: i32,
    /// Playback ease-out, percent
    pub ease_out: i32,
    pub play: bool,
    /// Pen width in staff spaces
    pub line_width: f64,
    pub color: String,
    pub start: Option<Anchor>,
    pub end: Option<Anchor>,
    layout: GlissandoLayout,
}

impl Default for Glissando {
    fn default() -> Self {
        Self::new()
    }
}

impl Glissando {
    /// A detached glissando with the built-in defaults
    pub fn new() -> Self {
        Self::from_style(&EngravingStyle::default())
    }

    /// A detached glissando taking its display defaults from `style`
    pub fn from_style(style: &EngravingStyle) -> Self {
        let defaults = &style.glissando;
        Self {
            glissando_type: GlissandoType::default(),
            style: GlissandoStyle::default(),
            text: defaults.text.clone(),
            show_text: defaults.show_text,
            font: defaults.font(),
            ease_in: 0,
            ease_out: 0,
            play: true,
            line_width: defaults.line_width,
            color: defaults.color.clone(),
            start: None,
            end: None,
            layout: GlissandoLayout::empty(),
        }
    }

    pub fn with_anchors(mut self, start: Option<Anchor>, end: Option<Anchor>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_type(mut self, glissando_type: GlissandoType) -> Self {
        self.glissando_type = glissando_type;
        self
    }

    pub fn with_style(mut self, style: GlissandoStyle) -> Self {
        self.style = style;
        self
    }

    /// Without two note anchors the glissando is laid out as a placeholder
    pub fn is_detached(&self) -> bool {
        let is_note = |anchor: Option<Anchor>| anchor.and_then(|a| a.note()).is_some();
        !(is_note(self.start) && is_note(self.end))
    }

    /// Recompute segments and bounding box against the host document
    pub fn layout(
        &mut self,
        score: &dyn ScoreView,
        planner: &dyn SegmentPlanner,
        config: &LayoutConfig,
    ) -> &GlissandoLayout {
        self.layout = layout_glissando(
            self.start,
            self.end,
            self.line_width,
            score,
            planner,
            config,
        );
        &self.layout
    }

    /// Result of the last layout pass
    pub fn last_layout(&self) -> &GlissandoLayout {
        &self.layout
    }

    pub fn segments(&self) -> &[GlissandoSegment] {
        &self.layout.segments
    }

    pub fn bbox(&self) -> BoundingBox {
        self.layout.bbox
    }

    /// Semitone offsets the glide sounds between its anchor notes.
    ///
    /// `None` when there is nothing to play: the end anchor is not a note,
    /// playback is off, the style is portamento or both pitches are equal.
    /// The diatonic style needs `scale` for the start note's staff.
    pub fn pitch_steps(
        &self,
        score: &dyn ScoreView,
        scale: Option<&dyn LinePitchMap>,
    ) -> Option<Vec<i32>> {
        let end_id = self.end?.note()?;
        if !self.play || self.style == GlissandoStyle::Portamento {
            return None;
        }
        let start = score.note(self.start?.note()?)?;
        let end = score.note(end_id)?;
        let diatonic = scale.map(|map| DiatonicContext::new(map, start.line));
        resolve_steps(start.pitch, end.pitch, self.style, diatonic)
    }

    pub fn glide_schedule(&self) -> GlideSchedule {
        GlideSchedule::new(self.ease_in, self.ease_out)
    }

    /// Persisted form; text and font properties equal to the styled defaults are omitted
    pub fn to_record(&self, style: &EngravingStyle) -> GlissandoRecord {
        let styled = style.glissando.font();
        GlissandoRecord {
            glissando_type: self.glissando_type,
            style: self.style,
            text: (self.text != style.glissando.text).then(|| self.text.clone()),
            show_text: self.show_text,
            font_face: (self.font.face != styled.face).then(|| self.font.face.clone()),
            font_size: (self.font.size != styled.size).then_some(self.font.size),
            font_style: (self.font.style != styled.style).then_some(self.font.style),
            ease_in: self.ease_in,
            ease_out: self.ease_out,
            play: self.play,
        }
    }

    /// Restore a detached glissando from its persisted form
    pub fn from_record(record: &GlissandoRecord, style: &EngravingStyle) -> Self {
        let mut glissando = Self::from_style(style);
        glissando.glissando_type = record.glissando_type;
        glissando.style = record.style;
        if let Some(text) = &record.text {
            glissando.text = text.clone();
        }
        glissando.show_text = record.show_text;
        if let Some(face) = &record.font_face {
            glissando.font.face = face.clone();
        }
        if let Some(size) = record.font_size {
            glissando.font.size = size;
        }
        if let Some(font_style) = record.font_style {
            glissando.font.style = font_style;
        }
        glissando.ease_in = record.ease_in;
        glissando.ease_out = record.ease_out;
        glissando.play = record.play;
        glissando
    }
}

/// Serialized glissando properties; every field may be omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlissandoRecord {
    #[serde(rename = "type")]
    pub glissando_type: GlissandoType,
    pub style: GlissandoStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub show_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_face: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    pub ease_in: i32,
    pub ease_out: i32,
    pub play: bool,
}

impl Default for GlissandoRecord {
    fn default() -> Self {
        Self {
            glissando_type: GlissandoType::Straight,
            style: GlissandoStyle::Chromatic,
            text: None,
            show_text: true,
            font_face: None,
            font_size: None,
            font_style: None,
            ease_in: 0,
            ease_out: 0,
            play: true,
        }
    }
}

impl GlissandoRecord {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
