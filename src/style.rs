//! Engraving style for glissandi
//!
//! The style supplies the defaults a new glissando picks up (text, font,
//! pen width, color) and may override the layout constants. It is read
//! from TOML; any table or key may be left out.
//!
//! ```toml
//! [metadata]
//! name = "Large print"
//!
//! [glissando]
//! text = "gliss."
//! font-face = "FreeSerif"
//! font-size = 10.0
//!
//! [layout]
//! spatium = 2.0
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::glissando::{FontSpec, FontStyle};
use crate::layout::LayoutConfig;

/// Errors that can occur when loading or parsing an engraving style
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read style file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse style TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Styled defaults for new glissandi
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlissandoDefaults {
    pub text: String,
    pub show_text: bool,
    pub font_face: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    /// Staff spaces
    pub line_width: f64,
    pub color: String,
}

impl Default for GlissandoDefaults {
    fn default() -> Self {
        let font = FontSpec::default();
        Self {
            text: "gliss.".to_string(),
            show_text: true,
            font_face: font.face,
            font_size: font.size,
            font_style: font.style,
            line_width: 0.15,
            color: "#000000".to_string(),
        }
    }
}

impl GlissandoDefaults {
    pub fn font(&self) -> FontSpec {
        FontSpec {
            face: self.font_face.clone(),
            size: self.font_size,
            style: self.font_style,
        }
    }
}

/// A named set of glissando defaults and layout constants
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngravingStyle {
    pub name: Option<String>,
    pub glissando: GlissandoDefaults,
    pub layout: LayoutConfig,
}

#[derive(Deserialize)]
struct TomlStyle {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    glissando: GlissandoDefaults,
    #[serde(default)]
    layout: LayoutConfig,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

impl EngravingStyle {
    /// Load a style from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a style from a TOML string
    pub fn from_str(content: &str) -> Result<Self, StyleError> {
        let parsed: TomlStyle = toml::from_str(content)?;
        Ok(EngravingStyle {
            name: parsed.metadata.and_then(|m| m.name),
            glissando: parsed.glissando,
            layout: parsed.layout,
        })
    }
}
