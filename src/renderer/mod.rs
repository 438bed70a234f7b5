//! SVG renderer for laid-out glissandi
//!
//! Each segment is drawn along the x axis and rotated into place, either as
//! a straight line or as a centered train of wiggles, with the glissando text
//! above the line when it fits.

pub mod config;
pub mod path;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_glissando_svg, render_scene_svg, EstimatedMetrics, TextMetrics};
