//! Layout engine for glissando geometry
//!
//! This module takes a glissando's anchors and the host document's note and
//! chord geometry, and computes the connector's segments, bounding box and
//! the attachment points it contributes back to its notes.

pub mod config;
pub mod engine;
pub mod planner;
pub mod segment;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{layout_glissando, placeholder_layout, GlissandoLayout, ResolvedEnd};
pub use planner::{SegmentPlanner, SystemSpanPlanner};
pub use segment::{GlissandoSegment, SegmentRole};
pub use types::*;
