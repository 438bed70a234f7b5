//! SVG generation for laid-out glissandi

use crate::glissando::{FontSpec, Glissando, GlissandoType};
use crate::host::ScoreView;
use crate::layout::{BoundingBox, GlissandoSegment, Point};
use crate::scene::Scene;

use super::path::{straight_path, wavy_path, ResolvedPath};
use super::SvgConfig;

/// Font point size whose text matches the staff space of a 20pt staff
const SPATIUM20_POINTS: f64 = 5.0;

/// Measures rendered text
pub trait TextMetrics {
    /// Bounding box of `text` relative to its baseline origin (y grows downward)
    fn bounding_rect(&self, text: &str, font: &FontSpec, size: f64) -> BoundingBox;
}

/// Width and height estimated from the character count
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl TextMetrics for EstimatedMetrics {
    fn bounding_rect(&self, text: &str, font: &FontSpec, size: f64) -> BoundingBox {
        let average = if font.style.bold { 0.55 } else { 0.5 };
        let width = text.chars().count() as f64 * average * size;
        BoundingBox::new(0.0, -0.8 * size, width, size)
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            elements: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Open a group placed at `origin` and rotated by `angle` degrees
    pub fn start_segment(&mut self, origin: Point, angle: f64) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<g class="{}segment" transform="translate({:.2} {:.2}) rotate({:.2})">"#,
            self.indent_str(),
            prefix,
            origin.x,
            origin.y,
            angle
        ));
        self.indent += 1;
    }

    /// Close a segment group
    pub fn end_segment(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Add a stroked path
    pub fn add_line_path(&mut self, path: &ResolvedPath, kind: &str, color: &str, width: f64) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<path class="{}{}" d="{}" fill="none" stroke="{}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
            self.indent_str(),
            prefix,
            kind,
            path.to_svg_d(),
            escape_xml(color),
            width
        ));
    }

    /// Add a text element with its baseline origin at (x, y)
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, font: &FontSpec, size: f64, color: &str) {
        let prefix = self.prefix();
        let mut styles = String::new();
        if font.style.bold {
            styles.push_str(r#" font-weight="bold""#);
        }
        if font.style.italic {
            styles.push_str(r#" font-style="italic""#);
        }
        let decorations: Vec<&str> = [
            (font.style.underline, "underline"),
            (font.style.strike, "line-through"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        if !decorations.is_empty() {
            styles.push_str(&format!(r#" text-decoration="{}""#, decorations.join(" ")));
        }

        self.elements.push(format!(
            r#"{}<text class="{}text" x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" fill="{}"{}>{}</text>"#,
            self.indent_str(),
            prefix,
            x,
            y,
            escape_xml(&font.face),
            size,
            escape_xml(color),
            styles,
            escape_xml(text)
        ));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.2} {:.2} {:.2} {:.2}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Rotation, in degrees, that lays the segment's line onto the x axis
fn segment_angle(segment: &GlissandoSegment) -> f64 {
    let length = segment.length();
    (segment.pos2.y / length).asin().to_degrees()
}

/// Draw one segment, translated by `origin` (its system's page position)
fn render_segment(
    builder: &mut SvgBuilder,
    glissando: &Glissando,
    segment: &GlissandoSegment,
    origin: Point,
    metrics: &dyn TextMetrics,
) {
    let length = segment.length();
    if length == 0.0 || !length.is_finite() {
        return;
    }
    let config = builder.config.clone();

    builder.start_segment(origin + segment.pos, segment_angle(segment));

    let (path, kind) = match glissando.glissando_type {
        GlissandoType::Straight => (straight_path(length), "line"),
        GlissandoType::Wavy => (
            wavy_path(
                length,
                config.sp(config.wiggle_advance),
                config.sp(config.wiggle_height),
            ),
            "wave",
        ),
    };
    if !path.is_empty() {
        builder.add_line_path(
            &path,
            kind,
            &glissando.color,
            config.sp(glissando.line_width),
        );
    }

    if glissando.show_text && !glissando.text.is_empty() {
        let size = glissando.font.size * config.spatium / SPATIUM20_POINTS;
        let rect = metrics.bounding_rect(&glissando.text, &glissando.font, size);
        // Text that does not fit is left out
        if rect.width < length {
            let raise = match glissando.glissando_type {
                GlissandoType::Straight => 0.1,
                GlissandoType::Wavy => 0.4,
            };
            let descent = rect.height + rect.y;
            let y = -(descent + config.sp(raise));
            let x = (length - rect.width) * 0.5;
            builder.add_text(&glissando.text, x, y, &glissando.font, size, &glissando.color);
        }
    }

    builder.end_segment();
}

fn segments_bounds<'a>(
    segments: impl Iterator<Item = (&'a GlissandoSegment, Point)>,
) -> Option<BoundingBox> {
    segments
        .map(|(segment, origin)| segment.bbox.translated(origin + segment.pos))
        .reduce(|a, b| a.union(&b))
}

/// Render one glissando in the coordinates of its own systems
pub fn render_glissando_svg(
    glissando: &Glissando,
    config: &SvgConfig,
    metrics: &dyn TextMetrics,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    for segment in glissando.segments() {
        render_segment(&mut builder, glissando, segment, Point::zero(), metrics);
    }
    let bounds = segments_bounds(glissando.segments().iter().map(|s| (s, Point::zero())));
    builder.build(bounds.unwrap_or_else(BoundingBox::zero))
}

/// Render every glissando of a laid-out scene in page coordinates
pub fn render_scene_svg(scene: &Scene, config: &SvgConfig, metrics: &dyn TextMetrics) -> String {
    let origin_of = |segment: &GlissandoSegment| {
        segment
            .system
            .and_then(|id| scene.system(id))
            .map(|system| system.page_pos)
            .unwrap_or_default()
    };

    let mut builder = SvgBuilder::new(config.clone());
    for glissando in scene.glissandi() {
        for segment in glissando.segments() {
            render_segment(&mut builder, glissando, segment, origin_of(segment), metrics);
        }
    }

    let bounds = segments_bounds(
        scene
            .glissandi()
            .iter()
            .flat_map(|g| g.segments())
            .map(|s| (s, origin_of(s))),
    );
    builder.build(bounds.unwrap_or_else(BoundingBox::zero))
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, SystemSpanPlanner};

    /// Text of a fixed width regardless of content
    struct FixedWidth(f64);

    impl TextMetrics for FixedWidth {
        fn bounding_rect(&self, _text: &str, _font: &FontSpec, size: f64) -> BoundingBox {
            BoundingBox::new(0.0, -0.8 * size, self.0, size)
        }
    }

    fn placeholder(glissando_type: GlissandoType) -> Glissando {
        let mut gliss = Glissando::new().with_type(glissando_type);
        let scene = Scene::default();
        gliss.layout(&scene, &SystemSpanPlanner::new(), &LayoutConfig::default());
        gliss
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_placeholder_renders_rotated_line() {
        let svg = render_glissando_svg(
            &placeholder(GlissandoType::Straight),
            &SvgConfig::default(),
            &EstimatedMetrics,
        );
        assert!(svg.starts_with("<?xml"));
        // rising 45 degree line from (-2, 2)
        assert!(svg.contains(r#"transform="translate(-2.00 2.00) rotate(-45.00)""#));
        assert!(svg.contains("gliss-line"));
        assert!(svg.contains("M0.00 0.00 L5.66 0.00"));
    }

    #[test]
    fn test_text_shown_when_it_fits() {
        let svg = render_glissando_svg(
            &placeholder(GlissandoType::Straight),
            &SvgConfig::default(),
            &FixedWidth(2.0),
        );
        assert!(svg.contains(">gliss.</text>"));
        assert!(svg.contains(r#"font-style="italic""#));
    }

    #[test]
    fn test_text_dropped_when_too_wide() {
        let svg = render_glissando_svg(
            &placeholder(GlissandoType::Straight),
            &SvgConfig::default(),
            &FixedWidth(6.0),
        );
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_struck_text_decoration() {
        let mut gliss = placeholder(GlissandoType::Straight);
        gliss.font.style.strike = true;
        gliss.font.style.underline = true;
        let svg = render_glissando_svg(&gliss, &SvgConfig::default(), &FixedWidth(2.0));
        assert!(svg.contains(r#"text-decoration="underline line-through""#));
    }

    #[test]
    fn test_hidden_text() {
        let mut gliss = placeholder(GlissandoType::Straight);
        gliss.show_text = false;
        let svg = render_glissando_svg(&gliss, &SvgConfig::default(), &FixedWidth(1.0));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_wavy_raises_text_further() {
        let straight = placeholder(GlissandoType::Straight);
        let wavy = placeholder(GlissandoType::Wavy);
        let config = SvgConfig::default().with_pretty_print(false);

        let straight_svg = render_glissando_svg(&straight, &config, &FixedWidth(2.0));
        let wavy_svg = render_glissando_svg(&wavy, &config, &FixedWidth(2.0));

        // descent 0.32 plus 0.1 or 0.4 staff spaces
        assert!(straight_svg.contains(r#"y="-0.42""#));
        assert!(wavy_svg.contains(r#"y="-0.72""#));
        assert!(wavy_svg.contains("gliss-wave"));
        assert!(wavy_svg.contains(" T"));
    }

    #[test]
    fn test_empty_glissando_renders_empty_svg() {
        let svg = render_glissando_svg(
            &Glissando::new(),
            &SvgConfig::default().with_standalone(false),
            &EstimatedMetrics,
        );
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<g"));
    }
}
