//! Configuration for SVG rendering

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Padding around the viewBox
    pub viewbox_padding: f64,

    /// Whether to include XML declaration and standalone attributes
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "gliss-" for "gliss-segment")
    pub class_prefix: Option<String>,

    /// Size of one staff space; must match the spatium the layout ran with
    pub spatium: f64,

    /// Horizontal advance of one wiggle of a wavy line, in staff spaces
    pub wiggle_advance: f64,

    /// Peak height of a wiggle above or below the line, in staff spaces
    pub wiggle_height: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 2.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("gliss-".to_string()),
            spatium: 1.0,
            wiggle_advance: 0.8,
            wiggle_height: 0.3,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewBox padding
    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Set the staff space size
    pub fn with_spatium(mut self, spatium: f64) -> Self {
        self.spatium = spatium;
        self
    }

    /// Set the wiggle advance and height of wavy lines
    pub fn with_wiggle(mut self, advance: f64, height: f64) -> Self {
        self.wiggle_advance = advance;
        self.wiggle_height = height;
        self
    }

    /// Staff spaces converted to output units
    pub fn sp(&self, staff_spaces: f64) -> f64 {
        staff_spaces * self.spatium
    }
}
