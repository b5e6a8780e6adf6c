//! Output configuration types

const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Configuration for SVG rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// Heading shown above the diagram. Defaults to the root name and size.
    pub title: Option<String>,
    /// Draw text labels inside regions large enough to hold them.
    pub labels: bool,
    pub font_size: f64,
}

impl OutputConfig {
    /// Rough rendered width of `text`, used to decide whether a label fits.
    pub fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }

    /// Check if `text` fits inside a region of the given size.
    pub fn label_fits(&self, text: &str, width: f64, height: f64) -> bool {
        self.labels && width >= self.text_width(text) + 6.0 && height >= self.font_size + 4.0
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: None,
            labels: true,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}
