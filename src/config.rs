//! Run configuration
//!
//! `DiagramConfig` is built once per run and passed by reference to every
//! stage. `RawInputs` carries the loosely-typed strings an outer layer
//! (CLI, CI action inputs) hands over; `DiagramConfig::from_inputs` turns
//! them into a validated config or a `ConfigError`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::color::{Color, ColorEncoding};
use crate::error::ConfigError;
use crate::output::OutputConfig;
use crate::tree::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, WalkerConfig};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1000.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1000.0;
/// Largest accepted canvas side.
pub const MAX_CANVAS_SIDE: f64 = 1_000_000.0;

/// Everything one diagram run needs.
#[derive(Debug, Clone)]
pub struct DiagramConfig {
    pub root: PathBuf,
    pub walker: WalkerConfig,
    pub max_depth: usize,
    pub color_encoding: ColorEncoding,
    /// Extension (without dot) to explicit fill color.
    pub custom_file_colors: BTreeMap<String, Color>,
    pub width: f64,
    pub height: f64,
    pub output: OutputConfig,
}

impl DiagramConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Parse boundary strings. Missing or blank inputs take their defaults.
    pub fn from_inputs(inputs: &RawInputs) -> Result<Self, ConfigError> {
        let mut config = DiagramConfig::default();

        if let Some(root) = non_blank(&inputs.root_path) {
            config.root = PathBuf::from(root);
        }
        if let Some(paths) = non_blank(&inputs.excluded_paths) {
            config.walker.excluded_paths = parse_excluded_paths(paths);
        }
        if let Some(globs) = non_blank(&inputs.excluded_globs) {
            config.walker.excluded_globs = parse_excluded_globs(globs);
        }
        if let Some(depth) = non_blank(&inputs.max_depth) {
            config.max_depth = parse_max_depth(depth)?;
        }
        if let Some(encoding) = non_blank(&inputs.color_encoding) {
            config.color_encoding = encoding.parse()?;
        }
        if let Some(colors) = non_blank(&inputs.file_colors) {
            config.custom_file_colors = parse_file_colors(colors)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_CANVAS_SIDE;
        if !valid(self.width) || !valid(self.height) {
            return Err(ConfigError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            walker: WalkerConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            color_encoding: ColorEncoding::default(),
            custom_file_colors: BTreeMap::new(),
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            output: OutputConfig::default(),
        }
    }
}

/// Unparsed inputs as an orchestration layer supplies them.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub root_path: Option<String>,
    /// Comma-separated names.
    pub excluded_paths: Option<String>,
    /// Semicolon-separated globs; commas belong to brace alternation.
    pub excluded_globs: Option<String>,
    pub max_depth: Option<String>,
    pub color_encoding: Option<String>,
    /// Flat JSON object of extension to color.
    pub file_colors: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_excluded_paths(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

pub fn parse_excluded_globs(s: &str) -> Vec<String> {
    s.split(';')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a depth limit. Negative values clamp to 0 (root only), values
/// above `MAX_DEPTH_LIMIT` clamp to it.
pub fn parse_max_depth(s: &str) -> Result<usize, ConfigError> {
    let depth: i64 = s.trim().parse().map_err(|_| ConfigError::InvalidMaxDepth {
        value: s.to_string(),
    })?;
    Ok(usize::try_from(depth).map_or(0, |d| d.min(MAX_DEPTH_LIMIT)))
}

/// Parse `{"ts": "#3178c6", ".md": "#083fa1"}`.
pub fn parse_file_colors(json: &str) -> Result<BTreeMap<String, Color>, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ConfigError::MalformedFileColors(e.to_string()))?;
    let object = value.as_object().ok_or_else(|| {
        ConfigError::MalformedFileColors("expected a JSON object of extension to color".into())
    })?;

    let mut colors = BTreeMap::new();
    for (ext, value) in object {
        let raw = value.as_str().ok_or_else(|| {
            ConfigError::MalformedFileColors(format!("value for '{}' is not a string", ext))
        })?;
        let color = Color::from_hex(raw).ok_or_else(|| ConfigError::InvalidColor {
            extension: ext.clone(),
            value: raw.to_string(),
        })?;
        colors.insert(ext.trim_start_matches('.').to_lowercase(), color);
    }
    Ok(colors)
}
