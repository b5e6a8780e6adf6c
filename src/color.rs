//! Node coloring strategies and legend collection

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::category::FileCategory;
use crate::error::ConfigError;
use crate::tree::Node;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("HEX_COLOR regex is invalid")
});

/// An opaque RGB color, written as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`, case-insensitive.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = HEX_COLOR.captures(s)?.get(1)?.as_str();
        let channel = |hex: &str| u8::from_str_radix(hex, 16).ok();
        if digits.len() == 3 {
            let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
            Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
        } else {
            Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ))
        }
    }

    /// Convert HSL (hue in degrees, saturation and lightness in 0..=1).
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let h = h.rem_euclid(360.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;
        let (r, g, b) = match h as u32 {
            0..=59 => (c, x, 0.0),
            60..=119 => (x, c, 0.0),
            120..=179 => (0.0, c, x),
            180..=239 => (0.0, x, c),
            240..=299 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill for directories: a pale container behind their children.
pub const DIRECTORY_FILL: Color = Color::rgb(0xf4, 0xf5, 0xf7);
/// Shared fill for every file under `ColorEncoding::None`.
pub const NEUTRAL_FILL: Color = Color::rgb(0xb8, 0xc2, 0xcc);
/// Files without an extension under `ColorEncoding::Extension`.
pub const NO_EXTENSION_FILL: Color = Color::rgb(0xa0, 0xa4, 0xa8);

fn category_color(category: FileCategory) -> Color {
    match category {
        FileCategory::Code => Color::rgb(0x4c, 0x8b, 0xf5),
        FileCategory::Markup => Color::rgb(0xe3, 0x6f, 0x47),
        FileCategory::Data => Color::rgb(0x3d, 0xb8, 0x8f),
        FileCategory::Image => Color::rgb(0xc2, 0x5b, 0xd6),
        FileCategory::Binary => Color::rgb(0x6b, 0x72, 0x80),
        FileCategory::Document => Color::rgb(0xe8, 0xb9, 0x3a),
        FileCategory::Other => Color::rgb(0xa0, 0xa4, 0xa8),
    }
}

fn known_extension_color(ext: &str) -> Option<Color> {
    let color = match ext {
        "rs" => Color::rgb(0xde, 0xa5, 0x84),
        "js" | "mjs" | "cjs" => Color::rgb(0xf1, 0xe0, 0x5a),
        "jsx" => Color::rgb(0xe5, 0xc5, 0x3c),
        "ts" => Color::rgb(0x31, 0x78, 0xc6),
        "tsx" => Color::rgb(0x2b, 0x6c, 0xb0),
        "py" => Color::rgb(0x35, 0x72, 0xa5),
        "go" => Color::rgb(0x00, 0xad, 0xd8),
        "java" => Color::rgb(0xb0, 0x72, 0x19),
        "rb" => Color::rgb(0x70, 0x15, 0x16),
        "c" | "h" => Color::rgb(0x55, 0x55, 0x55),
        "cpp" | "cc" | "hpp" => Color::rgb(0xf3, 0x4b, 0x7d),
        "cs" => Color::rgb(0x17, 0x86, 0x00),
        "php" => Color::rgb(0x4f, 0x5d, 0x95),
        "swift" => Color::rgb(0xf0, 0x51, 0x38),
        "kt" => Color::rgb(0xa9, 0x7b, 0xff),
        "sh" => Color::rgb(0x89, 0xe0, 0x51),
        "html" => Color::rgb(0xe3, 0x4c, 0x26),
        "css" => Color::rgb(0x56, 0x3d, 0x7c),
        "scss" => Color::rgb(0xc6, 0x53, 0x8c),
        "md" => Color::rgb(0x08, 0x3f, 0xa1),
        "json" => Color::rgb(0x29, 0x29, 0x29),
        "yml" | "yaml" => Color::rgb(0xcb, 0x17, 0x1e),
        "toml" => Color::rgb(0x9c, 0x42, 0x21),
        "svg" => Color::rgb(0xff, 0x99, 0x33),
        "png" | "jpg" | "jpeg" | "gif" | "webp" => Color::rgb(0xa0, 0x7c, 0xc5),
        "txt" => Color::rgb(0x8d, 0x99, 0xae),
        _ => return None,
    };
    Some(color)
}

/// Stable hue in degrees for an arbitrary extension (FNV-1a).
pub fn stable_hue(ext: &str) -> f64 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in ext.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    f64::from(hash % 360)
}

/// How files are mapped to fill colors. Chosen once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorEncoding {
    /// Color by coarse file category.
    #[default]
    Type,
    /// Color by raw extension.
    Extension,
    /// One neutral color for all files.
    None,
}

impl FromStr for ColorEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type" => Ok(ColorEncoding::Type),
            "extension" => Ok(ColorEncoding::Extension),
            "none" => Ok(ColorEncoding::None),
            other => Err(ConfigError::UnknownColorEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for ColorEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorEncoding::Type => "type",
            ColorEncoding::Extension => "extension",
            ColorEncoding::None => "none",
        })
    }
}

/// A color together with what it stands for in the legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub color: Color,
    pub label: String,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub files: usize,
}

/// Distinct file colors in use, sorted by label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&LegendEntry> {
        self.entries.iter().find(|e| e.label == label)
    }
}

/// Assigns colors to nodes under one encoding plus per-extension overrides.
#[derive(Debug, Clone)]
pub struct ColorEncoder {
    encoding: ColorEncoding,
    custom_file_colors: BTreeMap<String, Color>,
}

impl ColorEncoder {
    /// Override keys are matched case-insensitively and may carry a leading dot.
    pub fn new(encoding: ColorEncoding, custom_file_colors: &BTreeMap<String, Color>) -> Self {
        let custom_file_colors = custom_file_colors
            .iter()
            .map(|(ext, color)| (ext.trim_start_matches('.').to_lowercase(), *color))
            .collect();
        Self {
            encoding,
            custom_file_colors,
        }
    }

    pub fn encoding(&self) -> ColorEncoding {
        self.encoding
    }

    /// Color for a single node. Directories always get the container fill.
    pub fn color_for(&self, node: &Node) -> Swatch {
        if node.is_dir() {
            return Swatch {
                color: DIRECTORY_FILL,
                label: "directory".to_string(),
            };
        }

        let ext = node.extension.as_str();
        if !ext.is_empty() {
            if let Some(color) = self.custom_file_colors.get(ext) {
                return Swatch {
                    color: *color,
                    label: format!(".{}", ext),
                };
            }
        }

        match self.encoding {
            ColorEncoding::Type => {
                let category = FileCategory::from_extension(ext);
                Swatch {
                    color: category_color(category),
                    label: category.name().to_string(),
                }
            }
            ColorEncoding::Extension if ext.is_empty() => Swatch {
                color: NO_EXTENSION_FILL,
                label: "no extension".to_string(),
            },
            ColorEncoding::Extension => Swatch {
                color: known_extension_color(ext)
                    .unwrap_or_else(|| Color::from_hsl(stable_hue(ext), 0.55, 0.6)),
                label: format!(".{}", ext),
            },
            ColorEncoding::None => Swatch {
                color: NEUTRAL_FILL,
                label: "file".to_string(),
            },
        }
    }

    /// Color every node in place and collect the legend for its files.
    pub fn apply(&self, root: &mut Node) -> Legend {
        let mut rows: BTreeMap<String, (Color, usize)> = BTreeMap::new();
        self.apply_node(root, &mut rows);
        Legend {
            entries: rows
                .into_iter()
                .map(|(label, (color, files))| LegendEntry { label, color, files })
                .collect(),
        }
    }

    fn apply_node(&self, node: &mut Node, rows: &mut BTreeMap<String, (Color, usize)>) {
        let swatch = self.color_for(node);
        node.color = Some(swatch.color);
        if !node.is_dir() {
            rows.entry(swatch.label).or_insert((swatch.color, 0)).1 += 1;
        }
        for child in &mut node.children {
            self.apply_node(child, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Node {
        Node::file(name.to_string(), name.to_string(), 1, 1)
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("#F80"), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::from_hex("ff8000"), None);
        assert_eq!(Color::from_hex("#ff80"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
        assert_eq!(Color::rgb(255, 128, 0).to_string(), "#ff8000");
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_hsl(0.0, 0.0, 1.0), Color::rgb(255, 255, 255));
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("type".parse::<ColorEncoding>().unwrap(), ColorEncoding::Type);
        assert_eq!(
            "Extension".parse::<ColorEncoding>().unwrap(),
            ColorEncoding::Extension
        );
        assert_eq!("none".parse::<ColorEncoding>().unwrap(), ColorEncoding::None);
        assert!("rainbow".parse::<ColorEncoding>().is_err());
    }

    #[test]
    fn test_type_encoding_groups_categories() {
        let enc = ColorEncoder::new(ColorEncoding::Type, &BTreeMap::new());
        let rs = enc.color_for(&file("main.rs"));
        let py = enc.color_for(&file("app.py"));
        let png = enc.color_for(&file("logo.png"));
        assert_eq!(rs.color, py.color);
        assert_eq!(rs.label, "code");
        assert_ne!(rs.color, png.color);
        assert_eq!(png.label, "image");
    }

    #[test]
    fn test_extension_encoding_unknown_is_stable() {
        let enc = ColorEncoder::new(ColorEncoding::Extension, &BTreeMap::new());
        let first = enc.color_for(&file("data.qqq"));
        let second = enc.color_for(&file("other.qqq"));
        assert_eq!(first, second);
        assert_eq!(first.label, ".qqq");
        assert_ne!(first.color, enc.color_for(&file("x.zzz")).color);
        assert_eq!(enc.color_for(&file("Makefile")).color, NO_EXTENSION_FILL);
    }

    #[test]
    fn test_none_encoding_is_uniform() {
        let enc = ColorEncoder::new(ColorEncoding::None, &BTreeMap::new());
        assert_eq!(enc.color_for(&file("a.rs")).color, NEUTRAL_FILL);
        assert_eq!(enc.color_for(&file("b.png")).color, NEUTRAL_FILL);
    }

    #[test]
    fn test_custom_colors_win_for_every_encoding() {
        let purple = Color::rgb(0x80, 0x00, 0x80);
        let mut custom = BTreeMap::new();
        custom.insert(".TS".to_string(), purple);

        for encoding in [ColorEncoding::Type, ColorEncoding::Extension, ColorEncoding::None] {
            let enc = ColorEncoder::new(encoding, &custom);
            let swatch = enc.color_for(&file("index.ts"));
            assert_eq!(swatch.color, purple, "encoding {}", encoding);
            assert_eq!(swatch.label, ".ts");
            assert_ne!(enc.color_for(&file("index.js")).color, purple);
        }
    }

    #[test]
    fn test_directories_use_container_fill() {
        let enc = ColorEncoder::new(ColorEncoding::Extension, &BTreeMap::new());
        let dir = Node::directory("src".into(), "src".into(), 1, Vec::new());
        assert_eq!(enc.color_for(&dir).color, DIRECTORY_FILL);
    }

    #[test]
    fn test_apply_builds_legend() {
        let mut root = Node::directory(
            String::new(),
            ".".into(),
            0,
            vec![file("a.js"), file("b.png"), file("c.js")],
        );
        let legend = ColorEncoder::new(ColorEncoding::Extension, &BTreeMap::new()).apply(&mut root);

        assert!(root.iter().all(|n| n.color.is_some()));
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec![".js", ".png"]);
        assert_eq!(legend.get(".js").unwrap().files, 2);
    }
}
