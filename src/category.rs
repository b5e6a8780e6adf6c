//! File category detection and classification
//!
//! A coarse extension-to-category table used by the `type` color encoding.

/// Coarse kind of content a file holds, judged by extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    Code,
    Markup,
    Data,
    Image,
    Binary,
    Document,
    Other,
}

impl FileCategory {
    /// All categories, in legend order.
    pub const ALL: [FileCategory; 7] = [
        FileCategory::Code,
        FileCategory::Markup,
        FileCategory::Data,
        FileCategory::Image,
        FileCategory::Binary,
        FileCategory::Document,
        FileCategory::Other,
    ];

    /// Detect category from a file extension (without the leading dot).
    ///
    /// # Examples
    ///
    /// ```
    /// use orchard::category::FileCategory;
    ///
    /// assert_eq!(FileCategory::from_extension("rs"), FileCategory::Code);
    /// assert_eq!(FileCategory::from_extension("PNG"), FileCategory::Image);
    /// assert_eq!(FileCategory::from_extension(""), FileCategory::Other);
    /// ```
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" | "py" | "pyw" | "pyi" | "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts"
            | "cts" | "go" | "c" | "h" | "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" | "cs"
            | "java" | "kt" | "kts" | "swift" | "rb" | "php" | "sh" | "bash" | "zsh" | "fish"
            | "lua" | "scala" | "ex" | "exs" | "erl" | "hs" | "clj" | "dart" | "r" | "jl"
            | "vue" | "svelte" | "sql" | "zig" | "nim" | "ml" | "pl" | "ps1" => {
                FileCategory::Code
            }
            "html" | "htm" | "xml" | "xhtml" | "css" | "scss" | "sass" | "less" | "md"
            | "markdown" | "mdx" | "rst" | "adoc" | "tex" => FileCategory::Markup,
            "json" | "jsonc" | "yaml" | "yml" | "toml" | "csv" | "tsv" | "ini" | "cfg"
            | "conf" | "env" | "lock" | "graphql" | "proto" | "parquet" | "db" | "sqlite" => {
                FileCategory::Data
            }
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" | "bmp" | "tiff" | "avif"
            | "psd" => FileCategory::Image,
            "exe" | "dll" | "so" | "dylib" | "a" | "o" | "obj" | "wasm" | "bin" | "class"
            | "jar" | "zip" | "gz" | "tgz" | "tar" | "xz" | "bz2" | "7z" | "rar" | "woff"
            | "woff2" | "ttf" | "otf" | "eot" | "mp3" | "mp4" | "wav" | "mov" | "webm" => {
                FileCategory::Binary
            }
            "txt" | "pdf" | "doc" | "docx" | "odt" | "rtf" | "xls" | "xlsx" | "ppt" | "pptx"
            | "epub" => FileCategory::Document,
            _ => FileCategory::Other,
        }
    }

    /// Returns the human-readable name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            FileCategory::Code => "code",
            FileCategory::Markup => "markup",
            FileCategory::Data => "data",
            FileCategory::Image => "image",
            FileCategory::Binary => "binary",
            FileCategory::Document => "document",
            FileCategory::Other => "other",
        }
    }
}
