//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the site's `config.toml` overrides any subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_root = "src/content/novel"  # Relative to the site directory
//!
//! [content]
//! extensions = ["md", "mdx"]          # Files treated as content entries
//!
//! [site]
//! title = "Palimpsestus"
//! lang = "zh"
//!
//! [toc]
//! # max_depth = 2                     # Deepest level shown in the TOC (omit = all)
//!
//! [processing]
//! # max_processes = 4                 # Parallel file readers (omit = CPU cores)
//!
//! [glyphs]
//! font_dir = "/opt/palimpsestus/fonts"
//!
//! [[glyphs.ranges]]
//! name = "CJKExtB-Serif"
//! label = "CJK Extension B"
//! start = 0x20000
//! end = 0x2A6DF
//! source = "NotoSerifCJKsc-Regular.otf"
//!
//! [[glyphs.ranges]]
//! name = "NushuSerif"
//! label = "Nushu"
//! start = 0x1B170
//! end = 0x1B2FF
//! source = "NyushuFengQi.ttf"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Tables merge key by key; arrays (including
//! `[[glyphs.ranges]]`) replace the default array wholesale.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content directory, relative to the site directory.
    pub content_root: String,
    /// Which files count as content entries.
    pub content: ContentConfig,
    /// Site metadata used by the renderers.
    pub site: SiteMeta,
    /// Table of contents rendering.
    pub toc: TocConfig,
    /// Parallel file reading settings.
    pub processing: ProcessingConfig,
    /// Rare-glyph coverage ranges for local font subsets.
    pub glyphs: GlyphsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: "src/content/novel".to_string(),
            content: ContentConfig::default(),
            site: SiteMeta::default(),
            toc: TocConfig::default(),
            processing: ProcessingConfig::default(),
            glyphs: GlyphsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "content.extensions must not be empty".into(),
            ));
        }
        if self.toc.max_depth == Some(0) {
            return Err(ConfigError::Validation(
                "toc.max_depth must be at least 1".into(),
            ));
        }
        let mut names = HashSet::new();
        for range in &self.glyphs.ranges {
            if range.name.is_empty() {
                return Err(ConfigError::Validation(
                    "glyphs.ranges entries need a name".into(),
                ));
            }
            if range.start > range.end {
                return Err(ConfigError::Validation(format!(
                    "glyphs range '{}': start must not exceed end",
                    range.name
                )));
            }
            if !names.insert(range.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "glyphs range '{}' is defined twice",
                    range.name
                )));
            }
        }
        Ok(())
    }

    /// Absolute-or-relative content directory for a site directory.
    pub fn content_dir(&self, site_dir: &Path) -> PathBuf {
        site_dir.join(&self.content_root)
    }
}

/// Content discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// File extensions (without the dot) loaded as entries.
    pub extensions: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "mdx".to_string()],
        }
    }
}

/// Site metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    /// BCP 47 language tag of the work.
    pub lang: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Palimpsestus".to_string(),
            lang: "zh".to_string(),
        }
    }
}

/// Table of contents settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Number of levels rendered. `None` renders the whole tree.
    pub max_depth: Option<usize>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel file readers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Rare-glyph ranges that need locally subset fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphsConfig {
    /// Directory that relative `source` font paths resolve against.
    pub font_dir: String,
    pub ranges: Vec<GlyphRange>,
}

impl Default for GlyphsConfig {
    fn default() -> Self {
        Self {
            font_dir: "/opt/palimpsestus/fonts".to_string(),
            ranges: vec![
                GlyphRange {
                    name: "CJKExtB-Serif".to_string(),
                    label: "CJK Extension B".to_string(),
                    start: 0x20000,
                    end: 0x2A6DF,
                    source: "NotoSerifCJKsc-Regular.otf".to_string(),
                },
                GlyphRange {
                    name: "NushuSerif".to_string(),
                    label: "Nushu".to_string(),
                    start: 0x1B170,
                    end: 0x1B2FF,
                    source: "NyushuFengQi.ttf".to_string(),
                },
            ],
        }
    }
}

impl GlyphsConfig {
    /// Full path of a range's source font.
    pub fn source_path(&self, range: &GlyphRange) -> PathBuf {
        Path::new(&self.font_dir).join(&range.source)
    }
}

/// An inclusive code point range and the font that covers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlyphRange {
    /// Subset name; also the output font's file stem.
    pub name: String,
    /// Human-readable script name.
    pub label: String,
    pub start: u32,
    pub end: u32,
    /// Source font file, relative to `glyphs.font_dir` unless absolute.
    pub source: String,
}

impl GlyphRange {
    pub fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&u32::from(c))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(site_dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(site_dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Palimpsestus Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Content directory, relative to the directory holding this file.
content_root = "src/content/novel"

# ---------------------------------------------------------------------------
# Content discovery
# ---------------------------------------------------------------------------
[content]
# Files with these extensions become entries. Each file's id is its path
# relative to content_root without the extension, e.g. 01/02-00-05.
extensions = ["md", "mdx"]

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
title = "Palimpsestus"
lang = "zh"

# ---------------------------------------------------------------------------
# Table of contents
# ---------------------------------------------------------------------------
[toc]
# Deepest level rendered (1 = chapters only).
# Omit or comment out to render the whole tree.
# max_depth = 2

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel file readers for the glyph scan.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Rare glyphs
# ---------------------------------------------------------------------------
# Characters the web font CDN does not cover. The glyph scan collects every
# such character in the content so a subsetter can build a minimal font.
[glyphs]
font_dir = "/opt/palimpsestus/fonts"

[[glyphs.ranges]]
name = "CJKExtB-Serif"
label = "CJK Extension B"
start = 0x20000
end = 0x2A6DF
source = "NotoSerifCJKsc-Regular.otf"

[[glyphs.ranges]]
name = "NushuSerif"
label = "Nushu"
start = 0x1B170
end = 0x1B2FF
source = "NyushuFengQi.ttf"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.content_root, "src/content/novel");
        assert_eq!(config.content.extensions, vec!["md", "mdx"]);
        assert_eq!(config.site.title, "Palimpsestus");
        assert_eq!(config.toc.max_depth, None);
        assert_eq!(config.glyphs.ranges.len(), 2);
    }

    #[test]
    fn default_glyph_ranges_match_cdn_gaps() {
        let config = SiteConfig::default();
        let ext_b = &config.glyphs.ranges[0];
        assert_eq!((ext_b.start, ext_b.end), (0x20000, 0x2A6DF));
        let nushu = &config.glyphs.ranges[1];
        assert_eq!((nushu.start, nushu.end), (0x1B170, 0x1B2FF));
    }

    #[test]
    fn glyph_range_bounds_are_inclusive() {
        let range = &SiteConfig::default().glyphs.ranges[0];
        assert!(range.contains('\u{20000}'));
        assert!(range.contains('\u{2A6DF}'));
        assert!(!range.contains('\u{1FFFF}'));
        assert!(!range.contains('\u{2A6E0}'));
        assert!(!range.contains('字'));
    }

    #[test]
    fn source_path_joins_font_dir() {
        let glyphs = GlyphsConfig::default();
        assert_eq!(
            glyphs.source_path(&glyphs.ranges[1]),
            Path::new("/opt/palimpsestus/fonts/NyushuFengQi.ttf")
        );
    }

    #[test]
    fn content_dir_is_relative_to_site() {
        let config = SiteConfig::default();
        assert_eq!(
            config.content_dir(Path::new("/srv/site")),
            Path::new("/srv/site/src/content/novel")
        );
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str("[site]\ntitle = \"Other\"\n").unwrap();
        assert_eq!(config.site.title, "Other");
        // Defaults preserved
        assert_eq!(config.site.lang, "zh");
        assert_eq!(config.content.extensions, vec!["md", "mdx"]);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "content_root = \"books\"\n\n[toc]\nmax_depth = 2\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.content_root, "books");
        assert_eq!(config.toc.max_depth, Some(2));
        assert_eq!(config.site.title, "Palimpsestus");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not [valid").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn glyph_ranges_replaced_wholesale() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[[glyphs.ranges]]
name = "Tangut"
label = "Tangut"
start = 0x17000
end = 0x187F7
source = "NotoSerifTangut-Regular.ttf"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.glyphs.ranges.len(), 1);
        assert_eq!(config.glyphs.ranges[0].name, "Tangut");
        // Sibling key in the same table survives the merge
        assert_eq!(config.glyphs.font_dir, "/opt/palimpsestus/fonts");
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[x.y]\na = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[x.y]\nb = 9").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["x"]["y"]["a"].as_integer(), Some(1));
        assert_eq!(merged["x"]["y"]["b"].as_integer(), Some(9));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site]\ntitel = \"x\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[colors]\nbg = \"#fff\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_extensions() {
        let mut config = SiteConfig::default();
        config.content.extensions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_max_depth() {
        let mut config = SiteConfig::default();
        config.toc.max_depth = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_inverted_range() {
        let mut config = SiteConfig::default();
        config.glyphs.ranges[0].start = 0x2A6DF;
        config.glyphs.ranges[0].end = 0x20000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("CJKExtB-Serif"));
    }

    #[test]
    fn validate_duplicate_range_names() {
        let mut config = SiteConfig::default();
        config.glyphs.ranges[1].name = config.glyphs.ranges[0].name.clone();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_unnamed_range() {
        let mut config = SiteConfig::default();
        config.glyphs.ranges[0].name.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[toc]\nmax_depth = 0").unwrap();
        assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
    }

    // =========================================================================
    // Processing
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let threads = effective_threads(&ProcessingConfig::default());
        assert!(threads >= 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // Stock template
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for key in ["content_root", "content", "site", "toc", "processing", "glyphs"] {
            assert!(table.contains_key(key), "missing {key}");
        }
    }
}
