//! Pipeline settings loaded from TOML.
//!
//! - `parse_settings_toml(text)` parses and validates a custom configuration
//! - `Settings::load(None)` returns the embedded defaults
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::codepoint::Codepoint;
use crate::compile::CompactRange;
use crate::merge::MergePolicy;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub layers: Vec<LayerSettings>,
    #[serde(rename = "ranges")]
    ranges_raw: Vec<RangeSettings>,
    pub output: OutputSettings,
    /// Parsed `ranges`.
    #[serde(skip)]
    ranges: Vec<CompactRange>,
}

impl Settings {
    /// Read settings from `path`, or the embedded defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => parse_settings_toml(&fs::read_to_string(path)?),
            None => parse_settings_toml(DEFAULT_SETTINGS_TOML),
        }
    }

    pub fn ranges(&self) -> &[CompactRange] {
        &self.ranges
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerSettings {
    pub name: String,
    /// Source file, relative to the input directory.
    pub file: String,
    pub policy: MergePolicy,
    /// A missing optional layer is skipped instead of failing the build.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct RangeSettings {
    start: String,
    end: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub version: String,
    pub source: String,
    pub pinyin: String,
    pub compact_text: String,
    pub report: String,
    pub compact_binary: String,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate_layers(&s.layers)?;
    s.ranges = parse_ranges(&s.ranges_raw)?;
    validate_output(&s.output)?;
    Ok(s)
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

fn validate_layers(layers: &[LayerSettings]) -> Result<(), SettingsError> {
    let Some(first) = layers.first() else {
        return Err(invalid("layers", "at least one layer is required"));
    };
    if first.policy != MergePolicy::Base {
        return Err(invalid(
            format!("layers.{}.policy", first.name),
            "the first layer must use policy \"base\"",
        ));
    }
    if !first.required {
        return Err(invalid(
            format!("layers.{}.required", first.name),
            "the base layer cannot be optional",
        ));
    }

    let mut names = HashSet::new();
    for (i, layer) in layers.iter().enumerate() {
        if layer.name.trim().is_empty() {
            return Err(invalid(format!("layers[{i}].name"), "must not be empty"));
        }
        if layer.file.trim().is_empty() {
            return Err(invalid(
                format!("layers.{}.file", layer.name),
                "must not be empty",
            ));
        }
        if i > 0 && layer.policy == MergePolicy::Base {
            return Err(invalid(
                format!("layers.{}.policy", layer.name),
                "only the first layer may use policy \"base\"",
            ));
        }
        if !names.insert(layer.name.as_str()) {
            return Err(invalid(
                format!("layers.{}", layer.name),
                "duplicate layer name",
            ));
        }
    }
    Ok(())
}

fn parse_ranges(raw: &[RangeSettings]) -> Result<Vec<CompactRange>, SettingsError> {
    if raw.is_empty() {
        return Err(invalid("ranges", "at least one range is required"));
    }

    let mut ranges: Vec<CompactRange> = Vec::with_capacity(raw.len());
    for (i, r) in raw.iter().enumerate() {
        let parse = |field: &str, text: &str| {
            text.parse::<Codepoint>()
                .map_err(|e| invalid(format!("ranges[{i}].{field}"), e.to_string()))
        };
        let start = parse("start", &r.start)?;
        let end = parse("end", &r.end)?;
        let range =
            CompactRange::new(start, end).map_err(|e| invalid(format!("ranges[{i}]"), e.to_string()))?;
        if let Some(other) = ranges
            .iter()
            .find(|o| o.start <= range.end && range.start <= o.end)
        {
            return Err(invalid(
                format!("ranges[{i}]"),
                format!("{range} overlaps {other}"),
            ));
        }
        ranges.push(range);
    }
    Ok(ranges)
}

fn validate_output(output: &OutputSettings) -> Result<(), SettingsError> {
    let files = [
        ("output.pinyin", &output.pinyin),
        ("output.compact_text", &output.compact_text),
        ("output.report", &output.report),
        ("output.compact_binary", &output.compact_binary),
    ];
    let mut seen = HashSet::new();
    for (field, name) in files {
        if name.trim().is_empty() {
            return Err(invalid(field, "must not be empty"));
        }
        if !seen.insert(name.as_str()) {
            return Err(invalid(field, format!("file name {name:?} is used twice")));
        }
    }
    Ok(())
}
