//! Source layer files.
//!
//! One mapping per line, `U+XXXX: r1,r2  # comment`. Readings may be
//! separated by commas, whitespace or both. Blank lines and lines starting
//! with `#` are ignored; everything after a `#` is a comment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pinyin_core::codepoint::Codepoint;
use pinyin_core::merge::{MergePolicy, SourceLayer};
use pinyin_core::settings::LayerSettings;
use tracing::{debug, debug_span, warn};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("required layer {layer} not found at {path}")]
    Missing { layer: String, path: PathBuf },

    #[error("{layer}:{line}: {reason}")]
    Format {
        layer: String,
        line: usize,
        reason: String,
    },

    #[error("no layers configured")]
    NoLayers,
}

/// Parse the text of one layer file.
///
/// A codepoint listed twice keeps the later line.
pub fn parse_layer(
    name: &str,
    policy: MergePolicy,
    content: &str,
) -> Result<SourceLayer, SourceError> {
    let mut layer = SourceLayer::new(name, policy);
    let format_err = |line: usize, reason: String| SourceError::Format {
        layer: name.to_string(),
        line,
        reason,
    };

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let Some((code, readings)) = line.split_once(':') else {
            return Err(format_err(line_no, "expected `U+XXXX: readings`".into()));
        };
        if readings.contains(':') {
            return Err(format_err(line_no, "more than one `:`".into()));
        }
        let codepoint: Codepoint = code
            .trim()
            .parse()
            .map_err(|e| format_err(line_no, format!("{e}")))?;

        let readings: Vec<String> = readings
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        if readings.is_empty() {
            return Err(format_err(line_no, format!("no readings for {codepoint}")));
        }

        if let Some(previous) = layer.entries.insert(codepoint, readings) {
            debug!(layer = name, %codepoint, ?previous, "duplicate line replaces earlier one");
        }
    }
    Ok(layer)
}

/// Read one configured layer from `dir`.
///
/// `Ok(None)` for an optional layer whose file does not exist.
pub fn load_layer(dir: &Path, settings: &LayerSettings) -> Result<Option<SourceLayer>, SourceError> {
    let path = dir.join(&settings.file);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if settings.required {
                return Err(SourceError::Missing {
                    layer: settings.name.clone(),
                    path,
                });
            }
            warn!(layer = %settings.name, path = %path.display(), "optional layer missing, skipped");
            return Ok(None);
        }
        Err(source) => return Err(SourceError::Io { path, source }),
    };

    eprintln!("Reading {}...", path.display());
    parse_layer(&settings.name, settings.policy, &content).map(Some)
}

/// Read every configured layer in precedence order, splitting off the base.
pub fn load_layers(
    dir: &Path,
    layers: &[LayerSettings],
) -> Result<(SourceLayer, Vec<SourceLayer>), SourceError> {
    let _span = debug_span!("load_layers", dir = %dir.display()).entered();

    let mut loaded = Vec::with_capacity(layers.len());
    for settings in layers {
        if let Some(layer) = load_layer(dir, settings)? {
            debug!(layer = %layer.name, entries = layer.entries.len(), "loaded layer");
            loaded.push(layer);
        }
    }

    if loaded.is_empty() {
        return Err(SourceError::NoLayers);
    }
    let rest = loaded.split_off(1);
    let base = loaded.remove(0);
    Ok((base, rest))
}
