use std::path::{Path, PathBuf};
use std::process;

use pinyin_core::artifact::write_all_atomic;
use pinyin_core::compile::Summary;
use pinyin_core::pipeline::{self, BuildError};
use pinyin_core::settings::Settings;
use pinyin_core::shuangpin::ShuangpinScheme;
use tracing::info;

use crate::commands::config_ops;
use crate::source::{self, SourceError};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, thiserror::Error)]
pub enum BuildCommandError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("IO error writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a finished build wrote.
#[derive(Debug)]
pub struct BuildReport {
    pub codepoints: usize,
    pub summary: Summary,
    pub written: Vec<PathBuf>,
}

/// Load, merge, compile and render everything before the first write, then
/// stage all artifacts before renaming any, so a failed run leaves
/// `output_dir` untouched.
pub fn run_build(
    settings: &Settings,
    scheme: &ShuangpinScheme,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BuildReport, BuildCommandError> {
    if !input_dir.is_dir() {
        return Err(BuildCommandError::NotADirectory(input_dir.to_path_buf()));
    }

    let (base, layers) = source::load_layers(input_dir, &settings.layers)?;
    let output = pipeline::build(base, layers, settings.ranges(), scheme)?;
    let rendered = output.render(&settings.output)?;

    let written: Vec<PathBuf> = rendered
        .iter()
        .map(|artifact| output_dir.join(&artifact.file_name))
        .collect();
    write_all_atomic(
        written
            .iter()
            .zip(&rendered)
            .map(|(path, artifact)| (path, artifact.bytes.as_slice())),
    )
    .map_err(|source| BuildCommandError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    for (path, artifact) in written.iter().zip(&rendered) {
        info!(path = %path.display(), bytes = artifact.bytes.len(), "wrote artifact");
    }

    Ok(BuildReport {
        codepoints: output.canonical.len(),
        summary: output.compiled.summary,
        written,
    })
}

pub fn build(
    settings_file: Option<&str>,
    scheme_file: Option<&str>,
    input_dir: &str,
    output_dir: &str,
) {
    let settings = die!(
        Settings::load(settings_file.map(Path::new)),
        "Error loading settings: {}"
    );
    let custom;
    let scheme = match scheme_file {
        Some(file) => {
            custom = config_ops::load_scheme(file);
            &custom
        }
        None => ShuangpinScheme::xiaohe(),
    };

    let report = run_build(&settings, scheme, Path::new(input_dir), Path::new(output_dir))
        .unwrap_or_else(|e| {
            match &e {
                BuildCommandError::Build(b) if b.is_invariant_violation() => {
                    eprintln!("Invariant violation: {e}")
                }
                _ => eprintln!("Error: {e}"),
            }
            process::exit(1);
        });

    let s = &report.summary;
    eprintln!("Codepoints:    {}", report.codepoints);
    eprintln!("Readings:      {}", s.readings);
    eprintln!(
        "Combinations:  {} + {} = {}",
        s.single_combinations,
        s.multi_combinations,
        s.total_combinations()
    );
    for path in &report.written {
        eprintln!("Wrote {}", path.display());
    }
}
