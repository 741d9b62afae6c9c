//! The batch driver: merge → encode → compile → render.
//!
//! Each stage consumes the previous stage's complete output, and the first
//! error aborts the batch. Artifacts are rendered to memory only; the
//! caller decides where the bytes go.

use tracing::{debug_span, info};

use crate::artifact::{self, ArtifactError, CompactArtifact};
use crate::compile::{CompactRange, CompileError, CompiledTables, TableCompiler};
use crate::merge::{self, CanonicalMap, MergeError, SourceLayer};
use crate::settings::OutputSettings;
use crate::shuangpin::{EncodeError, ShuangpinScheme};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Unencodable(#[from] EncodeError),

    #[error(transparent)]
    Compile(CompileError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl From<CompileError> for BuildError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::Encode(e) => BuildError::Unencodable(e),
            other => BuildError::Compile(other),
        }
    }
}

impl BuildError {
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, BuildError::Merge(e) if e.is_invariant_violation())
    }
}

/// The canonical map and the tables compiled from it.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub canonical: CanonicalMap,
    pub compiled: CompiledTables,
}

/// One rendered file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Run merge and compile over already-loaded layers.
pub fn build(
    base: SourceLayer,
    layers: impl IntoIterator<Item = SourceLayer>,
    ranges: &[CompactRange],
    scheme: &ShuangpinScheme,
) -> Result<BuildOutput, BuildError> {
    let _span = debug_span!("build").entered();

    let canonical = merge::merge_layers(base, layers)?;
    info!(codepoints = canonical.len(), "merged canonical map");

    let compiler = TableCompiler::new(scheme, ranges.to_vec())?;
    let compiled = compiler.compile(&canonical)?;
    info!(
        readings = compiled.summary.readings,
        singles = compiled.summary.single_combinations,
        multis = compiled.summary.multi_combinations,
        tables = compiled.tables.len(),
        "compiled compact tables"
    );

    Ok(BuildOutput {
        canonical,
        compiled,
    })
}

impl BuildOutput {
    /// Render every artifact named in `output`, in a fixed order.
    pub fn render(&self, output: &OutputSettings) -> Result<Vec<RenderedArtifact>, BuildError> {
        let _span = debug_span!("render").entered();

        let text = [
            (
                &output.pinyin,
                artifact::text::render_canonical(&self.canonical, &output.version, &output.source),
            ),
            (
                &output.compact_text,
                artifact::text::render_compact(&self.compiled),
            ),
            (
                &output.report,
                artifact::text::render_report(&self.canonical, &self.compiled),
            ),
        ];

        let mut rendered: Vec<RenderedArtifact> = text
            .into_iter()
            .map(|(name, body)| RenderedArtifact {
                file_name: name.clone(),
                bytes: body.into_bytes(),
            })
            .collect();
        rendered.push(RenderedArtifact {
            file_name: output.compact_binary.clone(),
            bytes: CompactArtifact::from(&self.compiled).to_bytes()?,
        });
        Ok(rendered)
    }
}
