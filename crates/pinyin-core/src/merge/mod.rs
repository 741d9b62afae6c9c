//! Layered merging of per-codepoint reading lists.
//!
//! The pipeline is accumulate → dedup → freeze: a `MergeEngine` is seeded
//! from the base layer, each later layer is applied in configured order
//! under its `MergePolicy`, and `finish` checks the codepoint-set
//! invariants before handing out an immutable `CanonicalMap`.


use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info};

use crate::codepoint::Codepoint;

/// How a layer's readings combine with what has been accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Seeds the accumulator. Exactly one, applied first.
    Base,
    /// Appends after existing readings; may introduce new codepoints.
    Extend,
    /// Prepends before existing readings; codepoint must already exist.
    Additive,
    /// Replaces existing readings; codepoint must already exist.
    Overwrite,
    /// Only fills codepoints that are still absent.
    FallbackOnly,
}

impl MergePolicy {
    /// Whether the policy may add codepoints to the accumulator.
    pub fn may_introduce(self) -> bool {
        matches!(
            self,
            MergePolicy::Base | MergePolicy::Extend | MergePolicy::FallbackOnly
        )
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergePolicy::Base => "base",
            MergePolicy::Extend => "extend",
            MergePolicy::Additive => "additive",
            MergePolicy::Overwrite => "overwrite",
            MergePolicy::FallbackOnly => "fallback_only",
        };
        f.write_str(name)
    }
}

/// A named contributor of `codepoint → readings` data.
///
/// Entries keep source order; a codepoint appears at most once.
#[derive(Debug, Clone)]
pub struct SourceLayer {
    pub name: String,
    pub policy: MergePolicy,
    pub entries: IndexMap<Codepoint, Vec<String>>,
}

impl SourceLayer {
    pub fn new(name: impl Into<String>, policy: MergePolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            entries: IndexMap::new(),
        }
    }

    /// Builder-style insertion, mostly for tests and small fixtures.
    pub fn with_entry<I, S>(mut self, codepoint: Codepoint, readings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(codepoint, readings.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error(
        "invariant violation: layer {layer:?} ({policy}) contributes {codepoint}, \
         which is absent from the canonical set"
    )]
    ForeignCodepoint {
        layer: String,
        policy: MergePolicy,
        codepoint: Codepoint,
    },

    #[error("invariant violation: canonical map has {canonical} codepoints, expected {expected}")]
    SizeMismatch { canonical: usize, expected: usize },

    #[error("layer {layer:?}: policy {policy} not allowed here ({reason})")]
    MisplacedPolicy {
        layer: String,
        policy: MergePolicy,
        reason: &'static str,
    },

    #[error("layer {layer:?}: {codepoint} has an empty reading list")]
    EmptyReadings { layer: String, codepoint: Codepoint },
}

impl MergeError {
    /// True for post-merge codepoint-set violations.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            MergeError::ForeignCodepoint { .. } | MergeError::SizeMismatch { .. }
        )
    }
}

/// Remove repeats, keeping the first occurrence of each value.
///
/// `[a, b, a, c, b]` → `[a, b, c]`.
pub fn dedup<T: Eq + std::hash::Hash + Clone>(list: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// What a single layer did to the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerReport {
    pub name: String,
    pub policy: MergePolicy,
    /// Codepoints the layer supplied.
    pub supplied: usize,
    /// Codepoints newly added to the accumulator.
    pub added: usize,
    /// Existing codepoints whose list changed.
    pub changed: usize,
    /// Supplied codepoints the policy ignored (fallback only).
    pub ignored: usize,
}

pub struct MergeEngine {
    accumulator: IndexMap<Codepoint, Vec<String>>,
    /// Union of the key sets of every layer whose policy may introduce
    /// codepoints, collected independently of the accumulator.
    universe: BTreeSet<Codepoint>,
    reports: Vec<LayerReport>,
}

impl MergeEngine {
    /// Seed the accumulator from the base layer.
    pub fn new(base: SourceLayer) -> Result<Self, MergeError> {
        if base.policy != MergePolicy::Base {
            return Err(MergeError::MisplacedPolicy {
                layer: base.name,
                policy: base.policy,
                reason: "the first layer must be the base",
            });
        }
        let mut engine = Self {
            accumulator: IndexMap::with_capacity(base.entries.len()),
            universe: BTreeSet::new(),
            reports: Vec::new(),
        };
        engine.apply_checked(base)?;
        Ok(engine)
    }

    /// Apply one later layer under its policy.
    pub fn apply(&mut self, layer: SourceLayer) -> Result<LayerReport, MergeError> {
        if layer.policy == MergePolicy::Base {
            return Err(MergeError::MisplacedPolicy {
                layer: layer.name,
                policy: layer.policy,
                reason: "only the first layer may be the base",
            });
        }
        self.apply_checked(layer)
    }

    pub fn reports(&self) -> &[LayerReport] {
        &self.reports
    }

    fn apply_checked(&mut self, layer: SourceLayer) -> Result<LayerReport, MergeError> {
        let _span = debug_span!("merge_layer", layer = %layer.name, policy = %layer.policy)
            .entered();

        let SourceLayer {
            name,
            policy,
            entries,
        } = layer;
        let mut report = LayerReport {
            name: name.clone(),
            policy,
            supplied: entries.len(),
            added: 0,
            changed: 0,
            ignored: 0,
        };
        if policy.may_introduce() {
            self.universe.extend(entries.keys().copied());
        }

        for (codepoint, readings) in entries {
            if readings.is_empty() {
                return Err(MergeError::EmptyReadings {
                    layer: name,
                    codepoint,
                });
            }
            let Some(current) = self.accumulator.get_mut(&codepoint) else {
                if !policy.may_introduce() {
                    return Err(MergeError::ForeignCodepoint {
                        layer: name,
                        policy,
                        codepoint,
                    });
                }
                self.accumulator.insert(codepoint, dedup(readings));
                report.added += 1;
                continue;
            };

            let merged = match policy {
                MergePolicy::FallbackOnly => {
                    report.ignored += 1;
                    continue;
                }
                MergePolicy::Base | MergePolicy::Overwrite => dedup(readings),
                MergePolicy::Extend => dedup(current.iter().cloned().chain(readings)),
                MergePolicy::Additive => dedup(readings.into_iter().chain(current.iter().cloned())),
            };
            if *current != merged {
                report.changed += 1;
                *current = merged;
            }
        }

        debug!(
            supplied = report.supplied,
            added = report.added,
            changed = report.changed,
            ignored = report.ignored
        );
        self.reports.push(report.clone());
        Ok(report)
    }

    /// Dedup every list, freeze into codepoint order, and verify that the
    /// codepoint set is exactly what the introducing layers supplied.
    ///
    /// Layers that may not introduce codepoints are rejected at apply time,
    /// so they are a subset of the canonical set by construction.
    pub fn finish(self) -> Result<CanonicalMap, MergeError> {
        let _span = debug_span!("merge_finish", codepoints = self.accumulator.len()).entered();

        let entries: BTreeMap<Codepoint, Vec<String>> = self
            .accumulator
            .into_iter()
            .map(|(codepoint, readings)| (codepoint, dedup(readings)))
            .collect();

        if entries.len() != self.universe.len()
            || !self.universe.iter().all(|c| entries.contains_key(c))
        {
            return Err(MergeError::SizeMismatch {
                canonical: entries.len(),
                expected: self.universe.len(),
            });
        }

        for report in &self.reports {
            info!(
                layer = %report.name,
                policy = %report.policy,
                supplied = report.supplied,
                added = report.added,
                changed = report.changed,
                ignored = report.ignored,
                "merged layer"
            );
        }

        Ok(CanonicalMap { entries })
    }
}

/// Merge a base layer and the ordered later layers into a `CanonicalMap`.
pub fn merge_layers(
    base: SourceLayer,
    layers: impl IntoIterator<Item = SourceLayer>,
) -> Result<CanonicalMap, MergeError> {
    let mut engine = MergeEngine::new(base)?;
    for layer in layers {
        engine.apply(layer)?;
    }
    engine.finish()
}

/// The authoritative codepoint → readings mapping, in ascending codepoint
/// order. Every list is non-empty and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalMap {
    entries: BTreeMap<Codepoint, Vec<String>>,
}

impl CanonicalMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, codepoint: Codepoint) -> Option<&[String]> {
        self.entries.get(&codepoint).map(Vec::as_slice)
    }

    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.entries.contains_key(&codepoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Codepoint, &[String])> {
        self.entries.iter().map(|(c, r)| (*c, r.as_slice()))
    }

    /// Entries whose codepoint lies in `start..=end`.
    pub fn range(
        &self,
        start: Codepoint,
        end: Codepoint,
    ) -> impl Iterator<Item = (Codepoint, &[String])> {
        self.entries
            .range(start..=end)
            .map(|(c, r)| (*c, r.as_slice()))
    }
}
