//! Compilation of a `CanonicalMap` into index-addressed compact tables.
//!
//! Three derived structures, each built once and immutable afterwards:
//!
//! - the global reading index: every distinct reading, sorted by
//!   `(tone-numbered form, original)`, with its base form and shorthand;
//! - the combination table: every distinct sorted index list of a
//!   multi-reading codepoint, sorted by `(length, indices)`;
//! - one dense `u16` array per declared codepoint range, holding a reading
//!   index, `reading_count + combination_id`, or [`SENTINEL`].

#[cfg(test)]
mod tests;

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info};

use crate::codepoint::Codepoint;
use crate::merge::CanonicalMap;
use crate::phonetic;
use crate::shuangpin::{EncodeError, ShuangpinScheme};

/// Marks a codepoint with no recorded reading.
pub const SENTINEL: u16 = 0xFFFF;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("{readings} readings + {combinations} combinations do not fit below the sentinel 0xFFFF")]
    IndexOverflow {
        readings: usize,
        combinations: usize,
    },

    #[error("invalid range {start}..={end}: start is after end")]
    InvalidRange { start: Codepoint, end: Codepoint },

    #[error("ranges {first} and {second} overlap")]
    OverlappingRanges {
        first: CompactRange,
        second: CompactRange,
    },
}

/// An inclusive, contiguous codepoint interval compiled into a dense array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactRange {
    pub start: Codepoint,
    pub end: Codepoint,
}

impl CompactRange {
    pub fn new(start: Codepoint, end: Codepoint) -> Result<Self, CompileError> {
        if start > end {
            return Err(CompileError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.start <= codepoint && codepoint <= self.end
    }

    /// Number of slots (codepoints) in the range.
    pub fn len(&self) -> usize {
        (self.end.value() - self.start.value()) as usize + 1
    }

    /// A range always holds at least one slot.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn overlaps(&self, other: &CompactRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl std::fmt::Display for CompactRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// One row of the global reading table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRow {
    pub reading: String,
    pub base: String,
    pub numbered: String,
    pub shorthand: String,
}

impl ReadingRow {
    pub fn derive(reading: &str, scheme: &ShuangpinScheme) -> Result<Self, EncodeError> {
        Ok(Self {
            reading: reading.to_string(),
            base: phonetic::base_form(reading),
            numbered: phonetic::tone_numbered(reading),
            shorthand: scheme.encode(reading)?,
        })
    }
}

/// A decoded compact-table value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Missing,
    Reading(u16),
    Combination(u16),
}

impl Entry {
    /// Interpret a raw table value given the size of the reading index.
    pub fn decode(value: u16, reading_count: usize) -> Self {
        if value == SENTINEL {
            Entry::Missing
        } else if (value as usize) < reading_count {
            Entry::Reading(value)
        } else {
            Entry::Combination((value as usize - reading_count) as u16)
        }
    }
}

/// The dense array for one declared range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactTable {
    pub range: CompactRange,
    pub entries: Vec<u16>,
}

impl CompactTable {
    pub fn get(&self, codepoint: Codepoint) -> Option<u16> {
        if !self.range.contains(codepoint) {
            return None;
        }
        let offset = (codepoint.value() - self.range.start.value()) as usize;
        self.entries.get(offset).copied()
    }
}

/// Counts for validating a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Distinct readings.
    pub readings: usize,
    /// Distinct readings that occur as a codepoint's only reading.
    pub single_combinations: usize,
    /// Distinct multi-reading combinations.
    pub multi_combinations: usize,
}

impl Summary {
    pub fn total_combinations(&self) -> usize {
        self.single_combinations + self.multi_combinations
    }
}

/// Everything the compiler derives from a canonical map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTables {
    pub readings: Vec<ReadingRow>,
    pub combinations: Vec<Vec<u16>>,
    pub tables: Vec<CompactTable>,
    pub summary: Summary,
}

pub struct TableCompiler<'a> {
    scheme: &'a ShuangpinScheme,
    ranges: Vec<CompactRange>,
}

impl<'a> TableCompiler<'a> {
    /// Ranges keep their declared order; they must not overlap.
    pub fn new(
        scheme: &'a ShuangpinScheme,
        ranges: Vec<CompactRange>,
    ) -> Result<Self, CompileError> {
        for (i, first) in ranges.iter().enumerate() {
            if let Some(second) = ranges[i + 1..].iter().find(|r| first.overlaps(r)) {
                return Err(CompileError::OverlappingRanges {
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(Self { scheme, ranges })
    }

    pub fn ranges(&self) -> &[CompactRange] {
        &self.ranges
    }

    pub fn compile(&self, map: &CanonicalMap) -> Result<CompiledTables, CompileError> {
        let _span = debug_span!("compile_tables", codepoints = map.len()).entered();

        let readings = build_reading_index(map, self.scheme)?;
        if readings.len() > SENTINEL as usize {
            return Err(CompileError::IndexOverflow {
                readings: readings.len(),
                combinations: 0,
            });
        }
        let positions: HashMap<&str, u16> = readings
            .iter()
            .enumerate()
            .map(|(i, row)| (row.reading.as_str(), i as u16))
            .collect();

        let combinations = build_combinations(map, &positions);
        if readings.len() + combinations.len() > SENTINEL as usize {
            return Err(CompileError::IndexOverflow {
                readings: readings.len(),
                combinations: combinations.len(),
            });
        }
        let combination_ids: HashMap<&[u16], u16> = combinations
            .iter()
            .enumerate()
            .map(|(id, indices)| (indices.as_slice(), id as u16))
            .collect();
        info!(
            readings = readings.len(),
            combinations = combinations.len(),
            "built reading and combination indices"
        );

        let reading_count = readings.len() as u16;
        let tables = self
            .ranges
            .iter()
            .map(|&range| {
                let mut entries = vec![SENTINEL; range.len()];
                for (codepoint, list) in map.range(range.start, range.end) {
                    let slot = (codepoint.value() - range.start.value()) as usize;
                    entries[slot] = match list {
                        [only] => positions[only.as_str()],
                        _ => {
                            let key = sorted_indices(list, &positions);
                            reading_count + combination_ids[key.as_slice()]
                        }
                    };
                }
                let filled = entries.iter().filter(|&&v| v != SENTINEL).count();
                debug!(range = %range, slots = entries.len(), filled);
                CompactTable { range, entries }
            })
            .collect();

        let single_combinations = map
            .iter()
            .filter_map(|(_, list)| match list {
                [only] => Some(only.as_str()),
                _ => None,
            })
            .collect::<HashSet<_>>()
            .len();
        let summary = Summary {
            readings: readings.len(),
            single_combinations,
            multi_combinations: combinations.len(),
        };

        Ok(CompiledTables {
            readings,
            combinations,
            tables,
            summary,
        })
    }
}

/// Every distinct reading with its derived forms, sorted by
/// `(tone-numbered form, original string)`.
pub fn build_reading_index(
    map: &CanonicalMap,
    scheme: &ShuangpinScheme,
) -> Result<Vec<ReadingRow>, EncodeError> {
    let distinct: BTreeSet<&str> = map
        .iter()
        .flat_map(|(_, list)| list.iter().map(String::as_str))
        .collect();

    let mut rows = distinct
        .into_iter()
        .map(|reading| ReadingRow::derive(reading, scheme))
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by(|a, b| {
        a.numbered
            .cmp(&b.numbered)
            .then_with(|| a.reading.cmp(&b.reading))
    });
    Ok(rows)
}

/// Distinct sorted index lists of multi-reading codepoints, ordered by
/// `(length, indices)`. The position in the result is the combination ID.
fn build_combinations(map: &CanonicalMap, positions: &HashMap<&str, u16>) -> Vec<Vec<u16>> {
    let distinct: HashSet<Vec<u16>> = map
        .iter()
        .filter(|(_, list)| list.len() > 1)
        .map(|(_, list)| sorted_indices(list, positions))
        .collect();

    let mut combinations: Vec<Vec<u16>> = distinct.into_iter().collect();
    combinations.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    combinations
}

fn sorted_indices(list: &[String], positions: &HashMap<&str, u16>) -> Vec<u16> {
    let mut indices: Vec<u16> = list.iter().map(|r| positions[r.as_str()]).collect();
    indices.sort_unstable();
    indices
}
