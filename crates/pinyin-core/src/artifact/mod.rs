//! Serialized forms of a build.
//!
//! `text` renders the human-readable files; `CompactArtifact` is the binary
//! PYCT file consumers load.
//!
//! PYCT layout (little-endian):
//!
//! ```text
//! 0..4    magic "PYCT"
//! 4       version
//! 5..8    reserved
//! 8..12   body length
//! 12..16  CRC-32 of body
//! 16..    bincode body
//! ```

pub mod text;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use serde::{Deserialize, Serialize};

use crate::codepoint::Codepoint;
use crate::compile::{CompactTable, CompiledTables, Entry, ReadingRow};

pub const MAGIC: &[u8; 4] = b"PYCT";
pub const VERSION: u8 = 1;
const HEADER_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected PYCT)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch: header {expected:#010x}, body {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}

/// Reading table, combination table and range tables of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactArtifact {
    pub readings: Vec<ReadingRow>,
    pub combinations: Vec<Vec<u16>>,
    pub tables: Vec<CompactTable>,
}

impl From<&CompiledTables> for CompactArtifact {
    fn from(compiled: &CompiledTables) -> Self {
        Self {
            readings: compiled.readings.clone(),
            combinations: compiled.combinations.clone(),
            tables: compiled.tables.clone(),
        }
    }
}

impl CompactArtifact {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let body = bincode::serialize(self).map_err(ArtifactError::Serialize)?;
        let body_len: u32 = body.len().try_into().map_err(|_| {
            ArtifactError::Serialize(Box::new(bincode::ErrorKind::SizeLimit))
        })?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ArtifactError> {
        if data.len() < 5 {
            return Err(ArtifactError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(ArtifactError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(ArtifactError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(ArtifactError::InvalidHeader);
        }

        let body_len = read_u32(&data[8..12]) as usize;
        let expected = read_u32(&data[12..16]);
        let body = data
            .get(HEADER_SIZE..HEADER_SIZE + body_len)
            .ok_or(ArtifactError::InvalidHeader)?;

        let actual = crc32fast::hash(body);
        if actual != expected {
            return Err(ArtifactError::ChecksumMismatch { expected, actual });
        }
        bincode::deserialize(body).map_err(ArtifactError::Deserialize)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        write_atomic(path, &bytes)?;
        Ok(())
    }

    /// Open a PYCT file through a read-only memory map.
    pub fn open(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is dropped
        // before this function returns; `from_bytes` copies what it keeps.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    /// Decode the readings recorded for `codepoint`.
    ///
    /// `None` when the codepoint lies outside every range or holds the
    /// sentinel. Combination readings come back in index order.
    pub fn readings_of(&self, codepoint: Codepoint) -> Option<Vec<&str>> {
        let raw = self.tables.iter().find_map(|t| t.get(codepoint))?;
        let reading = |idx: u16| self.readings.get(idx as usize).map(|r| r.reading.as_str());
        match Entry::decode(raw, self.readings.len()) {
            Entry::Missing => None,
            Entry::Reading(idx) => reading(idx).map(|r| vec![r]),
            Entry::Combination(id) => self
                .combinations
                .get(id as usize)?
                .iter()
                .map(|&idx| reading(idx))
                .collect(),
        }
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    u32::from_le_bytes(word)
}

/// `path` with `.tmp` appended, so `a.txt` and `a.bin` never share one.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `bytes` to a sibling `.tmp` file, then rename it over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), io::Error> {
    write_all_atomic([(path, bytes)])
}

/// Stage every file as a `.tmp` sibling, then rename them all.
///
/// A failure while staging removes the staged files and leaves every
/// target untouched. Only a failing rename can leave a mixed set behind.
pub fn write_all_atomic<'a, P>(
    files: impl IntoIterator<Item = (P, &'a [u8])>,
) -> Result<(), io::Error>
where
    P: AsRef<Path>,
{
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
    for (path, bytes) in files {
        let path = path.as_ref();
        let tmp = tmp_path(path);
        let result = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::write(&tmp, bytes));
        if let Err(e) = result {
            for (tmp, _) in &staged {
                let _ = fs::remove_file(tmp);
            }
            return Err(e);
        }
        staged.push((tmp, path.to_path_buf()));
    }
    for (tmp, path) in &staged {
        fs::rename(tmp, path)?;
    }
    Ok(())
}
