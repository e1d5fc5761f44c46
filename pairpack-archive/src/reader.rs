//! Package reader.
//!
//! The whole package is checked and parsed before anything touches the
//! filesystem: a package that fails its checksum or whose fields run past
//! the checksum boundary yields no entries at all.

use crate::format::{DIRECTORY_TAG, FILE_TAG, FieldCursor, split_checksum};
use pairpack_bpe::{MultiPassExpander, PairDictionary};
use pairpack_core::error::{PairPackError, Result};
use pairpack_core::{ArchiveReader, Entry, EntryType};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Stored body of a file entry.
#[derive(Debug, Clone)]
struct FileBody {
    content: Range<usize>,
    /// Newest pass first, as stored.
    dictionaries: Vec<PairDictionary>,
}

/// Counts reported by [`PackageReader::extract_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Directories created (or already present).
    pub directories: usize,
    /// Files written.
    pub files: usize,
    /// Total expanded bytes written.
    pub bytes: u64,
}

/// Counts reported by [`PackageReader::verify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifySummary {
    /// Directory entries.
    pub directories: usize,
    /// File entries expanded.
    pub files: usize,
    /// Substituted bytes stored in the package.
    pub stored_bytes: u64,
    /// Bytes after expansion.
    pub expanded_bytes: u64,
}

/// Checksum-verifying package reader.
#[derive(Debug)]
pub struct PackageReader {
    data: Vec<u8>,
    entries: Vec<Entry>,
    bodies: Vec<Option<FileBody>>,
}

impl PackageReader {
    /// Verify and parse a complete package.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        let body_len = match split_checksum(&data) {
            Ok(body) => body.len(),
            Err(err) => {
                warn!(len = data.len(), "package rejected: {err}");
                return Err(err);
            }
        };

        let (entries, bodies) = parse_entries(&data[..body_len])?;
        debug!(entries = entries.len(), body = body_len, "package parsed");

        Ok(Self {
            data,
            entries,
            bodies,
        })
    }

    /// Read and parse a package file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(fs::read(path)?)
    }

    fn index_of(&self, entry: &Entry) -> Option<usize> {
        self.entries
            .binary_search_by_key(&entry.offset, |e| e.offset)
            .ok()
    }

    /// Expand every file in memory without writing anything.
    pub fn verify(&self) -> Result<VerifySummary> {
        let mut summary = VerifySummary::default();
        for entry in &self.entries {
            match entry.entry_type {
                EntryType::Directory => summary.directories += 1,
                EntryType::File => {
                    let content = self.extract(entry)?;
                    summary.files += 1;
                    summary.stored_bytes += entry.stored_size;
                    summary.expanded_bytes += content.len() as u64;
                }
            }
        }
        Ok(summary)
    }

    /// Materialize every entry under `dest`.
    pub fn extract_to(&self, dest: impl AsRef<Path>) -> Result<ExtractSummary> {
        self.extract_with(dest, |_| {})
    }

    /// Materialize every entry under `dest`, reporting each one once written.
    ///
    /// All names are validated before the first entry is created.
    pub fn extract_with<F>(&self, dest: impl AsRef<Path>, mut on_entry: F) -> Result<ExtractSummary>
    where
        F: FnMut(&Entry),
    {
        let dest = dest.as_ref();
        let targets = self
            .entries
            .iter()
            .map(|entry| target_path(dest, entry))
            .collect::<Result<Vec<_>>>()?;

        let mut summary = ExtractSummary::default();
        for (entry, target) in self.entries.iter().zip(&targets) {
            match entry.entry_type {
                EntryType::Directory => {
                    fs::create_dir_all(target)?;
                    summary.directories += 1;
                }
                EntryType::File => {
                    let content = self.extract(entry)?;
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(target, &content)?;
                    summary.files += 1;
                    summary.bytes += content.len() as u64;
                }
            }
            trace!(name = %entry.name, "extracted");
            on_entry(entry);
        }

        Ok(summary)
    }

    /// Raw package bytes, checksum included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl ArchiveReader for PackageReader {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn extract(&self, entry: &Entry) -> Result<Vec<u8>> {
        let body = self
            .index_of(entry)
            .and_then(|i| self.bodies[i].as_ref());
        match body {
            Some(body) => Ok(MultiPassExpander::expand_newest_first(
                &self.data[body.content.clone()],
                &body.dictionaries,
            )),
            None if entry.is_dir() => Ok(Vec::new()),
            None => Err(PairPackError::invalid_config(format!(
                "entry {} is not part of this package",
                entry.name
            ))),
        }
    }
}

fn target_path(dest: &Path, entry: &Entry) -> Result<PathBuf> {
    entry.validate_path()?;
    let relative = entry.sanitized_name();
    if relative.is_empty() && entry.is_file() {
        return Err(PairPackError::path_traversal(&entry.name));
    }
    Ok(dest.join(relative))
}

fn parse_entries(body: &[u8]) -> Result<(Vec<Entry>, Vec<Option<FileBody>>)> {
    let mut cursor = FieldCursor::new(body);
    let mut entries = Vec::new();
    let mut bodies = Vec::new();

    while !cursor.is_at_end() {
        let offset = cursor.position();
        let tag = cursor.read_u16("entry type")?;
        if tag != FILE_TAG && tag != DIRECTORY_TAG {
            return Err(PairPackError::unknown_entry_type(tag, offset));
        }

        let name_len = cursor.read_u16("name length")? as usize;
        let name = String::from_utf8(cursor.take(name_len, "name")?.to_vec())
            .map_err(|_| PairPackError::non_utf8_name(offset))?;

        if tag == DIRECTORY_TAG {
            trace!(%name, offset, "directory entry");
            entries.push(Entry::directory(name).with_offset(offset));
            bodies.push(None);
            continue;
        }

        let content_len = cursor.read_u32("content length")? as usize;
        let start = cursor.position() as usize;
        cursor.take(content_len, "content")?;
        let content = start..start + content_len;

        let dict_count = cursor.read_u8("dictionary count")?;
        let dictionaries = (0..dict_count)
            .map(|_| cursor.read_dictionary())
            .collect::<Result<Vec<_>>>()?;

        let size =
            MultiPassExpander::expanded_len_newest_first(&body[content.clone()], &dictionaries);
        trace!(%name, offset, stored = content_len, size, passes = dict_count, "file entry");

        entries.push(
            Entry::file(name, size)
                .with_stored_size(content_len as u64)
                .with_passes(dict_count)
                .with_offset(offset),
        );
        bodies.push(Some(FileBody {
            content,
            dictionaries,
        }));
    }

    Ok((entries, bodies))
}
