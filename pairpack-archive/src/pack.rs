//! Filesystem-level pack and unpack.

use crate::reader::{ExtractSummary, PackageReader};
use crate::walk::{ExcludeRules, walk_source};
use crate::writer::PackageWriter;
use pairpack_core::error::Result;
use pairpack_core::{ArchiveWriter, CompressionLevel, SourceEntry};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extension given to default output names.
pub const PACKAGE_EXTENSION: &str = "pkg";

/// Options for [`pack`] and [`pack_with`].
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Maximum passes per file.
    pub level: CompressionLevel,
    /// Paths left out of the package.
    pub excludes: ExcludeRules,
}

impl PackOptions {
    /// Options with the given level and no exclusions.
    pub fn new(level: CompressionLevel) -> Self {
        Self {
            level,
            excludes: ExcludeRules::new(),
        }
    }

    /// Set the exclusion rules.
    pub fn with_excludes(mut self, excludes: ExcludeRules) -> Self {
        self.excludes = excludes;
        self
    }
}

/// Counts reported after packing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Directory entries written.
    pub directories: usize,
    /// File entries written.
    pub files: usize,
    /// Total size of the packed files.
    pub input_bytes: u64,
    /// Package size, checksum included.
    pub package_bytes: u64,
}

impl PackSummary {
    pub(crate) fn record(&mut self, entry: &SourceEntry) {
        match entry {
            SourceEntry::Directory { .. } => self.directories += 1,
            SourceEntry::File { content, .. } => {
                self.files += 1;
                self.input_bytes += content.len() as u64;
            }
        }
    }

    /// Package size relative to input size (1.0 when nothing was packed).
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            1.0
        } else {
            self.package_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Default package path for `source`: its basename with a `.pkg` extension,
/// in the current directory.
pub fn default_output_path(source: impl AsRef<Path>) -> PathBuf {
    let source = source.as_ref();
    let base = source
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_os_string()))
        .or_else(|| source.file_name().map(|n| n.to_os_string()));

    match base {
        Some(base) => {
            let mut name = base;
            name.push(".");
            name.push(PACKAGE_EXTENSION);
            PathBuf::from(name)
        }
        None => PathBuf::from(format!("package.{PACKAGE_EXTENSION}")),
    }
}

/// Pack `source` into `writer`, calling `observe` after each entry is written.
pub fn pack_with<W, F>(
    source: impl AsRef<Path>,
    writer: W,
    options: &PackOptions,
    mut observe: F,
) -> Result<PackSummary>
where
    W: Write,
    F: FnMut(&SourceEntry),
{
    let mut package = PackageWriter::with_level(writer, options.level);
    let mut summary = PackSummary::default();

    walk_source(source, &options.excludes, |entry| {
        package.add_entry(&entry)?;
        summary.record(&entry);
        observe(&entry);
        Ok(())
    })?;

    package.finish()?;
    summary.package_bytes = package.bytes_written() + crate::format::CHECKSUM_LEN as u64;
    Ok(summary)
}

/// Pack `source` into a package file at `output`, replacing any existing file.
///
/// When `output` lies inside `source` it is left out of the walk. A failed
/// pack removes the partial output.
pub fn pack(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &PackOptions,
) -> Result<PackSummary> {
    pack_observed(source, output, options, |_| {})
}

/// [`pack`] with a per-entry callback.
pub fn pack_observed<F>(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &PackOptions,
    observe: F,
) -> Result<PackSummary>
where
    F: FnMut(&SourceEntry),
{
    let source = source.as_ref();
    let output = output.as_ref();

    let file = File::create(output)?;
    let options = PackOptions {
        level: options.level,
        excludes: options.excludes.clone().with_skip_path(output),
    };

    let result = pack_with(source, BufWriter::new(file), &options, observe);
    match &result {
        Ok(summary) => info!(
            source = %source.display(),
            output = %output.display(),
            files = summary.files,
            directories = summary.directories,
            bytes = summary.package_bytes,
            "package created"
        ),
        Err(err) => {
            warn!(output = %output.display(), "pack failed: {err}");
            if let Err(e) = fs::remove_file(output) {
                warn!(output = %output.display(), "could not remove partial package: {e}");
            }
        }
    }
    result
}

/// Extract the package file at `package` under `dest`.
pub fn unpack(package: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<ExtractSummary> {
    let reader = PackageReader::open(package)?;
    let summary = reader.extract_to(&dest)?;
    info!(
        dest = %dest.as_ref().display(),
        files = summary.files,
        directories = summary.directories,
        "package extracted"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(default_output_path("/no/such/dir/project"), PathBuf::from("project.pkg"));
        assert_eq!(default_output_path("notes.txt"), PathBuf::from("notes.txt.pkg"));
        assert_eq!(default_output_path("/"), PathBuf::from("package.pkg"));
    }

    #[test]
    fn test_pack_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/data"), vec![7u8; 100]).unwrap();

        let mut seen = Vec::new();
        let mut out = Vec::new();
        let summary = pack_with(dir.path(), &mut out, &PackOptions::default(), |e| {
            seen.push(e.path().to_string())
        })
        .unwrap();

        assert_eq!(seen, vec!["./sub", "./sub/data"]);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.files, 1);
        assert_eq!(summary.input_bytes, 100);
        assert_eq!(summary.package_bytes, out.len() as u64);
        assert!(summary.ratio() < 1.0);
    }

    #[test]
    fn test_pack_inside_source_skips_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"aaaa").unwrap();
        let output = dir.path().join("self.pkg");

        let summary = pack(dir.path(), &output, &PackOptions::default()).unwrap();
        assert_eq!(summary.files, 1);

        let reader = PackageReader::open(&output).unwrap();
        let names: Vec<_> = pairpack_core::ArchiveReader::entries(&reader)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["./a.txt"]);
    }

    #[test]
    fn test_failed_pack_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pkg");
        assert!(pack(dir.path().join("missing"), &output, &PackOptions::default()).is_err());
        assert!(!output.exists());
    }
}
