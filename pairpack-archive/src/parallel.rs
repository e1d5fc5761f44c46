//! Multi-threaded packing.
//!
//! Each file is compressed independently, so entries are encoded on the
//! rayon pool and then written in traversal order. The output is
//! byte-identical to sequential packing.

use crate::format::CHECKSUM_LEN;
use crate::pack::{PackOptions, PackSummary};
use crate::walk::collect_entries;
use crate::writer::{PackageWriter, encode_entry};
use pairpack_core::error::Result;
use pairpack_core::{CompressionLevel, SourceEntry};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Serialize `entries` concurrently, preserving their order.
pub fn encode_entries_parallel(
    entries: &[SourceEntry],
    level: CompressionLevel,
) -> Result<Vec<Vec<u8>>> {
    entries
        .par_iter()
        .map(|entry| encode_entry(entry, level))
        .collect()
}

/// Compress `entries` concurrently and append them to `writer` in order.
///
/// The package is not finished; call `finish` once all batches are written.
pub fn pack_entries_parallel<W: Write>(
    entries: &[SourceEntry],
    writer: &mut PackageWriter<W>,
    level: CompressionLevel,
) -> Result<()> {
    let records = encode_entries_parallel(entries, level)?;
    debug!(entries = records.len(), "batch encoded");
    for record in &records {
        writer.write_encoded(record)?;
    }
    Ok(())
}

/// Parallel counterpart of [`crate::pack`]. The whole tree is read into
/// memory before compression starts.
pub fn pack_parallel(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &PackOptions,
) -> Result<PackSummary> {
    let output = output.as_ref();
    let file = File::create(output)?;
    let excludes = options.excludes.clone().with_skip_path(output);

    let result = collect_entries(source, &excludes)
        .and_then(|entries| write_all(&entries, BufWriter::new(file), options.level));
    if let Err(err) = &result {
        warn!(output = %output.display(), "pack failed: {err}");
        if let Err(e) = fs::remove_file(output) {
            warn!(output = %output.display(), "could not remove partial package: {e}");
        }
    }
    result
}

fn write_all<W: Write>(
    entries: &[SourceEntry],
    sink: W,
    level: CompressionLevel,
) -> Result<PackSummary> {
    let mut writer = PackageWriter::with_level(sink, level);
    pack_entries_parallel(entries, &mut writer, level)?;

    let mut summary = PackSummary::default();
    for entry in entries {
        summary.record(entry);
    }
    summary.package_bytes = writer.bytes_written() + CHECKSUM_LEN as u64;
    writer.into_inner()?;
    Ok(summary)
}
