//! Extract command implementation.

use crate::utils::create_progress_bar;
use pairpack_archive::PackageReader;
use pairpack_core::ArchiveReader;
use std::path::Path;

pub fn cmd_extract(
    package: &Path,
    output: &Path,
    verbose: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = PackageReader::open(package)?;

    let pb = create_progress_bar(reader.entries().len() as u64, progress);
    let summary = reader.extract_with(output, |entry| {
        pb.inc(1);
        if verbose {
            pb.println(format!("  {}", entry.sanitized_name()));
        }
    })?;
    pb.finish_and_clear();

    println!(
        "Extracted {} files and {} directories ({} bytes) to {}",
        summary.files,
        summary.directories,
        summary.bytes,
        output.display()
    );
    Ok(())
}
