//! Create command implementation.

use crate::utils::{create_spinner, savings};
use pairpack_archive::{
    ExcludeRules, PackOptions, PackSummary, default_output_path, pack_observed, pack_parallel,
};
use pairpack_core::CompressionLevel;
use std::path::Path;

/// Build pack options from command-line values.
fn pack_options(level: i64, exclude: &[String]) -> Result<PackOptions, Box<dyn std::error::Error>> {
    let level = CompressionLevel::try_from(level)?;
    let mut excludes = ExcludeRules::new();
    for list in exclude {
        for rule in list.split(',') {
            excludes.add(rule)?;
        }
    }
    Ok(PackOptions::new(level).with_excludes(excludes))
}

pub fn cmd_create(
    source: &Path,
    output: Option<&Path>,
    level: i64,
    exclude: &[String],
    parallel: bool,
    verbose: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = pack_options(level, exclude)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(source));

    let pb = create_spinner(progress);
    let summary: PackSummary = if parallel {
        pb.set_message(format!("compressing {}", source.display()));
        pack_parallel(source, &output, &options)?
    } else {
        pack_observed(source, &output, &options, |entry| {
            pb.inc(1);
            pb.set_message(entry.path().to_string());
            if verbose {
                pb.println(entry.path());
            }
        })?
    };
    pb.finish_and_clear();

    println!(
        "Created {}: {} files, {} directories, {} -> {} bytes ({:.1}% saved)",
        output.display(),
        summary.files,
        summary.directories,
        summary.input_bytes,
        summary.package_bytes,
        savings(summary.input_bytes, summary.package_bytes)
    );
    Ok(())
}
