//! List command implementation.

use crate::utils::print_entries;
use pairpack_archive::PackageReader;
use pairpack_core::{ArchiveReader, Entry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON serializable entry data for package listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    name: String,
    is_dir: bool,
    size: u64,
    stored_size: u64,
    passes: u8,
    ratio: f64,
    offset: u64,
}

impl EntryJson {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            is_dir: entry.is_dir(),
            size: entry.size,
            stored_size: entry.stored_size,
            passes: entry.passes,
            ratio: entry.compression_ratio(),
            offset: entry.offset,
        }
    }
}

/// JSON output for package listing.
#[derive(Debug, Serialize, Deserialize)]
struct PackageListJson {
    package: String,
    package_size: u64,
    entries: Vec<EntryJson>,
}

fn list_json(package: &Path, reader: &PackageReader) -> PackageListJson {
    PackageListJson {
        package: package.display().to_string(),
        package_size: reader.as_bytes().len() as u64,
        entries: reader.entries().iter().map(EntryJson::from_entry).collect(),
    }
}

pub fn cmd_list(
    package: &Path,
    verbose: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = PackageReader::open(package)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list_json(package, &reader))?);
        return Ok(());
    }

    println!("Package: {}", package.display());
    println!();
    print_entries(reader.entries(), verbose);
    Ok(())
}
