//! Package entries.
//!
//! Two shapes of entry exist. [`SourceEntry`] is what the traversal hands to a
//! package writer: a path plus, for files, the raw content. [`Entry`] is the
//! metadata a package reader reports for each record it parsed.

use std::path::{Component, Path};

/// Entry type (file or directory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryType {
    /// Regular file.
    #[default]
    File,
    /// Directory.
    Directory,
}

impl EntryType {
    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// An entry on its way into a package.
///
/// `path` is forward-slash separated and relative, rooted at `.` for tree
/// packs (`./docs/readme.txt`) or a bare file name for single-file packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEntry {
    /// A directory; no content block follows it in the package.
    Directory {
        /// Relative path of the directory.
        path: String,
    },
    /// A regular file and its full content.
    File {
        /// Relative path of the file.
        path: String,
        /// Raw file content.
        content: Vec<u8>,
    },
}

impl SourceEntry {
    /// Create a directory entry.
    pub fn directory(path: impl Into<String>) -> Self {
        Self::Directory { path: path.into() }
    }

    /// Create a file entry.
    pub fn file(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::File {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The entry path.
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path } | Self::File { path, .. } => path,
        }
    }

    /// The entry type.
    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Directory { .. } => EntryType::Directory,
            Self::File { .. } => EntryType::File,
        }
    }
}

/// An entry parsed out of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The name/path of the entry as stored in the package.
    pub name: String,
    /// The type of entry.
    pub entry_type: EntryType,
    /// Expanded (original) size in bytes.
    pub size: u64,
    /// Substituted content size as stored in the package.
    pub stored_size: u64,
    /// Number of compression passes (dictionaries) stored for the entry.
    pub passes: u8,
    /// Offset of the entry's type tag in the package.
    pub offset: u64,
}

impl Entry {
    /// Create a new file entry.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::File,
            size,
            stored_size: size,
            passes: 0,
            offset: 0,
        }
    }

    /// Create a new directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::Directory,
            size: 0,
            stored_size: 0,
            passes: 0,
            offset: 0,
        }
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.entry_type.is_file()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    /// Get the compression ratio (stored/expanded).
    pub fn compression_ratio(&self) -> f64 {
        if self.size == 0 {
            1.0
        } else {
            self.stored_size as f64 / self.size as f64
        }
    }

    /// Get the space savings as a percentage.
    pub fn space_savings(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }

    /// Builder method to set the stored size.
    pub fn with_stored_size(mut self, size: u64) -> Self {
        self.stored_size = size;
        self
    }

    /// Builder method to set the pass count.
    pub fn with_passes(mut self, passes: u8) -> Self {
        self.passes = passes;
        self
    }

    /// Builder method to set the package offset.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Validate the entry path for extraction.
    ///
    /// Returns an error if the path contains ".." components, is absolute,
    /// or contains null bytes.
    pub fn validate_path(&self) -> crate::error::Result<()> {
        use crate::error::PairPackError;

        let path = Path::new(&self.name);

        if path.is_absolute() || self.name.starts_with('/') {
            return Err(PairPackError::path_traversal(&self.name));
        }

        for component in path.components() {
            match component {
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(PairPackError::path_traversal(&self.name));
                }
                Component::Normal(s) => {
                    if s.to_string_lossy().contains('\0') {
                        return Err(PairPackError::path_traversal(&self.name));
                    }
                }
                Component::CurDir => {}
            }
        }

        Ok(())
    }

    /// Get the entry path relative to the extraction root.
    ///
    /// Drops `.` components (tree packs root every name at `./`) as well as
    /// `..` and absolute prefixes.
    pub fn sanitized_name(&self) -> String {
        let mut result = String::new();

        for component in Path::new(&self.name).components() {
            if let Component::Normal(s) = component {
                if !result.is_empty() {
                    result.push('/');
                }
                result.push_str(&s.to_string_lossy().replace('\0', "_"));
            }
        }

        result
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let type_char = if self.is_dir() { 'd' } else { '-' };
        write!(
            f,
            "{}{:>10} {:>10} {:>6.1}% {}",
            type_char,
            self.size,
            self.stored_size,
            self.space_savings(),
            self.name
        )
    }
}
