//! Source tree traversal and exclusion rules.
//!
//! A directory source is walked depth first with children sorted by file
//! name. Every entry is named relative to the source root and prefixed with
//! `./`; the root itself is not emitted. A file source yields a single entry
//! named by its basename.

use glob::{MatchOptions, Pattern};
use pairpack_core::SourceEntry;
use pairpack_core::error::{PairPackError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Rule {
    /// `./*name`: matches the basename against `name` anywhere in the tree.
    Basename(Pattern),
    /// Anything else: matches the full `./`-rooted path.
    Path(Pattern),
}

/// Paths left out of a package.
///
/// Rules are written as a comma separated list, e.g. `"build, *_notes, ./docs/old"`.
/// A rule without a leading `./` gets one. `./*name` excludes every entry
/// whose basename is `name`, anywhere in the tree: the leading `*` marks the
/// rule as a basename rule and is not a wildcard, so `*.tmp` only excludes
/// entries named exactly `.tmp`. Any other rule matches the whole relative
/// path. Shell wildcards work inside both forms, so a wildcard basename rule
/// takes a second star: `**.tmp` excludes every entry whose name ends in
/// `.tmp`. An excluded directory is not descended into.
#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    rules: Vec<Rule>,
    skip: Vec<PathBuf>,
}

impl ExcludeRules {
    /// No exclusions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated rule list. Empty items are ignored.
    pub fn parse(list: &str) -> Result<Self> {
        let mut rules = Self::new();
        for item in list.split(',') {
            rules.add(item)?;
        }
        Ok(rules)
    }

    /// Add a single rule.
    pub fn add(&mut self, rule: &str) -> Result<()> {
        let rule = rule.trim();
        if rule.is_empty() || rule == "./" {
            return Ok(());
        }

        let normalized = if rule.starts_with("./") {
            rule.to_string()
        } else {
            format!("./{rule}")
        };

        let compile = |text: &str| {
            Pattern::new(text).map_err(|e| {
                PairPackError::invalid_config(format!("bad exclude rule '{rule}': {e}"))
            })
        };

        let parsed = match normalized.strip_prefix("./*") {
            Some(name) if !name.is_empty() => Rule::Basename(compile(name)?),
            _ => Rule::Path(compile(&normalized)?),
        };
        self.rules.push(parsed);
        Ok(())
    }

    /// Also skip this exact filesystem path (e.g. the package being written
    /// into the tree it is packing).
    pub fn with_skip_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.skip
            .push(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check a `./`-rooted relative path and its basename against the rules.
    pub fn is_excluded(&self, relative: &str, basename: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Basename(p) => p.matches_with(basename, MATCH_OPTIONS),
            Rule::Path(p) => p.matches_with(relative, MATCH_OPTIONS),
        })
    }

    fn is_skipped(&self, path: &Path) -> bool {
        !self.skip.is_empty()
            && fs::canonicalize(path).is_ok_and(|canonical| self.skip.contains(&canonical))
    }
}

fn non_utf8(path: &Path) -> PairPackError {
    PairPackError::invalid_config(format!(
        "entry name is not valid UTF-8: {}",
        path.display()
    ))
}

/// Package name of `path`: `./` followed by its components under `root`.
/// Names that are not valid UTF-8 are rejected rather than altered, so two
/// distinct entries can never collapse into one name.
fn relative_name(root: &Path, path: &Path) -> Result<String> {
    let rest = path.strip_prefix(root).map_err(|_| {
        PairPackError::invalid_config(format!(
            "{} is outside {}",
            path.display(),
            root.display()
        ))
    })?;
    let mut name = String::from(".");
    for component in rest.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| non_utf8(path))?;
        name.push('/');
        name.push_str(part);
    }
    Ok(name)
}

fn keep(root: &Path, rules: &ExcludeRules, entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    // Only used for matching; unrepresentable names fail later in the walk.
    let Ok(rest) = entry.path().strip_prefix(root) else {
        return true;
    };
    let mut relative = String::from(".");
    for component in rest.components() {
        relative.push('/');
        relative.push_str(&component.as_os_str().to_string_lossy());
    }
    let basename = entry.file_name().to_string_lossy();
    if rules.is_excluded(&relative, &basename) || rules.is_skipped(entry.path()) {
        debug!(path = %relative, "excluded");
        return false;
    }
    true
}

/// Walk `source` and hand each entry to `visit` in package order.
///
/// File contents are read one entry at a time.
pub fn walk_source<F>(source: impl AsRef<Path>, rules: &ExcludeRules, mut visit: F) -> Result<()>
where
    F: FnMut(SourceEntry) -> Result<()>,
{
    let source = source.as_ref();
    let metadata = fs::metadata(source).map_err(|e| {
        PairPackError::invalid_config(format!("cannot read source {}: {e}", source.display()))
    })?;

    if metadata.is_file() {
        let name = source
            .file_name()
            .ok_or_else(|| {
                PairPackError::invalid_config(format!(
                    "source {} has no file name",
                    source.display()
                ))
            })?
            .to_str()
            .ok_or_else(|| non_utf8(source))?
            .to_string();
        return visit(SourceEntry::file(name, fs::read(source)?));
    }

    if !metadata.is_dir() {
        return Err(PairPackError::invalid_config(format!(
            "source {} is neither a file nor a directory",
            source.display()
        )));
    }

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| keep(source, rules, e));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let name = relative_name(source, entry.path())?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            visit(SourceEntry::directory(name))?;
        } else if file_type.is_file() {
            visit(SourceEntry::file(name, fs::read(entry.path())?))?;
        } else if file_type.is_symlink() {
            // Linked files are packed by content; linked directories are not followed.
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => {
                    visit(SourceEntry::file(name, fs::read(entry.path())?))?;
                }
                Ok(_) => warn!(path = %name, "skipping symlinked directory"),
                Err(e) => warn!(path = %name, "skipping broken symlink: {e}"),
            }
        } else {
            warn!(path = %name, "skipping special file");
        }
    }

    Ok(())
}

/// Collect every entry of `source` in package order.
pub fn collect_entries(source: impl AsRef<Path>, rules: &ExcludeRules) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();
    walk_source(source, rules, |entry| {
        entries.push(entry);
        Ok(())
    })?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/one.txt"), b"1").unwrap();
        fs::write(root.join("b/inner/two.txt"), b"22").unwrap();
        fs::write(root.join("b/notes"), b"n").unwrap();
        fs::write(root.join("top.txt"), b"top").unwrap();
        dir
    }

    fn names(entries: &[SourceEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path()).collect()
    }

    #[test]
    fn test_depth_first_sorted() {
        let dir = tree();
        let entries = collect_entries(dir.path(), &ExcludeRules::new()).unwrap();
        assert_eq!(
            names(&entries),
            vec![
                "./a",
                "./a/one.txt",
                "./b",
                "./b/inner",
                "./b/inner/two.txt",
                "./b/notes",
                "./top.txt",
            ]
        );
        assert!(entries[0].entry_type().is_dir());
        assert_eq!(entries[4], SourceEntry::file("./b/inner/two.txt", b"22".to_vec()));
    }

    #[test]
    fn test_single_file_uses_basename() {
        let dir = tree();
        let entries = collect_entries(dir.path().join("a/one.txt"), &ExcludeRules::new()).unwrap();
        assert_eq!(entries, vec![SourceEntry::file("one.txt", b"1".to_vec())]);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_entries(dir.path().join("nope"), &ExcludeRules::new()).unwrap_err();
        assert!(matches!(err, PairPackError::InvalidConfig { .. }));
    }

    #[test]
    fn test_parse_normalizes_prefix() {
        let rules = ExcludeRules::parse(" b , ./top.txt,, *notes").unwrap();
        assert_eq!(rules.len(), 3);
        assert!(rules.is_excluded("./b", "b"));
        assert!(rules.is_excluded("./top.txt", "top.txt"));
        assert!(rules.is_excluded("./deep/notes", "notes"));
        assert!(!rules.is_excluded("./a/b", "b"));
    }

    #[test]
    fn test_path_wildcard_does_not_cross_directories() {
        let rules = ExcludeRules::parse("./b/*").unwrap();
        assert!(rules.is_excluded("./b/notes", "notes"));
        assert!(!rules.is_excluded("./b/inner/two.txt", "two.txt"));
    }

    #[test]
    fn test_excluded_directory_not_descended() {
        let dir = tree();
        let rules = ExcludeRules::parse("b/inner, *one.txt").unwrap();
        let entries = collect_entries(dir.path(), &rules).unwrap();
        assert_eq!(names(&entries), vec!["./a", "./b", "./b/notes", "./top.txt"]);
    }

    #[test]
    fn test_star_rule_is_exact_basename() {
        let rules = ExcludeRules::parse("*.tmp").unwrap();
        assert!(rules.is_excluded("./a/.tmp", ".tmp"));
        assert!(!rules.is_excluded("./a/x.tmp", "x.tmp"));

        let rules = ExcludeRules::parse("**.tmp").unwrap();
        assert!(rules.is_excluded("./a/x.tmp", "x.tmp"));
        assert!(rules.is_excluded("./.tmp", ".tmp"));
        assert!(!rules.is_excluded("./a/x.tmpl", "x.tmpl"));
    }

    #[test]
    fn test_double_star_rule_in_walk() {
        let dir = tree();
        fs::write(dir.path().join("a/scratch.tmp"), b"t").unwrap();
        fs::write(dir.path().join("b/.tmp"), b"t").unwrap();

        let exact = collect_entries(dir.path(), &ExcludeRules::parse("*.tmp").unwrap()).unwrap();
        assert!(names(&exact).contains(&"./a/scratch.tmp"));
        assert!(!names(&exact).contains(&"./b/.tmp"));

        let wild = collect_entries(dir.path(), &ExcludeRules::parse("**.tmp").unwrap()).unwrap();
        assert!(!names(&wild).contains(&"./a/scratch.tmp"));
        assert!(!names(&wild).contains(&"./b/.tmp"));
        assert_eq!(wild.len(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_single_file_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"bad\xff"));
        fs::write(&path, b"x").unwrap();
        let err = collect_entries(&path, &ExcludeRules::new()).unwrap_err();
        assert!(matches!(err, PairPackError::InvalidConfig { .. }));
    }

    #[test]
    fn test_empty_list_excludes_nothing() {
        let rules = ExcludeRules::parse("").unwrap();
        assert!(rules.is_empty());
        assert!(!rules.is_excluded("./x", "x"));
    }

    #[test]
    fn test_skip_path() {
        let dir = tree();
        let rules = ExcludeRules::new().with_skip_path(dir.path().join("top.txt"));
        let entries = collect_entries(dir.path(), &rules).unwrap();
        assert!(!names(&entries).contains(&"./top.txt"));
        assert_eq!(entries.len(), 6);
    }

    #[test]
    fn test_walk_stops_on_visitor_error() {
        let dir = tree();
        let mut seen = 0;
        let err = walk_source(dir.path(), &ExcludeRules::new(), |_| {
            seen += 1;
            Err(PairPackError::invalid_config("stop"))
        })
        .unwrap_err();
        assert!(matches!(err, PairPackError::InvalidConfig { .. }));
        assert_eq!(seen, 1);
    }
}
