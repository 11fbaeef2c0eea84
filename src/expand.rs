//! Recursive glob expansion over a project tree
//!
//! [`expand`] walks a directory below a root, skipping ignorable entries,
//! and returns the files whose root-relative path satisfies an
//! include/exclude pattern set. Patterns starting with `!` exclude.
//!
//! Traversal problems never surface as errors: an unreadable directory or a
//! failed stat is reported through `tracing` and simply contributes no files.

use globset::{GlobBuilder, GlobMatcher};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Dependency cache directory skipped by the default prefilter
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Predicate over directory entry names; `true` means skip the entry
pub type Prefilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Default prefilter: hidden entries and the dependency cache
pub fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name == DEPENDENCY_CACHE_DIR
}

/// Ordered list of glob patterns; a leading `!` marks an exclusion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patterns(Vec<String>);

impl Patterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Patterns(patterns.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns(vec![pattern.to_string()])
    }
}

impl From<String> for Patterns {
    fn from(pattern: String) -> Self {
        Patterns(vec![pattern])
    }
}

impl From<Vec<String>> for Patterns {
    fn from(patterns: Vec<String>) -> Self {
        Patterns(patterns)
    }
}

impl From<&[String]> for Patterns {
    fn from(patterns: &[String]) -> Self {
        Patterns(patterns.to_vec())
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(patterns: Vec<&str>) -> Self {
        Patterns::new(patterns)
    }
}

impl From<&[&str]> for Patterns {
    fn from(patterns: &[&str]) -> Self {
        Patterns::new(patterns.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Patterns {
    fn from(patterns: [&str; N]) -> Self {
        Patterns::new(patterns)
    }
}

/// Options for a single directory walk
///
/// Recursion clones the options and overrides `dir`, so a caller's copy is
/// never modified.
#[derive(Clone)]
pub struct ExpandOptions {
    /// Directory to list, relative to the root
    pub dir: PathBuf,

    /// Entries whose name satisfies this are skipped before matching
    prefilter: Prefilter,
}

impl ExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting directory
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Replace the entry prefilter
    pub fn with_prefilter<F>(mut self, prefilter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.prefilter = Arc::new(prefilter);
        self
    }

    /// Whether an entry with this name is skipped
    pub fn skips(&self, name: &str) -> bool {
        (self.prefilter)(name)
    }
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            dir: PathBuf::from("."),
            prefilter: Arc::new(is_ignored),
        }
    }
}

impl fmt::Debug for ExpandOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandOptions")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

// A bare directory is shorthand for `ExpandOptions { dir, ..default }`
impl From<&str> for ExpandOptions {
    fn from(dir: &str) -> Self {
        ExpandOptions::default().with_dir(dir)
    }
}

impl From<String> for ExpandOptions {
    fn from(dir: String) -> Self {
        ExpandOptions::default().with_dir(dir)
    }
}

impl From<&Path> for ExpandOptions {
    fn from(dir: &Path) -> Self {
        ExpandOptions::default().with_dir(dir)
    }
}

impl From<PathBuf> for ExpandOptions {
    fn from(dir: PathBuf) -> Self {
        ExpandOptions::default().with_dir(dir)
    }
}

/// A single compiled glob pattern
///
/// Matching is case-insensitive and `*` never crosses `/`. A pattern without
/// a `/` is tested against the base name only, so `*.txt` matches
/// `docs/readme.txt`.
#[derive(Debug, Clone)]
pub struct Matcher {
    glob: GlobMatcher,
    base_name: bool,
}

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        Ok(Matcher {
            glob,
            base_name: !pattern.contains('/'),
        })
    }

    /// Test a `/`-separated path relative to the expansion root
    pub fn is_match(&self, relative: &str) -> bool {
        if self.base_name {
            let name = relative.rsplit('/').next().unwrap_or(relative);
            self.glob.is_match(name)
        } else {
            self.glob.is_match(relative)
        }
    }
}

/// Patterns split by polarity and compiled once per expansion
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    affirmative: Vec<Matcher>,
    negative: Vec<Matcher>,
}

impl PatternSet {
    /// Compile a pattern list, logging and dropping patterns that fail to compile
    pub fn compile(patterns: &Patterns) -> Self {
        let mut set = PatternSet::default();

        for pattern in patterns.iter() {
            let (target, glob) = match pattern.strip_prefix('!') {
                Some(stripped) => (&mut set.negative, stripped),
                None => (&mut set.affirmative, pattern),
            };

            match Matcher::new(glob) {
                Ok(matcher) => target.push(matcher),
                Err(e) => warn!(pattern, error = %e, "ignoring invalid glob pattern"),
            }
        }

        set
    }

    /// A path is selected when some inclusion matches and no exclusion does
    pub fn matches(&self, relative: &str) -> bool {
        self.affirmative.iter().any(|m| m.is_match(relative))
            && self.negative.iter().all(|m| !m.is_match(relative))
    }
}

/// Find all files below `root` matching `patterns`
///
/// Returns `root`-joined paths in directory-listing order. Directories are
/// never returned. A missing or unreadable starting directory yields an
/// empty list.
pub fn expand<P, O>(root: impl AsRef<Path>, patterns: P, options: O) -> Vec<PathBuf>
where
    P: Into<Patterns>,
    O: Into<ExpandOptions>,
{
    let root = root.as_ref();
    let set = PatternSet::compile(&patterns.into());

    let mut matching = Vec::new();
    walk(root, &set, &options.into(), &mut matching);
    matching
}

fn walk(root: &Path, set: &PatternSet, options: &ExpandOptions, matching: &mut Vec<PathBuf>) {
    let full_dir = root.join(&options.dir);
    let entries = match fs::read_dir(&full_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                dir = %full_dir.display(),
                error = %e,
                "unable to read directory - does it exist?"
            );
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %full_dir.display(), error = %e, "unable to read directory entry");
                continue;
            }
        };

        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if options.skips(&name) {
            debug!(dir = %full_dir.display(), entry = %name, "skipping ignored entry");
            continue;
        }

        let relative = relative_path(&options.dir, &file_name);
        let full = root.join(&relative);

        // Follows symlinks, so linked directories are descended into
        let metadata = match fs::metadata(&full) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %full.display(), error = %e, "unable to expand matches for path");
                continue;
            }
        };

        if metadata.is_dir() {
            let child = options.clone().with_dir(&relative);
            walk(root, set, &child, matching);
        } else if set.matches(&to_slash(&relative)) {
            matching.push(full);
        }
    }
}

/// Join an entry name onto a root-relative directory, dropping `.` components
fn relative_path(dir: &Path, name: impl AsRef<Path>) -> PathBuf {
    dir.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect::<PathBuf>()
        .join(name)
}

/// Render a relative path with `/` separators for matching
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
