// src/watch/patterns.rs

use std::fmt;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::Result;
use crate::watch::target::{TargetKind, WatchTarget};

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// A [`WatchTarget`] whose patterns have been anchored at a project root and
/// compiled.
///
/// Matching is done on absolute paths, which is what the OS watcher reports.
#[derive(Clone)]
pub struct CompiledTarget {
    kind: TargetKind,
    set: GlobSet,
    bases: Vec<PathBuf>,
}

impl fmt::Debug for CompiledTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTarget")
            .field("kind", &self.kind)
            .field("bases", &self.bases)
            .finish_non_exhaustive()
    }
}

impl CompiledTarget {
    /// Compile `target` with relative patterns resolved against `root`.
    pub fn compile(root: &Path, target: &WatchTarget) -> Result<Self> {
        let anchored: Vec<PathBuf> = target
            .patterns()
            .iter()
            .map(|p| anchor_pattern(root, p))
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &anchored {
            builder.add(Glob::new(&pattern.to_string_lossy().replace('\\', "/"))?);
        }

        let mut bases: Vec<PathBuf> = Vec::new();
        for pattern in target.patterns() {
            let base = watch_base(root, pattern);
            if !bases.iter().any(|b| base.starts_with(b)) {
                bases.retain(|b| !b.starts_with(&base));
                bases.push(base);
            }
        }

        Ok(Self {
            kind: target.kind(),
            set: builder.build()?,
            bases,
        })
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Directories that must be watched (recursively) to see every file the
    /// patterns can match.
    pub fn bases(&self) -> &[PathBuf] {
        &self.bases
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}

/// Make `pattern` absolute against `root` and drop `.` components, so
/// `./tests/a.js` and `tests/a.js` compile to the same glob.
///
/// The root itself is escaped; only the pattern part keeps its glob meaning.
pub fn anchor_pattern(root: &Path, pattern: &str) -> PathBuf {
    let pattern_path = Path::new(pattern);
    let anchored = if pattern_path.is_absolute() {
        pattern_path.to_path_buf()
    } else {
        let escaped_root = globset::escape(&root.to_string_lossy());
        PathBuf::from(escaped_root).join(pattern_path)
    };

    anchored
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Directory to watch for `pattern`: the unescaped `root` joined with the
/// literal part of the pattern.
///
/// Glob characters in the root itself (e.g. `/work/proj[1]`) never cut the
/// base short.
pub fn watch_base(root: &Path, pattern: &str) -> PathBuf {
    let pattern_path = Path::new(pattern);
    let base = if pattern_path.is_absolute() {
        literal_base(pattern_path)
    } else {
        root.join(literal_base(pattern_path))
    };

    base.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Longest leading part of `pattern` without glob metacharacters.
///
/// For a literal file this is the file's parent directory; for
/// `src/**/*.js` it is `src`.
pub fn literal_base(pattern: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    let mut had_glob = false;

    for component in pattern.components() {
        if component.as_os_str().to_string_lossy().contains(GLOB_META) {
            had_glob = true;
            break;
        }
        base.push(component);
    }

    if !had_glob {
        // A literal file path: watch its directory so creation is seen too.
        base.pop();
    }

    base
}

/// Walk up from `dir` to the closest directory that exists.
///
/// Watch patterns may point at directories that have not been created yet.
pub fn nearest_existing(dir: &Path) -> Option<PathBuf> {
    dir.ancestors().find(|d| d.is_dir()).map(Path::to_path_buf)
}
