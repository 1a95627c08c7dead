//! File filtering for watch events.
//!
//! Filtering happens on the notify thread, before events reach the channel.
//!
//! # Design
//!
//! The [`FileFilter`] trait is a predicate on paths. [`TargetFilter`] is the
//! one the change source uses: a change under a watched directory passes the
//! extension filter, while a watched file only matches itself.
//!
//! # Examples
//!
//! ```
//! use rl_watcher::{ExtensionFilter, FileFilter};
//! use camino::Utf8Path;
//!
//! let filter = ExtensionFilter::new(&[".go"]);
//! assert!(filter.should_process(Utf8Path::new("cmd/main.go")));
//! assert!(!filter.should_process(Utf8Path::new("cmd/main.txt")));
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use smallvec::SmallVec;

use crate::target::{TargetKind, WatchTarget};

/// A filter for determining which file events to process.
///
/// Filters must be [`Send`] and [`Sync`] because they run on the notify
/// thread, and `'static` to be moved into it.
///
/// # Examples
///
/// ```
/// use rl_watcher::FileFilter;
/// use camino::Utf8Path;
///
/// struct NoVendor;
///
/// impl FileFilter for NoVendor {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         !path.as_str().contains("/vendor/")
///     }
/// }
/// ```
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if the event for `path` should be sent on.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// A filter based on file extensions.
///
/// Entries are trimmed and may carry a leading dot. An empty filter accepts
/// every path.
///
/// # Examples
///
/// ```
/// use rl_watcher::{FileFilter, ExtensionFilter};
/// use camino::Utf8Path;
///
/// let filter = ExtensionFilter::new(&[" .js", "css ", ""]);
/// assert!(filter.should_process(Utf8Path::new("app.js")));
/// assert!(filter.should_process(Utf8Path::new("site.css")));
/// assert!(!filter.should_process(Utf8Path::new("index.html")));
///
/// let any = ExtensionFilter::new(&[]);
/// assert!(any.should_process(Utf8Path::new("Makefile")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    extensions: SmallVec<[String; 8]>,
}

impl ExtensionFilter {
    /// Creates a new extension filter.
    #[must_use]
    pub fn new(extensions: &[&str]) -> Self {
        Self::from_owned(extensions.iter().map(|s| (*s).to_owned()))
    }

    /// Creates an extension filter from owned strings.
    #[must_use]
    pub fn from_owned(extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .filter_map(|ext| {
                    let ext = ext.trim();
                    let ext = ext.strip_prefix('.').unwrap_or(ext);
                    (!ext.is_empty()).then(|| ext.to_owned())
                })
                .collect(),
        }
    }

    /// Returns `true` if no extensions were configured.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The normalized extensions, without leading dots.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl FileFilter for ExtensionFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        self.extensions.is_empty()
            || path
                .extension()
                .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Routes each path to the rule of the watch target it falls under.
///
/// - Under a directory target: the extension filter decides.
/// - A file target: only that exact path matches.
/// - Anything else (e.g. a sibling of a watched file): rejected.
///
/// # Examples
///
/// ```
/// use rl_watcher::{ExtensionFilter, FileFilter, TargetFilter, WatchTarget};
/// use camino::Utf8Path;
///
/// let filter = TargetFilter::new(
///     vec![WatchTarget::dir("/app/src"), WatchTarget::file("/app/config.yml")],
///     ExtensionFilter::new(&["go"]),
/// );
/// assert!(filter.should_process(Utf8Path::new("/app/src/pkg/main.go")));
/// assert!(!filter.should_process(Utf8Path::new("/app/src/notes.txt")));
/// assert!(filter.should_process(Utf8Path::new("/app/config.yml")));
/// assert!(!filter.should_process(Utf8Path::new("/app/other.yml")));
/// ```
#[derive(Debug, Clone)]
pub struct TargetFilter {
    dirs: Vec<Utf8PathBuf>,
    files: Vec<Utf8PathBuf>,
    extensions: ExtensionFilter,
}

impl TargetFilter {
    /// Creates a filter for the given targets.
    #[must_use]
    pub fn new(targets: impl IntoIterator<Item = WatchTarget>, extensions: ExtensionFilter) -> Self {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for target in targets {
            match target.kind {
                TargetKind::Directory => dirs.push(target.path),
                TargetKind::File => files.push(target.path),
            }
        }
        Self {
            dirs,
            files,
            extensions,
        }
    }
}

impl FileFilter for TargetFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        if self.files.iter().any(|file| file == path) {
            return true;
        }
        self.dirs.iter().any(|dir| path.starts_with(dir)) && self.extensions.should_process(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter_normalizes_entries() {
        let filter = ExtensionFilter::new(&[".go", "  rs ", ".", ""]);
        assert_eq!(filter.extensions(), ["go", "rs"]);
        assert!(filter.should_process(Utf8Path::new("main.go")));
        assert!(filter.should_process(Utf8Path::new("lib.rs")));
        assert!(!filter.should_process(Utf8Path::new("main.txt")));
        assert!(!filter.should_process(Utf8Path::new("Makefile")));
    }

    #[test]
    fn test_extension_filter_does_not_match_suffix() {
        let filter = ExtensionFilter::new(&["s"]);
        assert!(!filter.should_process(Utf8Path::new("app.js")));
        assert!(filter.should_process(Utf8Path::new("boot.s")));
    }

    #[test]
    fn test_empty_extension_filter_accepts_all() {
        let filter = ExtensionFilter::default();
        assert!(filter.is_empty());
        assert!(filter.should_process(Utf8Path::new("main.txt")));
    }

    #[test]
    fn test_target_filter_go_scenario() {
        let filter = TargetFilter::new(
            vec![WatchTarget::dir("/proj")],
            ExtensionFilter::new(&[".go"]),
        );
        assert!(filter.should_process(Utf8Path::new("/proj/main.go")));
        assert!(!filter.should_process(Utf8Path::new("/proj/main.txt")));
        assert!(!filter.should_process(Utf8Path::new("/elsewhere/main.go")));
    }

    #[test]
    fn test_target_filter_file_ignores_extensions() {
        let filter = TargetFilter::new(
            vec![WatchTarget::file("/proj/.env")],
            ExtensionFilter::new(&["go"]),
        );
        assert!(filter.should_process(Utf8Path::new("/proj/.env")));
        assert!(!filter.should_process(Utf8Path::new("/proj/main.go")));
    }

    #[test]
    fn test_target_filter_dir_prefix_is_component_wise() {
        let filter = TargetFilter::new(vec![WatchTarget::dir("/proj/src")], ExtensionFilter::default());
        assert!(filter.should_process(Utf8Path::new("/proj/src/a.rs")));
        assert!(!filter.should_process(Utf8Path::new("/proj/src2/a.rs")));
    }
}
