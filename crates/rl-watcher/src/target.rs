//! Resolution of user-supplied watch paths.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::WatchError;

/// Whether a target is a directory or a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Everything under the directory is watched.
    Directory,
    /// Only the file itself; its parent directory is what gets registered.
    File,
}

/// A resolved, canonical path to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Canonical path of the target.
    pub path: Utf8PathBuf,
    /// Directory or file.
    pub kind: TargetKind,
}

impl WatchTarget {
    /// A directory target.
    pub fn dir(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::Directory,
        }
    }

    /// A file target.
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::File,
        }
    }

    /// The directory handed to notify.
    pub fn watch_root(&self) -> &Utf8Path {
        match self.kind {
            TargetKind::Directory => &self.path,
            TargetKind::File => self.path.parent().unwrap_or(&self.path),
        }
    }

    /// Files only need their parent watched without descending.
    pub const fn is_recursive(&self, recursive: bool) -> bool {
        match self.kind {
            TargetKind::Directory => recursive,
            TargetKind::File => false,
        }
    }

    /// Resolves one path.
    ///
    /// Symbolic links are not followed; the path itself is inspected with
    /// `lstat`.
    ///
    /// # Errors
    ///
    /// [`WatchError::PathNotFound`] if it does not exist,
    /// [`WatchError::Symlink`] if it is a symbolic link, and
    /// [`WatchError::Io`] if it cannot be canonicalized.
    pub fn resolve(path: &Utf8Path) -> Result<Self, WatchError> {
        let meta = match path.symlink_metadata() {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(WatchError::path_not_found(path));
            }
            Err(err) => return Err(WatchError::Io(err)),
        };
        if meta.file_type().is_symlink() {
            return Err(WatchError::symlink(path));
        }

        let canonical = path.canonicalize_utf8()?;
        Ok(if meta.is_dir() {
            Self::dir(canonical)
        } else {
            Self::file(canonical)
        })
    }
}

/// Resolves every path, splitting usable targets from skipped ones.
///
/// Duplicates are collapsed.
pub fn resolve_targets<P: AsRef<Utf8Path>>(
    paths: &[P],
) -> (Vec<WatchTarget>, Vec<WatchError>) {
    let mut targets: Vec<WatchTarget> = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        match WatchTarget::resolve(path.as_ref()) {
            Ok(target) if targets.contains(&target) => {}
            Ok(target) => targets.push(target),
            Err(err) => {
                tracing::warn!(path = %path.as_ref(), error = %err, "Skipping watch path");
                skipped.push(err);
            }
        }
    }

    (targets, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir is UTF-8")
    }

    #[test]
    fn test_resolve_directory() {
        let temp = TempDir::new().expect("temp dir");
        let target = WatchTarget::resolve(&utf8(&temp)).expect("resolves");
        assert_eq!(target.kind, TargetKind::Directory);
        assert_eq!(target.watch_root(), target.path.as_path());
        assert!(target.is_recursive(true));
    }

    #[test]
    fn test_resolve_file_watches_parent() {
        let temp = TempDir::new().expect("temp dir");
        let file = utf8(&temp).join("main.go");
        fs::write(&file, "package main").expect("write");

        let target = WatchTarget::resolve(&file).expect("resolves");
        assert_eq!(target.kind, TargetKind::File);
        assert_eq!(target.path.file_name(), Some("main.go"));
        assert_eq!(Some(target.watch_root()), target.path.parent());
        assert!(!target.is_recursive(true));
    }

    #[test]
    fn test_resolve_missing() {
        let err = WatchTarget::resolve(Utf8Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, WatchError::PathNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let real = utf8(&temp).join("real");
        fs::create_dir(&real).expect("mkdir");
        let link = utf8(&temp).join("link");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        let err = WatchTarget::resolve(&link).unwrap_err();
        assert!(matches!(err, WatchError::Symlink(_)));
    }

    #[test]
    fn test_resolve_targets_skips_bad_and_dedups() {
        let temp = TempDir::new().expect("temp dir");
        let dir = utf8(&temp);
        let paths = vec![dir.clone(), dir.join("missing"), dir.clone()];

        let (targets, skipped) = resolve_targets(&paths);
        assert_eq!(targets.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].is_recoverable());
    }
}
