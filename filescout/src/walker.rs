use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::cancel::CancellationToken;

/// Lazy, stack-based depth-first enumerator of the files under a root.
///
/// A directory's files are yielded before any of its subdirectories are
/// entered; siblings come back in whatever order `read_dir` produces them,
/// which is deterministic for a fixed filesystem snapshot. A directory that
/// cannot be listed (permissions, removed mid-walk) is treated as empty and
/// the walk continues. Cancellation is checked once per directory visited;
/// after it fires the iterator yields nothing further.
pub struct FileWalker {
    pending_dirs: Vec<PathBuf>,
    pending_files: VecDeque<PathBuf>,
    recurse: bool,
    token: CancellationToken,
}

impl FileWalker {
    pub fn new(root: &Path, recurse: bool, token: CancellationToken) -> Self {
        Self {
            pending_dirs: vec![root.to_path_buf()],
            pending_files: VecDeque::new(),
            recurse,
            token,
        }
    }

    fn visit_dir(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                return;
            }
        };

        let mut subdirs = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_file() {
                self.pending_files.push_back(entry.path());
            } else if file_type.is_dir() {
                subdirs.push(entry.path());
            }
            // Symlinks are skipped: following them risks cycles.
        }

        if self.recurse {
            // Reversed so the stack pops siblings in listing order.
            for subdir in subdirs.into_iter().rev() {
                self.pending_dirs.push(subdir);
            }
        }
    }
}

impl Iterator for FileWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if self.token.is_cancelled() {
                return None;
            }
            if let Some(file) = self.pending_files.pop_front() {
                return Some(file);
            }
            let dir = self.pending_dirs.pop()?;
            self.visit_dir(&dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs::File;
    use tempfile::tempdir;

    fn collect_names(walker: FileWalker) -> BTreeSet<String> {
        walker
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_recursive_walk_reaches_all_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/c.txt")).unwrap();
        fs::create_dir(dir.path().join("sub/deeper")).unwrap();
        File::create(dir.path().join("sub/deeper/d.txt")).unwrap();

        let walker = FileWalker::new(dir.path(), true, CancellationToken::new());
        let names = collect_names(walker);
        let expected: BTreeSet<String> = ["a.txt", "b.txt", "c.txt", "d.txt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_non_recursive_walk_stays_at_root() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/c.txt")).unwrap();

        let walker = FileWalker::new(dir.path(), false, CancellationToken::new());
        let names = collect_names(walker);
        let expected: BTreeSet<String> =
            ["a.txt"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_files_yielded_before_descending() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/nested.txt")).unwrap();
        File::create(dir.path().join("top.txt")).unwrap();

        let walker = FileWalker::new(dir.path(), true, CancellationToken::new());
        let order: Vec<String> = walker
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(order, vec!["top.txt", "nested.txt"]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let walker = FileWalker::new(
            Path::new("no/such/directory"),
            true,
            CancellationToken::new(),
        );
        assert_eq!(walker.count(), 0);
    }

    #[test]
    fn test_cancellation_stops_enumeration() {
        let dir = tempdir().unwrap();
        for i in 0..10 {
            File::create(dir.path().join(format!("f{i}.txt"))).unwrap();
        }

        let token = CancellationToken::new();
        let mut walker = FileWalker::new(dir.path(), true, token.clone());
        assert!(walker.next().is_some());

        token.cancel();
        assert!(walker.next().is_none());
    }
}
