use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// A single file that passed every filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    /// Bare file name
    pub name: String,
    /// Absolute path to the file
    pub path: PathBuf,
    /// Lower-cased, dot-prefixed extension, empty when the file has none
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Platform attribute flags rendered as text
    pub attributes: String,
    /// Preview of the first matching line, present only when a content query
    /// was supplied and matched
    pub snippet: Option<String>,
}

/// Renders platform metadata flags as a short text descriptor.
#[cfg(windows)]
pub fn describe_attributes(metadata: &fs::Metadata, _name: &str) -> String {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_READONLY: u32 = 0x0001;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x0002;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x0004;
    const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x0020;

    let attrs = metadata.file_attributes();
    let mut parts = Vec::new();
    if attrs & FILE_ATTRIBUTE_READONLY != 0 {
        parts.push("read-only");
    }
    if attrs & FILE_ATTRIBUTE_HIDDEN != 0 {
        parts.push("hidden");
    }
    if attrs & FILE_ATTRIBUTE_SYSTEM != 0 {
        parts.push("system");
    }
    if attrs & FILE_ATTRIBUTE_ARCHIVE != 0 {
        parts.push("archive");
    }
    if parts.is_empty() {
        "normal".to_string()
    } else {
        parts.join(", ")
    }
}

/// Renders platform metadata flags as a short text descriptor.
///
/// Unix has no attribute word; read-only comes from the mode bits and hidden
/// follows the leading-dot convention.
#[cfg(not(windows))]
pub fn describe_attributes(metadata: &fs::Metadata, name: &str) -> String {
    let mut parts = Vec::new();
    if metadata.permissions().readonly() {
        parts.push("read-only");
    }
    if name.starts_with('.') {
        parts.push("hidden");
    }
    if parts.is_empty() {
        "normal".to_string()
    } else {
        parts.join(", ")
    }
}

/// Thread-safe, order-independent collection of matches.
///
/// Workers push concurrently; the orchestrator consumes it once at the end.
/// Each enumerated path is processed by exactly one worker, so no
/// deduplication is needed here.
#[derive(Debug, Default)]
pub struct MatchCollector {
    matches: Mutex<Vec<SearchMatch>>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a match. Called from worker threads.
    pub fn push(&self, found: SearchMatch) {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(found);
    }

    /// Consumes the collector and returns the matches in their final order:
    /// by name, ties broken by path.
    pub fn into_sorted_matches(self) -> Vec<SearchMatch> {
        let mut matches = self
            .matches
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::UNIX_EPOCH;

    fn sample(name: &str, path: &str) -> SearchMatch {
        SearchMatch {
            name: name.to_string(),
            path: PathBuf::from(path),
            extension: ".txt".to_string(),
            size: 0,
            modified: UNIX_EPOCH,
            attributes: "normal".to_string(),
            snippet: None,
        }
    }

    #[test]
    fn test_sorted_by_name_then_path() {
        let collector = MatchCollector::new();
        collector.push(sample("b.txt", "/z/b.txt"));
        collector.push(sample("a.txt", "/z/a.txt"));
        collector.push(sample("b.txt", "/a/b.txt"));

        let matches = collector.into_sorted_matches();
        let order: Vec<_> = matches
            .iter()
            .map(|m| (m.name.as_str(), m.path.to_str().unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.txt", "/z/a.txt"),
                ("b.txt", "/a/b.txt"),
                ("b.txt", "/z/b.txt"),
            ]
        );
    }

    #[test]
    fn test_concurrent_push() {
        let collector = Arc::new(MatchCollector::new());
        let mut handles = Vec::new();
        for t in 0..4 {
            let collector = Arc::clone(&collector);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    collector.push(sample(
                        &format!("file_{t}_{i}.txt"),
                        &format!("/tmp/file_{t}_{i}.txt"),
                    ));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let collector = Arc::into_inner(collector).unwrap();
        let matches = collector.into_sorted_matches();
        assert_eq!(matches.len(), 400);
        assert!(matches.windows(2).all(|w| w[0].name <= w[1].name));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_describe_attributes() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "x").unwrap();
        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(describe_attributes(&metadata, "plain.txt"), "normal");
        assert_eq!(describe_attributes(&metadata, ".hidden"), "hidden");

        let mut perms = metadata.permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();
        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(describe_attributes(&metadata, "plain.txt"), "read-only");
        assert_eq!(
            describe_attributes(&metadata, ".hidden"),
            "read-only, hidden"
        );
    }
}
