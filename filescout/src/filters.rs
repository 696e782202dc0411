use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::SearchOptions;
use crate::search::matcher::NamePattern;

/// Checks a file's extension against the normalized allow-list.
/// An absent or empty list means no constraint; a file without an extension
/// can only pass when there is no constraint.
pub fn matches_extension(path: &Path, extensions: &Option<BTreeSet<String>>) -> bool {
    match extensions {
        None => true,
        Some(set) if set.is_empty() => true,
        Some(set) => {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                return false;
            };
            set.iter().any(|allowed| {
                allowed
                    .strip_prefix('.')
                    .is_some_and(|a| a.eq_ignore_ascii_case(ext))
            })
        }
    }
}

/// Checks a modification time against an inclusive date range. Either bound
/// may be absent, meaning unbounded on that side.
pub fn matches_date_range(
    modified: SystemTime,
    after: &Option<SystemTime>,
    before: &Option<SystemTime>,
) -> bool {
    if let Some(after) = after {
        if modified < *after {
            return false;
        }
    }
    if let Some(before) = before {
        if modified > *before {
            return false;
        }
    }
    true
}

/// The combined metadata predicate: extension, date range, and name pattern
/// ANDed together, applied before any file content is read. Absent
/// constraints always pass.
#[derive(Debug)]
pub struct MetadataFilter {
    extensions: Option<BTreeSet<String>>,
    modified_after: Option<SystemTime>,
    modified_before: Option<SystemTime>,
    name_pattern: NamePattern,
}

impl MetadataFilter {
    pub fn new(options: &SearchOptions) -> Self {
        Self {
            extensions: options.extensions.clone(),
            modified_after: options.modified_after,
            modified_before: options.modified_before,
            name_pattern: NamePattern::new(options.name_pattern.as_deref()),
        }
    }

    /// Decides whether a file passes on metadata alone. The name pattern is
    /// matched against the bare file name, never the full path.
    pub fn accepts(&self, path: &Path, metadata: &fs::Metadata) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);

        matches_extension(path, &self.extensions)
            && matches_date_range(modified, &self.modified_after, &self.modified_before)
            && self.name_pattern.matches(&name)
    }
}
