use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::errors::{SearchError, SearchResult};

/// Criteria for one search invocation.
///
/// Built once per call and never mutated after the search starts. Can be
/// loaded from a YAML file, built directly, or assembled by a CLI; the
/// `merge_with_cli` method layers CLI values over file values.
///
/// Example config file:
/// ```yaml
/// # Root directory to search in
/// root_path: "/home/user/projects"
///
/// # Wildcard name pattern (* and ?)
/// name_pattern: "*report*.txt"
///
/// # Extensions to include, normalized on load
/// extensions: [".txt", ".md"]
///
/// # Descend into subdirectories
/// recurse: true
///
/// # Case-insensitive content query
/// content_query: "ERROR"
///
/// # Worker threads (default: 2x CPU cores)
/// thread_count: 8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Root directory to start the search from. Must exist.
    pub root_path: PathBuf,

    /// Optional wildcard pattern matched against bare file names.
    /// `*` matches any run of characters, `?` exactly one.
    #[serde(default)]
    pub name_pattern: Option<String>,

    /// Optional extension allow-list. Every element is non-empty,
    /// lower-case, and dot-prefixed (".txt"). `None` means no constraint.
    #[serde(default)]
    pub extensions: Option<BTreeSet<String>>,

    /// Inclusive lower bound on modification time.
    #[serde(default)]
    pub modified_after: Option<SystemTime>,

    /// Inclusive upper bound on modification time. Callers expressing a
    /// calendar date extend it to end-of-day before the search starts.
    #[serde(default)]
    pub modified_before: Option<SystemTime>,

    /// Whether to descend into subdirectories.
    #[serde(default = "default_recurse")]
    pub recurse: bool,

    /// Optional case-insensitive literal substring looked for inside files.
    #[serde(default)]
    pub content_query: Option<String>,

    /// Worker pool size override. `None` uses twice the CPU core count.
    #[serde(default)]
    pub thread_count: Option<NonZeroUsize>,
}

fn default_recurse() -> bool {
    true
}

impl SearchOptions {
    /// Creates options that match every file under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root.into(),
            name_pattern: None,
            extensions: None,
            modified_after: None,
            modified_before: None,
            recurse: true,
            content_query: None,
            thread_count: None,
        }
    }

    /// Loads options from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads options from a specific file, falling back to the global and
    /// local config locations.
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("filescout/config.yaml")),
            // Local config
            Some(PathBuf::from(".filescout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        let mut options: SearchOptions = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SearchError::config_error(e.to_string()))?;
        options.normalize_extensions();
        Ok(options)
    }

    /// Merges CLI arguments over these options. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli: SearchOptions) -> Self {
        if cli.root_path != PathBuf::from(".") {
            self.root_path = cli.root_path;
        }
        if cli.name_pattern.is_some() {
            self.name_pattern = cli.name_pattern;
        }
        if cli.extensions.is_some() {
            self.extensions = cli.extensions;
        }
        if cli.modified_after.is_some() {
            self.modified_after = cli.modified_after;
        }
        if cli.modified_before.is_some() {
            self.modified_before = cli.modified_before;
        }
        if !cli.recurse {
            self.recurse = false;
        }
        if cli.content_query.is_some() {
            self.content_query = cli.content_query;
        }
        if cli.thread_count.is_some() {
            self.thread_count = cli.thread_count;
        }
        self
    }

    /// Checks the precondition the pipeline relies on: the root must be an
    /// existing directory. Run before anything is spawned, never mid-run.
    pub fn validate(&self) -> SearchResult<()> {
        if !self.root_path.is_dir() {
            return Err(SearchError::invalid_root(&self.root_path));
        }
        Ok(())
    }

    /// Worker pool size: the explicit override, or twice the available
    /// hardware parallelism.
    pub fn effective_thread_count(&self) -> usize {
        match self.thread_count {
            Some(n) => n.get(),
            None => num_cpus::get().saturating_mul(2).max(1),
        }
    }

    /// Re-normalizes the extension set after deserialization, since a config
    /// file may carry entries like "TXT" or "md".
    fn normalize_extensions(&mut self) {
        if let Some(set) = self.extensions.take() {
            let normalized: BTreeSet<String> = set
                .iter()
                .filter_map(|e| normalize_extension(e))
                .collect();
            if !normalized.is_empty() {
                self.extensions = Some(normalized);
            }
        }
    }
}

/// Normalizes one user-entered extension: trims whitespace and leading dots,
/// lower-cases, and re-applies the single dot prefix. Returns `None` for
/// blank entries.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Converts a user-entered extension list (semicolon or comma separated,
/// optionally dot-prefixed, any case) into the normalized set the filter
/// expects. Returns `None` when the list contains nothing usable, which
/// means "no extension constraint".
pub fn parse_extension_list(raw: &str) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = raw
        .split([';', ','])
        .filter_map(normalize_extension)
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// Extends a timestamp at the start of a day to the last second of that day,
/// making a user-entered "to" date inclusive.
pub fn extend_to_end_of_day(day_start: SystemTime) -> SystemTime {
    day_start + Duration::from_secs(24 * 60 * 60 - 1)
}
