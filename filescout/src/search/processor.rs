use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, trace};

use crate::cancel::CancellationToken;
use crate::config::SearchOptions;
use crate::content::{self, ContentQuery};
use crate::filters::MetadataFilter;
use crate::results::{describe_attributes, SearchMatch};

/// Runs the per-file pipeline: resolve metadata, apply the metadata filter,
/// then classify and scan content when a query is present.
///
/// One processor is built per search and shared by every worker. Every
/// per-file fault (file deleted mid-walk, unreadable content, binary data)
/// skips the file; nothing a single file does can abort the search.
#[derive(Debug)]
pub struct FileProcessor {
    filter: MetadataFilter,
    query: Option<ContentQuery>,
    token: CancellationToken,
}

impl FileProcessor {
    pub fn new(options: &SearchOptions, token: CancellationToken) -> Self {
        let query = options
            .content_query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(ContentQuery::new);
        Self {
            filter: MetadataFilter::new(options),
            query,
            token,
        }
    }

    /// Processes one enumerated path. Returns the match when every filter
    /// passes, `None` otherwise.
    pub fn process(&self, path: &Path) -> Option<SearchMatch> {
        trace!("Processing {}", path.display());

        // Metadata is resolved here, not in the enumerator, so the walk
        // never pays a second filesystem round-trip per file.
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                // Expected race: the file can vanish between enumeration
                // and processing.
                debug!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };
        if !metadata.is_file() {
            return None;
        }

        if !self.filter.accepts(path, &metadata) {
            return None;
        }

        let snippet = match &self.query {
            None => None,
            Some(query) => {
                if !content::is_text_file(path) {
                    return None;
                }
                match content::scan_for_snippet(path, query, &self.token) {
                    Some(snippet) => Some(snippet),
                    None => return None,
                }
            }
        };

        Some(build_match(path, &metadata, snippet))
    }
}

fn build_match(path: &Path, metadata: &fs::Metadata, snippet: Option<String>) -> SearchMatch {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    SearchMatch {
        attributes: describe_attributes(metadata, &name),
        name,
        path: path.to_path_buf(),
        extension,
        size: metadata.len(),
        modified: metadata.modified().unwrap_or(UNIX_EPOCH),
        snippet,
    }
}
