use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::cancel::CancellationToken;

/// Bytes sampled from the start of a file for the binary heuristic.
const TEXT_SAMPLE_SIZE: u64 = 512;
/// Characters kept before the match start in a snippet.
const SNIPPET_BEFORE: usize = 40;
/// Maximum snippet length in characters.
const SNIPPET_MAX: usize = 160;

const BUFFER_CAPACITY: usize = 8192;

/// A case-insensitive literal content query, compiled once per search.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    // None when the query could not be compiled; such a query never matches.
    regex: Option<Regex>,
}

impl ContentQuery {
    pub fn new(query: &str) -> Self {
        let regex = Regex::new(&format!("(?i){}", regex::escape(query))).ok();
        Self { regex }
    }

    /// Byte range of the first occurrence of the query in `line`.
    fn find_in(&self, line: &str) -> Option<(usize, usize)> {
        self.regex
            .as_ref()
            .and_then(|re| re.find(line))
            .map(|m| (m.start(), m.end()))
    }
}

/// Samples the first 512 bytes of a file and classifies it as text when no
/// NUL byte appears. Empty files are text. Any read failure classifies the
/// file as binary, which excludes it from content search without surfacing
/// an error.
pub fn is_text_file(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut sample = Vec::with_capacity(TEXT_SAMPLE_SIZE as usize);
    if file.take(TEXT_SAMPLE_SIZE).read_to_end(&mut sample).is_err() {
        return false;
    }
    !sample.contains(&0)
}

/// Scans a file line by line for the first occurrence of the query and
/// returns its preview snippet. Returns `None` when no line matches, on any
/// I/O or decoding error, or once cancellation fires. Scanning stops at the
/// first matching line.
pub fn scan_for_snippet(
    path: &Path,
    query: &ContentQuery,
    token: &CancellationToken,
) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
    let mut line = String::with_capacity(256);

    loop {
        if token.is_cancelled() {
            return None;
        }
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(_) => return None,
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if let Some((start, _end)) = query.find_in(trimmed) {
            return Some(build_snippet(trimmed, start));
        }
    }
}

/// Cuts the snippet window out of a matching line: up to `SNIPPET_BEFORE`
/// characters before the match start, up to `SNIPPET_MAX` characters total,
/// with an ellipsis on each side that was truncated.
fn build_snippet(line: &str, match_start: usize) -> String {
    let mut begin = match_start;
    for _ in 0..SNIPPET_BEFORE {
        match line[..begin].chars().next_back() {
            Some(c) => begin -= c.len_utf8(),
            None => break,
        }
    }

    let mut finish = begin;
    for c in line[begin..].chars().take(SNIPPET_MAX) {
        finish += c.len_utf8();
    }

    let mut snippet = String::with_capacity(finish - begin + 6);
    if begin > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&line[begin..finish]);
    if finish < line.len() {
        snippet.push_str("...");
    }
    snippet
}
