use regex::Regex;

/// Strategy for matching a file name against the pattern
#[derive(Debug, Clone)]
enum MatchStrategy {
    /// Empty or absent pattern: everything matches
    Any,
    /// No wildcards present: case-insensitive whole-name comparison
    Literal(String),
    /// Compiled wildcard pattern
    Wildcard(Regex),
    /// The pattern failed to compile; nothing matches
    Invalid,
}

/// Case-insensitive wildcard matcher over whole file names.
///
/// `*` matches any run of characters including the empty run, `?` matches
/// exactly one character, everything else is literal. A pattern that cannot
/// be compiled degrades to a matcher that rejects every name rather than
/// failing the search.
#[derive(Debug, Clone)]
pub struct NamePattern {
    strategy: MatchStrategy,
}

impl NamePattern {
    pub fn new(pattern: Option<&str>) -> Self {
        let strategy = match pattern {
            None => MatchStrategy::Any,
            Some("") => MatchStrategy::Any,
            Some(p) if !p.contains(['*', '?']) => MatchStrategy::Literal(p.to_string()),
            Some(p) => match Regex::new(&translate(p)) {
                Ok(regex) => MatchStrategy::Wildcard(regex),
                Err(_) => MatchStrategy::Invalid,
            },
        };
        Self { strategy }
    }

    /// Matches the full name, not a substring of it.
    pub fn matches(&self, name: &str) -> bool {
        match &self.strategy {
            MatchStrategy::Any => true,
            MatchStrategy::Literal(pattern) => pattern.eq_ignore_ascii_case(name),
            MatchStrategy::Wildcard(regex) => regex.is_match(name),
            MatchStrategy::Invalid => false,
        }
    }
}

/// Translates a wildcard pattern into an anchored case-insensitive regex.
fn translate(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(&String::from(c))),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert!(NamePattern::new(None).matches("anything.txt"));
        assert!(NamePattern::new(Some("")).matches("anything.txt"));
    }

    #[test]
    fn test_star_wildcard() {
        let pattern = NamePattern::new(Some("*report*.txt"));
        assert!(pattern.matches("annual_report_final.txt"));
        assert!(pattern.matches("report.txt"));
        assert!(!pattern.matches("report.txt.bak"));
        assert!(!pattern.matches("annual_summary.txt"));
    }

    #[test]
    fn test_question_wildcard_is_exactly_one_char() {
        let pattern = NamePattern::new(Some("?.log"));
        assert!(pattern.matches("a.log"));
        assert!(!pattern.matches("ab.log"));
        assert!(!pattern.matches(".log"));
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = NamePattern::new(Some("*.TXT"));
        assert!(pattern.matches("notes.txt"));

        let literal = NamePattern::new(Some("README.md"));
        assert!(literal.matches("readme.MD"));
        assert!(!literal.matches("readme"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = NamePattern::new(Some("build(v1.2)+*.json"));
        assert!(pattern.matches("build(v1.2)+release.json"));
        assert!(!pattern.matches("build(v132)+release.json"));
    }

    #[test]
    fn test_matches_whole_name_only() {
        let pattern = NamePattern::new(Some("main.rs"));
        assert!(!pattern.matches("domain.rs"));
        assert!(!pattern.matches("main.rs.orig"));
    }
}
