use regex::Regex;

use crate::error::{ReleaseError, Result};

/// An issue identifier searched for in commit messages (e.g. "TICKET-123").
///
/// Not a git tag object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueTag {
    pub name: String,
}

impl IssueTag {
    /// Create a new issue tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        IssueTag { name: name.into() }
    }

    /// Parse a whitespace separated tag list.
    ///
    /// Repeated tags are kept once, at their first position.
    pub fn parse_list(input: &str) -> Vec<IssueTag> {
        let mut tags: Vec<IssueTag> = Vec::new();
        for name in input.split_whitespace() {
            if !tags.iter().any(|t| t.name == name) {
                tags.push(IssueTag::new(name));
            }
        }
        tags
    }
}

impl std::fmt::Display for IssueTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Whole-word matcher for an issue tag inside a commit message.
///
/// The tag must not be adjacent to a word character on either side, so
/// "TICKET-1" matches "fix TICKET-1: typo" but not "TICKET-123".
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    /// Build the matcher for a tag
    pub fn for_tag(tag: &IssueTag) -> Result<Self> {
        if tag.name.is_empty() {
            return Err(ReleaseError::config("Tag must not be empty"));
        }

        let source = format!(r"(?:^|\W){}(?:\W|$)", regex::escape(&tag.name));
        let regex = Regex::new(&source).map_err(|e| {
            ReleaseError::config(format!("Invalid tag pattern for '{}': {}", tag, e))
        })?;

        Ok(TagPattern { regex })
    }

    /// Check whether a commit message references the tag
    pub fn matches(&self, message: &str) -> bool {
        self.regex.is_match(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(tag: &str) -> TagPattern {
        TagPattern::for_tag(&IssueTag::new(tag)).unwrap()
    }

    #[test]
    fn test_parse_list_splits_on_whitespace() {
        let tags = IssueTag::parse_list("  TICKET-123   TICKET-234\tOPS-9 ");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["TICKET-123", "TICKET-234", "OPS-9"]);
    }

    #[test]
    fn test_parse_list_empty_input() {
        assert!(IssueTag::parse_list("").is_empty());
        assert!(IssueTag::parse_list("    ").is_empty());
    }

    #[test]
    fn test_parse_list_keeps_first_occurrence() {
        let tags = IssueTag::parse_list("B-2 A-1 B-2");
        assert_eq!(tags, vec![IssueTag::new("B-2"), IssueTag::new("A-1")]);
    }

    #[test]
    fn test_matches_whole_word() {
        let p = pattern("TICKET-1");
        assert!(p.matches("TICKET-1"));
        assert!(p.matches("fix(api): TICKET-1 handle nulls"));
        assert!(p.matches("Merged in feature/x (pull request #4)\n\nTICKET-1"));
        assert!(p.matches("[TICKET-1] bump deps"));
    }

    #[test]
    fn test_rejects_partial_tokens() {
        let p = pattern("TICKET-1");
        assert!(!p.matches("TICKET-123 add login"));
        assert!(!p.matches("XTICKET-1 add login"));
        assert!(!p.matches("TICKET-10"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let p = pattern("REL.1");
        assert!(p.matches("REL.1 fix"));
        assert!(!p.matches("RELX1 fix"));
    }

    #[test]
    fn test_tag_with_leading_symbol() {
        let p = pattern("#42");
        assert!(p.matches("fix #42 crash"));
        assert!(!p.matches("fix #421 crash"));
    }

    #[test]
    fn test_empty_tag_is_rejected() {
        assert!(TagPattern::for_tag(&IssueTag::new("")).is_err());
    }
}
