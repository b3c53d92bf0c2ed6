use chrono::{DateTime, FixedOffset};

use crate::domain::tag::{IssueTag, TagPattern};
use crate::error::Result;

/// Abbreviate a full hash to seven characters, as `git log --oneline` does
pub fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// A commit read from history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    /// Author date, which cherry-picks and rebases preserve
    pub date: DateTime<FixedOffset>,
    pub message: String,
}

impl Commit {
    pub fn new(
        hash: impl Into<String>,
        date: DateTime<FixedOffset>,
        message: impl Into<String>,
    ) -> Self {
        Commit {
            hash: hash.into(),
            date,
            message: message.into(),
        }
    }

    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// History filter for one issue tag
#[derive(Debug, Clone)]
pub struct CommitQuery {
    pub tag: IssueTag,
    pub pattern: TagPattern,
    /// Only consider commits with more than one parent
    pub merges_only: bool,
}

impl CommitQuery {
    pub fn new(tag: IssueTag, merges_only: bool) -> Result<Self> {
        let pattern = TagPattern::for_tag(&tag)?;
        Ok(CommitQuery {
            tag,
            pattern,
            merges_only,
        })
    }

    /// Whether a commit with this message and parent count is selected
    pub fn selects(&self, message: &str, parent_count: usize) -> bool {
        if self.merges_only && parent_count < 2 {
            return false;
        }
        self.pattern.matches(message)
    }
}

/// Commits discovered for one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCommits {
    pub tag: IssueTag,
    pub commits: Vec<Commit>,
}

/// Tag to commits mapping, kept in tag input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCommitMap {
    entries: Vec<TagCommits>,
}

impl TagCommitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the commits found for a tag.
    ///
    /// Commits for a tag already present are appended to its entry.
    pub fn insert(&mut self, tag: IssueTag, commits: Vec<Commit>) {
        match self.entries.iter_mut().find(|e| e.tag == tag) {
            Some(entry) => entry.commits.extend(commits),
            None => self.entries.push(TagCommits { tag, commits }),
        }
    }

    pub fn get(&self, tag: &IssueTag) -> Option<&[Commit]> {
        self.entries
            .iter()
            .find(|e| &e.tag == tag)
            .map(|e| e.commits.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagCommits> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_commits(&self) -> usize {
        self.entries.iter().map(|e| e.commits.len()).sum()
    }

    /// Tags whose history query returned nothing
    pub fn tags_without_commits(&self) -> Vec<IssueTag> {
        self.entries
            .iter()
            .filter(|e| e.commits.is_empty())
            .map(|e| e.tag.clone())
            .collect()
    }

    pub fn into_entries(self) -> Vec<TagCommits> {
        self.entries
    }
}
