//! Commit discovery by issue tag and replay planning

use std::collections::HashSet;

use log::{debug, info};

use crate::domain::{Commit, CommitOrder, CommitQuery, IssueTag, Service, TagCommitMap};
use crate::error::Result;
use crate::git::Repository;

/// Query history once per tag, in tag order.
///
/// Searches the checked out branch; with [Service::Bitbucket] only merge
/// commits are considered.
pub fn discover_commits<R: Repository + ?Sized>(
    repo: &R,
    tags: &[IssueTag],
    service: Service,
) -> Result<TagCommitMap> {
    let mut map = TagCommitMap::new();

    for tag in tags {
        let query = CommitQuery::new(tag.clone(), service.merges_only())?;
        let commits = repo.log_matching(&query)?;
        info!("Found {} commit(s) for tag {}", commits.len(), tag);
        for commit in &commits {
            debug!("  {} {}", commit.short_hash(), commit.summary());
        }
        map.insert(tag.clone(), commits);
    }

    Ok(map)
}

/// A unit of replay progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayGroup {
    /// The tag the commits were found for; `None` in timestamp order
    pub tag: Option<IssueTag>,
    pub commits: Vec<Commit>,
}

/// A commit found under more than one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCommit {
    pub hash: String,
    pub first_tag: IssueTag,
    pub repeated_tag: IssueTag,
}

/// Ordered cherry-pick schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayPlan {
    groups: Vec<ReplayGroup>,
    duplicates: Vec<DuplicateCommit>,
    tags_without_commits: Vec<IssueTag>,
}

impl ReplayPlan {
    /// Arrange discovered commits for replay.
    ///
    /// Tag order keeps one group per tag with commits in history order.
    /// Timestamp order flattens everything and sorts ascending by commit
    /// date (stable, so equal dates keep tag order), one group per commit.
    /// Commits seen under an earlier tag are dropped only when `dedupe` is set.
    pub fn build(map: TagCommitMap, order: CommitOrder, dedupe: bool) -> Self {
        let tags_without_commits = map.tags_without_commits();
        let mut seen: Vec<(String, IssueTag)> = Vec::new();
        let mut duplicates = Vec::new();
        let mut entries = Vec::new();

        for entry in map.into_entries() {
            let mut kept = Vec::with_capacity(entry.commits.len());
            for commit in entry.commits {
                let first_seen = seen
                    .iter()
                    .find(|(hash, _)| *hash == commit.hash)
                    .map(|(_, tag)| tag.clone());
                if let Some(first_tag) = first_seen {
                    duplicates.push(DuplicateCommit {
                        hash: commit.hash.clone(),
                        first_tag,
                        repeated_tag: entry.tag.clone(),
                    });
                    if dedupe {
                        continue;
                    }
                } else {
                    seen.push((commit.hash.clone(), entry.tag.clone()));
                }
                kept.push(commit);
            }
            entries.push((entry.tag, kept));
        }

        let groups = match order {
            CommitOrder::TagOrder => entries
                .into_iter()
                .map(|(tag, commits)| ReplayGroup {
                    tag: Some(tag),
                    commits,
                })
                .collect(),
            CommitOrder::TimestampOrder => {
                let mut all: Vec<Commit> = entries
                    .into_iter()
                    .flat_map(|(_, commits)| commits)
                    .collect();
                all.sort_by(|a, b| a.date.cmp(&b.date));
                all.into_iter()
                    .map(|commit| ReplayGroup {
                        tag: None,
                        commits: vec![commit],
                    })
                    .collect()
            }
        };

        ReplayPlan {
            groups,
            duplicates,
            tags_without_commits,
        }
    }

    pub fn groups(&self) -> &[ReplayGroup] {
        &self.groups
    }

    /// All commits in replay order
    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.groups.iter().flat_map(|g| g.commits.iter())
    }

    pub fn total_commits(&self) -> usize {
        self.groups.iter().map(|g| g.commits.len()).sum()
    }

    /// Number of progress steps: tags in tag order, commits in timestamp order
    pub fn progress_total(&self) -> usize {
        self.groups.len()
    }

    pub fn duplicates(&self) -> &[DuplicateCommit] {
        &self.duplicates
    }

    pub fn tags_without_commits(&self) -> &[IssueTag] {
        &self.tags_without_commits
    }

    /// Distinct commit count, ignoring repeats across tags
    pub fn unique_commits(&self) -> usize {
        self.commits()
            .map(|c| c.hash.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
