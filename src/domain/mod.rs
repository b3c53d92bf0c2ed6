//! Domain logic - pure release rules independent of git operations

pub mod commit;
pub mod run;
pub mod tag;

pub use commit::{short_hash, Commit, CommitQuery, TagCommitMap, TagCommits};
pub use run::{CommitOrder, RunConfig, Service};
pub use tag::{IssueTag, TagPattern};
