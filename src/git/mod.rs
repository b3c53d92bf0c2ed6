//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release run needs, allowing the orchestration to be driven against a real
//! repository or a scripted mock.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: reads history and refs with the `git2`
//!   crate and runs the `git` binary for fetch, pull, checkout and cherry-pick
//! - [mock::MockRepository]: an in-memory implementation for tests
//!
//! # Usage
//!
//! ```rust
//! # use release_vr::git::Repository;
//! # use release_vr::domain::{CommitQuery, IssueTag};
//! # fn example<R: Repository>(repo: &R) -> release_vr::Result<()> {
//! let query = CommitQuery::new(IssueTag::new("TICKET-123"), false)?;
//! for commit in repo.log_matching(&query)? {
//!     repo.cherry_pick(&commit.hash, 1)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;

pub use command::GitCli;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{Commit, CommitQuery};
use crate::error::Result;

/// Git capabilities used by a release run
///
/// ## Error Handling
///
/// Commands that shell out to `git` fail with
/// [crate::error::ReleaseError::Command], whose message carries git's own
/// output. The cherry-pick handler classifies failures by that text.
pub trait Repository {
    /// Fetch from the default remote
    fn fetch(&self) -> Result<()>;

    /// Pull into the checked out branch
    fn pull(&self) -> Result<()>;

    /// Check out an existing branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create `new_branch` from `from_branch` and check it out
    fn create_branch(&self, new_branch: &str, from_branch: &str) -> Result<()>;

    /// Names of all local branches
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Whether a local branch exists
    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.list_branches()?.iter().any(|b| b == branch))
    }

    /// Name of the checked out branch, or the HEAD hash when detached
    fn current_branch(&self) -> Result<String>;

    /// Paths with unresolved conflicts in the index
    fn conflicted_files(&self) -> Result<Vec<String>>;

    /// History of HEAD filtered by the query, newest first
    fn log_matching(&self, query: &CommitQuery) -> Result<Vec<Commit>>;

    /// Apply a commit with `cherry-pick -m <merge_parent>`
    fn cherry_pick(&self, hash: &str, merge_parent: u32) -> Result<()>;

    fn cherry_pick_continue(&self) -> Result<()>;

    fn cherry_pick_skip(&self) -> Result<()>;

    fn cherry_pick_abort(&self) -> Result<()>;

    /// Whether a cherry-pick is stopped waiting for `--continue`, `--skip` or `--abort`
    fn cherry_pick_in_progress(&self) -> Result<bool>;

    /// Delete a local branch; `force` deletes it even when unmerged
    fn delete_branch(&self, branch: &str, force: bool) -> Result<()>;
}
