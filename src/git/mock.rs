use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::domain::{Commit, CommitQuery};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;

#[derive(Debug, Clone)]
struct MockCommit {
    commit: Commit,
    parent_count: usize,
}

#[derive(Debug, Default)]
struct MockState {
    branches: Vec<String>,
    current: String,
    commits: Vec<MockCommit>,
    pick_failures: HashMap<String, String>,
    pick_rejections: HashMap<String, String>,
    continue_failures: VecDeque<String>,
    conflict_reports: VecDeque<Vec<String>>,
    operation_failures: HashMap<String, String>,
    pending_pick: Option<String>,
    applied: Vec<String>,
    skipped: Vec<String>,
    aborted: Vec<String>,
    calls: Vec<String>,
}

/// Mock repository for testing without actual git operations
///
/// Tracks branches and the checked out branch, records every call, and
/// replays scripted failures. Git's rule that a branch cannot be switched
/// while a cherry-pick is stopped is enforced, as is refusing to delete
/// the checked out branch.
pub struct MockRepository {
    state: RefCell<MockState>,
}

impl MockRepository {
    /// Create a mock with a single branch, checked out
    pub fn new(current_branch: impl Into<String>) -> Self {
        let current = current_branch.into();
        MockRepository {
            state: RefCell::new(MockState {
                branches: vec![current.clone()],
                current,
                ..MockState::default()
            }),
        }
    }

    /// Add a local branch
    pub fn add_branch(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.state.borrow_mut();
        if !state.branches.contains(&name) {
            state.branches.push(name);
        }
    }

    /// Add a single-parent commit to history
    pub fn add_commit(&self, commit: Commit) {
        self.state.borrow_mut().commits.push(MockCommit {
            commit,
            parent_count: 1,
        });
    }

    /// Add a two-parent commit to history
    pub fn add_merge_commit(&self, commit: Commit) {
        self.state.borrow_mut().commits.push(MockCommit {
            commit,
            parent_count: 2,
        });
    }

    /// Make `cherry-pick` of this commit fail with git's message
    pub fn fail_cherry_pick(&self, hash: impl Into<String>, message: impl Into<String>) {
        self.state
            .borrow_mut()
            .pick_failures
            .insert(hash.into(), message.into());
    }

    /// Make `cherry-pick` of this commit fail before a pick is started,
    /// as git does for an unknown revision or a dirty working tree
    pub fn reject_cherry_pick(&self, hash: impl Into<String>, message: impl Into<String>) {
        self.state
            .borrow_mut()
            .pick_rejections
            .insert(hash.into(), message.into());
    }

    /// Make the next `cherry-pick --continue` fail with git's message
    pub fn fail_next_continue(&self, message: impl Into<String>) {
        self.state
            .borrow_mut()
            .continue_failures
            .push_back(message.into());
    }

    /// Queue the answer of the next conflicted-files query.
    ///
    /// Without queued answers the index is reported clean.
    pub fn report_conflicts(&self, paths: &[&str]) {
        self.state
            .borrow_mut()
            .conflict_reports
            .push_back(paths.iter().map(|p| p.to_string()).collect());
    }

    /// Make an operation fail: "fetch", "pull", "checkout", "create_branch"
    /// or "delete_branch"
    pub fn fail_operation(&self, operation: impl Into<String>, message: impl Into<String>) {
        self.state
            .borrow_mut()
            .operation_failures
            .insert(operation.into(), message.into());
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Calls that change repository state
    pub fn mutating_calls(&self) -> Vec<String> {
        const READ_ONLY: [&str; 5] = [
            "list_branches",
            "current_branch",
            "conflicted_files",
            "log",
            "cherry_pick_in_progress",
        ];
        self.calls()
            .into_iter()
            .filter(|c| !READ_ONLY.iter().any(|r| c.starts_with(r)))
            .collect()
    }

    pub fn branches(&self) -> Vec<String> {
        self.state.borrow().branches.clone()
    }

    pub fn checked_out(&self) -> String {
        self.state.borrow().current.clone()
    }

    /// Hashes applied, in order, including those finished by `--continue`
    pub fn applied(&self) -> Vec<String> {
        self.state.borrow().applied.clone()
    }

    pub fn skipped(&self) -> Vec<String> {
        self.state.borrow().skipped.clone()
    }

    pub fn aborted(&self) -> Vec<String> {
        self.state.borrow().aborted.clone()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn scripted_failure(&self, operation: &str, command: &str) -> Result<()> {
        match self.state.borrow().operation_failures.get(operation) {
            Some(message) => Err(ReleaseError::command(command, message.clone())),
            None => Ok(()),
        }
    }

    fn ensure_no_pick_in_progress(&self, command: &str) -> Result<()> {
        if self.state.borrow().pending_pick.is_some() {
            return Err(ReleaseError::command(
                command,
                "error: you need to resolve your current index first",
            ));
        }
        Ok(())
    }
}

impl Repository for MockRepository {
    fn fetch(&self) -> Result<()> {
        self.record("fetch".to_string());
        self.scripted_failure("fetch", "fetch")
    }

    fn pull(&self) -> Result<()> {
        let current = self.checked_out();
        self.record(format!("pull {}", current));
        self.scripted_failure("pull", "pull")
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let command = format!("checkout {}", branch);
        self.record(command.clone());
        self.scripted_failure("checkout", &command)?;
        self.ensure_no_pick_in_progress(&command)?;

        let mut state = self.state.borrow_mut();
        if !state.branches.iter().any(|b| b == branch) {
            return Err(ReleaseError::command(
                command,
                format!("error: pathspec '{}' did not match any file(s) known to git", branch),
            ));
        }
        state.current = branch.to_string();
        Ok(())
    }

    fn create_branch(&self, new_branch: &str, from_branch: &str) -> Result<()> {
        let command = format!("checkout -b {} {}", new_branch, from_branch);
        self.record(command.clone());
        self.scripted_failure("create_branch", &command)?;

        let mut state = self.state.borrow_mut();
        if state.branches.iter().any(|b| b == new_branch) {
            return Err(ReleaseError::command(
                command,
                format!("fatal: a branch named '{}' already exists", new_branch),
            ));
        }
        state.branches.push(new_branch.to_string());
        state.current = new_branch.to_string();
        Ok(())
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        self.record("list_branches".to_string());
        Ok(self.branches())
    }

    fn current_branch(&self) -> Result<String> {
        self.record("current_branch".to_string());
        Ok(self.checked_out())
    }

    fn conflicted_files(&self) -> Result<Vec<String>> {
        self.record("conflicted_files".to_string());
        Ok(self
            .state
            .borrow_mut()
            .conflict_reports
            .pop_front()
            .unwrap_or_default())
    }

    fn log_matching(&self, query: &CommitQuery) -> Result<Vec<Commit>> {
        self.record(format!("log {}", query.tag));
        let mut commits: Vec<Commit> = self
            .state
            .borrow()
            .commits
            .iter()
            .filter(|c| query.selects(&c.commit.message, c.parent_count))
            .map(|c| c.commit.clone())
            .collect();
        // git log lists newest first
        commits.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(commits)
    }

    fn cherry_pick(&self, hash: &str, merge_parent: u32) -> Result<()> {
        let command = format!("cherry-pick -m {} {}", merge_parent, hash);
        self.record(command.clone());
        self.ensure_no_pick_in_progress(&command)?;

        let mut state = self.state.borrow_mut();
        if let Some(message) = state.pick_rejections.get(hash).cloned() {
            return Err(ReleaseError::command(command, message));
        }
        if let Some(message) = state.pick_failures.get(hash).cloned() {
            state.pending_pick = Some(hash.to_string());
            return Err(ReleaseError::command(command, message));
        }
        state.applied.push(hash.to_string());
        Ok(())
    }

    fn cherry_pick_continue(&self) -> Result<()> {
        let command = "cherry-pick --continue";
        self.record(command.to_string());

        let mut state = self.state.borrow_mut();
        if let Some(message) = state.continue_failures.pop_front() {
            return Err(ReleaseError::command(command, message));
        }
        match state.pending_pick.take() {
            Some(hash) => {
                state.applied.push(hash);
                Ok(())
            }
            None => Err(ReleaseError::command(
                command,
                "error: no cherry-pick or revert in progress",
            )),
        }
    }

    fn cherry_pick_skip(&self) -> Result<()> {
        self.record("cherry-pick --skip".to_string());
        let mut state = self.state.borrow_mut();
        if let Some(hash) = state.pending_pick.take() {
            state.skipped.push(hash);
        }
        Ok(())
    }

    fn cherry_pick_abort(&self) -> Result<()> {
        let command = "cherry-pick --abort";
        self.record(command.to_string());
        let mut state = self.state.borrow_mut();
        match state.pending_pick.take() {
            Some(hash) => {
                state.aborted.push(hash);
                Ok(())
            }
            None => Err(ReleaseError::command(
                command,
                "error: no cherry-pick or revert in progress\nfatal: cherry-pick failed",
            )),
        }
    }

    fn cherry_pick_in_progress(&self) -> Result<bool> {
        self.record("cherry_pick_in_progress".to_string());
        Ok(self.state.borrow().pending_pick.is_some())
    }

    fn delete_branch(&self, branch: &str, force: bool) -> Result<()> {
        let command = format!("branch {} {}", if force { "-D" } else { "-d" }, branch);
        self.record(command.clone());
        self.scripted_failure("delete_branch", &command)?;

        let mut state = self.state.borrow_mut();
        if state.current == branch {
            return Err(ReleaseError::command(
                command,
                format!("error: cannot delete branch '{}' checked out", branch),
            ));
        }
        let before = state.branches.len();
        state.branches.retain(|b| b != branch);
        if state.branches.len() == before {
            return Err(ReleaseError::command(
                command,
                format!("error: branch '{}' not found", branch),
            ));
        }
        Ok(())
    }
}
