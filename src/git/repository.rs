use std::path::Path;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{BranchType, Repository as Git2Repo, RepositoryState, Sort};

use crate::domain::{Commit, CommitQuery};
use crate::error::{ReleaseError, Result};
use crate::git::command::GitCli;

/// Wrapper around git2::Repository with our trait interface
///
/// History, refs and index state are read through `git2`; commands that
/// touch the network or the working tree go through [GitCli].
pub struct Git2Repository {
    repo: Git2Repo,
    cli: GitCli,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Self::from_git2(repo)
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .ok_or_else(|| ReleaseError::config("Bare repositories are not supported"))?
            .to_path_buf();

        Ok(Git2Repository {
            repo,
            cli: GitCli::new(workdir),
        })
    }

    /// Signature time with its original offset
    fn commit_date(time: git2::Time) -> Result<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or(Utc.fix());
        let utc = DateTime::<Utc>::from_timestamp(time.seconds(), 0).ok_or_else(|| {
            git2::Error::from_str(&format!("Commit time out of range: {}", time.seconds()))
        })?;
        Ok(utc.with_timezone(&offset))
    }
}

impl super::Repository for Git2Repository {
    fn fetch(&self) -> Result<()> {
        self.cli.run(&["fetch"])?;
        Ok(())
    }

    fn pull(&self) -> Result<()> {
        self.cli.run(&["pull"])?;
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.cli.run(&["checkout", branch])?;
        Ok(())
    }

    fn create_branch(&self, new_branch: &str, from_branch: &str) -> Result<()> {
        self.cli.run(&["checkout", "-b", new_branch, from_branch])?;
        Ok(())
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }

        head.target()
            .map(|oid| oid.to_string())
            .ok_or_else(|| ReleaseError::config("HEAD does not point to a commit"))
    }

    fn conflicted_files(&self) -> Result<Vec<String>> {
        let mut index = self.repo.index()?;
        // The index was changed by the git binary, not through this handle
        index.read(true)?;

        if !index.has_conflicts() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for conflict in index.conflicts()? {
            let conflict = conflict?;
            let entry = conflict
                .our
                .as_ref()
                .or(conflict.their.as_ref())
                .or(conflict.ancestor.as_ref());
            if let Some(entry) = entry {
                paths.push(String::from_utf8_lossy(&entry.path).into_owned());
            }
        }
        Ok(paths)
    }

    fn log_matching(&self, query: &CommitQuery) -> Result<Vec<Commit>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

            if query.selects(&message, commit.parent_count()) {
                commits.push(Commit::new(
                    commit.id().to_string(),
                    Self::commit_date(commit.author().when())?,
                    message,
                ));
            }
        }
        Ok(commits)
    }

    fn cherry_pick(&self, hash: &str, merge_parent: u32) -> Result<()> {
        let parent = merge_parent.to_string();
        self.cli.run(&["cherry-pick", "-m", &parent, hash])?;
        Ok(())
    }

    fn cherry_pick_continue(&self) -> Result<()> {
        self.cli.run(&["cherry-pick", "--continue"])?;
        Ok(())
    }

    fn cherry_pick_skip(&self) -> Result<()> {
        self.cli.run(&["cherry-pick", "--skip"])?;
        Ok(())
    }

    fn cherry_pick_abort(&self) -> Result<()> {
        self.cli.run(&["cherry-pick", "--abort"])?;
        Ok(())
    }

    fn cherry_pick_in_progress(&self) -> Result<bool> {
        Ok(matches!(
            self.repo.state(),
            RepositoryState::CherryPick | RepositoryState::CherryPickSequence
        ))
    }

    fn delete_branch(&self, branch: &str, force: bool) -> Result<()> {
        if !force {
            self.cli.run(&["branch", "-d", branch])?;
            return Ok(());
        }

        let mut local = self.repo.find_branch(branch, BranchType::Local).map_err(|e| {
            ReleaseError::config(format!("Cannot find branch '{}': {}", branch, e))
        })?;
        local.delete()?;
        Ok(())
    }
}
