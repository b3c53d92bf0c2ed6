//! Release workflow orchestration
//!
//! Runs a confirmed [RunConfig] against a repository: branch preparation,
//! commit discovery, replay, and rollback when anything fatal happens. Kept
//! apart from argument parsing and the wizard so it can be driven
//! programmatically.

use log::{debug, error, info, warn};

use crate::boundary::BoundaryWarning;
use crate::cherry_pick::{CherryPicker, PickOutcome};
use crate::discovery::{discover_commits, ReplayPlan};
use crate::domain::{CommitOrder, IssueTag, RunConfig};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui::{self, ProgressBar, Prompter};

/// Result of a successful release run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseSummary {
    /// The branch that was created
    pub release_branch: String,

    /// Commits applied cleanly, in order
    pub applied: Vec<String>,

    /// Commits applied after the operator resolved conflicts
    pub resolved: Vec<String>,

    /// Commits skipped because they had nothing to apply
    pub skipped: Vec<String>,

    /// Tags whose history query came back empty
    pub tags_without_commits: Vec<IssueTag>,
}

impl ReleaseSummary {
    fn record(&mut self, hash: &str, outcome: PickOutcome) {
        let list = match outcome {
            PickOutcome::Applied => &mut self.applied,
            PickOutcome::Resolved => &mut self.resolved,
            PickOutcome::Skipped(_) => &mut self.skipped,
        };
        list.push(hash.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ReleaseSummary),
    /// No tags were given; nothing was touched
    NothingToDo,
}

/// Drives one release run
pub struct ReleaseOrchestrator<'a, R: Repository + ?Sized, P: Prompter + ?Sized> {
    repo: &'a R,
    prompter: &'a mut P,
    show_progress: bool,
}

impl<'a, R: Repository + ?Sized, P: Prompter + ?Sized> ReleaseOrchestrator<'a, R, P> {
    pub fn new(repo: &'a R, prompter: &'a mut P) -> Self {
        ReleaseOrchestrator {
            repo,
            prompter,
            show_progress: true,
        }
    }

    /// Draw the progress bar while replaying (only on a terminal)
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Main release workflow
    ///
    /// 1. Check confirmation, tags and branches (no mutation on failure)
    /// 2. Fetch, check out and pull the base branch
    /// 3. Discover commits per tag and order them
    /// 4. Check out and pull the target branch, create the release branch
    /// 5. Cherry-pick every commit
    ///
    /// Any error from step 2 on restores the branch that was checked out
    /// when the run started and deletes the release branch.
    pub fn run(&mut self, config: &RunConfig) -> Result<RunOutcome> {
        if !config.confirm {
            error!("Run was not confirmed, nothing was changed");
            return Err(ReleaseError::NotConfirmed);
        }

        if config.tags.is_empty() {
            info!(
                "No tags given, nothing to cherry-pick for release branch {}",
                config.release_branch
            );
            return Ok(RunOutcome::NothingToDo);
        }

        self.validate_branches(config)?;

        let original_branch = self.repo.current_branch()?;
        let tags: Vec<&str> = config.tags.iter().map(|t| t.name.as_str()).collect();
        info!(
            "Starting cherry-pick from {} to {} for tags: {}",
            config.base_branch,
            config.target_branch,
            tags.join(", ")
        );
        info!("Current branch is {}", original_branch);

        match self.execute(config) {
            Ok(summary) => {
                info!(
                    "========= Cherry-picking completed, release branch {} created =========",
                    config.release_branch
                );
                Ok(RunOutcome::Completed(summary))
            }
            Err(err) => {
                error!("{}", err);
                self.rollback(&original_branch, &config.release_branch);
                Err(err)
            }
        }
    }

    fn validate_branches(&self, config: &RunConfig) -> Result<()> {
        if config.merge_parent == 0 {
            return Err(ReleaseError::config("Merge parent number must be 1 or greater"));
        }

        let release = &config.release_branch;
        if release.trim().is_empty() {
            return Err(ReleaseError::config("Release branch name must not be empty"));
        }
        if release == &config.base_branch || release == &config.target_branch {
            return Err(ReleaseError::config(format!(
                "Release branch '{}' must differ from the base and target branches",
                release
            )));
        }

        let branches = self.repo.list_branches()?;
        for branch in [&config.base_branch, &config.target_branch] {
            if !branches.contains(branch) {
                return Err(ReleaseError::config(format!(
                    "Branch '{}' does not exist",
                    branch
                )));
            }
        }
        if branches.contains(release) {
            return Err(ReleaseError::config(format!(
                "Release branch '{}' already exists",
                release
            )));
        }
        Ok(())
    }

    fn execute(&mut self, config: &RunConfig) -> Result<ReleaseSummary> {
        let repo = self.repo;

        repo.fetch()
            .map_err(|e| ReleaseError::preparation("fetch the latest changes", &e))?;
        info!("Fetched the latest changes");

        repo.checkout(&config.base_branch).map_err(|e| {
            ReleaseError::preparation(format!("check out base branch {}", config.base_branch), &e)
        })?;
        info!("Checked out base branch {}", config.base_branch);

        repo.pull()
            .map_err(|e| ReleaseError::preparation("pull the base branch", &e))?;

        let map = discover_commits(repo, &config.tags, config.service)?;
        let plan = ReplayPlan::build(map, config.commit_order, config.dedupe_commits);
        self.report_plan(&plan, config);

        repo.checkout(&config.target_branch).map_err(|e| {
            ReleaseError::preparation(
                format!("check out target branch {}", config.target_branch),
                &e,
            )
        })?;
        info!("Checked out target branch {}", config.target_branch);

        repo.pull()
            .map_err(|e| ReleaseError::preparation("pull the target branch", &e))?;

        repo.create_branch(&config.release_branch, &config.target_branch)
            .map_err(|e| {
                ReleaseError::preparation(
                    format!("create release branch {}", config.release_branch),
                    &e,
                )
            })?;
        info!(
            "Created and checked out release branch {} from {}",
            config.release_branch, config.target_branch
        );

        self.replay(&plan, config)
    }

    fn report_plan(&self, plan: &ReplayPlan, config: &RunConfig) {
        for tag in plan.tags_without_commits() {
            ui::display_boundary_warning(&BoundaryWarning::NoCommitsForTag {
                tag: tag.name.clone(),
            });
        }
        for duplicate in plan.duplicates() {
            ui::display_boundary_warning(&BoundaryWarning::DuplicateCommit {
                commit_hash: duplicate.hash.clone(),
                first_tag: duplicate.first_tag.name.clone(),
                repeated_tag: duplicate.repeated_tag.name.clone(),
                deduplicated: config.dedupe_commits,
            });
        }
        ui::display_replay_plan(plan);
    }

    fn replay(&mut self, plan: &ReplayPlan, config: &RunConfig) -> Result<ReleaseSummary> {
        let mut summary = ReleaseSummary {
            release_branch: config.release_branch.clone(),
            tags_without_commits: plan.tags_without_commits().to_vec(),
            ..ReleaseSummary::default()
        };

        let unit = match config.commit_order {
            CommitOrder::TagOrder => "Tags",
            CommitOrder::TimestampOrder => "Commits",
        };
        let mut progress = if self.show_progress {
            ProgressBar::new(plan.progress_total(), unit)
        } else {
            ProgressBar::hidden(plan.progress_total(), unit)
        };

        let mut picker = CherryPicker::new(self.repo, &mut *self.prompter, config.merge_parent);
        for group in plan.groups() {
            if let Some(tag) = &group.tag {
                info!(
                    "Cherry-picking {} commit(s) for tag {}",
                    group.commits.len(),
                    tag
                );
            }
            for commit in &group.commits {
                let outcome = picker.pick(commit)?;
                summary.record(&commit.hash, outcome);
            }
            progress.inc();
        }
        progress.finish();

        Ok(summary)
    }

    /// Best-effort restore; every failure here is only reported.
    fn rollback(&mut self, original_branch: &str, release_branch: &str) {
        warn!(
            "Rolling back: returning to {} and removing {}",
            original_branch, release_branch
        );

        match self.repo.cherry_pick_in_progress() {
            Ok(true) => {
                if let Err(e) = self.repo.cherry_pick_abort() {
                    warn!("Could not abort the cherry-pick in progress: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => warn!("Could not inspect repository state: {}", e),
        }

        if let Err(e) = self.repo.checkout(original_branch) {
            warn!("Could not check out {}: {}", original_branch, e);
        }

        let left_behind = match self.repo.branch_exists(release_branch) {
            Ok(false) => {
                debug!("Release branch {} was never created", release_branch);
                None
            }
            Ok(true) => match self.repo.delete_branch(release_branch, true) {
                Ok(()) => {
                    info!("Deleted release branch {}", release_branch);
                    None
                }
                Err(e) => Some(e.to_string()),
            },
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = left_behind {
            ui::display_boundary_warning(&BoundaryWarning::ReleaseBranchLeftBehind {
                branch: release_branch.to_string(),
                reason,
            });
        }
    }
}
