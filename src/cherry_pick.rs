//! Per-commit cherry-pick with conflict handling
//!
//! Each commit runs through an explicit state machine:
//!
//! ```text
//! Attempting ──ok──────────────────────────────────────────────▶ Done(Applied)
//!     │ conflict
//!     ▼
//! Conflicted ─▶ AwaitingUserResolution ──conflicts left──┐
//!                    │        ▲                          │
//!                    │        └──────────────────────────┘
//!                    │ declined ─▶ Aborted
//!                    ▼ clean
//!               Continuing ──ok─────────────────────────────────▶ Done(Resolved)
//!                    │ empty ─▶ Skipped ─▶ Done(Skipped)
//!                    └ other ─▶ error
//! Attempting ─empty─▶ Skipped;  Attempting ─other─▶ Aborted ─▶ error
//! ```

use log::{debug, error, info, warn};

use crate::boundary::BoundaryWarning;
use crate::domain::Commit;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui::{self, Prompter};

const RESOLVE_PROMPT: &str =
    "Conflicts detected. Resolve them, stage the changes, then confirm to continue";

/// How git's failure output is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Conflict,
    Empty,
    Fatal,
}

/// Classify a failed cherry-pick by git's message.
///
/// "is now empty" wins over "conflict": git reports an empty pick as
/// "now empty, possibly due to conflict resolution".
pub fn classify_failure(message: &str) -> FailureKind {
    let message = message.to_lowercase();
    if message.contains("is now empty") {
        FailureKind::Empty
    } else if message.contains("conflict") {
        FailureKind::Conflict
    } else if message.contains("empty") {
        FailureKind::Empty
    } else {
        FailureKind::Fatal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The commit's changes are already on the branch
    Empty,
    /// Resolving the conflicts left nothing to commit
    EmptyAfterResolution,
}

/// Final result for a commit that did not fail the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Applied,
    /// Applied after the operator resolved conflicts
    Resolved,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickState {
    Attempting,
    Conflicted,
    AwaitingUserResolution,
    Continuing,
    Skipped(SkipReason),
    Aborted(String),
    Done(PickOutcome),
}

/// Replays commits one at a time onto the checked out branch
pub struct CherryPicker<'a, R: Repository + ?Sized, P: Prompter + ?Sized> {
    repo: &'a R,
    prompter: &'a mut P,
    merge_parent: u32,
}

impl<'a, R: Repository + ?Sized, P: Prompter + ?Sized> CherryPicker<'a, R, P> {
    pub fn new(repo: &'a R, prompter: &'a mut P, merge_parent: u32) -> Self {
        CherryPicker {
            repo,
            prompter,
            merge_parent,
        }
    }

    /// Cherry-pick one commit.
    ///
    /// Conflicts wait for the operator and empty picks are skipped. Returns
    /// an error when the pick is aborted or `--continue` fails for a reason
    /// other than an empty result; in the latter case the cherry-pick is
    /// left in progress.
    pub fn pick(&mut self, commit: &Commit) -> Result<PickOutcome> {
        let mut state = PickState::Attempting;
        loop {
            debug!("{}: {:?}", commit.short_hash(), state);
            state = match state {
                PickState::Done(outcome) => return Ok(outcome),
                other => self.step(commit, other)?,
            };
        }
    }

    fn step(&mut self, commit: &Commit, state: PickState) -> Result<PickState> {
        let next = match state {
            PickState::Attempting => match self.repo.cherry_pick(&commit.hash, self.merge_parent)
            {
                Ok(()) => {
                    info!("Successfully cherry-picked commit: {}", commit.hash);
                    PickState::Done(PickOutcome::Applied)
                }
                Err(err) => {
                    let message = err.to_string();
                    match classify_failure(&message) {
                        FailureKind::Conflict => PickState::Conflicted,
                        FailureKind::Empty => {
                            info!(
                                "No changes in {}, skipping empty cherry-pick",
                                commit.short_hash()
                            );
                            PickState::Skipped(SkipReason::Empty)
                        }
                        FailureKind::Fatal => {
                            error!("Error during cherry-pick: {}", message);
                            PickState::Aborted(message)
                        }
                    }
                }
            },
            PickState::Conflicted => {
                warn!("Conflict detected during cherry-pick of {}", commit.hash);
                let files = self.repo.conflicted_files()?;
                ui::display_conflict_instructions(commit, &files);
                PickState::AwaitingUserResolution
            }
            PickState::AwaitingUserResolution => {
                if !self.prompter.confirm(RESOLVE_PROMPT, true)? {
                    PickState::Aborted("conflict resolution declined".to_string())
                } else {
                    let remaining = self.repo.conflicted_files()?;
                    if remaining.is_empty() {
                        PickState::Continuing
                    } else {
                        ui::display_boundary_warning(&BoundaryWarning::ConflictsRemain {
                            commit_hash: commit.hash.clone(),
                            files: remaining,
                        });
                        PickState::AwaitingUserResolution
                    }
                }
            }
            PickState::Continuing => match self.repo.cherry_pick_continue() {
                Ok(()) => {
                    info!("Cherry-pick of {} completed after conflict resolution", commit.short_hash());
                    PickState::Done(PickOutcome::Resolved)
                }
                Err(err) if classify_failure(&err.to_string()) == FailureKind::Empty => {
                    info!("No changes left after conflict resolution, skipping this cherry-pick");
                    PickState::Skipped(SkipReason::EmptyAfterResolution)
                }
                Err(err) => return Err(err),
            },
            PickState::Skipped(reason) => {
                self.repo.cherry_pick_skip()?;
                PickState::Done(PickOutcome::Skipped(reason))
            }
            PickState::Aborted(message) => {
                // git refuses some picks (bad revision, dirty tree) without starting one
                match self.repo.cherry_pick_in_progress() {
                    Ok(true) => match self.repo.cherry_pick_abort() {
                        Ok(()) => error!("Cherry-pick of {} aborted", commit.hash),
                        Err(e) => warn!("Could not abort cherry-pick of {}: {}", commit.hash, e),
                    },
                    Ok(false) => debug!("No cherry-pick of {} in progress", commit.hash),
                    Err(e) => warn!("Could not inspect repository state: {}", e),
                }
                return Err(ReleaseError::cherry_pick(&commit.hash, message));
            }
            PickState::Done(outcome) => PickState::Done(outcome),
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::ui::ScriptedPrompter;
    use chrono::DateTime;

    const CONFLICT: &str = "error: could not apply abc1234... TICKET-1 change\n\
        hint: After resolving the conflicts, mark them with\n\
        CONFLICT (content): Merge conflict in src/lib.rs";
    const NOW_EMPTY: &str = "The previous cherry-pick is now empty, possibly due to conflict resolution.";

    fn commit(hash: &str) -> Commit {
        Commit::new(
            hash,
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
            format!("TICKET-1 {}", hash),
        )
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(classify_failure(CONFLICT), FailureKind::Conflict);
        assert_eq!(classify_failure(NOW_EMPTY), FailureKind::Empty);
        assert_eq!(classify_failure("nothing added, commit is EMPTY"), FailureKind::Empty);
        assert_eq!(
            classify_failure("fatal: bad revision 'deadbeef'"),
            FailureKind::Fatal
        );
    }

    #[test]
    fn test_clean_pick() {
        let repo = MockRepository::new("release");
        let mut prompter = ScriptedPrompter::default();
        let mut picker = CherryPicker::new(&repo, &mut prompter, 1);

        assert_eq!(picker.pick(&commit("a")).unwrap(), PickOutcome::Applied);
        assert_eq!(repo.applied(), vec!["a"]);
        assert_eq!(repo.calls(), vec!["cherry-pick -m 1 a"]);
    }

    #[test]
    fn test_merge_parent_is_passed_through() {
        let repo = MockRepository::new("release");
        let mut prompter = ScriptedPrompter::default();
        CherryPicker::new(&repo, &mut prompter, 2)
            .pick(&commit("m"))
            .unwrap();
        assert_eq!(repo.calls(), vec!["cherry-pick -m 2 m"]);
    }

    #[test]
    fn test_empty_pick_is_skipped_without_prompt() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("e", NOW_EMPTY);
        let mut prompter = ScriptedPrompter::default();

        let outcome = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("e"))
            .unwrap();

        assert_eq!(outcome, PickOutcome::Skipped(SkipReason::Empty));
        assert_eq!(repo.skipped(), vec!["e"]);
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_conflict_resolved_by_operator() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("c", CONFLICT);
        repo.report_conflicts(&["src/lib.rs"]);
        let mut prompter = ScriptedPrompter::new([""]);

        let outcome = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("c"))
            .unwrap();

        assert_eq!(outcome, PickOutcome::Resolved);
        assert_eq!(repo.applied(), vec!["c"]);
        assert_eq!(prompter.asked().len(), 1);
        assert!(repo.calls().contains(&"cherry-pick --continue".to_string()));
    }

    #[test]
    fn test_conflicts_remaining_prompts_again() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("c", CONFLICT);
        repo.report_conflicts(&["src/lib.rs"]);
        repo.report_conflicts(&["src/lib.rs"]);
        let mut prompter = ScriptedPrompter::new(["y", "y"]);

        let outcome = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("c"))
            .unwrap();

        assert_eq!(outcome, PickOutcome::Resolved);
        assert_eq!(prompter.asked().len(), 2);
        let continues = repo
            .calls()
            .iter()
            .filter(|c| *c == "cherry-pick --continue")
            .count();
        assert_eq!(continues, 1);
    }

    #[test]
    fn test_operator_declines_resolution() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("c", CONFLICT);
        let mut prompter = ScriptedPrompter::new(["n"]);

        let err = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("c"))
            .unwrap_err();

        assert!(matches!(err, ReleaseError::CherryPick { .. }));
        assert_eq!(repo.aborted(), vec!["c"]);
    }

    #[test]
    fn test_empty_after_resolution_is_skipped() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("c", CONFLICT);
        repo.fail_next_continue(NOW_EMPTY);
        let mut prompter = ScriptedPrompter::new([""]);

        let outcome = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("c"))
            .unwrap();

        assert_eq!(outcome, PickOutcome::Skipped(SkipReason::EmptyAfterResolution));
        assert_eq!(repo.skipped(), vec!["c"]);
    }

    #[test]
    fn test_continue_failure_propagates() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("c", CONFLICT);
        repo.fail_next_continue("error: unable to write new index file");
        let mut prompter = ScriptedPrompter::new([""]);

        let err = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("c"))
            .unwrap_err();

        assert!(err.to_string().contains("unable to write new index file"));
        assert!(repo.cherry_pick_in_progress().unwrap());
    }

    #[test]
    fn test_generic_failure_aborts_and_propagates() {
        let repo = MockRepository::new("release");
        repo.fail_cherry_pick("x", "fatal: bad object x");
        let mut prompter = ScriptedPrompter::default();

        let err = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("x"))
            .unwrap_err();

        match err {
            ReleaseError::CherryPick { commit, message } => {
                assert_eq!(commit, "x");
                assert!(message.contains("bad object"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(repo.aborted(), vec!["x"]);
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_rejected_pick_reports_its_own_failure() {
        let repo = MockRepository::new("release");
        repo.reject_cherry_pick("x", "fatal: bad revision 'x'");
        let mut prompter = ScriptedPrompter::default();

        let err = CherryPicker::new(&repo, &mut prompter, 1)
            .pick(&commit("x"))
            .unwrap_err();

        match err {
            ReleaseError::CherryPick { commit, message } => {
                assert_eq!(commit, "x");
                assert!(message.contains("bad revision"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!repo.calls().contains(&"cherry-pick --abort".to_string()));
        assert!(repo.aborted().is_empty());
    }
}
