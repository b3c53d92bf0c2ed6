use std::fmt;

use crate::domain::short_hash;

/// Non-fatal conditions met during a release run.
/// These are reported to the user but do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// History query for a tag returned nothing
    NoCommitsForTag { tag: String },
    /// The same commit was found under two tags
    DuplicateCommit {
        commit_hash: String,
        first_tag: String,
        repeated_tag: String,
        deduplicated: bool,
    },
    /// The operator confirmed but the index still has conflicts
    ConflictsRemain { commit_hash: String, files: Vec<String> },
    /// Rollback could not remove the release branch
    ReleaseBranchLeftBehind { branch: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoCommitsForTag { tag } => {
                write!(f, "No commits found for tag '{}', moving on", tag)
            }
            BoundaryWarning::DuplicateCommit {
                commit_hash,
                first_tag,
                repeated_tag,
                deduplicated,
            } => {
                write!(
                    f,
                    "Commit {} matches both '{}' and '{}'",
                    short_hash(commit_hash),
                    first_tag,
                    repeated_tag
                )?;
                if *deduplicated {
                    write!(f, " (picked once)")
                } else {
                    write!(f, " (will be picked twice)")
                }
            }
            BoundaryWarning::ConflictsRemain {
                commit_hash,
                files,
            } => {
                write!(
                    f,
                    "Conflicts still present while picking {}: {}",
                    short_hash(commit_hash),
                    files.join(", ")
                )
            }
            BoundaryWarning::ReleaseBranchLeftBehind { branch, reason } => {
                write!(
                    f,
                    "Release branch '{}' could not be deleted ({}). Please check if it still exists and delete it manually",
                    branch, reason
                )
            }
        }
    }
}
