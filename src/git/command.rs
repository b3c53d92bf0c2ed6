use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{ReleaseError, Result};

/// Runs the `git` binary inside a working tree.
///
/// Used for operations that must behave exactly like the porcelain:
/// network access with the user's credential setup, and cherry-picks that
/// stop on conflicts.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        GitCli {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run git with the given arguments and return its stdout.
    ///
    /// A non-zero exit becomes [ReleaseError::Command] holding stderr and
    /// stdout, so callers can inspect git's wording.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let command_line = args.join(" ");
        debug!("git {}", command_line);

        // `cherry-pick --continue` would otherwise open an editor
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .env("GIT_EDITOR", "true")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| ReleaseError::command(&command_line, format!("cannot run git: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = match (stderr.is_empty(), stdout.is_empty()) {
                (false, false) => format!("{}\n{}", stderr, stdout),
                (false, true) => stderr,
                (true, false) => stdout,
                (true, true) => format!(
                    "exited with code {}",
                    output.status.code().unwrap_or(-1)
                ),
            };
            return Err(ReleaseError::command(command_line, message));
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_runs() {
        let cli = GitCli::new(std::env::temp_dir());
        let out = cli.run(&["--version"]).unwrap();
        assert!(out.starts_with("git version"));
    }

    #[test]
    fn test_failure_carries_git_output() {
        let dir = tempfile::tempdir().unwrap();
        let cli = GitCli::new(dir.path());
        let err = cli.run(&["rev-parse", "--verify", "no-such-ref"]).unwrap_err();
        match err {
            ReleaseError::Command { command, message } => {
                assert_eq!(command, "rev-parse --verify no-such-ref");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
