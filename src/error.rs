use thiserror::Error;

/// Unified error type for release-vr operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Command `git {command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Run was not confirmed")]
    NotConfirmed,

    #[error("Preparation failed while trying to {step}: {message}")]
    Preparation { step: String, message: String },

    #[error("Cherry-pick of {commit} failed: {message}")]
    CherryPick { commit: String, message: String },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience type alias for Results in release-vr
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a git command error from its arguments and captured output
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        ReleaseError::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Wrap a failure that happened while preparing branches
    pub fn preparation(step: impl Into<String>, source: &ReleaseError) -> Self {
        ReleaseError::Preparation {
            step: step.into(),
            message: source.to_string(),
        }
    }

    /// Create a cherry-pick error for the given commit
    pub fn cherry_pick(commit: impl Into<String>, message: impl Into<String>) -> Self {
        ReleaseError::CherryPick {
            commit: commit.into(),
            message: message.into(),
        }
    }

    /// Create a prompt error with context
    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    /// Process exit status for this error.
    ///
    /// Every failure, including a missing confirmation, exits with 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("release branch already exists");
        assert_eq!(
            err.to_string(),
            "Configuration error: release branch already exists"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_command_error_keeps_git_output() {
        let err = ReleaseError::command(
            "cherry-pick -m 1 abc123",
            "CONFLICT (content): Merge conflict in a.txt",
        );
        let msg = err.to_string();
        assert!(msg.contains("cherry-pick -m 1 abc123"));
        assert!(msg.contains("Merge conflict"));
    }

    #[test]
    fn test_preparation_wraps_source() {
        let source = ReleaseError::command("pull", "fatal: could not read from remote");
        let err = ReleaseError::preparation("pull base branch", &source);
        let msg = err.to_string();
        assert!(msg.starts_with("Preparation failed while trying to pull base branch"));
        assert!(msg.contains("could not read from remote"));
    }

    #[test]
    fn test_exit_codes() {
        let errors = vec![
            ReleaseError::NotConfirmed,
            ReleaseError::config("x"),
            ReleaseError::cherry_pick("abc", "boom"),
            ReleaseError::prompt("stdin closed"),
        ];

        for err in errors {
            assert_eq!(err.exit_code(), 1, "unexpected exit code for {}", err);
        }
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::cherry_pick("abc", "x"), "Cherry-pick of abc"),
            (ReleaseError::prompt("x"), "Prompt error"),
            (ReleaseError::command("fetch", "x"), "Command `git fetch`"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
