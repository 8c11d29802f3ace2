use std::time::Duration;

/// Errors surfaced while running or interpreting `git`.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// The executable could not be started.
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        /// Executable that was invoked.
        binary: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Waiting on or reading from the child failed.
    #[error("failed to communicate with git: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The child did not finish within the configured timeout.
    #[error("git {command} timed out after {timeout:?}")]
    Timeout {
        /// Sub command that timed out.
        command: String,
        /// Configured timeout.
        timeout: Duration,
    },
    /// The child exited unsuccessfully.
    #[error("git {command} failed with status {code}: {stderr}")]
    Failed {
        /// Sub command that failed.
        command: String,
        /// Exit code or `terminated` when killed by a signal.
        code: String,
        /// Trimmed standard error output.
        stderr: String,
    },
    /// The output could not be interpreted.
    #[error("unexpected git output: {message}")]
    Parse {
        /// Description of what was malformed.
        message: String,
    },
}

impl GitError {
    /// Helper to construct a parse failure from any displayable message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Convenience result alias for git operations.
pub type GitResult<T> = std::result::Result<T, GitError>;
