//! Thin wrapper around the `git` executable.
//!
//! Every query runs `git` as a child process with a bounded lifetime and
//! parses its machine-readable output.

mod cli;
mod error;
mod status;
mod version;

pub use cli::{GitCli, DEFAULT_TIMEOUT};
pub use error::{GitError, GitResult};
pub use status::{FileState, GitStatus};
pub use version::GitVersion;
