//! Core library for the git gutter editor integration.
//!
//! The crate is layered around three responsibilities:
//! - deciding per view whether change tracking is active ([`command`])
//! - talking to git and classifying buffer lines ([`handler`], [`diff`])
//! - presenting changes through the host ([`show_diff`], [`goto`],
//!   [`compare`], [`popup`])

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Umbrella command: enablement gate and action dispatcher.
pub mod command;
/// Comparison target selection actions.
pub mod compare;
/// Line classification between reference content and buffer.
pub mod diff;
/// Host lifecycle event flags.
pub mod events;
/// Change navigation actions.
pub mod goto;
/// Per-view git association.
pub mod handler;
/// Diff popup action.
pub mod popup;
/// Work tree discovery.
pub mod repository;
/// User configuration.
pub mod settings;
/// Gutter rendering.
pub mod show_diff;
/// Directly bindable per-action commands.
pub mod wrappers;

pub use command::{
    disabled_message, Action, DisabledReason, EnablementState, GitGutterCommand, Kwargs, RunArgs,
};
pub use events::Events;
pub use settings::{Settings, ViewSettings};
pub use wrappers::WrapperCommand;

pub use gutter_api::{CompareTarget, DiffHunk, DiffResult, LineStats, RegionKind, RevisionEntry};
pub use gutter_host_api::{MemoryView, QuickPanelItem, View};

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying libgit2 operation failed.
    #[error("git error: {source}")]
    Git {
        /// Original libgit2 error bubbled up by the core library.
        #[from]
        source: git2::Error,
    },
    /// Running the git executable failed.
    #[error("git command error: {source}")]
    GitCommand {
        /// Error reported by the process wrapper.
        #[from]
        source: gutter_git::GitError,
    },
    /// Provided path does not belong to a git repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Bare repositories have no working tree to track.
    #[error("repository at {path} is bare and unsupported")]
    BareRepository {
        /// Path of the repository lacking a working tree.
        path: String,
    },
    /// The view's file has no known working tree.
    #[error("file is not in a working tree: {path}")]
    NoWorkTree {
        /// File name of the view, or `untitled`.
        path: String,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// A settings file could not be parsed.
    #[error("invalid settings in {path}: {source}")]
    Settings {
        /// Settings file that failed to parse.
        path: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The host rejected an operation.
    #[error("host error: {source}")]
    Host {
        /// Error reported by the host.
        #[from]
        source: gutter_host_api::HostError,
    },
}
