//! Git operations for joukko
//!
//! The session logic talks to version control only through the
//! [`VersionControl`] trait. [`Git`] is the real implementation: git2 for
//! queries, the `git` binary for anything that mutates the repository.

mod branch;
mod client;
mod command;
mod repo;
mod status;

use std::path::{Path, PathBuf};

use crate::Result;

pub use client::Git;
pub use repo::GitRepo;
pub use status::RepoStatus;

/// Options for a new commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Record the commit even when nothing is staged
    pub allow_empty: bool,
}

impl CommitOptions {
    /// Commit of the staged changes; fails when there are none
    pub fn normal() -> Self {
        Self { allow_empty: false }
    }

    /// Commit that may carry no changes
    pub fn allowing_empty() -> Self {
        Self { allow_empty: true }
    }
}

/// Options for a push
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// Overwrite the remote branch even if it is not an ancestor
    pub force: bool,
}

impl PushOptions {
    /// Plain fast-forward push
    pub fn normal() -> Self {
        Self { force: false }
    }

    /// Forced push
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Version control capabilities the session operations rely on
///
/// Remote-branch queries refer to the remote the implementation was
/// configured with.
pub trait VersionControl {
    /// Whether the working directory is inside a repository
    fn is_repository(&self) -> bool;

    /// Absolute path of the working tree root
    fn repository_root(&self) -> Result<PathBuf>;

    /// Name of the checked out branch, empty on a detached or unborn HEAD
    fn current_branch(&self) -> Result<String>;

    /// Target of the remote HEAD, empty when it cannot be determined
    fn default_branch(&self) -> Result<String>;

    fn branch_exists_locally(&self, name: &str) -> Result<bool>;

    fn branch_exists_remotely(&self, name: &str) -> Result<bool>;

    /// Remote branch names without the remote prefix
    fn remote_branches(&self) -> Result<Vec<String>>;

    /// Whether the local branch points at the same commit as its remote copy
    fn is_in_sync_with_remote(&self, name: &str) -> Result<bool>;

    /// Fetch and prune remote-tracking branches
    fn refresh_remote_branches(&self) -> Result<()>;

    fn checkout(&self, name: &str) -> Result<()>;

    /// Create a local branch from HEAD and check it out
    fn checkout_new(&self, name: &str) -> Result<()>;

    fn delete_local_branch(&self, name: &str) -> Result<()>;

    fn rename_current_branch(&self, new_name: &str) -> Result<()>;

    fn stage_all(&self) -> Result<()>;

    fn stage_file(&self, path: &Path) -> Result<()>;

    fn commit(&self, message: &str, options: CommitOptions) -> Result<()>;

    fn amend_last_commit(&self) -> Result<()>;

    /// Message of the HEAD commit, empty if there is none
    fn last_commit_message(&self) -> Result<String>;

    /// Drop the HEAD commit, keeping its changes in the working tree
    fn undo_last_commit(&self) -> Result<()>;

    /// Restore HEAD to what it was before the last amend
    fn undo_amend(&self) -> Result<()>;

    fn push(&self, remote: &str, branch: &str, options: PushOptions) -> Result<()>;

    fn pull_rebase(&self, branch: &str) -> Result<()>;

    fn abort_rebase(&self) -> Result<()>;

    fn status(&self) -> Result<RepoStatus>;
}
