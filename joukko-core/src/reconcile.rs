//! Branch reconciliation
//!
//! Decides how to get onto a session branch: check it out locally, take a
//! fresh copy from the remote, or create it. A branch that exists in the
//! remote is always re-checked out from there, dropping any local copy, so
//! history rewritten by a teammate's force push never has to be merged.

use crate::git::VersionControl;
use crate::prompt::Prompt;
use crate::{Error, Result};

/// Reconciliation engine over a version control client
pub struct Reconciler<'a> {
    vcs: &'a dyn VersionControl,
    prompt: &'a dyn Prompt,
}

impl<'a> Reconciler<'a> {
    pub fn new(vcs: &'a dyn VersionControl, prompt: &'a dyn Prompt) -> Self {
        Self { vcs, prompt }
    }

    /// Get onto `target`, matching the remote copy when there is one
    ///
    /// `remote_refreshed` skips the fetch when the caller already did one.
    pub fn reconcile(&self, target: &str, remote_refreshed: bool) -> Result<()> {
        if !remote_refreshed {
            self.vcs.refresh_remote_branches()?;
        }

        if self.vcs.branch_exists_remotely(target)? {
            tracing::info!("Branch '{}' found in remote.", target);
            return self.re_checkout_from_remote(target);
        }

        tracing::warn!("Branch '{}' not found in remote.", target);
        if self.vcs.current_branch()? == target {
            tracing::info!("Already on branch '{}'.", target);
            return Ok(());
        }

        if self.vcs.branch_exists_locally(target)? {
            tracing::info!("Branch '{}' found locally. Checking it out.", target);
            self.vcs.checkout(target)
        } else {
            tracing::info!("Creating and checking out local branch '{}'.", target);
            self.vcs.checkout_new(target)
        }
    }

    /// Replace the local copy of `branch` with the remote one
    pub fn re_checkout_from_remote(&self, branch: &str) -> Result<()> {
        self.replace_local_copy(branch).inspect_err(|_| {
            tracing::error!("Could not re-checkout branch '{}'.", branch);
        })
    }

    fn replace_local_copy(&self, branch: &str) -> Result<()> {
        let is_current = self.vcs.current_branch()? == branch;

        // A checked out branch cannot be deleted
        if is_current {
            tracing::info!("Branch '{}' is the current branch.", branch);
            self.change_to_default_branch().map_err(|e| match e {
                Error::Precondition(_) => Error::DefaultBranchUnavailable {
                    branch: branch.to_string(),
                },
                other => other,
            })?;
        }

        if self.vcs.default_branch()? == branch {
            tracing::info!("Branch '{}' is the default branch. Keeping local copy.", branch);
        } else if is_current || self.vcs.branch_exists_locally(branch)? {
            tracing::info!("Removing local branch '{}'.", branch);
            self.vcs
                .delete_local_branch(branch)
                .map_err(|e| Error::BranchDeletionFailed {
                    branch: branch.to_string(),
                    reason: e.to_string(),
                })?;
        }

        tracing::info!("Checking out '{}' from remote.", branch);
        self.vcs.checkout(branch)
    }

    /// Bring `branch` up to date with a rebasing pull
    ///
    /// On a conflicted rebase the rebase is aborted and the user may
    /// replace the local branch with the remote copy; declining yields
    /// [`Error::Declined`]. Any other pull failure is returned unchanged.
    pub fn update(&self, branch: &str, remote_refreshed: bool) -> Result<()> {
        if !remote_refreshed {
            self.vcs.refresh_remote_branches()?;
        }

        if !self.vcs.branch_exists_remotely(branch)? {
            tracing::info!("Branch '{}' doesn't exist in remote. Not updating.", branch);
            return Ok(());
        }

        tracing::info!("Branch '{}' found in remote. Updating...", branch);
        let pull_error = match self.vcs.pull_rebase(branch) {
            Ok(()) => {
                tracing::info!("Branch '{}' updated.", branch);
                return Ok(());
            }
            Err(e) => e,
        };

        tracing::warn!("Encountered an error with the update.");
        if !self.vcs.status()?.has_conflicts() {
            tracing::error!("Branch update failed.");
            return Err(pull_error);
        }

        tracing::warn!("Files conflicted. Aborting update.");
        if let Err(abort_error) = self.vcs.abort_rebase() {
            tracing::warn!("Could not abort rebase.");
            return Err(Error::Reconciliation(format!(
                "rebase of '{}' left conflicts and could not be aborted: {} ({})",
                branch, abort_error, pull_error
            )));
        }
        tracing::info!("Rebase aborted");

        let replace = self.prompt.confirm(
            "Would you like to remove the current local branch and checkout from remote?",
        )?;
        if !replace {
            return Err(Error::Declined(
                "Not removing the local branch or checkout from remote".to_string(),
            ));
        }

        self.re_checkout_from_remote(branch)?;
        tracing::info!("Branch '{}' updated.", branch);
        Ok(())
    }

    /// Check out `branch` and bring it up to date
    pub fn change_to_branch(&self, branch: &str, remote_refreshed: bool) -> Result<()> {
        if branch.trim().is_empty() {
            return Err(Error::Precondition("Branch name is empty.".to_string()));
        }
        if self.vcs.current_branch()? == branch {
            return Err(Error::Precondition("Already on the branch.".to_string()));
        }

        tracing::info!("Checking out branch '{}'.", branch);
        self.vcs.checkout(branch)?;
        self.update(branch, remote_refreshed)
    }

    /// Check out the default branch
    pub fn change_to_default_branch(&self) -> Result<()> {
        let default_branch = self.vcs.default_branch()?;
        if default_branch.is_empty() {
            return Err(Error::Precondition("No default branch found.".to_string()));
        }
        if self.vcs.current_branch()? == default_branch {
            return Err(Error::Precondition(
                "Current branch is the default branch.".to_string(),
            ));
        }

        tracing::info!("Checking out the default branch '{}'.", default_branch);
        self.vcs.checkout(&default_branch)
    }
}
