//! `joukko start`: open a session on a branch with a base commit

use super::{Outcome, Session};
use crate::descriptor::DescriptorStore;
use crate::git::CommitOptions;
use crate::{Error, Result};

const STARTED: &str = "Mob programming session started with joukko.";
const NOT_STARTED: &str = "Mob programming session not started.";

impl Session<'_> {
    /// Start a mob session
    ///
    /// Without a descriptor the session starts on a branch the user names.
    /// With one, the user may start elsewhere: on an existing branch, or on
    /// a new branch cut from a base branch picked from the remote.
    pub fn start(&self) -> Outcome {
        tracing::info!("Starting mob programming with joukko.");
        let result = self.precheck_start().and_then(|()| self.run_start());
        self.conclude(result, "Session starting failed.", NOT_STARTED)
    }

    fn run_start(&self) -> Result<String> {
        let store = self.descriptor()?;
        if store.has_valid_branch() {
            return self.start_elsewhere(&store);
        }

        let branch = self.ask_branch_name()?;
        self.confirm_start(&branch)?;
        self.reconciler().reconcile(&branch, false)?;
        self.start_on_current(&store, &branch)
    }

    fn start_elsewhere(&self, store: &DescriptorStore) -> Result<String> {
        tracing::warn!(
            "Mob branch file found. Mob programming session already started on current branch."
        );
        if !self
            .prompt
            .confirm("Would you like to start mob session on another branch?")?
        {
            let current = self.vcs.current_branch()?;
            return Err(Error::Declined(format!(
                "Mob programming session already started with current branch '{}'.",
                current
            )));
        }

        let branch = self.ask_branch_name()?;
        self.vcs.refresh_remote_branches()?;
        let exists = self.vcs.branch_exists_locally(&branch)?
            || self.vcs.branch_exists_remotely(&branch)?;
        if !exists {
            return self.start_on_new_branch(store, &branch);
        }

        self.confirm_start(&branch)?;
        self.reconciler().reconcile(&branch, true)?;
        self.start_on_current(store, &branch)
    }

    fn start_on_new_branch(&self, store: &DescriptorStore, branch: &str) -> Result<String> {
        tracing::info!("Branch '{}' not found. Creating new branch.", branch);
        let base = self.choose_branch(
            "Name of the base branch for the mob programming session branch",
            false,
            true,
        )?;

        let reconciler = self.reconciler();
        if self.vcs.current_branch()? == base {
            reconciler.update(&base, true)?;
        } else {
            reconciler.change_to_branch(&base, true)?;
        }

        let previous = if store.has_valid_branch() {
            tracing::warn!("Mob branch file with branch found on base branch '{}'.", base);
            let question = format!(
                "Rename branch in mob branch file and start mob programming session on branch '{}'?",
                branch
            );
            if !self.prompt.confirm(&question)? {
                return Err(Error::Declined(format!(
                    "Mob programming session not started on branch '{}'.",
                    branch
                )));
            }
            Some(store.read()?)
        } else {
            self.confirm_start(branch)?;
            None
        };

        let message = self.ask_base_commit_message()?;
        tracing::info!("Creating and checking out local branch '{}'.", branch);
        self.vcs.checkout_new(branch)?;
        self.commit_descriptor(store, branch, previous.as_deref(), &message)?;
        Ok(STARTED.to_string())
    }

    /// Create the descriptor on the checked out `branch` and commit it
    fn start_on_current(&self, store: &DescriptorStore, branch: &str) -> Result<String> {
        if store.has_valid_branch() {
            return Err(Error::Precondition(format!(
                "Mob branch file with branch found. Mob programming session has already been started with branch '{}'.",
                branch
            )));
        }

        let message = self.ask_base_commit_message()?;
        self.commit_descriptor(store, branch, None, &message)?;
        Ok(STARTED.to_string())
    }

    fn ask_base_commit_message(&self) -> Result<String> {
        self.prompt
            .input("Commit message for mob programming base commit", None)
    }

    /// Write the descriptor for `branch` and record it in the base commit
    ///
    /// `previous` is the branch an inherited descriptor named; it is put
    /// back if any step fails, otherwise the new file is removed.
    fn commit_descriptor(
        &self,
        store: &DescriptorStore,
        branch: &str,
        previous: Option<&str>,
        message: &str,
    ) -> Result<()> {
        let written = match previous {
            Some(_) => store.rename(branch),
            None => {
                tracing::info!("Creating mob branch file.");
                store.create(branch, false)
            }
        };
        if let Err(e) = written {
            self.revert_descriptor(store, previous, false);
            return Err(e);
        }

        tracing::info!("Adding mob branch file to git staging area.");
        if let Err(e) = self.vcs.stage_file(store.path()) {
            self.revert_descriptor(store, previous, false);
            return Err(e);
        }

        tracing::info!("Creating new commit.");
        if let Err(e) = self.vcs.commit(message, CommitOptions::normal()) {
            self.revert_descriptor(store, previous, true);
            return Err(e);
        }
        Ok(())
    }

    fn revert_descriptor(&self, store: &DescriptorStore, previous: Option<&str>, staged: bool) {
        tracing::info!("Reverting mob branch file.");
        let reverted = match previous {
            Some(previous) => store.rename(previous),
            None => store.remove(),
        };
        let reverted = if staged {
            reverted.and_then(|()| self.vcs.stage_file(store.path()))
        } else {
            reverted
        };

        if let Err(e) = reverted {
            tracing::error!("Could not revert mob branch file: {}", e);
        }
    }
}
