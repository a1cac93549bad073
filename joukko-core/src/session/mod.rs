//! Mob programming session operations
//!
//! Each operation runs a precondition check, asks the user what it needs,
//! and performs the git work. Operations never fail outward: every error
//! is logged and turned into [`Outcome::NotCompleted`].

mod finish;
mod pass;
mod precheck;
mod publish;
mod rename;
mod start;
mod state;
mod take;

pub use state::PublishPhase;

use crate::config::SessionConfig;
use crate::descriptor::DescriptorStore;
use crate::git::VersionControl;
use crate::prompt::{branch_options, Prompt, OTHER_OPTION};
use crate::reconcile::Reconciler;
use crate::{Error, Result};

/// Final status of an operation, with the line to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(String),
    NotCompleted(String),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Completed(message) | Outcome::NotCompleted(message) => message,
        }
    }
}

/// The session operations over one repository
pub struct Session<'a> {
    vcs: &'a dyn VersionControl,
    prompt: &'a dyn Prompt,
    config: &'a SessionConfig,
}

impl<'a> Session<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        prompt: &'a dyn Prompt,
        config: &'a SessionConfig,
    ) -> Self {
        Self {
            vcs,
            prompt,
            config,
        }
    }

    fn descriptor(&self) -> Result<DescriptorStore> {
        let root = self.vcs.repository_root()?;
        Ok(DescriptorStore::new(&root, &self.config.descriptor_file))
    }

    fn reconciler(&self) -> Reconciler<'a> {
        Reconciler::new(self.vcs, self.prompt)
    }

    /// Turn an operation result into its outcome, logging the reason
    fn conclude(&self, result: Result<String>, failure: &str, not_completed: &str) -> Outcome {
        match result {
            Ok(message) => {
                tracing::info!("{}", message);
                Outcome::Completed(message)
            }
            Err(e) if e.is_user_cancellation() || matches!(e, Error::Precondition(_)) => {
                tracing::warn!("{}", e);
                Outcome::NotCompleted(not_completed.to_string())
            }
            Err(e) => {
                tracing::error!("{}", failure);
                tracing::error!("{}", e);
                Outcome::NotCompleted(not_completed.to_string())
            }
        }
    }

    /// Ask for a branch name, offering the current branch as default
    fn ask_branch_name(&self) -> Result<String> {
        let current = self.vcs.current_branch()?;
        let default = Some(current.as_str()).filter(|c| !c.is_empty());
        self.prompt.input("Name for the mob branch", default)
    }

    fn confirm_start(&self, branch: &str) -> Result<()> {
        let question = format!("Start mob programming session on branch '{}'?", branch);
        if self.prompt.confirm(&question)? {
            Ok(())
        } else {
            Err(Error::Declined(format!(
                "Mob programming session not started on branch '{}'.",
                branch
            )))
        }
    }

    /// Let the user pick a remote branch, optionally typing another name
    fn choose_branch(
        &self,
        question: &str,
        show_other: bool,
        remote_refreshed: bool,
    ) -> Result<String> {
        if !remote_refreshed {
            self.vcs.refresh_remote_branches()?;
        }

        let options = branch_options(self.vcs.remote_branches()?, show_other);
        if options.is_empty() {
            return Err(Error::Precondition(format!(
                "No branches found in remote '{}'.",
                self.config.remote
            )));
        }

        let index = self.prompt.choose(question, &options)?;
        let chosen = options
            .get(index)
            .ok_or_else(|| Error::Prompt(format!("No option at index {}", index)))?;

        if show_other && chosen == OTHER_OPTION {
            let current = self.vcs.current_branch()?;
            let default = Some(current.as_str()).filter(|c| !c.is_empty());
            return self.prompt.input(question, default);
        }

        Ok(chosen.clone())
    }

    fn log_previous_commit(&self) -> Result<()> {
        let message = self.vcs.last_commit_message()?;
        tracing::info!("Previous commit message is '{}'", message);
        Ok(())
    }

    /// Put the descriptor back after a failed step, staging it again
    fn restore_descriptor(&self, store: &DescriptorStore, branch: &str) {
        if store.has_valid_branch() {
            return;
        }

        tracing::info!("Re-creating mob branch file.");
        let restored = store
            .create(branch, true)
            .and_then(|()| self.vcs.stage_file(store.path()));
        if let Err(e) = restored {
            tracing::error!("Could not re-create mob branch file: {}", e);
        }
    }
}
