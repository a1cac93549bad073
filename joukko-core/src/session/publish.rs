//! Commit-and-push ladder shared by `pass` and `finish`

use super::state::{publish_machine, PublishPhase, StateMachine};
use crate::git::{CommitOptions, PushOptions, VersionControl};
use crate::prompt::Prompt;
use crate::{Error, Result};

/// Drives one commit and push of the session branch
pub(crate) struct Publisher<'a> {
    vcs: &'a dyn VersionControl,
    prompt: &'a dyn Prompt,
    remote: &'a str,
    branch: &'a str,
    flow: StateMachine<PublishPhase>,
}

impl<'a> Publisher<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        prompt: &'a dyn Prompt,
        remote: &'a str,
        branch: &'a str,
    ) -> Self {
        Self {
            vcs,
            prompt,
            remote,
            branch,
            flow: publish_machine(),
        }
    }

    pub fn phase(&self) -> PublishPhase {
        *self.flow.current_phase()
    }

    pub fn changes_checked(&mut self) -> Result<()> {
        self.flow.transition_to(PublishPhase::ChangesChecked)
    }

    /// Stop before committing anything
    pub fn abort_before_commit(&mut self) -> Result<()> {
        self.flow.transition_to(PublishPhase::AbortedPreCommit)
    }

    /// Stage everything, fold it into the previous commit and force push
    pub fn amend_and_push(&mut self) -> Result<PublishPhase> {
        self.flow.transition_to(PublishPhase::Amend)?;

        self.stage_changes()?;
        tracing::info!("Amending previous commit.");
        self.vcs.amend_last_commit()?;

        tracing::info!("Forcefully pushing local commits to remote.");
        if let Err(push_error) = self.push(PushOptions::forced()) {
            tracing::warn!("Failed to forcefully push to remote.");
            self.undo(|vcs| vcs.undo_amend())?;
            return Err(push_error);
        }

        self.flow.transition_to(PublishPhase::ForcePushed)?;
        Ok(self.phase())
    }

    /// Stage everything, commit with `message` and push
    ///
    /// A rejected push offers a forced push. Declining, or any push that
    /// fails for good, undoes the commit.
    pub fn commit_and_push(
        &mut self,
        message: &str,
        options: CommitOptions,
    ) -> Result<PublishPhase> {
        self.flow.transition_to(PublishPhase::NewCommit)?;

        self.stage_changes()?;
        tracing::info!("Creating new commit.");
        self.vcs.commit(message, options)?;

        tracing::info!("Pushing local commits to remote.");
        match self.push(PushOptions::normal()) {
            Ok(()) => {
                self.flow.transition_to(PublishPhase::Pushed)?;
                return Ok(self.phase());
            }
            Err(Error::PushRejected { .. }) => {
                self.flow.transition_to(PublishPhase::PushRejected)?;
            }
            Err(push_error) => {
                tracing::warn!("Failed to push to remote.");
                self.undo(|vcs| vcs.undo_last_commit())?;
                return Err(push_error);
            }
        }

        tracing::warn!(
            "Failed to push to remote. Remote might have been updated since taking the reins."
        );
        let use_force = match self.prompt.confirm("Would you like to force push?") {
            Ok(answer) => answer,
            Err(prompt_error) => {
                self.undo(|vcs| vcs.undo_last_commit())?;
                return Err(prompt_error);
            }
        };

        if !use_force {
            self.undo(|vcs| vcs.undo_last_commit())?;
            return Ok(self.phase());
        }

        tracing::info!("Forcefully pushing local commits to remote.");
        if let Err(force_error) = self.push(PushOptions::forced()) {
            tracing::warn!("Failed to force push to remote.");
            self.undo(|vcs| vcs.undo_last_commit())?;
            return Err(force_error);
        }

        self.flow.transition_to(PublishPhase::ForcePushed)?;
        Ok(self.phase())
    }

    fn stage_changes(&self) -> Result<()> {
        tracing::info!("Adding all changes to staging area.");
        self.vcs.stage_all()
    }

    fn push(&self, options: PushOptions) -> Result<()> {
        self.vcs.push(self.remote, self.branch, options)
    }

    fn undo(&mut self, revert: impl FnOnce(&dyn VersionControl) -> Result<()>) -> Result<()> {
        tracing::info!("Undoing latest commit.");
        revert(self.vcs).inspect_err(|e| {
            tracing::error!("Could not undo the latest commit: {}", e);
        })?;
        self.flow.transition_to(PublishPhase::Undone)
    }
}
