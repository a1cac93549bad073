//! `joukko pass`: hand the work over to the next driver

use super::publish::Publisher;
use super::{Outcome, Session};
use crate::git::CommitOptions;
use crate::{Error, Result};

const PASSED: &str = "Mob programming torch passed with joukko.";
const NOT_PASSED: &str = "Mob programming torch not passed.";

impl Session<'_> {
    /// Pass the torch: commit everything and push the session branch
    pub fn pass(&self) -> Outcome {
        tracing::info!("Passing the torch with joukko.");
        let result = self
            .precheck_session_branch()
            .and_then(|(_, branch)| self.run_pass(&branch));
        self.conclude(result, "Torch passing failed.", NOT_PASSED)
    }

    fn run_pass(&self, branch: &str) -> Result<String> {
        let mut publisher = Publisher::new(self.vcs, self.prompt, &self.config.remote, branch);
        publisher.changes_checked()?;

        let clean = self.vcs.status()?.is_clean();
        if clean {
            tracing::warn!("No changes or untracked files found.");
            if !self
                .prompt
                .confirm("Are you sure you want to pass the torch without any uncommitted changes?")?
            {
                publisher.abort_before_commit()?;
                return Err(Error::Declined(
                    "Torch not passed without changes.".to_string(),
                ));
            }
        }

        self.log_previous_commit()?;
        let phase = if self
            .prompt
            .confirm("Would you like to amend to the previous commit?")?
        {
            publisher.amend_and_push()?
        } else {
            let message = self
                .prompt
                .input("New commit message before passing the torch", None)?;
            let options = if clean {
                CommitOptions::allowing_empty()
            } else {
                CommitOptions::normal()
            };
            publisher.commit_and_push(&message, options)?
        };

        if !phase.is_success() {
            return Err(Error::Declined("Failed to push to remote.".to_string()));
        }
        Ok(PASSED.to_string())
    }
}
