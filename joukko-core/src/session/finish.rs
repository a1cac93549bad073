//! `joukko finish`: close the session and push the final state

use super::publish::Publisher;
use super::{Outcome, Session};
use crate::descriptor::DescriptorStore;
use crate::git::CommitOptions;
use crate::{Error, Result};

const FINISHED: &str = "Mob programming session finished with joukko.";
const NOT_FINISHED: &str = "Mob programming session not finished.";

impl Session<'_> {
    /// Finish the session
    ///
    /// The descriptor is removed in the final commit. Whenever the finish
    /// does not go through, the descriptor is put back so `finish` can be
    /// run again.
    pub fn finish(&self) -> Outcome {
        tracing::info!("Finishing mob programming session with joukko.");
        let result = self.precheck_session_branch().and_then(|(store, branch)| {
            self.run_finish(&store, &branch)
                .inspect_err(|_| self.restore_descriptor(&store, &branch))
        });
        self.conclude(result, "Finishing the session failed.", NOT_FINISHED)
    }

    fn run_finish(&self, store: &DescriptorStore, branch: &str) -> Result<String> {
        self.log_previous_commit()?;

        let mut publisher = Publisher::new(self.vcs, self.prompt, &self.config.remote, branch);
        publisher.changes_checked()?;

        let question = if self.vcs.status()?.is_clean() {
            tracing::info!(
                "No uncommitted changes or untracked files found before mob branch file removal."
            );
            "Would you like to amend mob branch file removal to the previous commit?"
        } else {
            "Would you like to amend to the previous commit?"
        };

        let phase = if self.prompt.confirm(question)? {
            remove_descriptor(store)?;
            publisher.amend_and_push()?
        } else {
            let message = self
                .prompt
                .input("New commit message to finish the session", None)?;
            remove_descriptor(store)?;
            publisher.commit_and_push(&message, CommitOptions::normal())?
        };

        if !phase.is_success() {
            return Err(Error::Declined("Failed to push to remote.".to_string()));
        }
        Ok(FINISHED.to_string())
    }
}

fn remove_descriptor(store: &DescriptorStore) -> Result<()> {
    tracing::info!("Removing mob branch file.");
    store.remove()
}
