//! `joukko take`: become the driver on the session branch

use super::{Outcome, Session};
use crate::Result;

const TAKEN: &str = "Mob Programming - Reins successfully taken with joukko.";
const NOT_TAKEN: &str = "Mob Programming - Reins not taken.";

impl Session<'_> {
    /// Take the reins
    ///
    /// The session branch comes from the descriptor, or from a pick among
    /// the remote branches when there is none. A branch that already
    /// matches its remote copy is left as it is.
    pub fn take(&self) -> Outcome {
        tracing::info!("Taking the reins with joukko.");
        let result = self.precheck_take().and_then(|()| self.run_take());
        self.conclude(result, "Taking the reins failed.", NOT_TAKEN)
    }

    fn run_take(&self) -> Result<String> {
        let store = self.descriptor()?;
        let branch = if store.has_valid_branch() {
            let branch = store.read()?;
            self.vcs.refresh_remote_branches()?;
            branch
        } else {
            self.choose_branch("Name for the mob branch", true, false)?
        };

        if self.vcs.current_branch()? == branch && self.vcs.is_in_sync_with_remote(&branch)? {
            tracing::info!("Branch '{}' is up to date with remote.", branch);
        } else {
            self.reconciler().reconcile(&branch, true)?;
        }

        if !store.has_valid_branch() {
            tracing::info!("Creating mob branch file.");
            store.create(&branch, false)?;
        }

        Ok(TAKEN.to_string())
    }
}
