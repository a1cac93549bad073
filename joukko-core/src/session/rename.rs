//! `joukko rename`: rename the session branch and its descriptor

use super::{Outcome, Session};
use crate::descriptor::DescriptorStore;
use crate::{Error, Result};

const NOT_RENAMED: &str = "Local joukko branch not renamed.";

impl Session<'_> {
    pub fn rename(&self) -> Outcome {
        tracing::info!("Renaming current local mob programming branch.");
        let result = self.precheck_rename().and_then(|store| self.run_rename(&store));
        self.conclude(result, "Renaming the mob branch failed.", NOT_RENAMED)
    }

    fn run_rename(&self, store: &DescriptorStore) -> Result<String> {
        let new_name = self.prompt.input("New name for the mob branch", None)?;

        self.vcs.refresh_remote_branches()?;
        if self.vcs.branch_exists_locally(&new_name)? || self.vcs.branch_exists_remotely(&new_name)?
        {
            return Err(Error::BranchExists(new_name));
        }

        self.vcs.rename_current_branch(&new_name)?;
        // The branch is already renamed; a failed rewrite is reported as is
        store.rename(&new_name)?;

        Ok(format!("Local joukko branch renamed to '{}'.", new_name))
    }
}
