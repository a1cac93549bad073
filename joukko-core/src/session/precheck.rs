//! Precondition checks run before each operation touches anything

use super::Session;
use crate::descriptor::DescriptorStore;
use crate::{Error, Result};

fn failed(reason: impl Into<String>) -> Error {
    Error::Precondition(reason.into())
}

impl Session<'_> {
    /// Log the verdict of a check and pass its result through
    fn report<T>(&self, check: Result<T>) -> Result<T> {
        match &check {
            Ok(_) => tracing::info!("Pre-check OK"),
            Err(_) => tracing::warn!("Pre-check NOK"),
        }
        check
    }

    fn require_repository(&self) -> Result<()> {
        if self.vcs.is_repository() {
            Ok(())
        } else {
            Err(failed("Directory is not a git directory."))
        }
    }

    fn require_no_changes(&self) -> Result<()> {
        if self.vcs.status()?.has_changes() {
            return Err(failed("Changes found."));
        }
        Ok(())
    }

    pub(super) fn precheck_start(&self) -> Result<()> {
        self.report(
            self.require_repository()
                .and_then(|()| self.require_no_changes()),
        )
    }

    pub(super) fn precheck_take(&self) -> Result<()> {
        self.report(self.check_take())
    }

    /// Checks for `pass` and `finish`, returning the session branch
    pub(super) fn precheck_session_branch(&self) -> Result<(DescriptorStore, String)> {
        self.report(self.check_session_branch())
    }

    pub(super) fn precheck_rename(&self) -> Result<DescriptorStore> {
        self.report(self.check_rename())
    }

    fn check_take(&self) -> Result<()> {
        self.require_repository()?;
        self.require_no_changes()?;
        if self.vcs.status()?.has_untracked() {
            return Err(failed("Untracked files found."));
        }
        Ok(())
    }

    fn check_session_branch(&self) -> Result<(DescriptorStore, String)> {
        self.require_repository()?;
        let store = self.descriptor()?;
        if !store.has_valid_branch() {
            return Err(failed("Mob branch file not found."));
        }

        let branch = store.read()?;
        let current = self.vcs.current_branch()?;
        if current != branch {
            return Err(failed(format!(
                "Current branch '{}' is different from the mob branch '{}'.",
                current, branch
            )));
        }
        Ok((store, branch))
    }

    fn check_rename(&self) -> Result<DescriptorStore> {
        self.require_repository()?;
        if self.vcs.current_branch()? == self.vcs.default_branch()? {
            return Err(failed("Current branch is the default branch."));
        }

        let store = self.descriptor()?;
        if !store.has_valid_branch() {
            return Err(failed("Mob branch file not found."));
        }
        Ok(store)
    }
}
