//! Branch detection for git repositories

use git2::BranchType;

use super::repo::GitRepo;
use crate::{Error, Result};

/// Strip the remote name from a remote-tracking branch path
///
/// `origin/add-new-feature` becomes `add-new-feature`.
pub fn branch_name_from_remote_path<'a>(remote: &str, path: &'a str) -> &'a str {
    path.strip_prefix(remote)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

impl GitRepo {
    /// List the branches of one remote, without the remote prefix
    ///
    /// The remote's symbolic `HEAD` is not a branch and is left out.
    pub fn list_remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let mut branches = Vec::new();
        let prefix = format!("{}/", remote);

        for branch in self
            .inner()
            .branches(Some(BranchType::Remote))
            .map_err(|e| Error::Git(format!("Failed to list branches: {}", e)))?
        {
            let (branch, _) =
                branch.map_err(|e| Error::Git(format!("Failed to read branch: {}", e)))?;
            if let Some(name) = branch.name().ok().flatten() {
                if !name.starts_with(&prefix) {
                    continue;
                }
                let short = branch_name_from_remote_path(remote, name);
                if short != "HEAD" {
                    branches.push(short.to_string());
                }
            }
        }

        Ok(branches)
    }

    pub fn local_branch_exists(&self, name: &str) -> bool {
        self.inner().find_branch(name, BranchType::Local).is_ok()
    }

    pub fn remote_branch_exists(&self, remote: &str, name: &str) -> bool {
        self.inner()
            .find_branch(&format!("{}/{}", remote, name), BranchType::Remote)
            .is_ok()
    }

    /// Whether local `name` and `<remote>/name` point at the same commit
    ///
    /// False when either side is missing.
    pub fn tip_matches_remote(&self, remote: &str, name: &str) -> Result<bool> {
        let local = match self.inner().find_branch(name, BranchType::Local) {
            Ok(branch) => branch,
            Err(_) => return Ok(false),
        };
        let remote_branch = match self
            .inner()
            .find_branch(&format!("{}/{}", remote, name), BranchType::Remote)
        {
            Ok(branch) => branch,
            Err(_) => return Ok(false),
        };

        let local_tip = local
            .get()
            .peel_to_commit()
            .map_err(|e| Error::Git(format!("Failed to resolve {}: {}", name, e)))?;
        let remote_tip = remote_branch
            .get()
            .peel_to_commit()
            .map_err(|e| Error::Git(format!("Failed to resolve {}/{}: {}", remote, name, e)))?;

        Ok(local_tip.id() == remote_tip.id())
    }
}
