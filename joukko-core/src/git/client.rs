//! The real [`VersionControl`] implementation

use std::path::{Path, PathBuf};

use super::command::{git, is_push_rejection, remote_messages, run_git};
use super::repo::GitRepo;
use super::status::RepoStatus;
use super::{CommitOptions, PushOptions, VersionControl};
use crate::{Error, Result};

/// Git client rooted at a working directory
///
/// The repository is rediscovered for every call so that queries always
/// see the effect of the previous mutation.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    remote: String,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            remote: remote.into(),
        }
    }

    fn repo(&self) -> Result<GitRepo> {
        GitRepo::open(&self.workdir)
    }

    fn root(&self) -> Result<PathBuf> {
        Ok(self.repo()?.root().to_path_buf())
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        git(&self.root()?, args).map(|_| ())
    }
}

impl VersionControl for Git {
    fn is_repository(&self) -> bool {
        GitRepo::is_git_repo(&self.workdir)
    }

    fn repository_root(&self) -> Result<PathBuf> {
        self.root()
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.repo()?.current_branch()?.unwrap_or_default())
    }

    fn default_branch(&self) -> Result<String> {
        self.repo()?.default_branch(&self.remote)
    }

    fn branch_exists_locally(&self, name: &str) -> Result<bool> {
        Ok(self.repo()?.local_branch_exists(name))
    }

    fn branch_exists_remotely(&self, name: &str) -> Result<bool> {
        Ok(self.repo()?.remote_branch_exists(&self.remote, name))
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        self.repo()?.list_remote_branches(&self.remote)
    }

    fn is_in_sync_with_remote(&self, name: &str) -> Result<bool> {
        self.repo()?.tip_matches_remote(&self.remote, name)
    }

    fn refresh_remote_branches(&self) -> Result<()> {
        tracing::info!(remote = %self.remote, "Improving knowledge of remote branches.");
        let root = self.root()?;
        if let Err(failure) = run_git(&root, &["fetch", self.remote.as_str(), "--prune"])? {
            // Fetch failures are not fatal
            tracing::warn!(
                remote = %self.remote,
                "Could not refresh remote branches: {}",
                failure.stderr.trim()
            );
        }
        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.git(&["checkout", name])
    }

    fn checkout_new(&self, name: &str) -> Result<()> {
        self.git(&["branch", name])?;
        self.git(&["checkout", name])
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.git(&["branch", "-D", name])
    }

    fn rename_current_branch(&self, new_name: &str) -> Result<()> {
        self.git(&["branch", "-m", new_name])
    }

    fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A"])
    }

    fn stage_file(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy().into_owned();
        self.git(&["add", "--", path.as_str()])
    }

    fn commit(&self, message: &str, options: CommitOptions) -> Result<()> {
        let mut args = vec!["commit"];
        if options.allow_empty {
            args.push("--allow-empty");
        }
        args.extend(["-m", message]);
        self.git(&args)
    }

    fn amend_last_commit(&self) -> Result<()> {
        self.git(&["commit", "--amend", "--no-edit"])
    }

    fn last_commit_message(&self) -> Result<String> {
        self.repo()?.last_commit_message()
    }

    fn undo_last_commit(&self) -> Result<()> {
        self.git(&["reset", "HEAD~"])
    }

    fn undo_amend(&self) -> Result<()> {
        self.git(&["reset", "--soft", "HEAD@{1}"])
    }

    fn push(&self, remote: &str, branch: &str, options: PushOptions) -> Result<()> {
        let mut args = vec!["push"];
        if options.force {
            args.push("--force");
        }
        args.push(remote);
        args.push(branch);

        let root = self.root()?;
        match run_git(&root, &args)? {
            Ok(output) => {
                for message in remote_messages(&output.stderr) {
                    tracing::info!(remote = %remote, "{}", message);
                }
                Ok(())
            }
            Err(failure) if is_push_rejection(&failure.stderr) => Err(Error::PushRejected {
                branch: branch.to_string(),
                reason: failure.stderr.trim().to_string(),
            }),
            Err(failure) => Err(failure.into_error()),
        }
    }

    fn pull_rebase(&self, branch: &str) -> Result<()> {
        let root = self.root()?;
        let output = git(&root, &["pull", "--rebase", self.remote.as_str(), branch])?;
        tracing::debug!(branch = %branch, "{}", output.stdout.trim());
        Ok(())
    }

    fn abort_rebase(&self) -> Result<()> {
        self.git(&["rebase", "--abort"])
    }

    fn status(&self) -> Result<RepoStatus> {
        self.repo()?.status()
    }
}
