//! Git repository detection and queries

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::{Error, Result};

/// A git repository wrapper providing the read-only queries joukko needs
pub struct GitRepo {
    /// The underlying git2 repository
    repo: Repository,
    /// Path to the repository root
    root: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// This will search upward from the given path to find the repository root.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::Precondition(format!(
                    "Not a git repository: {}. Run 'git init' first or navigate to a git repository.",
                    path.display()
                ))
            } else {
                Error::Git(e.to_string())
            }
        })?;

        let root = repo
            .workdir()
            .ok_or_else(|| Error::Precondition("Bare repositories are not supported".to_string()))?
            .to_path_buf();

        Ok(Self { repo, root })
    }

    /// Get the repository root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the given path is inside a git repository with a working tree
    pub fn is_git_repo(path: impl AsRef<Path>) -> bool {
        Repository::discover(path.as_ref())
            .map(|repo| !repo.is_bare())
            .unwrap_or(false)
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                // No commits yet: HEAD still names the branch to be born
                return Ok(self.unborn_branch_name());
            }
            Err(e) => return Err(Error::Git(format!("Failed to get HEAD: {}", e))),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            // Detached HEAD
            Ok(None)
        }
    }

    fn unborn_branch_name(&self) -> Option<String> {
        let head = self.repo.find_reference("HEAD").ok()?;
        head.symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(|s| s.to_string())
    }

    /// Get the default branch name
    ///
    /// Priority:
    /// 1. Target of `<remote>/HEAD`
    /// 2. `<remote>/main`, then `<remote>/master`
    /// 3. Local `main`, then local `master`
    ///
    /// Returns an empty string when none of these exist.
    pub fn default_branch(&self, remote: &str) -> Result<String> {
        let remote_prefix = format!("refs/remotes/{}/", remote);

        if let Ok(head) = self.repo.find_reference(&format!("{}HEAD", remote_prefix)) {
            if let Some(name) = head
                .symbolic_target()
                .and_then(|target| target.strip_prefix(&remote_prefix))
            {
                return Ok(name.to_string());
            }
        }

        for candidate in ["main", "master"] {
            if self
                .repo
                .find_reference(&format!("{}{}", remote_prefix, candidate))
                .is_ok()
            {
                return Ok(candidate.to_string());
            }
        }

        for candidate in ["main", "master"] {
            if self
                .repo
                .find_reference(&format!("refs/heads/{}", candidate))
                .is_ok()
            {
                return Ok(candidate.to_string());
            }
        }

        Ok(String::new())
    }

    /// Message of the HEAD commit, empty on an unborn branch
    pub fn last_commit_message(&self) -> Result<String> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(String::new()),
            Err(e) => return Err(Error::Git(format!("Failed to get HEAD: {}", e))),
        };

        let commit = head
            .peel_to_commit()
            .map_err(|e| Error::Git(format!("Failed to resolve HEAD: {}", e)))?;

        Ok(commit.message().unwrap_or("").trim().to_string())
    }

    /// Get access to the underlying git2 repository
    pub fn inner(&self) -> &Repository {
        &self.repo
    }
}
