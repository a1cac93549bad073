//! Working tree status

use git2::{Status, StatusOptions};

use super::repo::GitRepo;
use crate::{Error, Result};

/// Working tree change sets, as paths relative to the repository root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    /// Files newly added to the index
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
    pub renamed: Vec<String>,
    /// Files with any staged change
    pub staged: Vec<String>,
    pub conflicted: Vec<String>,
    /// Files git does not track yet
    pub untracked: Vec<String>,
}

impl RepoStatus {
    /// Whether there are uncommitted changes to tracked or staged files
    pub fn has_changes(&self) -> bool {
        [
            &self.conflicted,
            &self.created,
            &self.deleted,
            &self.modified,
            &self.renamed,
            &self.staged,
        ]
        .iter()
        .any(|files| !files.is_empty())
    }

    pub fn has_untracked(&self) -> bool {
        !self.untracked.is_empty()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicted.is_empty()
    }

    /// Whether the working tree is fully clean, untracked files included
    pub fn is_clean(&self) -> bool {
        !self.has_changes() && !self.has_untracked()
    }

    fn record(&mut self, path: String, status: Status) {
        if status.is_conflicted() {
            self.conflicted.push(path);
            return;
        }

        let staged = status.intersects(
            Status::INDEX_NEW
                | Status::INDEX_MODIFIED
                | Status::INDEX_DELETED
                | Status::INDEX_RENAMED
                | Status::INDEX_TYPECHANGE,
        );
        if staged {
            self.staged.push(path.clone());
        }

        if status.is_index_new() {
            self.created.push(path);
        } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
            self.deleted.push(path);
        } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
            self.renamed.push(path);
        } else if status.intersects(
            Status::INDEX_MODIFIED
                | Status::WT_MODIFIED
                | Status::INDEX_TYPECHANGE
                | Status::WT_TYPECHANGE,
        ) {
            self.modified.push(path);
        } else if status.is_wt_new() {
            self.untracked.push(path);
        }
    }
}

impl GitRepo {
    /// Collect the working tree status
    pub fn status(&self) -> Result<RepoStatus> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .renames_head_to_index(true);

        let statuses = self
            .inner()
            .statuses(Some(&mut options))
            .map_err(|e| Error::Git(format!("Failed to read status: {}", e)))?;

        let mut status = RepoStatus::default();
        for entry in statuses.iter() {
            if let Some(path) = entry.path() {
                status.record(path.to_string(), entry.status());
            }
        }

        Ok(status)
    }
}
