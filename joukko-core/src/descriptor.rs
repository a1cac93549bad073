//! Session descriptor file
//!
//! A single JSON file at the repository root, `{"branch": "<name>"}`,
//! names the branch the mob session lives on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Contents of the descriptor file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub branch: String,
}

/// Owner of the descriptor file of one repository
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    path: PathBuf,
}

impl DescriptorStore {
    /// Store for `file_name` under the repository root
    pub fn new(repo_root: &Path, file_name: &str) -> Self {
        Self {
            path: repo_root.join(file_name),
        }
    }

    /// Absolute path of the descriptor file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Whether the file exists, parses and names a non-empty branch
    pub fn has_valid_branch(&self) -> bool {
        self.read().is_ok()
    }

    /// Branch named by the descriptor
    pub fn read(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::DescriptorCorrupt(format!("{}: {}", self.path.display(), e))
        })?;

        parse_branch(&content)
            .ok_or_else(|| Error::DescriptorCorrupt(self.path.display().to_string()))
    }

    pub fn create(&self, branch: &str, silent: bool) -> Result<()> {
        let descriptor = SessionDescriptor {
            branch: branch.to_string(),
        };
        let json = serde_json::to_string(&descriptor)?;

        fs::write(&self.path, json).map_err(|e| {
            tracing::warn!(path = %self.path.display(), "Could not create mob branch file.");
            Error::Io(e)
        })?;

        if !silent {
            tracing::info!(branch = %branch, "Mob branch file created.");
        }
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path)?;
        tracing::debug!(path = %self.path.display(), "Mob branch file removed.");
        Ok(())
    }

    /// Point the descriptor at another branch
    pub fn rename(&self, new_branch: &str) -> Result<()> {
        if self.exists() {
            self.remove()?;
        }
        self.create(new_branch, true)
    }
}

/// Branch field of descriptor JSON, if present and non-blank
fn parse_branch(content: &str) -> Option<String> {
    let descriptor: SessionDescriptor = serde_json::from_str(content.trim()).ok()?;
    let branch = descriptor.branch.trim();
    if branch.is_empty() {
        None
    } else {
        Some(branch.to_string())
    }
}
