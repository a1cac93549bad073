//! Running the `git` binary

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Captured output of a successful git invocation
#[derive(Debug, Clone, Default)]
pub(crate) struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A git invocation that exited with a failure status
#[derive(Debug, Clone)]
pub(crate) struct GitFailure {
    /// The command line, for messages
    pub command: String,
    pub stderr: String,
}

impl GitFailure {
    pub fn into_error(self) -> Error {
        Error::Git(format!("{} failed: {}", self.command, self.stderr.trim()))
    }
}

/// Run `git <args>` in `root`
///
/// The outer error is for git not being runnable at all; the inner one
/// is a non-zero exit.
pub(crate) fn run_git(
    root: &Path,
    args: &[&str],
) -> Result<std::result::Result<GitOutput, GitFailure>> {
    let command = format!("git {}", args.join(" "));
    tracing::info!(git = %command, "{}", command);

    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Git("git executable not found. Is git installed?".to_string())
            } else {
                Error::Io(e)
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(Ok(GitOutput { stdout, stderr }))
    } else {
        tracing::debug!(git = %command, status = %output.status, stderr = %stderr.trim(), "git command failed");
        Ok(Err(GitFailure { command, stderr }))
    }
}

/// Run `git <args>` in `root`, treating a failure exit as an error
pub(crate) fn git(root: &Path, args: &[&str]) -> Result<GitOutput> {
    run_git(root, args)?.map_err(GitFailure::into_error)
}

/// Lines the remote sent back during a push (`remote: ...`)
pub(crate) fn remote_messages(stderr: &str) -> Vec<&str> {
    stderr
        .lines()
        .filter_map(|line| line.strip_prefix("remote:"))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether push stderr says the remote refused the update
pub(crate) fn is_push_rejection(stderr: &str) -> bool {
    stderr.contains("[rejected]")
        || stderr.contains("[remote rejected]")
        || stderr.contains("non-fast-forward")
        || stderr.contains("failed to push some refs")
}
