//! Error types for joukko

use thiserror::Error;

/// Result type alias for joukko operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for joukko operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A git invocation or repository query failed
    #[error("Git error: {0}")]
    Git(String),

    /// An operation's precondition did not hold
    #[error("{0}")]
    Precondition(String),

    /// The user answered "no" to a gating question
    #[error("{0}")]
    Declined(String),

    /// Branch topology could not be brought into the desired state
    #[error("Reconciliation failed: {0}")]
    Reconciliation(String),

    /// Local copy of a branch could not be removed
    #[error("Could not remove local branch '{branch}': {reason}")]
    BranchDeletionFailed { branch: String, reason: String },

    /// The default branch is missing or is the branch being vacated
    #[error("Default branch unavailable for leaving branch '{branch}'")]
    DefaultBranchUnavailable { branch: String },

    /// A publish step was attempted out of order
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Remote refused the push
    #[error("Push to '{branch}' rejected: {reason}")]
    PushRejected { branch: String, reason: String },

    /// Descriptor file is missing, unparseable or has no branch
    #[error("Could not read branch from descriptor file: {0}")]
    DescriptorCorrupt(String),

    /// Branch name is already taken
    #[error("Branch '{0}' already exists.")]
    BranchExists(String),

    /// Reading an answer from the user failed
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is the user backing out rather than a failure
    pub fn is_user_cancellation(&self) -> bool {
        matches!(self, Error::Declined(_))
    }
}
