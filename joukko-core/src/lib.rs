//! Joukko Core - Mob programming sessions on top of git
//!
//! A mob session lives on one shared branch named by a descriptor file at
//! the repository root. Drivers `take` the reins, `pass` the torch by
//! committing and pushing, and the session is closed with `finish`.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod prompt;
pub mod reconcile;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{Config, SessionConfig};
pub use descriptor::DescriptorStore;
pub use error::{Error, Result};
pub use git::{CommitOptions, Git, GitRepo, PushOptions, RepoStatus, VersionControl};
pub use prompt::Prompt;
pub use reconcile::Reconciler;
pub use session::{Outcome, PublishPhase, Session};
