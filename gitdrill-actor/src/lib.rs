//! # gitdrill-actor
//!
//! Simulated collaborators: isolated environments, the VCS seam, scripted
//! edits and the verbs that tie them together.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gitdrill_actor::{ActorAgent, ActorEnvironment, Collaborator, GitCli, Recipe};
//! use gitdrill_core::RemoteDescriptor;
//!
//! fn first_level() -> Result<(), gitdrill_actor::ActorError> {
//!     let remote = RemoteDescriptor::parse("alice/demo").expect("valid reference");
//!     let mut thor = ActorAgent::new(ActorEnvironment::new("thor")?, Arc::new(GitCli::default()));
//!     thor.clone_from(&remote, &remote.https_url)?;
//!     thor.apply_level_edit(&remote.project, Recipe::ScriptStub)?;
//!     thor.stage(&remote.project, &[])?;
//!     thor.commit(&remote.project, "Level 1")?;
//!     thor.push(&remote.project, &remote.https_url, "main")?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod environment;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod handle;
pub mod identity;
pub mod recipe;
pub mod vcs;

pub use agent::{ActionReport, ActionStep, ActorAgent, Collaborator, DEFAULT_BRANCH, ORIGIN};
pub use environment::{Activation, ActorEnvironment};
pub use error::ActorError;
pub use handle::{OperationRecord, RepositoryHandle, Verb};
pub use identity::{IdentityInstall, DEFAULT_SSH_CONFIG_TEMPLATE};
pub use recipe::{EditOutcome, Recipe, LESSON_FILE, NOTES_FILE};
pub use vcs::{GitCli, ToolOutcome, Vcs};
