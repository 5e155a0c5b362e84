//! Error types for gitdrill-actor.

use std::path::PathBuf;

use thiserror::Error;

use gitdrill_core::{ActorName, ProjectName};

/// All errors that can arise from actor operations.
///
/// A non-zero exit of the VCS tool is *not* an error at this layer; it is
/// reported through [`ToolOutcome`](crate::vcs::ToolOutcome).
#[derive(Debug, Error)]
pub enum ActorError {
    /// Configured private key does not exist.
    #[error("private key not found at {path}")]
    KeyNotFound { path: PathBuf },

    /// Filesystem failure, with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The VCS binary could not be started at all.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// SSH config template failed to render.
    #[error("ssh config template error: {0}")]
    Template(#[from] tera::Error),

    /// A verb was invoked on a project the actor never cloned.
    #[error("actor '{actor}' has no clone of '{project}'")]
    UnknownProject { actor: ActorName, project: ProjectName },

    /// The project name would not resolve to a child of the actor's home.
    #[error("project name '{project}' does not name a directory inside the actor's home")]
    UnsafeProjectName { project: ProjectName },

    /// No edit recipe exists for the requested level.
    #[error("no edit recipe for level {0}")]
    UnknownLevel(u32),

    /// Process working directory could not be read.
    #[error("cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

/// Convenience constructor for [`ActorError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ActorError {
    ActorError::Io {
        path: path.into(),
        source,
    }
}
