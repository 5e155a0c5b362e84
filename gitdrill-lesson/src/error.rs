//! Error types for gitdrill-lesson.

use std::path::PathBuf;

use thiserror::Error;

use gitdrill_actor::ActorError;
use gitdrill_core::ActorName;

/// All errors that can arise while configuring or running a lesson.
#[derive(Debug, Error)]
pub enum LessonError {
    /// An actor verb failed outright (not a tool exit status).
    #[error(transparent)]
    Actor(#[from] ActorError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lesson YAML could not be parsed; includes the file path.
    #[error("failed to parse lesson config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    #[error("invalid level list: {0}")]
    InvalidLevels(String),

    #[error("actor '{0}' is not in the roster")]
    UnknownActor(ActorName),

    /// The VCS tool exited non-zero while the failure policy is `halt`.
    #[error("level {level}: '{command}' failed for actor '{actor}' (exit {exit}): {stderr}",
        exit = exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ExternalToolFailure {
        level: u32,
        actor: ActorName,
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Waiting for the operator failed.
    #[error("failed to read acknowledgement: {0}")]
    Acknowledge(#[source] std::io::Error),
}

/// Convenience constructor for [`LessonError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LessonError {
    LessonError::Io {
        path: path.into(),
        source,
    }
}
