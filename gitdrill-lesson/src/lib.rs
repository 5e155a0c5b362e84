//! # gitdrill-lesson
//!
//! Scripted multi-actor lessons.
//!
//! A [`LessonDriver`] walks an ordered list of [`LessonLevel`]s. For each
//! one it picks an actor with an [`ActorSelector`], has that actor clone,
//! edit, stage, commit and push, then blocks on an [`Acknowledge`] so the
//! operator can inspect the shared remote. The run produces a
//! [`LessonReport`].

pub mod acknowledge;
pub mod config;
pub mod diff;
pub mod driver;
pub mod error;
pub mod level;
pub mod report;
pub mod selector;
pub mod survey;

pub use acknowledge::{Acknowledge, AutoAcknowledge, StdinPrompt};
pub use config::{FailurePolicy, LessonConfig, LevelSpec};
pub use diff::{edit_diff, FileDiff};
pub use driver::{roster_agents, LessonDriver};
pub use error::LessonError;
pub use level::LessonLevel;
pub use report::{CommandReport, LessonReport, LevelReport, StepReport};
pub use selector::ActorSelector;
pub use survey::{survey, ActorSurvey, ProjectSurvey};
