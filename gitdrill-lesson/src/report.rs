//! Serializable record of what a lesson run did.

use serde::Serialize;

use gitdrill_actor::{ActionReport, ActorError, Verb};
use gitdrill_core::{ActorName, ProjectName, RemoteDescriptor};

use crate::diff::FileDiff;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub success: bool,
    pub tolerated: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub diagnostic: String,
}

/// One verb performed during a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub verb: Verb,
    pub success: bool,
    pub commands: Vec<CommandReport>,
    /// Set when the verb failed before or instead of running the tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    pub(crate) fn from_action(report: &ActionReport) -> Self {
        Self {
            verb: report.verb,
            success: report.succeeded(),
            commands: report
                .steps
                .iter()
                .map(|step| CommandReport {
                    command: step.outcome.command.clone(),
                    exit_code: step.outcome.exit_code,
                    success: step.outcome.success,
                    tolerated: step.tolerated,
                    diagnostic: step.outcome.diagnostic().to_owned(),
                })
                .collect(),
            error: None,
        }
    }

    pub(crate) fn from_error(verb: Verb, err: &ActorError) -> Self {
        Self {
            verb,
            success: false,
            commands: Vec::new(),
            error: Some(err.to_string()),
        }
    }

    pub(crate) fn edited(success: bool) -> Self {
        Self {
            verb: Verb::Edit,
            success,
            commands: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub level: u32,
    pub description: String,
    pub commit_message: String,
    pub actor: ActorName,
    pub project: ProjectName,
    /// The actor cloned (or re-cloned) during this level.
    pub cloned: bool,
    pub steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<FileDiff>,
}

impl LevelReport {
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|step| step.success)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.success)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonReport {
    pub remote: RemoteDescriptor,
    pub remote_url: String,
    pub levels: Vec<LevelReport>,
}

impl LessonReport {
    pub fn succeeded(&self) -> bool {
        self.levels.iter().all(LevelReport::succeeded)
    }

    /// Number of levels with at least one failed step.
    pub fn failed_levels(&self) -> usize {
        self.levels.iter().filter(|level| !level.succeeded()).count()
    }
}
