//! Per-(actor, project) record of a cloned working tree.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use gitdrill_core::RemoteDescriptor;

use crate::recipe::Recipe;
use crate::vcs::ToolOutcome;

/// Actor-facing verb that produced an operation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Clone,
    Edit,
    Stage,
    Commit,
    Push,
    Pull,
    Branch,
    Merge,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Clone => "clone",
            Verb::Edit => "edit",
            Verb::Stage => "stage",
            Verb::Commit => "commit",
            Verb::Push => "push",
            Verb::Pull => "pull",
            Verb::Branch => "branch",
            Verb::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// One applied action, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRecord {
    pub at: DateTime<Utc>,
    pub verb: Verb,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryHandle {
    pub remote: RemoteDescriptor,
    pub local_path: PathBuf,
    pub operation_log: Vec<OperationRecord>,
}

impl RepositoryHandle {
    pub fn new(remote: RemoteDescriptor, local_path: PathBuf) -> Self {
        Self {
            remote,
            local_path,
            operation_log: Vec::new(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// True once the working tree holds a repository.
    pub fn is_checked_out(&self) -> bool {
        self.local_path.join(".git").exists()
    }

    pub fn record(&mut self, verb: Verb, outcome: &ToolOutcome) {
        self.operation_log.push(OperationRecord {
            at: Utc::now(),
            verb,
            command: outcome.command.clone(),
            exit_code: outcome.exit_code,
            success: outcome.success,
        });
    }

    pub fn record_edit(&mut self, recipe: Recipe, path: &Path) {
        self.operation_log.push(OperationRecord {
            at: Utc::now(),
            verb: Verb::Edit,
            command: format!("{recipe} -> {}", path.display()),
            exit_code: None,
            success: true,
        });
    }

    pub fn last_operation(&self) -> Option<&OperationRecord> {
        self.operation_log.last()
    }
}
