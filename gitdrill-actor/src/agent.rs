//! Actor-facing verbs.
//!
//! An [`ActorAgent`] owns one [`ActorEnvironment`] and one
//! [`RepositoryHandle`] per cloned project. Each verb activates the
//! environment (home for `clone`, the working tree for everything else),
//! runs the VCS tool with that activation, and appends to the handle's
//! operation log.
//!
//! Tool failures come back as data in [`ActionReport`]; the caller decides
//! whether they matter.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use gitdrill_core::{paths, ActorName, ProjectName, RemoteDescriptor};

use crate::environment::{ActorEnvironment, Activation};
use crate::error::{io_err, ActorError};
use crate::handle::{RepositoryHandle, Verb};
use crate::recipe::{EditOutcome, Recipe};
use crate::vcs::{ToolOutcome, Vcs};

pub const ORIGIN: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";

// ---------------------------------------------------------------------------
// Action report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionStep {
    pub outcome: ToolOutcome,
    /// Failure of this step is expected and does not fail the action.
    pub tolerated: bool,
}

/// Ordered tool invocations performed by one verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub verb: Verb,
    pub steps: Vec<ActionStep>,
}

impl ActionReport {
    fn new(verb: Verb) -> Self {
        Self {
            verb,
            steps: Vec::new(),
        }
    }

    fn push(&mut self, outcome: ToolOutcome, tolerated: bool) {
        self.steps.push(ActionStep { outcome, tolerated });
    }

    pub fn succeeded(&self) -> bool {
        self.first_failure().is_none()
    }

    pub fn first_failure(&self) -> Option<&ToolOutcome> {
        self.steps
            .iter()
            .find(|step| !step.tolerated && !step.outcome.success)
            .map(|step| &step.outcome)
    }
}

// ---------------------------------------------------------------------------
// Collaborator capability set
// ---------------------------------------------------------------------------

/// Everything a simulated collaborator can do to a project.
pub trait Collaborator {
    fn name(&self) -> &ActorName;

    fn handle(&self, project: &ProjectName) -> Option<&RepositoryHandle>;

    /// Replace any existing clone of `remote` with a fresh one from `url`.
    fn clone_from(&mut self, remote: &RemoteDescriptor, url: &str)
        -> Result<ActionReport, ActorError>;

    fn apply_level_edit(
        &mut self,
        project: &ProjectName,
        recipe: Recipe,
    ) -> Result<EditOutcome, ActorError>;

    /// Stage `pathspecs`; an empty slice stages all changes.
    fn stage(&mut self, project: &ProjectName, pathspecs: &[&str])
        -> Result<ActionReport, ActorError>;

    fn commit(&mut self, project: &ProjectName, message: &str) -> Result<ActionReport, ActorError>;

    /// Point `origin` at `remote_url` and push `branch` with upstream tracking.
    fn push(
        &mut self,
        project: &ProjectName,
        remote_url: &str,
        branch: &str,
    ) -> Result<ActionReport, ActorError>;

    fn pull(&mut self, project: &ProjectName, branch: &str) -> Result<ActionReport, ActorError>;

    /// Create and switch to `name`.
    fn branch(&mut self, project: &ProjectName, name: &str) -> Result<ActionReport, ActorError>;

    /// Merge `name` into the current branch.
    fn merge(&mut self, project: &ProjectName, name: &str) -> Result<ActionReport, ActorError>;
}

// ---------------------------------------------------------------------------
// ActorAgent
// ---------------------------------------------------------------------------

pub struct ActorAgent {
    env: ActorEnvironment,
    repos: BTreeMap<ProjectName, RepositoryHandle>,
    vcs: Arc<dyn Vcs>,
}

impl ActorAgent {
    pub fn new(env: ActorEnvironment, vcs: Arc<dyn Vcs>) -> Self {
        Self {
            env,
            repos: BTreeMap::new(),
            vcs,
        }
    }

    pub fn environment(&self) -> &ActorEnvironment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut ActorEnvironment {
        &mut self.env
    }

    pub fn repositories(&self) -> &BTreeMap<ProjectName, RepositoryHandle> {
        &self.repos
    }

    /// Activate inside the project's working tree.
    fn activate_in(&mut self, project: &ProjectName) -> Result<Activation, ActorError> {
        let path = self
            .repos
            .get(project)
            .map(|handle| handle.local_path.clone())
            .ok_or_else(|| ActorError::UnknownProject {
                actor: self.env.name().clone(),
                project: project.clone(),
            })?;
        if !path.is_dir() {
            return Err(io_err(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "working tree is missing"),
            ));
        }
        self.env.activate(Some(&path))
    }

    fn run(&self, activation: &Activation, args: &[&str]) -> Result<ToolOutcome, ActorError> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        let outcome = self.vcs.run(activation, &args)?;
        tracing::debug!(
            actor = %self.env.name(),
            cwd = %activation.cwd.display(),
            exit = ?outcome.exit_code,
            success = outcome.success,
            "{}",
            outcome.command
        );
        Ok(outcome)
    }

    /// Run a sequence of subcommands in the project tree and log each one.
    fn run_in_project(
        &mut self,
        project: &ProjectName,
        verb: Verb,
        commands: &[(Vec<&str>, bool)],
    ) -> Result<ActionReport, ActorError> {
        let activation = self.activate_in(project)?;
        let mut report = ActionReport::new(verb);
        for (args, tolerated) in commands {
            let outcome = self.run(&activation, args)?;
            if let Some(handle) = self.repos.get_mut(project) {
                handle.record(verb, &outcome);
            }
            report.push(outcome, *tolerated);
        }
        Ok(report)
    }
}

impl Collaborator for ActorAgent {
    fn name(&self) -> &ActorName {
        self.env.name()
    }

    fn handle(&self, project: &ProjectName) -> Option<&RepositoryHandle> {
        self.repos.get(project)
    }

    fn clone_from(
        &mut self,
        remote: &RemoteDescriptor,
        url: &str,
    ) -> Result<ActionReport, ActorError> {
        // The tree is deleted below; it must be a direct child of the home.
        if !paths::is_plain_segment(remote.project.as_str()) {
            return Err(ActorError::UnsafeProjectName {
                project: remote.project.clone(),
            });
        }
        let activation = self.env.activate(None)?;
        let home = activation.cwd.as_path();
        std::fs::create_dir_all(home).map_err(|e| io_err(home, e))?;

        let local_path = paths::project_path(home, &remote.project);
        if local_path.exists() {
            tracing::info!(actor = %self.env.name(), path = %local_path.display(), "removing previous clone");
            std::fs::remove_dir_all(&local_path).map_err(|e| io_err(&local_path, e))?;
        }

        let target = local_path.display().to_string();
        let outcome = self.run(&activation, &["clone", url, target.as_str()])?;

        // Recorded even when the clone failed; the caller owns that policy.
        let mut handle = RepositoryHandle::new(remote.clone(), local_path);
        handle.record(Verb::Clone, &outcome);
        self.repos.insert(remote.project.clone(), handle);

        let mut report = ActionReport::new(Verb::Clone);
        report.push(outcome, false);
        Ok(report)
    }

    fn apply_level_edit(
        &mut self,
        project: &ProjectName,
        recipe: Recipe,
    ) -> Result<EditOutcome, ActorError> {
        let activation = self.activate_in(project)?;
        let path = activation.cwd.join(recipe.file_name());

        let before = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(io_err(&path, e)),
        };
        let after = recipe.apply(&before);
        std::fs::write(&path, &after).map_err(|e| io_err(&path, e))?;

        if let Some(handle) = self.repos.get_mut(project) {
            handle.record_edit(recipe, &path);
        }
        tracing::info!(actor = %self.env.name(), file = %path.display(), "applied {recipe}");
        Ok(EditOutcome {
            recipe,
            path,
            before,
            after,
        })
    }

    fn stage(
        &mut self,
        project: &ProjectName,
        pathspecs: &[&str],
    ) -> Result<ActionReport, ActorError> {
        let mut args = vec!["add"];
        if pathspecs.is_empty() {
            args.push("--all");
        } else {
            args.extend_from_slice(pathspecs);
        }
        self.run_in_project(project, Verb::Stage, &[(args, false)])
    }

    fn commit(&mut self, project: &ProjectName, message: &str) -> Result<ActionReport, ActorError> {
        self.run_in_project(project, Verb::Commit, &[(vec!["commit", "-m", message], false)])
    }

    fn push(
        &mut self,
        project: &ProjectName,
        remote_url: &str,
        branch: &str,
    ) -> Result<ActionReport, ActorError> {
        self.run_in_project(
            project,
            Verb::Push,
            &[
                (vec!["remote", "rm", ORIGIN], true),
                (vec!["remote", "add", ORIGIN, remote_url], false),
                (vec!["push", "-u", ORIGIN, branch], false),
            ],
        )
    }

    fn pull(&mut self, project: &ProjectName, branch: &str) -> Result<ActionReport, ActorError> {
        let args = vec!["pull", "--no-rebase", "--no-edit", ORIGIN, branch];
        self.run_in_project(project, Verb::Pull, &[(args, false)])
    }

    fn branch(&mut self, project: &ProjectName, name: &str) -> Result<ActionReport, ActorError> {
        self.run_in_project(project, Verb::Branch, &[(vec!["checkout", "-b", name], false)])
    }

    fn merge(&mut self, project: &ProjectName, name: &str) -> Result<ActionReport, ActorError> {
        self.run_in_project(project, Verb::Merge, &[(vec!["merge", "--no-edit", name], false)])
    }
}
