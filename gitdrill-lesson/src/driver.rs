//! Level-by-level lesson state machine.
//!
//! Per level: select an actor, clone when it is level 1 or the actor has no
//! working tree yet, apply the level's edit, stage, commit, push, then wait
//! on the [`Acknowledge`] seam. Tool failures are settled by the configured
//! [`FailurePolicy`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use gitdrill_actor::{
    ActionReport, ActorAgent, ActorEnvironment, ActorError, Collaborator, IdentityInstall, Vcs,
    Verb,
};
use gitdrill_core::{ActorName, RemoteDescriptor};

use crate::acknowledge::Acknowledge;
use crate::config::{FailurePolicy, LessonConfig};
use crate::diff::edit_diff;
use crate::error::LessonError;
use crate::level::LessonLevel;
use crate::report::{LessonReport, LevelReport, StepReport};
use crate::selector::ActorSelector;

pub struct LessonDriver<A> {
    remote: RemoteDescriptor,
    remote_url: String,
    branch: String,
    policy: FailurePolicy,
    levels: Vec<LessonLevel>,
    roster: Vec<ActorName>,
    actors: BTreeMap<ActorName, ActorAgent>,
    selector: ActorSelector,
    acknowledge: A,
}

/// One agent per roster name, homed under `root` (or the process working
/// directory when `root` is `None`).
pub fn roster_agents(
    config: &LessonConfig,
    root: Option<&Path>,
    vcs: Arc<dyn Vcs>,
) -> Result<Vec<ActorAgent>, LessonError> {
    config
        .roster
        .iter()
        .map(|name| {
            let env = match root {
                Some(root) => ActorEnvironment::rooted(name.clone(), root)?,
                None => ActorEnvironment::new(name.clone())?,
            };
            Ok::<_, LessonError>(ActorAgent::new(env, vcs.clone()))
        })
        .collect()
}

impl<A: Acknowledge> LessonDriver<A> {
    /// Validate `config` and bind `agents` to its roster. Every roster name
    /// needs exactly one agent.
    pub fn new(
        remote: RemoteDescriptor,
        config: &LessonConfig,
        agents: Vec<ActorAgent>,
        selector: ActorSelector,
        acknowledge: A,
    ) -> Result<Self, LessonError> {
        config.validate()?;
        selector.check(&config.roster)?;

        let mut actors = BTreeMap::new();
        for agent in agents {
            let name = agent.name().clone();
            if !config.roster.contains(&name) {
                return Err(LessonError::UnknownActor(name));
            }
            if actors.insert(name.clone(), agent).is_some() {
                return Err(LessonError::InvalidRoster(format!("two agents named '{name}'")));
            }
        }
        if let Some(missing) = config.roster.iter().find(|n| !actors.contains_key(*n)) {
            return Err(LessonError::InvalidRoster(format!("no agent for '{missing}'")));
        }

        Ok(Self {
            remote_url: config.remote_url(&remote),
            remote,
            branch: config.branch().to_owned(),
            policy: config.policy,
            levels: config.lesson_levels()?,
            roster: config.roster.clone(),
            actors,
            selector,
            acknowledge,
        })
    }

    pub fn remote(&self) -> &RemoteDescriptor {
        &self.remote
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn roster(&self) -> &[ActorName] {
        &self.roster
    }

    pub fn levels(&self) -> &[LessonLevel] {
        &self.levels
    }

    pub fn actor(&self, name: &ActorName) -> Option<&ActorAgent> {
        self.actors.get(name)
    }

    pub fn acknowledger(&self) -> &A {
        &self.acknowledge
    }

    /// Install the ssh identity for every actor. Runs before any clone so a
    /// missing key aborts the lesson up front.
    pub fn configure_identities(
        &mut self,
        template: &str,
        private_key: &Path,
    ) -> Result<Vec<IdentityInstall>, LessonError> {
        if !private_key.is_file() {
            return Err(ActorError::KeyNotFound {
                path: private_key.to_path_buf(),
            }
            .into());
        }
        let host = self.remote.host.clone();
        let mut installs = Vec::with_capacity(self.actors.len());
        for agent in self.actors.values_mut() {
            installs.push(
                agent
                    .environment_mut()
                    .configure_identity(template, private_key, &host)?,
            );
        }
        Ok(installs)
    }

    /// Run every level in order.
    pub fn run(&mut self) -> Result<LessonReport, LessonError> {
        info!(
            remote = %self.remote,
            url = %self.remote_url,
            levels = self.levels.len(),
            "starting lesson"
        );
        let mut reports = Vec::with_capacity(self.levels.len());
        for level in self.levels.clone() {
            reports.push(self.run_level(&level)?);
        }
        Ok(LessonReport {
            remote: self.remote.clone(),
            remote_url: self.remote_url.clone(),
            levels: reports,
        })
    }

    /// Select an actor, perform `level` as that actor, then wait for the
    /// acknowledgement.
    pub fn run_level(&mut self, level: &LessonLevel) -> Result<LevelReport, LessonError> {
        let actor = self.selector.select(&self.roster)?;
        let report = self.perform_level(level, &actor)?;
        self.acknowledge.acknowledge(&report)?;
        Ok(report)
    }

    /// Perform `level` as `actor` without selecting or pausing.
    pub fn perform_level(
        &mut self,
        level: &LessonLevel,
        actor: &ActorName,
    ) -> Result<LevelReport, LessonError> {
        let policy = self.policy;
        let project = self.remote.project.clone();
        let agent = self
            .actors
            .get_mut(actor)
            .ok_or_else(|| LessonError::UnknownActor(actor.clone()))?;
        info!(level = level.number, actor = %actor, "{}", level.recipe.describe());

        let finish = |verb: Verb, result: Result<ActionReport, ActorError>| {
            settle(policy, level.number, actor, verb, result)
        };
        let mut steps = Vec::new();

        let cloned = level.number == 1 || agent.handle(&project).is_none();
        if cloned {
            steps.push(finish(Verb::Clone, agent.clone_from(&self.remote, &self.remote_url))?);
        }

        let mut diff = None;
        match agent.apply_level_edit(&project, level.recipe) {
            Ok(edit) => {
                diff = agent
                    .handle(&project)
                    .and_then(|handle| edit_diff(&edit, handle.local_path()));
                steps.push(StepReport::edited(true));
            }
            Err(err) => steps.push(absorb(policy, level.number, actor, Verb::Edit, err)?),
        }

        steps.push(finish(Verb::Stage, agent.stage(&project, &[]))?);
        steps.push(finish(Verb::Commit, agent.commit(&project, &level.commit_message))?);
        steps.push(finish(
            Verb::Push,
            agent.push(&project, &self.remote_url, &self.branch),
        )?);

        let report = LevelReport {
            level: level.number,
            description: level.recipe.describe().to_owned(),
            commit_message: level.commit_message.clone(),
            actor: actor.clone(),
            project,
            cloned,
            steps,
            diff,
        };
        info!(
            level = level.number,
            actor = %actor,
            succeeded = report.succeeded(),
            "level finished"
        );
        Ok(report)
    }
}

/// Apply the failure policy to one verb's result.
fn settle(
    policy: FailurePolicy,
    level: u32,
    actor: &ActorName,
    verb: Verb,
    result: Result<ActionReport, ActorError>,
) -> Result<StepReport, LessonError> {
    let report = match result {
        Ok(report) => report,
        Err(err) => return absorb(policy, level, actor, verb, err),
    };
    if let Some(failure) = report.first_failure() {
        if policy == FailurePolicy::Halt {
            return Err(LessonError::ExternalToolFailure {
                level,
                actor: actor.clone(),
                command: failure.command.clone(),
                exit_code: failure.exit_code,
                stderr: failure.stderr.trim_end().to_owned(),
            });
        }
        warn!(
            level,
            actor = %actor,
            %verb,
            exit = ?failure.exit_code,
            "{} failed: {}",
            failure.command,
            failure.diagnostic()
        );
    }
    Ok(StepReport::from_action(&report))
}

fn absorb(
    policy: FailurePolicy,
    level: u32,
    actor: &ActorName,
    verb: Verb,
    err: ActorError,
) -> Result<StepReport, LessonError> {
    if policy == FailurePolicy::Halt {
        return Err(err.into());
    }
    warn!(level, actor = %actor, %verb, "{err}");
    Ok(StepReport::from_error(verb, &err))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use gitdrill_actor::fake::RecordingVcs;
    use tempfile::TempDir;

    use super::*;
    use crate::acknowledge::AutoAcknowledge;

    fn agents(root: &Path, names: &[&str], vcs: &Arc<RecordingVcs>) -> Vec<ActorAgent> {
        names
            .iter()
            .map(|name| {
                let env = ActorEnvironment::with_baseline(*name, root, BTreeMap::new()).unwrap();
                ActorAgent::new(env, vcs.clone())
            })
            .collect()
    }

    fn config(names: &[&str]) -> LessonConfig {
        LessonConfig {
            roster: names.iter().map(|n| ActorName::from(*n)).collect(),
            ..LessonConfig::default()
        }
    }

    fn demo() -> RemoteDescriptor {
        RemoteDescriptor::parse("alice/demo").unwrap()
    }

    #[test]
    fn missing_agent_is_rejected() {
        let root = TempDir::new().unwrap();
        let vcs = Arc::new(RecordingVcs::default());
        let result = LessonDriver::new(
            demo(),
            &config(&["a", "b", "c"]),
            agents(root.path(), &["a", "b"], &vcs),
            ActorSelector::random(Some(1)),
            AutoAcknowledge,
        );
        assert!(matches!(result, Err(LessonError::InvalidRoster(m)) if m.contains("'c'")));
    }

    #[test]
    fn stray_agent_is_rejected() {
        let root = TempDir::new().unwrap();
        let vcs = Arc::new(RecordingVcs::default());
        let result = LessonDriver::new(
            demo(),
            &config(&["a", "b", "c"]),
            agents(root.path(), &["a", "b", "c", "z"], &vcs),
            ActorSelector::random(Some(1)),
            AutoAcknowledge,
        );
        assert!(matches!(result, Err(LessonError::UnknownActor(n)) if n.as_str() == "z"));
    }

    #[test]
    fn fixed_selector_outside_roster_is_rejected() {
        let root = TempDir::new().unwrap();
        let vcs = Arc::new(RecordingVcs::default());
        let result = LessonDriver::new(
            demo(),
            &config(&["a", "b", "c"]),
            agents(root.path(), &["a", "b", "c"], &vcs),
            ActorSelector::fixed("q"),
            AutoAcknowledge,
        );
        assert!(matches!(result, Err(LessonError::UnknownActor(_))));
    }

    #[test]
    fn settle_continue_records_failure() {
        let vcs = Arc::new(RecordingVcs::default().failing("push"));
        let root = TempDir::new().unwrap();
        let mut driver = LessonDriver::new(
            demo(),
            &config(&["a", "b", "c"]),
            agents(root.path(), &["a", "b", "c"], &vcs),
            ActorSelector::fixed("a"),
            AutoAcknowledge,
        )
        .unwrap();
        let level = driver.levels()[0].clone();
        let report = driver.perform_level(&level, &ActorName::from("a")).unwrap();
        assert!(!report.succeeded());
        let push = report.steps.last().unwrap();
        assert_eq!(push.verb, Verb::Push);
        assert!(!push.success);
        assert!(push.commands.iter().any(|c| c.diagnostic.contains("simulated failure")));
    }
}
