//! Per-actor isolated process context.
//!
//! An [`ActorEnvironment`] never mutates the real process environment.
//! [`ActorEnvironment::activate`] instead produces an [`Activation`]: the
//! working directory and full environment map that a single external-tool
//! invocation must run with. Two actors can therefore never observe each
//! other's HOME, regardless of call ordering.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use gitdrill_core::{paths, ActorName};

use crate::error::ActorError;

/// Ambient variables that would point the VCS tool at the operator's own
/// repositories or configuration instead of the actor's.
const SCRUBBED_VARS: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_CONFIG_GLOBAL",
    "XDG_CONFIG_HOME",
];

/// Email domain for the per-actor commit identity.
pub const IDENTITY_DOMAIN: &str = "gitdrill.local";

/// Explicit invocation context for one external-tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub actor: ActorName,
    pub cwd: PathBuf,
    pub envs: BTreeMap<String, String>,
}

impl Activation {
    pub fn home(&self) -> Option<&str> {
        self.envs.get("HOME").map(String::as_str)
    }
}

/// One actor's isolated home directory and private environment.
#[derive(Debug, Clone)]
pub struct ActorEnvironment {
    name: ActorName,
    /// `None` follows the process working directory on every query.
    root: Option<PathBuf>,
    baseline: BTreeMap<String, String>,
    current_directory: Option<PathBuf>,
    ssh_identity_path: Option<PathBuf>,
}

impl ActorEnvironment {
    /// Environment rooted at the process working directory
    /// (`<cwd>/home/<name>`), captured from the ambient environment.
    pub fn new(name: impl Into<ActorName>) -> Result<Self, ActorError> {
        Self::build(name.into(), None, ambient_env())
    }

    /// Environment pinned to an explicit lesson root.
    pub fn rooted(name: impl Into<ActorName>, root: impl Into<PathBuf>) -> Result<Self, ActorError> {
        Self::build(name.into(), Some(root.into()), ambient_env())
    }

    /// Environment pinned to `root` with an explicit baseline instead of the
    /// ambient one.
    pub fn with_baseline(
        name: impl Into<ActorName>,
        root: impl Into<PathBuf>,
        baseline: BTreeMap<String, String>,
    ) -> Result<Self, ActorError> {
        Self::build(name.into(), Some(root.into()), baseline)
    }

    fn build(
        name: ActorName,
        root: Option<PathBuf>,
        mut baseline: BTreeMap<String, String>,
    ) -> Result<Self, ActorError> {
        for var in SCRUBBED_VARS {
            baseline.remove(*var);
        }
        let mut env = Self {
            name,
            root,
            baseline,
            current_directory: None,
            ssh_identity_path: None,
        };
        let home = env.home_directory()?;
        env.baseline
            .insert("HOME".to_owned(), home.display().to_string());
        Ok(env)
    }

    pub fn name(&self) -> &ActorName {
        &self.name
    }

    /// Lesson root: the pinned root, or the process working directory now.
    pub fn root(&self) -> Result<PathBuf, ActorError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(ActorError::WorkingDirectory),
        }
    }

    /// `<root>/home/<name>`, recomputed on every call.
    pub fn home_directory(&self) -> Result<PathBuf, ActorError> {
        Ok(paths::actor_home(&self.root()?, &self.name))
    }

    /// Directory of the most recent activation, or the home directory.
    pub fn current_directory(&self) -> Result<PathBuf, ActorError> {
        match &self.current_directory {
            Some(dir) => Ok(dir.clone()),
            None => self.home_directory(),
        }
    }

    pub fn ssh_identity_path(&self) -> Option<&Path> {
        self.ssh_identity_path.as_deref()
    }

    /// Private copy of the environment captured at construction.
    pub fn baseline(&self) -> &BTreeMap<String, String> {
        &self.baseline
    }

    pub(crate) fn set_ssh_identity(&mut self, key: PathBuf) {
        self.ssh_identity_path = Some(key);
    }

    /// Build the invocation context for this actor in `dir` (default: home).
    ///
    /// Only one field of `self` changes: the recorded current directory.
    /// Repeated calls with the same input return equal activations.
    pub fn activate(&mut self, dir: Option<&Path>) -> Result<Activation, ActorError> {
        let home = self.home_directory()?;
        let cwd = dir.map(Path::to_path_buf).unwrap_or_else(|| home.clone());

        let mut envs = self.baseline.clone();
        envs.insert("HOME".to_owned(), home.display().to_string());
        envs.insert("GIT_TERMINAL_PROMPT".to_owned(), "0".to_owned());

        let email = format!("{}@{IDENTITY_DOMAIN}", self.name);
        for (key, value) in [
            ("GIT_AUTHOR_NAME", self.name.0.as_str()),
            ("GIT_AUTHOR_EMAIL", email.as_str()),
            ("GIT_COMMITTER_NAME", self.name.0.as_str()),
            ("GIT_COMMITTER_EMAIL", email.as_str()),
        ] {
            envs.insert(key.to_owned(), value.to_owned());
        }

        // ssh resolves ~/.ssh from the passwd entry, not $HOME.
        if let Some(key) = &self.ssh_identity_path {
            envs.insert(
                "GIT_SSH_COMMAND".to_owned(),
                format!(
                    "ssh -F {} -i {} -o IdentitiesOnly=yes",
                    shell_quote(&paths::ssh_config_path(&home)),
                    shell_quote(key)
                ),
            );
        }

        tracing::debug!(actor = %self.name, cwd = %cwd.display(), "activate");
        self.current_directory = Some(cwd.clone());
        Ok(Activation {
            actor: self.name.clone(),
            cwd,
            envs,
        })
    }
}

fn ambient_env() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn baseline() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("PATH".to_owned(), "/usr/bin".to_owned()),
            ("HOME".to_owned(), "/home/operator".to_owned()),
            ("GIT_DIR".to_owned(), "/somewhere/.git".to_owned()),
        ])
    }

    #[test]
    fn home_is_root_home_name() {
        let root = TempDir::new().unwrap();
        let env = ActorEnvironment::with_baseline("thor", root.path(), baseline()).unwrap();
        assert_eq!(env.home_directory().unwrap(), root.path().join("home").join("thor"));
    }

    #[test]
    fn construction_overrides_private_home_only() {
        let root = TempDir::new().unwrap();
        let env = ActorEnvironment::with_baseline("thor", root.path(), baseline()).unwrap();
        let home = env.home_directory().unwrap().display().to_string();
        assert_eq!(env.baseline().get("HOME"), Some(&home));
        assert_eq!(env.baseline().get("PATH").map(String::as_str), Some("/usr/bin"));
        assert!(!env.baseline().contains_key("GIT_DIR"), "GIT_DIR must be scrubbed");
    }

    #[test]
    fn current_directory_defaults_to_home() {
        let root = TempDir::new().unwrap();
        let env = ActorEnvironment::with_baseline("thor", root.path(), baseline()).unwrap();
        assert_eq!(env.current_directory().unwrap(), env.home_directory().unwrap());
    }

    #[test]
    fn activate_is_idempotent() {
        let root = TempDir::new().unwrap();
        let mut env = ActorEnvironment::with_baseline("thor", root.path(), baseline()).unwrap();
        let dir = root.path().join("home/thor/demo");

        let first = env.activate(Some(&dir)).unwrap();
        let state_after_first = env.current_directory().unwrap();
        let second = env.activate(Some(&dir)).unwrap();

        assert_eq!(first, second);
        assert_eq!(env.current_directory().unwrap(), state_after_first);
        assert_eq!(second.cwd, dir);
    }

    #[test]
    fn activation_carries_actor_identity() {
        let root = TempDir::new().unwrap();
        let mut env = ActorEnvironment::with_baseline("hulk", root.path(), baseline()).unwrap();
        let activation = env.activate(None).unwrap();

        assert_eq!(activation.cwd, env.home_directory().unwrap());
        assert_eq!(activation.envs["GIT_AUTHOR_NAME"], "hulk");
        assert_eq!(activation.envs["GIT_COMMITTER_EMAIL"], "hulk@gitdrill.local");
        assert!(!activation.envs.contains_key("GIT_SSH_COMMAND"));
    }

    #[test]
    fn activations_of_two_actors_do_not_share_home() {
        let root = TempDir::new().unwrap();
        let mut a = ActorEnvironment::with_baseline("a", root.path(), baseline()).unwrap();
        let mut b = ActorEnvironment::with_baseline("b", root.path(), baseline()).unwrap();

        let act_a = a.activate(None).unwrap();
        let act_b = b.activate(None).unwrap();

        assert_ne!(act_a.home(), act_b.home());
        assert!(act_a.home().unwrap().ends_with("home/a"));
        assert!(act_b.home().unwrap().ends_with("home/b"));
    }

    #[test]
    fn ssh_identity_exports_ssh_command() {
        let root = TempDir::new().unwrap();
        let mut env = ActorEnvironment::with_baseline("thor", root.path(), baseline()).unwrap();
        let key = env.home_directory().unwrap().join(".ssh/origin");
        env.set_ssh_identity(key.clone());

        let activation = env.activate(None).unwrap();
        let command = &activation.envs["GIT_SSH_COMMAND"];
        assert!(command.contains(&key.display().to_string()));
        assert!(command.contains(".ssh/config"));
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote(Path::new("/a/it's")), r"'/a/it'\''s'");
    }
}
