//! In-process [`Vcs`] double that records invocations instead of running git.
//!
//! `clone <url> <path>` creates `<path>/.git` so later verbs find a working
//! tree; every other subcommand succeeds unless it matches a prefix given to
//! [`RecordingVcs::failing`].

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use gitdrill_core::ActorName;

use crate::environment::Activation;
use crate::error::{io_err, ActorError};
use crate::vcs::{render_command, ToolOutcome, Vcs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub actor: ActorName,
    pub cwd: PathBuf,
    pub home: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RecordingVcs {
    calls: Mutex<Vec<RecordedCall>>,
    failing: Vec<String>,
}

impl RecordingVcs {
    /// Make every invocation whose joined arguments start with `prefix` exit 1.
    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls_for(&self, actor: &ActorName) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| &call.actor == actor)
            .collect()
    }
}

impl Vcs for RecordingVcs {
    fn run(&self, activation: &Activation, args: &[String]) -> Result<ToolOutcome, ActorError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                actor: activation.actor.clone(),
                cwd: activation.cwd.clone(),
                home: activation.home().map(str::to_owned),
                args: args.to_vec(),
            });

        let joined = args.join(" ");
        let success = !self.failing.iter().any(|prefix| joined.starts_with(prefix));

        if success && args.first().map(String::as_str) == Some("clone") {
            if let Some(target) = args.get(2) {
                let git_dir = PathBuf::from(target).join(".git");
                std::fs::create_dir_all(&git_dir).map_err(|e| io_err(&git_dir, e))?;
            }
        }

        Ok(ToolOutcome {
            command: render_command("git", args),
            exit_code: Some(if success { 0 } else { 1 }),
            success,
            stdout: String::new(),
            stderr: if success {
                String::new()
            } else {
                format!("fatal: simulated failure of '{joined}'\n")
            },
        })
    }
}
