//! The external version-control tool seam.
//!
//! Everything that actually touches commits, objects or remotes is delegated
//! to a [`Vcs`] implementation. [`GitCli`] spawns the `git` binary; tests use
//! `fake::RecordingVcs` (behind the `test-support` feature).

use std::process::Command;

use serde::Serialize;

use crate::environment::Activation;
use crate::error::ActorError;

/// Captured result of one tool invocation.
///
/// A non-zero exit is data: `success` is false and `stderr` holds the
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutcome {
    pub command: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutcome {
    /// Last non-empty line of stderr, for one-line reports.
    pub fn diagnostic(&self) -> &str {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Runs a VCS subcommand under an actor's activation.
pub trait Vcs: Send + Sync {
    fn run(&self, activation: &Activation, args: &[String]) -> Result<ToolOutcome, ActorError>;
}

/// `git` subprocess runner.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Vcs for GitCli {
    fn run(&self, activation: &Activation, args: &[String]) -> Result<ToolOutcome, ActorError> {
        let command = render_command(&self.program, args);
        let output = Command::new(&self.program)
            .args(args)
            .env_clear()
            .envs(&activation.envs)
            .current_dir(&activation.cwd)
            .output()
            .map_err(|source| ActorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(ToolOutcome {
            command,
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// `git commit -m 'two words'` style rendering for logs and reports.
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_owned();
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push('\'');
            rendered.push_str(arg);
            rendered.push('\'');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}
