//! `gitdrill run`: play a lesson against a shared remote.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Args;
use colored::Colorize;

use gitdrill_actor::{GitCli, DEFAULT_SSH_CONFIG_TEMPLATE};
use gitdrill_core::{RemoteDescriptor, UrlForm};
use gitdrill_lesson::{
    roster_agents, Acknowledge, ActorSelector, AutoAcknowledge, FailurePolicy, LessonConfig,
    LessonDriver, LessonReport, StdinPrompt,
};

/// Looked up under the lesson root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gitdrill.yaml";

/// Arguments for `gitdrill run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project reference: `owner/project`, `host/owner/project`, or a URL.
    #[arg(long, short = 'p')]
    pub project: String,

    /// Perform every level as this actor instead of picking at random.
    #[arg(long)]
    pub actor: Option<String>,

    /// Private key installed as every actor's ssh identity.
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// Lesson YAML (defaults to `<root>/gitdrill.yaml` when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Clone and push with the ssh URL instead of https.
    #[arg(long)]
    pub ssh: bool,

    /// Stop at the first failing git command.
    #[arg(long)]
    pub halt_on_failure: bool,

    /// Seed for repeatable actor selection.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Clone from and push to this URL or path instead of the project remote.
    #[arg(long)]
    pub mirror: Option<String>,

    /// Do not pause between levels.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Emit the lesson report as JSON (implies `--yes`).
    #[arg(long)]
    pub json: bool,

    /// Lesson root holding `home/<actor>`; defaults to the current directory.
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let remote = RemoteDescriptor::parse(&self.project)?;
        let root = resolve_root(self.root.as_deref())?;
        let config = self.load_config(&root)?;

        let selector = match &self.actor {
            Some(name) => ActorSelector::fixed(name.as_str()),
            None => ActorSelector::random(config.seed),
        };

        let report = if self.yes || self.json {
            self.drive(remote, &config, &root, selector, AutoAcknowledge)?
        } else {
            self.drive(remote, &config, &root, selector, StdinPrompt::new())?
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize lesson report")?
            );
        } else {
            print_report(&report);
        }
        Ok(())
    }

    fn load_config(&self, root: &Path) -> Result<LessonConfig> {
        let mut config = match &self.config {
            Some(path) => {
                ensure!(path.is_file(), "lesson config not found at {}", path.display());
                LessonConfig::load(path)?
            }
            None => LessonConfig::load(&root.join(DEFAULT_CONFIG_FILE))?,
        };
        if self.ssh {
            config.url_form = UrlForm::Ssh;
        }
        if self.halt_on_failure {
            config.policy = FailurePolicy::Halt;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.mirror.is_some() {
            config.mirror_url = self.mirror.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn drive<A: Acknowledge>(
        &self,
        remote: RemoteDescriptor,
        config: &LessonConfig,
        root: &Path,
        selector: ActorSelector,
        acknowledge: A,
    ) -> Result<LessonReport> {
        let agents = roster_agents(config, Some(root), Arc::new(GitCli::default()))?;
        let mut driver = LessonDriver::new(remote, config, agents, selector, acknowledge)?;
        if let Some(key) = &self.key {
            driver.configure_identities(DEFAULT_SSH_CONFIG_TEMPLATE, key)?;
        }
        Ok(driver.run()?)
    }
}

/// `--root` made absolute, or the current directory.
pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(match root {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => cwd.join(root),
        None => cwd,
    })
}

fn print_report(report: &LessonReport) {
    println!(
        "{} {} via {}",
        "Lesson".bold(),
        report.remote.to_string().bold(),
        report.remote_url
    );
    for level in &report.levels {
        let status = if level.succeeded() {
            "ok".green().bold()
        } else {
            "failed".red().bold()
        };
        println!(
            "  level {} {:<24} {:<10} {status}",
            level.level,
            level.description,
            level.actor.as_str().cyan(),
        );
        for step in level.failed_steps() {
            let detail = step
                .error
                .clone()
                .or_else(|| {
                    step.commands
                        .iter()
                        .find(|c| !c.success && !c.tolerated)
                        .map(|c| format!("{}: {}", c.command, c.diagnostic))
                })
                .unwrap_or_default();
            println!("      {} {detail}", step.verb.to_string().red());
        }
        if let Some(diff) = &level.diff {
            print!("{}", colorize_diff(&diff.unified_diff));
        }
    }

    let failed = report.failed_levels();
    if failed > 0 {
        println!(
            "{}",
            format!("{failed} of {} levels had failing steps.", report.levels.len()).yellow()
        );
    }
}

fn colorize_diff(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len());
    for line in diff.lines() {
        let painted = if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else {
            line.to_string()
        };
        out.push_str("      ");
        out.push_str(&painted);
        out.push('\n');
    }
    out
}
