//! `gitdrill status`: what earlier lessons left on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use gitdrill_lesson::{survey, ActorSurvey};

use super::run::resolve_root;

/// Arguments for `gitdrill status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Lesson root holding `home/<actor>`; defaults to the current directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let root = resolve_root(self.root.as_deref())?;
        let actors = survey(&root)
            .with_context(|| format!("failed to scan actor homes under {}", root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&actors).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(&root, &actors);
        Ok(())
    }
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "actor")]
    actor: String,
    #[tabled(rename = "identity")]
    identity: String,
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "tree")]
    tree: String,
}

fn print_table(root: &std::path::Path, actors: &[ActorSurvey]) {
    let clones: usize = actors
        .iter()
        .flat_map(|a| a.projects.iter())
        .filter(|p| p.checked_out)
        .count();
    println!(
        "gitdrill v{} | {} | {} actors | {} clones",
        env!("CARGO_PKG_VERSION"),
        root.display(),
        actors.len(),
        clones,
    );

    if actors.is_empty() {
        println!("No actor homes found. Run 'gitdrill run --project <owner/project>' first.");
        return;
    }

    let mut rows = Vec::new();
    for actor in actors {
        let identity = if actor.has_identity { "ssh key" } else { "-" }.to_string();
        if actor.projects.is_empty() {
            rows.push(StatusTableRow {
                actor: actor.actor.to_string(),
                identity,
                project: "-".to_string(),
                tree: "-".to_string(),
            });
            continue;
        }
        for project in &actor.projects {
            let tree = if project.checked_out {
                "checked out".green().to_string()
            } else {
                "no .git".yellow().to_string()
            };
            rows.push(StatusTableRow {
                actor: actor.actor.to_string(),
                identity: identity.clone(),
                project: project.project.to_string(),
                tree,
            });
        }
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
