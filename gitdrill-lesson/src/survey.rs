//! Read-only scan of actor homes left on disk by earlier lessons.

use std::path::{Path, PathBuf};

use serde::Serialize;

use gitdrill_core::{paths, ActorName, ProjectName};

use crate::error::{io_err, LessonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorSurvey {
    pub actor: ActorName,
    pub home: PathBuf,
    pub has_identity: bool,
    pub projects: Vec<ProjectSurvey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSurvey {
    pub project: ProjectName,
    pub path: PathBuf,
    /// `.git` is present.
    pub checked_out: bool,
}

/// Every actor home under `<root>/home`, sorted by actor name. Hidden
/// entries are skipped. A missing `home` directory yields an empty list.
pub fn survey(root: &Path) -> Result<Vec<ActorSurvey>, LessonError> {
    let homes = paths::homes_root(root);
    let mut actors = Vec::new();
    for home in sorted_dirs(&homes)? {
        let Some(name) = visible_name(&home) else {
            continue;
        };
        let projects = sorted_dirs(&home)?
            .into_iter()
            .filter_map(|path| {
                let project = visible_name(&path)?;
                Some(ProjectSurvey {
                    project: ProjectName::from(project),
                    checked_out: path.join(".git").exists(),
                    path,
                })
            })
            .collect();
        actors.push(ActorSurvey {
            actor: ActorName::from(name),
            has_identity: paths::ssh_key_path(&home).is_file(),
            home,
            projects,
        });
    }
    Ok(actors)
}

fn sorted_dirs(dir: &Path) -> Result<Vec<PathBuf>, LessonError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(dir, e)),
    };
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    (!name.starts_with('.')).then(|| name.to_owned())
}
