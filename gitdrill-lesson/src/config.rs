//! Lesson configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! classic three-actor, four-level lesson:
//!
//! ```yaml
//! roster: [captain, thor, hulk]
//! policy: continue        # or `halt`
//! url_form: https         # or `ssh`
//! branch: main
//! seed: 7                 # optional, makes actor selection repeatable
//! mirror_url: /tmp/demo.git   # optional, clone/push here instead
//! levels:
//!   - level: 1
//!     message: "Level 1: add a file"
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gitdrill_core::{ActorName, RemoteDescriptor, UrlForm};
use gitdrill_actor::{Recipe, DEFAULT_BRANCH};

use crate::error::{io_err, LessonError};
use crate::level::{default_message, LessonLevel};

pub const MIN_ROSTER: usize = 3;
pub const MAX_ROSTER: usize = 5;
pub const MIN_LEVELS: usize = 4;

pub const DEFAULT_ROSTER: [&str; 3] = ["captain", "thor", "hulk"];

/// What the driver does when a VCS invocation exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log, record in the report, and keep going to the acknowledgement point.
    #[default]
    Continue,
    /// Stop the lesson with [`LessonError::ExternalToolFailure`].
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    pub roster: Vec<ActorName>,
    pub policy: FailurePolicy,
    pub url_form: UrlForm,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_url: Option<String>,
    pub levels: Vec<LevelSpec>,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            roster: DEFAULT_ROSTER.iter().map(|n| ActorName::from(*n)).collect(),
            policy: FailurePolicy::default(),
            url_form: UrlForm::default(),
            branch: DEFAULT_BRANCH.to_owned(),
            seed: None,
            mirror_url: None,
            levels: Recipe::ALL
                .iter()
                .map(|recipe| LevelSpec {
                    level: recipe.level(),
                    message: Some(default_message(recipe.level(), *recipe)),
                })
                .collect(),
        }
    }
}

impl LessonConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, LessonError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(io_err(path, e)),
        };
        Self::from_yaml(&raw).map_err(|source| LessonError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Check roster size and uniqueness plus the level list.
    pub fn validate(&self) -> Result<(), LessonError> {
        validate_roster(&self.roster)?;
        self.lesson_levels().map(|_| ())
    }

    /// Levels in configured order, each bound to its recipe.
    pub fn lesson_levels(&self) -> Result<Vec<LessonLevel>, LessonError> {
        if self.levels.len() < MIN_LEVELS {
            return Err(LessonError::InvalidLevels(format!(
                "at least {MIN_LEVELS} levels are required, got {}",
                self.levels.len()
            )));
        }
        self.levels
            .iter()
            .map(|spec| {
                LessonLevel::new(spec.level, spec.message.as_deref())
                    .map_err(|e| LessonError::InvalidLevels(e.to_string()))
            })
            .collect()
    }

    pub fn branch(&self) -> &str {
        if self.branch.trim().is_empty() {
            DEFAULT_BRANCH
        } else {
            &self.branch
        }
    }

    /// URL actors clone from and push to: the mirror when set, otherwise the
    /// configured form of `remote`.
    pub fn remote_url(&self, remote: &RemoteDescriptor) -> String {
        match &self.mirror_url {
            Some(mirror) => mirror.clone(),
            None => remote.url(self.url_form).to_owned(),
        }
    }
}

fn validate_roster(roster: &[ActorName]) -> Result<(), LessonError> {
    if !(MIN_ROSTER..=MAX_ROSTER).contains(&roster.len()) {
        return Err(LessonError::InvalidRoster(format!(
            "expected {MIN_ROSTER}-{MAX_ROSTER} actors, got {}",
            roster.len()
        )));
    }
    let mut seen = BTreeSet::new();
    for name in roster {
        let raw = name.as_str();
        if raw.trim().is_empty() {
            return Err(LessonError::InvalidRoster("actor names must be non-empty".into()));
        }
        if raw.contains(['/', '\\']) || raw == "." || raw == ".." {
            return Err(LessonError::InvalidRoster(format!(
                "actor name '{raw}' cannot be used as a directory name"
            )));
        }
        if !seen.insert(raw) {
            return Err(LessonError::InvalidRoster(format!("duplicate actor '{raw}'")));
        }
    }
    Ok(())
}
