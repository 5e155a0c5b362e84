//! Scripted edit recipes, one per lesson level.
//!
//! | Level | Recipe        | File        | Effect                                         |
//! |-------|---------------|-------------|------------------------------------------------|
//! | 1     | `ScriptStub`  | `lesson.sh` | append shebang + `echo "hello world"`          |
//! | 2     | `AppendLine`  | `lesson.sh` | append `echo "hello again"`                    |
//! | 3     | `Capitalize`  | `lesson.sh` | `hello` → `Hello`, append `echo "goodbye"`     |
//! | 4     | `NewFile`     | `NOTES.md`  | append a note (diverges when the actor is behind) |
//!
//! Every recipe is a pure `&str -> String` transformation; the actor does
//! the reading and writing.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ActorError;

pub const LESSON_FILE: &str = "lesson.sh";
pub const NOTES_FILE: &str = "NOTES.md";

const LOWER_TOKEN: &str = "hello";
const UPPER_TOKEN: &str = "Hello";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipe {
    ScriptStub,
    AppendLine,
    Capitalize,
    NewFile,
}

impl Recipe {
    pub const ALL: [Recipe; 4] = [
        Recipe::ScriptStub,
        Recipe::AppendLine,
        Recipe::Capitalize,
        Recipe::NewFile,
    ];

    pub fn for_level(level: u32) -> Result<Self, ActorError> {
        Self::ALL
            .into_iter()
            .find(|recipe| recipe.level() == level)
            .ok_or(ActorError::UnknownLevel(level))
    }

    pub fn level(self) -> u32 {
        match self {
            Recipe::ScriptStub => 1,
            Recipe::AppendLine => 2,
            Recipe::Capitalize => 3,
            Recipe::NewFile => 4,
        }
    }

    /// File the recipe edits, relative to the working tree.
    pub fn file_name(self) -> &'static str {
        match self {
            Recipe::NewFile => NOTES_FILE,
            _ => LESSON_FILE,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Recipe::ScriptStub => "add a file",
            Recipe::AppendLine => "append a line",
            Recipe::Capitalize => "modify existing lines",
            Recipe::NewFile => "add a file while behind",
        }
    }

    pub fn apply(self, current: &str) -> String {
        match self {
            Recipe::ScriptStub => append(current, "#!/bin/sh\necho \"hello world\"\n"),
            Recipe::AppendLine => append(current, "echo \"hello again\"\n"),
            Recipe::Capitalize => append(
                &current.replace(LOWER_TOKEN, UPPER_TOKEN),
                "echo \"goodbye\"\n",
            ),
            Recipe::NewFile => append(current, "- note added while behind the remote\n"),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} ({})", self.level(), self.describe())
    }
}

fn append(current: &str, lines: &str) -> String {
    let mut out = String::with_capacity(current.len() + lines.len() + 1);
    out.push_str(current);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(lines);
    out
}

/// File content before and after an applied recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub recipe: Recipe,
    pub path: PathBuf,
    pub before: String,
    pub after: String,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_level_maps_one_to_four() {
        for level in 1..=4 {
            assert_eq!(Recipe::for_level(level).unwrap().level(), level);
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(matches!(Recipe::for_level(0), Err(ActorError::UnknownLevel(0))));
        assert!(matches!(Recipe::for_level(5), Err(ActorError::UnknownLevel(5))));
    }

    #[test]
    fn script_stub_on_empty_file_is_two_lines() {
        let out = Recipe::ScriptStub.apply("");
        assert_eq!(out, "#!/bin/sh\necho \"hello world\"\n");
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn append_line_adds_exactly_one_line() {
        let stub = Recipe::ScriptStub.apply("");
        let out = Recipe::AppendLine.apply(&stub);
        assert_eq!(out.lines().count(), stub.lines().count() + 1);
        assert!(out.starts_with(&stub));
    }

    #[test]
    fn append_terminates_unterminated_content() {
        assert_eq!(Recipe::AppendLine.apply("x"), "x\necho \"hello again\"\n");
    }

    #[test]
    fn capitalize_replaces_every_lowercase_token() {
        let content = Recipe::AppendLine.apply(&Recipe::ScriptStub.apply(""));
        let out = Recipe::Capitalize.apply(&content);
        assert!(!out.contains("hello"));
        assert_eq!(out.matches("Hello").count(), 2);
        assert!(out.ends_with("echo \"goodbye\"\n"));
    }

    #[test]
    fn capitalize_twice_only_duplicates_the_new_line() {
        let content = Recipe::AppendLine.apply(&Recipe::ScriptStub.apply(""));
        let once = Recipe::Capitalize.apply(&content);
        let twice = Recipe::Capitalize.apply(&once);

        assert!(!twice.contains("hello"), "lowercase token reintroduced");
        assert_eq!(twice.matches("Hello").count(), once.matches("Hello").count());
        assert_eq!(twice.matches("goodbye").count(), 2);
        assert_eq!(twice, format!("{once}echo \"goodbye\"\n"));
    }

    #[test]
    fn capitalize_is_case_sensitive() {
        let out = Recipe::Capitalize.apply("HELLO hello\n");
        assert!(out.starts_with("HELLO Hello\n"));
    }

    #[test]
    fn new_file_targets_notes() {
        assert_eq!(Recipe::NewFile.file_name(), NOTES_FILE);
        assert_eq!(Recipe::Capitalize.file_name(), LESSON_FILE);
    }
}
