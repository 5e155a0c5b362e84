//! One scripted lesson step.

use std::fmt;

use serde::Serialize;

use gitdrill_actor::Recipe;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonLevel {
    pub number: u32,
    pub recipe: Recipe,
    pub commit_message: String,
}

impl LessonLevel {
    /// Level `number` with its recipe and the given (or a generated) message.
    pub fn new(number: u32, message: Option<&str>) -> Result<Self, gitdrill_actor::ActorError> {
        let recipe = Recipe::for_level(number)?;
        let commit_message = match message {
            Some(m) if !m.trim().is_empty() => m.to_owned(),
            _ => default_message(number, recipe),
        };
        Ok(Self {
            number,
            recipe,
            commit_message,
        })
    }
}

pub(crate) fn default_message(number: u32, recipe: Recipe) -> String {
    format!("Level {number}: {}", recipe.describe())
}

impl fmt::Display for LessonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} ({})", self.number, self.recipe.describe())
    }
}
