//! Picks which actor performs each level.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use gitdrill_core::ActorName;

use crate::error::LessonError;

#[derive(Debug, Clone)]
pub enum ActorSelector {
    /// Uniform choice from the roster on every level.
    Random(StdRng),
    /// Always the same actor.
    Fixed(ActorName),
}

impl ActorSelector {
    /// Random selection, repeatable when `seed` is given.
    pub fn random(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        ActorSelector::Random(rng)
    }

    pub fn fixed(name: impl Into<ActorName>) -> Self {
        ActorSelector::Fixed(name.into())
    }

    /// Reject a fixed actor that is not on the roster.
    pub fn check(&self, roster: &[ActorName]) -> Result<(), LessonError> {
        match self {
            ActorSelector::Fixed(name) if !roster.contains(name) => {
                Err(LessonError::UnknownActor(name.clone()))
            }
            _ => Ok(()),
        }
    }

    pub fn select(&mut self, roster: &[ActorName]) -> Result<ActorName, LessonError> {
        match self {
            ActorSelector::Random(rng) => roster
                .choose(rng)
                .cloned()
                .ok_or_else(|| LessonError::InvalidRoster("roster is empty".into())),
            ActorSelector::Fixed(name) if roster.contains(name) => Ok(name.clone()),
            ActorSelector::Fixed(name) => Err(LessonError::UnknownActor(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<ActorName> {
        ["a", "b", "c"].into_iter().map(ActorName::from).collect()
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut one = ActorSelector::random(Some(42));
        let mut two = ActorSelector::random(Some(42));
        let roster = roster();
        for _ in 0..16 {
            assert_eq!(one.select(&roster).unwrap(), two.select(&roster).unwrap());
        }
    }

    #[test]
    fn random_selection_stays_on_roster_and_covers_it() {
        let mut selector = ActorSelector::random(Some(1));
        let roster = roster();
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let pick = selector.select(&roster).unwrap();
            assert!(roster.contains(&pick));
            seen.insert(pick);
        }
        assert_eq!(seen.len(), roster.len());
    }

    #[test]
    fn fixed_actor_must_be_on_roster() {
        let mut ok = ActorSelector::fixed("b");
        assert_eq!(ok.select(&roster()).unwrap(), ActorName::from("b"));

        let mut missing = ActorSelector::fixed("zed");
        assert!(matches!(
            missing.select(&roster()),
            Err(LessonError::UnknownActor(name)) if name.as_str() == "zed"
        ));
    }

    #[test]
    fn empty_roster_is_an_error() {
        assert!(ActorSelector::random(Some(3)).select(&[]).is_err());
    }
}
