//! Name-list classification of index entries.

use std::collections::HashSet;

use crate::config::Expansion as ExpansionConfig;
use crate::journal::model::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Dungeon,
    Raid,
    Unmatched,
}

impl Category {
    pub fn kind(self) -> Option<Kind> {
        match self {
            Category::Dungeon => Some(Kind::Dungeon),
            Category::Raid => Some(Kind::Raid),
            Category::Unmatched => None,
        }
    }
}

/// Classifies instance names against one expansion's curated lists. A name
/// in neither list, or in both, is Unmatched; we never guess.
pub struct Classifier {
    dungeons: HashSet<String>,
    raids: HashSet<String>,
}

impl Classifier {
    pub fn new(config: &ExpansionConfig) -> Self {
        Self {
            dungeons: config.dungeons.iter().cloned().collect(),
            raids: config.raids.iter().cloned().collect(),
        }
    }

    pub fn classify(&self, name: &str) -> Category {
        match (self.dungeons.contains(name), self.raids.contains(name)) {
            (true, false) => Category::Dungeon,
            (false, true) => Category::Raid,
            _ => Category::Unmatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&ExpansionConfig {
            name: "classic".to_string(),
            dungeons: vec!["Deadmines".to_string(), "Blackrock Depths".to_string()],
            raids: vec!["Molten Core".to_string(), "Blackrock Depths".to_string()],
        })
    }

    #[test]
    fn known_names_classify() {
        let c = classifier();
        assert_eq!(c.classify("Deadmines"), Category::Dungeon);
        assert_eq!(c.classify("Molten Core"), Category::Raid);
    }

    #[test]
    fn unknown_name_is_unmatched() {
        assert_eq!(classifier().classify("Unknown Place"), Category::Unmatched);
    }

    #[test]
    fn conflicting_name_is_unmatched() {
        // Listed as both a dungeon and a raid; do not guess.
        assert_eq!(
            classifier().classify("Blackrock Depths"),
            Category::Unmatched
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        for _ in 0..100 {
            assert_eq!(c.classify("Molten Core"), Category::Raid);
        }
    }
}
