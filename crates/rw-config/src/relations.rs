//! Relation vocabularies for ConceptNet assertion files.
//!
//! A vocabulary maps the relation name found in a `cn_<relation>.txt` file
//! to the natural-language phrase written into the assertion TSV.

use serde::{Deserialize, Serialize};

const DEFAULT_PHRASES: &[(&str, &str)] = &[
    ("antonyms", "is an antonym of"),
    ("isA", "is a"),
    ("mannerOf", "is a manner of"),
    ("synonyms", "is a synonym of"),
];

const LAMA_PHRASES: &[(&str, &str)] = &[
    ("atLocation", "is at"),
    ("capableOf", "is capable of"),
    ("causes", "causes"),
    ("causesDesire", "causes desire of"),
    ("desires", "desires"),
    ("hasA", "has a"),
    ("hasPrerequisite", "has prerequisite"),
    ("hasProperty", "has property"),
    ("hasSubevent", "has subevent"),
    ("isA", "is a"),
    ("locatedNear", "is located near"),
    ("madeOf", "is made of"),
    ("motivatedByGoal", "is motivated by"),
    ("partOf", "is part of"),
    ("receivesAction", "recieves"),
    ("usedFor", "is used for"),
];

/// Relations whose assertions hold in both directions.
const SYMMETRIC_RELATIONS: &[&str] = &["antonyms", "synonyms"];

/// Named relation vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationVocabulary {
    /// Lexical relations: antonyms, isA, mannerOf, synonyms.
    #[default]
    Default,
    /// The 16 ConceptNet relations probed by LAMA.
    Lama,
}

impl RelationVocabulary {
    /// `(relation, phrase)` pairs in table order.
    pub fn entries(self) -> &'static [(&'static str, &'static str)] {
        match self {
            RelationVocabulary::Default => DEFAULT_PHRASES,
            RelationVocabulary::Lama => LAMA_PHRASES,
        }
    }

    pub fn relations(self) -> impl Iterator<Item = &'static str> {
        self.entries().iter().map(|(rel, _)| *rel)
    }

    pub fn phrase(self, relation: &str) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(rel, _)| *rel == relation)
            .map(|(_, phrase)| *phrase)
    }

    pub fn is_symmetric(relation: &str) -> bool {
        SYMMETRIC_RELATIONS.contains(&relation)
    }
}

impl std::fmt::Display for RelationVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationVocabulary::Default => write!(f, "default"),
            RelationVocabulary::Lama => write!(f, "lama"),
        }
    }
}
