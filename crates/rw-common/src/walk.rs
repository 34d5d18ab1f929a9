//! Walk, walk collection, and batch types.
//!
//! A walk is the token sequence emitted by a knowledge-graph random-walk
//! sampler. Tokens alternate roles by position: even positions are entities,
//! odd positions are relations.

use serde::{Deserialize, Serialize};

/// Role of a token inside a walk, determined by position parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRole {
    Entity,
    Relation,
}

impl TokenRole {
    pub fn for_position(index: usize) -> Self {
        if index % 2 == 0 {
            TokenRole::Entity
        } else {
            TokenRole::Relation
        }
    }
}

/// One random walk: `entity relation entity relation entity ...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Walk(Vec<String>);

impl Walk {
    /// Minimum length that forms one complete `subject relation object` triple.
    pub const MIN_TRIPLE_LEN: usize = 3;

    pub fn new(tokens: Vec<String>) -> Self {
        Walk(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the walk holds at least one full triple.
    pub fn is_complete(&self) -> bool {
        self.0.len() >= Self::MIN_TRIPLE_LEN
    }
}

impl<S: Into<String>> FromIterator<S> for Walk {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Walk(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for Walk {
    fn from(tokens: Vec<String>) -> Self {
        Walk(tokens)
    }
}

/// Every walk loaded for one corpus run, in input order.
pub type WalkCollection = Vec<Walk>;

/// A contiguous slice of the walk collection, owned by the worker that
/// formats it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Submission index (0-based) within the run.
    pub index: usize,
    pub walks: Vec<Walk>,
}

impl Batch {
    pub fn new(index: usize, walks: Vec<Walk>) -> Self {
        Self { index, walks }
    }

    pub fn len(&self) -> usize {
        self.walks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walks.is_empty()
    }
}
