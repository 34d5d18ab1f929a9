//! Walk formatting: token streams → period-terminated sentences.
//!
//! Each walk `e0 r0 e1 r1 e2 ...` becomes one sentence block. The first
//! clause is the triple `e0 r0 e1`; every later clause restates the entity
//! that ended the previous one, so a five-token walk reads
//!
//! ```text
//! cat hasA tail.
//! tail partOf body.
//!
//! ```
//!
//! Blocks are terminated by a blank line, which makes each one
//! self-contained and lets batches be concatenated in any order.

use std::borrow::Cow;

use rw_common::{Batch, Result, TokenRole, Walk};
use rw_config::RelationStyle;

/// Anything that can turn a batch of walks into corpus text.
///
/// Implementations run on pool threads and must not share mutable state.
pub trait BatchFormatter: Sync {
    fn format_batch(&self, batch: &Batch) -> Result<String>;
}

/// The sentence formatter used for corpus generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkFormatter {
    relation_style: RelationStyle,
}

impl WalkFormatter {
    pub fn new(relation_style: RelationStyle) -> Self {
        Self { relation_style }
    }

    /// Render a relation token. Passthrough by default.
    pub fn render_relation<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self.relation_style {
            RelationStyle::Passthrough => Cow::Borrowed(token),
            RelationStyle::Bracketed => Cow::Owned(format!("<{}>", token.replace(' ', ""))),
        }
    }

    /// Format a slice of walks into one text fragment.
    pub fn format_walks(&self, walks: &[Walk]) -> String {
        let mut out = String::with_capacity(walks.iter().map(estimated_len).sum());
        for walk in walks {
            self.format_walk_into(walk, &mut out);
        }
        out
    }

    /// Append the sentence block for one walk. Empty walks append nothing.
    pub fn format_walk_into(&self, walk: &Walk, out: &mut String) {
        let tokens = walk.tokens();
        let Some(last) = tokens.len().checked_sub(1) else {
            return;
        };

        let mut previous: Option<&str> = None;
        let mut closed = false;

        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_str();
            closed = false;

            match previous {
                Some(prev) if !prev.is_empty() && is_sentence_boundary(i) => {
                    if i == 3 {
                        // The triple ended on the entity at position 2.
                        strip_trailing_space(out);
                        out.push_str(".\n");
                    } else {
                        out.push_str(token);
                        out.push_str(".\n");
                    }

                    if i == last {
                        out.push('\n');
                        closed = true;
                    } else if i == 3 {
                        out.push_str(prev);
                        out.push(' ');
                        out.push_str(&self.render_relation(token));
                        out.push(' ');
                    } else {
                        out.push_str(token);
                        out.push(' ');
                    }
                }
                _ => {
                    match TokenRole::for_position(i) {
                        TokenRole::Entity => out.push_str(token),
                        TokenRole::Relation => out.push_str(&self.render_relation(token)),
                    }
                    out.push(' ');
                }
            }

            previous = Some(token);
        }

        // Walks whose last token is not a boundary still end their block.
        if !closed {
            strip_trailing_space(out);
            out.push_str(".\n\n");
        }
    }
}

impl BatchFormatter for WalkFormatter {
    fn format_batch(&self, batch: &Batch) -> Result<String> {
        Ok(self.format_walks(&batch.walks))
    }
}

/// Position 3 closes the opening triple; every even position from 4 on
/// closes a continuation clause.
fn is_sentence_boundary(index: usize) -> bool {
    index == 3 || (index % 2 == 0 && index != 0 && index != 2)
}

fn strip_trailing_space(out: &mut String) {
    if out.ends_with(' ') {
        out.pop();
    }
}

fn estimated_len(walk: &Walk) -> usize {
    // Continuation clauses repeat roughly one token in three.
    walk.tokens().iter().map(|t| t.len() + 1).sum::<usize>() * 4 / 3 + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(tokens: &[&str]) -> Walk {
        tokens.iter().copied().collect()
    }

    fn format(tokens: &[&str]) -> String {
        WalkFormatter::default().format_walks(&[walk(tokens)])
    }

    #[test]
    fn test_single_triple() {
        assert_eq!(format(&["A", "r", "B"]), "A r B.\n\n");
    }

    #[test]
    fn test_two_triples_carry_subject() {
        assert_eq!(
            format(&["A", "r1", "B", "r2", "C"]),
            "A r1 B.\nB r2 C.\n\n"
        );
    }

    #[test]
    fn test_long_walk() {
        assert_eq!(
            format(&["A", "r1", "B", "r2", "C", "r3", "D"]),
            "A r1 B.\nB r2 C.\nC r3 D.\n\n"
        );
    }

    #[test]
    fn test_dangling_relation_at_position_three() {
        assert_eq!(format(&["A", "r1", "B", "r2"]), "A r1 B.\n\n");
    }

    #[test]
    fn test_dangling_relation_after_continuation() {
        assert_eq!(
            format(&["A", "r1", "B", "r2", "C", "r3"]),
            "A r1 B.\nB r2 C.\nC r3.\n\n"
        );
    }

    #[test]
    fn test_short_walks_do_not_panic() {
        assert_eq!(format(&["A"]), "A.\n\n");
        assert_eq!(format(&["A", "r"]), "A r.\n\n");
        assert_eq!(format(&[]), "");
    }

    #[test]
    fn test_empty_subject_still_closes_triple() {
        assert_eq!(format(&["", "r", "B", "r2", "C"]), " r B.\nB r2 C.\n\n");
    }

    #[test]
    fn test_empty_token_suppresses_next_boundary() {
        // No period follows an empty token; the clause runs on to `C`.
        assert_eq!(format(&["A", "r1", "", "r2", "C"]), "A r1  r2 C.\n\n");
        assert_eq!(format(&["A", "r1", "B", "", "C"]), "A r1 B.\nB  C.\n\n");
    }

    #[test]
    fn test_empty_tokens_mixed_with_regular_walks() {
        let fragment = WalkFormatter::default().format_walks(&[
            walk(&["A", "r1", "B", "r2", "C", "r3", "D", "r4", "E"]),
            walk(&["", "r", "B", "r2", "C"]),
            walk(&["x"]),
        ]);
        assert_eq!(
            fragment,
            "A r1 B.\nB r2 C.\nC r3 D.\nD r4 E.\n\n r B.\nB r2 C.\n\nx.\n\n"
        );
    }

    #[test]
    fn test_walks_concatenate_with_blank_lines() {
        let fragment = WalkFormatter::default().format_walks(&[
            walk(&["dog", "isA", "animal"]),
            walk(&["cat", "hasA", "tail", "partOf", "body"]),
        ]);
        assert_eq!(
            fragment,
            "dog isA animal.\n\ncat hasA tail.\ntail partOf body.\n\n"
        );
    }

    #[test]
    fn test_bracketed_relations() {
        let formatter = WalkFormatter::new(RelationStyle::Bracketed);
        let out = formatter.format_walks(&[walk(&["A", "used for", "B", "partOf", "C"])]);
        assert_eq!(out, "A <usedfor> B.\nB <partOf> C.\n\n");
    }

    #[test]
    fn test_passthrough_borrows() {
        let formatter = WalkFormatter::default();
        assert!(matches!(formatter.render_relation("isA"), Cow::Borrowed("isA")));
    }

    #[test]
    fn test_format_batch_is_idempotent() {
        let batch = Batch::new(
            0,
            vec![
                walk(&["A", "r1", "B", "r2", "C"]),
                walk(&["x", "y", "z"]),
            ],
        );
        let formatter = WalkFormatter::default();
        let first = formatter.format_batch(&batch).unwrap();
        let second = formatter.format_batch(&batch).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sentence_boundaries() {
        let boundaries: Vec<usize> = (0..9).filter(|&i| is_sentence_boundary(i)).collect();
        assert_eq!(boundaries, vec![3, 4, 6, 8]);
    }
}
