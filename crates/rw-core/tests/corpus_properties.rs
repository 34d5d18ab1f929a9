//! Property-based tests for corpus compilation invariants.

use proptest::prelude::*;
use rw_common::{Batch, Walk};
use rw_core::formatter::{BatchFormatter, WalkFormatter};
use rw_core::pipeline::{compile_walks, split_blocks};

fn walk_strategy() -> impl Strategy<Value = Walk> {
    prop::collection::vec("[a-z]{1,6}", 0..9).prop_map(Walk::new)
}

fn collection_strategy() -> impl Strategy<Value = Vec<Walk>> {
    prop::collection::vec(walk_strategy(), 0..40)
}

fn sorted_blocks(corpus: &str) -> Vec<String> {
    let mut blocks: Vec<String> = split_blocks(corpus).map(str::to_string).collect();
    blocks.sort_unstable();
    blocks
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn blocks_are_independent_of_chunking_and_workers(walks in collection_strategy()) {
        let formatter = WalkFormatter::default();
        let reference = sorted_blocks(&formatter.format_walks(&walks));

        for chunk_size in [1usize, 7, 1000] {
            for workers in [1usize, 4, 10] {
                let corpus = compile_walks(walks.clone(), chunk_size, workers, &formatter)
                    .expect("compilation failed");
                prop_assert_eq!(
                    sorted_blocks(&corpus),
                    reference.clone(),
                    "chunk_size={} workers={}", chunk_size, workers
                );
            }
        }
    }

    #[test]
    fn one_block_per_non_empty_walk(walks in collection_strategy()) {
        let corpus = compile_walks(walks.clone(), 7, 4, &WalkFormatter::default())
            .expect("compilation failed");
        let non_empty = walks.iter().filter(|w| !w.is_empty()).count();
        prop_assert_eq!(split_blocks(&corpus).count(), non_empty);
        prop_assert!(split_blocks(&corpus).all(|b| b.ends_with(".\n\n")));
    }

    #[test]
    fn batch_formatting_is_idempotent(walks in collection_strategy()) {
        let batch = Batch::new(0, walks);
        let formatter = WalkFormatter::default();
        let first = formatter.format_batch(&batch).expect("format failed");
        let second = formatter.format_batch(&batch).expect("format failed");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn subject_is_carried_into_second_clause(
        tokens in prop::collection::vec("[a-z]{1,6}", 5..=5)
    ) {
        let walk = Walk::new(tokens.clone());
        let text = WalkFormatter::default().format_walks(&[walk]);
        let expected = format!(
            "{} {} {}.\n{} {} {}.\n\n",
            tokens[0], tokens[1], tokens[2], tokens[2], tokens[3], tokens[4]
        );
        prop_assert_eq!(text, expected);
    }
}
