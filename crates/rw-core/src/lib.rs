//! Random-walk corpus compiler.
//!
//! Turns knowledge-graph random walks into a plain-text corpus for
//! masked-language-model pretraining. Walks are split into batches, formatted
//! on a fixed-size worker pool, and reassembled by a single aggregator before
//! the corpus is written in one step.
//!
//! The crate also carries the ConceptNet assertion joiner used to prepare the
//! relation table that the walk sampler consumes.

pub mod aggregate;
pub mod assertions;
pub mod cli;
pub mod dispatch;
pub mod exit_codes;
pub mod formatter;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod writer;

pub use aggregate::{Aggregator, BatchOutcome, Progress};
pub use assertions::{Assertion, AssertionJoiner, AssertionReport};
pub use dispatch::{chunk_walks, Dispatcher};
pub use exit_codes::ExitCode;
pub use formatter::{BatchFormatter, WalkFormatter};
pub use loader::{load_walks, WalkFormat};
pub use pipeline::{compile_walks, generate_corpus, generate_corpus_with, split_blocks, CorpusSummary};
pub use writer::write_corpus;
