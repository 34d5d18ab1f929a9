//! End-to-end corpus generation: load → dispatch → aggregate → write.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use rw_common::{Result, Walk, SCHEMA_VERSION};
use rw_config::{CorpusConfig, RelationStyle};

use crate::aggregate::Aggregator;
use crate::dispatch::{chunk_walks, Dispatcher};
use crate::formatter::{BatchFormatter, WalkFormatter};
use crate::loader::load_walks;
use crate::writer::write_corpus;

/// Report for one completed corpus run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub schema_version: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub walks: usize,
    pub empty_walks: usize,
    /// Non-empty walks too short to hold a full triple.
    pub incomplete_walks: usize,
    pub batches: usize,
    pub chunk_size: usize,
    pub worker_count: usize,
    pub relation_style: RelationStyle,
    pub bytes: u64,
    /// Blank-line-terminated sentence blocks in the corpus.
    pub blocks: usize,
    /// SHA-256 of the corpus text, hex encoded.
    pub sha256: String,
    pub elapsed_ms: u64,
    pub generated_at: String,
}

/// Format an in-memory walk collection into corpus text.
///
/// Batch order in the result follows completion order, not input order.
pub fn compile_walks<F: BatchFormatter>(
    walks: Vec<Walk>,
    chunk_size: usize,
    worker_count: usize,
    formatter: &F,
) -> Result<String> {
    let batches = chunk_walks(walks, chunk_size)?;
    let dispatcher = Dispatcher::new(worker_count)?;
    let mut aggregator = Aggregator::new(batches.len());
    dispatcher.run(batches, formatter, &mut aggregator)?;
    aggregator.finish()
}

/// Generate and write the corpus described by `config`.
pub fn generate_corpus(config: &CorpusConfig) -> Result<CorpusSummary> {
    generate_corpus_with(config, &WalkFormatter::new(config.relation_style))
}

/// Like [`generate_corpus`] with a caller-supplied formatter.
///
/// Nothing is written unless every batch formats successfully.
pub fn generate_corpus_with<F: BatchFormatter>(
    config: &CorpusConfig,
    formatter: &F,
) -> Result<CorpusSummary> {
    config.validate()?;
    let started = Instant::now();

    let walks = load_walks(&config.input_path)?;
    let walk_count = walks.len();
    let empty_walks = walks.iter().filter(|w| w.is_empty()).count();
    let incomplete_walks = walks
        .iter()
        .filter(|w| !w.is_empty() && !w.is_complete())
        .count();
    let batches = walk_count.div_ceil(config.chunk_size);

    let corpus = compile_walks(walks, config.chunk_size, config.worker_count, formatter)?;
    let bytes = write_corpus(&config.output_path, &corpus)?;

    let summary = CorpusSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        walks: walk_count,
        empty_walks,
        incomplete_walks,
        batches,
        chunk_size: config.chunk_size,
        worker_count: config.worker_count,
        relation_style: config.relation_style,
        bytes,
        blocks: split_blocks(&corpus).count(),
        sha256: hex::encode(Sha256::digest(corpus.as_bytes())),
        elapsed_ms: started.elapsed().as_millis() as u64,
        generated_at: Utc::now().to_rfc3339(),
    };

    info!(
        walks = summary.walks,
        incomplete = summary.incomplete_walks,
        batches = summary.batches,
        blocks = summary.blocks,
        bytes = summary.bytes,
        elapsed_ms = summary.elapsed_ms,
        "corpus generated"
    );
    Ok(summary)
}

/// Iterate over the sentence blocks of a corpus, each including its
/// terminating blank line.
pub fn split_blocks(corpus: &str) -> impl Iterator<Item = &str> {
    corpus.split_inclusive("\n\n")
}
