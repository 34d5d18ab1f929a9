//! Single-owner reduction of batch results into corpus text.
//!
//! The aggregator lives on the dispatching thread. Workers hand it
//! [`BatchOutcome`]s through a channel; it appends fragments in completion
//! order and enforces that every submitted batch is counted exactly once.

use tracing::{debug, info};

use rw_common::{Error, Result};

/// A finished unit of work, as reported by a worker.
#[derive(Debug)]
pub struct BatchOutcome {
    pub index: usize,
    pub walks: usize,
    pub result: Result<String>,
}

/// Batch completion tracker with a text progress bar.
#[derive(Debug, Clone)]
pub struct Progress {
    total: usize,
    completed: usize,
    width: usize,
    last_decile: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            width: 20,
            last_decile: 0,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// Record one completed batch. Returns `true` when a new 10% milestone
    /// (or completion) is reached.
    pub fn advance(&mut self) -> bool {
        self.completed = (self.completed + 1).min(self.total);
        let decile = if self.total == 0 {
            10
        } else {
            self.completed * 10 / self.total
        };
        if decile > self.last_decile {
            self.last_decile = decile;
            true
        } else {
            false
        }
    }

    pub fn render(&self) -> String {
        let filled = if self.total == 0 {
            self.width
        } else {
            self.completed * self.width / self.total
        };
        let bar: String = std::iter::repeat_n('█', filled)
            .chain(std::iter::repeat_n('░', self.width - filled))
            .collect();
        format!(
            "[{bar}] {:>5.1}% ({}/{} batches)",
            self.percent(),
            self.completed,
            self.total
        )
    }
}

/// Accumulates batch fragments into the final corpus.
#[derive(Debug)]
pub struct Aggregator {
    corpus: String,
    received: Vec<bool>,
    walks: usize,
    progress: Progress,
}

impl Aggregator {
    pub fn new(total_batches: usize) -> Self {
        Self {
            corpus: String::new(),
            received: vec![false; total_batches],
            walks: 0,
            progress: Progress::new(total_batches),
        }
    }

    /// Walks covered by the batches accepted so far.
    pub fn walks(&self) -> usize {
        self.walks
    }

    /// Fold one outcome into the corpus. A failed batch fails the whole run.
    pub fn accept(&mut self, outcome: BatchOutcome) -> Result<()> {
        let BatchOutcome {
            index,
            walks,
            result,
        } = outcome;

        let slot = self.received.get_mut(index).ok_or_else(|| {
            Error::Aggregation(format!("batch {index} was never submitted"))
        })?;
        if *slot {
            return Err(Error::Aggregation(format!("batch {index} reported twice")));
        }
        *slot = true;

        let fragment = result?;
        self.corpus.push_str(&fragment);
        self.walks += walks;

        debug!(batch = index, walks, bytes = fragment.len(), "batch aggregated");
        if self.progress.advance() {
            info!(
                completed = self.progress.completed(),
                total = self.progress.total(),
                "{}",
                self.progress.render()
            );
        }
        Ok(())
    }

    /// Return the corpus once every submitted batch has been accepted.
    pub fn finish(self) -> Result<String> {
        let missing: Vec<usize> = self
            .received
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(i, _)| i)
            .collect();
        if !missing.is_empty() {
            return Err(Error::Aggregation(format!(
                "{} batch(es) never completed: {:?}",
                missing.len(),
                missing
            )));
        }
        Ok(self.corpus)
    }
}
