//! Batch partitioning and fan-out to a fixed-size worker pool.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use rw_common::{Batch, Error, Result, Walk};

use crate::aggregate::{Aggregator, BatchOutcome};
use crate::formatter::BatchFormatter;

/// Split walks into contiguous batches of at most `chunk_size`, preserving
/// input order. The last batch may be shorter.
pub fn chunk_walks(walks: Vec<Walk>, chunk_size: usize) -> Result<Vec<Batch>> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfig {
            field: "chunk_size",
            reason: "must be at least 1".to_string(),
        });
    }

    let mut batches = Vec::with_capacity(walks.len().div_ceil(chunk_size));
    let mut iter = walks.into_iter().peekable();
    while iter.peek().is_some() {
        let chunk: Vec<Walk> = iter.by_ref().take(chunk_size).collect();
        batches.push(Batch::new(batches.len(), chunk));
    }
    Ok(batches)
}

/// Runs batch formatting on a dedicated thread pool.
pub struct Dispatcher {
    pool: ThreadPool,
    worker_count: usize,
}

impl Dispatcher {
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(Error::InvalidConfig {
                field: "worker_count",
                reason: "must be at least 1".to_string(),
            });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("rw-worker-{i}"))
            .build()
            .map_err(|e| Error::Pool(e.to_string()))?;
        Ok(Self { pool, worker_count })
    }

    /// Format every batch on the pool and feed results to `aggregator` as
    /// they complete.
    ///
    /// The calling thread only blocks on the completion channel. The first
    /// failed batch aborts aggregation; batches still in flight run to
    /// completion and their results are discarded.
    pub fn run<F: BatchFormatter>(
        &self,
        batches: Vec<Batch>,
        formatter: &F,
        aggregator: &mut Aggregator,
    ) -> Result<()> {
        let total = batches.len();
        let started = Instant::now();
        info!(batches = total, workers = self.worker_count, "dispatching batches");

        let (tx, rx) = mpsc::channel::<BatchOutcome>();

        self.pool.in_place_scope(|scope| {
            for batch in batches {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = format_guarded(formatter, batch);
                    // The receiver is gone only after aggregation failed.
                    let _ = tx.send(outcome);
                });
            }
            drop(tx);

            for outcome in rx {
                aggregator.accept(outcome)?;
            }
            Ok::<(), Error>(())
        })?;

        debug!(
            batches = total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all batches aggregated"
        );
        Ok(())
    }
}

/// Run the formatter, converting a panic into a batch error.
fn format_guarded<F: BatchFormatter>(formatter: &F, batch: Batch) -> BatchOutcome {
    let index = batch.index;
    let walks = batch.len();
    let result = panic::catch_unwind(AssertUnwindSafe(|| formatter.format_batch(&batch)))
        .unwrap_or_else(|payload| {
            Err(Error::Worker {
                batch: index,
                reason: panic_message(payload.as_ref()),
            })
        });
    BatchOutcome {
        index,
        walks,
        result,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("worker panicked: {msg}")
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::WalkFormatter;

    fn walks(n: usize) -> Vec<Walk> {
        (0..n)
            .map(|i| {
                let subject = format!("e{i}");
                [subject.as_str(), "r", "o"].into_iter().collect()
            })
            .collect()
    }

    #[test]
    fn test_chunking_preserves_order_and_sizes() {
        let batches = chunk_walks(walks(7), 3).unwrap();
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(batches[2].index, 2);
        assert_eq!(batches[1].walks[0].tokens()[0], "e3");
    }

    #[test]
    fn test_chunking_empty_and_zero() {
        assert!(chunk_walks(Vec::new(), 5).unwrap().is_empty());
        assert!(chunk_walks(walks(2), 0).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(Dispatcher::new(0).is_err());
    }

    #[test]
    fn test_run_aggregates_every_batch() {
        let batches = chunk_walks(walks(25), 4).unwrap();
        let mut agg = Aggregator::new(batches.len());
        let dispatcher = Dispatcher::new(3).unwrap();
        dispatcher
            .run(batches, &WalkFormatter::default(), &mut agg)
            .unwrap();
        assert_eq!(agg.walks(), 25);
        let corpus = agg.finish().unwrap();
        assert_eq!(corpus.matches(".\n\n").count(), 25);
    }

    struct Panicking;

    impl BatchFormatter for Panicking {
        fn format_batch(&self, batch: &Batch) -> Result<String> {
            if batch.index == 1 {
                panic!("bad batch");
            }
            Ok(String::new())
        }
    }

    #[test]
    fn test_worker_panic_becomes_error() {
        let batches = chunk_walks(walks(6), 2).unwrap();
        let mut agg = Aggregator::new(batches.len());
        let err = Dispatcher::new(2)
            .unwrap()
            .run(batches, &Panicking, &mut agg)
            .unwrap_err();
        match err {
            Error::Worker { batch, reason } => {
                assert_eq!(batch, 1);
                assert!(reason.contains("bad batch"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
