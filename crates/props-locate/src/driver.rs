//! Runs lookups, sequentially or concurrently, reporting progress.
//!
//! Progress is not global state: callers that want it pass the sending half
//! of a channel and receive one [`Progress`] per finished lookup.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::plan::KeyLookup;
use crate::search::KeySearcher;

/// Emitted each time a lookup finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub label: String,
    pub found: bool,
}

/// The result of looking up one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupOutcome {
    /// Report label of the key.
    pub label: String,
    /// Description of the search that was run.
    pub command: String,
    /// Search output when the key was found.
    pub context: Option<String>,
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        self.context.is_some()
    }
}

/// Run every lookup and return the outcomes in plan order.
///
/// At most `jobs` searches run at a time; `jobs <= 1` runs them in order on
/// the current task. A failed or timed-out search counts as "not found".
pub async fn run_lookups(
    searcher: Arc<dyn KeySearcher>,
    lookups: Vec<KeyLookup>,
    jobs: usize,
    progress: Option<mpsc::UnboundedSender<Progress>>,
) -> Vec<LookupOutcome> {
    let total = lookups.len();
    let mut completed = 0;
    let mut report = |outcome: &LookupOutcome| {
        completed += 1;
        if let Some(tx) = &progress {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(Progress {
                completed,
                total,
                label: outcome.label.clone(),
                found: outcome.is_found(),
            });
        }
    };

    let outcomes = if jobs <= 1 {
        let mut outcomes = Vec::with_capacity(total);
        for lookup in &lookups {
            let outcome = lookup_one(searcher.as_ref(), lookup).await;
            report(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    } else {
        let limit = Arc::new(Semaphore::new(jobs));
        let mut tasks = JoinSet::new();

        for (slot, lookup) in lookups.iter().cloned().enumerate() {
            let searcher = Arc::clone(&searcher);
            let limit = Arc::clone(&limit);
            tasks.spawn(async move {
                let _permit = limit.acquire_owned().await;
                (slot, lookup_one(searcher.as_ref(), &lookup).await)
            });
        }

        let mut slots: Vec<Option<LookupOutcome>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => {
                    report(&outcome);
                    slots[slot] = Some(outcome);
                }
                Err(e) => warn!("lookup task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(&lookups)
            .map(|(outcome, lookup)| {
                outcome.unwrap_or_else(|| LookupOutcome {
                    label: lookup.label(),
                    command: searcher.describe(lookup),
                    context: None,
                })
            })
            .collect()
    };

    info!(
        total,
        found = outcomes.iter().filter(|o| o.is_found()).count(),
        "lookups finished"
    );
    outcomes
}

async fn lookup_one(searcher: &dyn KeySearcher, lookup: &KeyLookup) -> LookupOutcome {
    let context = match searcher.search(lookup).await {
        Ok(context) => context,
        Err(e) => {
            warn!(key = %lookup.raw, "lookup failed, counting as missing: {e}");
            None
        }
    };
    LookupOutcome {
        label: lookup.label(),
        command: searcher.describe(lookup),
        context,
    }
}
