//! Worklist drain shared by sitemap discovery and page scraping
//!
//! Both crawl stages process a set of work items that grows while it is being
//! processed: a sitemap can point at more sitemaps, and nothing knows up front
//! how many there will be. [`drain_worklist`] runs such a set to exhaustion.
//!
//! One coordinating loop owns everything shared:
//! - the in-flight count of units that have been dispatched but not reported back
//! - the collected results
//!
//! Every dispatched unit runs as its own tokio task and reports back exactly
//! once over an unbounded channel with a [`Completion`] holding follow-up
//! items and results. The loop stops when the in-flight count returns to zero,
//! at which point no task is left that could send more work.

use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedSender};

/// What a finished unit of work hands back to the coordinating loop
#[derive(Debug)]
pub struct Completion<T, R> {
    /// Follow-up items to dispatch; may be empty
    pub batch: Vec<T>,

    /// Results produced by the unit
    pub results: Vec<R>,
}

impl<T, R> Completion<T, R> {
    /// A completion carrying no further work and no results
    pub fn empty() -> Self {
        Self {
            batch: Vec::new(),
            results: Vec::new(),
        }
    }

    /// A completion carrying a single result
    pub fn result(result: R) -> Self {
        Self {
            batch: Vec::new(),
            results: vec![result],
        }
    }
}

/// Reports a unit's completion exactly once.
///
/// If the unit's task dies before calling [`CompletionGuard::complete`]
/// (a panic, or the runtime dropping the task), the guard reports an empty
/// completion from `Drop` so the in-flight count still unwinds.
struct CompletionGuard<T, R> {
    tx: Option<UnboundedSender<Completion<T, R>>>,
}

impl<T, R> CompletionGuard<T, R> {
    fn new(tx: UnboundedSender<Completion<T, R>>) -> Self {
        Self { tx: Some(tx) }
    }

    fn complete(mut self, completion: Completion<T, R>) {
        if let Some(tx) = self.tx.take() {
            // The receiver only goes away once the loop has returned
            let _ = tx.send(completion);
        }
    }
}

impl<T, R> Drop for CompletionGuard<T, R> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            tracing::warn!("Work unit ended without reporting, counting it as done");
            let _ = tx.send(Completion::empty());
        }
    }
}

/// Drains a dynamically growing worklist and returns every collected result
///
/// # Arguments
///
/// * `seed` - The initial batch of work items
/// * `admit` - Decides, on the coordinating loop, whether an item is dispatched.
///   It runs single-threaded, so it may keep plain mutable state.
/// * `work` - Builds the future that processes one item. Each future runs on
///   its own task; follow-up items in its [`Completion`] are fed back into
///   the worklist.
///
/// # Returns
///
/// All results from all units, in completion order.
///
/// # Termination
///
/// The seed batch counts as one outstanding unit. Each admitted item adds one
/// and each received completion removes one. The loop returns when the count
/// reaches zero. If the work graph keeps producing items forever (for example
/// a cycle with an `admit` that accepts everything) the loop never returns.
pub async fn drain_worklist<T, R, A, F, Fut>(seed: Vec<T>, mut admit: A, work: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    A: FnMut(&T) -> bool,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Completion<T, R>> + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion<T, R>>();
    let mut results = Vec::new();

    let mut in_flight: usize = 1;
    let mut next = Completion {
        batch: seed,
        results: Vec::new(),
    };

    loop {
        results.extend(next.results);
        in_flight -= 1;

        for item in next.batch {
            if !admit(&item) {
                continue;
            }

            in_flight += 1;
            let guard = CompletionGuard::new(tx.clone());
            let unit = work(item);
            tokio::spawn(async move {
                guard.complete(unit.await);
            });
        }

        tracing::trace!(in_flight, collected = results.len(), "Worklist step");

        if in_flight == 0 {
            break;
        }

        next = match rx.recv().await {
            Some(completion) => completion,
            // Unreachable while `tx` is alive in this scope
            None => break,
        };
    }

    results
}
