use std::sync::Arc;
use std::time::Duration;

use crate::cell::ResultHandle;
use crate::dispatch::Core;
use crate::error::{HandlerError, QueueError};
use crate::handler::Handler;
use crate::list::{IndexedPriorityList, PriorityEntry};
use crate::observability::QueueStats;
use crate::payload::Payload;

/// Safe Asynchronous Periodic Indexed Priority queue.
///
/// Dispatch is paced by a fixed interval (at most one start per tick);
/// among ready entries the numerically smallest priority runs first, FIFO
/// within a priority. Admissions of a waiting name coalesce: duplicate data
/// items are suppressed and the priority only ever moves down.
#[derive(Clone)]
pub struct SapipQueue<P: Payload = String> {
    core: Arc<Core<P, IndexedPriorityList<P>>>,
}

impl<P: Payload> SapipQueue<P> {
    /// Creates a queue executing `handler` with at most `limit`
    /// simultaneously running entries.
    pub fn new(handler: impl Handler<P>, limit: usize) -> Self {
        Self {
            core: Arc::new(Core::new(Arc::new(handler), limit)),
        }
    }

    /// Inserts an element. If an element of that name is already waiting,
    /// `data` is merged into it (exact duplicates ignored) and a strictly
    /// smaller `priority` re-splices it; otherwise a new entry is created.
    /// Returns a handle on the element's eventual result, or
    /// [`QueueError::Closed`] after `close`.
    pub async fn add_element(
        &self,
        name: P,
        data: P,
        priority: i64,
    ) -> Result<ResultHandle<P>, QueueError> {
        self.core
            .admit(|waiting| waiting.add(name, data, priority))
            .await
    }

    /// Runs the dispatch loop, starting at most one element per
    /// `interval`. Loops until `stop`, so spawn it on its own task.
    pub async fn run(&self, interval: Duration) {
        self.core.run_periodic(interval).await;
    }

    /// Stops dispatching. Running elements finish; `run` starts the queue
    /// again.
    pub fn stop(&self) {
        self.core.stop();
    }

    /// Closes the queue: every later `add_element` fails. Irreversible.
    pub fn close(&self) {
        self.core.close();
    }

    /// Waits for the queue to finish stopping or closing: stopped drains
    /// the in-flight set, closed drains both sets.
    pub async fn wait(&self) {
        self.core.wait().await;
    }

    /// Updates the cap on simultaneously executing elements. Lowering it
    /// below the current in-flight count stalls new dispatches until
    /// completions catch up; nothing running is cancelled.
    pub fn set_limit(&self, limit: usize) {
        self.core.set_limit(limit);
    }

    /// Replaces the hook invoked when a handler fails or panics. The
    /// default logs the fault.
    pub fn set_error_func(&self, f: impl Fn(&P, &HandlerError) + Send + Sync + 'static) {
        self.core.set_error_func(Arc::new(f));
    }

    /// Counts of waiting and currently executing elements.
    pub async fn num_elements(&self) -> QueueStats {
        self.core.num_elements().await
    }

    /// Removes and returns every waiting element in service order. Running
    /// elements are unaffected.
    pub async fn dump_elements(&self) -> Vec<PriorityEntry<P>> {
        self.core.dump_elements().await
    }
}
