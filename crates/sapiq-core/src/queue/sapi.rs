use std::sync::Arc;
use std::time::Duration;

use crate::cell::ResultHandle;
use crate::dispatch::Core;
use crate::error::{HandlerError, QueueError};
use crate::handler::Handler;
use crate::list::{Entry, IndexedList};
use crate::observability::QueueStats;
use crate::payload::Payload;

/// Safe Asynchronous Periodic Indexed queue.
///
/// FIFO service order, one start per interval. Re-admission of a waiting
/// name appends the data items as-is (no deduplication) and leaves the
/// entry's position unchanged.
#[derive(Clone)]
pub struct SapiQueue<P: Payload = String> {
    core: Arc<Core<P, IndexedList<P>>>,
}

impl<P: Payload> SapiQueue<P> {
    /// Creates a queue executing `handler` with at most `limit`
    /// simultaneously running entries.
    pub fn new(handler: impl Handler<P>, limit: usize) -> Self {
        Self {
            core: Arc::new(Core::new(Arc::new(handler), limit)),
        }
    }

    /// Inserts an element carrying zero or more data items. If an element
    /// of that name is already waiting, the items are appended to it.
    pub async fn add_element(&self, name: P, data: Vec<P>) -> Result<ResultHandle<P>, QueueError> {
        self.core.admit(|waiting| waiting.add(name, data)).await
    }

    /// Runs the dispatch loop, starting at most one element per
    /// `interval`. Loops until `stop`; spawn it on its own task.
    pub async fn run(&self, interval: Duration) {
        self.core.run_periodic(interval).await;
    }

    pub fn stop(&self) {
        self.core.stop();
    }

    pub fn close(&self) {
        self.core.close();
    }

    /// Waits for the queue to finish stopping or closing.
    pub async fn wait(&self) {
        self.core.wait().await;
    }

    pub fn set_limit(&self, limit: usize) {
        self.core.set_limit(limit);
    }

    pub fn set_error_func(&self, f: impl Fn(&P, &HandlerError) + Send + Sync + 'static) {
        self.core.set_error_func(Arc::new(f));
    }

    pub async fn num_elements(&self) -> QueueStats {
        self.core.num_elements().await
    }

    pub async fn dump_elements(&self) -> Vec<Entry<P>> {
        self.core.dump_elements().await
    }
}
