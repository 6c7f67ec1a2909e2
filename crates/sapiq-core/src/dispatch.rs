//! Dispatcher core shared by all four queue variants.
//!
//! Owns the waiting set, the in-flight set and the lifecycle flags, and
//! runs the admission/dispatch/completion protocol. Variant-specific
//! behavior is confined to the waiting-set type (FIFO vs priority) and the
//! pacing of the dispatch loop (immediate vs periodic).

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{HandlerError, QueueError};
use crate::handler::{default_error_func, ErrorFunc, Handler};
use crate::list::{WaitEntry, WaitingList};
use crate::observability::QueueStats;
use crate::payload::Payload;

/// Shared state of one queue.
///
/// Lock order is `waiting` before `inflight`; neither is ever held across
/// an `.await` on anything but the other lock. `changed` is the single
/// broadcast wake-up for every dispatch precondition ("waiting non-empty",
/// "slot freed", "limit raised", "stopped"); waiters register on it before
/// re-checking state so no notification is lost.
pub(crate) struct Core<P: Payload, L: WaitingList<P>> {
    waiting: Mutex<L>,
    inflight: Mutex<Vec<P>>,
    limit: AtomicUsize,
    stopped: AtomicBool,
    closed: AtomicBool,
    changed: Notify,
    handler: Arc<dyn Handler<P>>,
    error_func: parking_lot::Mutex<ErrorFunc<P>>,
}

impl<P: Payload, L: WaitingList<P>> Core<P, L> {
    pub(crate) fn new(handler: Arc<dyn Handler<P>>, limit: usize) -> Self {
        Self {
            waiting: Mutex::new(L::new()),
            inflight: Mutex::new(Vec::new()),
            limit: AtomicUsize::new(limit),
            stopped: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            changed: Notify::new(),
            handler,
            error_func: parking_lot::Mutex::new(default_error_func()),
        }
    }

    /// Admission guard plus the shared tail of every `add_element`: run
    /// `add` under the waiting-set lock, then broadcast.
    pub(crate) async fn admit<T>(
        &self,
        add: impl FnOnce(&mut L) -> T,
    ) -> Result<T, QueueError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(QueueError::Closed);
        }
        let out = {
            let mut waiting = self.waiting.lock().await;
            add(&mut waiting)
        };
        self.changed.notify_waiters();
        Ok(out)
    }

    /// Immediate dispatch loop: start an eligible entry whenever one
    /// exists and a slot is free; park on `changed` otherwise.
    pub(crate) async fn run_immediate(self: &Arc<Self>) {
        self.stopped.store(false, Ordering::Release);
        loop {
            if self.stopped.load(Ordering::Acquire) {
                break;
            }
            let changed = self.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();
            if self.try_dispatch().await {
                continue;
            }
            changed.await;
        }
    }

    /// Periodic dispatch loop: one tick, at most one start. When the
    /// preconditions are unmet at tick time, sleep on `changed` until the
    /// dispatch becomes possible.
    pub(crate) async fn run_periodic(self: &Arc<Self>, interval: Duration) {
        self.stopped.store(false, Ordering::Release);
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        'ticks: loop {
            ticker.tick().await;
            loop {
                if self.stopped.load(Ordering::Acquire) {
                    break 'ticks;
                }
                let changed = self.changed.notified();
                tokio::pin!(changed);
                changed.as_mut().enable();
                if self.try_dispatch().await {
                    break;
                }
                changed.await;
            }
        }
    }

    /// Attempts one dispatch: under both locks, find the first waiting
    /// entry whose name is not in flight, move it over, and spawn its
    /// worker. Returns whether a dispatch happened.
    async fn try_dispatch(self: &Arc<Self>) -> bool {
        let entry = {
            let mut waiting = self.waiting.lock().await;
            let mut inflight = self.inflight.lock().await;
            if inflight.len() >= self.limit.load(Ordering::Acquire) {
                None
            } else {
                let entry = waiting.take_first(|name| !inflight.iter().any(|n| n == name));
                if let Some(entry) = &entry {
                    inflight.push(entry.name().clone());
                }
                entry
            }
        };
        match entry {
            Some(entry) => {
                let core = Arc::clone(self);
                tokio::spawn(async move { core.exec(entry).await });
                true
            }
            None => false,
        }
    }

    /// Runs one entry to completion. The handler executes on its own task
    /// so a panic is contained; faults go to the error hook and produce the
    /// payload default. Completion order matters: the name leaves the
    /// in-flight set and the broadcast fires before the result is
    /// delivered, so a reader woken by the result never observes the name
    /// as still executing.
    async fn exec(&self, entry: L::Entry) {
        let name = entry.name().clone();
        let data = entry.data().to_vec();
        let handler = Arc::clone(&self.handler);
        tracing::trace!(name = ?name, items = data.len(), "executing element");

        let outcome = tokio::spawn(async move { handler.handle(&name, &data).await }).await;
        let value = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(error)) => {
                self.report(entry.name(), &HandlerError::Failed(error.to_string()));
                P::default()
            }
            Err(join) => {
                let message = if join.is_panic() {
                    panic_message(join.into_panic())
                } else {
                    "handler task was cancelled".to_string()
                };
                self.report(entry.name(), &HandlerError::Panicked(message));
                P::default()
            }
        };

        {
            let mut inflight = self.inflight.lock().await;
            if let Some(pos) = inflight.iter().position(|n| n == entry.name()) {
                inflight.remove(pos);
            }
        }
        self.changed.notify_waiters();
        entry.cell().deliver(value);
    }

    fn report(&self, name: &P, error: &HandlerError) {
        let hook = self.error_func.lock().clone();
        hook(name, error);
    }

    /// Stops dispatching. In-flight entries run to completion; `run`
    /// restarts the queue.
    pub(crate) fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.changed.notify_waiters();
    }

    /// Permanently rejects further admissions. Waiting entries still drain
    /// while the dispatch loop runs.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.changed.notify_waiters();
    }

    /// Blocks until the drain condition for the current lifecycle state
    /// holds: stopped requires an empty in-flight set, closed additionally
    /// an empty waiting set. Returns immediately when neither flag is set.
    pub(crate) async fn wait(&self) {
        loop {
            let changed = self.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();

            let stopped = self.stopped.load(Ordering::Acquire);
            let closed = self.closed.load(Ordering::Acquire);
            let drained = {
                let waiting = self.waiting.lock().await;
                let inflight = self.inflight.lock().await;
                (!stopped || inflight.is_empty())
                    && (!closed || (waiting.is_empty() && inflight.is_empty()))
            };
            if drained {
                return;
            }
            changed.await;
        }
    }

    /// Raises or lowers the concurrency cap. Lowering below the current
    /// in-flight count cancels nothing; dispatch resumes once completions
    /// bring the count back under the cap.
    pub(crate) fn set_limit(&self, limit: usize) {
        self.limit.store(limit, Ordering::Release);
        self.changed.notify_waiters();
    }

    pub(crate) fn set_error_func(&self, f: ErrorFunc<P>) {
        *self.error_func.lock() = f;
    }

    pub(crate) async fn num_elements(&self) -> QueueStats {
        let waiting = self.waiting.lock().await;
        let inflight = self.inflight.lock().await;
        QueueStats {
            waiting: waiting.len(),
            in_flight: inflight.len(),
        }
    }

    /// Drains the waiting set; the in-flight set is untouched.
    pub(crate) async fn dump_elements(&self) -> Vec<L::Entry> {
        let dumped = {
            let mut waiting = self.waiting.lock().await;
            waiting.dump()
        };
        self.changed.notify_waiters();
        dumped
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_extracts_common_payloads() {
        assert_eq!(panic_message(Box::new("static str")), "static str");
        assert_eq!(panic_message(Box::new("owned".to_string())), "owned");
        assert_eq!(panic_message(Box::new(42u32)), "non-string panic payload");
    }
}
