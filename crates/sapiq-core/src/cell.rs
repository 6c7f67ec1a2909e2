//! Result cell: one producer, many readers, one value.

use tokio::sync::watch;

use crate::payload::Payload;

/// Write-once latch holding an entry's eventual result.
///
/// Owned by the entry for its whole life (waiting set, in-flight set,
/// worker). The worker delivers exactly once; handles read the broadcast.
#[derive(Debug)]
pub(crate) struct ResultCell<P> {
    tx: watch::Sender<Option<P>>,
}

impl<P: Payload> ResultCell<P> {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub(crate) fn handle(&self) -> ResultHandle<P> {
        ResultHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Writes the single value and wakes every reader. Must be called at
    /// most once per cell.
    pub(crate) fn deliver(&self, value: P) {
        self.tx.send_modify(|slot| {
            debug_assert!(slot.is_none(), "result cell delivered twice");
            *slot = Some(value);
        });
    }
}

/// Shared read side of a [`ResultCell`].
///
/// Any number of clones may wait concurrently; every `read` observes the
/// same value, and readers arriving after delivery return immediately.
#[derive(Debug, Clone)]
pub struct ResultHandle<P> {
    rx: watch::Receiver<Option<P>>,
}

impl<P: Payload> ResultHandle<P> {
    /// Blocks until the entry's handler has completed, then returns the
    /// produced value.
    ///
    /// If the entry is discarded without ever completing (its queue was
    /// dumped and the entry dropped), the payload default is returned.
    pub async fn read(&self) -> P {
        let mut rx = self.rx.clone();
        let result = match rx.wait_for(|slot| slot.is_some()).await {
            Ok(slot) => (*slot).clone().unwrap_or_default(),
            Err(_) => P::default(),
        };
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_after_deliver_does_not_block() {
        let cell = ResultCell::new();
        let handle = cell.handle();
        cell.deliver("done".to_string());
        assert_eq!(handle.read().await, "done");
    }

    #[tokio::test]
    async fn concurrent_readers_observe_the_same_value() {
        let cell = ResultCell::new();
        let a = cell.handle();
        let b = a.clone();

        let ra = tokio::spawn(async move { a.read().await });
        let rb = tokio::spawn(async move { b.read().await });

        tokio::task::yield_now().await;
        cell.deliver("value".to_string());

        assert_eq!(ra.await.unwrap(), "value");
        assert_eq!(rb.await.unwrap(), "value");
    }

    #[tokio::test]
    async fn dropped_cell_unblocks_readers_with_default() {
        let cell = ResultCell::<String>::new();
        let handle = cell.handle();
        drop(cell);
        assert_eq!(handle.read().await, String::new());
    }
}
