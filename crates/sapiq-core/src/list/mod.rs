//! Waiting sets: the indexed FIFO list and the indexed priority list.

mod indexed;
mod priority;

pub use indexed::IndexedList;
pub use priority::IndexedPriorityList;

use crate::cell::{ResultCell, ResultHandle};
use crate::payload::Payload;

/// A queued unit of the non-priority variants: name, coalesced data, and
/// the result cell shared with every handle returned for this name.
#[derive(Debug)]
pub struct Entry<P: Payload> {
    pub(crate) name: P,
    pub(crate) data: Vec<P>,
    pub(crate) cell: ResultCell<P>,
}

impl<P: Payload> Entry<P> {
    pub(crate) fn new(name: P, data: Vec<P>) -> Self {
        Self {
            name,
            data,
            cell: ResultCell::new(),
        }
    }

    pub fn name(&self) -> &P {
        &self.name
    }

    pub fn data(&self) -> &[P] {
        &self.data
    }

    /// A fresh read handle on this entry's result.
    pub fn handle(&self) -> ResultHandle<P> {
        self.cell.handle()
    }

    /// Delivers `value` to every reader of this entry's handles. Intended
    /// for entries recovered via `dump_elements`; the dispatcher completes
    /// queued entries itself.
    pub fn complete(self, value: P) {
        self.cell.deliver(value);
    }
}

/// A queued unit of the priority variants. Identical to [`Entry`] plus the
/// priority; smaller priorities are served first.
#[derive(Debug)]
pub struct PriorityEntry<P: Payload> {
    pub(crate) name: P,
    pub(crate) data: Vec<P>,
    pub(crate) priority: i64,
    pub(crate) cell: ResultCell<P>,
}

impl<P: Payload> PriorityEntry<P> {
    pub(crate) fn new(name: P, data: Vec<P>, priority: i64) -> Self {
        Self {
            name,
            data,
            priority,
            cell: ResultCell::new(),
        }
    }

    pub fn name(&self) -> &P {
        &self.name
    }

    pub fn data(&self) -> &[P] {
        &self.data
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// A fresh read handle on this entry's result.
    pub fn handle(&self) -> ResultHandle<P> {
        self.cell.handle()
    }

    /// Delivers `value` to every reader of this entry's handles. Intended
    /// for entries recovered via `dump_elements`.
    pub fn complete(self, value: P) {
        self.cell.deliver(value);
    }
}

/// What the dispatcher needs from an entry, regardless of variant.
pub(crate) trait WaitEntry<P: Payload>: Send + 'static {
    fn name(&self) -> &P;
    fn data(&self) -> &[P];
    fn cell(&self) -> &ResultCell<P>;
}

impl<P: Payload> WaitEntry<P> for Entry<P> {
    fn name(&self) -> &P {
        &self.name
    }

    fn data(&self) -> &[P] {
        &self.data
    }

    fn cell(&self) -> &ResultCell<P> {
        &self.cell
    }
}

impl<P: Payload> WaitEntry<P> for PriorityEntry<P> {
    fn name(&self) -> &P {
        &self.name
    }

    fn data(&self) -> &[P] {
        &self.data
    }

    fn cell(&self) -> &ResultCell<P> {
        &self.cell
    }
}

/// Waiting-set seam between the two list structures and the dispatcher.
pub(crate) trait WaitingList<P: Payload>: Send + 'static {
    type Entry: WaitEntry<P>;

    fn new() -> Self;

    /// Number of waiting entries (one per live name).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detaches and returns the first entry, scanning from the head in
    /// service order, for which `eligible(name)` holds.
    fn take_first<F>(&mut self, eligible: F) -> Option<Self::Entry>
    where
        F: FnMut(&P) -> bool;

    /// Drains every entry in service order, resetting the list.
    fn dump(&mut self) -> Vec<Self::Entry>;
}
