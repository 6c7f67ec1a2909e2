//! Indexed FIFO list: admission order with name-keyed coalescing.

use std::collections::HashMap;

use slab::Slab;

use crate::cell::ResultHandle;
use crate::payload::Payload;

use super::{Entry, WaitingList};

struct Node<P: Payload> {
    entry: Entry<P>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// FIFO waiting set for the non-priority variants (SAPI, SAI).
///
/// A doubly-linked list over a slab arena, plus a name index. Re-admission
/// of a waiting name appends the new data items to the existing entry
/// without changing its service position; duplicates are kept as-is.
pub struct IndexedList<P: Payload> {
    nodes: Slab<Node<P>>,
    index: HashMap<P, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<P: Payload> IndexedList<P> {
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Admits `data` under `name`. Coalesces into the existing entry when
    /// the name is already waiting, otherwise appends a new entry at the
    /// tail. Returns a handle on the entry's result either way.
    pub fn add(&mut self, name: P, data: Vec<P>) -> ResultHandle<P> {
        if let Some(&key) = self.index.get(&name) {
            let entry = &mut self.nodes[key].entry;
            entry.data.extend(data);
            return entry.handle();
        }
        let entry = Entry::new(name.clone(), data);
        let handle = entry.handle();
        let key = self.nodes.insert(Node {
            entry,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.index.insert(name, key);
        handle
    }

    /// Removes and returns the oldest entry.
    pub fn pop(&mut self) -> Option<Entry<P>> {
        self.head.map(|key| self.unlink(key))
    }

    /// Drains every entry in admission order, resetting the list.
    pub fn dump(&mut self) -> Vec<Entry<P>> {
        let mut out = Vec::with_capacity(self.index.len());
        let mut cur = self.head;
        while let Some(key) = cur {
            let node = self.nodes.remove(key);
            out.push(node.entry);
            cur = node.next;
        }
        self.index.clear();
        self.head = None;
        self.tail = None;
        out
    }

    fn unlink(&mut self, key: usize) -> Entry<P> {
        let node = self.nodes.remove(key);
        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }
        self.index.remove(&node.entry.name);
        node.entry
    }
}

impl<P: Payload> Default for IndexedList<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> WaitingList<P> for IndexedList<P> {
    type Entry = Entry<P>;

    fn new() -> Self {
        IndexedList::new()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn take_first<F>(&mut self, mut eligible: F) -> Option<Entry<P>>
    where
        F: FnMut(&P) -> bool,
    {
        let mut cur = self.head;
        while let Some(key) = cur {
            let next = self.nodes[key].next;
            if eligible(&self.nodes[key].entry.name) {
                return Some(self.unlink(key));
            }
            cur = next;
        }
        None
    }

    fn dump(&mut self) -> Vec<Entry<P>> {
        self.dump()
    }
}
