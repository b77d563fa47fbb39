//! Change records, observer registrations, and the notification sink.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::node::NodeId;

/// Identity of a watcher in the external observer subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

/// Options attached to an observer registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Watch mutations anywhere in the node's descendant tree, not just
    /// its direct children.
    pub subtree: bool,
}

/// One (observer, options, transient) entry on a node's registration list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registration {
    pub observer: ObserverId,
    pub options: ObserveOptions,
    /// Short-lived copy installed on a detached subtree so ancestor-level
    /// subtree observers keep seeing its mutations. The observer API owns
    /// permanent registrations; the kernel only ever creates transient
    /// ones.
    pub transient: bool,
}

/// Kind of structural edit a [`ChangeRecord`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    ChildList,
}

/// Description of one structural edit, enqueued for delivery in mutation
/// order. Never mutated after enqueueing; a replace hands off a single
/// record carrying both the added and the removed node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    /// The parent whose child list changed.
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    /// Siblings immediately surrounding the edit point at the time of
    /// the edit.
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

/// Where the kernel hands change records, once per non-suppressed
/// mutation, synchronously, in call order. The only contract is append,
/// preserving order; batching and delivery live outside the kernel.
pub trait NotificationSink {
    fn enqueue(&mut self, record: ChangeRecord);
}

/// Default order-preserving sink: a clonable handle over shared queue
/// storage, so the delivery side drains what the document enqueued.
/// Single-threaded by design, like the rest of the model.
#[derive(Clone, Debug, Default)]
pub struct RecordQueue {
    records: Rc<RefCell<VecDeque<ChangeRecord>>>,
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Drains every queued record, oldest first.
    pub fn take_records(&self) -> Vec<ChangeRecord> {
        self.records.borrow_mut().drain(..).collect()
    }
}

impl NotificationSink for RecordQueue {
    fn enqueue(&mut self, record: ChangeRecord) {
        self.records.borrow_mut().push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(target: u32) -> ChangeRecord {
        ChangeRecord {
            kind: ChangeKind::ChildList,
            target: NodeId(target),
            added: Vec::new(),
            removed: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
        }
    }

    #[test]
    fn queue_preserves_enqueue_order() {
        let mut queue = RecordQueue::new();
        queue.enqueue(record(1));
        queue.enqueue(record(2));
        queue.enqueue(record(3));

        let taken = queue.take_records();
        let targets: Vec<u32> = taken.iter().map(|r| r.target.0).collect();
        assert_eq!(targets, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let queue = RecordQueue::new();
        let mut writer = queue.clone();
        writer.enqueue(record(7));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.take_records().len(), 1);
        assert!(writer.is_empty());
    }
}
