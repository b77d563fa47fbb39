//! Structural mutation: insert, remove, replace.
//!
//! Every operation validates its preconditions before touching any
//! state, then adjusts live cursors, enqueues its change record, and
//! finally performs the linkage change, so a failed precondition leaves
//! the tree, the cursors, and the queue exactly as they were.

use thiserror::Error;

use crate::document::Document;
use crate::node::NodeId;
use crate::observer::{ChangeKind, ChangeRecord, ObserveOptions, ObserverId, Registration};
use crate::range;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node is not a child of the given parent")]
    NotFound,
}

impl Document {
    /// Inserts `new` under `parent`, before `reference` (or at the end
    /// when `reference` is `None`).
    ///
    /// A node that already has a parent is detached first through the
    /// removal path, with its own change record; re-parenting is
    /// remove-then-insert, never a special-cased move. Inserting a node
    /// before itself degenerates to re-inserting at its current
    /// position. The caller must not insert a node beneath its own
    /// descendant.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        self.insert_inner(parent, new, reference, false)
    }

    /// Inserts `new` as `parent`'s last child.
    pub fn append_child(&mut self, parent: NodeId, new: NodeId) -> Result<NodeId, TreeError> {
        self.insert_inner(parent, new, None, false)
    }

    pub(crate) fn insert_inner(
        &mut self,
        parent: NodeId,
        new: NodeId,
        mut reference: Option<NodeId>,
        suppress: bool,
    ) -> Result<NodeId, TreeError> {
        if let Some(r) = reference {
            if self.nodes[r.index()].parent != Some(parent) {
                return Err(TreeError::NotFound);
            }
        }
        if reference == Some(new) {
            reference = self.nodes[new.index()].next_sibling;
        }
        if let Some(old_parent) = self.nodes[new.index()].parent {
            self.remove_inner(old_parent, new, false)?;
        }
        let index = match reference {
            Some(r) => match self.index_of(parent, r) {
                Some(i) => i,
                None => {
                    debug_assert!(false, "reference linked to parent but missing from child list");
                    return Err(TreeError::NotFound);
                }
            },
            None => self.nodes[parent.index()].children.len(),
        };

        range::shift_for_insert(self.ranges.values_mut(), parent, index);

        if !suppress {
            let previous_sibling = match reference {
                Some(r) => self.nodes[r.index()].prev_sibling,
                None => self.nodes[parent.index()].last_child,
            };
            self.sink.enqueue(ChangeRecord {
                kind: ChangeKind::ChildList,
                target: parent,
                added: vec![new],
                removed: Vec::new(),
                previous_sibling,
                next_sibling: reference,
            });
        }

        self.nodes[new.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(index, new);
        self.relink_around(parent, index);
        Ok(new)
    }

    /// Removes `child` from `parent` and returns it detached, with no
    /// parent and no siblings. Its subtree stays intact.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, TreeError> {
        self.remove_inner(parent, child, false)
    }

    pub(crate) fn remove_inner(
        &mut self,
        parent: NodeId,
        child: NodeId,
        suppress: bool,
    ) -> Result<NodeId, TreeError> {
        if self.nodes[child.index()].parent != Some(parent) {
            return Err(TreeError::NotFound);
        }
        let index = match self.index_of(parent, child) {
            Some(i) => i,
            None => {
                debug_assert!(false, "child linked to parent but missing from child list");
                return Err(TreeError::NotFound);
            }
        };

        range::reanchor_for_remove(&self.nodes, self.ranges.values_mut(), parent, child, index);

        if !suppress {
            self.sink.enqueue(ChangeRecord {
                kind: ChangeKind::ChildList,
                target: parent,
                added: Vec::new(),
                removed: vec![child],
                previous_sibling: self.nodes[child.index()].prev_sibling,
                next_sibling: self.nodes[child.index()].next_sibling,
            });
        }

        // Needs the still-linked ancestor chain, so it runs before the
        // unlink below.
        self.install_transient_registrations(parent, child);

        let prev = self.nodes[child.index()].prev_sibling;
        let next = self.nodes[child.index()].next_sibling;
        if let Some(p) = prev {
            self.nodes[p.index()].next_sibling = next;
        }
        if let Some(n) = next {
            self.nodes[n.index()].prev_sibling = prev;
        }
        self.nodes[parent.index()].children.remove(index);
        self.refresh_child_ends(parent);

        let slot = &mut self.nodes[child.index()];
        slot.parent = None;
        slot.prev_sibling = None;
        slot.next_sibling = None;
        Ok(child)
    }

    /// Substitutes `new` for `old` under `parent` as one atomic edit:
    /// exactly one change record carries both the added and the removed
    /// node. Returns the replaced node.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<NodeId, TreeError> {
        if self.nodes[old.index()].parent != Some(parent) {
            return Err(TreeError::NotFound);
        }
        let mut reference = self.nodes[old.index()].next_sibling;
        if reference == Some(new) {
            reference = self.nodes[new.index()].next_sibling;
        }
        // Siblings captured before either sub-step runs.
        let record = ChangeRecord {
            kind: ChangeKind::ChildList,
            target: parent,
            added: vec![new],
            removed: vec![old],
            previous_sibling: self.nodes[old.index()].prev_sibling,
            next_sibling: self.nodes[old.index()].next_sibling,
        };
        self.remove_inner(parent, old, true)?;
        self.insert_inner(parent, new, reference, true)?;
        self.sink.enqueue(record);
        Ok(old)
    }

    /// Ancestor subtree observers keep seeing a detached branch through
    /// transient registration copies on every node of the branch. The
    /// ancestor walk always runs in full, whether or not any
    /// registration is found.
    fn install_transient_registrations(&mut self, parent: NodeId, child: NodeId) {
        let mut inherited: Vec<(ObserverId, ObserveOptions)> = Vec::new();
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            for reg in &self.nodes[id.index()].observers {
                if reg.options.subtree {
                    inherited.push((reg.observer, reg.options));
                }
            }
            ancestor = self.nodes[id.index()].parent;
        }
        if inherited.is_empty() {
            return;
        }
        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            for &(observer, options) in &inherited {
                self.nodes[id.index()].observers.push(Registration {
                    observer,
                    options,
                    transient: true,
                });
            }
            stack.extend(self.nodes[id.index()].children.iter().copied());
        }
    }

    /// Recomputes the sibling caches around `children[index]` and the
    /// parent's end caches after a splice-in.
    fn relink_around(&mut self, parent: NodeId, index: usize) {
        let (node, prev, next) = {
            let children = &self.nodes[parent.index()].children;
            (
                children[index],
                index.checked_sub(1).map(|i| children[i]),
                children.get(index + 1).copied(),
            )
        };
        self.nodes[node.index()].prev_sibling = prev;
        self.nodes[node.index()].next_sibling = next;
        if let Some(p) = prev {
            self.nodes[p.index()].next_sibling = Some(node);
        }
        if let Some(n) = next {
            self.nodes[n.index()].prev_sibling = Some(node);
        }
        self.refresh_child_ends(parent);
    }

    fn refresh_child_ends(&mut self, parent: NodeId) {
        let first = self.nodes[parent.index()].children.first().copied();
        let last = self.nodes[parent.index()].children.last().copied();
        let slot = &mut self.nodes[parent.index()];
        slot.first_child = first;
        slot.last_child = last;
    }
}
