//! Live cursors and the adjustments every structural mutation applies to
//! keep them anchored.

use crate::node::{is_inclusive_ancestor, NodeId, NodeSlot};

/// Handle into a document's live-cursor registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeId(pub(crate) u64);

/// A live cursor: start and end anchors into the tree.
///
/// An offset counts children inside a container node and UTF-16 code
/// units inside a character-data node. The range itself is passive data;
/// the kernel rewrites the four fields in place as the tree mutates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

impl Range {
    pub fn new(
        start_node: NodeId,
        start_offset: usize,
        end_node: NodeId,
        end_offset: usize,
    ) -> Self {
        Self {
            start_node,
            start_offset,
            end_node,
            end_offset,
        }
    }

    /// Collapsed cursor at `(node, offset)`.
    pub fn collapsed(node: NodeId, offset: usize) -> Self {
        Self::new(node, offset, node, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_node == self.end_node && self.start_offset == self.end_offset
    }

    fn for_each_endpoint_mut(&mut self, mut f: impl FnMut(&mut NodeId, &mut usize)) {
        f(&mut self.start_node, &mut self.start_offset);
        f(&mut self.end_node, &mut self.end_offset);
    }
}

/// An insertion before a counted position shifts it up by one.
pub(crate) fn shift_for_insert<'a>(
    ranges: impl Iterator<Item = &'a mut Range>,
    parent: NodeId,
    index: usize,
) {
    for range in ranges {
        range.for_each_endpoint_mut(|node, offset| {
            if *node == parent && *offset > index {
                *offset += 1;
            }
        });
    }
}

/// Re-anchoring for the removal of `child` at `index` under `parent`:
/// endpoints inside the leaving subtree collapse onto the child's former
/// position, and positions counted past it shift down by one.
pub(crate) fn reanchor_for_remove<'a>(
    nodes: &[NodeSlot],
    ranges: impl Iterator<Item = &'a mut Range>,
    parent: NodeId,
    child: NodeId,
    index: usize,
) {
    for range in ranges {
        range.for_each_endpoint_mut(|node, offset| {
            if is_inclusive_ancestor(nodes, child, *node) {
                *node = parent;
                *offset = index;
            } else if *node == parent && *offset > index {
                *offset -= 1;
            }
        });
    }
}

/// Re-anchoring for a normalization merge, before `sibling` is deleted:
/// endpoints on the sibling move onto the surviving node `target` at the
/// accumulated offset `acc`, and endpoints on the parent at the sibling's
/// index move to `(target, acc)`.
pub(crate) fn reanchor_for_merge<'a>(
    ranges: impl Iterator<Item = &'a mut Range>,
    parent: NodeId,
    sibling: NodeId,
    sibling_index: usize,
    target: NodeId,
    acc: usize,
) {
    for range in ranges {
        range.for_each_endpoint_mut(|node, offset| {
            if *node == sibling {
                *node = target;
                *offset += acc;
            } else if *node == parent && *offset == sibling_index {
                *node = target;
                *offset = acc;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_cursor_has_equal_endpoints() {
        let range = Range::collapsed(NodeId(3), 2);
        assert!(range.is_collapsed());
        assert_eq!(range.start_node, range.end_node);
        assert_eq!(range.start_offset, 2);
    }

    #[test]
    fn insert_shift_moves_only_offsets_past_the_index() {
        let parent = NodeId(0);
        let mut ranges = [
            Range::collapsed(parent, 0),
            Range::collapsed(parent, 1),
            Range::collapsed(parent, 2),
            Range::collapsed(NodeId(9), 2),
        ];
        shift_for_insert(ranges.iter_mut(), parent, 1);

        assert_eq!(ranges[0].start_offset, 0);
        assert_eq!(ranges[1].start_offset, 1);
        assert_eq!(ranges[2].start_offset, 3);
        // Anchored elsewhere, untouched.
        assert_eq!(ranges[3].start_offset, 2);
    }

    #[test]
    fn merge_reanchor_moves_sibling_and_parent_index_anchors() {
        let parent = NodeId(0);
        let sibling = NodeId(2);
        let target = NodeId(1);
        let mut ranges = [
            Range::collapsed(sibling, 1),
            Range::collapsed(parent, 1),
            Range::collapsed(parent, 0),
        ];
        reanchor_for_merge(ranges.iter_mut(), parent, sibling, 1, target, 3);

        assert_eq!(ranges[0], Range::collapsed(target, 4));
        assert_eq!(ranges[1], Range::collapsed(target, 3));
        assert_eq!(ranges[2], Range::collapsed(parent, 0));
    }
}
