//! Whole-subtree text normalization: merge runs of adjacent text nodes,
//! delete empty ones, keep every live cursor anchored.

use crate::document::Document;
use crate::mutation::TreeError;
use crate::node::NodeId;
use crate::range;

impl Document {
    /// Normalizes `node`'s children in document order, recursing into
    /// container children when `deep` is true.
    ///
    /// Empty text children are removed (notified normally). Runs of
    /// adjacent non-empty text children collapse into the first node of
    /// the run, and cursors anchored on a consumed sibling, or on the
    /// parent at that sibling's index, move onto the survivor at the
    /// accumulated offset before the sibling is deleted. The next node
    /// to visit is always re-read from live linkage, never taken from a
    /// precomputed list, so removals cannot skew the walk.
    pub fn normalize(&mut self, node: NodeId, deep: bool) -> Result<(), TreeError> {
        let mut cursor = self.first_child(node);
        while let Some(child) = cursor {
            if self.kind(child).is_text() {
                if self.data_len(child) == Some(0) {
                    let next = self.next_sibling(child);
                    self.remove_inner(node, child, false)?;
                    cursor = next;
                    continue;
                }
                self.merge_following_text(node, child)?;
                cursor = self.next_sibling(child);
            } else {
                if deep {
                    self.normalize(child, true)?;
                }
                cursor = self.next_sibling(child);
            }
        }
        Ok(())
    }

    /// Concatenates the text siblings immediately following `keep` onto
    /// it, then removes them in document order. Empty siblings inside
    /// the run are deleted up front and never participate in the
    /// concatenation.
    fn merge_following_text(&mut self, parent: NodeId, keep: NodeId) -> Result<(), TreeError> {
        let mut acc = match self.data_len(keep) {
            Some(len) => len,
            None => return Ok(()),
        };
        let mut consumed: Vec<NodeId> = Vec::new();
        let mut next = self.next_sibling(keep);
        while let Some(sibling) = next {
            if !self.kind(sibling).is_text() {
                break;
            }
            let advance = self.next_sibling(sibling);
            let len = self.data_len(sibling).unwrap_or(0);
            if len == 0 {
                self.remove_inner(parent, sibling, false)?;
                next = advance;
                continue;
            }
            let sibling_index = match self.index_of(parent, sibling) {
                Some(i) => i,
                None => {
                    debug_assert!(false, "text sibling missing from parent child list");
                    return Err(TreeError::NotFound);
                }
            };
            // Cursors move before the sibling leaves the tree.
            range::reanchor_for_merge(
                self.ranges.values_mut(),
                parent,
                sibling,
                sibling_index,
                keep,
                acc,
            );
            let data = match self.data(sibling) {
                Some(data) => data.to_string(),
                None => String::new(),
            };
            self.append_data(keep, &data);
            acc += len;
            consumed.push(sibling);
            next = advance;
        }
        for sibling in consumed {
            self.remove_inner(parent, sibling, false)?;
        }
        Ok(())
    }
}
