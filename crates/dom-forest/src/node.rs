//! Node kinds and the per-node arena slot.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::observer::Registration;

/// Handle to a node slot inside a [`Document`](crate::Document) arena.
///
/// Ids are only meaningful for the document that allocated them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of node kinds participating in the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(String),
    Text(String),
    Comment(String),
}

impl NodeKind {
    /// Character data for kinds that carry it, `None` for container kinds.
    pub fn data(&self) -> Option<&str> {
        match self {
            NodeKind::Text(data) | NodeKind::Comment(data) => Some(data),
            NodeKind::Document | NodeKind::Element(_) => None,
        }
    }

    /// Character-data length in UTF-16 code units.
    pub fn data_len(&self) -> Option<usize> {
        self.data().map(utf16_len)
    }

    /// Only text nodes are merged by normalization; comments carry
    /// character data but never participate.
    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }
}

/// Length of `s` in UTF-16 code units, the unit cursor offsets count
/// inside character-data nodes.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// One arena slot: kind plus tree linkage, user tags, and observer
/// registrations.
///
/// `children` is the single source of truth for sibling order. The
/// `first_child` / `last_child` / `prev_sibling` / `next_sibling` fields
/// are caches recomputed by the mutation operations and are never set
/// independently.
#[derive(Clone, Debug)]
pub(crate) struct NodeSlot {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub tags: BTreeMap<String, Value>,
    pub observers: Vec<Registration>,
}

impl NodeSlot {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            tags: BTreeMap::new(),
            observers: Vec::new(),
        }
    }
}

/// `true` when walking `node`'s parent chain reaches `ancestor`. A node
/// is its own inclusive ancestor.
pub(crate) fn is_inclusive_ancestor(nodes: &[NodeSlot], ancestor: NodeId, node: NodeId) -> bool {
    let mut curr = Some(node);
    while let Some(id) = curr {
        if id == ancestor {
            return true;
        }
        curr = nodes[id.index()].parent;
    }
    false
}
