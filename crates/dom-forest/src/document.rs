//! The owning document: node arena, live-cursor registry, and
//! notification sink.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::node::{is_inclusive_ancestor, NodeId, NodeKind, NodeSlot};
use crate::observer::{NotificationSink, ObserveOptions, ObserverId, RecordQueue, Registration};
use crate::range::{Range, RangeId};

/// A document tree and everything that depends on it.
///
/// The document exclusively owns every node in an arena; [`NodeId`]
/// handles are non-owning lookups, so parent back-references and sibling
/// cross-references never form ownership cycles. Detaching a subtree
/// leaves its slots allocated: a detached node stays addressable, can be
/// observed, and can be re-inserted.
///
/// All mutation runs single-threaded and synchronously; change records
/// reach the sink in exact call order.
pub struct Document {
    pub(crate) nodes: Vec<NodeSlot>,
    pub(crate) ranges: BTreeMap<u64, Range>,
    next_range_id: u64,
    pub(crate) sink: Box<dyn NotificationSink>,
    root: NodeId,
}

impl Document {
    /// Document with the default [`RecordQueue`] sink. Keep a clone of
    /// the queue (see [`Document::with_sink`]) to drain records.
    pub fn new() -> Self {
        Self::with_sink(Box::new(RecordQueue::new()))
    }

    /// Document delivering change records to an explicit sink handle.
    pub fn with_sink(sink: Box<dyn NotificationSink>) -> Self {
        Self {
            nodes: vec![NodeSlot::new(NodeKind::Document)],
            ranges: BTreeMap::new(),
            next_range_id: 1,
            sink,
            root: NodeId(0),
        }
    }

    /// The document node itself.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeSlot::new(kind));
        NodeId((self.nodes.len() - 1) as u32)
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Element(tag.into()))
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(data.into()))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(data.into()))
    }

    // ---- navigation ----

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.index()].kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].first_child
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].last_child
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].next_sibling
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].prev_sibling
    }

    /// The node's children in document order.
    pub fn child_nodes(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Position of `child` in `parent`'s child list.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.index()]
            .children
            .iter()
            .position(|&c| c == child)
    }

    /// `true` when `ancestor` is `node` or an ancestor of it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        is_inclusive_ancestor(&self.nodes, ancestor, node)
    }

    // ---- character data (the node-kind contract) ----

    /// Character data, for text and comment nodes.
    pub fn data(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.index()].kind.data()
    }

    /// Character-data length in UTF-16 code units.
    pub fn data_len(&self, node: NodeId) -> Option<usize> {
        self.nodes[node.index()].kind.data_len()
    }

    /// Appends to a node's character data. Container kinds are left
    /// untouched.
    pub fn append_data(&mut self, node: NodeId, suffix: &str) {
        if let NodeKind::Text(data) | NodeKind::Comment(data) =
            &mut self.nodes[node.index()].kind
        {
            data.push_str(suffix);
        }
    }

    // ---- user tags ----

    pub fn tag(&self, node: NodeId, key: &str) -> Option<&Value> {
        self.nodes[node.index()].tags.get(key)
    }

    /// Stores a tag value, returning the previous value under that key.
    pub fn set_tag(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        self.nodes[node.index()].tags.insert(key.into(), value)
    }

    // ---- observer registrations ----

    /// Attaches a registration to `node`. The observer subsystem creates
    /// permanent entries through this; the removal path creates transient
    /// ones.
    pub fn observe(
        &mut self,
        node: NodeId,
        observer: ObserverId,
        options: ObserveOptions,
        transient: bool,
    ) {
        self.nodes[node.index()].observers.push(Registration {
            observer,
            options,
            transient,
        });
    }

    /// Drops every registration `observer` holds on `node`, transient
    /// copies included.
    pub fn unobserve(&mut self, node: NodeId, observer: ObserverId) {
        self.nodes[node.index()]
            .observers
            .retain(|reg| reg.observer != observer);
    }

    pub fn registrations(&self, node: NodeId) -> &[Registration] {
        &self.nodes[node.index()].observers
    }

    // ---- live-cursor registry ----

    /// Registers a live cursor. The kernel rewrites its four fields in
    /// place on every mutation until it is removed from the registry.
    pub fn add_range(&mut self, range: Range) -> RangeId {
        let id = RangeId(self.next_range_id);
        self.next_range_id += 1;
        self.ranges.insert(id.0, range);
        id
    }

    pub fn range(&self, id: RangeId) -> Option<&Range> {
        self.ranges.get(&id.0)
    }

    pub fn remove_range(&mut self, id: RangeId) -> Option<Range> {
        self.ranges.remove(&id.0)
    }

    /// Live cursors in registration order.
    pub fn ranges(&self) -> impl Iterator<Item = (RangeId, &Range)> {
        self.ranges.iter().map(|(&id, range)| (RangeId(id), range))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
