//! Arena-backed document-tree mutation kernel.
//!
//! A [`Document`] owns an ordered tree of nodes and keeps two kinds of
//! dependents consistent across every structural edit: live cursors
//! ([`Range`]) anchored into the tree, and change-notification consumers
//! fed through a [`NotificationSink`]. Insertion, removal, replacement,
//! and text normalization atomically update parent/child/sibling
//! linkage, re-anchor every affected cursor, and enqueue one
//! [`ChangeRecord`] per edit in call order.
//!
//! ```
//! use dom_forest::{Document, RecordQueue};
//!
//! let queue = RecordQueue::new();
//! let mut doc = Document::with_sink(Box::new(queue.clone()));
//! let root = doc.root();
//! let para = doc.create_element("p");
//! let hello = doc.create_text("hello");
//! doc.append_child(root, para).unwrap();
//! doc.append_child(para, hello).unwrap();
//!
//! assert_eq!(doc.child_nodes(para), &[hello]);
//! assert_eq!(queue.take_records().len(), 2);
//! ```

pub mod document;
pub mod mutation;
pub mod node;
pub mod observer;
pub mod range;

mod normalize;

pub use document::Document;
pub use mutation::TreeError;
pub use node::{utf16_len, NodeId, NodeKind};
pub use observer::{
    ChangeKind, ChangeRecord, NotificationSink, ObserveOptions, ObserverId, RecordQueue,
    Registration,
};
pub use range::{Range, RangeId};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
