use dom_forest::{Document, NodeId, TreeError};

/// Checks that every derived cache under `node` agrees with the literal
/// order of each child list, recursively.
fn assert_linkage(doc: &Document, node: NodeId) {
    let children = doc.child_nodes(node).to_vec();
    assert_eq!(doc.first_child(node), children.first().copied());
    assert_eq!(doc.last_child(node), children.last().copied());
    for (i, &child) in children.iter().enumerate() {
        assert_eq!(doc.parent(child), Some(node));
        let prev = if i == 0 { None } else { Some(children[i - 1]) };
        assert_eq!(doc.previous_sibling(child), prev);
        assert_eq!(doc.next_sibling(child), children.get(i + 1).copied());
        assert_linkage(doc, child);
    }
}

fn three_children(doc: &mut Document) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = doc.create_element("p");
    let root = doc.root();
    doc.append_child(root, parent).unwrap();
    let a = doc.create_element("a");
    let b = doc.create_element("b");
    let c = doc.create_element("c");
    doc.append_child(parent, a).unwrap();
    doc.append_child(parent, b).unwrap();
    doc.append_child(parent, c).unwrap();
    (parent, a, b, c)
}

#[test]
fn append_and_insert_keep_caches_consistent() {
    let mut doc = Document::new();
    let (parent, a, b, _c) = three_children(&mut doc);

    let x = doc.create_element("x");
    doc.insert_before(parent, x, Some(b)).unwrap();
    assert_eq!(doc.child_nodes(parent)[1], x);
    assert_eq!(doc.next_sibling(a), Some(x));
    assert_eq!(doc.previous_sibling(b), Some(x));
    assert_linkage(&doc, doc.root());
}

#[test]
fn insert_then_remove_round_trips_linkage() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    let x = doc.create_element("x");
    doc.insert_before(parent, x, Some(b)).unwrap();
    doc.remove_child(parent, x).unwrap();

    assert_eq!(doc.child_nodes(parent), &[a, b, c]);
    assert_eq!(doc.parent(x), None);
    assert_eq!(doc.previous_sibling(x), None);
    assert_eq!(doc.next_sibling(x), None);
    assert_linkage(&doc, doc.root());
}

#[test]
fn reparenting_detaches_from_old_parent_first() {
    let mut doc = Document::new();
    let root = doc.root();
    let p1 = doc.create_element("p1");
    let p2 = doc.create_element("p2");
    doc.append_child(root, p1).unwrap();
    doc.append_child(root, p2).unwrap();
    let a = doc.create_element("a");
    doc.append_child(p1, a).unwrap();

    doc.append_child(p2, a).unwrap();

    assert!(doc.child_nodes(p1).is_empty());
    assert_eq!(doc.child_nodes(p2), &[a]);
    assert_eq!(doc.parent(a), Some(p2));
    assert_linkage(&doc, root);
}

#[test]
fn reinserting_under_same_parent_moves_the_node() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    // c moves before a: detach then insert.
    doc.insert_before(parent, c, Some(a)).unwrap();
    assert_eq!(doc.child_nodes(parent), &[c, a, b]);
    assert_linkage(&doc, doc.root());
}

#[test]
fn insert_before_self_degenerates_to_current_position() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    doc.insert_before(parent, b, Some(b)).unwrap();

    assert_eq!(doc.child_nodes(parent), &[a, b, c]);
    assert_linkage(&doc, doc.root());
}

#[test]
fn insert_before_self_matches_precomputed_next_sibling() {
    fn tags(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.child_nodes(parent)
            .iter()
            .map(|&n| format!("{:?}", doc.kind(n)))
            .collect()
    }

    let mut doc = Document::new();
    let (parent, _a, b, _c) = three_children(&mut doc);
    doc.insert_before(parent, b, Some(b)).unwrap();

    let mut doc2 = Document::new();
    let (parent2, _a2, b2, _c2) = three_children(&mut doc2);
    let next = doc2.next_sibling(b2);
    doc2.insert_before(parent2, b2, next).unwrap();

    assert_eq!(tags(&doc, parent), tags(&doc2, parent2));
}

#[test]
fn replace_swaps_in_place() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let n = doc.create_element("n");

    let replaced = doc.replace_child(parent, n, b).unwrap();

    assert_eq!(replaced, b);
    assert_eq!(doc.child_nodes(parent), &[a, n, c]);
    assert_eq!(doc.parent(b), None);
    assert_eq!(doc.previous_sibling(b), None);
    assert_eq!(doc.next_sibling(b), None);
    assert_linkage(&doc, doc.root());
}

#[test]
fn replace_last_child() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let n = doc.create_element("n");

    doc.replace_child(parent, n, c).unwrap();

    assert_eq!(doc.child_nodes(parent), &[a, b, n]);
    assert_eq!(doc.last_child(parent), Some(n));
    assert_linkage(&doc, doc.root());
}

#[test]
fn failed_preconditions_mutate_nothing() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let stranger = doc.create_element("s");
    let x = doc.create_element("x");

    assert_eq!(
        doc.insert_before(parent, x, Some(stranger)),
        Err(TreeError::NotFound)
    );
    assert_eq!(doc.remove_child(parent, stranger), Err(TreeError::NotFound));
    assert_eq!(
        doc.replace_child(parent, x, stranger),
        Err(TreeError::NotFound)
    );

    assert_eq!(doc.child_nodes(parent), &[a, b, c]);
    assert_eq!(doc.parent(x), None);
    assert_linkage(&doc, doc.root());
}

#[test]
fn removed_subtree_stays_intact_inside() {
    let mut doc = Document::new();
    let root = doc.root();
    let el = doc.create_element("el");
    let inner = doc.create_element("inner");
    let text = doc.create_text("t");
    doc.append_child(root, el).unwrap();
    doc.append_child(el, inner).unwrap();
    doc.append_child(inner, text).unwrap();

    doc.remove_child(root, el).unwrap();

    assert_eq!(doc.parent(el), None);
    assert_eq!(doc.child_nodes(el), &[inner]);
    assert_eq!(doc.child_nodes(inner), &[text]);
    assert_linkage(&doc, el);
}

#[test]
fn contains_is_inclusive_and_breaks_on_detach() {
    let mut doc = Document::new();
    let root = doc.root();
    let el = doc.create_element("el");
    let grand = doc.create_element("grand");
    doc.append_child(root, el).unwrap();
    doc.append_child(el, grand).unwrap();

    assert!(doc.contains(el, el));
    assert!(doc.contains(root, grand));
    assert!(!doc.contains(grand, el));

    doc.remove_child(root, el).unwrap();
    assert!(!doc.contains(root, grand));
    assert!(!doc.contains(el, root));
    // Detached nodes still contain their own subtree.
    assert!(doc.contains(el, grand));
}
