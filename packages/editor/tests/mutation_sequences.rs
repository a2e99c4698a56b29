//! Sequences of edits through the editor document
//!
//! This tests:
//! - Move + delete chains with undo/redo
//! - Bounded history depth
//! - Cleanup of auto wrappers across edits
//! - Document integrity after every step

use pagecraft_editor::{
    Change, DocumentKey, EditorConfig, EditorDocument, Mutation, Node, NodeSubtree, NodeType,
    PageSchema, Side,
};
use pagecraft_schema::apply_patch;

fn page() -> PageSchema {
    PageSchema::from_nodes(
        "page",
        [
            Node::new("page", NodeType::Page).with_children(["a", "b"]),
            Node::new("a", NodeType::Section).with_children(["a1"]),
            Node::new("a1", NodeType::Text),
            Node::new("b", NodeType::Section).with_children(["b1"]),
            Node::new("b1", NodeType::Text),
        ],
    )
}

fn document(depth: usize) -> EditorDocument {
    let config = EditorConfig {
        history_depth: depth,
        ..EditorConfig::default()
    };
    EditorDocument::new(DocumentKey::new("doc", "home"), page(), &config)
}

fn text(id: &str) -> NodeSubtree {
    NodeSubtree::new(Node::new(id, NodeType::Text))
}

#[test]
fn test_move_then_delete_sequence() {
    let mut doc = document(5);

    doc.apply(&Mutation::MoveInto {
        node_id: "b".into(),
        new_parent_id: "a".into(),
    })
    .unwrap();
    assert_eq!(doc.schema().nodes["a"].children(), ["a1", "b"]);

    doc.apply(&Mutation::Remove {
        node_id: "a".into(),
    })
    .unwrap();
    assert_eq!(doc.schema().nodes.len(), 1);

    // Undo delete restores the whole branch
    doc.undo().unwrap();
    assert!(doc.schema().nodes.contains_key("b1"));
    assert_eq!(doc.schema().nodes["a"].children(), ["a1", "b"]);

    doc.undo().unwrap();
    assert_eq!(doc.schema(), &page());

    doc.redo().unwrap();
    doc.redo().unwrap();
    assert_eq!(doc.schema().nodes.len(), 1);
}

#[test]
fn test_history_depth_limits_undo() {
    let mut doc = document(5);

    for n in 0..7 {
        doc.apply(&Mutation::InsertInside {
            parent_id: "b".into(),
            subtree: text(&format!("t{}", n)),
        })
        .unwrap();
    }

    let mut undone = 0;
    while doc.undo().is_some() {
        undone += 1;
    }

    assert_eq!(undone, 5);
    // The two oldest states are gone; t0 and t1 remain
    assert_eq!(doc.schema().nodes["b"].children(), ["b1", "t0", "t1"]);
}

#[test]
fn test_pending_patch_replays_whole_session() {
    let mut doc = document(5);
    let original = doc.schema().clone();

    doc.apply(&Mutation::InsertAtSideWrapped {
        ref_id: "a1".into(),
        side: Side::Right,
        subtree: text("x"),
    })
    .unwrap();
    doc.apply(&Mutation::MoveInto {
        node_id: "x".into(),
        new_parent_id: "b".into(),
    })
    .unwrap();
    doc.apply(&Mutation::MoveInto {
        node_id: "a1".into(),
        new_parent_id: "b".into(),
    })
    .unwrap();

    // Both children left the auto row, so cleanup removed it
    assert_eq!(doc.schema().nodes.len(), original.nodes.len() + 1);
    assert!(doc.schema().nodes["a"].children().is_empty());

    let pending = doc.take_pending().unwrap();
    assert_eq!(&apply_patch(&original, &pending).unwrap(), doc.schema());
}

#[test]
fn test_undo_after_branching_edit_has_no_redo() {
    let mut doc = document(5);

    doc.apply(&Mutation::Remove {
        node_id: "a1".into(),
    })
    .unwrap();
    doc.apply(&Mutation::Remove {
        node_id: "b1".into(),
    })
    .unwrap();
    doc.undo().unwrap();
    doc.apply(&Mutation::Duplicate {
        node_id: "b".into(),
    })
    .unwrap();

    assert!(doc.redo().is_none());
    let Some(Change::Patch(patch)) = doc.undo() else {
        panic!("expected a patch");
    };
    assert!(patch.has_changes());
    assert_eq!(doc.schema().validate(), Ok(()));
}

#[test]
fn test_rejected_mutations_leave_document_untouched() {
    let mut doc = document(5);
    let rejected = [
        Mutation::Remove {
            node_id: "page".into(),
        },
        Mutation::MoveInto {
            node_id: "a".into(),
            new_parent_id: "a1".into(),
        },
        Mutation::InsertInside {
            parent_id: "b".into(),
            subtree: text("a1"),
        },
        Mutation::MoveToSide {
            node_id: "ghost".into(),
            ref_id: "a".into(),
            side: Side::Top,
        },
    ];

    assert!(doc.apply_all(&rejected).is_none());
    assert_eq!(doc.schema(), &page());
    assert_eq!(doc.revision, 0);
    assert!(!doc.can_undo());
}
