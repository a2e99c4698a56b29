//! # Structural Mutations
//!
//! Every operation on a [`PageSchema`] is a pure function returning the next
//! tree plus a [`Patch`] describing exactly what changed.
//!
//! ## Semantics
//!
//! ### Invalid input
//! - Unknown ids, cycles, root moves and id collisions are not errors
//! - The operation returns the input tree unchanged (borrowed) and an empty patch
//! - [`Mutation::validate`] explains why, for logging and tooling
//!
//! ### Move
//! - Atomic relocation of a node and its subtree
//! - Rejected if the target is the node itself or one of its descendants
//! - Same-parent moves exclude the node before computing its new index
//!
//! ### Remove
//! - Removes the node and all descendants
//! - The root is never removed

use crate::operations::{
    self, check_drop, check_graft, check_move, check_side_insert, check_side_move, check_template,
    sibling_parent,
};
use pagecraft_schema::{Axis, IdSource, NodeSubtree, PageSchema, Patch};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Edge of a reference node where something is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Top and left insert before the reference; bottom and right after it
    pub fn is_before(self) -> bool {
        matches!(self, Side::Top | Side::Left)
    }

    pub fn axis(self) -> Axis {
        match self {
            Side::Top | Side::Bottom => Axis::Vertical,
            Side::Left | Side::Right => Axis::Horizontal,
        }
    }
}

/// Where a dragged node or template lands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropTarget {
    #[serde(rename_all = "camelCase")]
    Inside { parent_id: String },

    #[serde(rename_all = "camelCase")]
    Side { ref_id: String, side: Side },
}

impl DropTarget {
    pub fn inside(parent_id: impl Into<String>) -> Self {
        DropTarget::Inside {
            parent_id: parent_id.into(),
        }
    }

    pub fn side(ref_id: impl Into<String>, side: Side) -> Self {
        DropTarget::Side {
            ref_id: ref_id.into(),
            side,
        }
    }
}

/// Structural operations, as issued by the canvas or read from an ops file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Graft a subtree as the last child of a container
    #[serde(rename_all = "camelCase")]
    InsertInside {
        parent_id: String,
        subtree: NodeSubtree,
    },

    /// Graft a subtree next to a reference node
    #[serde(rename_all = "camelCase")]
    InsertAtSide {
        ref_id: String,
        side: Side,
        subtree: NodeSubtree,
    },

    /// Like `InsertAtSide`, wrapping reference and subtree in an auto row or
    /// column when the side runs across the parent's layout axis
    #[serde(rename_all = "camelCase")]
    InsertAtSideWrapped {
        ref_id: String,
        side: Side,
        subtree: NodeSubtree,
    },

    /// Clone a palette template with fresh ids and insert it
    #[serde(rename_all = "camelCase")]
    InsertTemplate {
        target: DropTarget,
        template: NodeSubtree,
    },

    #[serde(rename_all = "camelCase")]
    MoveInto {
        node_id: String,
        new_parent_id: String,
    },

    #[serde(rename_all = "camelCase")]
    MoveToSide {
        node_id: String,
        ref_id: String,
        side: Side,
    },

    /// `index` is the final position within the new parent
    #[serde(rename_all = "camelCase")]
    MoveToIndex {
        node_id: String,
        new_parent_id: String,
        index: usize,
    },

    #[serde(rename_all = "camelCase")]
    Remove { node_id: String },

    #[serde(rename_all = "camelCase")]
    Duplicate { node_id: String },

    /// Drag-and-drop of an existing node; `copy` inserts a fresh-id clone
    #[serde(rename_all = "camelCase")]
    Drop {
        node_id: String,
        target: DropTarget,
        #[serde(default)]
        copy: bool,
    },
}

/// Why a mutation would leave the tree unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Node cannot have children: {0}")]
    NotAContainer(String),

    #[error("Root node cannot be removed, moved or given siblings")]
    RootImmovable,

    #[error("Node id already in use: {0}")]
    IdCollision(String),

    #[error("Subtree root missing from its nodes: {0}")]
    MissingSubtreeRoot(String),

    #[error("Subtree node unreachable from its root: {0}")]
    DetachedSubtreeNode(String),
}

/// Next tree plus what changed.
///
/// A no-op borrows the input tree, so callers can detect it without
/// comparing trees.
#[derive(Debug, Clone)]
pub struct MutationResult<'a> {
    pub next: Cow<'a, PageSchema>,
    pub patch: Patch,
}

impl<'a> MutationResult<'a> {
    pub fn unchanged(tree: &'a PageSchema) -> Self {
        Self {
            next: Cow::Borrowed(tree),
            patch: Patch::new(),
        }
    }

    pub fn changed(next: PageSchema, patch: Patch) -> Self {
        Self {
            next: Cow::Owned(next),
            patch,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.next, Cow::Borrowed(_))
    }

    /// Owned tree and patch, `None` for a no-op
    pub fn into_changed(self) -> Option<(PageSchema, Patch)> {
        match self.next {
            Cow::Owned(next) => Some((next, self.patch)),
            Cow::Borrowed(_) => None,
        }
    }

    pub fn tree(&self) -> &PageSchema {
        &self.next
    }
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertInside { .. } => "insertInside",
            Mutation::InsertAtSide { .. } => "insertAtSide",
            Mutation::InsertAtSideWrapped { .. } => "insertAtSideWrapped",
            Mutation::InsertTemplate { .. } => "insertTemplate",
            Mutation::MoveInto { .. } => "moveInto",
            Mutation::MoveToSide { .. } => "moveToSide",
            Mutation::MoveToIndex { .. } => "moveToIndex",
            Mutation::Remove { .. } => "remove",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Drop { .. } => "drop",
        }
    }

    /// Apply to `tree`, drawing any new ids from `ids`
    pub fn apply<'a>(&self, tree: &'a PageSchema, ids: &mut dyn IdSource) -> MutationResult<'a> {
        match self {
            Mutation::InsertInside { parent_id, subtree } => {
                operations::insert_inside(tree, parent_id, subtree)
            }
            Mutation::InsertAtSide {
                ref_id,
                side,
                subtree,
            } => operations::insert_at_side(tree, ref_id, *side, subtree),
            Mutation::InsertAtSideWrapped {
                ref_id,
                side,
                subtree,
            } => operations::insert_at_side_wrapped(tree, ref_id, *side, subtree, ids),
            Mutation::InsertTemplate { target, template } => {
                operations::insert_template(tree, target, template, ids)
            }
            Mutation::MoveInto {
                node_id,
                new_parent_id,
            } => operations::move_into(tree, node_id, new_parent_id),
            Mutation::MoveToSide {
                node_id,
                ref_id,
                side,
            } => operations::move_to_side(tree, ref_id, *side, node_id),
            Mutation::MoveToIndex {
                node_id,
                new_parent_id,
                index,
            } => operations::move_to_index(tree, node_id, new_parent_id, *index),
            Mutation::Remove { node_id } => operations::remove(tree, node_id),
            Mutation::Duplicate { node_id } => operations::duplicate(tree, node_id, ids),
            Mutation::Drop {
                node_id,
                target,
                copy,
            } => operations::drop_node(tree, node_id, target, *copy, ids),
        }
    }

    /// Why `apply` would be a no-op, without applying.
    ///
    /// `Ok` does not promise a change: moving a node to the position it
    /// already holds is valid and still a no-op.
    pub fn validate(&self, tree: &PageSchema) -> Result<(), MutationError> {
        match self {
            Mutation::InsertInside { parent_id, subtree } => check_graft(tree, parent_id, subtree),
            Mutation::InsertAtSide {
                ref_id, subtree, ..
            }
            | Mutation::InsertAtSideWrapped {
                ref_id, subtree, ..
            } => check_side_insert(tree, ref_id, subtree).map(|_| ()),
            Mutation::InsertTemplate { target, template } => check_template(tree, target, template),
            Mutation::MoveInto {
                node_id,
                new_parent_id,
            }
            | Mutation::MoveToIndex {
                node_id,
                new_parent_id,
                ..
            } => check_move(tree, node_id, new_parent_id).map(|_| ()),
            Mutation::MoveToSide {
                node_id, ref_id, ..
            } => check_side_move(tree, node_id, ref_id).map(|_| ()),
            Mutation::Remove { node_id } | Mutation::Duplicate { node_id } => {
                sibling_parent(tree, node_id).map(|_| ())
            }
            Mutation::Drop {
                node_id,
                target,
                copy,
            } => check_drop(tree, node_id, target, *copy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_schema::{Node, NodeType, SequentialIds};
    use serde_json::json;

    fn tree() -> PageSchema {
        PageSchema::from_nodes(
            "page",
            [
                Node::new("page", NodeType::Page).with_children(["section"]),
                Node::new("section", NodeType::Section).with_children(["h1"]),
                Node::new("h1", NodeType::Heading),
            ],
        )
    }

    #[test]
    fn test_mutation_wire_format() {
        let mutation: Mutation = serde_json::from_value(json!({
            "op": "moveToSide", "nodeId": "h1", "refId": "section", "side": "bottom"
        }))
        .unwrap();

        assert_eq!(
            mutation,
            Mutation::MoveToSide {
                node_id: "h1".into(),
                ref_id: "section".into(),
                side: Side::Bottom,
            }
        );

        let drop: Mutation = serde_json::from_value(json!({
            "op": "drop", "nodeId": "h1", "target": { "kind": "inside", "parentId": "section" }
        }))
        .unwrap();
        assert_eq!(drop.name(), "drop");
        assert!(matches!(drop, Mutation::Drop { copy: false, .. }));
    }

    #[test]
    fn test_validation_reasons() {
        let tree = tree();

        let cycle = Mutation::MoveInto {
            node_id: "section".into(),
            new_parent_id: "h1".into(),
        };
        assert_eq!(cycle.validate(&tree), Err(MutationError::NotAContainer("h1".into())));

        let cycle = Mutation::MoveInto {
            node_id: "page".into(),
            new_parent_id: "section".into(),
        };
        assert_eq!(cycle.validate(&tree), Err(MutationError::RootImmovable));

        let missing = Mutation::Remove {
            node_id: "nope".into(),
        };
        assert_eq!(missing.validate(&tree), Err(MutationError::NodeNotFound("nope".into())));

        let collision = Mutation::InsertInside {
            parent_id: "section".into(),
            subtree: NodeSubtree::new(Node::new("h1", NodeType::Heading)),
        };
        assert_eq!(collision.validate(&tree), Err(MutationError::IdCollision("h1".into())));
    }

    #[test]
    fn test_noop_borrows_input() {
        let tree = tree();
        let mut ids = SequentialIds::from_seed("t");

        let result = Mutation::Remove {
            node_id: "page".into(),
        }
        .apply(&tree, &mut ids);

        assert!(result.is_noop());
        assert!(std::ptr::eq(result.tree(), &tree));
        assert!(!result.patch.has_changes());
        assert!(result.into_changed().is_none());
    }

    #[test]
    fn test_side_geometry() {
        assert!(Side::Top.is_before() && Side::Left.is_before());
        assert!(!Side::Bottom.is_before() && !Side::Right.is_before());
        assert_eq!(Side::Left.axis(), Axis::Horizontal);
        assert_eq!(Side::Bottom.axis(), Axis::Vertical);
    }
}
