//! Pure tree operations behind [`Mutation`](crate::Mutation).
//!
//! Each public operation runs its `check_*` guard first. A failed guard is
//! logged at debug level and turns the operation into a no-op.

use crate::clone::{clone_subtree_with_ids, clone_subtree_with_ids_for_anchor};
use crate::mutations::{DropTarget, MutationError, MutationResult, Side};
use pagecraft_schema::{
    collect_descendants, extract_subtree, find_parent_id, fresh_id, get_children, IdSource, Node,
    NodeGraph, NodeSubtree, NodeType, Origin, PageSchema, Patch,
};
use tracing::debug;

fn skipped<'a>(tree: &'a PageSchema, op: &'static str, err: MutationError) -> MutationResult<'a> {
    debug!(op, reason = %err, "Mutation is a no-op");
    MutationResult::unchanged(tree)
}

/// Sequential composition of operations over one input tree
pub(crate) struct Chain<'a> {
    base: &'a PageSchema,
    current: Option<PageSchema>,
    patch: Patch,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(base: &'a PageSchema) -> Self {
        Self {
            base,
            current: None,
            patch: Patch::new(),
        }
    }

    pub(crate) fn tree(&self) -> &PageSchema {
        self.current.as_ref().unwrap_or(self.base)
    }

    /// Run `op` on the current tree; returns whether it changed anything
    pub(crate) fn step<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&PageSchema) -> MutationResult<'_>,
    {
        let changed = op(self.tree()).into_changed();
        match changed {
            Some((next, patch)) => {
                self.patch.merge_from(&patch);
                self.current = Some(next);
                true
            }
            None => false,
        }
    }

    pub(crate) fn finish(self) -> MutationResult<'a> {
        match self.current {
            Some(next) => MutationResult::changed(next, self.patch),
            None => MutationResult::unchanged(self.base),
        }
    }
}

// -- guards -----------------------------------------------------------------

/// Parent of a non-root node
pub(crate) fn sibling_parent<'t>(tree: &'t PageSchema, node_id: &str) -> Result<&'t str, MutationError> {
    if !tree.contains(node_id) {
        return Err(MutationError::NodeNotFound(node_id.to_string()));
    }
    if node_id == tree.root_id {
        return Err(MutationError::RootImmovable);
    }
    find_parent_id(tree, node_id).ok_or_else(|| MutationError::ParentNotFound(node_id.to_string()))
}

fn check_container(tree: &PageSchema, parent_id: &str) -> Result<(), MutationError> {
    let parent = tree
        .node(parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
    if !parent.is_container() {
        return Err(MutationError::NotAContainer(parent_id.to_string()));
    }
    Ok(())
}

fn check_subtree(tree: &PageSchema, subtree: &NodeSubtree) -> Result<(), MutationError> {
    if !subtree.contains(&subtree.root_id) {
        return Err(MutationError::MissingSubtreeRoot(subtree.root_id.clone()));
    }
    if let Some(id) = subtree.nodes.keys().find(|id| tree.contains(id)) {
        return Err(MutationError::IdCollision(id.clone()));
    }

    let reached = collect_descendants(subtree, &subtree.root_id);
    match subtree.nodes.keys().find(|id| !reached.contains(id.as_str())) {
        Some(id) => Err(MutationError::DetachedSubtreeNode(id.clone())),
        None => Ok(()),
    }
}

pub(crate) fn check_graft(
    tree: &PageSchema,
    parent_id: &str,
    subtree: &NodeSubtree,
) -> Result<(), MutationError> {
    check_container(tree, parent_id)?;
    check_subtree(tree, subtree)
}

/// Returns the reference node's parent
pub(crate) fn check_side_insert<'t>(
    tree: &'t PageSchema,
    ref_id: &str,
    subtree: &NodeSubtree,
) -> Result<&'t str, MutationError> {
    let parent_id = sibling_parent(tree, ref_id)?;
    check_subtree(tree, subtree)?;
    Ok(parent_id)
}

/// Returns the moving node's current parent
pub(crate) fn check_move<'t>(
    tree: &'t PageSchema,
    node_id: &str,
    new_parent_id: &str,
) -> Result<&'t str, MutationError> {
    let old_parent = sibling_parent(tree, node_id)?;
    check_container(tree, new_parent_id)?;
    if collect_descendants(tree, node_id).contains(new_parent_id) {
        return Err(MutationError::CycleDetected);
    }
    Ok(old_parent)
}

/// Returns `(old parent, reference parent)`
pub(crate) fn check_side_move<'t>(
    tree: &'t PageSchema,
    node_id: &str,
    ref_id: &str,
) -> Result<(&'t str, &'t str), MutationError> {
    let ref_parent = sibling_parent(tree, ref_id)?;
    let old_parent = check_move(tree, node_id, ref_parent)?;
    Ok((old_parent, ref_parent))
}

pub(crate) fn check_template(
    tree: &PageSchema,
    target: &DropTarget,
    template: &NodeSubtree,
) -> Result<(), MutationError> {
    if !template.contains(&template.root_id) {
        return Err(MutationError::MissingSubtreeRoot(template.root_id.clone()));
    }
    match target {
        DropTarget::Inside { parent_id } => check_container(tree, parent_id),
        DropTarget::Side { ref_id, .. } => sibling_parent(tree, ref_id).map(|_| ()),
    }
}

pub(crate) fn check_drop(
    tree: &PageSchema,
    node_id: &str,
    target: &DropTarget,
    copy: bool,
) -> Result<(), MutationError> {
    if copy {
        if !tree.contains(node_id) {
            return Err(MutationError::NodeNotFound(node_id.to_string()));
        }
        return match target {
            DropTarget::Inside { parent_id } => check_container(tree, parent_id),
            DropTarget::Side { ref_id, .. } => sibling_parent(tree, ref_id).map(|_| ()),
        };
    }
    match target {
        DropTarget::Inside { parent_id } => check_move(tree, node_id, parent_id).map(|_| ()),
        DropTarget::Side { ref_id, .. } => check_side_move(tree, node_id, ref_id).map(|_| ()),
    }
}

// -- helpers ----------------------------------------------------------------

fn children_mut<'t>(tree: &'t mut PageSchema, id: &str) -> Option<&'t mut Vec<String>> {
    let node = tree.nodes.get_mut(id)?;
    Some(node.children_order.get_or_insert_with(Vec::new))
}

fn position_of(tree: &PageSchema, parent_id: &str, child_id: &str) -> usize {
    get_children(tree, parent_id)
        .iter()
        .position(|child| child == child_id)
        .unwrap_or(0)
}

/// Graft at a clamped index; guards must already have passed
fn graft_at<'a>(
    tree: &'a PageSchema,
    parent_id: &str,
    index: usize,
    subtree: &NodeSubtree,
) -> MutationResult<'a> {
    let mut next = tree.clone();
    let mut patch = Patch::new();

    for node in subtree.nodes.values() {
        next.nodes.insert(node.id.clone(), node.clone());
        patch.set_node(node);
    }

    let Some(order) = children_mut(&mut next, parent_id) else {
        return MutationResult::unchanged(tree);
    };
    let index = index.min(order.len());
    order.insert(index, subtree.root_id.clone());
    patch.set_children(parent_id, order);

    MutationResult::changed(next, patch)
}

// -- inserts ----------------------------------------------------------------

/// Append `subtree` to `parent_id`'s children
pub fn insert_inside<'a>(tree: &'a PageSchema, parent_id: &str, subtree: &NodeSubtree) -> MutationResult<'a> {
    match check_graft(tree, parent_id, subtree) {
        Ok(()) => graft_at(tree, parent_id, usize::MAX, subtree),
        Err(err) => skipped(tree, "insert_inside", err),
    }
}

/// Insert `subtree` immediately before or after `ref_id`
pub fn insert_at_side<'a>(
    tree: &'a PageSchema,
    ref_id: &str,
    side: Side,
    subtree: &NodeSubtree,
) -> MutationResult<'a> {
    let parent_id = match check_side_insert(tree, ref_id, subtree) {
        Ok(parent_id) => parent_id,
        Err(err) => return skipped(tree, "insert_at_side", err),
    };

    let index = position_of(tree, parent_id, ref_id) + usize::from(!side.is_before());
    graft_at(tree, parent_id, index, subtree)
}

/// Side insert that wraps across the parent's axis.
///
/// Dropping on the left of a node stacked vertically replaces the node with
/// an auto `row` holding both; dropping above a node in a row uses an auto
/// `column`. Along the parent's axis this is a plain [`insert_at_side`].
pub fn insert_at_side_wrapped<'a, S>(
    tree: &'a PageSchema,
    ref_id: &str,
    side: Side,
    subtree: &NodeSubtree,
    ids: &mut S,
) -> MutationResult<'a>
where
    S: IdSource + ?Sized,
{
    let parent_id = match check_side_insert(tree, ref_id, subtree) {
        Ok(parent_id) => parent_id,
        Err(err) => return skipped(tree, "insert_at_side_wrapped", err),
    };
    if tree.node(parent_id).map(Node::layout_axis) == Some(side.axis()) {
        return insert_at_side(tree, ref_id, side, subtree);
    }

    let kind = match side {
        Side::Left | Side::Right => NodeType::Row,
        Side::Top | Side::Bottom => NodeType::Column,
    };
    let wrapper_id = fresh_id(ids, kind.name(), |id| tree.contains(id) || subtree.contains(id));
    let children = if side.is_before() {
        [subtree.root_id.clone(), ref_id.to_string()]
    } else {
        [ref_id.to_string(), subtree.root_id.clone()]
    };
    let wrapper = Node::new(wrapper_id.clone(), kind)
        .with_children(children)
        .with_origin(Origin::Auto);

    let mut next = tree.clone();
    let mut patch = Patch::new();

    for node in subtree.nodes.values() {
        next.nodes.insert(node.id.clone(), node.clone());
        patch.set_node(node);
    }
    patch.set_node(&wrapper);
    next.nodes.insert(wrapper_id.clone(), wrapper);

    let Some(order) = children_mut(&mut next, parent_id) else {
        return MutationResult::unchanged(tree);
    };
    for child in order.iter_mut().filter(|child| child.as_str() == ref_id) {
        *child = wrapper_id.clone();
    }
    patch.set_children(parent_id, order);

    debug!(wrapper = %wrapper_id, parent = parent_id, "Wrapped drop target");
    MutationResult::changed(next, patch)
}

/// Clone a template with fresh ids and insert each resulting subtree.
///
/// Fragment templates expand to several siblings which keep their template
/// order at the target.
pub fn insert_template<'a, S>(
    tree: &'a PageSchema,
    target: &DropTarget,
    template: &NodeSubtree,
    ids: &mut S,
) -> MutationResult<'a>
where
    S: IdSource + ?Sized,
{
    if let Err(err) = check_template(tree, target, template) {
        return skipped(tree, "insert_template", err);
    }

    let parts = clone_subtree_with_ids_for_anchor(template, ids, |id| tree.contains(id));
    let mut chain = Chain::new(tree);
    match target {
        DropTarget::Inside { parent_id } => {
            for part in &parts {
                chain.step(|current| insert_inside(current, parent_id, part));
            }
        }
        DropTarget::Side { ref_id, side } => {
            let mut anchor = ref_id.clone();
            for part in &parts {
                let inserted = chain.step(|current| insert_at_side(current, &anchor, *side, part));
                if inserted && !side.is_before() {
                    anchor = part.root_id.clone();
                }
            }
        }
    }
    chain.finish()
}

// -- moves ------------------------------------------------------------------

/// Move to `final_index` in the new parent's order, as seen after the node
/// has been taken out of its old position
fn relocate<'a>(
    tree: &'a PageSchema,
    node_id: &str,
    old_parent: &str,
    new_parent: &str,
    final_index: usize,
) -> MutationResult<'a> {
    let mut next = tree.clone();
    let mut patch = Patch::new();

    let Some(old_order) = children_mut(&mut next, old_parent) else {
        return MutationResult::unchanged(tree);
    };
    let before = old_order.clone();
    old_order.retain(|child| child != node_id);
    if old_parent != new_parent {
        patch.set_children(old_parent, old_order);
    }

    let Some(new_order) = children_mut(&mut next, new_parent) else {
        return MutationResult::unchanged(tree);
    };
    let index = final_index.min(new_order.len());
    new_order.insert(index, node_id.to_string());

    if old_parent == new_parent && *new_order == before {
        return MutationResult::unchanged(tree);
    }
    patch.set_children(new_parent, new_order);

    MutationResult::changed(next, patch)
}

/// Append `node_id` to `new_parent_id`'s children
pub fn move_into<'a>(tree: &'a PageSchema, node_id: &str, new_parent_id: &str) -> MutationResult<'a> {
    match check_move(tree, node_id, new_parent_id) {
        Ok(old_parent) => relocate(tree, node_id, old_parent, new_parent_id, usize::MAX),
        Err(err) => skipped(tree, "move_into", err),
    }
}

/// Move `node_id` so it ends up at `index` among `new_parent_id`'s children.
///
/// With `[a, b, c]`, moving `a` to 2 yields `[b, c, a]`.
pub fn move_to_index<'a>(
    tree: &'a PageSchema,
    node_id: &str,
    new_parent_id: &str,
    index: usize,
) -> MutationResult<'a> {
    match check_move(tree, node_id, new_parent_id) {
        Ok(old_parent) => relocate(tree, node_id, old_parent, new_parent_id, index),
        Err(err) => skipped(tree, "move_to_index", err),
    }
}

/// Move `moving_id` next to `ref_id`
pub fn move_to_side<'a>(tree: &'a PageSchema, ref_id: &str, side: Side, moving_id: &str) -> MutationResult<'a> {
    let (old_parent, parent_id) = match check_side_move(tree, moving_id, ref_id) {
        Ok(parents) => parents,
        Err(err) => return skipped(tree, "move_to_side", err),
    };

    // Slot in the order as it is now, before the moving node is taken out
    let mut index = position_of(tree, parent_id, ref_id) + usize::from(!side.is_before());
    if old_parent == parent_id && position_of(tree, parent_id, moving_id) < index {
        index -= 1;
    }

    relocate(tree, moving_id, old_parent, parent_id, index)
}

// -- removal and copies -------------------------------------------------------

/// Remove `node_id` and its whole subtree
pub fn remove<'a>(tree: &'a PageSchema, node_id: &str) -> MutationResult<'a> {
    let parent_id = match sibling_parent(tree, node_id) {
        Ok(parent_id) => parent_id,
        Err(err) => return skipped(tree, "remove", err),
    };

    let mut next = tree.clone();
    let mut patch = Patch::new();

    let Some(order) = children_mut(&mut next, parent_id) else {
        return MutationResult::unchanged(tree);
    };
    order.retain(|child| child != node_id);
    patch.set_children(parent_id, order);

    // Detached now, so this is exactly the removed branch
    for id in collect_descendants(&next, node_id) {
        next.nodes.remove(&id);
        patch.delete_node(&id);
    }

    MutationResult::changed(next, patch)
}

/// Clone `node_id` (and its subtree) with fresh ids right after the original
pub fn duplicate<'a, S>(tree: &'a PageSchema, node_id: &str, ids: &mut S) -> MutationResult<'a>
where
    S: IdSource + ?Sized,
{
    let parent_id = match sibling_parent(tree, node_id) {
        Ok(parent_id) => parent_id,
        Err(err) => return skipped(tree, "duplicate", err),
    };
    let Some(branch) = extract_subtree(tree, node_id) else {
        return MutationResult::unchanged(tree);
    };

    let copy = clone_subtree_with_ids(&branch, ids, |id| tree.contains(id));
    let index = position_of(tree, parent_id, node_id) + 1;
    graft_at(tree, parent_id, index, &copy)
}

/// Finish a drag of an existing node.
///
/// With `copy` the node's branch is cloned with fresh ids and inserted at
/// the target, leaving the original in place; otherwise the node moves.
pub fn drop_node<'a, S>(
    tree: &'a PageSchema,
    moving_id: &str,
    target: &DropTarget,
    copy: bool,
    ids: &mut S,
) -> MutationResult<'a>
where
    S: IdSource + ?Sized,
{
    if let Err(err) = check_drop(tree, moving_id, target, copy) {
        return skipped(tree, "drop_node", err);
    }

    if !copy {
        return match target {
            DropTarget::Inside { parent_id } => move_into(tree, moving_id, parent_id),
            DropTarget::Side { ref_id, side } => move_to_side(tree, ref_id, *side, moving_id),
        };
    }

    let Some(branch) = extract_subtree(tree, moving_id) else {
        return MutationResult::unchanged(tree);
    };
    let copy = clone_subtree_with_ids(&branch, ids, |id| tree.contains(id));
    match target {
        DropTarget::Inside { parent_id } => insert_inside(tree, parent_id, &copy),
        DropTarget::Side { ref_id, side } => insert_at_side(tree, ref_id, *side, &copy),
    }
}
