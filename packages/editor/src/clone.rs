//! Clone-with-fresh-ids for templates and copy-drags

use pagecraft_schema::{
    descendants_preorder, extract_subtree, fresh_id, IdSource, NodeGraph, NodeSubtree, NodeType,
};
use std::collections::{BTreeMap, HashSet};

/// Copy `subtree` giving every node a fresh id.
///
/// `taken` reports ids already used by the target tree; ids issued within
/// this clone are also avoided. Every `childrenOrder` entry is rewritten
/// through the same id map.
pub fn clone_subtree_with_ids<S, F>(subtree: &NodeSubtree, ids: &mut S, taken: F) -> NodeSubtree
where
    S: IdSource + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut issued = HashSet::new();
    clone_into(subtree, ids, &taken, &mut issued)
}

/// Anchor variant: a `fragment` root stands for several insertion points, so
/// each of its children becomes its own cloned subtree. Any other root
/// yields exactly one clone.
pub fn clone_subtree_with_ids_for_anchor<S, F>(
    subtree: &NodeSubtree,
    ids: &mut S,
    taken: F,
) -> Vec<NodeSubtree>
where
    S: IdSource + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut issued = HashSet::new();

    match subtree.root() {
        Some(root) if root.kind == NodeType::Fragment => root
            .children()
            .iter()
            .filter_map(|child| extract_subtree(subtree, child))
            .map(|part| clone_into(&part, ids, &taken, &mut issued))
            .collect(),
        Some(_) => vec![clone_into(subtree, ids, &taken, &mut issued)],
        None => Vec::new(),
    }
}

fn clone_into<S, F>(
    subtree: &NodeSubtree,
    ids: &mut S,
    taken: &F,
    issued: &mut HashSet<String>,
) -> NodeSubtree
where
    S: IdSource + ?Sized,
    F: Fn(&str) -> bool,
{
    // Document order so generated ids follow the tree; nodes the root
    // cannot reach stay behind
    let order = descendants_preorder(subtree, subtree.root_id());

    let mut id_map: BTreeMap<&str, String> = BTreeMap::new();
    for old_id in &order {
        let Some(node) = subtree.node(old_id) else {
            continue;
        };
        let new_id = fresh_id(ids, node.kind.name(), |candidate| {
            taken(candidate) || issued.contains(candidate)
        });
        issued.insert(new_id.clone());
        id_map.insert(old_id.as_str(), new_id);
    }

    let nodes = order.iter().filter_map(|old_id| {
        let node = subtree.node(old_id)?;
        let mut copy = node.clone();
        copy.id = id_map.get(old_id.as_str())?.clone();
        if let Some(children) = copy.children_order.as_mut() {
            *children = children
                .iter()
                .filter_map(|child| id_map.get(child.as_str()).cloned())
                .collect();
        }
        Some(copy)
    });

    let root_id = id_map
        .get(subtree.root_id())
        .cloned()
        .unwrap_or_else(|| subtree.root_id().to_string());
    NodeSubtree::from_nodes(root_id, nodes)
}
