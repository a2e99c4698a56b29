//! # Page Schema Tree
//!
//! A document is a flat id → node map plus a root id; structure lives in each
//! container's `childrenOrder`. A valid tree satisfies:
//!
//! - the root exists and is nobody's child
//! - every referenced child exists
//! - every non-root node has exactly one parent
//! - every node is reachable from the root (no orphans, hence no cycles)

use crate::error::SchemaError;
use crate::result::SchemaResult;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Read access shared by documents and detached subtrees
pub trait NodeGraph {
    fn root_id(&self) -> &str;
    fn nodes(&self) -> &BTreeMap<String, Node>;

    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes().get(id)
    }

    fn contains(&self, id: &str) -> bool {
        self.nodes().contains_key(id)
    }
}

/// A committed page document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSchema {
    pub root_id: String,
    pub nodes: BTreeMap<String, Node>,
}

/// A detached fragment (template or extracted branch). Its ids are local and
/// must be regenerated before it is grafted into a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSubtree {
    pub root_id: String,
    pub nodes: BTreeMap<String, Node>,
}

impl NodeGraph for PageSchema {
    fn root_id(&self) -> &str {
        &self.root_id
    }

    fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }
}

impl NodeGraph for NodeSubtree {
    fn root_id(&self) -> &str {
        &self.root_id
    }

    fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }
}

fn index_nodes(nodes: impl IntoIterator<Item = Node>) -> BTreeMap<String, Node> {
    nodes.into_iter().map(|node| (node.id.clone(), node)).collect()
}

impl PageSchema {
    pub fn new(root: Node) -> Self {
        Self {
            root_id: root.id.clone(),
            nodes: index_nodes([root]),
        }
    }

    /// Build from a root id and a node list (keys taken from `node.id`)
    pub fn from_nodes(root_id: impl Into<String>, nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            root_id: root_id.into(),
            nodes: index_nodes(nodes),
        }
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Check every structural invariant, reporting the first violation
    pub fn validate(&self) -> SchemaResult<()> {
        validate_graph(self)
    }
}

impl NodeSubtree {
    pub fn new(root: Node) -> Self {
        Self {
            root_id: root.id.clone(),
            nodes: index_nodes([root]),
        }
    }

    pub fn from_nodes(root_id: impl Into<String>, nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            root_id: root_id.into(),
            nodes: index_nodes(nodes),
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Whether a node's `childrenOrder` is meaningful
pub fn is_container(node: &Node) -> bool {
    node.is_container()
}

/// Ordered children of `id`; empty for leaves and unknown ids
pub fn get_children<'a, G: NodeGraph + ?Sized>(tree: &'a G, id: &str) -> &'a [String] {
    tree.node(id).map(Node::children).unwrap_or(&[])
}

/// Linear scan for the node whose `childrenOrder` lists `id`
pub fn find_parent_id<'a, G: NodeGraph + ?Sized>(tree: &'a G, id: &str) -> Option<&'a str> {
    tree.nodes()
        .values()
        .find(|node| node.children().iter().any(|child| child == id))
        .map(|node| node.id.as_str())
}

/// `id` plus every node reachable from it through `childrenOrder`.
///
/// Empty when `id` is unknown. Terminates on malformed (cyclic) input.
pub fn collect_descendants<G: NodeGraph + ?Sized>(tree: &G, id: &str) -> BTreeSet<String> {
    descendants_preorder(tree, id).into_iter().collect()
}

/// Same set as [`collect_descendants`], in depth-first pre-order
pub fn descendants_preorder<G: NodeGraph + ?Sized>(tree: &G, id: &str) -> Vec<String> {
    let mut order = Vec::new();
    if !tree.contains(id) {
        return order;
    }

    let mut seen = BTreeSet::new();
    let mut stack = vec![id.to_string()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        for child in get_children(tree, &current).iter().rev() {
            if tree.contains(child) && !seen.contains(child) {
                stack.push(child.clone());
            }
        }
        order.push(current);
    }
    order
}

/// Copy the branch rooted at `id` out as a detached subtree
pub fn extract_subtree<G: NodeGraph + ?Sized>(tree: &G, id: &str) -> Option<NodeSubtree> {
    let ids = descendants_preorder(tree, id);
    if ids.is_empty() {
        return None;
    }
    let nodes = ids.iter().filter_map(|id| tree.node(id).cloned());
    Some(NodeSubtree::from_nodes(id, nodes))
}

pub(crate) fn validate_graph<G: NodeGraph + ?Sized>(tree: &G) -> SchemaResult<()> {
    let root_id = tree.root_id();
    if !tree.contains(root_id) {
        return Err(SchemaError::MissingRoot(root_id.to_string()));
    }

    let mut parents: HashMap<&str, &str> = HashMap::new();
    for (key, node) in tree.nodes() {
        if key != &node.id {
            return Err(SchemaError::IdMismatch {
                key: key.clone(),
                id: node.id.clone(),
            });
        }
        if !node.is_container() && !node.children().is_empty() {
            return Err(SchemaError::LeafWithChildren(node.id.clone()));
        }

        for child in node.children() {
            if !tree.contains(child) {
                return Err(SchemaError::DanglingChild {
                    parent: node.id.clone(),
                    child: child.clone(),
                });
            }
            if child == root_id {
                return Err(SchemaError::RootHasParent(child.clone()));
            }
            match parents.insert(child.as_str(), node.id.as_str()) {
                Some(previous) if previous == node.id => {
                    return Err(SchemaError::DuplicateChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    })
                }
                Some(_) => return Err(SchemaError::MultipleParents(child.clone())),
                None => {}
            }
        }
    }

    let reachable = collect_descendants(tree, root_id);
    if let Some(orphan) = tree.nodes().keys().find(|id| !reachable.contains(*id)) {
        return Err(SchemaError::Unreachable(orphan.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn sample() -> PageSchema {
        PageSchema::from_nodes(
            "page",
            [
                Node::new("page", NodeType::Page).with_children(["hero", "footer"]),
                Node::new("hero", NodeType::Section).with_children(["title", "cta"]),
                Node::new("title", NodeType::Heading),
                Node::new("cta", NodeType::Button),
                Node::new("footer", NodeType::Section),
            ],
        )
    }

    #[test]
    fn test_structural_queries() {
        let tree = sample();

        assert_eq!(get_children(&tree, "hero"), ["title", "cta"]);
        assert!(get_children(&tree, "title").is_empty());
        assert!(get_children(&tree, "missing").is_empty());

        assert_eq!(find_parent_id(&tree, "cta"), Some("hero"));
        assert_eq!(find_parent_id(&tree, "page"), None);
        assert_eq!(find_parent_id(&tree, "missing"), None);
    }

    #[test]
    fn test_collect_descendants_includes_self() {
        let tree = sample();

        let hero = collect_descendants(&tree, "hero");
        assert_eq!(hero.len(), 3);
        assert!(hero.contains("hero") && hero.contains("title") && hero.contains("cta"));

        assert_eq!(collect_descendants(&tree, "page").len(), 5);
        assert!(collect_descendants(&tree, "missing").is_empty());
        assert_eq!(descendants_preorder(&tree, "page"), ["page", "hero", "title", "cta", "footer"]);
    }

    #[test]
    fn test_collect_descendants_terminates_on_cycle() {
        let tree = PageSchema::from_nodes(
            "a",
            [
                Node::new("a", NodeType::Block).with_children(["b"]),
                Node::new("b", NodeType::Block).with_children(["a"]),
            ],
        );
        assert_eq!(collect_descendants(&tree, "a").len(), 2);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_valid_tree() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_violations() {
        let mut tree = sample();
        tree.nodes.insert("ghost".into(), Node::new("ghost", NodeType::Text));
        assert_eq!(tree.validate(), Err(SchemaError::Unreachable("ghost".into())));

        let mut tree = sample();
        if let Some(footer) = tree.nodes.get_mut("footer") {
            footer.children_order = Some(vec!["cta".into()]);
        }
        assert_eq!(tree.validate(), Err(SchemaError::MultipleParents("cta".into())));

        let mut tree = sample();
        if let Some(footer) = tree.nodes.get_mut("footer") {
            footer.children_order = Some(vec!["nowhere".into()]);
        }
        assert!(matches!(tree.validate(), Err(SchemaError::DanglingChild { .. })));

        let mut tree = sample();
        tree.root_id = "gone".into();
        assert_eq!(tree.validate(), Err(SchemaError::MissingRoot("gone".into())));
    }

    #[test]
    fn test_extract_subtree() {
        let subtree = extract_subtree(&sample(), "hero").unwrap();
        assert_eq!(subtree.root_id, "hero");
        assert_eq!(subtree.len(), 3);
        assert!(validate_graph(&subtree).is_ok());
        assert!(extract_subtree(&sample(), "missing").is_none());
    }
}
