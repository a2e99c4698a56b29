//! # Patches
//!
//! Minimal set/delete descriptions of what a mutation changed, addressed by
//! dotted paths:
//!
//! - `nodes.<id>`: a whole node
//! - `nodes.<id>.childrenOrder`: a container's child list
//!
//! Wire format: `{ "set": { "<path>": <json> }, "del": ["<path>"] }`.
//!
//! Merging is last-writer-wins per path. A later write to `nodes.<id>` also
//! supersedes earlier sets and deletes of that node's `childrenOrder`, and a
//! pending whole-node write absorbs later ones.

use crate::error::PatchError;
use crate::node::Node;
use crate::tree::PageSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const CHILDREN_ORDER_SUFFIX: &str = ".childrenOrder";
const NODES_PREFIX: &str = "nodes.";

/// A parsed patch path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchPath<'a> {
    Node(&'a str),
    ChildrenOrder(&'a str),
}

impl<'a> PatchPath<'a> {
    pub fn parse(path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix(NODES_PREFIX)?;
        let parsed = match rest.strip_suffix(CHILDREN_ORDER_SUFFIX) {
            Some(id) => PatchPath::ChildrenOrder(id),
            None => PatchPath::Node(rest),
        };
        match parsed {
            PatchPath::Node(id) | PatchPath::ChildrenOrder(id) if id.is_empty() => None,
            _ => Some(parsed),
        }
    }

    pub fn node_id(&self) -> &'a str {
        match self {
            PatchPath::Node(id) | PatchPath::ChildrenOrder(id) => id,
        }
    }
}

pub fn node_path(id: &str) -> String {
    format!("{}{}", NODES_PREFIX, id)
}

pub fn children_path(id: &str) -> String {
    format!("{}{}{}", NODES_PREFIX, id, CHILDREN_ORDER_SUFFIX)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default)]
    pub set: BTreeMap<String, Value>,
    #[serde(default)]
    pub del: BTreeSet<String>,
}

/// The identity for [`merge`]
pub const EMPTY_PATCH: Patch = Patch {
    set: BTreeMap::new(),
    del: BTreeSet::new(),
};

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_changes(&self) -> bool {
        !self.set.is_empty() || !self.del.is_empty()
    }

    /// Record a whole-node write
    pub fn set_node(&mut self, node: &Node) {
        let path = node_path(&node.id);
        self.forget_children(&node.id);
        self.del.remove(&path);
        // Node serialization cannot fail: all map keys are strings
        let value = serde_json::to_value(node).unwrap_or(Value::Null);
        self.set.insert(path, value);
    }

    /// Record a child-order write
    pub fn set_children(&mut self, id: &str, order: &[String]) {
        let order = Value::Array(order.iter().cloned().map(Value::String).collect());

        // Fold into a pending whole-node write for the same node
        if let Some(Value::Object(node)) = self.set.get_mut(&node_path(id)) {
            node.insert("childrenOrder".to_string(), order);
            self.del.remove(&children_path(id));
            return;
        }

        let path = children_path(id);
        self.del.remove(&path);
        self.set.insert(path, order);
    }

    /// Record a node removal
    pub fn delete_node(&mut self, id: &str) {
        let path = node_path(id);
        self.set.remove(&path);
        self.forget_children(id);
        self.del.insert(path);
    }

    /// Record a child-order removal
    pub fn delete_children(&mut self, id: &str) {
        // A pending whole-node write already decides the field
        if let Some(Value::Object(node)) = self.set.get_mut(&node_path(id)) {
            node.remove("childrenOrder");
            return;
        }

        let path = children_path(id);
        self.set.remove(&path);
        self.del.insert(path);
    }

    /// Drop any child-order entry, set or deleted, for `id`
    fn forget_children(&mut self, id: &str) {
        let path = children_path(id);
        self.set.remove(&path);
        self.del.remove(&path);
    }

    /// Overlay `later` onto this patch
    pub fn merge_from(&mut self, later: &Patch) {
        for path in &later.del {
            match PatchPath::parse(path) {
                Some(PatchPath::Node(id)) => self.delete_node(id),
                Some(PatchPath::ChildrenOrder(id)) => self.delete_children(id),
                None => {
                    self.set.remove(path);
                    self.del.insert(path.clone());
                }
            }
        }

        for (path, value) in &later.set {
            match PatchPath::parse(path) {
                Some(PatchPath::ChildrenOrder(id)) => {
                    if let Some(Value::Object(node)) = self.set.get_mut(&node_path(id)) {
                        node.insert("childrenOrder".to_string(), value.clone());
                        self.del.remove(path);
                        continue;
                    }
                }
                Some(PatchPath::Node(id)) => self.forget_children(id),
                None => {}
            }
            self.del.remove(path);
            self.set.insert(path.clone(), value.clone());
        }
    }
}

/// Combine two patches, `b` winning on conflicting paths
pub fn merge(a: &Patch, b: &Patch) -> Patch {
    let mut merged = a.clone();
    merged.merge_from(b);
    merged
}

pub fn has_changes(patch: &Patch) -> bool {
    patch.has_changes()
}

/// Collects patches between flushes
#[derive(Debug, Clone, Default)]
pub struct PatchAccumulator {
    pending: Patch,
}

impl PatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, patch: &Patch) {
        self.pending.merge_from(patch);
    }

    /// Put a patch back underneath everything accumulated since it was taken
    pub fn push_front(&mut self, patch: Patch) {
        let newer = std::mem::replace(&mut self.pending, patch);
        self.pending.merge_from(&newer);
    }

    pub fn has_changes(&self) -> bool {
        self.pending.has_changes()
    }

    pub fn peek(&self) -> &Patch {
        &self.pending
    }

    /// Drain the accumulated patch, `None` when nothing changed
    pub fn take(&mut self) -> Option<Patch> {
        if self.pending.has_changes() {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.pending = Patch::default();
    }
}

/// Replay a patch the way the document store does: every `set`, then every `del`
pub fn apply_patch(tree: &PageSchema, patch: &Patch) -> Result<PageSchema, PatchError> {
    let mut next = tree.clone();

    for (path, value) in &patch.set {
        match PatchPath::parse(path) {
            Some(PatchPath::Node(id)) => {
                let node: Node = serde_json::from_value(value.clone()).map_err(|source| {
                    PatchError::InvalidValue {
                        path: path.clone(),
                        source,
                    }
                })?;
                next.nodes.insert(id.to_string(), node);
            }
            Some(PatchPath::ChildrenOrder(id)) => {
                let order: Vec<String> = serde_json::from_value(value.clone()).map_err(|source| {
                    PatchError::InvalidValue {
                        path: path.clone(),
                        source,
                    }
                })?;
                let node = next
                    .nodes
                    .get_mut(id)
                    .ok_or_else(|| PatchError::MissingNode(id.to_string()))?;
                node.children_order = Some(order);
            }
            None => return Err(PatchError::InvalidPath(path.clone())),
        }
    }

    for path in &patch.del {
        match PatchPath::parse(path) {
            Some(PatchPath::Node(id)) => {
                next.nodes.remove(id);
            }
            Some(PatchPath::ChildrenOrder(id)) => {
                if let Some(node) = next.nodes.get_mut(id) {
                    node.children_order = None;
                }
            }
            None => return Err(PatchError::InvalidPath(path.clone())),
        }
    }

    Ok(next)
}

/// Patch turning `before` into `after`.
///
/// `None` when the root changed, which a path patch cannot express; callers
/// fall back to a full document save.
pub fn diff_schemas(before: &PageSchema, after: &PageSchema) -> Option<Patch> {
    if before.root_id != after.root_id {
        return None;
    }

    let mut patch = Patch::new();
    for (id, node) in &after.nodes {
        match before.nodes.get(id) {
            Some(previous) if previous == node => {}
            Some(previous) if same_except_children(previous, node) => {
                patch.set_children(id, node.children());
            }
            _ => patch.set_node(node),
        }
    }
    for id in before.nodes.keys() {
        if !after.nodes.contains_key(id) {
            patch.delete_node(id);
        }
    }
    Some(patch)
}

fn same_except_children(a: &Node, b: &Node) -> bool {
    a.id == b.id
        && a.kind == b.kind
        && a.props == b.props
        && a.origin == b.origin
        && a.children_order.is_some() == b.children_order.is_some()
}
