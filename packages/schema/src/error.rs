use thiserror::Error;

/// A document that breaks one of the tree invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Root node not found: {0}")]
    MissingRoot(String),

    #[error("Node {key} is stored under a different id ({id})")]
    IdMismatch { key: String, id: String },

    #[error("Node {parent} references missing child {child}")]
    DanglingChild { parent: String, child: String },

    #[error("Node {child} is listed more than once under {parent}")]
    DuplicateChild { parent: String, child: String },

    #[error("Node {0} has more than one parent")]
    MultipleParents(String),

    #[error("Root node {0} is listed as a child")]
    RootHasParent(String),

    #[error("Leaf node {0} has children")]
    LeafWithChildren(String),

    #[error("Node {0} is not reachable from the root")]
    Unreachable(String),
}

/// A patch that cannot be replayed onto a tree
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Unsupported patch path: {0}")]
    InvalidPath(String),

    #[error("Patch targets missing node: {0}")]
    MissingNode(String),

    #[error("Invalid value at {path}: {source}")]
    InvalidValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
