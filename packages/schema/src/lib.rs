//! # Pagecraft Schema
//!
//! The page document model shared by the editor, the exporter and the CLI:
//! nodes, the flat-map tree and its queries, id generation, and the patch
//! format used to persist changes.

pub mod error;
pub mod id_generator;
pub mod node;
pub mod patch;
pub mod result;
pub mod tree;

pub use error::{PatchError, SchemaError};
pub use id_generator::{fresh_id, get_document_id, IdSource, RandomIds, SequentialIds};
pub use node::{Axis, Node, NodeProps, NodeType, Origin};
pub use patch::{
    apply_patch, children_path, diff_schemas, has_changes, merge, node_path, Patch,
    PatchAccumulator, PatchPath, EMPTY_PATCH,
};
pub use result::SchemaResult;
pub use tree::{
    collect_descendants, descendants_preorder, extract_subtree, find_parent_id, get_children,
    is_container, NodeGraph, NodeSubtree, PageSchema,
};
