//! # Pagecraft Editor
//!
//! Structural editing engine for page schemas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ canvas: drag, drop, delete, duplicate       │
//! └─────────────────────────────────────────────┘
//!                     ↓ Mutation
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - pure operations → (next tree, patch)     │
//! │  - cleanup of empty auto wrappers           │
//! │  - bounded undo/redo of snapshots           │
//! │  - patch accumulation per page              │
//! └─────────────────────────────────────────────┘
//!                     ↓ Patch
//! ┌─────────────────────────────────────────────┐
//! │ persistence: debounced writes to the store  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Pure operations**: every operation maps `(tree, params)` to a new tree
//! 2. **Silent no-ops**: stale ids and cycles leave the input untouched
//! 3. **Minimal patches**: only changed nodes and child lists are written
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{DocumentKey, EditorConfig, EditorDocument, Mutation};
//!
//! let mut doc = EditorDocument::new(DocumentKey::new("landing", "home"), schema, &config);
//!
//! let patch = doc.apply(&Mutation::Remove { node_id: "hero".into() });
//! if let Some(patch) = doc.take_pending() {
//!     persister.push(patch);
//! }
//! ```

mod cache;
mod clone;
mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod operations;
mod persistence;
mod post_effects;

pub use cache::{read_json, write_json, CacheKey, FileCache, LocalCache, MemoryCache};
pub use clone::{clone_subtree_with_ids, clone_subtree_with_ids_for_anchor};
pub use config::EditorConfig;
pub use document::{Change, DocumentKey, EditorDocument};
pub use errors::{CacheError, EditorError, StoreError};
pub use history::History;
pub use mutations::{DropTarget, Mutation, MutationError, MutationResult, Side};
pub use operations::{
    drop_node, duplicate, insert_at_side, insert_at_side_wrapped, insert_inside, insert_template,
    move_into, move_to_index, move_to_side, remove,
};
pub use persistence::{DocumentStore, MemoryStore, Persister, StoreWrite, StoredRevision};
pub use post_effects::{cleanup, PostEffect, PostEffectEngine, PruneEmptyAutoContainers};

// Re-export schema types for convenience
pub use pagecraft_schema::{
    IdSource, Node, NodeSubtree, NodeType, Origin, PageSchema, Patch, RandomIds, SequentialIds,
};
