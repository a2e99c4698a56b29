//! # Editor Document
//!
//! One page being edited: the committed schema, its history and the patches
//! not yet handed to persistence.
//!
//! ## Commit pipeline
//!
//! ```text
//! Mutation → operation → cleanup → merged patch
//!                                     ↓
//!                   history.record + clear_future (once)
//!                                     ↓
//!                     commit schema, accumulate patch
//! ```
//!
//! Undo and redo replay snapshots and express the jump as a patch when the
//! root is unchanged, or as a full document otherwise.

use crate::cache::{read_json, write_json, CacheKey, LocalCache};
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::history::History;
use crate::mutations::Mutation;
use crate::post_effects::PostEffectEngine;
use pagecraft_schema::{
    diff_schemas, merge, IdSource, PageSchema, Patch, PatchAccumulator, SequentialIds,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Identity of a page within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentKey {
    pub document_id: String,
    pub page_id: String,
}

impl DocumentKey {
    pub fn new(document_id: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            page_id: page_id.into(),
        }
    }

    pub fn history_key(&self) -> CacheKey {
        CacheKey::history(&self.document_id, &self.page_id)
    }

    pub fn draft_key(&self) -> CacheKey {
        CacheKey::draft(&self.document_id, &self.page_id)
    }
}

/// What persistence must write after an undo or redo
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Patch(Patch),
    /// Full save fallback when no patch can express the change
    Document(PageSchema),
}

pub struct EditorDocument<S = SequentialIds> {
    key: DocumentKey,
    schema: PageSchema,
    history: History,
    pending: PatchAccumulator,
    effects: PostEffectEngine,
    ids: S,

    /// Incremented on every committed change
    pub revision: u64,
}

impl EditorDocument<SequentialIds> {
    /// Document with ids seeded from the document id
    pub fn new(key: DocumentKey, schema: PageSchema, config: &EditorConfig) -> Self {
        let ids = SequentialIds::for_document(&key.document_id);
        Self::with_id_source(key, schema, config, ids)
    }
}

impl<S: IdSource> EditorDocument<S> {
    pub fn with_id_source(
        key: DocumentKey,
        schema: PageSchema,
        config: &EditorConfig,
        ids: S,
    ) -> Self {
        Self {
            key,
            schema,
            history: History::new(config.history_depth),
            pending: PatchAccumulator::new(),
            effects: PostEffectEngine::new(),
            ids,
            revision: 0,
        }
    }

    /// Load from a schema that must satisfy every tree invariant
    pub fn open(
        key: DocumentKey,
        schema: PageSchema,
        config: &EditorConfig,
        ids: S,
    ) -> Result<Self, EditorError> {
        schema.validate()?;
        Ok(Self::with_id_source(key, schema, config, ids))
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply a user mutation; `None` when it changed nothing
    #[instrument(skip_all, fields(op = mutation.name()))]
    pub fn apply(&mut self, mutation: &Mutation) -> Option<Patch> {
        let applied = mutation.apply(&self.schema, &mut self.ids).into_changed();
        let Some((next, patch)) = applied else {
            if let Err(reason) = mutation.validate(&self.schema) {
                debug!(%reason, "Mutation rejected");
            }
            return None;
        };

        let cleaned = self.effects.run(&next, &mut self.ids).into_changed();
        let (next, patch) = match cleaned {
            Some((cleaned, cleanup_patch)) => (cleaned, merge(&patch, &cleanup_patch)),
            None => (next, patch),
        };

        self.commit(next, &patch);
        Some(patch)
    }

    /// Apply several mutations as separate history steps, returning the
    /// merged patch of those that changed something
    pub fn apply_all(&mut self, mutations: &[Mutation]) -> Option<Patch> {
        let mut merged: Option<Patch> = None;
        for mutation in mutations {
            if let Some(patch) = self.apply(mutation) {
                match merged.as_mut() {
                    Some(merged) => merged.merge_from(&patch),
                    None => merged = Some(patch),
                }
            }
        }
        merged
    }

    fn commit(&mut self, next: PageSchema, patch: &Patch) {
        self.history.record(&self.schema);
        self.history.clear_future();
        self.schema = next;
        self.pending.push(patch);
        self.revision += 1;
        debug!(
            revision = self.revision,
            set = patch.set.len(),
            del = patch.del.len(),
            "Committed"
        );
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Option<Change> {
        let previous = self.history.undo(&self.schema)?;
        Some(self.jump_to(previous))
    }

    pub fn redo(&mut self) -> Option<Change> {
        let next = self.history.redo(&self.schema)?;
        Some(self.jump_to(next))
    }

    fn jump_to(&mut self, target: PageSchema) -> Change {
        let change = match diff_schemas(&self.schema, &target) {
            Some(patch) => {
                self.pending.push(&patch);
                Change::Patch(patch)
            }
            None => {
                // A full save supersedes anything still pending
                self.pending.clear();
                Change::Document(target.clone())
            }
        };
        self.schema = target;
        self.revision += 1;
        change
    }

    /// Drain patches accumulated since the last call
    pub fn take_pending(&mut self) -> Option<Patch> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.has_changes()
    }

    pub fn save_history<C: LocalCache + ?Sized>(&self, cache: &C) -> Result<(), EditorError> {
        write_json(cache, &self.key.history_key(), &self.history)?;
        Ok(())
    }

    /// Restore cached history for this page, keeping the configured depth.
    /// Returns whether an entry was found.
    pub fn restore_history<C>(&mut self, cache: &C) -> Result<bool, EditorError>
    where
        C: LocalCache + ?Sized,
    {
        let Some(mut history) = read_json::<History, _>(cache, &self.key.history_key())? else {
            return Ok(false);
        };
        history.set_depth(self.history.depth());
        self.history = history;
        info!(
            undo = self.history.undo_levels(),
            redo = self.history.redo_levels(),
            "Restored history"
        );
        Ok(true)
    }

    pub fn save_draft<C: LocalCache + ?Sized>(&self, cache: &C) -> Result<(), EditorError> {
        write_json(cache, &self.key.draft_key(), &self.schema)?;
        Ok(())
    }

    pub fn load_draft<C: LocalCache + ?Sized>(
        cache: &C,
        key: &DocumentKey,
    ) -> Result<Option<PageSchema>, EditorError> {
        Ok(read_json(cache, &key.draft_key())?)
    }
}
