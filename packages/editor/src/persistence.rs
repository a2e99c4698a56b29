//! # Debounced Persistence
//!
//! Patches are coalesced locally and written to a [`DocumentStore`] after a
//! quiet period, so a burst of drags becomes one write.
//!
//! ## Rules
//!
//! - A write in flight is never cancelled; patches arriving meanwhile wait
//!   for the next debounce cycle
//! - A failed patch write is logged and merged back under newer patches
//! - Full document saves are immediate and supersede pending patches
//! - A failed document save is retried before any later patch is written
//! - Failed writes are retried after another debounce period
//! - The revision sent with each write increases on every attempt

use crate::document::DocumentKey;
use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use pagecraft_schema::{apply_patch, PageSchema, Patch, PatchAccumulator};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Backend document store
pub trait DocumentStore: Send + Sync + 'static {
    /// Field-level update: every `set` path written, every `del` path cleared
    fn apply_patch(
        &self,
        key: &DocumentKey,
        patch: &Patch,
        revision: u64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn save_document(
        &self,
        key: &DocumentKey,
        schema: &PageSchema,
        revision: u64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: DocumentStore> DocumentStore for Arc<T> {
    fn apply_patch(
        &self,
        key: &DocumentKey,
        patch: &Patch,
        revision: u64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).apply_patch(key, patch, revision)
    }

    fn save_document(
        &self,
        key: &DocumentKey,
        schema: &PageSchema,
        revision: u64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save_document(key, schema, revision)
    }
}

/// One accepted write
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Patch(Patch),
    Document(PageSchema),
}

#[derive(Debug, Clone)]
pub struct StoredRevision {
    pub key: DocumentKey,
    pub revision: u64,
    /// Assigned by the store when the write is accepted
    pub updated_at: DateTime<Utc>,
    pub write: StoreWrite,
}

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<DocumentKey, PageSchema>,
    log: Vec<StoredRevision>,
    failures: usize,
}

/// In-memory store that replays patches onto stored documents
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, key: DocumentKey, schema: PageSchema) -> Self {
        self.lock().documents.insert(key, schema);
        self
    }

    /// Make the next `count` writes fail
    pub fn fail_next(&self, count: usize) {
        self.lock().failures = count;
    }

    pub fn document(&self, key: &DocumentKey) -> Option<PageSchema> {
        self.lock().documents.get(key).cloned()
    }

    pub fn writes(&self) -> Vec<StoredRevision> {
        self.lock().log.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, key: &DocumentKey, revision: u64, write: StoreWrite) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.failures > 0 {
            state.failures -= 1;
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }

        let next = match &write {
            StoreWrite::Patch(patch) => {
                let current = state
                    .documents
                    .get(key)
                    .ok_or_else(|| StoreError::NotFound(key.document_id.clone()))?;
                apply_patch(current, patch)?
            }
            StoreWrite::Document(schema) => schema.clone(),
        };

        state.documents.insert(key.clone(), next);
        state.log.push(StoredRevision {
            key: key.clone(),
            revision,
            updated_at: Utc::now(),
            write,
        });
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    async fn apply_patch(
        &self,
        key: &DocumentKey,
        patch: &Patch,
        revision: u64,
    ) -> Result<(), StoreError> {
        self.write(key, revision, StoreWrite::Patch(patch.clone()))
    }

    async fn save_document(
        &self,
        key: &DocumentKey,
        schema: &PageSchema,
        revision: u64,
    ) -> Result<(), StoreError> {
        self.write(key, revision, StoreWrite::Document(schema.clone()))
    }
}

enum Command {
    Patch(Patch),
    Save(PageSchema),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to the background writer task
#[derive(Debug)]
pub struct Persister {
    tx: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>,
}

impl Persister {
    /// Spawn the writer on the current tokio runtime
    pub fn spawn<S: DocumentStore>(store: S, key: DocumentKey, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(store, key, debounce, rx));
        Self { tx, handle }
    }

    /// Queue a patch; it is written after `debounce` without further patches
    pub fn push(&self, patch: Patch) {
        if !patch.has_changes() {
            return;
        }
        if self.tx.send(Command::Patch(patch)).is_err() {
            warn!("Persister stopped, dropping patch");
        }
    }

    /// Write the whole document now, discarding pending patches
    pub fn save_document(&self, schema: PageSchema) {
        if self.tx.send(Command::Save(schema)).is_err() {
            warn!("Persister stopped, dropping document save");
        }
    }

    /// Write pending patches now and wait for the attempt
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Flush, then stop the writer
    pub async fn shutdown(self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Shutdown(done)).is_ok() {
            let _ = wait.await;
        }
        let _ = self.handle.await;
    }
}

struct Writer<S> {
    store: S,
    key: DocumentKey,
    pending: PatchAccumulator,
    /// Document save not yet accepted; patches wait behind it
    pending_document: Option<PageSchema>,
    revision: u64,
}

impl<S: DocumentStore> Writer<S> {
    fn has_pending(&self) -> bool {
        self.pending_document.is_some() || self.pending.has_changes()
    }

    /// Attempt every pending write, oldest first
    async fn write_pending(&mut self) {
        if !self.write_document().await {
            return;
        }

        let Some(patch) = self.pending.take() else {
            return;
        };
        self.revision += 1;

        match self.store.apply_patch(&self.key, &patch, self.revision).await {
            Ok(()) => debug!(
                revision = self.revision,
                set = patch.set.len(),
                del = patch.del.len(),
                "Patch persisted"
            ),
            Err(err) => {
                warn!(
                    revision = self.revision,
                    error = %err,
                    "Patch write failed, retrying next cycle"
                );
                self.pending.push_front(patch);
            }
        }
    }

    /// Returns whether no document save is outstanding
    async fn write_document(&mut self) -> bool {
        let Some(schema) = self.pending_document.take() else {
            return true;
        };
        self.revision += 1;

        match self.store.save_document(&self.key, &schema, self.revision).await {
            Ok(()) => {
                debug!(revision = self.revision, "Document persisted");
                true
            }
            Err(err) => {
                warn!(
                    revision = self.revision,
                    error = %err,
                    "Document save failed, retrying next cycle"
                );
                self.pending_document = Some(schema);
                false
            }
        }
    }

    async fn save(&mut self, schema: PageSchema) {
        self.pending.clear();
        self.pending_document = Some(schema);
        self.write_pending().await;
    }
}

async fn run_writer<S: DocumentStore>(
    store: S,
    key: DocumentKey,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut writer = Writer {
        store,
        key,
        pending: PatchAccumulator::new(),
        pending_document: None,
        revision: 0,
    };
    let mut deadline: Option<Instant> = None;
    // Failed writes stay pending and get another cycle
    let retry = |writer: &Writer<S>| writer.has_pending().then(|| Instant::now() + debounce);

    loop {
        let command = match deadline {
            Some(at) => tokio::select! {
                command = rx.recv() => command,
                _ = sleep_until(at) => {
                    writer.write_pending().await;
                    deadline = retry(&writer);
                    continue;
                }
            },
            None => rx.recv().await,
        };

        match command {
            Some(Command::Patch(patch)) => {
                writer.pending.push(&patch);
                deadline = Some(Instant::now() + debounce);
            }
            Some(Command::Save(schema)) => {
                writer.save(schema).await;
                deadline = retry(&writer);
            }
            Some(Command::Flush(done)) => {
                writer.write_pending().await;
                deadline = retry(&writer);
                let _ = done.send(());
            }
            Some(Command::Shutdown(done)) => {
                writer.write_pending().await;
                let _ = done.send(());
                break;
            }
            None => {
                writer.write_pending().await;
                break;
            }
        }
    }
}
