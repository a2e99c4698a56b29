//! Debounced persistence against in-memory stores
//!
//! Time is paused, so every sleep below advances the clock deterministically.

use pagecraft_editor::{
    DocumentKey, DocumentStore, EditorConfig, EditorDocument, MemoryStore, Mutation, Node,
    NodeSubtree, NodeType, PageSchema, Patch, Persister, StoreError, StoreWrite,
};
use std::time::Duration;
use tokio::time::sleep;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn key() -> DocumentKey {
    DocumentKey::new("landing", "home")
}

fn page() -> PageSchema {
    PageSchema::from_nodes(
        "page",
        [
            Node::new("page", NodeType::Page).with_children(["section"]),
            Node::new("section", NodeType::Section),
        ],
    )
}

/// Editor plus a store holding the same starting document
fn setup() -> (EditorDocument, MemoryStore) {
    let store = MemoryStore::new().with_document(key(), page());
    let doc = EditorDocument::new(key(), page(), &EditorConfig::default());
    (doc, store)
}

fn insert(doc: &mut EditorDocument, id: &str) -> Patch {
    doc.apply(&Mutation::InsertInside {
        parent_id: "section".into(),
        subtree: NodeSubtree::new(Node::new(id, NodeType::Text)),
    })
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_burst_is_coalesced_into_one_write() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);

    for id in ["a", "b", "c"] {
        persister.push(insert(&mut doc, id));
        sleep(Duration::from_millis(100)).await;
    }
    assert!(store.writes().is_empty());

    sleep(DEBOUNCE).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].revision, 1);
    assert!(matches!(&writes[0].write, StoreWrite::Patch(patch) if patch.set.len() == 4));
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_patches_are_ignored() {
    let (_, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);

    persister.push(Patch::new());
    sleep(DEBOUNCE * 2).await;
    persister.flush().await;

    assert!(store.writes().is_empty());
    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_is_retried_with_newer_patches() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);
    store.fail_next(1);

    persister.push(insert(&mut doc, "a"));
    sleep(DEBOUNCE + Duration::from_millis(100)).await;
    assert!(store.writes().is_empty());

    // Pushing before the retry comes due folds both into one write
    persister.push(insert(&mut doc, "b"));
    sleep(DEBOUNCE * 2).await;

    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    // The failed attempt consumed revision 1
    assert_eq!(writes[0].revision, 2);
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_is_retried_without_new_patches() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);
    store.fail_next(1);

    persister.push(insert(&mut doc, "a"));
    sleep(DEBOUNCE + Duration::from_millis(100)).await;
    assert!(store.writes().is_empty());

    sleep(DEBOUNCE).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].revision, 2);
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_document_save_is_written_before_later_patches() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);
    store.fail_next(1);

    doc.apply(&Mutation::InsertInside {
        parent_id: "section".into(),
        subtree: NodeSubtree::new(Node::new("box1", NodeType::Block)),
    })
    .unwrap();
    persister.save_document(doc.schema().clone());

    let patch = doc
        .apply(&Mutation::InsertInside {
            parent_id: "box1".into(),
            subtree: NodeSubtree::new(Node::new("caption", NodeType::Text)),
        })
        .unwrap();
    persister.push(patch);
    persister.flush().await;

    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert!(matches!(writes[0].write, StoreWrite::Document(_)));
    assert!(matches!(writes[1].write, StoreWrite::Patch(_)));
    assert_eq!(
        writes.iter().map(|w| w.revision).collect::<Vec<_>>(),
        [2, 3]
    );
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_document_save_is_retried_next_cycle() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);
    store.fail_next(1);

    insert(&mut doc, "a");
    persister.save_document(doc.schema().clone());
    sleep(Duration::from_millis(100)).await;
    assert!(store.writes().is_empty());

    sleep(DEBOUNCE).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    assert!(matches!(writes[0].write, StoreWrite::Document(_)));
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_document_save_supersedes_pending_patches() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);

    persister.push(insert(&mut doc, "a"));
    persister.save_document(doc.schema().clone());
    sleep(DEBOUNCE * 2).await;

    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    assert!(matches!(writes[0].write, StoreWrite::Document(_)));
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_flush_and_shutdown_write_immediately() {
    let (mut doc, store) = setup();
    let persister = Persister::spawn(store.clone(), key(), DEBOUNCE);

    persister.push(insert(&mut doc, "a"));
    persister.flush().await;
    assert_eq!(store.writes().len(), 1);

    persister.push(insert(&mut doc, "b"));
    persister.shutdown().await;

    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[1].revision, 2);
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));
}

/// Store whose patch writes take a while
#[derive(Clone)]
struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl DocumentStore for SlowStore {
    async fn apply_patch(
        &self,
        key: &DocumentKey,
        patch: &Patch,
        revision: u64,
    ) -> Result<(), StoreError> {
        sleep(self.delay).await;
        self.inner.apply_patch(key, patch, revision).await
    }

    async fn save_document(
        &self,
        key: &DocumentKey,
        schema: &PageSchema,
        revision: u64,
    ) -> Result<(), StoreError> {
        self.inner.save_document(key, schema, revision).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_patches_during_inflight_write_wait_for_next_cycle() {
    let (mut doc, store) = setup();
    let slow = SlowStore {
        inner: store.clone(),
        delay: Duration::from_secs(1),
    };
    let persister = Persister::spawn(slow, key(), DEBOUNCE);

    persister.push(insert(&mut doc, "a"));
    // Debounce elapsed, first write now in flight
    sleep(DEBOUNCE + Duration::from_millis(100)).await;
    persister.push(insert(&mut doc, "b"));

    sleep(Duration::from_secs(1)).await;
    assert_eq!(store.writes().len(), 1);

    sleep(DEBOUNCE + Duration::from_secs(1)).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(
        writes.iter().map(|w| w.revision).collect::<Vec<_>>(),
        [1, 2]
    );
    assert_eq!(store.document(&key()).as_ref(), Some(doc.schema()));

    persister.shutdown().await;
}
