//! # Undo/Redo History
//!
//! Bounded stacks of whole-tree snapshots.
//!
//! ## Design
//!
//! - `record` snapshots the tree about to be replaced by a user edit
//! - `record` never touches `future`; the caller clears it once per
//!   divergent edit with `clear_future`
//! - `undo` and `redo` swap the live tree with the nearest snapshot
//! - Both stacks hold at most `depth` snapshots; the oldest is evicted
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(5);
//!
//! history.record(&tree);
//! history.clear_future();
//! let tree = edited;
//!
//! let tree = history.undo(&tree).unwrap_or(tree);
//! ```

use pagecraft_schema::PageSchema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    /// Oldest first
    past: VecDeque<PageSchema>,

    /// Nearest first
    future: VecDeque<PageSchema>,

    depth: usize,
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            depth,
        }
    }

    /// Snapshot `current` before it is replaced
    pub fn record(&mut self, current: &PageSchema) {
        self.past.push_back(current.clone());
        while self.past.len() > self.depth {
            self.past.pop_front();
        }
    }

    /// Drop redo state after a divergent edit
    pub fn clear_future(&mut self) {
        self.future.clear();
    }

    /// Tree to restore, `None` when there is nothing to undo
    pub fn undo(&mut self, current: &PageSchema) -> Option<PageSchema> {
        let previous = self.past.pop_back()?;

        self.future.push_front(current.clone());
        self.future.truncate(self.depth);

        Some(previous)
    }

    /// Tree to restore, `None` when there is nothing to redo
    pub fn redo(&mut self, current: &PageSchema) -> Option<PageSchema> {
        let next = self.future.pop_front()?;

        self.past.push_back(current.clone());
        while self.past.len() > self.depth {
            self.past.pop_front();
        }

        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Change the bound, evicting the oldest snapshots if needed
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        while self.past.len() > depth {
            self.past.pop_front();
        }
        self.future.truncate(depth);
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_schema::{Node, NodeType};

    fn version(n: usize) -> PageSchema {
        PageSchema::new(Node::new("page", NodeType::Page).with_prop("version", n))
    }

    fn version_of(tree: &PageSchema) -> u64 {
        tree.nodes["page"].prop("version").and_then(|v| v.as_u64()).unwrap()
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new(5);
        let mut current = version(0);

        for n in 1..=3 {
            history.record(&current);
            history.clear_future();
            current = version(n);
        }

        current = history.undo(&current).unwrap();
        current = history.undo(&current).unwrap();
        assert_eq!(version_of(&current), 1);
        assert_eq!(history.redo_levels(), 2);

        current = history.redo(&current).unwrap();
        assert_eq!(version_of(&current), 2);
        assert!(history.can_redo());
    }

    #[test]
    fn test_depth_bounds_undo() {
        let mut history = History::new(5);
        let mut current = version(0);

        for n in 1..=7 {
            history.record(&current);
            history.clear_future();
            current = version(n);
        }
        assert_eq!(history.undo_levels(), 5);

        let mut undone = 0;
        while let Some(previous) = history.undo(&current) {
            current = previous;
            undone += 1;
        }

        assert_eq!(undone, 5);
        assert_eq!(version_of(&current), 2);
        assert!(history.undo(&current).is_none());
    }

    #[test]
    fn test_record_does_not_clear_future() {
        let mut history = History::new(5);
        history.record(&version(0));
        let current = history.undo(&version(1)).unwrap();

        history.record(&current);
        assert!(history.can_redo());

        history.clear_future();
        assert!(!history.can_redo());
    }

    #[test]
    fn test_snapshots_do_not_alias_live_tree() {
        let mut history = History::new(5);
        let mut live = version(0);
        history.record(&live);

        live.nodes.clear();
        let restored = history.undo(&live).unwrap();
        assert_eq!(version_of(&restored), 0);
    }

    #[test]
    fn test_history_serializes() {
        let mut history = History::new(3);
        history.record(&version(0));

        let json = serde_json::to_string(&history).unwrap();
        let restored: History = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
        assert_eq!(restored.depth(), 3);
    }
}
