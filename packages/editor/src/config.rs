use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Editor tuning shared by the canvas and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots kept on each of the undo and redo stacks
    pub history_depth: usize,

    /// Quiet period before accumulated patches are written
    pub debounce_ms: u64,
}

impl EditorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 5,
            debounce_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "historyDepth": 20 }"#).unwrap();
        assert_eq!(config.history_depth, 20);
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }
}
