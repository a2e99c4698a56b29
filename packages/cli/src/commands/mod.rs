pub mod check;
pub mod edit;
pub mod export;
pub mod init;
pub mod styles;

pub use check::{check, CheckArgs};
pub use edit::{edit, redo, undo, EditArgs, SessionArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use styles::{styles, StylesArgs};

use anyhow::{Context, Result};
use pagecraft_schema::PageSchema;
use std::path::Path;

/// Read and parse a schema file without validating it
pub fn read_schema(path: &Path) -> Result<PageSchema> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    PageSchema::from_json(&content).with_context(|| format!("Invalid schema {}", path.display()))
}

pub fn write_schema(path: &Path, schema: &PageSchema) -> Result<()> {
    let mut json = serde_json::to_string_pretty(schema)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}

/// File name without extension, used as a default document id and title
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}
