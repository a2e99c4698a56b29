//! # Static HTML Export
//!
//! Renders a [`PageSchema`](pagecraft_schema::PageSchema) to a standalone
//! HTML document:
//!
//! ```text
//! PageSchema + Theme
//!     ↓ resolve_schema_styles
//! <style> one rule per styled node, then its breakpoint fragments
//!     ↓ render from root
//! <body> elements tagged with data-node-id, click actions as data-action
//!     ↓
//! inlined runtime for openUrl / scrollTo / toast
//! ```

mod compiler;
mod runtime;
mod stylesheet;

#[cfg(test)]
mod tests;

pub use compiler::{compile_to_html, CompileError, CompileOptions};
pub use runtime::{ClickAction, RUNTIME_JS};
pub use stylesheet::{resolve_schema_styles, schema_stylesheet, SchemaStyles};
