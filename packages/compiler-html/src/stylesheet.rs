//! Per-node style resolution for a whole page

use pagecraft_schema::{descendants_preorder, NodeGraph, PageSchema};
use pagecraft_styles::{node_selector, resolve_style, rule_css, ResolvedStyle, Theme};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Node id → resolved style, only for nodes that produced CSS
pub type SchemaStyles = BTreeMap<String, ResolvedStyle>;

/// Resolve every node's style against `theme`
#[instrument(skip_all, fields(nodes = schema.nodes.len()))]
pub fn resolve_schema_styles(schema: &PageSchema, theme: &Theme) -> SchemaStyles {
    let styles: SchemaStyles = schema
        .nodes
        .values()
        .filter_map(|node| {
            let style = node.style()?;
            let resolved = resolve_style(style, theme, &node_selector(&node.id));
            (!resolved.is_empty()).then(|| (node.id.clone(), resolved))
        })
        .collect();

    debug!(styled = styles.len(), "Resolved schema styles");
    styles
}

/// Stylesheet in document order: each node's base rule, then its media
/// fragments
pub fn schema_stylesheet(schema: &PageSchema, styles: &SchemaStyles) -> String {
    let mut css = String::new();

    for id in descendants_preorder(schema, schema.root_id()) {
        let Some(resolved) = styles.get(&id) else {
            continue;
        };
        if !resolved.base.is_empty() {
            css.push_str(&rule_css(&node_selector(&id), &resolved.base));
        }
        css.push_str(&resolved.media_css);
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_schema::{Node, NodeType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn styled_page() -> PageSchema {
        serde_json::from_value(json!({
            "rootId": "page",
            "nodes": {
                "page": { "id": "page", "type": "page", "childrenOrder": ["hero", "plain"] },
                "hero": {
                    "id": "hero",
                    "type": "section",
                    "childrenOrder": [],
                    "props": { "style": { "base": { "padding": 24 }, "sm": { "padding": 8 } } }
                },
                "plain": { "id": "plain", "type": "text", "props": { "text": "hi" } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_only_styled_nodes_are_resolved() {
        let styles = resolve_schema_styles(&styled_page(), &Theme::default());

        assert_eq!(styles.keys().collect::<Vec<_>>(), ["hero"]);
        assert_eq!(styles["hero"].base["padding"], "24px");
    }

    #[test]
    fn test_stylesheet_puts_base_before_media() {
        let schema = styled_page();
        let css = schema_stylesheet(&schema, &resolve_schema_styles(&schema, &Theme::default()));

        let base = css.find("[data-node-id=\"hero\"] {").unwrap();
        let media = css.find("@media (max-width: 640px)").unwrap();
        assert!(base < media);
        assert!(css.contains("padding: 8px;"));
    }

    #[test]
    fn test_unstyled_schema_has_empty_stylesheet() {
        let schema = PageSchema::new(Node::new("page", NodeType::Page));
        let styles = resolve_schema_styles(&schema, &Theme::empty());
        assert!(schema_stylesheet(&schema, &styles).is_empty());
    }
}
