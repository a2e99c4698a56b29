use crate::{compile_to_html, CompileError, CompileOptions};
use pagecraft_schema::{Node, NodeType, PageSchema};
use pagecraft_styles::Theme;
use serde_json::json;

fn landing() -> PageSchema {
    serde_json::from_value(json!({
        "rootId": "page",
        "nodes": {
            "page": { "id": "page", "type": "page", "childrenOrder": ["hero"] },
            "hero": {
                "id": "hero",
                "type": "section",
                "childrenOrder": ["title", "actions"],
                "props": {
                    "style": {
                        "base": { "padding": "$spacing.lg", "bg": "$colors.surface" },
                        "sm": { "padding": "$spacing.sm" }
                    }
                }
            },
            "title": { "id": "title", "type": "heading", "props": { "text": "Tools & <tricks>", "level": 1 } },
            "actions": { "id": "actions", "type": "row", "childrenOrder": ["cta"] },
            "cta": {
                "id": "cta",
                "type": "button",
                "props": { "text": "Start", "action": { "type": "scrollTo", "target": "hero" } }
            }
        }
    }))
    .unwrap()
}

fn compile(schema: &PageSchema) -> String {
    compile_to_html(schema, &Theme::default(), CompileOptions::default()).unwrap()
}

#[test]
fn test_compile_document_shell() {
    let html = compile(&landing());

    assert!(html.starts_with("<!DOCTYPE html>\n"));
    assert!(html.contains("<title>Page</title>"));
    assert!(html.contains("<main data-node-id=\"page\">"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_compile_escapes_text() {
    let html = compile(&landing());

    assert!(html.contains("<h1 data-node-id=\"title\">Tools &amp; &lt;tricks&gt;</h1>"));
}

#[test]
fn test_compile_styles_in_head() {
    let html = compile(&landing());
    let head = &html[..html.find("</head>").unwrap()];

    assert!(head.contains("[data-node-id=\"hero\"] {"));
    assert!(head.contains("padding: 24px;"));
    assert!(head.contains("background: #f9fafb;"));
    assert!(head.contains("@media (max-width: 640px)"));
    assert!(head.find("padding: 24px;").unwrap() < head.find("@media").unwrap());
}

#[test]
fn test_compile_actions_and_runtime() {
    let html = compile(&landing());

    assert!(html.contains(
        "<button data-node-id=\"cta\" data-action=\"{&quot;type&quot;:&quot;scrollTo&quot;,&quot;target&quot;:&quot;hero&quot;}\" type=\"button\">Start</button>"
    ));
    assert!(html.contains("<div data-node-id=\"actions\" class=\"pc-row\">"));
    assert!(html.contains("<script>"));
    assert!(html.contains("case \"toast\":"));
}

#[test]
fn test_compile_without_actions_has_no_script() {
    let schema = PageSchema::from_nodes(
        "page",
        [
            Node::new("page", NodeType::Page).with_children(["logo", "rule", "email"]),
            Node::new("logo", NodeType::Image).with_prop("src", "/logo.png"),
            Node::new("rule", NodeType::Divider),
            Node::new("email", NodeType::Input)
                .with_prop("inputType", "email")
                .with_prop("placeholder", "you@example.com"),
        ],
    );
    let html = compile(&schema);

    assert!(!html.contains("<script>"));
    assert!(html.contains("<img data-node-id=\"logo\" src=\"/logo.png\" alt=\"\" />"));
    assert!(html.contains("<hr data-node-id=\"rule\" />"));
    assert!(html.contains(
        "<input data-node-id=\"email\" type=\"email\" placeholder=\"you@example.com\" />"
    ));
}

#[test]
fn test_compile_list_and_select() {
    let schema = PageSchema::from_nodes(
        "page",
        [
            Node::new("page", NodeType::Page).with_children(["items", "plan"]),
            Node::new("items", NodeType::List).with_children(["one"]),
            Node::new("one", NodeType::Text).with_prop("text", "First"),
            Node::new("plan", NodeType::Select).with_prop(
                "options",
                json!(["Free", { "value": "pro", "label": "Pro" }]),
            ),
        ],
    );
    let html = compile(&schema);

    assert!(html.contains("<ul data-node-id=\"items\">"));
    assert!(html.contains("<li>"));
    assert!(html.contains("<span data-node-id=\"one\">First</span>"));
    assert!(html.contains("<option value=\"Free\">Free</option>"));
    assert!(html.contains("<option value=\"pro\">Pro</option>"));
}

#[test]
fn test_compile_compact_output() {
    let options = CompileOptions {
        pretty: false,
        ..CompileOptions::default()
    };
    let html = compile_to_html(&landing(), &Theme::default(), options).unwrap();

    assert!(!html.contains('\n'));
    assert!(html.contains("<main data-node-id=\"page\"><section data-node-id=\"hero\">"));
}

#[test]
fn test_invalid_inputs_are_errors() {
    let mut broken = landing();
    broken.nodes.remove("cta");
    assert!(matches!(
        compile_to_html(&broken, &Theme::default(), CompileOptions::default()),
        Err(CompileError::Schema(_))
    ));

    let mut bad_action = landing();
    if let Some(cta) = bad_action.nodes.get_mut("cta") {
        *cta = Node::new("cta", NodeType::Button).with_prop("action", json!({ "type": "launch" }));
    }
    assert!(matches!(
        compile_to_html(&bad_action, &Theme::default(), CompileOptions::default()),
        Err(CompileError::InvalidAction { node, .. }) if node == "cta"
    ));
}
