use crate::runtime::{ClickAction, RUNTIME_JS};
use crate::stylesheet::{resolve_schema_styles, schema_stylesheet};
use pagecraft_schema::{Node, NodeType, PageSchema, SchemaError};
use pagecraft_styles::Theme;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid action on node {node}: {source}")]
    InvalidAction {
        node: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Document `<title>`
    pub title: String,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "Page".to_string(),
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

/// Layout implied by container type, before any node style applies
const LAYOUT_CSS: &str = "\
.pc-row { display: flex; flex-direction: row; }
.pc-column { display: flex; flex-direction: column; }
.pc-spacer { flex-grow: 1; }
";

struct Context<'a> {
    schema: &'a PageSchema,
    options: CompileOptions,
    depth: usize,
    buffer: String,
    has_actions: bool,
}

impl<'a> Context<'a> {
    fn new(schema: &'a PageSchema, options: CompileOptions) -> Self {
        Self {
            schema,
            options,
            depth: 0,
            buffer: String::new(),
            has_actions: false,
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_block(&mut self, text: &str) {
        for line in text.lines() {
            self.add_line(line);
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a page to a standalone HTML document
#[instrument(skip_all, fields(root = %schema.root_id, nodes = schema.nodes.len()))]
pub fn compile_to_html(
    schema: &PageSchema,
    theme: &Theme,
    options: CompileOptions,
) -> Result<String, CompileError> {
    schema.validate()?;

    // Render the body first so the head knows whether actions occur
    let mut body = Context::new(schema, options.clone());
    body.depth = 2;
    compile_node(&schema.root_id, &mut body)?;
    let has_actions = body.has_actions;
    let body_html = body.get_output();

    let mut ctx = Context::new(schema, options);
    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    compile_head(theme, &mut ctx);

    ctx.add_line("<body>");
    ctx.add(&body_html);
    if has_actions {
        ctx.indent();
        ctx.add_line("<script>");
        ctx.add_block(RUNTIME_JS);
        ctx.add_line("</script>");
        ctx.dedent();
    }
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    let html = ctx.get_output();
    debug!(bytes = html.len(), has_actions, "Compiled page");
    Ok(html)
}

fn compile_head(theme: &Theme, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);

    let styles = resolve_schema_styles(ctx.schema, theme);
    ctx.add_line("<style>");
    ctx.add_block(LAYOUT_CSS);
    ctx.add_block(&schema_stylesheet(ctx.schema, &styles));
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_node(id: &str, ctx: &mut Context) -> Result<(), CompileError> {
    let schema = ctx.schema;
    let Some(node) = schema.nodes.get(id) else {
        return Ok(());
    };

    match node.kind {
        // Template-only; render the children in place
        NodeType::Fragment => compile_children(node, ctx),
        NodeType::List => {
            let attrs = attributes(node, ctx)?;
            ctx.add_line(&format!("<ul{}>", attrs));
            ctx.indent();
            for child in node.children() {
                ctx.add_line("<li>");
                ctx.indent();
                compile_node(child, ctx)?;
                ctx.dedent();
                ctx.add_line("</li>");
            }
            ctx.dedent();
            ctx.add_line("</ul>");
            Ok(())
        }
        NodeType::Select => compile_select(node, ctx),
        NodeType::Checkbox => {
            let attrs = attributes(node, ctx)?;
            let name = optional_attr("name", node.prop_str("name"));
            let label = escape_html(node.prop_str("label").unwrap_or_default());
            ctx.add_line(&format!(
                "<label{}><input type=\"checkbox\"{}> {}</label>",
                attrs, name, label
            ));
            Ok(())
        }
        kind if kind.is_container() => {
            let tag = tag_name(node);
            let attrs = attributes(node, ctx)?;
            ctx.add_line(&format!("<{}{}>", tag, attrs));
            compile_children(node, ctx)?;
            ctx.add_line(&format!("</{}>", tag));
            Ok(())
        }
        _ => compile_leaf(node, ctx),
    }
}

fn compile_children(node: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    ctx.indent();
    for child in node.children() {
        compile_node(child, ctx)?;
    }
    ctx.dedent();
    Ok(())
}

fn compile_leaf(node: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    let tag = tag_name(node);
    let mut attrs = attributes(node, ctx)?;

    match node.kind {
        NodeType::Image => {
            attrs.push_str(&optional_attr("src", node.prop_str("src")));
            let alt = escape_html(node.prop_str("alt").unwrap_or_default());
            attrs.push_str(&format!(" alt=\"{}\"", alt));
        }
        NodeType::Link => attrs.push_str(&optional_attr("href", node.prop_str("href"))),
        NodeType::Button => attrs.push_str(" type=\"button\""),
        NodeType::Input => {
            let input_type = node.prop_str("inputType").unwrap_or("text");
            attrs.push_str(&format!(" type=\"{}\"", escape_html(input_type)));
            attrs.push_str(&optional_attr("name", node.prop_str("name")));
            attrs.push_str(&optional_attr("placeholder", node.prop_str("placeholder")));
        }
        NodeType::Textarea => {
            attrs.push_str(&optional_attr("name", node.prop_str("name")));
            attrs.push_str(&optional_attr("placeholder", node.prop_str("placeholder")));
        }
        NodeType::Spacer => attrs.push_str(" aria-hidden=\"true\""),
        _ => {}
    }

    if is_self_closing(tag) {
        ctx.add_line(&format!("<{}{} />", tag, attrs));
        return Ok(());
    }

    let text = node.prop("text").map(text_content).unwrap_or_default();
    ctx.add_line(&format!("<{}{}>{}</{}>", tag, attrs, escape_html(&text), tag));
    Ok(())
}

fn compile_select(node: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    let mut attrs = attributes(node, ctx)?;
    attrs.push_str(&optional_attr("name", node.prop_str("name")));
    ctx.add_line(&format!("<select{}>", attrs));
    ctx.indent();

    let options = node.prop("options").and_then(Value::as_array);
    for option in options.into_iter().flatten() {
        // Either "label" or { "value": ..., "label": ... }
        let (value, label) = match option {
            Value::Object(fields) => {
                let value = fields.get("value").map(text_content).unwrap_or_default();
                let label = fields.get("label").map(text_content).unwrap_or_else(|| value.clone());
                (value, label)
            }
            other => {
                let text = text_content(other);
                (text.clone(), text)
            }
        };
        ctx.add_line(&format!(
            "<option value=\"{}\">{}</option>",
            escape_html(&value),
            escape_html(&label)
        ));
    }

    ctx.dedent();
    ctx.add_line("</select>");
    Ok(())
}

/// `data-node-id`, layout class and `data-action` shared by every element
fn attributes(node: &Node, ctx: &mut Context) -> Result<String, CompileError> {
    let mut attrs = format!(" data-node-id=\"{}\"", escape_html(&node.id));

    match node.kind {
        NodeType::Row => attrs.push_str(" class=\"pc-row\""),
        NodeType::Column => attrs.push_str(" class=\"pc-column\""),
        NodeType::Spacer => attrs.push_str(" class=\"pc-spacer\""),
        _ => {}
    }

    if let Some(action) = node.prop("action") {
        let action: ClickAction =
            serde_json::from_value(action.clone()).map_err(|source| CompileError::InvalidAction {
                node: node.id.clone(),
                source,
            })?;
        attrs.push_str(&format!(" data-action=\"{}\"", escape_html(&action.to_attribute())));
        ctx.has_actions = true;
    }

    Ok(attrs)
}

fn optional_attr(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!(" {}=\"{}\"", name, escape_html(value)),
        None => String::new(),
    }
}

fn tag_name(node: &Node) -> &'static str {
    match node.kind {
        NodeType::Page => "main",
        NodeType::Section => "section",
        NodeType::Block | NodeType::Row | NodeType::Column | NodeType::Fragment => "div",
        NodeType::List => "ul",
        NodeType::Form => "form",
        NodeType::Heading => heading_tag(node.prop("level")),
        NodeType::Paragraph => "p",
        NodeType::Text => "span",
        NodeType::Image => "img",
        NodeType::Button => "button",
        NodeType::Link => "a",
        NodeType::Input => "input",
        NodeType::Textarea => "textarea",
        NodeType::Select => "select",
        NodeType::Checkbox => "label",
        NodeType::Divider => "hr",
        NodeType::Spacer => "div",
    }
}

fn heading_tag(level: Option<&Value>) -> &'static str {
    match level.and_then(Value::as_u64) {
        Some(1) => "h1",
        Some(3) => "h3",
        Some(4) => "h4",
        Some(5) => "h5",
        Some(6) => "h6",
        _ => "h2",
    }
}

fn text_content(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "hr")
}
