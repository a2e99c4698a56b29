//! Page nodes

use pagecraft_styles::ResponsiveStyle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node kinds. Containers own an ordered child list; leaves never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Page,
    Section,
    #[serde(rename = "box")]
    Block,
    Row,
    Column,
    List,
    Form,
    /// Template-only container whose children are inserted independently
    Fragment,

    Heading,
    Paragraph,
    Text,
    Image,
    Button,
    Link,
    Input,
    Textarea,
    Select,
    Checkbox,
    Divider,
    Spacer,
}

impl NodeType {
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeType::Page
                | NodeType::Section
                | NodeType::Block
                | NodeType::Row
                | NodeType::Column
                | NodeType::List
                | NodeType::Form
                | NodeType::Fragment
        )
    }

    /// Serialized name, also used as the id prefix for new nodes
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Page => "page",
            NodeType::Section => "section",
            NodeType::Block => "box",
            NodeType::Row => "row",
            NodeType::Column => "column",
            NodeType::List => "list",
            NodeType::Form => "form",
            NodeType::Fragment => "fragment",
            NodeType::Heading => "heading",
            NodeType::Paragraph => "paragraph",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::Button => "button",
            NodeType::Link => "link",
            NodeType::Input => "input",
            NodeType::Textarea => "textarea",
            NodeType::Select => "select",
            NodeType::Checkbox => "checkbox",
            NodeType::Divider => "divider",
            NodeType::Spacer => "spacer",
        }
    }
}

/// Who created a node. Only `Auto` containers are eligible for cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    User,
    Auto,
}

impl Origin {
    pub fn is_user(&self) -> bool {
        *self == Origin::User
    }
}

/// Layout axis of a container's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Type-specific fields plus the shorthand style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ResponsiveStyle>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: NodeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<NodeProps>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_order: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Origin::is_user")]
    pub origin: Origin,
}

impl Node {
    /// New user node; containers start with an empty child list
    pub fn new(id: impl Into<String>, kind: NodeType) -> Self {
        Self {
            id: id.into(),
            kind,
            props: None,
            children_order: kind.is_container().then(Vec::new),
            origin: Origin::User,
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children_order = Some(children.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(NodeProps::default)
            .fields
            .insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, style: ResponsiveStyle) -> Self {
        self.props.get_or_insert_with(NodeProps::default).style = Some(style);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn children(&self) -> &[String] {
        self.children_order.as_deref().unwrap_or(&[])
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.as_ref()?.fields.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key)?.as_str()
    }

    pub fn style(&self) -> Option<&ResponsiveStyle> {
        self.props.as_ref()?.style.as_ref()
    }

    /// Axis along which this container lays out its children
    pub fn layout_axis(&self) -> Axis {
        match self.kind {
            NodeType::Row => Axis::Horizontal,
            NodeType::Column => Axis::Vertical,
            _ => match self.style().and_then(|style| style.base.direction) {
                Some(direction) if direction.is_horizontal() => Axis::Horizontal,
                _ => Axis::Vertical,
            },
        }
    }
}
