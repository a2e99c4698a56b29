//! Shorthand style declarations as stored on nodes.

use crate::keywords::{Align, Direction, Display, Justify, TextAlign, Wrap};
use serde::{Deserialize, Serialize};

/// Prefix marking a value as a theme token reference (`"$colors.primary"`)
pub const TOKEN_MARKER: char = '$';

/// A literal value or a token reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Dotted token path if this value references the theme
    pub fn token_path(&self) -> Option<&str> {
        match self {
            StyleValue::Text(text) => text.strip_prefix(TOKEN_MARKER),
            StyleValue::Number(_) => None,
        }
    }

    pub fn token(path: &str) -> Self {
        StyleValue::Text(format!("{}{}", TOKEN_MARKER, path))
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

/// The closed set of shorthand properties a node can carry.
///
/// Enumerated properties use the keyword enums; everything else is a
/// [`StyleValue`] which may be a token reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StyleShorthand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<Justify>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<Wrap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_x: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_y: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_x: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_y: Option<StyleValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grow: Option<StyleValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<StyleValue>,

    /// Typography preset; a token resolving to an object of font settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<StyleValue>,
}

impl StyleShorthand {
    pub fn is_empty(&self) -> bool {
        self == &StyleShorthand::default()
    }
}

/// Named viewport thresholds for overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
}

impl Breakpoint {
    /// Order in which breakpoint fragments are emitted
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg];

    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        }
    }

    pub fn default_px(self) -> u32 {
        match self {
            Breakpoint::Sm => 640,
            Breakpoint::Md => 768,
            Breakpoint::Lg => 1024,
        }
    }
}

/// Base style plus optional per-breakpoint overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStyle {
    #[serde(default)]
    pub base: StyleShorthand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<StyleShorthand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<StyleShorthand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<StyleShorthand>,
}

impl ResponsiveStyle {
    pub fn override_for(&self, breakpoint: Breakpoint) -> Option<&StyleShorthand> {
        match breakpoint {
            Breakpoint::Sm => self.sm.as_ref(),
            Breakpoint::Md => self.md.as_ref(),
            Breakpoint::Lg => self.lg.as_ref(),
        }
    }

    pub fn override_for_mut(&mut self, breakpoint: Breakpoint) -> &mut Option<StyleShorthand> {
        match breakpoint {
            Breakpoint::Sm => &mut self.sm,
            Breakpoint::Md => &mut self.md,
            Breakpoint::Lg => &mut self.lg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shorthand_with_tokens() {
        let json = r#"{
            "base": { "padding": 16, "bg": "$colors.primary", "justify": "between" },
            "sm": { "padding": 8 }
        }"#;

        let style: ResponsiveStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.base.padding, Some(StyleValue::Number(16.0)));
        assert_eq!(
            style.base.bg.as_ref().and_then(|v| v.token_path()),
            Some("colors.primary")
        );
        assert_eq!(style.base.justify, Some(Justify::Between));
        assert!(style.md.is_none());
        assert!(style.override_for(Breakpoint::Sm).is_some());
    }

    #[test]
    fn test_unknown_shorthand_is_rejected() {
        let json = r#"{ "base": { "paddng": 4 } }"#;
        assert!(serde_json::from_str::<ResponsiveStyle>(json).is_err());
    }

    #[test]
    fn test_literal_text_is_not_a_token() {
        assert_eq!(StyleValue::from("10px").token_path(), None);
        assert_eq!(StyleValue::token("spacing.md").token_path(), Some("spacing.md"));
    }
}
