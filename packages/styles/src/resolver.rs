//! Shorthand → CSS resolution.
//!
//! The same functions back the live editor, the preview and the static export,
//! so their output must depend only on `(style, theme, selector)`.

use crate::shorthand::{Breakpoint, ResponsiveStyle, StyleShorthand, StyleValue};
use crate::theme::Theme;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// CSS property name → value. Sorted so output is byte-stable.
pub type Declarations = BTreeMap<String, String>;

/// Properties whose bare numbers are not lengths
const UNITLESS: &[&str] = &["opacity", "font-weight", "line-height", "z-index", "flex-grow"];

/// Typography preset keys and the CSS properties they expand to
const TYPOGRAPHY_KEYS: &[(&str, &str)] = &[
    ("fontFamily", "font-family"),
    ("fontSize", "font-size"),
    ("fontWeight", "font-weight"),
    ("lineHeight", "line-height"),
    ("letterSpacing", "letter-spacing"),
];

/// Output of resolving one node's responsive style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    /// Applied unconditionally
    pub base: Declarations,
    /// `sm`, `md`, `lg` fragments in that order, each wrapped in a media query
    pub media_css: String,
}

impl ResolvedStyle {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.media_css.is_empty()
    }
}

/// Structural selector used to scope a node's rules
pub fn node_selector(node_id: &str) -> String {
    let escaped = node_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[data-node-id=\"{}\"]", escaped)
}

/// Resolve base style and breakpoint overrides for one node
pub fn resolve_style(style: &ResponsiveStyle, theme: &Theme, selector: &str) -> ResolvedStyle {
    let base = resolve_shorthand(&style.base, theme);

    let mut media_css = String::new();
    for breakpoint in Breakpoint::ALL {
        let Some(shorthand) = style.override_for(breakpoint) else {
            continue;
        };
        let declarations = resolve_shorthand(shorthand, theme);
        if declarations.is_empty() {
            continue;
        }
        media_css.push_str(&media_fragment(
            theme.breakpoint_px(breakpoint),
            selector,
            &declarations,
        ));
    }

    ResolvedStyle { base, media_css }
}

/// Resolve a single shorthand object into concrete declarations
pub fn resolve_shorthand(style: &StyleShorthand, theme: &Theme) -> Declarations {
    let mut out = Declarations::new();

    if let Some(direction) = style.direction {
        out.insert("display".into(), "flex".into());
        out.insert("flex-direction".into(), direction.css_keyword().into());
    }
    if let Some(display) = style.display {
        out.insert("display".into(), display.css_keyword().into());
    }
    if let Some(align) = style.align {
        out.insert("align-items".into(), align.css_keyword().into());
    }
    if let Some(justify) = style.justify {
        out.insert("justify-content".into(), justify.css_keyword().into());
    }
    if let Some(wrap) = style.wrap {
        out.insert("flex-wrap".into(), wrap.css_keyword().into());
    }
    if let Some(text_align) = style.text_align {
        out.insert("text-align".into(), text_align.css_keyword().into());
    }

    put(&mut out, theme, &["gap"], style.gap.as_ref());
    put(&mut out, theme, &["padding"], style.padding.as_ref());
    put(&mut out, theme, &["padding-left", "padding-right"], style.padding_x.as_ref());
    put(&mut out, theme, &["padding-top", "padding-bottom"], style.padding_y.as_ref());
    put(&mut out, theme, &["margin"], style.margin.as_ref());
    put(&mut out, theme, &["margin-left", "margin-right"], style.margin_x.as_ref());
    put(&mut out, theme, &["margin-top", "margin-bottom"], style.margin_y.as_ref());

    put(&mut out, theme, &["width"], style.width.as_ref());
    put(&mut out, theme, &["height"], style.height.as_ref());
    put(&mut out, theme, &["min-width"], style.min_width.as_ref());
    put(&mut out, theme, &["max-width"], style.max_width.as_ref());
    put(&mut out, theme, &["min-height"], style.min_height.as_ref());
    put(&mut out, theme, &["max-height"], style.max_height.as_ref());
    put(&mut out, theme, &["flex-grow"], style.grow.as_ref());

    put(&mut out, theme, &["background"], style.bg.as_ref());
    put(&mut out, theme, &["color"], style.color.as_ref());
    put(&mut out, theme, &["border"], style.border.as_ref());
    put(&mut out, theme, &["border-color"], style.border_color.as_ref());
    put(&mut out, theme, &["border-radius"], style.radius.as_ref());
    put(&mut out, theme, &["box-shadow"], style.shadow.as_ref());
    put(&mut out, theme, &["opacity"], style.opacity.as_ref());

    // Preset first so explicit font properties win
    if let Some(Value::Object(preset)) = style.typography.as_ref().and_then(|v| resolve_value(v, theme)) {
        for (key, property) in TYPOGRAPHY_KEYS {
            if let Some(css) = preset.get(*key).and_then(|value| css_value(property, value)) {
                out.insert((*property).to_string(), css);
            }
        }
    }
    put(&mut out, theme, &["font-family"], style.font_family.as_ref());
    put(&mut out, theme, &["font-size"], style.font_size.as_ref());
    put(&mut out, theme, &["font-weight"], style.font_weight.as_ref());
    put(&mut out, theme, &["line-height"], style.line_height.as_ref());
    put(&mut out, theme, &["letter-spacing"], style.letter_spacing.as_ref());

    out
}

fn put(out: &mut Declarations, theme: &Theme, properties: &[&str], value: Option<&StyleValue>) {
    let Some(value) = value else {
        return;
    };
    let Some(resolved) = resolve_value(value, theme) else {
        return;
    };
    for property in properties {
        if let Some(css) = css_value(property, &resolved) {
            out.insert((*property).to_string(), css);
        }
    }
}

/// Literal or token value as JSON; `None` for an unresolved token
fn resolve_value(value: &StyleValue, theme: &Theme) -> Option<Value> {
    match value.token_path() {
        Some(path) => {
            let resolved = theme.lookup(path).cloned();
            if resolved.is_none() {
                debug!(token = path, "Unresolved theme token");
            }
            resolved
        }
        None => match value {
            StyleValue::Number(n) => serde_json::Number::from_f64(*n).map(Value::Number),
            StyleValue::Text(text) => Some(Value::String(text.clone())),
        },
    }
}

fn css_value(property: &str, value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            let n = n.as_f64()?;
            if UNITLESS.contains(&property) {
                Some(format_number(n))
            } else if n == 0.0 {
                Some("0".to_string())
            } else {
                Some(format!("{}px", format_number(n)))
            }
        }
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A rule block for `selector`
pub fn rule_css(selector: &str, declarations: &Declarations) -> String {
    let mut css = String::new();
    css.push_str(selector);
    css.push_str(" {\n");
    for (property, value) in declarations {
        css.push_str("  ");
        css.push_str(property);
        css.push_str(": ");
        css.push_str(value);
        css.push_str(";\n");
    }
    css.push_str("}\n");
    css
}

fn media_fragment(max_width: u32, selector: &str, declarations: &Declarations) -> String {
    let mut css = format!("@media (max-width: {}px) {{\n", max_width);
    for line in rule_css(selector, declarations).lines() {
        css.push_str("  ");
        css.push_str(line);
        css.push('\n');
    }
    css.push_str("}\n");
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{Direction, Justify};

    fn style(json: &str) -> ResponsiveStyle {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_become_pixels_except_unitless() {
        let resolved = resolve_style(
            &style(r#"{ "base": { "padding": 16, "opacity": 0.5, "fontWeight": 600, "margin": 0 } }"#),
            &Theme::default(),
            &node_selector("n1"),
        );

        assert_eq!(resolved.base["padding"], "16px");
        assert_eq!(resolved.base["opacity"], "0.5");
        assert_eq!(resolved.base["font-weight"], "600");
        assert_eq!(resolved.base["margin"], "0");
        assert!(resolved.media_css.is_empty());
    }

    #[test]
    fn test_tokens_resolve_and_misses_are_dropped() {
        let resolved = resolve_style(
            &style(r#"{ "base": { "bg": "$colors.primary", "gap": "$spacing.md", "color": "$colors.nope" } }"#),
            &Theme::default(),
            &node_selector("n1"),
        );

        assert_eq!(resolved.base["background"], "#3366ff");
        assert_eq!(resolved.base["gap"], "16px");
        assert!(!resolved.base.contains_key("color"));
    }

    #[test]
    fn test_enumerated_shorthands_use_keyword_table() {
        let shorthand = StyleShorthand {
            direction: Some(Direction::Row),
            justify: Some(Justify::Between),
            ..Default::default()
        };
        let out = resolve_shorthand(&shorthand, &Theme::default());

        assert_eq!(out["display"], "flex");
        assert_eq!(out["flex-direction"], "row");
        assert_eq!(out["justify-content"], "space-between");
    }

    #[test]
    fn test_axis_shorthands_expand() {
        let out = resolve_shorthand(
            &serde_json::from_str(r#"{ "paddingX": 12, "marginY": "$spacing.sm" }"#).unwrap(),
            &Theme::default(),
        );

        assert_eq!(out["padding-left"], "12px");
        assert_eq!(out["padding-right"], "12px");
        assert_eq!(out["margin-top"], "8px");
        assert_eq!(out["margin-bottom"], "8px");
    }

    #[test]
    fn test_typography_preset_expands_and_explicit_wins() {
        let out = resolve_shorthand(
            &serde_json::from_str(r#"{ "typography": "$typography.heading", "fontSize": 40 }"#).unwrap(),
            &Theme::default(),
        );

        assert_eq!(out["font-size"], "40px");
        assert_eq!(out["font-weight"], "700");
        assert_eq!(out["line-height"], "1.2");
    }

    #[test]
    fn test_breakpoint_fragments_in_order() {
        let resolved = resolve_style(
            &style(r#"{ "base": { "padding": 24 }, "lg": { "padding": 20 }, "sm": { "padding": 8 } }"#),
            &Theme::default(),
            &node_selector("hero"),
        );

        let sm = resolved.media_css.find("max-width: 640px").unwrap();
        let lg = resolved.media_css.find("max-width: 1024px").unwrap();
        assert!(sm < lg);
        assert!(!resolved.media_css.contains("768px"));
        assert!(resolved.media_css.contains("[data-node-id=\"hero\"] {"));
        assert!(resolved.media_css.contains("    padding: 8px;"));
    }

    #[test]
    fn test_selector_escapes_quotes() {
        assert_eq!(node_selector("a\"b"), "[data-node-id=\"a\\\"b\"]");
    }
}
