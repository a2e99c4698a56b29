//! Theme tokens and dotted-path lookup.

use crate::shorthand::Breakpoint;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Invalid theme: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Token groups referenced by `$group.path` values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub colors: Map<String, Value>,
    #[serde(default)]
    pub spacing: Map<String, Value>,
    #[serde(default)]
    pub radius: Map<String, Value>,
    #[serde(default)]
    pub shadow: Map<String, Value>,
    #[serde(default)]
    pub typography: Map<String, Value>,
    #[serde(default)]
    pub breakpoints: Map<String, Value>,
}

impl Theme {
    /// Theme with no tokens and default breakpoints
    pub fn empty() -> Self {
        Self {
            colors: Map::new(),
            spacing: Map::new(),
            radius: Map::new(),
            shadow: Map::new(),
            typography: Map::new(),
            breakpoints: Map::new(),
        }
    }

    pub fn from_json(source: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn group(&self, name: &str) -> Option<&Map<String, Value>> {
        match name {
            "colors" => Some(&self.colors),
            "spacing" => Some(&self.spacing),
            "radius" => Some(&self.radius),
            "shadow" => Some(&self.shadow),
            "typography" => Some(&self.typography),
            "breakpoints" => Some(&self.breakpoints),
            _ => None,
        }
    }

    /// Resolve a dotted path such as `colors.gray.100`.
    ///
    /// Unknown groups, missing keys and `null` leaves all resolve to `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let group = self.group(segments.next()?)?;
        let mut current = group.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    /// Pixel width for a breakpoint; accepts `640` or `"640px"`
    pub fn breakpoint_px(&self, breakpoint: Breakpoint) -> u32 {
        self.breakpoints
            .get(breakpoint.name())
            .and_then(|value| match value {
                Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                Value::String(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
                _ => None,
            })
            .unwrap_or_else(|| breakpoint.default_px())
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: object(json!({
                "primary": "#3366ff",
                "secondary": "#7c3aed",
                "text": "#111827",
                "muted": "#6b7280",
                "background": "#ffffff",
                "surface": "#f9fafb",
                "border": "#e5e7eb",
                "danger": "#dc2626",
                "success": "#16a34a"
            })),
            spacing: object(json!({
                "xs": 4, "sm": 8, "md": 16, "lg": 24, "xl": 32, "2xl": 48
            })),
            radius: object(json!({
                "none": 0, "sm": 4, "md": 8, "lg": 16, "full": 9999
            })),
            shadow: object(json!({
                "sm": "0 1px 2px rgba(0, 0, 0, 0.05)",
                "md": "0 4px 6px rgba(0, 0, 0, 0.1)",
                "lg": "0 10px 15px rgba(0, 0, 0, 0.1)"
            })),
            typography: object(json!({
                "body": { "fontSize": 16, "lineHeight": 1.5, "fontWeight": 400 },
                "heading": { "fontSize": 32, "lineHeight": 1.2, "fontWeight": 700 },
                "caption": { "fontSize": 12, "lineHeight": 1.4, "fontWeight": 400 }
            })),
            breakpoints: object(json!({ "sm": 640, "md": 768, "lg": 1024 })),
        }
    }
}
