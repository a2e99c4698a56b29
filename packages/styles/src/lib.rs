//! # Pagecraft Styles
//!
//! Turns theme-token shorthand style declarations into concrete CSS.
//!
//! ```text
//! ResponsiveStyle { base, sm?, md?, lg? }  +  Theme
//!                     ↓ resolve_style
//! ResolvedStyle { base: Declarations, media_css: "@media (max-width: …) { … }" }
//! ```
//!
//! Token references are strings prefixed with `$` (`"$colors.primary"`) and are
//! looked up by dotted path in the [`Theme`]. A reference that does not resolve
//! drops the property instead of failing.

mod keywords;
mod resolver;
mod shorthand;
mod theme;

pub use keywords::{Align, Direction, Display, Justify, TextAlign, Wrap};
pub use resolver::{
    node_selector, resolve_shorthand, resolve_style, rule_css, Declarations,
    ResolvedStyle,
};
pub use shorthand::{Breakpoint, ResponsiveStyle, StyleShorthand, StyleValue, TOKEN_MARKER};
pub use theme::{Theme, ThemeError};
