//! Enumerated shorthand values and their CSS keywords.
//!
//! Every shorthand that maps onto a fixed set of CSS keywords is a closed enum
//! here, and `css_keyword` is the only place the shorthand → CSS translation
//! happens. Adding a variant without a keyword is a compile error.

use serde::{Deserialize, Serialize};

/// `display`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    Flex,
    InlineFlex,
    Grid,
    None,
}

impl Display {
    pub fn css_keyword(self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::Inline => "inline",
            Display::InlineBlock => "inline-block",
            Display::Flex => "flex",
            Display::InlineFlex => "inline-flex",
            Display::Grid => "grid",
            Display::None => "none",
        }
    }
}

/// Main axis of a flex container (`flex-direction`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl Direction {
    pub fn css_keyword(self) -> &'static str {
        match self {
            Direction::Row => "row",
            Direction::Column => "column",
            Direction::RowReverse => "row-reverse",
            Direction::ColumnReverse => "column-reverse",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Row | Direction::RowReverse)
    }
}

/// Cross-axis alignment (`align-items`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Start,
    Center,
    End,
    Stretch,
    Baseline,
}

impl Align {
    pub fn css_keyword(self) -> &'static str {
        match self {
            Align::Start => "flex-start",
            Align::Center => "center",
            Align::End => "flex-end",
            Align::Stretch => "stretch",
            Align::Baseline => "baseline",
        }
    }
}

/// Main-axis distribution (`justify-content`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Justify {
    Start,
    Center,
    End,
    Between,
    Around,
    Evenly,
}

impl Justify {
    pub fn css_keyword(self) -> &'static str {
        match self {
            Justify::Start => "flex-start",
            Justify::Center => "center",
            Justify::End => "flex-end",
            Justify::Between => "space-between",
            Justify::Around => "space-around",
            Justify::Evenly => "space-evenly",
        }
    }
}

/// `text-align`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
    Start,
    End,
}

impl TextAlign {
    pub fn css_keyword(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
            TextAlign::Start => "start",
            TextAlign::End => "end",
        }
    }
}

/// `flex-wrap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Wrap {
    Wrap,
    NoWrap,
    WrapReverse,
}

impl Wrap {
    pub fn css_keyword(self) -> &'static str {
        match self {
            Wrap::Wrap => "wrap",
            Wrap::NoWrap => "nowrap",
            Wrap::WrapReverse => "wrap-reverse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_justify_shorthand_keywords() {
        assert_eq!(Justify::Start.css_keyword(), "flex-start");
        assert_eq!(Justify::Between.css_keyword(), "space-between");
        assert_eq!(Justify::Around.css_keyword(), "space-around");
        assert_eq!(Justify::Evenly.css_keyword(), "space-evenly");
    }

    #[test]
    fn test_keywords_deserialize_from_shorthand() {
        let justify: Justify = serde_json::from_str("\"between\"").unwrap();
        assert_eq!(justify, Justify::Between);

        let display: Display = serde_json::from_str("\"inlineBlock\"").unwrap();
        assert_eq!(display.css_keyword(), "inline-block");

        assert!(serde_json::from_str::<Align>("\"middle\"").is_err());
    }
}
