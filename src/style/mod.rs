//! # Style System
//!
//! The resolved, CSS-like style attached to every document node. The cascade
//! has already run upstream: inherited properties are flattened, and the box
//! model (margin, padding, border) is never inherited.
//!
//! Inline text properties stay optional. The inline formatting context
//! threads its own style state through nested phrasing elements, and `None`
//! means "keep whatever the enclosing inline element uses".

use crate::model::Edges;
use serde::{Deserialize, Serialize};

/// The complete set of style properties for a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // ── Display ────────────────────────────────────────────────
    /// Explicit display value. `None` means the node's semantic default.
    pub display: Option<Display>,

    // ── Box Model ──────────────────────────────────────────────
    /// Explicit width.
    pub width: Option<Dimension>,
    /// Explicit height.
    pub height: Option<Dimension>,
    pub min_width: Option<Dimension>,
    pub min_height: Option<Dimension>,
    pub max_width: Option<Dimension>,
    pub max_height: Option<Dimension>,

    /// Padding inside the border.
    pub padding: Option<Edges>,
    /// Margin outside the border.
    pub margin: Option<Edges>,
    /// Border width per edge.
    pub border_width: Option<Edges>,

    // ── Flexbox Layout ─────────────────────────────────────────
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    pub flex_wrap: Option<FlexWrap>,

    // ── Tables ─────────────────────────────────────────────────
    pub border_collapse: Option<BorderCollapse>,
    /// Spacing between cells in the separated border model.
    pub border_spacing: Option<f64>,

    // ── Typography ─────────────────────────────────────────────
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Font weight (100-900).
    pub font_weight: Option<u32>,
    pub font_style: Option<FontStyle>,
    /// Line height as a multiplier of font size.
    pub line_height: Option<f64>,
    pub text_decoration: Option<TextDecoration>,

    // ── Color & Background ─────────────────────────────────────
    pub color: Option<Color>,
    pub background_color: Option<Color>,

    // ── Page Behavior ──────────────────────────────────────────
    /// Never split this node across pages (`page-break-inside: avoid`).
    pub keep_together: Option<bool>,

    /// Keep this node on the same page as the node that follows it
    /// (`page-break-after: avoid`).
    pub keep_with_next: Option<bool>,

    /// Force a page break before this node.
    pub break_before: Option<bool>,
}

/// A display keyword as written by the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    None,
    Flex,
    Table,
    /// Any keyword Folio does not implement (`grid`, `contents`, ...).
    #[serde(other)]
    Other,
}

/// A dimension that can be points, percentage, or auto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// Fixed size in points (1/72 inch).
    Pt(f64),
    /// Percentage of the containing block's corresponding dimension.
    Percent(f64),
    /// Size determined by content.
    Auto,
}

impl Dimension {
    /// Resolve this dimension given a parent size.
    /// Returns None for Auto, and for percentages of an unknown size.
    pub fn resolve(&self, parent_size: f64) -> Option<f64> {
        match self {
            Dimension::Pt(v) => Some(*v),
            Dimension::Percent(p) if parent_size.is_finite() => Some(parent_size * p / 100.0),
            Dimension::Percent(_) | Dimension::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl FlexDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::Column => "column",
            FlexDirection::RowReverse => "row-reverse",
            FlexDirection::ColumnReverse => "column-reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl JustifyContent {
    pub fn as_str(&self) -> &'static str {
        match self {
            JustifyContent::FlexStart => "flex-start",
            JustifyContent::FlexEnd => "flex-end",
            JustifyContent::Center => "center",
            JustifyContent::SpaceBetween => "space-between",
            JustifyContent::SpaceAround => "space-around",
            JustifyContent::SpaceEvenly => "space-evenly",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignItems {
    FlexStart,
    FlexEnd,
    Center,
    #[default]
    Stretch,
    Baseline,
}

impl AlignItems {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignItems::FlexStart => "flex-start",
            AlignItems::FlexEnd => "flex-end",
            AlignItems::Center => "center",
            AlignItems::Stretch => "stretch",
            AlignItems::Baseline => "baseline",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlexWrap::NoWrap => "nowrap",
            FlexWrap::Wrap => "wrap",
            FlexWrap::WrapReverse => "wrap-reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderCollapse {
    #[default]
    Separate,
    Collapse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Style {
    pub fn margin(&self) -> Edges {
        self.margin.unwrap_or_default()
    }

    pub fn padding(&self) -> Edges {
        self.padding.unwrap_or_default()
    }

    pub fn border(&self) -> Edges {
        self.border_width.unwrap_or_default()
    }

    pub fn keeps_together(&self) -> bool {
        self.keep_together.unwrap_or(false)
    }

    pub fn keeps_with_next(&self) -> bool {
        self.keep_with_next.unwrap_or(false)
    }

    pub fn breaks_before(&self) -> bool {
        self.break_before.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_display_keyword_is_other() {
        let style: Style = serde_json::from_str(r#"{ "display": "Grid" }"#).unwrap();
        assert_eq!(style.display, Some(Display::Other));
    }

    #[test]
    fn percent_of_unknown_size_is_unresolved() {
        assert_eq!(Dimension::Percent(50.0).resolve(200.0), Some(100.0));
        assert_eq!(Dimension::Percent(50.0).resolve(f64::INFINITY), None);
        assert_eq!(Dimension::Auto.resolve(200.0), None);
    }
}
