//! # Display Classification
//!
//! Maps a node to the display class that decides which formatting context
//! lays it out. An explicit `block`, `inline-block` or `none` always wins;
//! any other explicit keyword falls back to the node's semantic default.

use serde::Serialize;

use crate::model::NodeKind;
use crate::style::{Display, Style};

/// The outer display class of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayClass {
    Block,
    Inline,
    InlineBlock,
    None,
}

impl DisplayClass {
    /// Inline and inline-block boxes take part in inline flow.
    pub fn is_inline_level(&self) -> bool {
        matches!(self, DisplayClass::Inline | DisplayClass::InlineBlock)
    }
}

/// Classify a node.
pub fn classify(kind: &NodeKind, style: &Style) -> DisplayClass {
    let explicit = match style.display {
        Some(Display::Block) => Some(DisplayClass::Block),
        Some(Display::InlineBlock) => Some(DisplayClass::InlineBlock),
        Some(Display::None) => Some(DisplayClass::None),
        _ => None,
    };

    if let Some(class) = explicit {
        log::trace!(
            target: "folio::display",
            "{} classified {:?} by explicit display",
            kind.name(),
            class
        );
        return class;
    }

    let class = semantic_default(kind);
    match style.display {
        Some(display) => log::trace!(
            target: "folio::display",
            "{} display {:?} not overriding; semantic default {:?}",
            kind.name(),
            display,
            class
        ),
        None => log::trace!(
            target: "folio::display",
            "{} classified {:?} by semantic default",
            kind.name(),
            class
        ),
    }
    class
}

/// The display class a node has when its style does not say otherwise.
pub fn semantic_default(kind: &NodeKind) -> DisplayClass {
    match kind {
        NodeKind::Document
        | NodeKind::Heading { .. }
        | NodeKind::Paragraph
        | NodeKind::List { .. }
        | NodeKind::ListItem
        | NodeKind::Section
        | NodeKind::Div
        | NodeKind::Table
        | NodeKind::TableHeader
        | NodeKind::TableBody
        | NodeKind::TableFooter
        | NodeKind::TableRow
        | NodeKind::TableCell { .. } => DisplayClass::Block,

        NodeKind::Span
        | NodeKind::Emphasis
        | NodeKind::Strong
        | NodeKind::Text { .. }
        | NodeKind::LineBreak => DisplayClass::Inline,

        NodeKind::Unknown => {
            log::trace!(target: "folio::display", "unknown node kind treated as block");
            DisplayClass::Block
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_display(display: Display) -> Style {
        Style {
            display: Some(display),
            ..Default::default()
        }
    }

    #[test]
    fn semantic_defaults() {
        let none = Style::default();
        assert_eq!(classify(&NodeKind::Paragraph, &none), DisplayClass::Block);
        assert_eq!(classify(&NodeKind::Heading { level: 2 }, &none), DisplayClass::Block);
        assert_eq!(classify(&NodeKind::Table, &none), DisplayClass::Block);
        assert_eq!(classify(&NodeKind::Span, &none), DisplayClass::Inline);
        assert_eq!(classify(&NodeKind::LineBreak, &none), DisplayClass::Inline);
        assert_eq!(
            classify(&NodeKind::Text { content: "x".into() }, &none),
            DisplayClass::Inline
        );
        assert_eq!(classify(&NodeKind::Unknown, &none), DisplayClass::Block);
    }

    #[test]
    fn explicit_display_overrides_in_both_directions() {
        assert_eq!(
            classify(&NodeKind::Span, &with_display(Display::Block)),
            DisplayClass::Block
        );
        assert_eq!(
            classify(&NodeKind::Div, &with_display(Display::InlineBlock)),
            DisplayClass::InlineBlock
        );
        assert_eq!(
            classify(&NodeKind::Paragraph, &with_display(Display::None)),
            DisplayClass::None
        );
    }

    #[test]
    fn unrecognized_display_falls_back_to_default() {
        assert_eq!(
            classify(&NodeKind::Div, &with_display(Display::Other)),
            DisplayClass::Block
        );
        assert_eq!(
            classify(&NodeKind::Strong, &with_display(Display::Other)),
            DisplayClass::Inline
        );
        assert_eq!(
            classify(&NodeKind::Div, &with_display(Display::Flex)),
            DisplayClass::Block
        );
    }
}
