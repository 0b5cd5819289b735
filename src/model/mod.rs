//! # Document Model
//!
//! The input representation for the layout core: a tree of styled nodes.
//! The tree is produced upstream (an HTML parser plus a CSS cascade) and is
//! handed to the layout engine with every style already resolved. Folio
//! never mutates it.
//!
//! The node vocabulary mirrors the handful of HTML elements a document
//! pipeline cares about: block containers, inline phrasing elements, text,
//! and the structural parts of a table.

use crate::style::Style;
use serde::{Deserialize, Serialize};

/// Edge values (top, right, bottom, left) used for margin, padding and
/// border widths. Units are points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// True when any edge is negative (or NaN).
    pub fn has_negative(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .any(|v| v.is_nan() || *v < 0.0)
    }
}

/// A node in the styled document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Resolved style for this node.
    #[serde(default)]
    pub style: Style,

    /// Child nodes, in document order.
    #[serde(default)]
    pub children: Vec<DocumentNode>,

    /// Optional identifier from the source document, for debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The kinds of node the layout core understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// The document body.
    Document,
    Heading {
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Paragraph,
    List {
        #[serde(default)]
        ordered: bool,
    },
    ListItem,
    Section,
    Div,

    /// A table. Children are an optional caption followed by sections
    /// (or rows, which form an implicit body).
    Table,
    /// The header section (`thead`). Repeats on every page a table spans.
    TableHeader,
    /// A body section (`tbody`).
    TableBody,
    /// The footer section (`tfoot`). Lands on the table's last page.
    TableFooter,
    TableRow,
    TableCell {
        #[serde(default)]
        header: bool,
    },

    Span,
    Emphasis,
    Strong,
    /// A run of text. Always a leaf.
    Text {
        content: String,
    },
    /// A forced line break (`br`).
    LineBreak,

    /// Any element the producer emitted that Folio has no semantics for.
    #[serde(other)]
    Unknown,
}

fn default_heading_level() -> u8 {
    1
}

impl NodeKind {
    /// The name used in layout paths and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::List { .. } => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::Section => "Section",
            NodeKind::Div => "Div",
            NodeKind::Table => "Table",
            NodeKind::TableHeader => "TableHeader",
            NodeKind::TableBody => "TableBody",
            NodeKind::TableFooter => "TableFooter",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell { .. } => "TableCell",
            NodeKind::Span => "Span",
            NodeKind::Emphasis => "Emphasis",
            NodeKind::Strong => "Strong",
            NodeKind::Text { .. } => "Text",
            NodeKind::LineBreak => "LineBreak",
            NodeKind::Unknown => "Unknown",
        }
    }

    /// Header, body or footer section of a table.
    pub fn is_table_section(&self) -> bool {
        matches!(
            self,
            NodeKind::TableHeader | NodeKind::TableBody | NodeKind::TableFooter
        )
    }
}

impl DocumentNode {
    /// Create a node with default style and no children.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            style: Style::default(),
            children: vec![],
            id: None,
        }
    }

    /// Create a Text node.
    pub fn text(content: &str) -> Self {
        Self::new(NodeKind::Text {
            content: content.to_string(),
        })
    }

    /// Create a Div with children.
    pub fn div(children: Vec<DocumentNode>) -> Self {
        Self::new(NodeKind::Div).with_children(children)
    }

    /// Create a Paragraph holding a single text run.
    pub fn paragraph(content: &str) -> Self {
        Self::new(NodeKind::Paragraph).with_children(vec![Self::text(content)])
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_children(mut self, children: Vec<DocumentNode>) -> Self {
        self.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_deserialize_as_unknown() {
        let node: DocumentNode =
            serde_json::from_str(r#"{ "kind": { "type": "Marquee" } }"#).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);
        assert!(node.children.is_empty());
    }

    #[test]
    fn heading_level_defaults_to_one() {
        let node: DocumentNode =
            serde_json::from_str(r#"{ "kind": { "type": "Heading" } }"#).unwrap();
        assert_eq!(node.kind, NodeKind::Heading { level: 1 });
    }

    #[test]
    fn negative_edges_are_detected() {
        assert!(!Edges::uniform(4.0).has_negative());
        assert!(Edges::symmetric(-1.0, 0.0).has_negative());
        assert!(Edges::uniform(f64::NAN).has_negative());
    }
}
