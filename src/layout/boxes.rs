//! # Layout Boxes
//!
//! The intermediate tree between document nodes and fragments. Built once
//! per layout pass, immutable afterwards. Each box borrows its node and
//! carries the two things every formatting context needs up front: the
//! display class and the computed spacing.
//!
//! Paths (`"Document:0/Paragraph:2"`) are the identity of a box across the
//! layout and pagination passes. The index is the node's position among its
//! siblings, so paths are unique within a pass and stable between passes
//! over the same tree.

use serde::Serialize;

use super::display::{classify, DisplayClass};
use crate::model::{DocumentNode, Edges, NodeKind};
use crate::style::Style;

/// Margin, padding and border of one box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxSpacing {
    pub margin: Edges,
    pub padding: Edges,
    pub border: Edges,
}

impl BoxSpacing {
    pub fn from_style(style: &Style) -> Self {
        Self {
            margin: style.margin(),
            padding: style.padding(),
            border: style.border(),
        }
    }

    /// Padding plus border: the distance between border box and content box.
    pub fn frame(&self) -> Edges {
        Edges {
            top: self.padding.top + self.border.top,
            right: self.padding.right + self.border.right,
            bottom: self.padding.bottom + self.border.bottom,
            left: self.padding.left + self.border.left,
        }
    }
}

/// A node prepared for layout.
#[derive(Debug, Clone)]
pub struct LayoutBox<'doc> {
    pub node: &'doc DocumentNode,
    pub display: DisplayClass,
    pub spacing: BoxSpacing,
    pub path: String,
    pub children: Vec<LayoutBox<'doc>>,
}

impl<'doc> LayoutBox<'doc> {
    /// Build the box tree for `node`. Hidden subtrees keep a single box
    /// with no children so that sibling indices stay stable.
    pub fn build(node: &'doc DocumentNode) -> Self {
        Self::build_at(node, None, 0)
    }

    fn build_at(node: &'doc DocumentNode, parent_path: Option<&str>, index: usize) -> Self {
        let display = classify(&node.kind, &node.style);
        let segment = format!("{}:{}", node.kind.name(), index);
        let path = match parent_path {
            Some(parent) => format!("{parent}/{segment}"),
            None => segment,
        };

        let children = if display == DisplayClass::None {
            Vec::new()
        } else {
            node.children
                .iter()
                .enumerate()
                .map(|(i, child)| Self::build_at(child, Some(&path), i))
                .collect()
        };

        LayoutBox {
            node,
            display,
            spacing: BoxSpacing::from_style(&node.style),
            path,
            children,
        }
    }

    pub fn style(&self) -> &'doc Style {
        &self.node.style
    }

    pub fn kind(&self) -> &'doc NodeKind {
        &self.node.kind
    }

    pub fn is_hidden(&self) -> bool {
        self.display == DisplayClass::None
    }

    /// Children that generate boxes.
    pub fn visible_children(&self) -> impl Iterator<Item = &LayoutBox<'doc>> {
        self.children.iter().filter(|c| !c.is_hidden())
    }
}
