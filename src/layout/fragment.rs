//! # Layout Fragments
//!
//! The measured output of a formatting context: one fragment per box (plus
//! anonymous inline fragments for runs of inline content). Fragments own
//! their children and never point back into the box tree; the source path
//! is their identity from here on.

use std::collections::BTreeMap;

use serde::Serialize;

use super::constraints::LayoutConstraints;
use super::display::DisplayClass;

/// Metadata keys shared between layout, pagination and renderers.
pub mod keys {
    pub const FLEX_DIRECTION: &str = "flex:direction";
    pub const FLEX_JUSTIFY: &str = "flex:justify";
    pub const FLEX_ALIGN: &str = "flex:align";
    pub const FLEX_WRAP: &str = "flex:wrap";

    /// On a caption fragment: `"true"`. On its table: the caption path.
    pub const TABLE_CAPTION: &str = "table:caption";
    /// `header`, `body` or `footer` on section fragments.
    pub const TABLE_SECTION: &str = "table:section";
    /// Row index within its section.
    pub const TABLE_ROW: &str = "table:row";
    /// Column count; its presence marks a table fragment.
    pub const TABLE_COLUMNS: &str = "table:columns";
    pub const TABLE_COLUMN_WIDTH: &str = "table:columnWidth";
    /// `separate` or `collapse`.
    pub const TABLE_BORDER_MODEL: &str = "table:borderModel";
    /// Padding plus border above the table's first child.
    pub const TABLE_FRAME_TOP: &str = "table:frameTop";

    pub const KEEP_TOGETHER: &str = "pagination:keepTogether";
    pub const KEEP_WITH_NEXT: &str = "pagination:keepWithNext";
    pub const BREAK_BEFORE: &str = "pagination:breakBefore";

    /// Set when the fragment came out of a fallback path; value is the reason.
    pub const FALLBACK: &str = "layout:fallback";
    pub const INLINE_LINES: &str = "inline:lines";
    /// Text runs that produced visible text.
    pub const INLINE_RUNS: &str = "inline:runs";
}

/// Block-like or inline-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FragmentKind {
    Block,
    Inline,
}

/// The box a fragment was measured for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSource {
    pub path: String,
    pub node_kind: &'static str,
    pub display: DisplayClass,
}

/// Position of a fragment's border box relative to its parent's content box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// How and under which constraints a fragment was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDiagnostics {
    /// Name of the formatting context that produced the fragment.
    pub context: &'static str,
    pub constraints: LayoutConstraints,
    pub measured_width: f64,
    pub measured_height: f64,
    pub metadata: BTreeMap<String, String>,
}

/// Measured geometry for one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutFragment {
    pub kind: FragmentKind,
    pub source: FragmentSource,
    pub offset: Point,
    /// Border-box width.
    pub width: f64,
    /// Border-box height.
    pub height: f64,
    /// Distance from the top edge to the baseline, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    pub children: Vec<LayoutFragment>,
    pub diagnostics: LayoutDiagnostics,
}

impl LayoutFragment {
    /// A fragment measured by `context` under `constraints`.
    pub fn new(
        kind: FragmentKind,
        source: FragmentSource,
        context: &'static str,
        constraints: LayoutConstraints,
        width: f64,
        height: f64,
    ) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self {
            kind,
            source,
            offset: Point::default(),
            width,
            height,
            baseline: None,
            children: Vec::new(),
            diagnostics: LayoutDiagnostics {
                context,
                constraints,
                measured_width: width,
                measured_height: height,
                metadata: BTreeMap::new(),
            },
        }
    }

    /// A block fragment made up outside of the layout engine, e.g. by a
    /// caller paginating pre-measured content.
    pub fn block(path: &str, width: f64, height: f64) -> Self {
        Self::new(
            FragmentKind::Block,
            FragmentSource {
                path: path.to_string(),
                node_kind: "Block",
                display: DisplayClass::Block,
            },
            "external",
            LayoutConstraints::new(width),
            width,
            height,
        )
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_metadata(key, value);
        self
    }

    pub fn with_children(mut self, children: Vec<LayoutFragment>) -> Self {
        self.children = children;
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Point { x, y };
        self
    }

    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<String>) {
        self.diagnostics
            .metadata
            .insert(key.to_string(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.diagnostics.metadata.get(key).map(String::as_str)
    }

    /// True when `key` is set to `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.metadata(key) == Some("true")
    }

    pub fn path(&self) -> &str {
        &self.source.path
    }

    pub fn keep_together(&self) -> bool {
        self.flag(keys::KEEP_TOGETHER)
    }

    pub fn keep_with_next(&self) -> bool {
        self.flag(keys::KEEP_WITH_NEXT)
    }

    pub fn break_before(&self) -> bool {
        self.flag(keys::BREAK_BEFORE)
    }

    pub fn is_table(&self) -> bool {
        self.metadata(keys::TABLE_COLUMNS).is_some()
    }

    /// Depth-first search by path.
    pub fn find(&self, path: &str) -> Option<&LayoutFragment> {
        if self.source.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sizes_are_clamped() {
        let frag = LayoutFragment::block("Div:0", -5.0, -1.0);
        assert_eq!(frag.width, 0.0);
        assert_eq!(frag.height, 0.0);
        assert_eq!(frag.diagnostics.measured_height, 0.0);
    }

    #[test]
    fn flags_read_metadata() {
        let frag = LayoutFragment::block("Div:0", 10.0, 10.0)
            .with_metadata(keys::KEEP_TOGETHER, "true")
            .with_metadata(keys::KEEP_WITH_NEXT, "false");
        assert!(frag.keep_together());
        assert!(!frag.keep_with_next());
        assert!(!frag.is_table());
    }

    #[test]
    fn find_walks_children() {
        let frag = LayoutFragment::block("Div:0", 10.0, 10.0)
            .with_children(vec![LayoutFragment::block("Div:0/Paragraph:0", 10.0, 5.0)]);
        assert!(frag.find("Div:0/Paragraph:0").is_some());
        assert!(frag.find("Div:0/Paragraph:1").is_none());
    }
}
