//! # Block Formatting Context
//!
//! Stacks children top to bottom. Runs of consecutive inline-level children
//! are wrapped in an anonymous inline fragment so text flows as one
//! paragraph instead of one fragment per text node.

use super::boxes::LayoutBox;
use super::constraints::LayoutConstraints;
use super::fragment::{FragmentKind, LayoutFragment, Point};
use super::{inline, source_of, FormattingContext, LayoutPass};
use crate::model::Edges;

/// Children laid out in block direction.
#[derive(Debug, Default)]
pub(crate) struct Stacked {
    pub fragments: Vec<LayoutFragment>,
    /// Widest child margin box.
    pub width: f64,
    /// Sum of child margin boxes.
    pub height: f64,
}

impl Stacked {
    fn place(&mut self, mut frag: LayoutFragment, margin: &Edges) {
        frag.offset = Point {
            x: margin.left,
            y: self.height + margin.top,
        };
        self.height += margin.vertical() + frag.height;
        self.width = self.width.max(margin.horizontal() + frag.width);
        self.fragments.push(frag);
    }
}

/// Border-box width available to `b`, and whether it was set explicitly.
pub(crate) fn available_width(b: &LayoutBox, constraints: &LayoutConstraints) -> (f64, bool) {
    let style = b.style();
    let containing = constraints.inline_max;
    let outer_max = (containing - b.spacing.margin.horizontal()).max(0.0);
    let max_width = style
        .max_width
        .and_then(|d| d.resolve(containing))
        .unwrap_or(f64::INFINITY);
    let min_width = style
        .min_width
        .and_then(|d| d.resolve(containing))
        .unwrap_or(0.0);

    match style.width.and_then(|d| d.resolve(containing)) {
        Some(w) => (w.min(max_width).max(min_width).min(outer_max), true),
        None => (outer_max.min(max_width), false),
    }
}

/// Border-box height: explicit height if any, else `content + frame`,
/// then the style's min/max and the constraints' block range.
pub(crate) fn resolve_height(
    b: &LayoutBox,
    constraints: &LayoutConstraints,
    content_height: f64,
) -> f64 {
    let style = b.style();
    let containing = constraints.block_max;
    let natural = content_height + b.spacing.frame().vertical();
    let height = style
        .height
        .and_then(|d| d.resolve(containing))
        .unwrap_or(natural);
    let min_height = style
        .min_height
        .and_then(|d| d.resolve(containing))
        .unwrap_or(0.0);
    let max_height = style
        .max_height
        .and_then(|d| d.resolve(containing))
        .unwrap_or(f64::INFINITY);
    let block_max = (constraints.block_max - b.spacing.margin.vertical()).max(0.0);
    height
        .max(min_height)
        .min(max_height)
        .max(constraints.block_min)
        .min(block_max)
}

/// Constraints for the content box of `b`, given its border-box width.
pub(crate) fn content_constraints(
    b: &LayoutBox,
    constraints: &LayoutConstraints,
    border_box_width: f64,
) -> LayoutConstraints {
    let frame = b.spacing.frame();
    let inner = (border_box_width - frame.horizontal()).max(0.0);
    constraints
        .narrow(&b.spacing.margin, &frame)
        .with_inline_range(0.0, inner)
}

/// Lay out the visible children of `parent` top to bottom.
pub(crate) fn stack_children(
    pass: &mut LayoutPass,
    parent: &LayoutBox,
    content: LayoutConstraints,
) -> Stacked {
    let mut stacked = Stacked::default();
    let mut pending: Vec<&LayoutBox> = Vec::new();
    let mut anonymous = 0;

    for child in parent.visible_children() {
        if child.display.is_inline_level() {
            pending.push(child);
            continue;
        }
        flush_inline(pass, parent, &mut pending, &mut anonymous, &content, &mut stacked);

        let remaining = (content.remaining_block - stacked.height).max(0.0);
        if let Some(frag) = pass.dispatch(child, content.with_remaining_block(remaining)) {
            stacked.place(frag, &child.spacing.margin);
        }
    }
    flush_inline(pass, parent, &mut pending, &mut anonymous, &content, &mut stacked);

    stacked
}

fn flush_inline(
    pass: &mut LayoutPass,
    parent: &LayoutBox,
    pending: &mut Vec<&LayoutBox>,
    anonymous: &mut usize,
    content: &LayoutConstraints,
    stacked: &mut Stacked,
) {
    if pending.is_empty() {
        return;
    }
    let path = format!("{}/AnonymousInline:{}", parent.path, anonymous);
    *anonymous += 1;
    let remaining = (content.remaining_block - stacked.height).max(0.0);
    if let Some(frag) = inline::layout(
        pass,
        pending.as_slice(),
        path,
        "AnonymousInline",
        content.with_remaining_block(remaining),
    ) {
        stacked.place(frag, &Edges::default());
    }
    pending.clear();
}

pub(crate) fn layout(
    pass: &mut LayoutPass,
    b: &LayoutBox,
    constraints: LayoutConstraints,
) -> LayoutFragment {
    let (limit, explicit) = available_width(b, &constraints);
    let content = content_constraints(b, &constraints, limit);
    let stacked = stack_children(pass, b, content);

    let frame = b.spacing.frame();
    let width = if explicit {
        limit
    } else {
        (stacked.width + frame.horizontal()).min(limit)
    };
    let width = constraints.clamp_inline(width);
    let height = resolve_height(b, &constraints, stacked.height);

    LayoutFragment::new(
        FragmentKind::Block,
        source_of(b),
        FormattingContext::Block.name(),
        constraints,
        width,
        height,
    )
    .with_children(stacked.fragments)
}
