//! # Inline-Block Formatting Context
//!
//! An atomic box in inline flow whose inside is laid out like a block.
//! Its size is intrinsic: as wide as its widest child, as tall as its
//! children stacked, never collapsing to nothing. It always reports a
//! baseline so the enclosing line can align it.

use super::block::{content_constraints, stack_children};
use super::boxes::LayoutBox;
use super::constraints::LayoutConstraints;
use super::fragment::{FragmentKind, LayoutFragment};
use super::{source_of, FormattingContext, LayoutPass};

/// Size used for an axis with nothing measurable in it.
const DEFAULT_EXTENT: f64 = 8.0;

pub(crate) fn layout(
    pass: &mut LayoutPass,
    b: &LayoutBox,
    constraints: LayoutConstraints,
) -> LayoutFragment {
    let style = b.style();
    let frame = b.spacing.frame();
    let margin = b.spacing.margin;
    let inline_max = (constraints.inline_max - margin.horizontal()).max(0.0);
    let explicit_width = style.width.and_then(|d| d.resolve(constraints.inline_max));
    let explicit_height = style.height.and_then(|d| d.resolve(constraints.block_max));

    let outer = explicit_width.unwrap_or(inline_max).min(inline_max);
    let content = content_constraints(b, &constraints, outer);
    let stacked = stack_children(pass, b, content);

    let width = match explicit_width {
        Some(w) => w,
        None if stacked.width > 0.0 => stacked.width + frame.horizontal(),
        None => DEFAULT_EXTENT,
    };
    let width = width.max(constraints.inline_min).min(inline_max);

    let height = match explicit_height {
        Some(h) => h,
        None if stacked.height > 0.0 => stacked.height + frame.vertical(),
        None => DEFAULT_EXTENT,
    };
    let height = constraints.clamp_block(height);

    let baseline = stacked
        .fragments
        .last()
        .and_then(|last| last.baseline.map(|bl| last.offset.y + bl + frame.top))
        .unwrap_or(height)
        .min(height);

    LayoutFragment::new(
        FragmentKind::Inline,
        source_of(b),
        FormattingContext::InlineBlock.name(),
        constraints,
        width,
        height,
    )
    .with_baseline(baseline)
    .with_children(stacked.fragments)
}

#[cfg(test)]
mod tests {
    use crate::layout::{LayoutConstraints, LayoutEngine, LayoutFragment, LayoutOptions};
    use crate::model::{DocumentNode, Edges, NodeKind};
    use crate::style::{Dimension, Display, Style};

    fn inline_block(children: Vec<DocumentNode>, style: Style) -> DocumentNode {
        DocumentNode::new(NodeKind::Span)
            .with_children(children)
            .with_style(Style {
                display: Some(Display::InlineBlock),
                ..style
            })
    }

    fn layout(node: &DocumentNode, constraints: LayoutConstraints) -> LayoutFragment {
        LayoutEngine::default()
            .layout(node, constraints)
            .unwrap()
            .fragments
            .remove(0)
    }

    #[test]
    fn baseline_comes_from_last_line_of_text() {
        let node = inline_block(vec![DocumentNode::text("label")], Style::default());
        let frag = layout(&node, LayoutConstraints::new(300.0));
        assert_eq!(frag.diagnostics.context, "inline-block");
        let baseline = frag.baseline.unwrap();
        assert!(baseline > 0.0);
        assert!(baseline <= frag.height);
        assert!(frag.width < 300.0);
    }

    #[test]
    fn empty_box_gets_default_size_and_height_baseline() {
        let node = inline_block(vec![], Style::default());
        let frag = layout(&node, LayoutConstraints::new(300.0));
        assert_eq!(frag.width, 8.0);
        assert_eq!(frag.height, 8.0);
        assert_eq!(frag.baseline, Some(8.0));
    }

    #[test]
    fn width_is_clamped_into_inline_range() {
        let wide = inline_block(
            vec![],
            Style {
                width: Some(Dimension::Pt(500.0)),
                ..Default::default()
            },
        );
        let frag = layout(&wide, LayoutConstraints::new(120.0));
        assert_eq!(frag.width, 120.0);

        let narrow = inline_block(vec![DocumentNode::text("a")], Style::default());
        let frag = layout(
            &narrow,
            LayoutConstraints::new(300.0).with_inline_range(50.0, 300.0),
        );
        assert_eq!(frag.width, 50.0);
    }

    #[test]
    fn height_is_clamped_into_block_range() {
        let tall = inline_block(
            vec![],
            Style {
                height: Some(Dimension::Pt(400.0)),
                ..Default::default()
            },
        );
        let frag = layout(
            &tall,
            LayoutConstraints::new(300.0).with_block_range(0.0, 100.0),
        );
        assert_eq!(frag.height, 100.0);
        assert_eq!(frag.baseline, Some(100.0));
    }

    #[test]
    fn padding_shifts_baseline() {
        let plain = inline_block(vec![DocumentNode::text("x")], Style::default());
        let padded = inline_block(
            vec![DocumentNode::text("x")],
            Style {
                padding: Some(Edges::uniform(6.0)),
                ..Default::default()
            },
        );
        let a = layout(&plain, LayoutConstraints::new(300.0));
        let b = layout(&padded, LayoutConstraints::new(300.0));
        assert_eq!(b.baseline.unwrap(), a.baseline.unwrap() + 6.0);
        assert_eq!(b.height, a.height + 12.0);
    }

    #[test]
    fn disabled_context_falls_back_to_block() {
        let node = inline_block(vec![DocumentNode::text("x")], Style::default());
        let result = LayoutEngine::new(LayoutOptions {
            inline_block: false,
            ..Default::default()
        })
        .layout(&node, LayoutConstraints::new(300.0))
        .unwrap();
        assert!(result.is_success);
        assert!(result.is_fallback);
        assert!(result.is_disabled);
        assert_eq!(result.fragments[0].diagnostics.context, "block");
        assert!(result.fragments[0].metadata(crate::layout::keys::FALLBACK).is_some());
    }
}
