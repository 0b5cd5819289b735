//! # Flex Formatting Context
//!
//! A preview: single row, no wrapping, no grow or shrink. Every child gets
//! an equal share of the container's inline size and is placed left to
//! right. The requested direction, justification, alignment and wrap mode
//! are recorded as metadata so a renderer can see what was asked for, even
//! though only the default row/flex-start/stretch/nowrap behavior runs.

use super::boxes::LayoutBox;
use super::constraints::LayoutConstraints;
use super::fragment::{keys, FragmentKind, LayoutFragment, Point};
use super::{source_of, FormattingContext, LayoutPass};

/// Height counted for a child that measures zero.
pub const MIN_CHILD_HEIGHT: f64 = 16.0;

pub(crate) fn layout(
    pass: &mut LayoutPass,
    b: &LayoutBox,
    constraints: LayoutConstraints,
) -> LayoutFragment {
    let style = b.style();
    let frame = b.spacing.frame();
    let margin = b.spacing.margin;

    let outer = (constraints.inline_max - margin.horizontal()).max(0.0);
    let width = style
        .width
        .and_then(|d| d.resolve(constraints.inline_max))
        .map_or(outer, |w| w.min(outer));
    let width = constraints.clamp_inline(width);
    let content_width = (width - frame.horizontal()).max(0.0);

    let items: Vec<&LayoutBox> = b.visible_children().collect();
    let share = if items.is_empty() {
        0.0
    } else {
        content_width / items.len() as f64
    };

    let mut children = Vec::with_capacity(items.len());
    let mut content_height = 0.0;
    for (index, item) in items.iter().enumerate() {
        let child_constraints = LayoutConstraints::new(share);
        let height = match pass.dispatch(item, child_constraints) {
            Some(mut frag) => {
                frag.offset = Point {
                    x: index as f64 * share + item.spacing.margin.left,
                    y: item.spacing.margin.top,
                };
                let h = frag.height;
                children.push(frag);
                h
            }
            None => 0.0,
        };
        content_height += if height > 0.0 {
            height
        } else {
            MIN_CHILD_HEIGHT
        };
    }

    let height = constraints.clamp_block(content_height + frame.vertical());

    LayoutFragment::new(
        FragmentKind::Block,
        source_of(b),
        FormattingContext::Flex.name(),
        constraints,
        width,
        height,
    )
    .with_children(children)
    .with_metadata(
        keys::FLEX_DIRECTION,
        style.flex_direction.unwrap_or_default().as_str(),
    )
    .with_metadata(
        keys::FLEX_JUSTIFY,
        style.justify_content.unwrap_or_default().as_str(),
    )
    .with_metadata(keys::FLEX_ALIGN, style.align_items.unwrap_or_default().as_str())
    .with_metadata(keys::FLEX_WRAP, style.flex_wrap.unwrap_or_default().as_str())
}
