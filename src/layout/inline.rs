//! # Inline Formatting Context
//!
//! Walks a run of inline-level boxes, threading an [`InlineStyle`] down
//! through nested phrasing elements, and collects three kinds of item:
//! styled text runs, forced line breaks, and atomic boxes (inline-blocks,
//! or blocks nested inside inline content). Text is flowed by the injected
//! [`crate::text::TextMeasure`]; atomic boxes sit on the line like a wide
//! glyph and wrap when they do not fit.
//!
//! The whole run becomes a single fragment. Atomic boxes become its
//! children; text has no fragment of its own.

use super::boxes::LayoutBox;
use super::constraints::LayoutConstraints;
use super::display::DisplayClass;
use super::fragment::{keys, FragmentKind, FragmentSource, LayoutFragment, Point};
use super::{FormattingContext, LayoutPass};
use crate::model::{Edges, NodeKind};
use crate::text::{InlineStyle, TextRun};

enum InlineItem {
    Text(TextRun),
    /// `br`: ends the line, or makes an empty one of the given style.
    Break(InlineStyle),
    /// Ends the current line only if it has content.
    SoftBreak,
    Atomic(LayoutFragment, Edges),
}

/// A finished line box.
#[derive(Debug, Clone, Copy)]
struct LineBox {
    width: f64,
    height: f64,
    baseline: f64,
}

/// The line currently being filled.
#[derive(Default)]
struct OpenLine {
    pen: f64,
    /// Trailing whitespace after the pen that is dropped if the line ends.
    hang: f64,
    height: f64,
    baseline: f64,
    descent: f64,
    has_content: bool,
}

impl OpenLine {
    fn close(&mut self, lines: &mut Vec<LineBox>) {
        lines.push(LineBox {
            width: self.pen,
            height: self.height,
            baseline: self.baseline,
        });
        *self = OpenLine::default();
    }

    /// Add an item of `height` whose baseline sits `baseline` below its top.
    fn grow(&mut self, height: f64, baseline: f64) {
        self.baseline = self.baseline.max(baseline);
        self.descent = self.descent.max(height - baseline);
        self.height = self.height.max(self.baseline + self.descent);
        self.has_content = true;
    }
}

/// Lay out `boxes` as one run of inline content. Returns `None` when the
/// run has nothing to show (only hidden nodes or collapsible whitespace).
pub(crate) fn layout(
    pass: &mut LayoutPass,
    boxes: &[&LayoutBox],
    path: String,
    node_kind: &'static str,
    constraints: LayoutConstraints,
) -> Option<LayoutFragment> {
    let base = pass.inline_style();
    let mut items = Vec::new();
    for b in boxes {
        collect(pass, b, &base, &constraints, &mut items);
    }

    let max_inline = constraints.inline_max;
    let mut lines: Vec<LineBox> = Vec::new();
    let mut line = OpenLine::default();
    // (fragment, margin, line index, x)
    let mut atomics: Vec<(LayoutFragment, Edges, usize, f64)> = Vec::new();
    let mut runs = 0;

    for item in items {
        match item {
            InlineItem::Text(run) => {
                let text = if line.has_content {
                    run.text.as_str()
                } else {
                    run.text.trim_start()
                };
                if text.is_empty() {
                    continue;
                }
                runs += 1;
                let offset = if line.has_content {
                    line.pen + line.hang
                } else {
                    0.0
                };
                let flowed = pass.measure.flow(text, &run.style, max_inline, offset);
                for (k, flowed_line) in flowed.lines.iter().enumerate() {
                    if k > 0 {
                        line.close(&mut lines);
                    }
                    if flowed_line.text.is_empty() {
                        continue;
                    }
                    let start = if line.has_content {
                        line.pen + line.hang
                    } else {
                        0.0
                    };
                    line.pen = start + flowed_line.width;
                    line.hang = flowed_line.trailing_space;
                    line.grow(flowed_line.height, flowed_line.baseline);
                }
            }
            InlineItem::Break(style) => {
                if !line.has_content {
                    line.grow(style.line_height_pt(), style.baseline_pt());
                }
                line.close(&mut lines);
            }
            InlineItem::SoftBreak => {
                if line.has_content {
                    line.close(&mut lines);
                }
            }
            InlineItem::Atomic(frag, margin) => {
                let outer = margin.horizontal() + frag.width;
                let start = if line.has_content {
                    line.pen + line.hang
                } else {
                    0.0
                };
                if line.has_content && start + outer > max_inline {
                    line.close(&mut lines);
                }
                let x = if line.has_content { start } else { 0.0 };
                let baseline = margin.top + frag.baseline.unwrap_or(frag.height);
                line.grow(margin.vertical() + frag.height, baseline);
                atomics.push((frag, margin, lines.len(), x + margin.left));
                line.pen = x + outer;
                line.hang = 0.0;
            }
        }
    }
    if line.has_content {
        line.close(&mut lines);
    }

    if lines.is_empty() {
        return None;
    }

    let mut line_tops = Vec::with_capacity(lines.len());
    let mut y = 0.0;
    for l in &lines {
        line_tops.push(y);
        y += l.height;
    }

    let children: Vec<LayoutFragment> = atomics
        .into_iter()
        .map(|(mut frag, margin, index, x)| {
            let l = lines[index];
            let own_baseline = margin.top + frag.baseline.unwrap_or(frag.height);
            frag.offset = Point {
                x,
                y: line_tops[index] + (l.baseline - own_baseline) + margin.top,
            };
            frag
        })
        .collect();

    let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
    let width = constraints.clamp_inline(width);
    let first_baseline = lines[0].baseline;
    let line_count = lines.len();

    let mut frag = LayoutFragment::new(
        FragmentKind::Inline,
        FragmentSource {
            path,
            node_kind,
            display: DisplayClass::Inline,
        },
        FormattingContext::Inline.name(),
        constraints,
        width,
        y,
    )
    .with_baseline(first_baseline)
    .with_children(children);
    frag.set_metadata(keys::INLINE_LINES, line_count.to_string());
    frag.set_metadata(keys::INLINE_RUNS, runs.to_string());
    Some(frag)
}

/// Collapse whitespace the way `white-space: normal` does.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn collect(
    pass: &mut LayoutPass,
    b: &LayoutBox,
    style: &InlineStyle,
    constraints: &LayoutConstraints,
    items: &mut Vec<InlineItem>,
) {
    match b.display {
        DisplayClass::None => {}
        DisplayClass::InlineBlock if pass.options.inline_block => {
            if let Some(frag) = pass.dispatch(b, *constraints) {
                items.push(InlineItem::Atomic(frag, b.spacing.margin));
            }
        }
        DisplayClass::Block => {
            // A block inside inline content sits on a line of its own.
            if let Some(frag) = pass.dispatch(b, *constraints) {
                items.push(InlineItem::SoftBreak);
                items.push(InlineItem::Atomic(frag, b.spacing.margin));
                items.push(InlineItem::SoftBreak);
            }
        }
        DisplayClass::InlineBlock | DisplayClass::Inline => {
            if b.display == DisplayClass::InlineBlock {
                pass.record_flattened_inline_block(&b.path);
            }
            let style = style.cascade(b.kind(), b.style());
            match b.kind() {
                NodeKind::Text { content } => items.push(InlineItem::Text(TextRun {
                    text: collapse_whitespace(content),
                    style,
                })),
                NodeKind::LineBreak => items.push(InlineItem::Break(style)),
                _ => {
                    for child in b.visible_children() {
                        collect(pass, child, &style, constraints, items);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{keys, LayoutConstraints, LayoutEngine, LayoutFragment, LayoutOptions};
    use crate::model::{DocumentNode, NodeKind};
    use crate::style::{Dimension, Display, Style};

    fn layout_with(options: LayoutOptions, node: &DocumentNode, width: f64) -> LayoutFragment {
        LayoutEngine::new(options)
            .layout(node, LayoutConstraints::new(width))
            .unwrap()
            .fragments
            .remove(0)
    }

    fn inline_of(para: &LayoutFragment) -> &LayoutFragment {
        &para.children[0]
    }

    fn lines(frag: &LayoutFragment) -> usize {
        frag.metadata(keys::INLINE_LINES).unwrap().parse().unwrap()
    }

    #[test]
    fn text_wraps_within_inline_max() {
        let para = DocumentNode::paragraph("the quick brown fox jumps over the lazy dog");
        let frag = layout_with(LayoutOptions::default(), &para, 80.0);
        let run = inline_of(&frag);
        assert!(lines(run) > 1);
        assert!(run.width <= 80.0);
        assert!(run.baseline.unwrap() > 0.0);
    }

    #[test]
    fn line_breaks_start_new_lines() {
        let para = DocumentNode::new(NodeKind::Paragraph).with_children(vec![
            DocumentNode::text("one"),
            DocumentNode::new(NodeKind::LineBreak),
            DocumentNode::text("two"),
        ]);
        let frag = layout_with(LayoutOptions::default(), &para, 400.0);
        assert_eq!(lines(inline_of(&frag)), 2);
    }

    #[test]
    fn hidden_inline_child_is_skipped_but_siblings_flow() {
        let hidden = DocumentNode::new(NodeKind::Span)
            .with_children(vec![DocumentNode::text("a very long hidden sentence indeed")])
            .with_style(Style {
                display: Some(Display::None),
                ..Default::default()
            });
        let with_hidden = DocumentNode::new(NodeKind::Paragraph).with_children(vec![
            DocumentNode::text("shown"),
            hidden,
        ]);
        let without = DocumentNode::paragraph("shown");
        let a = layout_with(LayoutOptions::default(), &with_hidden, 400.0);
        let b = layout_with(LayoutOptions::default(), &without, 400.0);
        assert_eq!(inline_of(&a).width, inline_of(&b).width);
        assert_eq!(a.height, b.height);
    }

    #[test]
    fn inline_blocks_sit_on_the_line() {
        let chip = DocumentNode::new(NodeKind::Span)
            .with_children(vec![DocumentNode::text("chip")])
            .with_style(Style {
                display: Some(Display::InlineBlock),
                ..Default::default()
            });
        let para = DocumentNode::new(NodeKind::Paragraph)
            .with_children(vec![DocumentNode::text("before"), chip, DocumentNode::text("after")]);
        let frag = layout_with(LayoutOptions::default(), &para, 400.0);
        let run = inline_of(&frag);
        assert_eq!(lines(run), 1);
        assert_eq!(run.children.len(), 1);
        assert_eq!(run.children[0].diagnostics.context, "inline-block");
        assert!(run.children[0].offset.x > 0.0);
    }

    #[test]
    fn wide_atomic_wraps_to_next_line() {
        let boxy = DocumentNode::div(vec![]).with_style(Style {
            display: Some(Display::InlineBlock),
            width: Some(Dimension::Pt(90.0)),
            height: Some(Dimension::Pt(30.0)),
            ..Default::default()
        });
        let para = DocumentNode::new(NodeKind::Paragraph)
            .with_children(vec![DocumentNode::text("some text"), boxy]);
        let frag = layout_with(LayoutOptions::default(), &para, 100.0);
        let run = inline_of(&frag);
        assert_eq!(lines(run), 2);
        assert_eq!(run.children[0].offset.x, 0.0);
    }

    #[test]
    fn disabled_inline_block_flows_as_inline() {
        let chip = DocumentNode::new(NodeKind::Span)
            .with_children(vec![DocumentNode::text("chip")])
            .with_style(Style {
                display: Some(Display::InlineBlock),
                ..Default::default()
            });
        let para = DocumentNode::new(NodeKind::Paragraph).with_children(vec![chip]);
        let options = LayoutOptions {
            inline_block: false,
            ..Default::default()
        };
        let result = LayoutEngine::new(options)
            .layout(&para, LayoutConstraints::new(400.0))
            .unwrap();
        assert!(result.is_success);
        assert!(result.is_fallback);
        assert!(!result.is_disabled);
        assert!(result.fallback_reason.unwrap().contains("inline-block"));
        assert!(result.fragments[0].children[0].children.is_empty());
    }

    #[test]
    fn whitespace_only_run_produces_nothing() {
        let div = DocumentNode::div(vec![
            DocumentNode::text("   \n  "),
            DocumentNode::paragraph("x"),
        ]);
        let frag = layout_with(LayoutOptions::default(), &div, 400.0);
        assert_eq!(frag.children.len(), 1);
        assert_eq!(frag.children[0].path(), "Div:0/Paragraph:1");
    }
}
