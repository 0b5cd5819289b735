//! # Text Measurement
//!
//! The inline formatting context does not shape text itself. It calls a
//! [`TextMeasure`] implementation, injected into the layout engine, that
//! flows a run of text into lines of known geometry.
//!
//! [`ApproxTextMeasure`] is the default: greedy line breaking at UAX#14
//! break opportunities with approximate Helvetica-like advance widths. It is
//! good enough for pagination decisions and tests; a renderer with real font
//! metrics should inject its own measurer.

use crate::model::NodeKind;
use crate::style::{Color, FontStyle, Style, TextDecoration};
use unicode_linebreak::{linebreaks, BreakOpportunity};

const DEFAULT_FONT_SIZE: f64 = 12.0;
const DEFAULT_LINE_HEIGHT: f64 = 1.4;

/// Inline style state threaded down through nested inline elements.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
    pub background: Option<Color>,
    pub font_size: f64,
    /// Multiplier of font size.
    pub line_height: f64,
}

impl Default for InlineStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            color: Color::BLACK,
            background: None,
            font_size: DEFAULT_FONT_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl InlineStyle {
    /// The state for a child element: the node's semantics first
    /// (`strong` is bold, `em` is italic), then its explicit style.
    pub fn cascade(&self, kind: &NodeKind, style: &Style) -> InlineStyle {
        let mut next = self.clone();
        match kind {
            NodeKind::Strong => next.bold = true,
            NodeKind::Emphasis => next.italic = true,
            NodeKind::Heading { .. } | NodeKind::TableCell { header: true } => next.bold = true,
            _ => {}
        }
        if let Some(weight) = style.font_weight {
            next.bold = weight >= 600;
        }
        if let Some(font_style) = style.font_style {
            next.italic = matches!(font_style, FontStyle::Italic | FontStyle::Oblique);
        }
        if let Some(decoration) = style.text_decoration {
            next.underline = decoration == TextDecoration::Underline;
        }
        if let Some(color) = style.color {
            next.color = color;
        }
        if let Some(background) = style.background_color {
            next.background = Some(background);
        }
        if let Some(size) = style.font_size {
            next.font_size = size;
        }
        if let Some(line_height) = style.line_height {
            next.line_height = line_height;
        }
        next
    }

    /// The state inline content starts from inside a block-level box.
    /// Backgrounds belong to the block and are not painted behind its text.
    pub fn inherit_from_block(&self, kind: &NodeKind, style: &Style) -> InlineStyle {
        InlineStyle {
            background: self.background,
            ..self.cascade(kind, style)
        }
    }

    /// Height of one line box in points.
    pub fn line_height_pt(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Distance from the top of a line box to the alphabetic baseline.
    pub fn baseline_pt(&self) -> f64 {
        let half_leading = (self.line_height_pt() - self.font_size) / 2.0;
        half_leading + self.font_size * 0.8
    }
}

/// A run of text sharing one inline style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: InlineStyle,
}

/// One flowed line of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowedLine {
    pub text: String,
    pub width: f64,
    pub height: f64,
    /// Offset of the baseline from the top of the line.
    pub baseline: f64,
    /// Width of whitespace trimmed from the end of the line. Content that
    /// continues on the same line starts after it.
    pub trailing_space: f64,
}

/// The result of flowing a run of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowedText {
    pub lines: Vec<FlowedLine>,
}

/// The text measurement capability the inline context depends on.
///
/// `flow` breaks `text` into lines no wider than `max_inline`. The first
/// line starts `first_line_offset` points into a line that already holds
/// content, so it has `max_inline - first_line_offset` available. If the
/// first piece of text does not fit there, the first returned line is empty
/// and the text starts on the next line.
pub trait TextMeasure: Send + Sync {
    fn flow(
        &self,
        text: &str,
        style: &InlineStyle,
        max_inline: f64,
        first_line_offset: f64,
    ) -> FlowedText;
}

/// Greedy line breaker with approximate advance widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl ApproxTextMeasure {
    pub fn new() -> Self {
        Self
    }

    /// Approximate advance width of a character, in points.
    pub fn char_width(&self, ch: char, style: &InlineStyle) -> f64 {
        let em = match ch {
            ' ' | '\u{00A0}' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.25,
            'f' | 't' | 'r' | '(' | ')' | '-' => 0.33,
            'm' | 'w' | 'M' | 'W' | '@' => 0.83,
            c if c.is_ascii_uppercase() => 0.67,
            c if c.is_ascii() => 0.52,
            // CJK and other wide scripts
            _ => 1.0,
        };
        let weight = if style.bold { 1.06 } else { 1.0 };
        em * weight * style.font_size
    }

    fn make_line(&self, chars: &[char], widths: &[f64], style: &InlineStyle) -> FlowedLine {
        let mut end = chars.len();
        while end > 0 && chars[end - 1].is_whitespace() {
            end -= 1;
        }
        FlowedLine {
            text: chars[..end].iter().collect(),
            width: widths[..end].iter().sum(),
            height: style.line_height_pt(),
            baseline: style.baseline_pt(),
            trailing_space: widths[end..].iter().sum(),
        }
    }
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Each entry is the break opportunity *before* that character. Index 0 is
/// always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

impl TextMeasure for ApproxTextMeasure {
    fn flow(
        &self,
        text: &str,
        style: &InlineStyle,
        max_inline: f64,
        first_line_offset: f64,
    ) -> FlowedText {
        if text.is_empty() {
            return FlowedText::default();
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| if is_newline(ch) { 0.0 } else { self.char_width(ch, style) })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines: Vec<FlowedLine> = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        let end = if is_newline(chars[i - 1]) { i - 1 } else { i };
                        lines.push(self.make_line(
                            &chars[line_start..end],
                            &widths[line_start..end],
                            style,
                        ));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => last_break_point = Some(i - 1),
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            let available = if lines.is_empty() {
                max_inline - first_line_offset
            } else {
                max_inline
            };
            let char_width = widths[i];

            // Whitespace may hang past the edge; it is trimmed from the line.
            if line_width + char_width > available && !ch.is_whitespace() {
                match last_break_point {
                    Some(bp) if bp >= line_start => {
                        lines.push(self.make_line(
                            &chars[line_start..=bp],
                            &widths[line_start..=bp],
                            style,
                        ));
                        line_start = bp + 1;
                        line_width = widths[line_start..i].iter().sum();
                    }
                    _ if line_start < i => {
                        // No break opportunity on this line: break mid-word
                        lines.push(self.make_line(
                            &chars[line_start..i],
                            &widths[line_start..i],
                            style,
                        ));
                        line_start = i;
                        line_width = 0.0;
                    }
                    _ if lines.is_empty() && first_line_offset > 0.0 => {
                        // Nothing fits after the content already on the line
                        lines.push(self.make_line(&[], &[], style));
                        line_width = 0.0;
                    }
                    _ => {}
                }
                last_break_point = None;
            }

            line_width += char_width;
        }

        lines.push(self.make_line(&chars[line_start..], &widths[line_start..], style));

        FlowedText { lines }
    }
}
