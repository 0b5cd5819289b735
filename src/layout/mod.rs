//! # Layout Engine
//!
//! Turns a styled document tree into measured fragments. Nothing here knows
//! about pages; the engine measures, and [`crate::pagination`] decides where
//! the measured content lands.
//!
//! ## How a pass runs
//!
//! 1. Build the [`LayoutBox`] tree: classify every node, compute spacing,
//!    assign stable paths.
//! 2. Resolve each box to a [`FormattingContext`]. Optional contexts (table,
//!    inline-block, flex) that are switched off resolve to the block context
//!    instead, and the pass records why.
//! 3. Dispatch: one function maps the context to its algorithm. Contexts
//!    recurse back through the same dispatch for their children.
//!
//! Disabled contexts are a downgrade, not a failure. Callers read
//! [`LayoutResult::is_fallback`] and [`LayoutResult::is_disabled`] to find
//! out what happened.

pub mod block;
pub mod boxes;
pub mod constraints;
pub mod display;
pub mod flex;
pub mod fragment;
pub mod inline;
pub mod inline_block;
pub mod table;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::model::{DocumentNode, NodeKind};
use crate::style::Display;
use crate::text::{ApproxTextMeasure, InlineStyle, TextMeasure};

pub use boxes::{BoxSpacing, LayoutBox};
pub use constraints::LayoutConstraints;
pub use display::{classify, DisplayClass};
pub use fragment::{keys, FragmentKind, FragmentSource, LayoutDiagnostics, LayoutFragment, Point};

const INLINE_BLOCK_DISABLED: &str = "inline-block formatting context is disabled; laid out as block";
const INLINE_BLOCK_FLATTENED: &str =
    "inline-block formatting context is disabled; content flowed as inline";
const TABLE_DISABLED: &str = "table formatting context is disabled; laid out as block";
const FLEX_DISABLED: &str = "flex formatting context is disabled; laid out as block";

/// How much the engine reports about its own work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticsLevel {
    Off,
    /// One log line per layout pass.
    #[default]
    Summary,
    /// A log line per dispatched box.
    Verbose,
}

/// Feature switches for the optional formatting contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub inline_block: bool,
    pub tables: bool,
    pub table_border_collapse: bool,
    /// The flex context is a preview and off unless asked for.
    pub flex: bool,
    pub diagnostics: DiagnosticsLevel,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            inline_block: true,
            tables: true,
            table_border_collapse: false,
            flex: false,
            diagnostics: DiagnosticsLevel::default(),
        }
    }
}

/// The algorithm that lays out a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattingContext {
    Block,
    Inline,
    InlineBlock,
    Table,
    Flex,
    None,
}

impl FormattingContext {
    pub fn name(&self) -> &'static str {
        match self {
            FormattingContext::Block => "block",
            FormattingContext::Inline => "inline",
            FormattingContext::InlineBlock => "inline-block",
            FormattingContext::Table => "table",
            FormattingContext::Flex => "flex",
            FormattingContext::None => "none",
        }
    }

    /// The context a box asks for, ignoring feature switches.
    pub fn requested(b: &LayoutBox) -> Self {
        match b.display {
            DisplayClass::None => FormattingContext::None,
            DisplayClass::Inline => FormattingContext::Inline,
            DisplayClass::InlineBlock => FormattingContext::InlineBlock,
            DisplayClass::Block => {
                if matches!(b.kind(), NodeKind::Table) {
                    FormattingContext::Table
                } else if b.style().display == Some(Display::Flex) {
                    FormattingContext::Flex
                } else {
                    FormattingContext::Block
                }
            }
        }
    }
}

/// Outcome of a layout pass.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// A fragment was produced for the root.
    pub is_success: bool,
    /// Some box went through the block path because its context is off.
    pub is_fallback: bool,
    /// The root's own context is switched off.
    pub is_disabled: bool,
    pub fallback_reason: Option<String>,
    pub fragments: Vec<LayoutFragment>,
    /// Non-fatal downgrades, such as border-collapse requested while off.
    pub warnings: Vec<String>,
}

/// The main layout engine.
///
/// Holds only immutable configuration, so one engine can serve any number
/// of concurrent layout calls.
pub struct LayoutEngine {
    options: LayoutOptions,
    measure: Arc<dyn TextMeasure>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self::with_measure(options, Arc::new(ApproxTextMeasure::new()))
    }

    /// Use a caller-supplied text measurer.
    pub fn with_measure(options: LayoutOptions, measure: Arc<dyn TextMeasure>) -> Self {
        Self { options, measure }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out the tree rooted at `root`.
    pub fn layout(
        &self,
        root: &DocumentNode,
        constraints: LayoutConstraints,
    ) -> Result<LayoutResult, FolioError> {
        constraints.validate()?;

        let root_box = LayoutBox::build(root);
        let mut pass = LayoutPass::new(&self.options, self.measure.as_ref());

        let requested = FormattingContext::requested(&root_box);
        let fragment = pass.dispatch(&root_box, constraints);
        let is_disabled = requested != FormattingContext::None
            && pass.resolve(&root_box).0 != requested;

        let fallback_reason = if pass.fallbacks.is_empty() {
            None
        } else {
            Some(pass.fallbacks.join("; "))
        };

        if self.options.diagnostics != DiagnosticsLevel::Off {
            log::debug!(
                target: "folio::layout",
                "laid out {} as {}: {} fragment(s), {} fallback(s), {} warning(s)",
                root_box.path,
                requested.name(),
                usize::from(fragment.is_some()),
                pass.fallbacks.len(),
                pass.warnings.len()
            );
        }

        Ok(LayoutResult {
            is_success: fragment.is_some(),
            is_fallback: fallback_reason.is_some(),
            is_disabled,
            fallback_reason,
            fragments: fragment.into_iter().collect(),
            warnings: pass.warnings,
        })
    }
}

/// Mutable state of a single layout call. Never outlives `layout`.
pub(crate) struct LayoutPass<'e> {
    pub(crate) options: &'e LayoutOptions,
    pub(crate) measure: &'e dyn TextMeasure,
    fallbacks: Vec<String>,
    warnings: Vec<String>,
    /// Inline style inherited from enclosing block boxes.
    inline_stack: Vec<InlineStyle>,
}

impl<'e> LayoutPass<'e> {
    fn new(options: &'e LayoutOptions, measure: &'e dyn TextMeasure) -> Self {
        Self {
            options,
            measure,
            fallbacks: Vec::new(),
            warnings: Vec::new(),
            inline_stack: vec![InlineStyle::default()],
        }
    }

    /// The context that will actually run for `b`, and the fallback reason
    /// when that differs from the requested one.
    pub(crate) fn resolve(&self, b: &LayoutBox) -> (FormattingContext, Option<&'static str>) {
        match FormattingContext::requested(b) {
            FormattingContext::InlineBlock if !self.options.inline_block => {
                (FormattingContext::Block, Some(INLINE_BLOCK_DISABLED))
            }
            FormattingContext::Table if !self.options.tables => {
                (FormattingContext::Block, Some(TABLE_DISABLED))
            }
            FormattingContext::Flex if !self.options.flex => {
                (FormattingContext::Block, Some(FLEX_DISABLED))
            }
            other => (other, None),
        }
    }

    pub(crate) fn record_fallback(&mut self, path: &str, reason: &'static str) {
        log::warn!(target: "folio::layout", "{path}: {reason}");
        if !self.fallbacks.iter().any(|r| r == reason) {
            self.fallbacks.push(reason.to_string());
        }
    }

    /// An inline-block met inside inline flow while its context is off.
    pub(crate) fn record_flattened_inline_block(&mut self, path: &str) {
        self.record_fallback(path, INLINE_BLOCK_FLATTENED);
    }

    pub(crate) fn warn(&mut self, message: String) {
        log::warn!(target: "folio::layout", "{message}");
        self.warnings.push(message);
    }

    pub(crate) fn inline_style(&self) -> InlineStyle {
        self.inline_stack.last().cloned().unwrap_or_default()
    }

    /// Run `f` with the inline style of block-level box `b` in effect for
    /// any inline content laid out inside it.
    pub(crate) fn within_block<R>(
        &mut self,
        b: &LayoutBox,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let inherited = self.inline_style().inherit_from_block(b.kind(), b.style());
        self.inline_stack.push(inherited);
        let out = f(self);
        self.inline_stack.pop();
        out
    }

    /// Lay out one box with the context it resolves to. Returns `None` for
    /// boxes that generate nothing.
    pub(crate) fn dispatch(
        &mut self,
        b: &LayoutBox,
        constraints: LayoutConstraints,
    ) -> Option<LayoutFragment> {
        let (context, fallback) = self.resolve(b);
        if let Some(reason) = fallback {
            self.record_fallback(&b.path, reason);
        }
        if self.options.diagnostics == DiagnosticsLevel::Verbose {
            log::debug!(target: "folio::layout", "{} -> {}", b.path, context.name());
        }

        let fragment = match context {
            FormattingContext::None => None,
            FormattingContext::Inline => {
                inline::layout(self, &[b], b.path.clone(), b.kind().name(), constraints)
            }
            FormattingContext::Block => {
                Some(self.within_block(b, |pass| block::layout(pass, b, constraints)))
            }
            FormattingContext::InlineBlock => {
                Some(self.within_block(b, |pass| inline_block::layout(pass, b, constraints)))
            }
            FormattingContext::Table => {
                Some(self.within_block(b, |pass| table::layout(pass, b, constraints)))
            }
            FormattingContext::Flex => {
                Some(self.within_block(b, |pass| flex::layout(pass, b, constraints)))
            }
        };

        fragment.map(|mut frag| {
            if let Some(reason) = fallback {
                frag.set_metadata(keys::FALLBACK, reason);
            }
            apply_paging_hints(&mut frag, b);
            frag
        })
    }
}

/// Copy the page-behavior style of a box onto its fragment.
fn apply_paging_hints(frag: &mut LayoutFragment, b: &LayoutBox) {
    let style = b.style();
    if style.keeps_together() {
        frag.set_metadata(keys::KEEP_TOGETHER, "true");
    }
    if style.keeps_with_next() {
        frag.set_metadata(keys::KEEP_WITH_NEXT, "true");
    }
    if style.breaks_before() {
        frag.set_metadata(keys::BREAK_BEFORE, "true");
    }
}

/// The source record for a fragment measured for `b`.
pub(crate) fn source_of(b: &LayoutBox) -> FragmentSource {
    FragmentSource {
        path: b.path.clone(),
        node_kind: b.kind().name(),
        display: b.display,
    }
}
