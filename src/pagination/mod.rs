//! # Pagination
//!
//! Splits measured fragments into fixed-size pages. This is where Folio
//! differs from a browser: layout measures content as one tall column, and
//! this pass decides where each piece lands.
//!
//! The paginator walks the top-level fragments once, in order, with a
//! single page builder that never outlives the call. For each fragment it
//! asks [`page_break::decide_break`] what to do: place it whole, move it
//! to a fresh page, split it at the page boundary, or split a table between
//! its rows.
//!
//! Slices borrow their fragments. A split fragment gets one slice per page
//! it touches, kinds `Start, Continuation*, End`, and the `block_size` of
//! its slices adds up to its height exactly. Pages that hold a piece of a
//! split fragment carry a [`CarryPageLink`] to their neighbors.

pub mod page_break;
pub mod table;

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::FolioError;
use crate::layout::{FragmentKind, LayoutFragment};
use crate::model::Edges;
use page_break::{decide_break, BreakDecision, BreakHints, PageState};

/// Heights within this distance count as equal.
pub(crate) const EPSILON: f64 = 1e-6;

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// A rectangle on the page, in points from the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Page geometry. The content area is the page less its margins and the
/// header and footer bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConstraints {
    pub width: f64,
    pub height: f64,
    pub margin: Edges,
    /// Band reserved above the content area for running headers.
    pub header_height: f64,
    /// Band reserved below the content area for running footers.
    pub footer_height: f64,
}

impl Default for PageConstraints {
    fn default() -> Self {
        Self::from_size(PageSize::A4, Edges::uniform(54.0)) // ~0.75 inch
    }
}

impl PageConstraints {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Edges::default(),
            header_height: 0.0,
            footer_height: 0.0,
        }
    }

    pub fn from_size(size: PageSize, margin: Edges) -> Self {
        let (width, height) = size.dimensions();
        Self {
            margin,
            ..Self::new(width, height)
        }
    }

    pub fn with_margin(mut self, margin: Edges) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_bands(mut self, header_height: f64, footer_height: f64) -> Self {
        self.header_height = header_height;
        self.footer_height = footer_height;
        self
    }

    pub fn content_width(&self) -> f64 {
        self.width - self.margin.horizontal()
    }

    pub fn content_height(&self) -> f64 {
        self.height - self.margin.vertical() - self.header_height - self.footer_height
    }

    pub fn content_bounds(&self) -> Rect {
        Rect {
            x: self.margin.left,
            y: self.margin.top + self.header_height,
            width: self.content_width(),
            height: self.content_height(),
        }
    }

    pub fn validate(&self) -> Result<(), FolioError> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(FolioError::invalid(format!(
                "page dimensions must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        if self.margin.has_negative() {
            return Err(FolioError::invalid("page margins must not be negative"));
        }
        for (band, value) in [("header", self.header_height), ("footer", self.footer_height)] {
            if value.is_nan() || value < 0.0 {
                return Err(FolioError::invalid(format!(
                    "{band} band must not be negative (got {value})"
                )));
            }
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(FolioError::invalid(format!(
                "page content area must be positive (got {}x{})",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }
}

/// Where a slice sits within its fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SliceKind {
    /// The whole fragment.
    Full,
    Start,
    Continuation,
    End,
}

impl SliceKind {
    fn at(first: bool, last: bool) -> Self {
        match (first, last) {
            (true, true) => SliceKind::Full,
            (true, false) => SliceKind::Start,
            (false, true) => SliceKind::End,
            (false, false) => SliceKind::Continuation,
        }
    }
}

/// The part of one fragment that lands on one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSlice<'f> {
    #[serde(rename = "path", serialize_with = "serialize_path")]
    pub fragment: &'f LayoutFragment,
    /// Where the slice is drawn on the page.
    pub bounds: Rect,
    pub kind: SliceKind,
    /// Distance from the top of the fragment to the start of this slice.
    pub source_offset: f64,
    /// How much of the fragment's height this slice covers.
    pub block_size: f64,
    /// A table header drawn again on a continuation page.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FragmentSlice<'f>>,
}

fn serialize_path<S: Serializer>(fragment: &&LayoutFragment, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(fragment.path())
}

impl<'f> FragmentSlice<'f> {
    /// The whole of `fragment`, at `(x, y)`.
    pub fn full(fragment: &'f LayoutFragment, x: f64, y: f64) -> Self {
        Self {
            fragment,
            bounds: Rect {
                x,
                y,
                width: fragment.width,
                height: fragment.height,
            },
            kind: SliceKind::Full,
            source_offset: 0.0,
            block_size: fragment.height,
            repeated: false,
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        self.fragment.path()
    }
}

/// Links a page to its neighbors when a fragment runs across the break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarryPageLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continues_from_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continues_to_page: Option<usize>,
    /// Block size of the carried fragment still owed after this page.
    pub remaining_block_size: f64,
}

/// One laid-out page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFragmentTree<'f> {
    /// 1-based.
    pub page_number: usize,
    pub content_bounds: Rect,
    pub slices: Vec<FragmentSlice<'f>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carry: Option<CarryPageLink>,
}

/// Structured record of what the paginator did, kept when diagnostics are on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PaginationEvent {
    #[serde(rename_all = "camelCase")]
    PageCreated { page_number: usize, slices: usize },
    #[serde(rename_all = "camelCase")]
    FragmentSplit {
        path: String,
        page_number: usize,
        kind: SliceKind,
        block_size: f64,
    },
}

/// The output of pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDocument<'f> {
    pub constraints: PageConstraints,
    /// Never empty.
    pub pages: Vec<PageFragmentTree<'f>>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<PaginationEvent>,
}

impl<'f> PaginatedDocument<'f> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All top-level slices of the fragment at `path`, in page order.
    pub fn slices_of(&self, path: &str) -> Vec<(usize, &FragmentSlice<'f>)> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.slices
                    .iter()
                    .filter(move |s| s.path() == path)
                    .map(move |s| (page.page_number, s))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
    /// Record and log page and split events.
    pub diagnostics: bool,
    /// Draw a table's header section again on every page it continues onto.
    pub repeat_table_headers: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            diagnostics: false,
            repeat_table_headers: true,
        }
    }
}

/// A fragment queued for placement, with its x position in the content box
/// and the break hints in force for it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlowItem<'f> {
    pub fragment: &'f LayoutFragment,
    pub x: f64,
    pub hints: BreakHints,
}

/// Expand plain block containers so that their children take part in page
/// filling on their own. A container is expanded when it is taller than a
/// page, or when something inside it carries a page-break hint. Tables,
/// inline content and keep-together blocks are left whole.
///
/// An expanded container hands its break-before to its first item and its
/// keep-with-next to its last.
pub fn flatten_for_pagination(
    fragments: &[LayoutFragment],
    content_height: f64,
) -> Vec<&LayoutFragment> {
    flatten(fragments, content_height, 0.0)
        .into_iter()
        .map(|item| item.fragment)
        .collect()
}

/// A block stacking its children top to bottom, made by the block context
/// or by a caller.
fn is_plain_container(frag: &LayoutFragment) -> bool {
    frag.kind == FragmentKind::Block
        && matches!(frag.diagnostics.context, "block" | "external")
        && !frag.is_table()
        && !frag.keep_together()
        && !frag.children.is_empty()
}

fn has_hint(frag: &LayoutFragment) -> bool {
    frag.break_before() || frag.keep_with_next() || frag.keep_together()
}

/// A hint sits on some fragment that expanding `frag` would queue.
fn has_nested_hints(frag: &LayoutFragment) -> bool {
    frag.children
        .iter()
        .any(|child| has_hint(child) || (is_plain_container(child) && has_nested_hints(child)))
}

fn expands(frag: &LayoutFragment, content_height: f64) -> bool {
    is_plain_container(frag)
        && (frag.height > content_height + EPSILON || has_nested_hints(frag))
}

fn flatten(fragments: &[LayoutFragment], content_height: f64, x: f64) -> Vec<FlowItem<'_>> {
    let mut result = Vec::new();
    for frag in fragments {
        let fx = x + frag.offset.x;
        if expands(frag, content_height) {
            let own = BreakHints::of(frag);
            let mut items = flatten(&frag.children, content_height, fx);
            if let Some(first) = items.first_mut() {
                first.hints.break_before |= own.break_before;
            }
            if let Some(last) = items.last_mut() {
                last.hints.keep_with_next |= own.keep_with_next;
            }
            result.extend(items);
        } else {
            result.push(FlowItem {
                fragment: frag,
                x: fx,
                hints: BreakHints::of(frag),
            });
        }
    }
    result
}

/// The page being filled. Lives inside a single [`Paginator::paginate`] call.
pub(crate) struct PageBuilder<'f> {
    content: Rect,
    diagnostics: bool,
    pages: Vec<PageFragmentTree<'f>>,
    slices: Vec<FragmentSlice<'f>>,
    remaining: f64,
    continues_from_previous: bool,
    /// Leftover block size when the last slice on this page is split.
    continues_to_next: Option<f64>,
    events: Vec<PaginationEvent>,
}

impl<'f> PageBuilder<'f> {
    fn new(page: &PageConstraints, diagnostics: bool) -> Self {
        let content = page.content_bounds();
        Self {
            content,
            diagnostics,
            pages: Vec::new(),
            slices: Vec::new(),
            remaining: content.height,
            continues_from_previous: false,
            continues_to_next: None,
            events: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> PageState {
        PageState {
            remaining: self.remaining,
            content_height: self.content.height,
            has_content: self.has_content(),
        }
    }

    pub(crate) fn has_content(&self) -> bool {
        !self.slices.is_empty()
    }

    pub(crate) fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Page y of the next slice.
    pub(crate) fn cursor(&self) -> f64 {
        self.content.y + (self.content.height - self.remaining)
    }

    pub(crate) fn content_x(&self) -> f64 {
        self.content.x
    }

    /// Put `slice` at the cursor. It uses `bounds.height` of the page.
    pub(crate) fn push(&mut self, slice: FragmentSlice<'f>) {
        if self.diagnostics && slice.kind != SliceKind::Full {
            let event = PaginationEvent::FragmentSplit {
                path: slice.path().to_string(),
                page_number: self.pages.len() + 1,
                kind: slice.kind,
                block_size: slice.block_size,
            };
            log::debug!(target: "folio::pagination", "{event:?}");
            self.events.push(event);
        }
        self.remaining = (self.remaining - slice.bounds.height).max(0.0);
        self.slices.push(slice);
    }

    /// Finish the current page and start the next one, carrying
    /// `leftover` block size of a split fragment across the break.
    pub(crate) fn carry_over(&mut self, leftover: f64) {
        self.continues_to_next = Some(leftover);
        self.new_page();
        self.continues_from_previous = true;
    }

    pub(crate) fn new_page(&mut self) {
        if !self.slices.is_empty() {
            let page_number = self.pages.len() + 1;
            let carry = if self.continues_from_previous || self.continues_to_next.is_some() {
                Some(CarryPageLink {
                    continues_from_page: self.continues_from_previous.then(|| page_number - 1),
                    continues_to_page: self.continues_to_next.map(|_| page_number + 1),
                    remaining_block_size: self.continues_to_next.unwrap_or(0.0),
                })
            } else {
                None
            };
            if self.diagnostics {
                let event = PaginationEvent::PageCreated {
                    page_number,
                    slices: self.slices.len(),
                };
                log::debug!(target: "folio::pagination", "{event:?}");
                self.events.push(event);
            }
            self.pages.push(PageFragmentTree {
                page_number,
                content_bounds: self.content,
                slices: std::mem::take(&mut self.slices),
                carry,
            });
        }
        self.remaining = self.content.height;
        self.continues_from_previous = false;
        self.continues_to_next = None;
    }

    fn finish(mut self) -> (Vec<PageFragmentTree<'f>>, Vec<PaginationEvent>) {
        self.new_page();
        (self.pages, self.events)
    }
}

/// Assigns fragments to pages.
///
/// Holds only its options, so one paginator can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    options: PaginationOptions,
}

impl Paginator {
    pub fn new(options: PaginationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    /// Lay `fragments` out on pages of `page`'s geometry.
    pub fn paginate<'f>(
        &self,
        fragments: &'f [LayoutFragment],
        page: &PageConstraints,
    ) -> Result<PaginatedDocument<'f>, FolioError> {
        if fragments.is_empty() {
            return Err(FolioError::invalid("no fragments to paginate"));
        }
        page.validate()?;

        let content_height = page.content_height();
        let items = flatten(fragments, content_height, 0.0);

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.fragment.path()) {
                return Err(FolioError::invalid(format!(
                    "duplicate fragment path {}",
                    item.fragment.path()
                )));
            }
        }

        let mut builder = PageBuilder::new(page, self.options.diagnostics);
        let mut warnings = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let frag = item.fragment;
            if item.hints.break_before && builder.has_content() {
                builder.new_page();
            }
            let next = items.get(index + 1).map(|n| n.fragment);

            loop {
                match decide_break(frag, item.hints, next, builder.state())? {
                    BreakDecision::MoveToNextPage => {
                        builder.new_page();
                        continue;
                    }
                    BreakDecision::Place => {
                        let x = builder.content_x() + item.x;
                        let y = builder.cursor();
                        builder.push(FragmentSlice::full(frag, x, y));
                    }
                    BreakDecision::SplitRows => {
                        table::split_table(
                            &mut builder,
                            *item,
                            self.options.repeat_table_headers,
                            &mut warnings,
                        );
                    }
                    BreakDecision::Split => split_by_height(&mut builder, *item),
                }
                break;
            }
        }

        let (pages, events) = builder.finish();

        let placed: HashSet<&str> = pages
            .iter()
            .flat_map(|p| p.slices.iter().map(|s| s.path()))
            .collect();
        for item in &items {
            if !placed.contains(item.fragment.path()) {
                let message = format!("fragment {} was not placed on any page", item.fragment.path());
                log::warn!(target: "folio::pagination", "{message}");
                warnings.push(message);
            }
        }

        log::debug!(
            target: "folio::pagination",
            "paginated {} fragment(s) onto {} page(s)",
            items.len(),
            pages.len()
        );

        Ok(PaginatedDocument {
            constraints: *page,
            pages,
            warnings,
            events,
        })
    }
}

/// Cut `item` at each page boundary it crosses.
fn split_by_height<'f>(builder: &mut PageBuilder<'f>, item: FlowItem<'f>) {
    let frag = item.fragment;
    let total = frag.height;
    let mut offset = 0.0;

    loop {
        let left = total - offset;
        let last = left <= builder.remaining() + EPSILON;
        let take = if last { left } else { builder.remaining() };
        let slice = FragmentSlice {
            fragment: frag,
            bounds: Rect {
                x: builder.content_x() + item.x,
                y: builder.cursor(),
                width: frag.width,
                height: take,
            },
            kind: SliceKind::at(offset == 0.0, last),
            source_offset: offset,
            block_size: take,
            repeated: false,
            children: Vec::new(),
        };
        builder.push(slice);
        if last {
            break;
        }
        offset += take;
        builder.carry_over(total - offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::keys;

    fn block(path: &str, height: f64) -> LayoutFragment {
        LayoutFragment::block(path, 400.0, height)
    }

    /// A page whose content area is exactly `content_height` tall.
    fn page(content_height: f64) -> PageConstraints {
        PageConstraints::new(500.0, content_height)
    }

    fn paginate(fragments: &[LayoutFragment], content_height: f64) -> PaginatedDocument<'_> {
        Paginator::default()
            .paginate(fragments, &page(content_height))
            .unwrap()
    }

    fn page_paths(doc: &PaginatedDocument) -> Vec<Vec<String>> {
        doc.pages
            .iter()
            .map(|p| p.slices.iter().map(|s| s.path().to_string()).collect())
            .collect()
    }

    #[test]
    fn content_area_excludes_margins_and_bands() {
        let page = PageConstraints::new(600.0, 800.0)
            .with_margin(Edges::uniform(50.0))
            .with_bands(20.0, 30.0);
        assert_eq!(page.content_width(), 500.0);
        assert_eq!(page.content_height(), 650.0);
        let bounds = page.content_bounds();
        assert_eq!((bounds.x, bounds.y), (50.0, 70.0));
    }

    #[test]
    fn invalid_pages_are_rejected() {
        let frags = vec![block("A", 10.0)];
        let bad = [
            PageConstraints::new(0.0, 800.0),
            PageConstraints::new(600.0, 800.0).with_margin(Edges {
                top: -1.0,
                ..Default::default()
            }),
            PageConstraints::new(600.0, 800.0).with_bands(-5.0, 0.0),
            PageConstraints::new(600.0, 100.0).with_margin(Edges::uniform(50.0)),
        ];
        for page in bad {
            let err = Paginator::default().paginate(&frags, &page).unwrap_err();
            assert!(matches!(err, FolioError::InvalidInput(_)), "{page:?}");
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = Paginator::default().paginate(&[], &page(500.0)).unwrap_err();
        assert!(matches!(err, FolioError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let frags = vec![block("A", 10.0), block("A", 20.0)];
        let err = Paginator::default().paginate(&frags, &page(500.0)).unwrap_err();
        assert!(matches!(err, FolioError::InvalidInput(_)));
    }

    #[test]
    fn single_fragment_single_page() {
        let frags = vec![LayoutFragment::block("Only", 400.0, 200.0)];
        let doc = paginate(&frags, 700.0);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].page_number, 1);
        assert_eq!(doc.pages[0].slices.len(), 1);
        let slice = &doc.pages[0].slices[0];
        assert_eq!(slice.kind, SliceKind::Full);
        assert!(std::ptr::eq(slice.fragment, &frags[0]));
        assert!(doc.pages[0].carry.is_none());
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn split_slices_sum_to_height() {
        let frags = vec![block("Tall", 1250.0)];
        let doc = paginate(&frags, 500.0);
        assert_eq!(doc.page_count(), 3);
        let slices = doc.slices_of("Tall");
        let kinds: Vec<_> = slices.iter().map(|(_, s)| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SliceKind::Start, SliceKind::Continuation, SliceKind::End]
        );
        let total: f64 = slices.iter().map(|(_, s)| s.block_size).sum();
        assert_eq!(total, 1250.0);
        let offsets: Vec<f64> = slices.iter().map(|(_, s)| s.source_offset).collect();
        assert_eq!(offsets, vec![0.0, 500.0, 1000.0]);
    }

    #[test]
    fn split_starts_below_existing_content() {
        let frags = vec![block("A", 300.0), block("B", 400.0)];
        let doc = paginate(&frags, 500.0);
        let b = doc.slices_of("B");
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].1.bounds.y, 300.0);
        assert_eq!(b[0].1.block_size, 200.0);
        assert_eq!(b[1].1.bounds.y, 0.0);
        assert_eq!(b[1].1.block_size, 200.0);
    }

    #[test]
    fn carry_links_point_at_neighbors() {
        let frags = vec![block("Tall", 1400.0)];
        let doc = paginate(&frags, 500.0);
        let mut previous = f64::INFINITY;
        for page in &doc.pages {
            let carry = page.carry.unwrap();
            let n = page.page_number;
            if n > 1 {
                assert_eq!(carry.continues_from_page, Some(n - 1));
            } else {
                assert_eq!(carry.continues_from_page, None);
            }
            if n < doc.page_count() {
                assert_eq!(carry.continues_to_page, Some(n + 1));
            } else {
                assert_eq!(carry.continues_to_page, None);
            }
            assert!(carry.remaining_block_size < previous);
            previous = carry.remaining_block_size;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn keep_together_too_tall_is_impossible() {
        let frags = vec![
            block("Small", 10.0),
            block("Huge", 600.0).with_metadata(keys::KEEP_TOGETHER, "true"),
        ];
        let err = Paginator::default().paginate(&frags, &page(500.0)).unwrap_err();
        match err {
            FolioError::PaginationImpossible { path, height, .. } => {
                assert_eq!(path, "Huge");
                assert_eq!(height, 600.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn keep_together_moves_to_next_page() {
        let frags = vec![
            block("A", 400.0),
            block("B", 200.0).with_metadata(keys::KEEP_TOGETHER, "true"),
        ];
        let doc = paginate(&frags, 500.0);
        assert_eq!(page_paths(&doc), vec![vec!["A"], vec!["B"]]);
        assert_eq!(doc.pages[1].slices[0].kind, SliceKind::Full);
    }

    #[test]
    fn keep_with_next_moves_pair_to_new_page() {
        let frags = vec![
            block("intro", 400.0),
            block("keep", 200.0).with_metadata(keys::KEEP_WITH_NEXT, "true"),
            block("next", 260.0),
        ];
        let doc = paginate(&frags, 500.0);
        assert_eq!(page_paths(&doc), vec![vec!["intro"], vec!["keep", "next"]]);
        assert!(doc.pages[1]
            .slices
            .iter()
            .all(|s| s.kind == SliceKind::Full));
    }

    #[test]
    fn break_before_starts_a_new_page() {
        let frags = vec![
            block("A", 100.0).with_metadata(keys::BREAK_BEFORE, "true"),
            block("B", 100.0).with_metadata(keys::BREAK_BEFORE, "true"),
            block("C", 100.0),
        ];
        let doc = paginate(&frags, 500.0);
        assert_eq!(page_paths(&doc), vec![vec!["A"], vec!["B", "C"]]);
    }

    #[test]
    fn oversized_plain_containers_are_flattened() {
        let container = LayoutFragment::block("Doc", 400.0, 900.0).with_children(vec![
            block("Doc/A", 450.0),
            block("Doc/B", 450.0).with_offset(0.0, 450.0),
        ]);
        let frags = vec![container];
        let flat = flatten_for_pagination(&frags, 500.0);
        let paths: Vec<_> = flat.iter().map(|f| f.path()).collect();
        assert_eq!(paths, vec!["Doc/A", "Doc/B"]);

        let doc = paginate(&frags, 500.0);
        assert_eq!(page_paths(&doc), vec![vec!["Doc/A"], vec!["Doc/B"]]);
    }

    #[test]
    fn short_containers_expand_for_nested_hints() {
        let container = LayoutFragment::block("Doc", 400.0, 150.0).with_children(vec![
            block("Doc/A", 100.0),
            block("Doc/B", 50.0)
                .with_offset(0.0, 100.0)
                .with_metadata(keys::BREAK_BEFORE, "true"),
        ]);
        let frags = vec![container];
        let doc = paginate(&frags, 500.0);
        assert_eq!(page_paths(&doc), vec![vec!["Doc/A"], vec!["Doc/B"]]);

        // Without hints a short container stays whole
        let plain = vec![LayoutFragment::block("Doc", 400.0, 150.0)
            .with_children(vec![block("Doc/A", 100.0), block("Doc/B", 50.0)])];
        assert_eq!(page_paths(&paginate(&plain, 500.0)), vec![vec!["Doc"]]);
    }

    #[test]
    fn expanded_container_hands_down_break_before() {
        let section = LayoutFragment::block("Doc/S", 400.0, 600.0)
            .with_metadata(keys::BREAK_BEFORE, "true")
            .with_children(vec![
                block("Doc/S/A", 300.0),
                block("Doc/S/B", 300.0).with_offset(0.0, 300.0),
            ]);
        let root = LayoutFragment::block("Doc", 400.0, 700.0)
            .with_children(vec![block("Doc/X", 100.0), section.with_offset(0.0, 100.0)]);
        let frags = vec![root];
        let doc = paginate(&frags, 500.0);
        let pages = page_paths(&doc);
        assert_eq!(pages[0], vec!["Doc/X"]);
        assert_eq!(pages[1][0], "Doc/S/A");
    }

    #[test]
    fn expanded_container_hands_down_keep_with_next() {
        let section = LayoutFragment::block("Doc/S", 400.0, 600.0)
            .with_metadata(keys::KEEP_WITH_NEXT, "true")
            .with_children(vec![
                block("Doc/S/A", 300.0),
                block("Doc/S/B", 300.0).with_offset(0.0, 300.0),
            ]);
        let root = LayoutFragment::block("Doc", 400.0, 850.0).with_children(vec![
            block("Doc/X", 100.0),
            section.with_offset(0.0, 100.0),
            block("Doc/Y", 150.0).with_offset(0.0, 700.0),
        ]);
        let frags = vec![root];
        let doc = paginate(&frags, 500.0);
        assert_eq!(
            page_paths(&doc),
            vec![vec!["Doc/X", "Doc/S/A"], vec!["Doc/S/B", "Doc/Y"]]
        );
    }

    #[test]
    fn diagnostics_record_events() {
        let frags = vec![block("Tall", 800.0)];
        let doc = Paginator::new(PaginationOptions {
            diagnostics: true,
            ..Default::default()
        })
        .paginate(&frags, &page(500.0))
        .unwrap();
        let created = doc
            .events
            .iter()
            .filter(|e| matches!(e, PaginationEvent::PageCreated { .. }))
            .count();
        let splits = doc
            .events
            .iter()
            .filter(|e| matches!(e, PaginationEvent::FragmentSplit { .. }))
            .count();
        assert_eq!(created, 2);
        assert_eq!(splits, 2);

        assert!(paginate(&frags, 500.0).events.is_empty());
    }

    #[test]
    fn slices_are_offset_into_the_content_area() {
        let frags = vec![block("A", 100.0), block("B", 50.0)];
        let page = PageConstraints::new(600.0, 800.0)
            .with_margin(Edges::uniform(40.0))
            .with_bands(10.0, 0.0);
        let doc = Paginator::default().paginate(&frags, &page).unwrap();
        let b = &doc.pages[0].slices[1];
        assert_eq!(b.bounds.x, 40.0);
        assert_eq!(b.bounds.y, 40.0 + 10.0 + 100.0);
    }
}
