//! # Table Pagination
//!
//! Splits a table between rows. The table is cut into units that must not
//! be separated:
//!
//! - the leading unit: the table's top frame, its caption, its header
//!   section and the first body row, so a caption or header never sits on
//!   a page by itself;
//! - one unit per further body row;
//! - the footer section, followed by the table's bottom frame.
//!
//! Units fill pages in order. Every page after the first starts with the
//! header section again, marked `repeated`. The footer is the last unit, so
//! it always lands on the final page of the table. A unit taller than a
//! page is cut at the page boundary, and a warning is raised.

use super::{FlowItem, FragmentSlice, PageBuilder, Rect, SliceKind, EPSILON};
use crate::layout::{keys, LayoutFragment};

/// A piece of one table child: the whole caption or section, or one row of
/// a section. A piece taller than a page is cut, and each part becomes an
/// entry of its own.
#[derive(Debug, Clone, Copy)]
struct Entry<'f> {
    owner: &'f LayoutFragment,
    row: Option<&'f LayoutFragment>,
    /// Offset of this part within `owner`.
    start: f64,
    height: f64,
    /// Height of the whole piece.
    full: f64,
    /// How much of the piece lies above this part.
    cut: f64,
}

impl<'f> Entry<'f> {
    fn is_whole(&self) -> bool {
        self.cut <= EPSILON && self.height >= self.full - EPSILON
    }

    /// The part of this piece between `from` and `to`, measured from its top.
    fn clip(&self, from: f64, to: f64) -> Option<Self> {
        let cut = from.max(0.0);
        let end = to.min(self.full);
        if end - cut <= EPSILON {
            return None;
        }
        Some(Entry {
            start: self.start + cut,
            height: end - cut,
            cut,
            ..*self
        })
    }
}

#[derive(Debug, Default)]
struct Unit<'f> {
    entries: Vec<Entry<'f>>,
    /// Space above the first entry.
    lead: f64,
    height: f64,
}

impl<'f> Unit<'f> {
    fn push(&mut self, entry: Entry<'f>) {
        self.height += entry.height;
        self.entries.push(entry);
    }

    /// Entries cut to the band `from..to` of this unit.
    fn band(&self, from: f64, to: f64) -> Vec<Entry<'f>> {
        let mut top = self.lead;
        let mut parts = Vec::new();
        for entry in &self.entries {
            parts.extend(entry.clip(from - top, to - top));
            top += entry.full;
        }
        parts
    }
}

fn section_role(frag: &LayoutFragment) -> Option<&str> {
    frag.metadata(keys::TABLE_SECTION)
}

fn whole(owner: &LayoutFragment) -> Entry<'_> {
    Entry {
        owner,
        row: None,
        start: 0.0,
        height: owner.height,
        full: owner.height,
        cut: 0.0,
    }
}

/// Row pieces of a section. Each row's piece runs from its own top to the
/// next row's top, so spacing between rows is accounted for and the pieces
/// add up to the section's height.
fn row_entries(section: &LayoutFragment) -> Vec<Entry<'_>> {
    let rows = &section.children;
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let start = if i == 0 { 0.0 } else { row.offset.y };
            let end = rows
                .get(i + 1)
                .map_or(section.height, |next| next.offset.y);
            let height = (end - start).max(0.0);
            Entry {
                owner: section,
                row: Some(row),
                start,
                height,
                full: height,
                cut: 0.0,
            }
        })
        .collect()
}

fn frame_top(table: &LayoutFragment) -> f64 {
    table
        .metadata(keys::TABLE_FRAME_TOP)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

fn units(table: &LayoutFragment) -> Vec<Unit<'_>> {
    let frame_top = frame_top(table);
    let inner: f64 = table.children.iter().map(|c| c.height).sum();
    let frame_bottom = (table.height - frame_top - inner).max(0.0);

    let mut leading = Unit {
        entries: Vec::new(),
        lead: frame_top,
        height: frame_top,
    };
    let mut leading_open = true;
    let mut units = Vec::new();

    for child in &table.children {
        let is_body_rows = !child.flag(keys::TABLE_CAPTION)
            && !matches!(section_role(child), Some("header") | Some("footer"))
            && !child.children.is_empty();

        if !is_body_rows {
            if leading_open && section_role(child) != Some("footer") {
                leading.push(whole(child));
            } else {
                if leading_open {
                    units.push(std::mem::take(&mut leading));
                    leading_open = false;
                }
                let mut unit = Unit::default();
                unit.push(whole(child));
                units.push(unit);
            }
            continue;
        }

        for entry in row_entries(child) {
            if leading_open {
                leading.push(entry);
                units.push(std::mem::take(&mut leading));
                leading_open = false;
            } else {
                let mut unit = Unit::default();
                unit.push(entry);
                units.push(unit);
            }
        }
    }
    if leading_open {
        units.push(leading);
    }
    if let Some(last) = units.last_mut() {
        last.height += frame_bottom;
    }
    units
}

/// A slice for an owner whole, with all of its rows as children.
fn full_with_rows<'f>(owner: &'f LayoutFragment, x: f64, y: f64, repeated: bool) -> FragmentSlice<'f> {
    let mut slice = FragmentSlice::full(owner, x, y);
    slice.repeated = repeated;
    slice.children = owner
        .children
        .iter()
        .map(|row| {
            let mut child = FragmentSlice::full(row, x + row.offset.x, y + row.offset.y);
            child.repeated = repeated;
            child
        })
        .collect();
    slice
}

/// The visible part of `row` within `entry`. `origin` is the page y of
/// the top of the row's section.
fn row_slice<'f>(
    row: &'f LayoutFragment,
    entry: &Entry<'f>,
    x: f64,
    origin: f64,
) -> Option<FragmentSlice<'f>> {
    let top = row.offset.y;
    let from = entry.start.max(top);
    let to = (entry.start + entry.height).min(top + row.height);
    // Only the spacing around the row is on this page
    if to - from <= EPSILON && !entry.is_whole() {
        return None;
    }
    let block_size = (to - from).max(0.0);
    Some(FragmentSlice {
        fragment: row,
        bounds: Rect {
            x: x + row.offset.x,
            y: origin + from,
            width: row.width,
            height: block_size,
        },
        kind: SliceKind::at(from <= top + EPSILON, to >= top + row.height - EPSILON),
        source_offset: from - top,
        block_size,
        repeated: false,
        children: Vec::new(),
    })
}

/// Slices for the entries of one page, grouped by owner.
fn entry_slices<'f>(entries: &[Entry<'f>], x: f64, mut y: f64) -> Vec<FragmentSlice<'f>> {
    let mut slices = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let owner = entries[i].owner;
        let mut j = i;
        while j < entries.len() && std::ptr::eq(entries[j].owner, owner) {
            j += 1;
        }
        let group = &entries[i..j];
        let ox = x + owner.offset.x;

        if group[0].row.is_none() {
            // A caption or a header/footer section, taken as one piece
            let entry = &group[0];
            if entry.is_whole() {
                slices.push(full_with_rows(owner, ox, y, false));
                y += owner.height;
            } else {
                slices.push(FragmentSlice {
                    fragment: owner,
                    bounds: Rect {
                        x: ox,
                        y,
                        width: owner.width,
                        height: entry.height,
                    },
                    kind: SliceKind::at(
                        entry.cut <= EPSILON,
                        entry.cut + entry.height >= entry.full - EPSILON,
                    ),
                    source_offset: entry.cut,
                    block_size: entry.height,
                    repeated: false,
                    children: Vec::new(),
                });
                y += entry.height;
            }
        } else {
            let start = group[0].start;
            let block_size: f64 = group.iter().map(|e| e.height).sum();
            let last = &group[group.len() - 1];
            let at_end = last.start + last.height >= owner.height - EPSILON;
            let rows = group
                .iter()
                .filter_map(|e| e.row.and_then(|row| row_slice(row, e, ox, y - start)))
                .collect();
            slices.push(FragmentSlice {
                fragment: owner,
                bounds: Rect {
                    x: ox,
                    y,
                    width: owner.width,
                    height: block_size,
                },
                kind: SliceKind::at(start <= EPSILON, at_end),
                source_offset: start,
                block_size,
                repeated: false,
                children: rows,
            });
            y += block_size;
        }
        i = j;
    }
    slices
}

/// How far the split of one table has got.
struct Progress<'f> {
    /// Entries waiting for the current page.
    entries: Vec<Entry<'f>>,
    used: f64,
    units: usize,
    /// Table height emitted on earlier pages.
    offset: f64,
    first_page: bool,
}

impl<'f> Progress<'f> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            used: 0.0,
            units: 0,
            offset: 0.0,
            first_page: true,
        }
    }

    fn is_empty(&self) -> bool {
        self.units == 0
    }

    fn add(&mut self, entries: impl IntoIterator<Item = Entry<'f>>, height: f64) {
        self.entries.extend(entries);
        self.used += height;
        self.units += 1;
    }
}

/// What stays the same on every page of one table.
struct TableSplit<'f> {
    table: &'f LayoutFragment,
    /// x of the table within the content area.
    x: f64,
    /// Header section to repeat on continuation pages.
    header: Option<&'f LayoutFragment>,
    frame_top: f64,
}

impl<'f> TableSplit<'f> {
    fn repeated_height(&self, first_page: bool) -> f64 {
        match self.header {
            Some(header) if !first_page => header.height,
            _ => 0.0,
        }
    }

    /// Room left for table rows on the current page.
    fn room(&self, builder: &PageBuilder<'f>, progress: &Progress<'f>) -> f64 {
        builder.remaining() - self.repeated_height(progress.first_page) - progress.used
    }

    fn emit(
        &self,
        builder: &mut PageBuilder<'f>,
        progress: &Progress<'f>,
        last_page: bool,
        block_size: f64,
    ) {
        let first_page = progress.first_page;
        let x = builder.content_x() + self.x;
        let top = builder.cursor();
        let mut y = top;
        let mut children = Vec::new();

        if first_page {
            y += self.frame_top;
        } else if let Some(header) = self.header {
            children.push(full_with_rows(header, x + header.offset.x, y, true));
            y += header.height;
        }
        children.extend(entry_slices(&progress.entries, x, y));

        builder.push(FragmentSlice {
            fragment: self.table,
            bounds: Rect {
                x,
                y: top,
                width: self.table.width,
                height: block_size + self.repeated_height(first_page),
            },
            kind: SliceKind::at(first_page, last_page),
            source_offset: progress.offset,
            block_size,
            repeated: false,
            children,
        });
    }

    /// Close the current page of the table and move to the next one.
    fn flush(&self, builder: &mut PageBuilder<'f>, progress: &mut Progress<'f>) {
        let block_size = progress.used;
        self.emit(builder, progress, false, block_size);
        let offset = progress.offset + block_size;
        builder.carry_over(self.table.height - offset);
        *progress = Progress {
            offset,
            first_page: false,
            ..Progress::new()
        };
    }
}

/// Split the table in `item` between rows across as many pages as needed.
/// A unit taller than a page is cut at the page boundary.
pub(crate) fn split_table<'f>(
    builder: &mut PageBuilder<'f>,
    item: FlowItem<'f>,
    repeat_headers: bool,
    warnings: &mut Vec<String>,
) {
    let table = item.fragment;
    let split = TableSplit {
        table,
        x: item.x,
        header: table
            .children
            .iter()
            .find(|c| section_role(c) == Some("header"))
            .filter(|_| repeat_headers),
        frame_top: frame_top(table),
    };
    let units = units(table);

    if let Some(first) = units.first() {
        if first.height > builder.remaining() + EPSILON && builder.has_content() {
            builder.new_page();
        }
    }

    let mut progress = Progress::new();

    for (index, unit) in units.iter().enumerate() {
        if unit.height > split.room(builder, &progress) + EPSILON && !progress.is_empty() {
            split.flush(builder, &mut progress);
        }
        if unit.height <= split.room(builder, &progress) + EPSILON {
            progress.add(unit.entries.iter().copied(), unit.height);
            continue;
        }

        let message = format!(
            "{}: table unit {} is taller than a page; cut at the page boundary",
            table.path(),
            index
        );
        log::warn!(target: "folio::pagination", "{message}");
        warnings.push(message);

        let mut cut = 0.0;
        loop {
            let room = split.room(builder, &progress);
            let left = unit.height - cut;
            // A repeated header can leave no room at all; overflow then
            let take = if room > EPSILON { left.min(room) } else { left };
            progress.add(unit.band(cut, cut + take), take);
            cut += take;
            if cut >= unit.height - EPSILON {
                break;
            }
            split.flush(builder, &mut progress);
        }
    }

    split.emit(builder, &progress, true, table.height - progress.offset);
}
