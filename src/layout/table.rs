//! # Table Formatting Context
//!
//! Uniform-column tables. The column count comes from the first row, every
//! column gets the same width, and that width holds for every row of the
//! table. Nothing is sized from cell content.
//!
//! Output shape, which pagination relies on:
//!
//! ```text
//! Table            table:columns, table:columnWidth, table:borderModel
//! ├── caption      table:caption = "true"        (optional, first)
//! ├── section      table:section = header|body|footer
//! │   └── row      table:row = index within the section
//! │       └── cell
//! └── ...
//! ```
//!
//! Header sections come first and footer sections last, whatever order the
//! document lists them in. Rows placed directly under the table form an
//! implicit body.

use super::block::{available_width, stack_children};
use super::boxes::LayoutBox;
use super::constraints::LayoutConstraints;
use super::display::DisplayClass;
use super::fragment::{keys, FragmentKind, FragmentSource, LayoutFragment, Point};
use super::{source_of, FormattingContext, LayoutPass};
use crate::model::NodeKind;
use crate::style::BorderCollapse;

/// Height a caption occupies, whatever its content measures.
pub const CAPTION_HEIGHT: f64 = 24.0;
/// Height of a cell that does not set one.
pub const DEFAULT_CELL_HEIGHT: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SectionRole {
    Header,
    Body,
    Footer,
}

impl SectionRole {
    fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::TableHeader => SectionRole::Header,
            NodeKind::TableFooter => SectionRole::Footer,
            _ => SectionRole::Body,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SectionRole::Header => "header",
            SectionRole::Body => "body",
            SectionRole::Footer => "footer",
        }
    }
}

/// A section to lay out: an explicit one, or a run of bare rows.
struct SectionPlan<'a, 'doc> {
    role: SectionRole,
    /// The section box; `None` for an implicit body.
    section: Option<&'a LayoutBox<'doc>>,
    path: String,
    rows: Vec<&'a LayoutBox<'doc>>,
}

/// The table's children sorted into caption and sections.
struct TablePlan<'a, 'doc> {
    caption: Option<&'a LayoutBox<'doc>>,
    sections: Vec<SectionPlan<'a, 'doc>>,
    ignored: Vec<&'a LayoutBox<'doc>>,
}

fn is_row(b: &LayoutBox) -> bool {
    matches!(b.kind(), NodeKind::TableRow)
}

fn plan<'a, 'doc>(table: &'a LayoutBox<'doc>) -> TablePlan<'a, 'doc> {
    let mut caption = None;
    let mut sections: Vec<SectionPlan> = Vec::new();
    let mut ignored = Vec::new();
    let mut implicit: Option<SectionPlan> = None;
    let mut implicit_count = 0;
    let mut seen_structure = false;

    for child in table.visible_children() {
        if is_row(child) {
            seen_structure = true;
            let body = implicit.get_or_insert_with(|| {
                let path = format!("{}/ImplicitBody:{}", table.path, implicit_count);
                implicit_count += 1;
                SectionPlan {
                    role: SectionRole::Body,
                    section: None,
                    path,
                    rows: Vec::new(),
                }
            });
            body.rows.push(child);
            continue;
        }
        if let Some(body) = implicit.take() {
            sections.push(body);
        }
        if child.kind().is_table_section() {
            seen_structure = true;
            sections.push(SectionPlan {
                role: SectionRole::of(child.kind()),
                section: Some(child),
                path: child.path.clone(),
                rows: child.visible_children().filter(|r| is_row(r)).collect(),
            });
        } else if caption.is_none() && !seen_structure {
            caption = Some(child);
        } else {
            ignored.push(child);
        }
    }
    if let Some(body) = implicit.take() {
        sections.push(body);
    }
    // Stable: bodies keep their document order.
    sections.sort_by_key(|s| s.role);

    TablePlan {
        caption,
        sections,
        ignored,
    }
}

/// Number of columns: cells in the first row of any section, at least one.
fn column_count(plan: &TablePlan) -> usize {
    plan.sections
        .iter()
        .flat_map(|s| s.rows.first())
        .next()
        .map(|row| row.visible_children().count())
        .unwrap_or(0)
        .max(1)
}

/// Geometry shared by every row of one table.
struct Grid {
    columns: usize,
    column_width: f64,
    spacing: f64,
    content_width: f64,
}

impl Grid {
    fn column_x(&self, index: usize) -> f64 {
        self.spacing + index as f64 * (self.column_width + self.spacing)
    }
}

pub(crate) fn layout(
    pass: &mut LayoutPass,
    b: &LayoutBox,
    constraints: LayoutConstraints,
) -> LayoutFragment {
    let style = b.style();
    let frame = b.spacing.frame();
    let (width, _) = available_width(b, &constraints);
    let width = constraints.clamp_inline(width);
    let content_width = (width - frame.horizontal()).max(0.0);

    let wants_collapse = style.border_collapse == Some(BorderCollapse::Collapse);
    let collapse = wants_collapse && pass.options.table_border_collapse;
    if wants_collapse && !collapse {
        pass.warn(format!(
            "{}: border-collapse is disabled; using separate borders",
            b.path
        ));
    }
    let spacing = if collapse {
        0.0
    } else {
        style.border_spacing.unwrap_or(0.0).max(0.0)
    };

    let plan = plan(b);
    for skipped in &plan.ignored {
        log::debug!(
            target: "folio::layout",
            "{}: {} is not part of the table structure; ignored",
            b.path,
            skipped.path
        );
    }

    let columns = column_count(&plan);
    let grid = Grid {
        columns,
        column_width: ((content_width - spacing * (columns as f64 + 1.0)) / columns as f64)
            .max(0.0),
        spacing,
        content_width,
    };

    let mut children = Vec::new();
    let mut y = 0.0;

    if let Some(caption) = plan.caption {
        if let Some(mut frag) = pass.dispatch(caption, LayoutConstraints::new(content_width)) {
            frag.height = CAPTION_HEIGHT;
            frag.offset = Point { x: 0.0, y };
            frag.set_metadata(keys::TABLE_CAPTION, "true");
            y += CAPTION_HEIGHT;
            children.push(frag);
        }
    }

    for section in &plan.sections {
        let mut frag = match section.section {
            Some(owner) => pass.within_block(owner, |pass| layout_section(pass, section, &grid)),
            None => layout_section(pass, section, &grid),
        };
        frag.offset = Point { x: 0.0, y };
        y += frag.height;
        children.push(frag);
    }

    let height = y + frame.vertical();
    let model = if collapse { "collapse" } else { "separate" };
    let mut frag = LayoutFragment::new(
        FragmentKind::Block,
        source_of(b),
        FormattingContext::Table.name(),
        constraints,
        width,
        height,
    )
    .with_children(children)
    .with_metadata(keys::TABLE_COLUMNS, grid.columns.to_string())
    .with_metadata(keys::TABLE_COLUMN_WIDTH, grid.column_width.to_string())
    .with_metadata(keys::TABLE_BORDER_MODEL, model)
    .with_metadata(keys::TABLE_FRAME_TOP, frame.top.to_string());
    if let Some(caption) = plan.caption {
        frag.set_metadata(keys::TABLE_CAPTION, caption.path.clone());
    }
    frag
}

fn layout_section(pass: &mut LayoutPass, plan: &SectionPlan, grid: &Grid) -> LayoutFragment {
    let mut rows = Vec::with_capacity(plan.rows.len());
    let mut y = 0.0;
    for (index, row) in plan.rows.iter().enumerate() {
        let mut frag = pass.within_block(row, |pass| layout_row(pass, row, grid));
        frag.set_metadata(keys::TABLE_ROW, index.to_string());
        frag.offset = Point {
            x: 0.0,
            y: y + grid.spacing,
        };
        y += grid.spacing + frag.height;
        rows.push(frag);
    }
    if !rows.is_empty() {
        y += grid.spacing;
    }

    let source = match plan.section {
        Some(section) => source_of(section),
        None => FragmentSource {
            path: plan.path.clone(),
            node_kind: "ImplicitBody",
            display: DisplayClass::Block,
        },
    };
    LayoutFragment::new(
        FragmentKind::Block,
        source,
        FormattingContext::Table.name(),
        LayoutConstraints::new(grid.content_width),
        grid.content_width,
        y,
    )
    .with_children(rows)
    .with_metadata(keys::TABLE_SECTION, plan.role.as_str())
}

fn layout_row(pass: &mut LayoutPass, row: &LayoutBox, grid: &Grid) -> LayoutFragment {
    let mut cells = Vec::new();
    for (index, cell) in row.visible_children().enumerate() {
        let mut frag = pass.within_block(cell, |pass| layout_cell(pass, cell, grid));
        frag.offset = Point {
            x: grid.column_x(index),
            y: 0.0,
        };
        cells.push(frag);
    }
    let height = cells.iter().map(|c| c.height).fold(0.0, f64::max);

    LayoutFragment::new(
        FragmentKind::Block,
        source_of(row),
        FormattingContext::Table.name(),
        LayoutConstraints::new(grid.content_width),
        grid.content_width,
        height,
    )
    .with_children(cells)
}

fn layout_cell(pass: &mut LayoutPass, cell: &LayoutBox, grid: &Grid) -> LayoutFragment {
    let frame = cell.spacing.frame();
    let inner = (grid.column_width - frame.horizontal()).max(0.0);
    let constraints = LayoutConstraints::new(grid.column_width);
    // Content is measured for its geometry only; it does not size the cell.
    let stacked = stack_children(pass, cell, LayoutConstraints::new(inner));
    let height = cell
        .style()
        .height
        .and_then(|d| d.resolve(f64::INFINITY))
        .unwrap_or(DEFAULT_CELL_HEIGHT);

    LayoutFragment::new(
        FragmentKind::Block,
        source_of(cell),
        FormattingContext::Table.name(),
        constraints,
        grid.column_width,
        height,
    )
    .with_children(stacked.fragments)
}
