//! # Folio
//!
//! A box-model layout and pagination core.
//!
//! Folio takes a styled document tree, measures it the way a browser would
//! (block, inline, inline-block, table and a flex preview), and then fills
//! fixed-size pages with the result. Tables split between rows and repeat
//! their header, keep-together content never splits, and every piece of a
//! split fragment knows which pages it continues from and onto.
//!
//! Producing bytes is left to a [`RenderAdapter`]. The crate ships a JSON
//! adapter for inspection; a PDF or canvas backend plugs in the same way.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]       Document tree: nodes, styles, content
//!       ↓
//!   [layout]      Box tree, formatting contexts, measured fragments
//!       ↓
//!   [pagination]  Page filling: breaks, splits, carry links
//!       ↓
//!   [render]      Adapter trait; JSON debug output
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod pagination;
pub mod render;
pub mod style;
pub mod text;

pub use config::{FolioConfig, RenderRequest};
pub use error::FolioError;
pub use layout::{LayoutConstraints, LayoutEngine, LayoutFragment, LayoutOptions, LayoutResult};
pub use model::DocumentNode;
pub use pagination::{PageConstraints, PaginatedDocument, PaginationOptions, Paginator};
pub use render::{JsonAdapter, RenderAdapter, RenderContext};

/// Lay out, paginate and render a document.
///
/// Layout warnings come first in the document's warning list, followed by
/// the ones pagination raised.
pub fn render<A: RenderAdapter + ?Sized>(
    root: &DocumentNode,
    config: &FolioConfig,
    adapter: &mut A,
) -> Result<Vec<u8>, FolioError> {
    config.page.validate()?;

    let engine = LayoutEngine::new(config.layout.clone());
    let laid_out = engine.layout(root, LayoutConstraints::new(config.page.content_width()))?;
    if !laid_out.is_success {
        return Err(FolioError::invalid("the document root is hidden; nothing to render"));
    }
    if let Some(reason) = &laid_out.fallback_reason {
        log::info!(target: "folio", "layout fell back to block: {reason}");
    }

    let paginator = Paginator::new(config.pagination.clone());
    let mut document = paginator.paginate(&laid_out.fragments, &config.page)?;

    let mut warnings = laid_out.warnings;
    warnings.append(&mut document.warnings);
    document.warnings = warnings;

    render::render_document(&document, adapter)
}

/// Render a [`RenderRequest`] given as JSON to the JSON page dump.
pub fn render_json(json: &str) -> Result<Vec<u8>, FolioError> {
    let request: RenderRequest = serde_json::from_str(json)?;
    render(&request.document, &request.config, &mut JsonAdapter::pretty())
}
