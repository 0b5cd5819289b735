//! # Renderer Adapters
//!
//! Folio stops at geometry. Turning pages into bytes is the job of a
//! [`RenderAdapter`], which [`render_document`] drives in a fixed order:
//! `begin_document` once, `render` once per page in page order, then
//! `end_document`, which returns the output.
//!
//! [`JsonAdapter`] is the adapter that ships with the crate. It writes a
//! serializable snapshot of every page for debug overlays and tests.

use serde::Serialize;

use crate::error::FolioError;
use crate::pagination::{
    CarryPageLink, FragmentSlice, PageFragmentTree, PaginatedDocument, Rect, SliceKind,
};

/// Where the driver is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub page_count: usize,
    /// 1-based page being rendered; 0 before the first page.
    pub current_page: usize,
}

/// Consumes a paginated document.
pub trait RenderAdapter {
    fn begin_document(
        &mut self,
        document: &PaginatedDocument<'_>,
        context: &RenderContext,
    ) -> Result<(), FolioError>;

    fn render(
        &mut self,
        page: &PageFragmentTree<'_>,
        context: &RenderContext,
    ) -> Result<(), FolioError>;

    fn end_document(&mut self, context: &RenderContext) -> Result<Vec<u8>, FolioError>;
}

/// Feed `document` to `adapter`, page by page.
pub fn render_document<A: RenderAdapter + ?Sized>(
    document: &PaginatedDocument<'_>,
    adapter: &mut A,
) -> Result<Vec<u8>, FolioError> {
    let mut context = RenderContext {
        page_count: document.page_count(),
        current_page: 0,
    };
    adapter.begin_document(document, &context)?;
    for page in &document.pages {
        context.current_page = page.page_number;
        adapter.render(page, &context)?;
    }
    adapter.end_document(&context)
}

// ── Serializable page snapshot ──────────────────────────────────────

/// Everything the JSON adapter writes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub page_width: f64,
    pub page_height: f64,
    pub pages: Vec<PageInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_number: usize,
    pub content: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carry: Option<CarryPageLink>,
    pub slices: Vec<SliceInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceInfo {
    pub path: String,
    pub node_kind: String,
    pub kind: SliceKind,
    pub bounds: Rect,
    pub source_offset: f64,
    pub block_size: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SliceInfo>,
}

impl SliceInfo {
    fn from_slice(slice: &FragmentSlice<'_>) -> Self {
        SliceInfo {
            path: slice.path().to_string(),
            node_kind: slice.fragment.source.node_kind.to_string(),
            kind: slice.kind,
            bounds: slice.bounds,
            source_offset: slice.source_offset,
            block_size: slice.block_size,
            repeated: slice.repeated,
            children: slice.children.iter().map(SliceInfo::from_slice).collect(),
        }
    }
}

impl PageInfo {
    pub fn from_page(page: &PageFragmentTree<'_>) -> Self {
        PageInfo {
            page_number: page.page_number,
            content: page.content_bounds,
            carry: page.carry,
            slices: page.slices.iter().map(SliceInfo::from_slice).collect(),
        }
    }
}

/// Writes pages as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonAdapter {
    info: DocumentInfo,
    pretty: bool,
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent the output.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

impl RenderAdapter for JsonAdapter {
    fn begin_document(
        &mut self,
        document: &PaginatedDocument<'_>,
        _context: &RenderContext,
    ) -> Result<(), FolioError> {
        self.info = DocumentInfo {
            page_width: document.constraints.width,
            page_height: document.constraints.height,
            pages: Vec::with_capacity(document.page_count()),
            warnings: document.warnings.clone(),
        };
        Ok(())
    }

    fn render(
        &mut self,
        page: &PageFragmentTree<'_>,
        context: &RenderContext,
    ) -> Result<(), FolioError> {
        if page.page_number != self.info.pages.len() + 1 {
            return Err(FolioError::Render(format!(
                "page {} rendered out of order (expected {} of {})",
                page.page_number,
                self.info.pages.len() + 1,
                context.page_count
            )));
        }
        self.info.pages.push(PageInfo::from_page(page));
        Ok(())
    }

    fn end_document(&mut self, _context: &RenderContext) -> Result<Vec<u8>, FolioError> {
        let info = std::mem::take(&mut self.info);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&info)
        } else {
            serde_json::to_vec(&info)
        };
        bytes.map_err(|e| FolioError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutFragment;
    use crate::pagination::{PageConstraints, Paginator};

    /// Records the calls it receives.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl RenderAdapter for Recorder {
        fn begin_document(
            &mut self,
            document: &PaginatedDocument<'_>,
            context: &RenderContext,
        ) -> Result<(), FolioError> {
            self.calls.push(format!("begin {} {}", document.page_count(), context.current_page));
            Ok(())
        }

        fn render(
            &mut self,
            page: &PageFragmentTree<'_>,
            context: &RenderContext,
        ) -> Result<(), FolioError> {
            self.calls
                .push(format!("page {} of {}", page.page_number, context.page_count));
            Ok(())
        }

        fn end_document(&mut self, _context: &RenderContext) -> Result<Vec<u8>, FolioError> {
            self.calls.push("end".to_string());
            Ok(b"done".to_vec())
        }
    }

    fn fragments() -> Vec<LayoutFragment> {
        vec![
            LayoutFragment::block("A", 300.0, 400.0),
            LayoutFragment::block("B", 300.0, 300.0),
        ]
    }

    #[test]
    fn driver_calls_adapter_in_order() {
        let frags = fragments();
        let doc = Paginator::default()
            .paginate(&frags, &PageConstraints::new(400.0, 500.0))
            .unwrap();
        let mut recorder = Recorder::default();
        let bytes = render_document(&doc, &mut recorder).unwrap();
        assert_eq!(bytes, b"done");
        assert_eq!(
            recorder.calls,
            vec!["begin 2 0", "page 1 of 2", "page 2 of 2", "end"]
        );
    }

    #[test]
    fn json_adapter_writes_pages_and_slices() {
        let frags = fragments();
        let doc = Paginator::default()
            .paginate(&frags, &PageConstraints::new(400.0, 500.0))
            .unwrap();
        let bytes = render_document(&doc, &mut JsonAdapter::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let pages = value["pages"].as_array().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0]["slices"][0]["path"], "A");
        assert_eq!(pages[0]["slices"][1]["kind"], "Start");
        assert_eq!(pages[1]["slices"][0]["kind"], "End");
        assert_eq!(pages[0]["carry"]["continuesToPage"], 2);
        assert_eq!(value["pageWidth"], 400.0);
    }
}
