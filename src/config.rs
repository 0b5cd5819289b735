//! Run configuration and the JSON request envelope.
//!
//! Every field has a default, so `{}` is a valid configuration and a
//! request only has to carry its document.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutOptions;
use crate::model::DocumentNode;
use crate::pagination::{PageConstraints, PaginationOptions};

/// Options for a full layout-and-paginate run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolioConfig {
    pub layout: LayoutOptions,
    pub pagination: PaginationOptions,
    /// Page geometry. Defaults to A4 with 54pt margins.
    pub page: PageConstraints,
}

/// A document plus the configuration to render it with.
///
/// ```json
/// {
///   "page": { "width": 612, "height": 792 },
///   "layout": { "flex": true },
///   "document": { "kind": { "type": "Document" }, "children": [] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(flatten)]
    pub config: FolioConfig,
    pub document: DocumentNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default() {
        let config: FolioConfig = serde_json::from_str("{}").unwrap();
        assert!(config.layout.tables);
        assert!(!config.layout.flex);
        assert!(config.pagination.repeat_table_headers);
        assert_eq!(config.page, PageConstraints::default());
    }

    #[test]
    fn request_flattens_config_next_to_document() {
        let json = r#"{
            "page": { "width": 400, "height": 300 },
            "layout": { "flex": true, "tableBorderCollapse": true },
            "pagination": { "repeatTableHeaders": false },
            "document": { "kind": { "type": "Paragraph" } }
        }"#;
        let request: RenderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.config.page.width, 400.0);
        assert_eq!(request.config.page.margin.top, 54.0);
        assert!(request.config.layout.flex);
        assert!(request.config.layout.table_border_collapse);
        assert!(!request.config.pagination.repeat_table_headers);
        assert_eq!(request.document.kind.name(), "Paragraph");
    }

    #[test]
    fn missing_document_fails() {
        assert!(serde_json::from_str::<RenderRequest>(r#"{ "page": {} }"#).is_err());
    }
}
