//! Structured error types for the Folio layout core.
//!
//! Two variants are the real domain failures: input that is malformed at
//! the API boundary, and a keep-together fragment that cannot fit on any
//! page. Disabled formatting contexts are never errors; they surface as
//! flags on the layout result.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// An argument was out of range or missing: non-positive page size,
    /// negative margins, an empty fragment list, broken constraints.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A fragment marked keep-together is taller than a whole page.
    #[error(
        "Cannot paginate `{path}`: keep-together content of height {height} exceeds the page content height {content_height}"
    )]
    PaginationImpossible {
        path: String,
        height: f64,
        content_height: f64,
    },

    /// JSON input failed to parse as a Folio document or configuration.
    #[error("Failed to parse document: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A renderer adapter failed to produce output.
    #[error("Render error: {0}")]
    Render(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl FolioError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FolioError::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the Folio input schema. Check node types and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn pagination_error_names_the_fragment() {
        let err = FolioError::PaginationImpossible {
            path: "Div:3".to_string(),
            height: 900.0,
            content_height: 700.0,
        };
        assert!(err.to_string().contains("`Div:3`"));
    }
}
