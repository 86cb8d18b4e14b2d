//! Result type definitions

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    /// Backend document id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Path or URL of the document
    pub path: String,
    /// Document title, when the source has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Highlighted content fragments
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Index the hit came from
    #[serde(alias = "_index", alias = "index")]
    pub source_index_id: String,
}

impl ResultItem {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        source_index_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            title: None,
            highlights: vec![],
            source_index_id: source_index_id.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_highlight(mut self, fragment: impl Into<String>) -> Self {
        self.highlights.push(fragment.into());
        self
    }

    /// Title to show, falling back to the last path segment
    pub fn display_title(&self) -> &str {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title;
        }
        self.path
            .rsplit(['/', '\\'])
            .find(|s| !s.is_empty())
            .unwrap_or(&self.path)
    }
}

/// One page of results, replaced wholesale on each completed search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    pub items: Vec<ResultItem>,
    pub total_count: u64,
    /// Page number (1-indexed)
    pub page: u32,
}

impl SearchResultPage {
    /// Number of pages for the given page size
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total_count, page_size)
    }
}

/// `ceil(total_count / page_size)`, zero for an empty page size
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Decoded body of a successful search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ResultItem>,
    pub total: u64,
}

/// Shape of a response body that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed search response: {0}")]
pub struct MalformedResponse(pub String);

impl SearchResponse {
    /// Decode a response body.
    ///
    /// The documented schema is `{ results, total }`. Older deployments
    /// return the bare results array, in which case `total` is its length.
    /// Anything else is rejected.
    pub fn parse(body: &str) -> Result<Self, MalformedResponse> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| MalformedResponse(e.to_string()))?;

        match value {
            Value::Object(_) => {
                serde_json::from_value(value).map_err(|e| MalformedResponse(e.to_string()))
            }
            Value::Array(_) => Self::parse_legacy(value),
            other => Err(MalformedResponse(format!(
                "expected an object or array, got {}",
                json_type(&other)
            ))),
        }
    }

    fn parse_legacy(value: Value) -> Result<Self, MalformedResponse> {
        let results: Vec<ResultItem> =
            serde_json::from_value(value).map_err(|e| MalformedResponse(e.to_string()))?;
        let total = results.len() as u64;
        Ok(Self { results, total })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            json_type(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documented_schema() {
        let body = r#"{
            "results": [
                {"id": "a1", "path": "J:\\bids\\tender.pdf", "highlights": ["<em>tender</em>"], "sourceIndexId": "fileshare_j"},
                {"id": 7, "path": "/sites/pm/plan.docx", "title": "Plan", "sourceIndexId": "sharepoint_documents"}
            ],
            "total": 42
        }"#;

        let response = SearchResponse::parse(body).unwrap();
        assert_eq!(response.total, 42);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].id, "7");
        assert!(response.results[1].highlights.is_empty());
    }

    #[test]
    fn test_parse_legacy_array() {
        let body = r#"[{"id": "x", "path": "/a", "_index": "fileshare_s"}]"#;

        let response = SearchResponse::parse(body).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].source_index_id, "fileshare_s");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(SearchResponse::parse(r#"{"hits": []}"#).is_err());
        assert!(SearchResponse::parse("\"ok\"").is_err());
        assert!(SearchResponse::parse("<html>").is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_display_title() {
        let item = ResultItem::new("1", "J:\\projects\\bridge\\cost.xlsx", "fileshare_j");
        assert_eq!(item.display_title(), "cost.xlsx");

        let item = item.with_title("Bridge cost plan");
        assert_eq!(item.display_title(), "Bridge cost plan");
    }
}
