//! Source types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of backend system a source lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Document management system (e.g. SharePoint)
    #[serde(alias = "systemA")]
    DocumentSystem,
    /// Mounted file share, addressed by a drive token
    #[serde(alias = "systemB")]
    FileShare,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentSystem => "document_system",
            Self::FileShare => "file_share",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical search source backed by one backend index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSource {
    /// Backend index identifier (unique)
    pub index_id: String,
    /// System the source belongs to
    pub kind: SourceKind,
    /// Short filter token, unique among file shares (e.g. "J")
    pub short_token: String,
    /// Name shown in the filter UI
    pub display_name: String,
    /// Root path of the share as users know it (e.g. `J:\\`), for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

impl SearchSource {
    pub fn new(
        index_id: impl Into<String>,
        kind: SourceKind,
        short_token: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            index_id: index_id.into(),
            kind,
            short_token: short_token.into(),
            display_name: display_name.into(),
            base_path: None,
        }
    }

    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    pub fn is_file_share(&self) -> bool {
        self.kind == SourceKind::FileShare
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accepts_legacy_names() {
        let kind: SourceKind = serde_json::from_str("\"systemB\"").unwrap();
        assert_eq!(kind, SourceKind::FileShare);

        let kind: SourceKind = serde_json::from_str("\"document_system\"").unwrap();
        assert_eq!(kind, SourceKind::DocumentSystem);
    }

    #[test]
    fn test_source_builder() {
        let source = SearchSource::new("fs-j", SourceKind::FileShare, "J", "J: Drive")
            .with_base_path("\\\\files\\projects");

        assert!(source.is_file_share());
        assert_eq!(source.base_path.as_deref(), Some("\\\\files\\projects"));

        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["basePath"], "\\\\files\\projects");
        let bare = SearchSource::new("sp", SourceKind::DocumentSystem, "SP", "SharePoint");
        assert!(serde_json::to_value(&bare).unwrap().get("basePath").is_none());
    }
}
