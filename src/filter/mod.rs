//! Filter resolution
//!
//! Translates the user's selected search scope into the backend index ids
//! that take part in a search.

use crate::sources::{SourceKind, SourceRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User-selected search scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FilterState {
    /// Every registered source
    #[default]
    All,
    /// Document systems only
    #[serde(rename = "kindA")]
    DocumentSystems,
    /// Every file share
    #[serde(rename = "kindB-all")]
    AllFileShares,
    /// Selected file shares, by token
    #[serde(rename = "kindB-subset")]
    FileShareSubset {
        #[serde(rename = "subsetTokens", default)]
        tokens: BTreeSet<String>,
    },
}

impl FilterState {
    /// Subset filter from a list of file share tokens
    pub fn subset<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FileShareSubset {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Add or remove one file share token.
    ///
    /// Any other mode switches to a subset containing just `token`.
    pub fn toggle_token(&mut self, token: &str) {
        match self {
            Self::FileShareSubset { tokens } => {
                if !tokens.remove(token) {
                    tokens.insert(token.to_string());
                }
            }
            _ => *self = Self::subset([token]),
        }
    }

    /// Short label for the active scope
    pub fn label(&self, registry: &SourceRegistry) -> String {
        match self {
            Self::All => "All sources".to_string(),
            Self::DocumentSystems => "Document systems".to_string(),
            Self::AllFileShares => "All file shares".to_string(),
            Self::FileShareSubset { tokens } if tokens.is_empty() => "No sources".to_string(),
            Self::FileShareSubset { tokens } => registry
                .by_tokens(tokens)
                .iter()
                .map(|s| s.display_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Resolve a filter to the index ids to search, in registry order.
///
/// An empty result means no searchable source is selected.
pub fn resolve_indexes(filter: &FilterState, registry: &SourceRegistry) -> Vec<String> {
    let sources = match filter {
        FilterState::All => registry.list_all().iter().collect(),
        FilterState::DocumentSystems => registry.by_kind(SourceKind::DocumentSystem),
        FilterState::AllFileShares => registry.by_kind(SourceKind::FileShare),
        FilterState::FileShareSubset { tokens } => registry.by_tokens(tokens),
    };

    sources.into_iter().map(|s| s.index_id.clone()).collect()
}
