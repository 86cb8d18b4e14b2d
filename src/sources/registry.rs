//! Source registry for looking up searchable sources

use super::types::{SearchSource, SourceKind};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors raised while building a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("source index id must not be empty")]
    EmptyIndexId,
    #[error("duplicate source index id: {0}")]
    DuplicateIndexId(String),
    #[error("duplicate file share token: {0}")]
    DuplicateToken(String),
}

/// Registry of all searchable sources, in registration order
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SearchSource>,
    /// Index id -> position in `sources`
    by_index: HashMap<String, usize>,
    /// File share token -> position in `sources`
    by_token: HashMap<String, usize>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of sources
    pub fn from_sources(
        sources: impl IntoIterator<Item = SearchSource>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for source in sources {
            registry.register(source)?;
        }
        Ok(registry)
    }

    /// Register a source
    pub fn register(&mut self, source: SearchSource) -> Result<(), RegistryError> {
        if source.index_id.trim().is_empty() {
            return Err(RegistryError::EmptyIndexId);
        }
        if self.by_index.contains_key(&source.index_id) {
            return Err(RegistryError::DuplicateIndexId(source.index_id));
        }
        if source.is_file_share() && self.by_token.contains_key(&source.short_token) {
            return Err(RegistryError::DuplicateToken(source.short_token));
        }

        let position = self.sources.len();
        self.by_index.insert(source.index_id.clone(), position);
        if source.is_file_share() {
            self.by_token.insert(source.short_token.clone(), position);
        }
        self.sources.push(source);
        Ok(())
    }

    /// All registered sources
    pub fn list_all(&self) -> &[SearchSource] {
        &self.sources
    }

    /// Sources of one kind
    pub fn by_kind(&self, kind: SourceKind) -> Vec<&SearchSource> {
        self.sources.iter().filter(|s| s.kind == kind).collect()
    }

    /// File shares whose token is in `tokens`
    pub fn by_tokens(&self, tokens: &BTreeSet<String>) -> Vec<&SearchSource> {
        self.sources
            .iter()
            .filter(|s| s.is_file_share() && tokens.contains(&s.short_token))
            .collect()
    }

    /// Get a source by index id
    pub fn get(&self, index_id: &str) -> Option<&SearchSource> {
        self.by_index.get(index_id).map(|&i| &self.sources[i])
    }

    /// Get a file share by its token
    pub fn by_token(&self, token: &str) -> Option<&SearchSource> {
        self.by_token.get(token).map(|&i| &self.sources[i])
    }

    /// All index ids
    pub fn index_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.index_id.as_str()).collect()
    }

    /// Check if a source exists
    pub fn contains(&self, index_id: &str) -> bool {
        self.by_index.contains_key(index_id)
    }

    /// Get number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
