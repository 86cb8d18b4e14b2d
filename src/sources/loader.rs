//! Source loader for building the registry from configuration

use super::registry::SourceRegistry;
use super::types::SearchSource;
use crate::config::{Settings, SourceConfig};
use anyhow::{Context, Result};
use tracing::info;

/// Loader for initializing sources from configuration
pub struct SourceLoader;

impl SourceLoader {
    /// Load all enabled sources from settings
    pub fn load(settings: &Settings) -> Result<SourceRegistry> {
        let mut registry = SourceRegistry::new();

        for config in &settings.sources {
            if config.disabled {
                info!("Skipping disabled source: {}", config.index_id);
                continue;
            }

            registry
                .register(Self::create_source(config))
                .with_context(|| format!("Invalid source configuration: {}", config.index_id))?;
            info!("Loaded source: {} ({})", config.index_id, config.kind);
        }

        info!("Loaded {} sources", registry.len());
        Ok(registry)
    }

    fn create_source(config: &SourceConfig) -> SearchSource {
        let display_name = config
            .display_name
            .clone()
            .unwrap_or_else(|| config.index_id.clone());

        SearchSource {
            index_id: config.index_id.clone(),
            kind: config.kind,
            short_token: config.short_token.clone(),
            display_name,
            base_path: config.base_path.clone(),
        }
    }
}
