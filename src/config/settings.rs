//! Settings structures for portal search configuration

use crate::sources::SourceKind;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub sources: Vec<SourceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            search: SearchSettings::default(),
            outgoing: OutgoingSettings::default(),
            sources: default_sources(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (PORTAL_SEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("PORTAL_SEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("PORTAL_SEARCH_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Ok(val) = std::env::var("PORTAL_SEARCH_BASE_URL") {
            self.outgoing.base_url = val;
        }
        if let Ok(val) = std::env::var("PORTAL_SEARCH_AUTH_TOKEN") {
            self.outgoing.auth_token = Some(val);
        }
        if let Ok(val) = std::env::var("PORTAL_SEARCH_PAGE_SIZE") {
            if let Ok(size) = val.parse() {
                self.search.page_size = size;
            }
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            bail!("search.page_size must be greater than zero");
        }
        let timeout = self.outgoing.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            bail!("outgoing.request_timeout must be a positive number of seconds, got {}", timeout);
        }
        if let Err(e) = Url::parse(&self.outgoing.base_url) {
            bail!("outgoing.base_url is not a valid URL ({}): {}", self.outgoing.base_url, e);
        }
        Ok(())
    }

    /// Get source config by index id
    pub fn get_source(&self, index_id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.index_id == index_id)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name used in log output
    pub instance_name: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Project Portal".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per page
    pub page_size: u32,
    /// Search endpoint path, relative to the base URL
    pub endpoint: String,
    /// Document field the backend matches against
    pub field: String,
    /// Number of page links shown around the current page
    pub page_window: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            endpoint: "/search/search".to_string(),
            field: "content".to_string(),
            page_window: 5,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Base URL of the portal API
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
    /// Bearer token for the portal API
    pub auth_token: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: 10.0,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
            auth_token: None,
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Individual source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Backend index identifier
    pub index_id: String,
    /// Source kind
    pub kind: SourceKind,
    /// Filter token (drive letter for file shares)
    pub short_token: String,
    /// Display name
    pub display_name: Option<String>,
    /// Root path of the source
    pub base_path: Option<String>,
    /// Whether source is disabled
    pub disabled: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            index_id: String::new(),
            kind: SourceKind::FileShare,
            short_token: String::new(),
            display_name: None,
            base_path: None,
            disabled: false,
        }
    }
}

/// Default source configurations
fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            index_id: "sharepoint_documents".to_string(),
            kind: SourceKind::DocumentSystem,
            short_token: "SP".to_string(),
            display_name: Some("SharePoint".to_string()),
            ..Default::default()
        },
        SourceConfig {
            index_id: "fileshare_j".to_string(),
            short_token: "J".to_string(),
            display_name: Some("J: Drive".to_string()),
            base_path: Some("J:\\".to_string()),
            ..Default::default()
        },
        SourceConfig {
            index_id: "fileshare_y".to_string(),
            short_token: "Y".to_string(),
            display_name: Some("Y: Drive".to_string()),
            base_path: Some("Y:\\".to_string()),
            ..Default::default()
        },
        SourceConfig {
            index_id: "fileshare_s".to_string(),
            short_token: "S".to_string(),
            display_name: Some("S: Drive".to_string()),
            base_path: Some("S:\\".to_string()),
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.page_size, 10);
        assert_eq!(settings.search.field, "content");
        assert!(!settings.general.debug);
        assert_eq!(settings.sources.len(), 4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_source_lookup() {
        let settings = Settings::default();
        let j = settings.get_source("fileshare_j");
        assert!(j.is_some());
        assert_eq!(j.unwrap().short_token, "J");
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
search:
  page_size: 25
outgoing:
  base_url: "https://portal.example.com/api"
sources:
  - index_id: sp
    kind: systemA
    short_token: SP
  - index_id: fs_p
    kind: file_share
    short_token: P
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.page_size, 25);
        assert_eq!(settings.search.endpoint, "/search/search");
        assert_eq!(settings.sources.len(), 2);
        assert_eq!(settings.sources[0].kind, SourceKind::DocumentSystem);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.search.page_size = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.outgoing.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());

        for timeout in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut settings = Settings::default();
            settings.outgoing.request_timeout = timeout;
            assert!(settings.validate().is_err(), "timeout {}", timeout);
        }
    }
}
