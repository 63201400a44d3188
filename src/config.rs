use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::credential::CredentialKeys;

pub const DEFAULT_ENDPOINT: &str = "https://graph.instagram.com/me/media";
pub const DEFAULT_FIELDS: &[&str] = &["id", "caption", "media_url", "permalink", "thumbnail_url", "media_type", "timestamp"];

/// Everything the media feed needs to know about its page and provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub endpoint: String,
    pub fields: Vec<String>,
    pub limit: u32,
    pub token_param: String,
    pub storage_key: String,
    pub container_selector: String,
    /// Widths at or below this count as narrow (`max-width` semantics).
    pub narrow_breakpoint_px: u32,
    pub narrow_count: usize,
    pub wide_count: usize,
    pub caption_max_chars: usize,
    pub fetch_timeout_ms: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fields: DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect(),
            limit: 50,
            token_param: "ig_token".to_string(),
            storage_key: "ig_access_token".to_string(),
            container_selector: ".projects .projects-grid".to_string(),
            narrow_breakpoint_px: 768,
            narrow_count: 3,
            wide_count: 6,
            caption_max_chars: 120,
            fetch_timeout_ms: None,
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing feed config")
    }

    /// Read a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s).with_context(|| format!("in {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Apply `FOLIO_*` environment overrides; unparsable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|k| std::env::var(k).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = var("FOLIO_MEDIA_ENDPOINT").filter(|s| !s.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(limit) = var("FOLIO_FEED_LIMIT").and_then(|s| s.parse().ok()) {
            self.limit = limit;
        }
        if let Some(ms) = var("FOLIO_FETCH_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.fetch_timeout_ms = Some(ms);
        }
        self
    }

    pub fn credential_keys(&self) -> CredentialKeys {
        CredentialKeys { param: self.token_param.clone(), storage_key: self.storage_key.clone() }
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Viewport widths are CSS pixels and may be fractional.
    pub fn is_narrow(&self, viewport_width: f64) -> bool {
        viewport_width <= f64::from(self.narrow_breakpoint_px)
    }
}
