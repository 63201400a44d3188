use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use crate::storage::CredentialStore;

/// Where the token may arrive and where it is remembered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialKeys {
    pub param: String,
    pub storage_key: String,
}

impl Default for CredentialKeys {
    fn default() -> Self {
        Self { param: "ig_token".to_string(), storage_key: "ig_access_token".to_string() }
    }
}

/// The page's address bar.
pub trait PageLocation {
    fn href(&self) -> Result<String>;
    /// Rewrite the current history entry; must not push a new one.
    fn replace(&mut self, url: &str) -> Result<()>;
}

/// In-memory address bar that records how history was touched.
#[derive(Debug, Clone)]
pub struct StaticLocation {
    href: String,
    replacements: usize,
}

impl StaticLocation {
    pub fn new(href: impl Into<String>) -> Self { Self { href: href.into(), replacements: 0 } }
    pub fn replacements(&self) -> usize { self.replacements }
    pub fn current(&self) -> &str { &self.href }
}

impl PageLocation for StaticLocation {
    fn href(&self) -> Result<String> { Ok(self.href.clone()) }

    fn replace(&mut self, url: &str) -> Result<()> {
        self.href = url.to_string();
        self.replacements += 1;
        Ok(())
    }
}

/// Token from the URL (persisted, then stripped) or from storage; empty when neither.
pub fn resolve_credential(keys: &CredentialKeys, location: &mut dyn PageLocation, store: &dyn CredentialStore) -> String {
    match try_resolve(keys, location, store) {
        Ok(token) => token,
        Err(e) => {
            debug!(error = %e, "credential unavailable");
            String::new()
        }
    }
}

fn try_resolve(keys: &CredentialKeys, location: &mut dyn PageLocation, store: &dyn CredentialStore) -> Result<String> {
    let href = location.href()?;
    let mut url = Url::parse(&href).with_context(|| format!("parsing page url: {href}"))?;

    let from_url = url
        .query_pairs()
        .find(|(k, _)| k == keys.param.as_str())
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty());

    if let Some(token) = from_url {
        store.set(&keys.storage_key, &token).context("persisting credential")?;
        strip_query_param(&mut url, &keys.param);
        if let Err(e) = location.replace(url.as_str()) {
            debug!(error = %e, "could not rewrite page url");
        }
        return Ok(token);
    }

    Ok(store.get(&keys.storage_key)?.unwrap_or_default())
}

/// Drop every occurrence of `param`, keeping the rest of the query and the fragment.
pub fn strip_query_param(url: &mut Url, param: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, UnavailableStore};

    struct BrokenHistory(String);

    impl PageLocation for BrokenHistory {
        fn href(&self) -> Result<String> { Ok(self.0.clone()) }
        fn replace(&mut self, _url: &str) -> Result<()> { Err(anyhow::anyhow!("SecurityError")) }
    }

    #[test]
    fn token_in_url_is_persisted_and_stripped() {
        let keys = CredentialKeys::default();
        let store = MemoryStore::new();
        let mut loc = StaticLocation::new("https://me.example/page?ig_token=ABC");
        assert_eq!(resolve_credential(&keys, &mut loc, &store), "ABC");
        assert_eq!(store.get("ig_access_token").unwrap().as_deref(), Some("ABC"));
        assert_eq!(loc.current(), "https://me.example/page");
        assert!(!loc.current().contains("ig_token"));
        assert_eq!(loc.replacements(), 1);
    }

    #[test]
    fn other_params_and_fragment_survive() {
        let keys = CredentialKeys::default();
        let store = MemoryStore::new();
        let mut loc = StaticLocation::new("https://me.example/?a=1&ig_token=ABC&b=2#projects");
        assert_eq!(resolve_credential(&keys, &mut loc, &store), "ABC");
        assert_eq!(loc.current(), "https://me.example/?a=1&b=2#projects");
    }

    #[test]
    fn falls_back_to_storage() {
        let keys = CredentialKeys::default();
        let store = MemoryStore::with_entry("ig_access_token", "XYZ");
        let mut loc = StaticLocation::new("https://me.example/page");
        assert_eq!(resolve_credential(&keys, &mut loc, &store), "XYZ");
        assert_eq!(loc.replacements(), 0);
    }

    #[test]
    fn empty_param_counts_as_absent() {
        let keys = CredentialKeys::default();
        let store = MemoryStore::with_entry("ig_access_token", "XYZ");
        let mut loc = StaticLocation::new("https://me.example/page?ig_token=");
        assert_eq!(resolve_credential(&keys, &mut loc, &store), "XYZ");
    }

    #[test]
    fn nothing_anywhere_is_empty() {
        let keys = CredentialKeys::default();
        let mut loc = StaticLocation::new("https://me.example/");
        assert_eq!(resolve_credential(&keys, &mut loc, &MemoryStore::new()), "");
    }

    #[test]
    fn storage_failure_is_swallowed() {
        let keys = CredentialKeys::default();
        let mut loc = StaticLocation::new("https://me.example/page?ig_token=ABC");
        assert_eq!(resolve_credential(&keys, &mut loc, &UnavailableStore), "");
        let mut plain = StaticLocation::new("https://me.example/page");
        assert_eq!(resolve_credential(&keys, &mut plain, &UnavailableStore), "");
    }

    #[test]
    fn unparsable_href_is_swallowed() {
        let keys = CredentialKeys::default();
        let store = MemoryStore::with_entry("ig_access_token", "XYZ");
        let mut relative = StaticLocation::new("/page?ig_token=ABC");
        assert_eq!(resolve_credential(&keys, &mut relative, &store), "");
    }

    #[test]
    fn history_rewrite_failure_still_returns_token() {
        let keys = CredentialKeys::default();
        let store = MemoryStore::new();
        let mut loc = BrokenHistory("https://me.example/?ig_token=ABC".into());
        assert_eq!(resolve_credential(&keys, &mut loc, &store), "ABC");
        assert_eq!(store.get("ig_access_token").unwrap().as_deref(), Some("ABC"));
    }
}
