use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

/// Browser-local key/value storage, or anything standing in for it.
pub trait CredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<()> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<()> { (**self).remove(key) }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut map) = store.entries.lock() { map.insert(key.to_string(), value.to_string()); }
        store
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.entries.lock().map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.entries.lock().map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.entries.lock().map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        map.remove(key);
        Ok(())
    }
}

/// Always fails, like storage inside a sandboxed iframe.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl CredentialStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> { Err(anyhow::anyhow!("storage unavailable")) }
    fn set(&self, _key: &str, _value: &str) -> Result<()> { Err(anyhow::anyhow!("storage unavailable")) }
    fn remove(&self, _key: &str) -> Result<()> { Err(anyhow::anyhow!("storage unavailable")) }
}
