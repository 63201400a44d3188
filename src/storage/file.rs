use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::CredentialStore;

/// JSON file of key/value pairs; the CLI's stand-in for browser local storage.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// `<data dir>/storage.json`, creating the directory if needed.
    pub fn open_default() -> Result<Self> {
        let proj = ProjectDirs::from("dev", "folio", "folio")
            .context("unable to determine data directory for credential storage")?;
        let dir = proj.data_dir().to_path_buf();
        std::fs::create_dir_all(&dir).with_context(|| format!("creating data dir: {}", dir.display()))?;
        Ok(Self::new(dir.join("storage.json")))
    }

    pub fn path(&self) -> &Path { &self.path }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => serde_json::from_str(&s).with_context(|| format!("parsing {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let payload = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, payload).with_context(|| format!("writing {}", self.path.display()))
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.load()?;
        if map.remove(key).is_some() { self.save(&map)?; }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("storage.json"));
        assert_eq!(store.get("ig_access_token").unwrap(), None);
    }

    #[test]
    fn set_persists_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        FileStore::new(&path).set("ig_access_token", "XYZ").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("ig_access_token").unwrap().as_deref(), Some("XYZ"));
        reopened.remove("ig_access_token").unwrap();
        assert_eq!(FileStore::new(&path).get("ig_access_token").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStore::new(&path).get("k").is_err());
    }
}
