//! Remembered publish token.
//!
//! Convenience storage only: the token is written as plain JSON under a fixed
//! key, with no encryption and no expiry.

use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key the token is stored under
pub const TOKEN_STORAGE_KEY: &str = "pt_github_token";

/// File-backed key/value store holding the remembered token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store backed by the JSON file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/apk_release_publisher/credentials.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| ConfigError::Missing {
            name: "user config directory".to_string(),
        })?;
        Ok(Self::new(
            dir.join("apk_release_publisher").join("credentials.json"),
        ))
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => Ok(map),
                _ => {
                    log::warn!("{} is not a JSON object; starting fresh", self.path.display());
                    Ok(Map::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// The remembered token, if any
    pub fn load(&self) -> Result<Option<String>> {
        Ok(self
            .read_map()?
            .get(TOKEN_STORAGE_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    /// The remembered token, treating an unreadable or corrupt store as empty
    pub fn remembered(&self) -> Option<String> {
        self.load().unwrap_or_else(|e| {
            log::warn!("Ignoring remembered token in {}: {e}", self.path.display());
            None
        })
    }

    /// Remember `token` when `remember` is set and the token is non-empty;
    /// otherwise forget any remembered token
    pub fn save(&self, token: &str, remember: bool) -> Result<()> {
        if remember && !token.is_empty() {
            let mut map = self.read_map()?;
            map.insert(TOKEN_STORAGE_KEY.to_string(), Value::String(token.to_string()));
            self.write_map(&map)?;
            log::debug!("Remembered token in {}", self.path.display());
            Ok(())
        } else {
            self.clear()
        }
    }

    /// Forget the remembered token
    pub fn clear(&self) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(TOKEN_STORAGE_KEY).is_some() {
            self.write_map(&map)?;
            log::debug!("Cleared remembered token from {}", self.path.display());
        }
        Ok(())
    }
}

/// Mask a token for display, keeping the last four characters
pub fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("credentials.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_means_no_token() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn remember_then_load() {
        let (_dir, store) = store();
        store.save("ghp_secret", true).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("ghp_secret"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(TOKEN_STORAGE_KEY));
    }

    #[test]
    fn saving_without_remember_forgets() {
        let (_dir, store) = store();
        store.save("ghp_secret", true).unwrap();
        store.save("ghp_other", false).unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.save("ghp_secret", true).unwrap();
        store.save("", true).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_keeps_unrelated_keys() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"theme":"dark","pt_github_token":"t"}"#).unwrap();

        store.clear().unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains(TOKEN_STORAGE_KEY));
    }

    #[test]
    fn corrupt_store_means_no_remembered_token() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_err());
        assert_eq!(store.remembered(), None);
    }

    #[test]
    fn mask_keeps_tail() {
        assert_eq!(mask("ghp_abcd1234"), "********1234");
        assert_eq!(mask("abc"), "***");
    }
}
