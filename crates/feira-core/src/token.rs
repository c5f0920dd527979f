// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Bearer token persistence
//
// The token is the sole artifact of authentication state across restarts.
// It is stored in a local JSON file, the desktop analogue of the web
// client's localStorage entry.

use crate::types::AppError;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Storage key carried over from the web client
#[derive(serde::Serialize, serde::Deserialize)]
struct TokenFile {
    auth_token: String,
}

/// In-memory cache of the bearer token, persisted to disk on changes
pub struct TokenStore {
    token: RwLock<Option<String>>,
    file_path: PathBuf,
}

impl TokenStore {
    /// Create a new token store, loading from disk if available
    pub fn new() -> Result<Self, AppError> {
        let file_path = Self::default_token_path()?;
        Ok(Self::with_path(file_path))
    }

    /// Create a token store backed by an explicit file path
    pub fn with_path(file_path: PathBuf) -> Self {
        let token = if file_path.exists() {
            match fs::read_to_string(&file_path) {
                Ok(content) => match serde_json::from_str::<TokenFile>(&content) {
                    Ok(file) => Some(file.auth_token),
                    Err(e) => {
                        tracing::warn!("Failed to parse token file, ignoring it: {}", e);
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read token file, ignoring it: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            token: RwLock::new(token),
            file_path,
        }
    }

    /// Get the path to the token file
    fn default_token_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("br", "feira", "feira-ofertas")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        // Ensure the directory exists
        fs::create_dir_all(&config_dir)
            .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;

        Ok(config_dir.join("auth.json"))
    }

    /// Get the current token, if any
    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    /// Check whether a token is present
    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    /// Store a new token and persist it to disk
    pub fn save(&self, token: String) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(&TokenFile {
            auth_token: token.clone(),
        })
        .map_err(|e| AppError::Serialization(format!("Failed to serialize token: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write token: {}", e)))?;

        *self.token.write().unwrap() = Some(token);
        Ok(())
    }

    /// Clear the token from memory and disk
    pub fn clear(&self) {
        *self.token.write().unwrap() = None;

        if self.file_path.exists() {
            if let Err(e) = fs::remove_file(&self.file_path) {
                tracing::warn!("Failed to remove token file: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        let store = TokenStore::with_path(path.clone());
        assert!(!store.has_token());

        store.save("abc.def.ghi".to_string()).unwrap();
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));

        // A fresh store sees the persisted token
        let reloaded = TokenStore::with_path(path);
        assert_eq!(reloaded.get().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        let store = TokenStore::with_path(path.clone());
        store.save("tok".to_string()).unwrap();
        assert!(path.exists());

        store.clear();
        assert!(!store.has_token());
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_degrades_to_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        fs::write(&path, "{not json").unwrap();

        let store = TokenStore::with_path(path);
        assert!(!store.has_token());
    }
}
