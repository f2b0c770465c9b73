//! Durable object storage for compressed photos.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use rc_domain::config::MediaConfig;
use rc_domain::error::{Error, Result};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `name` and return a link that stays valid.
    async fn upload(&self, bytes: &[u8], name: &str) -> Result<String>;
}

/// Writes objects into a directory served at `public_base_url`.
#[derive(Debug, Clone)]
pub struct DirObjectStore {
    dir: PathBuf,
    public_base_url: String,
}

impl DirObjectStore {
    pub fn new(cfg: &MediaConfig) -> Self {
        Self::at(&cfg.object_dir, &cfg.public_base_url)
    }

    pub fn at(dir: &Path, public_base_url: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl ObjectStore for DirObjectStore {
    async fn upload(&self, bytes: &[u8], name: &str) -> Result<String> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::ObjectStore(format!("invalid object name \"{name}\"")));
        }
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::ObjectStore(format!("creating {}: {e}", self.dir.display())))?;

        let path = self.dir.join(name);
        let tmp = self.dir.join(format!(".{name}.tmp"));
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| Error::ObjectStore(format!("writing {name}: {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::ObjectStore(format!("publishing {name}: {e}")))?;

        Ok(format!("{}/{}", self.public_base_url, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_writes_file_and_returns_public_link() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirObjectStore::at(dir.path(), "https://media.test/img/");
        let link = store.upload(b"jpeg", "selfie.jpg").await.unwrap();
        assert_eq!(link, "https://media.test/img/selfie.jpg");
        assert_eq!(std::fs::read(dir.path().join("selfie.jpg")).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirObjectStore::at(dir.path(), "https://media.test");
        assert!(store.upload(b"x", "../escape.jpg").await.is_err());
    }
}
