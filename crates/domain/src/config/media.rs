use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Media
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Base URL photo blob references are resolved against.
    #[serde(default = "d_blob_base_url")]
    pub blob_base_url: String,
    /// Directory the object store writes into.
    #[serde(default = "d_object_dir")]
    pub object_dir: PathBuf,
    /// Public prefix for links returned by the object store.
    #[serde(default = "d_public_base_url")]
    pub public_base_url: String,
    /// Max captures compressing or uploading at once.
    #[serde(default = "d_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            blob_base_url: d_blob_base_url(),
            object_dir: d_object_dir(),
            public_base_url: d_public_base_url(),
            max_concurrent: d_max_concurrent(),
        }
    }
}

fn d_blob_base_url() -> String {
    "https://files.example.invalid".into()
}
fn d_object_dir() -> PathBuf {
    PathBuf::from("./data/images")
}
fn d_public_base_url() -> String {
    "https://media.example.invalid/images".into()
}
fn d_max_concurrent() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_defaults() {
        let cfg: MediaConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.max_concurrent, 4);
        assert_eq!(cfg.object_dir, PathBuf::from("./data/images"));
    }
}
