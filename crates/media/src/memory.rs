//! In-process blob source and object store with failure injection.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use rc_domain::error::{Error, Result};

use crate::source::BlobSource;
use crate::store::ObjectStore;

/// Serves blobs registered with [`MemoryBlobSource::insert`].
#[derive(Debug, Default)]
pub struct MemoryBlobSource {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    failures: Mutex<u32>,
}

impl MemoryBlobSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, blob_ref: &str, bytes: Vec<u8>) {
        self.blobs.lock().insert(blob_ref.to_owned(), bytes);
    }

    /// Fail the next `n` fetches with a transient error.
    pub fn fail_next(&self, n: u32) {
        *self.failures.lock() = n;
    }
}

#[async_trait]
impl BlobSource for MemoryBlobSource {
    async fn fetch(&self, blob_ref: &str) -> Result<Vec<u8>> {
        {
            let mut failures = self.failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::Http(format!("GET {blob_ref}: connection reset")));
            }
        }
        self.blobs
            .lock()
            .get(blob_ref)
            .cloned()
            .ok_or_else(|| Error::Media(format!("unknown blob {blob_ref}")))
    }
}

/// Keeps uploaded objects in memory and counts every upload attempt.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failures: Mutex<u32>,
    attempts: Mutex<u32>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` uploads with a transient error.
    pub fn fail_next(&self, n: u32) {
        *self.failures.lock() = n;
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }

    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.objects.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(name).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, bytes: &[u8], name: &str) -> Result<String> {
        *self.attempts.lock() += 1;
        {
            let mut failures = self.failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::ObjectStore(format!("PUT {name}: 503 service unavailable")));
            }
        }
        self.objects.lock().insert(name.to_owned(), bytes.to_vec());
        Ok(format!("memory://objects/{name}"))
    }
}
