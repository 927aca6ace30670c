//! Mock Storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult};

use super::lock;

/// An object written through [`InMemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Mock storage implementation that stores objects in memory
#[derive(Clone)]
pub struct InMemoryStorage {
    bucket: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_puts: Arc<AtomicBool>,
}

impl InMemoryStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_puts: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent `put_stream` fail
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.objects).keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get_object(&self, key: &str) -> Option<StoredObject> {
        lock(&self.objects).get(key).cloned()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "simulated storage outage".to_string(),
            ));
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        let size = data.len() as u64;

        lock(&self.objects).insert(
            storage_key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(size)
    }

    async fn presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if !lock(&self.objects).contains_key(storage_key) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(format!(
            "https://{}.storage.test/{}?expires={}",
            self.bucket,
            storage_key,
            expires_in.as_secs()
        ))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
