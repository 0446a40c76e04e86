use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::ObjectStorage;
use crate::core::error::AppError;

const FAKE_BASE_URL: &str = "http://storage.test/photos";

type UploadHook = Box<dyn Fn() + Send + Sync>;

/// In-memory bucket keyed by storage path
pub struct FakeObjectStorage {
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    pub upload_calls: AtomicU64,
    pub delete_calls: AtomicU64,
    pub fail_uploads: AtomicBool,
    pub fail_deletes: AtomicBool,
    upload_hook: Mutex<Option<UploadHook>>,
}

impl Default for FakeObjectStorage {
    fn default() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            upload_calls: AtomicU64::new(0),
            delete_calls: AtomicU64::new(0),
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            upload_hook: Mutex::new(None),
        }
    }
}

impl FakeObjectStorage {
    /// Run `hook` before each upload, standing in for concurrent requests
    pub fn on_upload(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.upload_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl ObjectStorage for FakeObjectStorage {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.upload_hook.lock().unwrap().as_ref() {
            hook();
        }
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("Failed to upload '{}'", path)));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(self.public_url(path))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("Failed to delete '{}'", path)));
        }
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", FAKE_BASE_URL, path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(FAKE_BASE_URL)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }
}
