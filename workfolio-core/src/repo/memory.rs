use crate::assets::{is_external, memory::MemoryAssets, AssetStore};
use crate::{CoreError, NewWork, Work, WorkCollection, WorkId, WorkPatch};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

/// Non-durable repository; same rules as the JSON store without the file.
pub struct MemoryRepo {
    works: Mutex<WorkCollection>,
    assets: Arc<dyn AssetStore>,
}

impl Default for MemoryRepo {
    fn default() -> Self {
        Self::with_assets(Arc::new(MemoryAssets::new()))
    }
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: Arc<dyn AssetStore>) -> Self {
        Self {
            works: Mutex::new(WorkCollection::new()),
            assets,
        }
    }
}

#[async_trait]
impl crate::repo::Repository for MemoryRepo {
    async fn list_works(&self) -> Result<Vec<Work>, CoreError> {
        Ok(self.works.lock().as_slice().to_vec())
    }

    async fn get_work(&self, id: WorkId) -> Result<Work, CoreError> {
        self.works.lock().get(id).cloned()
    }

    async fn create_work(&self, new: NewWork) -> Result<Work, CoreError> {
        self.works.lock().insert(new, Utc::now())
    }

    async fn update_work(&self, id: WorkId, patch: WorkPatch) -> Result<Work, CoreError> {
        self.works.lock().update(id, &patch, Utc::now())
    }

    async fn remove_work(&self, id: WorkId) -> Result<(), CoreError> {
        let mut works = self.works.lock();
        let image_url = works.get(id)?.image_url.clone();
        if !is_external(&image_url) {
            self.assets.remove(&image_url)?;
        }
        works.remove(id)?;
        Ok(())
    }

    async fn store_uploaded_image(
        &self,
        bytes: &[u8],
        original_filename: &str,
    ) -> Result<String, CoreError> {
        self.assets.store(bytes, original_filename)
    }
}
