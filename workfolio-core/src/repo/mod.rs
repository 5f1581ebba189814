use crate::{CoreError, NewWork, Work, WorkId, WorkPatch};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryRepo;

#[async_trait]
pub trait Repository: Send + Sync {
    // Works
    async fn list_works(&self) -> Result<Vec<Work>, CoreError>;
    async fn get_work(&self, id: WorkId) -> Result<Work, CoreError>;
    async fn create_work(&self, new: NewWork) -> Result<Work, CoreError>;
    async fn update_work(&self, id: WorkId, patch: WorkPatch) -> Result<Work, CoreError>;
    /// Deletes the work and, for a local image reference, the image file.
    async fn remove_work(&self, id: WorkId) -> Result<(), CoreError>;

    // Uploads
    async fn store_uploaded_image(
        &self,
        bytes: &[u8],
        original_filename: &str,
    ) -> Result<String, CoreError>;
}
