use crate::assets::{local_file_name, opaque_file_name, upload_reference, AssetStore, Removal};
use crate::CoreError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory [`AssetStore`] keyed by file name.
#[derive(Default)]
pub struct MemoryAssets {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, reference: &str) -> bool {
        local_file_name(reference)
            .map(|n| self.files.read().contains_key(n))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl AssetStore for MemoryAssets {
    fn store(&self, bytes: &[u8], original_filename: &str) -> Result<String, CoreError> {
        let name = opaque_file_name(original_filename);
        self.files.write().insert(name.clone(), bytes.to_vec());
        Ok(upload_reference(&name))
    }

    fn remove(&self, reference: &str) -> Result<Removal, CoreError> {
        let Some(name) = local_file_name(reference) else {
            return Ok(Removal::Skipped);
        };
        Ok(match self.files.write().remove(name) {
            Some(_) => Removal::Deleted,
            None => Removal::Missing,
        })
    }
}
